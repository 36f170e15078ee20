//! Weather Proxy - Main Entry Point

use api::{init_logging, run_server, Settings};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let settings = Settings::load()?;
    init_logging(&settings)?;

    info!("=== Weather Proxy v{} ===", env!("CARGO_PKG_VERSION"));
    info!("Provider endpoint: {}", settings.provider.base_url);

    run_server(&settings).await?;

    Ok(())
}
