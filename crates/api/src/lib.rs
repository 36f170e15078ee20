//! Weather Proxy API Server
//!
//! Accepts weather lookups, fetches current conditions from the provider and
//! keeps the combined record in memory for later retrieval.

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use storage::InMemoryRecordStore;
use tower_http::trace::TraceLayer;
use tracing::info;
use weather_gateway::WeatherstackClient;

mod cors;
pub mod error;
pub mod routes;
pub mod service;
pub mod settings;

pub use cors::create_cors_layer;
pub use error::{ConfigError, ServiceError, StartupError};
pub use service::WeatherService;
pub use settings::Settings;

/// Application state shared across handlers
pub struct AppState {
    /// Create/retrieve workflows
    pub service: WeatherService,
    /// Version string
    pub version: String,
    /// Start time
    pub start_time: std::time::Instant,
}

impl AppState {
    /// Create new application state
    pub fn new(service: WeatherService) -> Self {
        Self {
            service,
            version: env!("CARGO_PKG_VERSION").to_string(),
            start_time: std::time::Instant::now(),
        }
    }
}

/// Create the application router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(routes::health::health_handler))
        .route("/weather", post(routes::weather::create_weather))
        .route("/weather/:id", get(routes::weather::get_weather))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Wire the provider client, store and routes from settings
pub fn build_app(settings: &Settings) -> Result<Router, StartupError> {
    let provider = WeatherstackClient::new(settings.gateway_config())?;
    let store = InMemoryRecordStore::new();
    let service = WeatherService::new(Arc::new(provider), Arc::new(store));

    let state = Arc::new(AppState::new(service));
    Ok(create_router(state).layer(create_cors_layer(settings.cors_origin()?)))
}

/// Initialize logging
pub fn init_logging(settings: &Settings) -> Result<(), StartupError> {
    let level = settings.log_level()?;
    let builder = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(true);

    let result = if settings.logging.format == "json" {
        tracing::subscriber::set_global_default(builder.json().finish())
    } else {
        tracing::subscriber::set_global_default(builder.finish())
    };

    result.map_err(|e| StartupError::Logging(e.to_string()))
}

/// Run the server until Ctrl-C
pub async fn run_server(settings: &Settings) -> Result<(), StartupError> {
    let app = build_app(settings)?;
    let addr = settings.bind_addr();

    info!("Starting API server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("API server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
