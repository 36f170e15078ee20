//! Weather Gateway
//!
//! Fetches current conditions for a free-text location from the weather
//! provider and hands back the raw JSON payload. Failures are reduced to a
//! small set of error kinds so callers can tell a timeout from everything
//! else.

mod client;
mod error;

pub use client::{GatewayConfig, WeatherstackClient, DEFAULT_BASE_URL, DEFAULT_UNITS};
pub use error::GatewayError;

use async_trait::async_trait;

/// Source of current weather conditions
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    /// Fetch current conditions for `location`; the body is returned untouched
    async fn current(&self, location: &str) -> Result<serde_json::Value, GatewayError>;
}
