//! Gateway Error Types

use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while talking to the weather provider
#[derive(Debug, Error)]
pub enum GatewayError {
    /// No response within the configured bound
    #[error("Weather provider did not respond within {0:?}")]
    Timeout(Duration),

    /// Provider answered with a non-success status
    #[error("Weather provider returned HTTP {0}")]
    Status(u16),

    /// Body was not valid JSON
    #[error("Invalid response body: {0}")]
    InvalidBody(String),

    /// Transport failure (DNS, connect, reset...)
    #[error("Network error: {0}")]
    Network(String),

    /// HTTP client could not be built
    #[error("HTTP client error: {0}")]
    Client(String),
}

impl GatewayError {
    /// Whether the provider ran out of time
    pub fn is_timeout(&self) -> bool {
        matches!(self, GatewayError::Timeout(_))
    }
}
