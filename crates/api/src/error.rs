//! API Error Types

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Caller-visible failures of the weather workflows
///
/// Messages are deliberately generic; the underlying cause is logged where
/// the error is produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    /// Provider did not answer within the bounded wait
    #[error("Request timed out")]
    RequestTimeout,

    /// Provider failed or anything else went wrong while creating a record
    #[error("Failed to fetch weather data")]
    UpstreamFailure,

    /// Unknown record id
    #[error("Weather data not found")]
    NotFound,

    /// Store failure on the read path
    #[error("Internal server error")]
    Internal,

    /// Request body could not be read as a lookup request
    #[error("{1}")]
    InvalidRequest(StatusCode, String),
}

impl From<JsonRejection> for ServiceError {
    fn from(rejection: JsonRejection) -> Self {
        ServiceError::InvalidRequest(rejection.status(), rejection.body_text())
    }
}

impl ServiceError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::RequestTimeout => StatusCode::REQUEST_TIMEOUT,
            ServiceError::UpstreamFailure => StatusCode::INTERNAL_SERVER_ERROR,
            ServiceError::NotFound => StatusCode::NOT_FOUND,
            ServiceError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
            ServiceError::InvalidRequest(status, _) => *status,
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let body = Json(json!({ "detail": self.to_string() }));
        (self.status_code(), body).into_response()
    }
}

/// Errors while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration error: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Missing weather provider API key (set {})", crate::settings::API_KEY_ENV)]
    MissingApiKey,

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Errors that prevent the server from starting
#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Failed to create weather provider client: {0}")]
    Gateway(#[from] weather_gateway::GatewayError),

    #[error("Failed to set tracing subscriber: {0}")]
    Logging(String),

    #[error("Server I/O error: {0}")]
    Io(#[from] std::io::Error),
}
