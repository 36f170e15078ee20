//! Weatherstack Client
//!
//! One GET to the provider's current-conditions endpoint per lookup.

use crate::error::GatewayError;
use crate::WeatherProvider;
use async_trait::async_trait;
use reqwest::Client;
use std::fmt;
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// Current-conditions endpoint
pub const DEFAULT_BASE_URL: &str = "http://api.weatherstack.com/current";

/// Metric units
pub const DEFAULT_UNITS: &str = "m";

/// Bounded wait for a provider response
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Provider connection settings
#[derive(Clone)]
pub struct GatewayConfig {
    /// Endpoint URL
    pub base_url: String,
    /// Provider access key
    pub api_key: String,
    /// Unit system flag ("m", "f" or "s")
    pub units: String,
    /// Maximum time to wait for the whole response
    pub timeout: Duration,
}

impl GatewayConfig {
    /// Default endpoint and units with the given access key
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
            units: DEFAULT_UNITS.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_units(mut self, units: impl Into<String>) -> Self {
        self.units = units.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("units", &self.units)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// HTTP client for the Weatherstack API
#[derive(Debug, Clone)]
pub struct WeatherstackClient {
    client: Client,
    config: GatewayConfig,
}

impl WeatherstackClient {
    /// Create a new client
    pub fn new(config: GatewayConfig) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .build()
            .map_err(|e| GatewayError::Client(e.to_string()))?;

        debug!("Created weather provider client for {}", config.base_url);
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    async fn fetch(&self, location: &str) -> Result<serde_json::Value, GatewayError> {
        let response = self
            .client
            .get(&self.config.base_url)
            .query(&[
                ("access_key", self.config.api_key.as_str()),
                ("query", location),
                ("units", self.config.units.as_str()),
            ])
            .send()
            .await
            .map_err(|e| self.map_transport(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(GatewayError::Status(status.as_u16()));
        }

        let body = response.bytes().await.map_err(|e| self.map_transport(e))?;
        serde_json::from_slice(&body).map_err(|e| GatewayError::InvalidBody(e.to_string()))
    }

    fn map_transport(&self, err: reqwest::Error) -> GatewayError {
        if err.is_timeout() {
            GatewayError::Timeout(self.config.timeout)
        } else {
            // reqwest includes the full URL, which carries the access key
            GatewayError::Network(err.without_url().to_string())
        }
    }
}

#[async_trait]
impl WeatherProvider for WeatherstackClient {
    #[instrument(skip(self), level = "debug")]
    async fn current(&self, location: &str) -> Result<serde_json::Value, GatewayError> {
        debug!("Requesting current conditions");

        let result = match tokio::time::timeout(self.config.timeout, self.fetch(location)).await {
            Ok(result) => result,
            Err(_) => Err(GatewayError::Timeout(self.config.timeout)),
        };

        if let Err(e) = &result {
            warn!("Weather provider call failed: {}", e);
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> WeatherstackClient {
        let config = GatewayConfig::new("test-key")
            .with_base_url(format!("{}/current", server.uri()))
            .with_timeout(Duration::from_millis(500));
        WeatherstackClient::new(config).unwrap()
    }

    #[test]
    fn test_default_config() {
        let config = GatewayConfig::new("key");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.units, "m");
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_debug_hides_api_key() {
        let rendered = format!("{:?}", GatewayConfig::new("super-secret"));
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("<redacted>"));
    }

    #[tokio::test]
    async fn test_sends_query_parameters() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/current"))
            .and(query_param("access_key", "test-key"))
            .and(query_param("query", "New York"))
            .and(query_param("units", "m"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "current": {"temperature": 21}
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let data = client_for(&mock_server).current("New York").await.unwrap();
        assert_eq!(data, json!({"current": {"temperature": 21}}));
    }

    #[tokio::test]
    async fn test_error_status() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/current"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&mock_server)
            .await;

        let err = client_for(&mock_server).current("Paris").await.unwrap_err();
        assert!(matches!(err, GatewayError::Status(503)));
    }

    #[tokio::test]
    async fn test_non_json_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/current"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&mock_server)
            .await;

        let err = client_for(&mock_server).current("Paris").await.unwrap_err();
        assert!(matches!(err, GatewayError::InvalidBody(_)));
    }

    #[tokio::test]
    async fn test_slow_provider_times_out() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/current"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"current": {}}))
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&mock_server)
            .await;

        let err = client_for(&mock_server).current("Paris").await.unwrap_err();
        assert!(err.is_timeout());
    }

    #[tokio::test]
    async fn test_application_error_body_passes_through() {
        let mock_server = MockServer::start().await;
        let body = json!({
            "success": false,
            "error": {"code": 615, "type": "request_failed"}
        });

        Mock::given(method("GET"))
            .and(path("/current"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body.clone()))
            .mount(&mock_server)
            .await;

        let data = client_for(&mock_server).current("Nowhere").await.unwrap();
        assert_eq!(data, body);
    }
}
