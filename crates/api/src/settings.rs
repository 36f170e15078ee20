//! Configuration
//!
//! Built-in defaults, then an optional `weather-proxy.toml`, then
//! `WEATHER_PROXY__*` environment variables. The provider credential is read
//! separately from `WEATHERSTACK_API_KEY` and is required.

use axum::http::HeaderValue;
use config::{Config, Environment, File, Source};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;
use weather_gateway::GatewayConfig;

use crate::error::ConfigError;

/// Environment variable holding the provider access key
pub const API_KEY_ENV: &str = "WEATHERSTACK_API_KEY";

/// Prefix for environment overrides, e.g. `WEATHER_PROXY__SERVER__PORT`
pub const ENV_PREFIX: &str = "WEATHER_PROXY";

/// Optional config file name (any format `config` understands)
pub const CONFIG_FILE: &str = "weather-proxy";

/// HTTP listener settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

/// Cross-origin settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    /// Front-end origin allowed to call the API
    pub allowed_origin: String,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origin: "http://localhost:3000".to_string(),
        }
    }
}

/// Weather provider settings (the access key lives in `Settings::api_key`)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub base_url: String,
    pub units: String,
    pub timeout_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: weather_gateway::DEFAULT_BASE_URL.to_string(),
            units: weather_gateway::DEFAULT_UNITS.to_string(),
            timeout_secs: 30,
        }
    }
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// trace, debug, info, warn or error
    pub level: String,
    /// "text" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "text".to_string(),
        }
    }
}

/// Complete service configuration
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerConfig,
    pub cors: CorsConfig,
    pub provider: ProviderConfig,
    pub logging: LoggingConfig,
    /// Provider access key, never read from files
    #[serde(skip)]
    pub api_key: String,
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("server", &self.server)
            .field("cors", &self.cors)
            .field("provider", &self.provider)
            .field("logging", &self.logging)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl Settings {
    /// Load settings from the working directory and process environment
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_sources(
            File::with_name(CONFIG_FILE).required(false),
            Self::environment(),
            std::env::var(API_KEY_ENV).ok(),
        )
    }

    /// Environment source using the service prefix
    pub fn environment() -> Environment {
        Environment::with_prefix(ENV_PREFIX)
            .separator("__")
            .try_parsing(true)
    }

    /// Layer the given file and environment sources over the defaults
    pub fn from_sources<F, E>(
        file: F,
        env: E,
        api_key: Option<String>,
    ) -> Result<Self, ConfigError>
    where
        F: Source + Send + Sync + 'static,
        E: Source + Send + Sync + 'static,
    {
        let config = Config::builder()
            .add_source(Config::try_from(&Settings::default())?)
            .add_source(file)
            .add_source(env)
            .build()?;

        let mut settings: Settings = config.try_deserialize()?;
        settings.api_key = api_key
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
            .ok_or(ConfigError::MissingApiKey)?;

        settings.validate()?;
        Ok(settings)
    }

    /// Reject settings the server cannot start with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Invalid("server.port cannot be 0".to_string()));
        }
        if self.provider.timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "provider.timeout_secs cannot be 0".to_string(),
            ));
        }
        if self.provider.base_url.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "provider.base_url cannot be empty".to_string(),
            ));
        }
        self.cors_origin()?;
        self.log_level()?;
        match self.logging.format.as_str() {
            "text" | "json" => {}
            other => {
                return Err(ConfigError::Invalid(format!(
                    "logging.format must be \"text\" or \"json\", got {:?}",
                    other
                )))
            }
        }
        Ok(())
    }

    /// Socket address string for the listener
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Allowed origin as a header value
    pub fn cors_origin(&self) -> Result<HeaderValue, ConfigError> {
        // credentials are allowed, so a wildcard origin is not
        if self.cors.allowed_origin.trim() == "*" {
            return Err(ConfigError::Invalid(
                "cors.allowed_origin must name a single origin, not \"*\"".to_string(),
            ));
        }
        HeaderValue::from_str(&self.cors.allowed_origin).map_err(|_| {
            ConfigError::Invalid(format!(
                "cors.allowed_origin is not a valid origin: {:?}",
                self.cors.allowed_origin
            ))
        })
    }

    pub fn log_level(&self) -> Result<tracing::Level, ConfigError> {
        tracing::Level::from_str(&self.logging.level).map_err(|_| {
            ConfigError::Invalid(format!("unknown logging.level {:?}", self.logging.level))
        })
    }

    /// Provider client settings
    pub fn gateway_config(&self) -> GatewayConfig {
        GatewayConfig::new(self.api_key.clone())
            .with_base_url(self.provider.base_url.clone())
            .with_units(self.provider.units.clone())
            .with_timeout(Duration::from_secs(self.provider.timeout_secs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;
    use std::collections::HashMap;

    fn no_file() -> impl Source + Send + Sync + 'static {
        File::from_str("", FileFormat::Toml)
    }

    fn env(vars: &[(&str, &str)]) -> Environment {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::environment().source(Some(map))
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::from_sources(no_file(), env(&[]), Some("key".into())).unwrap();

        assert_eq!(settings.server.host, "0.0.0.0");
        assert_eq!(settings.server.port, 8000);
        assert_eq!(settings.cors.allowed_origin, "http://localhost:3000");
        assert_eq!(settings.provider.base_url, "http://api.weatherstack.com/current");
        assert_eq!(settings.provider.units, "m");
        assert_eq!(settings.provider.timeout_secs, 30);
        assert_eq!(settings.api_key, "key");
    }

    #[test]
    fn test_missing_api_key() {
        let err = Settings::from_sources(no_file(), env(&[]), None).unwrap_err();
        assert!(matches!(err, ConfigError::MissingApiKey));

        let err = Settings::from_sources(no_file(), env(&[]), Some("   ".into())).unwrap_err();
        assert!(matches!(err, ConfigError::MissingApiKey));
    }

    #[test]
    fn test_file_then_env_override() {
        let file = File::from_str(
            "[server]\nport = 9000\n\n[provider]\ntimeout_secs = 5\n",
            FileFormat::Toml,
        );
        let settings = Settings::from_sources(
            file,
            env(&[("WEATHER_PROXY__SERVER__PORT", "9100")]),
            Some("key".into()),
        )
        .unwrap();

        assert_eq!(settings.server.port, 9100);
        assert_eq!(settings.provider.timeout_secs, 5);
        assert_eq!(settings.gateway_config().timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_rejects_zero_port() {
        let err = Settings::from_sources(
            no_file(),
            env(&[("WEATHER_PROXY__SERVER__PORT", "0")]),
            Some("key".into()),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_rejects_unknown_log_level() {
        let mut settings = Settings {
            api_key: "key".into(),
            ..Default::default()
        };
        settings.logging.level = "loud".into();
        assert!(settings.validate().is_err());

        settings.logging.level = "debug".into();
        assert_eq!(settings.log_level().unwrap(), tracing::Level::DEBUG);
    }

    #[test]
    fn test_rejects_wildcard_origin() {
        let err = Settings::from_sources(
            no_file(),
            env(&[("WEATHER_PROXY__CORS__ALLOWED_ORIGIN", "*")]),
            Some("key".into()),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_debug_hides_api_key() {
        let settings = Settings {
            api_key: "super-secret".into(),
            ..Default::default()
        };
        assert!(!format!("{:?}", settings).contains("super-secret"));
    }
}
