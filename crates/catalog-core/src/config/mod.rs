//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section. Every field carries a serde default so the client runs with
//! an empty configuration.

pub mod api;
pub mod logging;
pub mod realtime;

use serde::{Deserialize, Serialize};

use self::api::ApiConfig;
use self::logging::LoggingConfig;
use self::realtime::RealtimeConfig;

use crate::error::ClientError;

/// Root client configuration.
///
/// This struct is the top-level deserialization target for the merged
/// TOML configuration file and `CATALOG_`-prefixed environment variables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Catalog REST API settings.
    #[serde(default)]
    pub api: ApiConfig,
    /// Real-time WebSocket settings.
    #[serde(default)]
    pub realtime: RealtimeConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            realtime: RealtimeConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from TOML files and the environment.
    ///
    /// Merges `config/default.toml` (when present) with an optional explicit
    /// file and environment variables prefixed with `CATALOG_`.
    pub fn load(file: Option<&str>) -> Result<Self, ClientError> {
        let mut builder = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false));

        if let Some(path) = file {
            builder = builder.add_source(config::File::with_name(path).required(true));
        }

        let config = builder
            .add_source(
                config::Environment::with_prefix("CATALOG")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| ClientError::configuration(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| ClientError::configuration(format!("Failed to deserialize config: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: AppConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.api.base_url, "http://localhost:8080");
        assert_eq!(config.realtime.ws_path, "/ws");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        let config: AppConfig =
            serde_json::from_str(r#"{"api": {"base_url": "https://catalog.example.com"}}"#)
                .unwrap();
        assert_eq!(config.api.base_url, "https://catalog.example.com");
        assert_eq!(config.api.request_timeout_seconds, 30);
        assert_eq!(config.realtime.reconnect_initial_delay_ms, 5000);
    }

    #[test]
    fn test_load_rejects_missing_explicit_file() {
        let result = AppConfig::load(Some("/nonexistent/catalog-config"));
        assert!(result.is_err());
    }
}
