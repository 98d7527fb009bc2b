//! Real-time WebSocket client configuration.

use serde::{Deserialize, Serialize};

/// Real-time (WebSocket) subscriber configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RealtimeConfig {
    /// Path of the WebSocket endpoint, relative to the API base URL.
    #[serde(default = "default_ws_path")]
    pub ws_path: String,
    /// Delay before the first reconnect attempt, in milliseconds.
    #[serde(default = "default_reconnect_initial_delay")]
    pub reconnect_initial_delay_ms: u64,
    /// Upper bound for the exponential reconnect backoff, in milliseconds.
    #[serde(default = "default_reconnect_max_delay")]
    pub reconnect_max_delay_ms: u64,
    /// Seconds without any server traffic before the socket is considered dead.
    #[serde(default = "default_liveness_timeout")]
    pub liveness_timeout_seconds: u64,
    /// Internal buffer size for the session event channel.
    #[serde(default = "default_event_buffer")]
    pub event_buffer_size: usize,
    /// Seconds to wait for the subscriber task to exit during shutdown.
    #[serde(default = "default_shutdown_timeout")]
    pub shutdown_timeout_seconds: u64,
}

impl RealtimeConfig {
    /// Derive the WebSocket URL from the API base URL.
    ///
    /// Swaps the `http(s)` scheme for `ws(s)` and appends [`Self::ws_path`].
    pub fn ws_url(&self, api_base_url: &str) -> String {
        let base = api_base_url.trim_end_matches('/');
        let base = if let Some(rest) = base.strip_prefix("https://") {
            format!("wss://{rest}")
        } else if let Some(rest) = base.strip_prefix("http://") {
            format!("ws://{rest}")
        } else {
            base.to_string()
        };

        if self.ws_path.starts_with('/') {
            format!("{}{}", base, self.ws_path)
        } else {
            format!("{}/{}", base, self.ws_path)
        }
    }
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            ws_path: default_ws_path(),
            reconnect_initial_delay_ms: default_reconnect_initial_delay(),
            reconnect_max_delay_ms: default_reconnect_max_delay(),
            liveness_timeout_seconds: default_liveness_timeout(),
            event_buffer_size: default_event_buffer(),
            shutdown_timeout_seconds: default_shutdown_timeout(),
        }
    }
}

fn default_ws_path() -> String {
    "/ws".to_string()
}

fn default_reconnect_initial_delay() -> u64 {
    5000
}

fn default_reconnect_max_delay() -> u64 {
    60_000
}

fn default_liveness_timeout() -> u64 {
    45
}

fn default_event_buffer() -> usize {
    256
}

fn default_shutdown_timeout() -> u64 {
    5
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ws_url_swaps_http_scheme() {
        let config = RealtimeConfig::default();
        assert_eq!(config.ws_url("http://localhost:8080"), "ws://localhost:8080/ws");
    }

    #[test]
    fn test_ws_url_swaps_https_scheme() {
        let config = RealtimeConfig::default();
        assert_eq!(
            config.ws_url("https://catalog.example.com"),
            "wss://catalog.example.com/ws"
        );
    }

    #[test]
    fn test_ws_url_trims_trailing_slash() {
        let config = RealtimeConfig::default();
        assert_eq!(config.ws_url("http://localhost:8080/"), "ws://localhost:8080/ws");
    }

    #[test]
    fn test_ws_url_normalizes_relative_path() {
        let config = RealtimeConfig {
            ws_path: "realtime".to_string(),
            ..RealtimeConfig::default()
        };
        assert_eq!(config.ws_url("http://localhost:8080"), "ws://localhost:8080/realtime");
    }
}
