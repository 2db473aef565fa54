//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the ping service.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Default tracing filter when neither the CLI, `RUST_LOG` nor the config set one.
pub const DEFAULT_LOG_FILTER: &str = "api_ping=info,tower_http=info";

/// Root configuration for the ping service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Ping interceptor settings.
    pub apiping: PingConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Ping interceptor configuration.
///
/// Read once when the interceptor is built; never mutated afterwards.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PingConfig {
    /// Turn the interceptor into a plain pass-through.
    pub disabled: bool,

    /// Allow `Upgrade: websocket` ping requests to open the echo channel.
    pub websocket_enabled: bool,

    /// Action name answered by the interceptor.
    pub action: String,

    /// Request parameter (query string or form body) carrying the action name.
    pub action_param: String,

    /// Maximum form-encoded body buffered while looking for the action.
    pub max_form_bytes: usize,

    /// Largest WebSocket message accepted on the echo channel.
    pub max_message_size: usize,
}

impl Default for PingConfig {
    fn default() -> Self {
        Self {
            disabled: false,
            websocket_enabled: false,
            action: "Ping".to_string(),
            action_param: "Action".to_string(),
            max_form_bytes: 10 * 1024 * 1024, // 10MB
            max_message_size: 64 * 1024 * 1024,
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time to produce a response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log filter directive (e.g. "info" or "api_ping=debug,tower_http=info").
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: DEFAULT_LOG_FILTER.to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}
