//! Configuration validation.
//!
//! Serde handles syntax; this module checks values. Validation is a pure
//! function that reports every problem it finds, not just the first.

use std::net::SocketAddr;

use thiserror::Error;
use tracing_subscriber::EnvFilter;

use crate::config::schema::AppConfig;

/// A single semantic problem in a loaded configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid {field} '{value}': not a socket address")]
    InvalidAddress { field: &'static str, value: String },

    #[error("{0} must not be empty")]
    Empty(&'static str),

    #[error("{0} must be greater than zero")]
    Zero(&'static str),

    #[error("invalid log level '{0}'")]
    InvalidLogLevel(String),
}

/// Validate a configuration, collecting all errors.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "listener.bind_address",
            value: config.listener.bind_address.clone(),
        });
    }

    let ping = &config.apiping;
    if ping.action.is_empty() {
        errors.push(ValidationError::Empty("apiping.action"));
    }
    if ping.action_param.is_empty() {
        errors.push(ValidationError::Empty("apiping.action_param"));
    }
    if ping.max_form_bytes == 0 {
        errors.push(ValidationError::Zero("apiping.max_form_bytes"));
    }
    if ping.max_message_size == 0 {
        errors.push(ValidationError::Zero("apiping.max_message_size"));
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::Zero("timeouts.request_secs"));
    }

    let observability = &config.observability;
    if EnvFilter::try_new(&observability.log_level).is_err() {
        errors.push(ValidationError::InvalidLogLevel(observability.log_level.clone()));
    }
    if observability.metrics_enabled
        && observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidAddress {
            field: "observability.metrics_address",
            value: observability.metrics_address.clone(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
