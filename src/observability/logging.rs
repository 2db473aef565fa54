//! Structured logging.
//!
//! Filter priority: CLI flag, then `RUST_LOG`, then the config file.
//! Pretty output for development, flattened JSON for log shippers.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{LogFormat, ObservabilityConfig, DEFAULT_LOG_FILTER};

/// Pick the effective filter directive.
pub fn resolve_filter(cli: Option<String>, env: Option<String>, config: &str) -> String {
    cli.or(env).unwrap_or_else(|| config.to_string())
}

/// Initialize the global tracing subscriber.
pub fn init_logging(config: &ObservabilityConfig, cli_filter: Option<String>) {
    let directive = resolve_filter(
        cli_filter,
        std::env::var("RUST_LOG").ok(),
        &config.log_level,
    );
    let filter = EnvFilter::try_new(&directive).unwrap_or_else(|e| {
        eprintln!("Invalid log filter '{directive}': {e}; using '{DEFAULT_LOG_FILTER}'");
        EnvFilter::new(DEFAULT_LOG_FILTER)
    });

    let registry = tracing_subscriber::registry().with(filter);
    match config.log_format {
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().flatten_event(true))
            .init(),
    }
}
