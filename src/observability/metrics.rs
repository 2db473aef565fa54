//! Metrics collection and exposition.
//!
//! # Metrics
//! - `api_ping_requests_total` (counter): answered pings by outcome
//! - `api_ping_echo_messages_total` (counter): echoed frames by kind
//! - `api_ping_ws_sessions_active` (gauge): open echo channels
//! - `api_ping_ws_session_duration_seconds` (histogram): echo channel lifetime
//!
//! Recording is a no-op until `init_metrics` installs the Prometheus recorder.

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and its scrape listener.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

pub fn record_ping(outcome: &'static str) {
    counter!("api_ping_requests_total", "outcome" => outcome).increment(1);
}

pub fn record_echo(kind: &'static str) {
    counter!("api_ping_echo_messages_total", "kind" => kind).increment(1);
}

pub fn ws_session_started() {
    gauge!("api_ping_ws_sessions_active").increment(1.0);
}

pub fn ws_session_finished(started: Instant) {
    gauge!("api_ping_ws_sessions_active").decrement(1.0);
    histogram!("api_ping_ws_session_duration_seconds").record(started.elapsed().as_secs_f64());
}
