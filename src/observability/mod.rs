//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Interceptor and echo sessions produce:
//!     → logging.rs (structured log events, request span with x-request-id)
//!     → metrics.rs (counters, gauges, histograms)
//!
//! Consumers:
//!     → Log aggregation (stdout, pretty or JSON)
//!     → Metrics endpoint (Prometheus scrape, optional)
//! ```

pub mod logging;
pub mod metrics;
