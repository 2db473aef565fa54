//! Request correlation.
//!
//! Every request gets an `x-request-id` (kept if the client sent one), the
//! trace span carries it, and the response echoes it back.

use axum::{body::Body, http::Request};
use tracing::Span;

pub const X_REQUEST_ID: &str = "x-request-id";

/// Span factory for `TraceLayer::make_span_with`.
pub fn request_span(request: &Request<Body>) -> Span {
    let request_id = request
        .headers()
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "request",
        request_id = %request_id,
        method = %request.method(),
        path = %request.uri().path(),
    )
}
