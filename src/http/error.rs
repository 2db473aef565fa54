//! Errors raised while answering a ping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PingError {
    /// The request input (query or form body) could not be read.
    #[error("failed to read request input: {0}")]
    Input(#[source] axum::Error),

    /// The WebSocket transport failed while reading or writing a message.
    #[error("websocket transport error: {0}")]
    Transport(#[from] axum::Error),

    /// A custom session handler gave up.
    #[error("websocket handler error: {0}")]
    Handler(String),
}

impl IntoResponse for PingError {
    fn into_response(self) -> Response {
        tracing::warn!(error = %self, "Ping request failed");
        (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()).into_response()
    }
}
