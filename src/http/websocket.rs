//! WebSocket echo channel.
//!
//! # Responsibilities
//! - Detect WebSocket upgrade requests
//! - Define the session handler seam (`WsHandler`)
//! - Provide the default echo loop
//!
//! # Data Flow
//! ```text
//! Client ──── text/binary frame ────→ echo ──── same frame ────→ Client
//! ```
//!
//! # Design Decisions
//! - Echo is frame-for-frame: message type and payload are preserved
//! - Ping/pong is answered by the transport, never echoed
//! - A close frame ends the session cleanly once the handshake completes
//! - Transport errors end it with an error

use std::future::Future;

use axum::{
    extract::ws::{Message, WebSocket},
    http::{header, HeaderMap},
};
use futures_util::future::BoxFuture;

use crate::http::error::PingError;
use crate::observability::metrics;

/// Whether the request asks to switch to the WebSocket protocol.
pub fn is_websocket_upgrade(headers: &HeaderMap) -> bool {
    headers
        .get(header::UPGRADE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.eq_ignore_ascii_case("websocket"))
        .unwrap_or(false)
}

/// Runs an upgraded ping session until it ends.
pub trait WsHandler: Send + Sync + 'static {
    fn handle(&self, socket: WebSocket) -> BoxFuture<'static, Result<(), PingError>>;
}

impl<F, Fut> WsHandler for F
where
    F: Fn(WebSocket) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), PingError>> + Send + 'static,
{
    fn handle(&self, socket: WebSocket) -> BoxFuture<'static, Result<(), PingError>> {
        Box::pin(self(socket))
    }
}

/// Default session handler: echoes every data frame back to the peer.
#[derive(Debug, Clone, Copy, Default)]
pub struct EchoHandler;

impl WsHandler for EchoHandler {
    fn handle(&self, socket: WebSocket) -> BoxFuture<'static, Result<(), PingError>> {
        Box::pin(echo(socket))
    }
}

/// Echo loop. Returns once the peer closes or the transport fails.
pub async fn echo(mut socket: WebSocket) -> Result<(), PingError> {
    while let Some(message) = socket.recv().await {
        match message? {
            message @ Message::Text(_) => {
                socket.send(message).await?;
                metrics::record_echo("text");
            }
            message @ Message::Binary(_) => {
                socket.send(message).await?;
                metrics::record_echo("binary");
            }
            // the next recv completes the closing handshake and yields None
            Message::Close(frame) => {
                tracing::debug!(frame = ?frame, "Peer closed echo channel");
            }
            // control frames
            _ => {}
        }
    }
    Ok(())
}
