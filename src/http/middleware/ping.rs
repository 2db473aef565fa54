//! Ping interceptor middleware.
//! Answers the liveness action, passes everything else through untouched.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{ws::WebSocketUpgrade, FromRequestParts, Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    Router,
};

use crate::config::PingConfig;
use crate::http::action::read_action;
use crate::http::response::ApiReply;
use crate::http::websocket::{is_websocket_upgrade, EchoHandler, WsHandler};
use crate::observability::metrics;

/// Interceptor state: immutable configuration plus the session handler.
#[derive(Clone)]
pub struct Ping {
    config: Arc<PingConfig>,
    ws_handler: Arc<dyn WsHandler>,
}

impl Ping {
    pub fn new(config: PingConfig) -> Self {
        Self {
            config: Arc::new(config),
            ws_handler: Arc::new(EchoHandler),
        }
    }

    /// Replace the WebSocket session handler.
    pub fn with_ws_handler<H: WsHandler>(mut self, handler: H) -> Self {
        self.set_ws_handler(handler);
        self
    }

    pub fn set_ws_handler<H: WsHandler>(&mut self, handler: H) {
        self.ws_handler = Arc::new(handler);
    }

    pub fn config(&self) -> &PingConfig {
        &self.config
    }

    /// Put the interceptor in front of `app`, fallback included.
    pub fn wrap(self, app: Router) -> Router {
        Router::new()
            .fallback_service(app)
            .layer(middleware::from_fn_with_state(self, ping_middleware))
    }
}

impl std::fmt::Debug for Ping {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ping").field("config", &self.config).finish_non_exhaustive()
    }
}

pub async fn ping_middleware(State(ping): State<Ping>, request: Request, next: Next) -> Response {
    // 1. Disabled: pure pass-through.
    if ping.config.disabled {
        return next.run(request).await;
    }

    // 2. Read the action name
    let (request, action) =
        match read_action(request, &ping.config.action_param, ping.config.max_form_bytes).await {
            Ok(found) => found,
            Err(e) => {
                metrics::record_ping("input_error");
                return e.into_response();
            }
        };

    if action.as_deref() != Some(ping.config.action.as_str()) {
        return next.run(request).await;
    }

    // 3. Plain ping
    if !is_websocket_upgrade(request.headers()) {
        metrics::record_ping("reply");
        return ApiReply::ok().into_response();
    }

    if !ping.config.websocket_enabled {
        tracing::debug!("WebSocket ping requested while disabled");
        metrics::record_ping("upgrade_disabled");
        return StatusCode::OK.into_response();
    }

    // 4. Echo channel
    let (mut parts, _body) = request.into_parts();
    let upgrade: WebSocketUpgrade =
        match WebSocketUpgrade::from_request_parts(&mut parts, &()).await {
            Ok(upgrade) => upgrade,
            Err(rejection) => {
                tracing::debug!(error = %rejection, "WebSocket handshake rejected");
                metrics::record_ping("upgrade_rejected");
                return rejection.into_response();
            }
        };

    metrics::record_ping("upgraded");
    let handler = Arc::clone(&ping.ws_handler);
    upgrade
        .max_message_size(ping.config.max_message_size)
        .on_failed_upgrade(|error: axum::Error| {
            tracing::debug!(error = %error, "WebSocket upgrade failed")
        })
        .on_upgrade(move |socket| async move {
            let started = Instant::now();
            metrics::ws_session_started();
            match handler.handle(socket).await {
                Ok(()) => tracing::debug!("Echo channel closed"),
                Err(error) => tracing::debug!(error = %error, "Echo channel ended"),
            }
            metrics::ws_session_finished(started);
        })
}
