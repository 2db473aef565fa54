//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Put the ping interceptor in front of the application router
//! - Wire up middleware (request ID, tracing, timeout)
//! - Serve on a listener until shutdown is signalled

use std::time::Duration;

use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::AppConfig;
use crate::http::middleware::Ping;
use crate::http::request::request_span;
use crate::lifecycle::shutdown::signalled;

/// HTTP server hosting the ping interceptor and the application behind it.
pub struct HttpServer {
    router: Router,
    config: AppConfig,
}

impl HttpServer {
    /// Build a server whose interceptor uses the default echo handler.
    pub fn new(config: AppConfig, app: Router) -> Self {
        let ping = Ping::new(config.apiping.clone());
        Self::with_ping(config, ping, app)
    }

    /// Build a server around a preconfigured interceptor.
    pub fn with_ping(config: AppConfig, ping: Ping, app: Router) -> Self {
        tracing::debug!(
            disabled = ping.config().disabled,
            websocket_enabled = ping.config().websocket_enabled,
            action = %ping.config().action,
            "Ping interceptor configured"
        );
        let router = Self::build_router(&config, ping, app);
        Self { router, config }
    }

    /// Layer order (outermost first): request ID, trace, timeout, ping, app.
    #[allow(deprecated)]
    fn build_router(config: &AppConfig, ping: Ping, app: Router) -> Router {
        ping.wrap(app)
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(TraceLayer::new_for_http().make_span_with(request_span))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// The assembled router, for in-process use.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Run the server until `shutdown` fires, then drain in-flight requests.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(signalled(shutdown))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
