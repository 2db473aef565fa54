//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::time::Duration;

use axum::{http::StatusCode, Router};
use tokio::net::TcpListener;

use api_ping::config::{AppConfig, PingConfig};
use api_ping::http::{HttpServer, Ping};
use api_ping::lifecycle::Shutdown;

/// Status returned by the stand-in application for every request it sees.
pub const APP_STATUS: StatusCode = StatusCode::IM_A_TEAPOT;

/// A running server; shuts down when dropped.
pub struct TestServer {
    pub addr: SocketAddr,
    shutdown: Shutdown,
}

impl TestServer {
    pub fn http_url(&self, query: &str) -> String {
        format!("http://{}/api?{}", self.addr, query)
    }

    #[allow(dead_code)]
    pub fn ws_url(&self, query: &str) -> String {
        format!("ws://{}/api?{}", self.addr, query)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Application that answers with `APP_STATUS` and echoes the request body.
pub fn test_app() -> Router {
    Router::new().fallback(|body: String| async move { (APP_STATUS, body) })
}

/// Start a server on an ephemeral port with the default echo handler.
pub async fn spawn_server(ping_config: PingConfig) -> TestServer {
    spawn_with_ping(Ping::new(ping_config)).await
}

/// Start a server around a preconfigured interceptor.
#[allow(dead_code)]
pub async fn spawn_with_ping(ping: Ping) -> TestServer {
    spawn_app(AppConfig::default(), ping, test_app()).await
}

/// Start a server with explicit config, interceptor and application.
///
/// `config.apiping` is replaced by the interceptor's own settings.
pub async fn spawn_app(mut config: AppConfig, ping: Ping, app: Router) -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    config.listener.bind_address = addr.to_string();
    config.apiping = ping.config().clone();

    let shutdown = Shutdown::new();
    let server = HttpServer::with_ping(config, ping, app);
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    // Listener is already bound; give the accept loop a moment to start.
    tokio::time::sleep(Duration::from_millis(20)).await;

    TestServer { addr, shutdown }
}

/// HTTP client that bypasses any system proxy.
#[allow(dead_code)]
pub fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}
