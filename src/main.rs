//! api-ping: liveness endpoint for an API pipeline.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request      ┌──────────────────────────────────────────────┐
//!     ────────────────────┼─▶ request id ─▶ trace ─▶ timeout ─▶ ping ─┐  │
//!                         │                                           │  │
//!                         │        Action == Ping?                    │  │
//!                         │          no  ─────────────▶ application ◀─┘  │
//!                         │          yes, plain ──────▶ {"CODE":"ok"}    │
//!                         │          yes, Upgrade ────▶ echo channel     │
//!                         └──────────────────────────────────────────────┘
//! ```
//!
//! The bundled application is a stand-in that rejects every other action; real
//! deployments mount their own router behind `Ping::wrap`.

use std::net::SocketAddr;
use std::path::PathBuf;

use axum::{extract::Request, http::StatusCode, response::IntoResponse, Router};
use clap::Parser;
use tokio::net::TcpListener;

use api_ping::config::{load_config, validate_config, AppConfig, ConfigError};
use api_ping::http::{ApiReply, HttpServer};
use api_ping::lifecycle::{signals, Shutdown};
use api_ping::observability::{logging, metrics};

/// api-ping: answers the Ping action, forwards everything else
#[derive(Parser, Debug)]
#[command(name = "api-ping", version, about)]
struct Args {
    /// Path to configuration file (defaults apply when omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level filter (e.g., "api_ping=debug,tower_http=info")
    #[arg(short, long)]
    log_level: Option<String>,

    /// Override listener.bind_address
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => AppConfig::default(),
    };
    if let Some(bind) = args.bind {
        config.listener.bind_address = bind;
        validate_config(&config).map_err(ConfigError::Validation)?;
    }

    logging::init_logging(&config.observability, args.log_level);

    tracing::info!("api-ping v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        disabled = config.apiping.disabled,
        websocket_enabled = config.apiping.websocket_enabled,
        action = %config.apiping.action,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        let addr: SocketAddr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr)?;
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    signals::spawn_signal_listener(shutdown.clone());

    let app = Router::new().fallback(unknown_action);
    let server = HttpServer::new(config, app);
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

async fn unknown_action(request: Request) -> impl IntoResponse {
    tracing::debug!(uri = %request.uri(), "No application handler for request");
    (
        StatusCode::NOT_FOUND,
        ApiReply::error("UnknownAction", "no handler for this action"),
    )
}
