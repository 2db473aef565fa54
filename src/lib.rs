//! Liveness ping interceptor with an optional WebSocket echo channel.
//!
//! The interceptor sits in front of an application router. It answers one
//! well-known action itself and hands every other request to the application
//! untouched.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;

pub use config::schema::AppConfig;
pub use http::{HttpServer, Ping, PingError, WsHandler};
pub use lifecycle::Shutdown;
