//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, trace, timeout)
//!     → middleware/ping.rs (disabled? pass through)
//!     → action.rs (read action from query / form body)
//!     → action != Ping  → application, request unchanged
//!     → plain request   → response.rs (success envelope)
//!     → Upgrade: websocket → websocket.rs (echo until close or error)
//! ```

pub mod action;
pub mod error;
pub mod middleware;
pub mod request;
pub mod response;
pub mod server;
pub mod websocket;

pub use error::PingError;
pub use middleware::{ping_middleware, Ping};
pub use request::X_REQUEST_ID;
pub use response::ApiReply;
pub use server::HttpServer;
pub use websocket::{echo, EchoHandler, WsHandler};
