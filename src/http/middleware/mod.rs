//! Request interceptors.

pub mod ping;

pub use ping::{ping_middleware, Ping};
