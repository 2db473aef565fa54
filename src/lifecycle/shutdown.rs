//! Shutdown coordination.
//!
//! One [`Shutdown`] is created at startup. The signal listener triggers it and
//! [`HttpServer::run`](crate::http::HttpServer::run) subscribes to it.
//!
//! Graceful shutdown covers plain HTTP traffic only: the listener stops accepting,
//! and in-flight pings and forwarded requests finish. Echo sessions have already been
//! handed off from hyper once the upgrade completes, so they are not drained. They keep
//! running on their own tasks until the peer closes or the runtime is dropped.

use std::future::Future;

use tokio::sync::broadcast;

/// Broadcasts a single "stop" notification to every subscribed task.
#[derive(Debug, Clone)]
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    /// A coordinator with no subscribers yet.
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Trigger the shutdown signal. Idempotent.
    ///
    /// Subscribers that have not received yet see exactly one notification. Open
    /// echo sessions are not notified.
    pub fn trigger(&self) {
        let _ = self.tx.send(());
    }

    /// Number of tasks still listening.
    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolve once `rx` observes the signal (or its sender is gone).
pub fn signalled(mut rx: broadcast::Receiver<()>) -> impl Future<Output = ()> + Send + 'static {
    async move {
        let _ = rx.recv().await;
    }
}
