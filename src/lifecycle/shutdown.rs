//! Shutdown coordination.

use tokio::sync::broadcast;

/// Fans a single "stop now" event out to every server that subscribed.
///
/// `main` triggers it from the signal handler; tests trigger it directly to
/// stop a server they spawned.
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// A receiver that resolves once [`trigger`](Self::trigger) is called.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Notify every current subscriber. A no-op when nobody listens.
    pub fn trigger(&self) {
        let _ = self.tx.send(());
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}
