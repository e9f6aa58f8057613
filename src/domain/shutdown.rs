//! Process-wide shutdown signal.
//!
//! [`ShutdownSignal`] wraps a [`tokio::sync::watch`] channel. The server
//! triggers it once when the process is asked to stop; every connection
//! handler holds a [`ShutdownListener`] and closes its socket when the
//! signal fires. Unlike a broadcast channel, listeners created after the
//! trigger still observe it.

use std::sync::Arc;

use tokio::sync::watch;

/// Sending half of the shutdown signal. Cheap to clone.
#[derive(Debug, Clone)]
pub struct ShutdownSignal {
    sender: Arc<watch::Sender<bool>>,
}

impl ShutdownSignal {
    /// Creates an untriggered signal.
    #[must_use]
    pub fn new() -> Self {
        let (sender, _) = watch::channel(false);
        Self {
            sender: Arc::new(sender),
        }
    }

    /// Fires the signal. Idempotent.
    pub fn trigger(&self) {
        self.sender.send_replace(true);
    }

    /// Returns `true` once [`Self::trigger`] has been called.
    #[must_use]
    pub fn is_triggered(&self) -> bool {
        *self.sender.borrow()
    }

    /// Creates a listener for one connection handler.
    #[must_use]
    pub fn subscribe(&self) -> ShutdownListener {
        ShutdownListener {
            receiver: self.sender.subscribe(),
        }
    }
}

impl Default for ShutdownSignal {
    fn default() -> Self {
        Self::new()
    }
}

/// Receiving half held by a single connection handler.
#[derive(Debug)]
pub struct ShutdownListener {
    receiver: watch::Receiver<bool>,
}

impl ShutdownListener {
    /// Resolves once shutdown has been triggered.
    ///
    /// Also resolves if every [`ShutdownSignal`] has been dropped, since
    /// the server that owned it is gone.
    pub async fn wait(&mut self) {
        let _ = self.receiver.wait_for(|triggered| *triggered).await;
    }
}

#[cfg(test)]
mod tests {
    use tokio_test::{assert_pending, assert_ready, task};

    use super::*;

    #[test]
    fn wait_is_pending_until_triggered() {
        let signal = ShutdownSignal::new();
        let mut listener = signal.subscribe();
        let mut wait = task::spawn(listener.wait());

        assert_pending!(wait.poll());
        assert!(!signal.is_triggered());

        signal.trigger();
        assert!(wait.is_woken());
        assert_ready!(wait.poll());
    }

    #[tokio::test]
    async fn late_listener_observes_earlier_trigger() {
        let signal = ShutdownSignal::new();
        signal.trigger();
        signal.trigger();

        let mut listener = signal.subscribe();
        listener.wait().await;
        assert!(signal.is_triggered());
    }

    #[tokio::test]
    async fn dropped_signal_releases_listeners() {
        let signal = ShutdownSignal::new();
        let mut listener = signal.subscribe();
        drop(signal);
        listener.wait().await;
    }
}
