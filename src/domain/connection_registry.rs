//! Set of currently active connections.
//!
//! [`ConnectionRegistry`] exists for lifecycle purposes only: diagnostics,
//! the health endpoint and shutdown draining. It is never consulted on the
//! message path and is never used for routing or broadcast.

use std::collections::HashMap;
use std::net::SocketAddr;

use tokio::sync::{Notify, RwLock};

use super::{ConnectionEntry, ConnectionId};

/// Active-connection set shared by all handlers.
///
/// Each handler registers itself once after the handshake and releases
/// itself once when its session ends, whatever the reason.
#[derive(Debug)]
pub struct ConnectionRegistry {
    connections: RwLock<HashMap<ConnectionId, ConnectionEntry>>,
    drained: Notify,
}

impl ConnectionRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            connections: RwLock::new(HashMap::new()),
            drained: Notify::new(),
        }
    }

    /// Records a newly accepted connection and returns its identifier.
    pub async fn register(&self, peer_addr: SocketAddr) -> ConnectionId {
        let id = ConnectionId::new();
        let mut map = self.connections.write().await;
        map.insert(id, ConnectionEntry::new(id, peer_addr));
        id
    }

    /// Removes a connection, returning its entry if it was still present.
    ///
    /// Wakes [`Self::wait_until_empty`] waiters when the last connection
    /// leaves.
    pub async fn release(&self, id: ConnectionId) -> Option<ConnectionEntry> {
        let mut map = self.connections.write().await;
        let entry = map.remove(&id);
        if map.is_empty() {
            self.drained.notify_waiters();
        }
        entry
    }

    /// Returns a copy of every active entry.
    pub async fn snapshot(&self) -> Vec<ConnectionEntry> {
        self.connections.read().await.values().cloned().collect()
    }

    /// Returns the number of active connections.
    pub async fn len(&self) -> usize {
        self.connections.read().await.len()
    }

    /// Returns `true` if no connection is active.
    pub async fn is_empty(&self) -> bool {
        self.connections.read().await.is_empty()
    }

    /// Resolves once the registry holds no connections.
    pub async fn wait_until_empty(&self) {
        loop {
            // Created before the check so a release in between is not missed.
            let drained = self.drained.notified();
            if self.is_empty().await {
                return;
            }
            drained.await;
        }
    }
}

impl Default for ConnectionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::net::Ipv4Addr;
    use std::sync::Arc;
    use std::time::Duration;

    use super::*;

    fn peer(port: u16) -> SocketAddr {
        SocketAddr::from((Ipv4Addr::LOCALHOST, port))
    }

    #[tokio::test]
    async fn register_and_release() {
        let registry = ConnectionRegistry::new();
        let id = registry.register(peer(40000)).await;
        assert_eq!(registry.len().await, 1);

        let released = registry.release(id).await;
        assert_eq!(released.map(|e| e.peer_addr), Some(peer(40000)));
        assert!(registry.is_empty().await);
    }

    #[tokio::test]
    async fn release_twice_returns_none() {
        let registry = ConnectionRegistry::new();
        let id = registry.register(peer(40001)).await;
        assert!(registry.release(id).await.is_some());
        assert!(registry.release(id).await.is_none());
    }

    #[tokio::test]
    async fn releasing_one_keeps_others() {
        let registry = ConnectionRegistry::new();
        let a = registry.register(peer(40002)).await;
        let b = registry.register(peer(40003)).await;

        registry.release(a).await;

        let remaining = registry.snapshot().await;
        assert_eq!(remaining.len(), 1);
        assert!(remaining.iter().all(|e| e.id == b));
    }

    #[tokio::test]
    async fn wait_until_empty_returns_immediately_when_empty() {
        let registry = ConnectionRegistry::new();
        let waited = tokio::time::timeout(Duration::from_millis(100), registry.wait_until_empty());
        assert!(waited.await.is_ok());
    }

    #[tokio::test]
    async fn wait_until_empty_wakes_on_last_release() {
        let registry = Arc::new(ConnectionRegistry::new());
        let a = registry.register(peer(40004)).await;
        let b = registry.register(peer(40005)).await;

        let waiter = tokio::spawn({
            let registry = Arc::clone(&registry);
            async move { registry.wait_until_empty().await }
        });

        registry.release(a).await;
        tokio::task::yield_now().await;
        assert!(!waiter.is_finished());

        registry.release(b).await;
        let joined = tokio::time::timeout(Duration::from_secs(1), waiter).await;
        assert!(matches!(joined, Ok(Ok(()))));
    }
}
