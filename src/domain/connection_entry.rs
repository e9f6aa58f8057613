//! Registry record for one active connection.

use std::net::SocketAddr;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::ConnectionId;

/// Diagnostic metadata kept for an active connection.
///
/// Holds no transport state: the socket itself is owned exclusively by the
/// connection's handler task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConnectionEntry {
    /// Diagnostic identifier.
    pub id: ConnectionId,
    /// Remote address of the client.
    pub peer_addr: SocketAddr,
    /// When the handshake completed.
    pub connected_at: DateTime<Utc>,
}

impl ConnectionEntry {
    /// Creates an entry stamped with the current time.
    #[must_use]
    pub fn new(id: ConnectionId, peer_addr: SocketAddr) -> Self {
        Self {
            id,
            peer_addr,
            connected_at: Utc::now(),
        }
    }

    /// Milliseconds elapsed since the connection was accepted.
    #[must_use]
    pub fn age_ms(&self) -> i64 {
        (Utc::now() - self.connected_at).num_milliseconds().max(0)
    }
}
