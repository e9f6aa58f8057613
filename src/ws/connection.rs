//! Per-connection echo loop.
//!
//! Each accepted WebSocket runs [`run_connection`] on its own task. The loop
//! reads one message, sends its echo, and only then reads the next, so
//! replies leave in arrival order. The session ends on a peer close, an I/O
//! error, or the server's shutdown signal; in every case the connection is
//! released from the registry and nothing else is affected.

use std::fmt;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::ws::{CloseFrame, Message, Utf8Bytes, WebSocket, close_code};
use futures_util::{SinkExt, StreamExt};

use super::echo::{echo_text, payload_text};
use crate::domain::{ConnectionRegistry, ShutdownListener};
use crate::error::RelayError;

/// Upper bound on flushing the closing handshake to a departing peer.
const CLOSE_TIMEOUT: Duration = Duration::from_secs(1);

/// Why a session ended.
#[derive(Debug)]
enum SessionEnd {
    /// The peer sent a Close frame, with its status code if any.
    PeerClosed(Option<u16>),
    /// The stream ended without a Close frame.
    PeerGone,
    /// Receive or send failed.
    Failed(RelayError),
    /// The server is shutting down.
    Shutdown,
}

impl fmt::Display for SessionEnd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PeerClosed(Some(code)) => write!(f, "peer closed ({code})"),
            Self::PeerClosed(None) => f.write_str("peer closed"),
            Self::PeerGone => f.write_str("peer went away"),
            Self::Failed(err) => write!(f, "{err}"),
            Self::Shutdown => f.write_str("server shutdown"),
        }
    }
}

/// Runs the echo loop for a single WebSocket connection.
///
/// - Registers the connection, then answers every text or binary message
///   with `"echo: " + text` as a text frame.
/// - Sends a `1001 going away` Close frame when shutdown is signalled.
/// - Releases the connection from `registry` however the session ends.
pub async fn run_connection(
    socket: WebSocket,
    peer: SocketAddr,
    registry: Arc<ConnectionRegistry>,
    mut shutdown: ShutdownListener,
) {
    let id = registry.register(peer).await;
    tracing::info!(connection = %id, %peer, "new client connected");

    let (mut ws_tx, mut ws_rx) = socket.split();

    let end = loop {
        tokio::select! {
            msg = ws_rx.next() => {
                match msg {
                    Some(Ok(Message::Close(frame))) => {
                        break SessionEnd::PeerClosed(frame.map(|f| f.code));
                    }
                    Some(Ok(message)) => {
                        let Some(payload) = payload_text(&message) else {
                            continue;
                        };
                        tracing::info!(connection = %id, payload = %payload, "message received");
                        if let Err(e) = ws_tx.send(Message::text(echo_text(&payload))).await {
                            break SessionEnd::Failed(e.into());
                        }
                    }
                    Some(Err(e)) => break SessionEnd::Failed(e.into()),
                    None => break SessionEnd::PeerGone,
                }
            }
            () = shutdown.wait() => {
                let frame = CloseFrame {
                    code: close_code::AWAY,
                    reason: Utf8Bytes::from_static("server shutting down"),
                };
                if let Err(e) = ws_tx.send(Message::Close(Some(frame))).await {
                    tracing::debug!(connection = %id, error = %e, "close frame not delivered");
                }
                break SessionEnd::Shutdown;
            }
        }
    };

    // Flushes any pending close reply; errors mean the peer is already gone.
    let _ = tokio::time::timeout(CLOSE_TIMEOUT, ws_tx.close()).await;

    let duration_ms = registry
        .release(id)
        .await
        .map(|entry| entry.age_ms())
        .unwrap_or_default();

    match end {
        SessionEnd::Failed(err) => {
            tracing::warn!(connection = %id, error = %err, duration_ms, "connection dropped");
        }
        reason => {
            tracing::info!(connection = %id, %reason, duration_ms, "client disconnected");
        }
    }
}
