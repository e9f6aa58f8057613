//! Relay error types.
//!
//! [`RelayError`] is the central error type for the relay. Only startup
//! failures are fatal; handshake and connection errors stay contained
//! at the connection they originate from and are never echoed back over
//! the wire.

use std::net::SocketAddr;

/// Server-side error enum.
///
/// # Propagation
///
/// | Variant      | Scope          | Handling                          |
/// |--------------|----------------|-----------------------------------|
/// | `Bind`       | Process        | Logged, process exits non-zero    |
/// | `Config`     | Process        | Logged, process exits non-zero    |
/// | `Serve`      | Process        | Logged, process exits non-zero    |
/// | `Handshake`  | Single attempt | Logged, attempt discarded         |
/// | `Connection` | Single session | Logged, connection released       |
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    /// The listening address could not be bound (port in use, no permission).
    #[error("failed to bind {addr}: {source}")]
    Bind {
        /// Address the server attempted to bind.
        addr: SocketAddr,
        /// Underlying OS error.
        #[source]
        source: std::io::Error,
    },

    /// Invalid configuration value.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// The accept loop itself failed after a successful bind.
    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),

    /// A single inbound connection attempt failed the WebSocket upgrade.
    #[error("websocket handshake failed: {0}")]
    Handshake(String),

    /// I/O failure on an established WebSocket connection.
    #[error("connection error: {0}")]
    Connection(#[from] axum::Error),
}

impl RelayError {
    /// Returns `true` if this error must terminate the process.
    ///
    /// Handshake and connection errors are resolved at the connection
    /// they originate from and never cross the connection boundary.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        match self {
            Self::Bind { .. } | Self::Config(_) | Self::Serve(_) => true,
            Self::Handshake(_) | Self::Connection(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::net::{Ipv4Addr, SocketAddr};

    use super::*;

    #[test]
    fn bind_error_is_fatal_and_names_address() {
        let addr = SocketAddr::from((Ipv4Addr::LOCALHOST, 8080));
        let err = RelayError::Bind {
            addr,
            source: io::Error::from(io::ErrorKind::AddrInUse),
        };
        assert!(err.is_fatal());
        assert!(err.to_string().contains("127.0.0.1:8080"));
    }

    #[test]
    fn config_and_serve_errors_are_fatal() {
        assert!(RelayError::Config("bad port".to_string()).is_fatal());
        assert!(RelayError::Serve(io::Error::other("accept failed")).is_fatal());
    }

    #[test]
    fn per_connection_errors_are_contained() {
        assert!(!RelayError::Handshake("missing upgrade header".to_string()).is_fatal());
        let err = RelayError::from(axum::Error::new(io::Error::from(
            io::ErrorKind::ConnectionReset,
        )));
        assert!(!err.is_fatal());
        assert!(err.to_string().starts_with("connection error"));
    }
}
