//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::domain::{ConnectionRegistry, ShutdownSignal};

/// Lifecycle state of the running server, available to handlers via
/// Axum's `State` extractor.
///
/// Carries nothing that affects message content: the echo of a message
/// depends only on that message.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    /// Set of currently active connections.
    pub registry: Arc<ConnectionRegistry>,
    /// Fired once when the server begins shutting down.
    pub shutdown: ShutdownSignal,
}

impl AppState {
    /// Creates state with an empty registry and an untriggered signal.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}
