//! Listener: binds the port and serves WebSocket upgrades until shutdown.
//!
//! [`RelayServer`] is the explicitly constructed, process-wide server
//! value. It owns the listening socket and the [`AppState`] shared with
//! every connection handler.
//!
//! # Lifecycle
//!
//! 1. [`RelayServer::bind`] binds the port; failure is fatal.
//! 2. [`RelayServer::run_until`] accepts connections and spawns one echo
//!    task per successful handshake.
//! 3. When the shutdown future resolves, accepting stops, every handler is
//!    told to close, and the server waits up to [`SHUTDOWN_GRACE`] for the
//!    registry to drain.

use std::future::Future;
use std::net::SocketAddr;
use std::time::Duration;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::api;
use crate::app_state::AppState;
use crate::config::RelayConfig;
use crate::error::RelayError;
use crate::ws::handler::ws_handler;

/// How long shutdown waits for open connections to finish closing.
pub const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

/// A bound relay server that has not started accepting yet.
#[derive(Debug)]
pub struct RelayServer {
    listener: TcpListener,
    local_addr: SocketAddr,
    state: AppState,
}

impl RelayServer {
    /// Binds the listening socket described by `config`.
    ///
    /// Port `0` binds an OS-assigned port; see [`Self::local_addr`].
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::Bind`] if the address is in use or cannot be
    /// bound with the current permissions.
    pub async fn bind(config: &RelayConfig) -> Result<Self, RelayError> {
        let addr = config.listen_addr();
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| RelayError::Bind { addr, source })?;
        let local_addr = listener
            .local_addr()
            .map_err(|source| RelayError::Bind { addr, source })?;

        tracing::debug!(addr = %local_addr, "listener bound");

        Ok(Self {
            listener,
            local_addr,
            state: AppState::new(),
        })
    }

    /// Returns the address actually bound.
    #[must_use]
    pub const fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Returns the shared state handed to connection handlers.
    #[must_use]
    pub const fn state(&self) -> &AppState {
        &self.state
    }

    /// Serves until Ctrl-C or SIGTERM.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::Serve`] if the accept loop fails.
    pub async fn run(self) -> Result<(), RelayError> {
        self.run_until(shutdown_signal()).await
    }

    /// Serves until `signal` resolves, then closes every open connection.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::Serve`] if the accept loop fails.
    pub async fn run_until<F>(self, signal: F) -> Result<(), RelayError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let Self {
            listener,
            local_addr,
            state,
        } = self;

        let app = router(state.clone());
        let shutdown = state.shutdown.clone();

        tracing::info!(addr = %local_addr, port = local_addr.port(), "listening");

        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(async move {
            signal.await;
            shutdown.trigger();
        })
        .await
        .map_err(RelayError::Serve)?;

        state.shutdown.trigger();

        let open = state.registry.len().await;
        if open > 0 {
            tracing::info!(open, "closing active connections");
        }
        if tokio::time::timeout(SHUTDOWN_GRACE, state.registry.wait_until_empty())
            .await
            .is_err()
        {
            let remaining = state.registry.len().await;
            tracing::warn!(remaining, "shutdown grace period elapsed");
        }

        tracing::info!("server stopped");
        Ok(())
    }
}

/// Builds the full application router.
///
/// `/health` is served as plain HTTP; every other path is a WebSocket
/// upgrade endpoint.
pub fn router(state: AppState) -> Router {
    api::build_router()
        .fallback(ws_handler)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Resolves on Ctrl-C, or SIGTERM on Unix.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }

    tracing::info!("shutdown signal received");
}
