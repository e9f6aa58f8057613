//! Axum WebSocket upgrade handler.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::ws::WebSocketUpgrade;
use axum::extract::ws::rejection::WebSocketUpgradeRejection;
use axum::extract::{ConnectInfo, State};
use axum::response::{IntoResponse, Response};

use super::connection::run_connection;
use crate::app_state::AppState;
use crate::error::RelayError;

/// Upgrades any request path to a WebSocket echo session.
///
/// Every successful handshake is admitted. A failed handshake, whether
/// rejected before the `101` response or failing afterwards, is logged and
/// discarded without affecting other connections.
pub async fn ws_handler(
    ws: Result<WebSocketUpgrade, WebSocketUpgradeRejection>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    State(state): State<AppState>,
) -> Response {
    let ws = match ws {
        Ok(ws) => ws,
        Err(rejection) => {
            let err = RelayError::Handshake(rejection.body_text());
            tracing::warn!(%peer, error = %err, "rejected connection attempt");
            return rejection.into_response();
        }
    };

    let registry = Arc::clone(&state.registry);
    let shutdown = state.shutdown.subscribe();

    ws.on_failed_upgrade(move |e: axum::Error| {
        let err = RelayError::Handshake(e.to_string());
        tracing::warn!(%peer, error = %err, "websocket upgrade failed");
    })
    .on_upgrade(move |socket| run_connection(socket, peer, registry, shutdown))
}
