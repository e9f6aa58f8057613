//! HTTP surface outside the WebSocket upgrade.

pub mod system;

use axum::Router;

use crate::app_state::AppState;

/// Builds the router for plain HTTP endpoints.
pub fn build_router() -> Router<AppState> {
    Router::new().merge(system::routes())
}
