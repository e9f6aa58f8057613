//! System endpoints: health check.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde::Serialize;

use crate::app_state::AppState;
use crate::domain::ConnectionEntry;

/// Health check response.
#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    timestamp: String,
    version: &'static str,
    active_connections: usize,
    connections: Vec<ConnectionEntry>,
}

/// `GET /health`: service status and the currently active connections.
pub async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    let status = if state.shutdown.is_triggered() {
        "shutting_down"
    } else {
        "healthy"
    };
    let connections = state.registry.snapshot().await;
    (
        StatusCode::OK,
        Json(HealthResponse {
            status,
            timestamp: Utc::now().to_rfc3339(),
            version: env!("CARGO_PKG_VERSION"),
            active_connections: connections.len(),
            connections,
        }),
    )
}

/// System routes mounted at the root level.
pub fn routes() -> Router<AppState> {
    Router::new().route("/health", get(health_handler))
}
