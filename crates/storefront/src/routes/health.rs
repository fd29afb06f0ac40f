//! Health check endpoints.

use axum::{extract::State, http::StatusCode};

use crate::db;
use crate::state::AppState;

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
pub async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Ready once the startup catalog fetch has settled and, when sessions are
/// kept in `PostgreSQL`, the database answers.
pub async fn readiness(State(state): State<AppState>) -> StatusCode {
    if !state.catalog().status().is_settled() {
        return StatusCode::SERVICE_UNAVAILABLE;
    }

    if let Some(pool) = state.pool()
        && let Err(e) = db::ping(pool).await
    {
        tracing::warn!(error = %e, "Readiness check failed: database unreachable");
        return StatusCode::SERVICE_UNAVAILABLE;
    }

    StatusCode::OK
}
