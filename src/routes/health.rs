//! Health check endpoint for container orchestration.
//!
//! Unlike a bare liveness probe, this round-trips to the quote store, so a
//! service that cannot reach its database reports itself unhealthy.

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use tracing::instrument;

use crate::config::HEALTH_REASON_DB_FAILED;
use crate::selection::with_timeout;
use crate::state::{AppState, Backend};

#[derive(Debug, Serialize)]
pub struct HealthReport {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl HealthReport {
    fn ok() -> Self {
        Self {
            status: "ok",
            reason: None,
        }
    }

    fn unhealthy(reason: impl Into<String>) -> Self {
        Self {
            status: "unhealthy",
            reason: Some(reason.into()),
        }
    }
}

/// Health check handler.
///
/// Returns 200 `{"status":"ok"}` when `SELECT 1` succeeds within the query timeout,
/// otherwise 500 with a fixed reason. Store errors are logged, never returned.
#[instrument(name = "health::check", skip(state))]
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthReport>) {
    let store = match &state.backend {
        Backend::Ready(store) => store,
        Backend::Unconfigured(reason) => {
            tracing::error!(%reason, "Health check failed");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(HealthReport::unhealthy(reason.to_string())),
            );
        }
    };

    let limit = state.config.database.query_timeout();
    match with_timeout(limit, store.ping()).await {
        Ok(()) => (StatusCode::OK, Json(HealthReport::ok())),
        Err(e) => {
            tracing::error!(error = %e, "Health check failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(HealthReport::unhealthy(HEALTH_REASON_DB_FAILED)),
            )
        }
    }
}
