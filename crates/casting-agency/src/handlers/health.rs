//! Health check handler.

use crate::models::HealthResponse;
use crate::routes::AppState;
use axum::extract::State;
use axum::Json;
use std::sync::Arc;
use tracing::instrument;

/// Health check handler.
///
/// Pings the database. Always answers 200 so that probes can read the body:
///
/// ```json
/// { "status": "healthy", "database": "healthy" }
/// ```
#[instrument(skip_all, name = "ca.health.check")]
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let db_healthy = sqlx::query("SELECT 1")
        .fetch_one(&state.pool)
        .await
        .map_err(|e| {
            tracing::warn!(target: "ca.health", error = %e, "Database ping failed");
        })
        .is_ok();

    let status = if db_healthy { "healthy" } else { "unhealthy" };

    Json(HealthResponse {
        status: status.to_string(),
        database: status.to_string(),
    })
}
