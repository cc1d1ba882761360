//! Prometheus metrics endpoint handler.
//!
//! Unauthenticated. Labels are bounded (see `observability::metrics`) and
//! carry no record contents or token data.

use axum::{extract::State, response::IntoResponse};
use metrics_exporter_prometheus::PrometheusHandle;

/// Handler for GET /metrics
#[tracing::instrument(skip_all, name = "ca.metrics.scrape")]
pub async fn metrics_handler(State(handle): State<PrometheusHandle>) -> impl IntoResponse {
    handle.render()
}
