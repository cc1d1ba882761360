//! Metrics definitions for the Casting Agency service.
//!
//! Naming follows Prometheus conventions:
//! - `ca_` prefix
//! - `_total` suffix for counters
//! - `_seconds` suffix for duration histograms
//!
//! # Cardinality
//!
//! - `method`: HTTP verbs only
//! - `endpoint`: route templates (`/actors/{id}`), unknown paths collapse to `/other`
//! - `status`: success, error, timeout
//! - `operation`: repository operation names, bounded by code
//! - `code`: auth error codes, bounded by `AuthError`

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use std::time::Duration;

/// Install the Prometheus recorder and return the handle served at `/metrics`.
///
/// Must be called once, before any metrics are recorded.
///
/// # Errors
///
/// Returns an error if the recorder cannot be installed (e.g. already installed).
pub fn init_metrics_recorder() -> Result<PrometheusHandle, String> {
    PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Prefix("ca_http_request".to_string()),
            &[
                0.005, 0.010, 0.025, 0.050, 0.100, 0.150, 0.200, 0.300, 0.500, 1.000, 2.000,
            ],
        )
        .map_err(|e| format!("Failed to set HTTP request buckets: {e}"))?
        .set_buckets_for_metric(
            Matcher::Prefix("ca_db_query".to_string()),
            &[
                0.001, 0.002, 0.005, 0.010, 0.020, 0.050, 0.100, 0.250, 0.500, 1.000,
            ],
        )
        .map_err(|e| format!("Failed to set DB query buckets: {e}"))?
        .install_recorder()
        .map_err(|e| format!("Failed to install Prometheus recorder: {e}"))
}

// ============================================================================
// HTTP Request Metrics
// ============================================================================

/// Record HTTP request completion.
///
/// Metric: `ca_http_requests_total`, `ca_http_request_duration_seconds`
pub fn record_http_request(method: &str, endpoint: &str, status_code: u16, duration: Duration) {
    let normalized_endpoint = normalize_endpoint(endpoint);
    let status = categorize_status_code(status_code);

    histogram!("ca_http_request_duration_seconds",
        "method" => method.to_string(),
        "endpoint" => normalized_endpoint,
        "status" => status
    )
    .record(duration.as_secs_f64());

    counter!("ca_http_requests_total",
        "method" => method.to_string(),
        "endpoint" => normalized_endpoint,
        "status_code" => status_code.to_string()
    )
    .increment(1);
}

fn categorize_status_code(status_code: u16) -> &'static str {
    match status_code {
        200..=299 => "success",
        408 | 504 => "timeout",
        _ => "error",
    }
}

/// Map a request path onto its route template.
fn normalize_endpoint(path: &str) -> &'static str {
    let mut segments = path.trim_end_matches('/').split('/').skip(1);
    match (segments.next(), segments.next(), segments.next()) {
        (Some("health"), None, None) => "/health",
        (Some("metrics"), None, None) => "/metrics",
        (Some("actors"), None, None) => "/actors",
        (Some("actors"), Some(_), None) => "/actors/{id}",
        (Some("movies"), None, None) => "/movies",
        (Some("movies"), Some(_), None) => "/movies/{id}",
        _ => "/other",
    }
}

// ============================================================================
// Auth Metrics
// ============================================================================

/// Record a rejected request.
///
/// Metric: `ca_auth_failures_total`
/// Labels: `code` (auth error code, e.g. `token_expired`, `unauthorized`)
pub fn record_auth_failure(code: &'static str) {
    counter!("ca_auth_failures_total", "code" => code).increment(1);
}

// ============================================================================
// Database Metrics
// ============================================================================

/// Record a repository operation.
///
/// Metric: `ca_db_query_duration_seconds`, `ca_db_queries_total`
/// Labels: `operation`, `status`
pub fn record_db_query(operation: &'static str, status: &'static str, duration: Duration) {
    histogram!("ca_db_query_duration_seconds",
        "operation" => operation,
        "status" => status
    )
    .record(duration.as_secs_f64());

    counter!("ca_db_queries_total",
        "operation" => operation,
        "status" => status
    )
    .increment(1);
}
