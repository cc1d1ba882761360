//! Observability for the Casting Agency service.
//!
//! Prometheus metrics definitions and recorder setup. Request logging is
//! handled by `tower_http::trace::TraceLayer` and `#[instrument]` spans.

pub mod metrics;
