//! HTTP request handlers for the Casting Agency.

pub mod actors;
pub mod health;
pub mod metrics;
pub mod movies;

pub use actors::{create_actor, delete_actor, list_actors, update_actor};
pub use health::health_check;
pub use metrics::metrics_handler;
pub use movies::{create_movie, delete_movie, list_movies, update_movie};

use crate::errors::ApiError;
use axum::body::Bytes;
use axum::extract::{rejection::PathRejection, Path};
use serde::de::DeserializeOwned;

/// Fallback for unmatched routes.
pub async fn not_found() -> ApiError {
    ApiError::NotFound(None)
}

/// Decode a JSON request body.
///
/// Bodies are decoded by hand rather than through the `Json` extractor so
/// that record lookups can run first, and so every decode failure is a 422
/// with the default message.
fn parse_body<T: DeserializeOwned>(body: &Bytes) -> Result<T, ApiError> {
    serde_json::from_slice(body).map_err(|e| {
        tracing::debug!(target: "ca.handlers", error = %e, "Invalid request body");
        ApiError::Unprocessable(None)
    })
}

/// Record id from the path; a non-integer id is an unknown resource.
fn path_id(path: Result<Path<i32>, PathRejection>) -> Result<i32, ApiError> {
    path.map(|Path(id)| id).map_err(|e| {
        tracing::debug!(target: "ca.handlers", error = %e, "Invalid path id");
        ApiError::NotFound(None)
    })
}
