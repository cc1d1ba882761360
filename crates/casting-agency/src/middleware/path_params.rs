//! Integer id guard for `/:id` routes.
//!
//! Runs ahead of authentication so that `/actors/abc` is a 404 whether or
//! not the caller sent a token.

use crate::errors::ApiError;
use axum::{
    extract::{RawPathParams, Request},
    middleware::Next,
    response::Response,
};

/// Reject any `id` path parameter that is not an `i32` with 404.
pub async fn require_integer_id(
    params: Option<RawPathParams>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if let Some(params) = &params {
        for (key, value) in params {
            if key == "id" && value.parse::<i32>().is_err() {
                tracing::debug!(target: "ca.middleware.path", "Non-integer id in path");
                return Err(ApiError::NotFound(None));
            }
        }
    }

    Ok(next.run(request).await)
}
