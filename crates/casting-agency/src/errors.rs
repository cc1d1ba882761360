//! Casting Agency error types.
//!
//! Every failure leaves the service as a JSON envelope:
//!
//! ```json
//! { "success": false, "error": 422, "message": "Name of actor not provided" }
//! ```
//!
//! Persistence and database failures return fixed messages; the underlying
//! cause is logged server-side only.

use crate::observability::metrics::record_auth_failure;
use crate::repositories::StoreError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Message used when a 422 carries no specific description.
pub const DEFAULT_UNPROCESSABLE_MESSAGE: &str = "Unprocessable";

/// Message used when a 404 carries no specific description.
pub const DEFAULT_NOT_FOUND_MESSAGE: &str = "resource not found";

/// Authentication and authorization failures.
///
/// `Display` is the description returned to the client. Verifier failures
/// map to 401, permission gate failures to 403.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("Authorization header is expected")]
    MissingHeader,

    #[error("Authorization header must start with \"Bearer\"")]
    InvalidScheme,

    #[error("Token not found")]
    MissingToken,

    #[error("Authorization header must be bearer token")]
    NotBearerToken,

    #[error("Authorization malformed")]
    Malformed,

    #[error("Unable to find the appropriate key")]
    UnknownKey,

    #[error("Token expired")]
    Expired,

    #[error("Incorrect claims. Please, check the audience and issuer")]
    InvalidClaims,

    #[error("Unable to parse authentication token")]
    InvalidToken,

    #[error("Permissions not included in JWT")]
    PermissionsMissing,

    #[error("Permission not found")]
    PermissionDenied,
}

impl AuthError {
    /// HTTP status code for this failure.
    pub fn status_code(&self) -> u16 {
        match self {
            AuthError::PermissionsMissing | AuthError::PermissionDenied => 403,
            _ => 401,
        }
    }

    /// Machine-readable error code, also used as the metrics label.
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::MissingHeader => "authorization_header_missing",
            AuthError::InvalidScheme
            | AuthError::MissingToken
            | AuthError::NotBearerToken
            | AuthError::Malformed
            | AuthError::UnknownKey
            | AuthError::InvalidToken => "invalid_header",
            AuthError::Expired => "token_expired",
            AuthError::InvalidClaims | AuthError::PermissionsMissing => "invalid_claims",
            AuthError::PermissionDenied => "unauthorized",
        }
    }
}

/// Casting Agency error type.
///
/// Maps to HTTP status codes:
/// - Unprocessable, Persistence: 422
/// - NotFound: 404
/// - Auth: 401 or 403
/// - Permission: 401 or 403, as configured
/// - MethodNotAllowed: 405
/// - Timeout: 408
/// - Database: 500
/// - ServiceUnavailable: 503
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Unprocessable: {}", .0.as_deref().unwrap_or(DEFAULT_UNPROCESSABLE_MESSAGE))]
    Unprocessable(Option<String>),

    #[error("Not found: {}", .0.as_deref().unwrap_or(DEFAULT_NOT_FOUND_MESSAGE))]
    NotFound(Option<String>),

    /// A mutation failed and its transaction was rolled back.
    #[error("{message}")]
    Persistence {
        message: &'static str,
        #[source]
        source: StoreError,
    },

    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Permission gate failure, answered with the configured status.
    #[error("{reason}")]
    Permission { reason: AuthError, status: u16 },

    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Request timed out")]
    Timeout,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl ApiError {
    /// 422 with a specific message.
    pub fn unprocessable(message: impl Into<String>) -> Self {
        ApiError::Unprocessable(Some(message.into()))
    }

    /// 404 with a specific message.
    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(Some(message.into()))
    }

    /// Returns the HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::Unprocessable(_) | ApiError::Persistence { .. } => 422,
            ApiError::NotFound(_) => 404,
            ApiError::Auth(err) => err.status_code(),
            ApiError::Permission { status, .. } => *status,
            ApiError::MethodNotAllowed => 405,
            ApiError::Timeout => 408,
            ApiError::Database(_) => 500,
            ApiError::ServiceUnavailable(_) => 503,
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    success: bool,
    error: u16,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<&'static str>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status_code = self.status_code();
        let (message, code) = match &self {
            ApiError::Unprocessable(message) => (
                message
                    .clone()
                    .unwrap_or_else(|| DEFAULT_UNPROCESSABLE_MESSAGE.to_string()),
                None,
            ),
            ApiError::NotFound(message) => (
                message
                    .clone()
                    .unwrap_or_else(|| DEFAULT_NOT_FOUND_MESSAGE.to_string()),
                None,
            ),
            ApiError::Persistence { message, source } => {
                tracing::warn!(
                    target: "ca.database",
                    error = %source,
                    kind = source.kind(),
                    "Mutation rolled back"
                );
                ((*message).to_string(), None)
            }
            ApiError::Auth(err) => {
                tracing::debug!(target: "ca.auth", code = err.code(), reason = %err, "Request rejected");
                record_auth_failure(err.code());
                (err.to_string(), Some(err.code()))
            }
            ApiError::Permission { reason, .. } => {
                tracing::debug!(target: "ca.auth", code = reason.code(), reason = %reason, "Request rejected");
                record_auth_failure(reason.code());
                (reason.to_string(), Some(reason.code()))
            }
            ApiError::MethodNotAllowed => ("method not allowed".to_string(), None),
            ApiError::Timeout => {
                tracing::warn!(target: "ca.http", "Request timed out");
                ("request timed out".to_string(), None)
            }
            ApiError::Database(err) => {
                tracing::error!(target: "ca.database", error = %err, "Database operation failed");
                ("internal server error".to_string(), None)
            }
            ApiError::ServiceUnavailable(reason) => {
                tracing::warn!(target: "ca.availability", reason = %reason, "Service unavailable");
                ("Authentication service unavailable".to_string(), Some("jwks_unavailable"))
            }
        };

        let status =
            StatusCode::from_u16(status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = ErrorResponse {
            success: false,
            error: status_code,
            message,
            code,
        };

        let mut response = (status, Json(body)).into_response();

        if status == StatusCode::UNAUTHORIZED {
            if let Ok(header_value) =
                "Bearer realm=\"casting-agency\", error=\"invalid_token\"".parse()
            {
                response
                    .headers_mut()
                    .insert("WWW-Authenticate", header_value);
            }
        }

        response
    }
}

/// Read paths (list, lookup) surface store failures as 500s.
impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        ApiError::Database(err.to_string())
    }
}
