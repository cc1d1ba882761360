//! Authentication and authorization middleware.
//!
//! `require_auth` verifies the bearer token and stores the [`Claims`] in
//! request extensions. `require_permission` runs after it on individual
//! routes and checks the claims for one permission string.

use crate::auth::{Claims, JwtValidator};
use crate::errors::{ApiError, AuthError};
use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tracing::instrument;

/// State for the authentication middleware.
#[derive(Clone)]
pub struct AuthState {
    pub jwt_validator: Arc<JwtValidator>,
}

/// Authentication middleware that validates JWT tokens.
///
/// # Authorization Header Format
///
/// ```text
/// Authorization: Bearer <token>
/// ```
///
/// The scheme is matched case-insensitively.
#[instrument(skip_all, name = "ca.middleware.auth")]
pub async fn require_auth(
    State(state): State<Arc<AuthState>>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = bearer_token(req.headers())?;

    let claims = state.jwt_validator.validate(token).await?;

    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}

/// State for one route's permission gate.
#[derive(Debug, Clone, Copy)]
pub struct PermissionGate {
    pub permission: &'static str,

    /// Status answered on failure (401 or 403).
    pub denied_status: u16,
}

impl PermissionGate {
    pub fn new(permission: &'static str, denied_status: u16) -> Self {
        Self {
            permission,
            denied_status,
        }
    }
}

/// Permission gate for a single route.
///
/// Apply with `middleware::from_fn_with_state(PermissionGate::new("get:actors", 403), require_permission)`
/// as a route layer inside the authenticated router.
#[instrument(skip_all, name = "ca.middleware.permission")]
pub async fn require_permission(
    State(gate): State<PermissionGate>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let denied = |reason: AuthError| ApiError::Permission {
        reason,
        status: gate.denied_status,
    };

    let claims = req.extensions().get::<Claims>().ok_or_else(|| {
        tracing::error!(target: "ca.middleware.auth", "Permission check without verified claims");
        denied(AuthError::PermissionsMissing)
    })?;

    claims.require_permission(gate.permission).map_err(|e| {
        tracing::debug!(target: "ca.middleware.auth", permission = gate.permission, reason = %e, "Permission check failed");
        denied(e)
    })?;

    Ok(next.run(req).await)
}

/// Extract the token from `Authorization: Bearer <token>`.
fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingHeader)?
        .to_str()
        .map_err(|_| AuthError::Malformed)?;

    let parts: Vec<&str> = value.split_whitespace().collect();
    match parts.as_slice() {
        [scheme, ..] if !scheme.eq_ignore_ascii_case("bearer") => Err(AuthError::InvalidScheme),
        [] => Err(AuthError::InvalidScheme),
        [_] => Err(AuthError::MissingToken),
        [_, token] => Ok(*token),
        _ => Err(AuthError::NotBearerToken),
    }
}
