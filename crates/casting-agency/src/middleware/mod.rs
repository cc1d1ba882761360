//! Middleware for the Casting Agency.
//!
//! # Components
//!
//! - `auth` - Token verification and per-route permission checks
//! - `error_envelope` - JSON bodies for framework 405 and 408 responses
//! - `http_metrics` - HTTP request metrics
//! - `path_params` - Integer id guard ahead of authentication

pub mod auth;
pub mod error_envelope;
pub mod http_metrics;
pub mod path_params;

pub use auth::{require_auth, require_permission, AuthState, PermissionGate};
pub use error_envelope::json_error_envelope;
pub use http_metrics::http_metrics_middleware;
pub use path_params::require_integer_id;
