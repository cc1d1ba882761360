//! HTTP routes for the Casting Agency.
//!
//! Defines the Axum router and application state.

use crate::auth::{JwksClient, JwtValidator};
use crate::config::Config;
use crate::handlers;
use crate::middleware::{
    http_metrics_middleware, json_error_envelope, require_auth, require_integer_id,
    require_permission, AuthState, PermissionGate,
};
use axum::{
    http::HeaderValue,
    middleware,
    routing::{delete, get, patch, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: PgPool,

    /// Service configuration.
    pub config: Config,
}

/// Build the application routes.
///
/// Creates an Axum router with:
/// - `/health` - Database ping, public
/// - `/metrics` - Prometheus metrics, public
/// - `/actors`, `/actors/:id`, `/movies`, `/movies/:id` - bearer token plus
///   a per-route permission
/// - JSON 404 for unmatched paths and non-integer ids
/// - JSON 405 and 408 envelopes
/// - CORS, request tracing, HTTP metrics and a 30 second timeout
pub fn build_routes(state: Arc<AppState>, metrics_handle: PrometheusHandle) -> Router {
    let jwks_client = Arc::new(JwksClient::with_ttl(
        state.config.jwks_url.clone(),
        state.config.jwks_cache_ttl,
    ));
    let jwt_validator = Arc::new(JwtValidator::new(
        jwks_client,
        state.config.jwt_issuer.clone(),
        state.config.jwt_audience.clone(),
        state.config.jwt_clock_skew,
    ));
    let auth_state = Arc::new(AuthState { jwt_validator });

    let cors = cors_layer(&state.config.cors_allowed_origins);
    let denied_status = state.config.permission_denied_status;
    let gate = |permission: &'static str| {
        middleware::from_fn_with_state(
            PermissionGate::new(permission, denied_status),
            require_permission,
        )
    };

    // Public routes (no authentication required)
    let public_routes = Router::new()
        .route("/health", get(handlers::health_check))
        .with_state(state.clone());

    let metrics_routes = Router::new()
        .route("/metrics", get(handlers::metrics_handler))
        .with_state(metrics_handle);

    // Protected routes: id guard, then require_auth, then the route's permission gate
    let protected_routes = Router::new()
        .route(
            "/actors",
            get(handlers::list_actors)
                .route_layer(gate("get:actors"))
                .merge(post(handlers::create_actor).route_layer(gate("post:actors"))),
        )
        .route(
            "/actors/:id",
            patch(handlers::update_actor)
                .route_layer(gate("update:actors"))
                .merge(delete(handlers::delete_actor).route_layer(gate("delete:actors"))),
        )
        .route(
            "/movies",
            get(handlers::list_movies)
                .route_layer(gate("get:movies"))
                .merge(post(handlers::create_movie).route_layer(gate("post:movies"))),
        )
        .route(
            "/movies/:id",
            patch(handlers::update_movie)
                .route_layer(gate("update:movies"))
                .merge(delete(handlers::delete_movie).route_layer(gate("delete:movies"))),
        )
        .route_layer(middleware::from_fn_with_state(auth_state, require_auth))
        .route_layer(middleware::from_fn(require_integer_id))
        .with_state(state);

    // Layer order (bottom-to-top execution):
    // 1. TraceLayer - Log request details (innermost)
    // 2. TimeoutLayer - Timeout the request
    // 3. json_error_envelope - JSON bodies for bare 405/408
    // 4. CorsLayer - Answer preflights before auth
    // 5. http_metrics_middleware - Record ALL responses (outermost)
    public_routes
        .merge(metrics_routes)
        .merge(protected_routes)
        .fallback(handlers::not_found)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
        .layer(middleware::from_fn(json_error_envelope))
        .layer(cors)
        .layer(middleware::from_fn(http_metrics_middleware))
}

/// Any origin when `allowed_origins` is empty, otherwise exactly the list.
fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origin = if allowed_origins.is_empty() {
        AllowOrigin::from(Any)
    } else {
        let origins: Vec<HeaderValue> = allowed_origins
            .iter()
            .filter_map(|origin| match origin.parse::<HeaderValue>() {
                Ok(value) => Some(value),
                Err(e) => {
                    tracing::warn!(target: "ca.routes", origin = %origin, error = %e, "Ignoring invalid CORS origin");
                    None
                }
            })
            .collect();
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(Any)
        .allow_headers(Any)
}
