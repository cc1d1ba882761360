//! HTTP metrics middleware.
//!
//! Applied as the outermost layer so that framework-level responses (404,
//! 405, timeouts) are recorded along with handler responses.

use axum::{extract::Request, middleware::Next, response::Response};
use std::time::Instant;

use crate::observability::metrics::record_http_request;

/// Record method, normalized path, status and duration for every request.
pub async fn http_metrics_middleware(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();
    let path = request.uri().path().to_string();

    let response = next.run(request).await;

    record_http_request(&method, &path, response.status().as_u16(), start.elapsed());

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request as HttpRequest, StatusCode},
        middleware,
        routing::get,
        Router,
    };
    use tower::ServiceExt;

    fn test_app() -> Router {
        Router::new()
            .route("/actors", get(|| async { "OK" }))
            .route(
                "/movies",
                get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "Error") }),
            )
            .layer(middleware::from_fn(http_metrics_middleware))
    }

    async fn status_of(uri: &str) -> StatusCode {
        let request = HttpRequest::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .expect("request builder should succeed");

        test_app()
            .oneshot(request)
            .await
            .expect("request should succeed")
            .status()
    }

    #[tokio::test]
    async fn test_middleware_passes_responses_through() {
        assert_eq!(status_of("/actors").await, StatusCode::OK);
        assert_eq!(status_of("/movies").await, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(status_of("/directors").await, StatusCode::NOT_FOUND);
    }
}
