//! JSON envelope for framework-generated error responses.
//!
//! axum answers an unsupported method with a bare 405 and the timeout
//! layer answers with a bare 408. Both are rewritten into the same
//! `{"success": false, ...}` body the handlers produce. Responses that
//! already carry a content type are left alone.

use crate::errors::ApiError;
use axum::{
    extract::Request,
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};

/// Wrap bodiless 405 and 408 responses in the error envelope.
pub async fn json_error_envelope(request: Request, next: Next) -> Response {
    let response = next.run(request).await;

    if response.headers().contains_key(header::CONTENT_TYPE) {
        return response;
    }

    match response.status() {
        StatusCode::METHOD_NOT_ALLOWED => {
            let mut rewritten = ApiError::MethodNotAllowed.into_response();
            if let Some(allow) = response.headers().get(header::ALLOW) {
                rewritten.headers_mut().insert(header::ALLOW, allow.clone());
            }
            rewritten
        }
        StatusCode::REQUEST_TIMEOUT => ApiError::Timeout.into_response(),
        _ => response,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use axum::{body::Body, middleware, routing::get, Router};
    use http_body_util::BodyExt;
    use std::time::Duration;
    use tower::ServiceExt;
    use tower_http::timeout::TimeoutLayer;

    async fn send(app: Router, method: &str, uri: &str) -> (Response, serde_json::Value) {
        let response = app
            .oneshot(
                axum::http::Request::builder()
                    .method(method)
                    .uri(uri)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let (parts, body) = response.into_parts();
        let bytes = body.collect().await.unwrap().to_bytes();
        let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (Response::from_parts(parts, Body::empty()), json)
    }

    #[tokio::test]
    async fn test_method_not_allowed_gets_envelope() {
        let app = Router::new()
            .route("/actors", get(|| async { "ok" }))
            .layer(middleware::from_fn(json_error_envelope));

        let (response, body) = send(app, "PUT", "/actors").await;

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert!(response.headers().get(header::ALLOW).is_some());
        assert_eq!(
            body,
            serde_json::json!({"success": false, "error": 405, "message": "method not allowed"})
        );
    }

    #[tokio::test]
    async fn test_timeout_gets_envelope() {
        let app = Router::new()
            .route(
                "/slow",
                get(|| async {
                    tokio::time::sleep(Duration::from_secs(5)).await;
                    "late"
                }),
            )
            .layer(TimeoutLayer::new(Duration::from_millis(20)))
            .layer(middleware::from_fn(json_error_envelope));

        let (response, body) = send(app, "GET", "/slow").await;

        assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], 408);
        assert_eq!(body["message"], "request timed out");
    }

    #[tokio::test]
    async fn test_handler_responses_pass_through() {
        let app = Router::new()
            .route(
                "/gone",
                get(|| async { ApiError::not_found("Actor ID requested not found in the database") }),
            )
            .layer(middleware::from_fn(json_error_envelope));

        let (response, body) = send(app, "GET", "/gone").await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Actor ID requested not found in the database");
    }
}
