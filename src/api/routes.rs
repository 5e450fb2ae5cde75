//! API Routes
//!
//! Configures the Axum router with all proxy endpoints.

use axum::{routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    advisories_handler, health_handler, method_not_allowed_handler,
    registry_handler, registry_missing_name_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /advisories` - Cached advisory list
/// - `GET /registry/*name` - Cached package metadata (scoped names included)
/// - `GET /health` - Health check endpoint
///
/// Other methods on the proxy routes, HEAD included, get `405` with `Allow: GET`.
///
/// # Middleware
/// - CORS: Allows any origin, the API is read-only
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    // Configure CORS middleware
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build router with all endpoints. HEAD is refused explicitly, since
    // `get` would otherwise answer it too
    Router::new()
        .route(
            "/advisories",
            get(advisories_handler)
                .head(method_not_allowed_handler)
                .fallback(method_not_allowed_handler),
        )
        .route(
            "/registry",
            get(registry_missing_name_handler)
                .head(method_not_allowed_handler)
                .fallback(method_not_allowed_handler),
        )
        // The wildcard below does not match an empty tail
        .route(
            "/registry/",
            get(registry_missing_name_handler)
                .head(method_not_allowed_handler)
                .fallback(method_not_allowed_handler),
        )
        .route(
            "/registry/*name",
            get(registry_handler)
                .head(method_not_allowed_handler)
                .fallback(method_not_allowed_handler),
        )
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryCache;
    use crate::config::Config;
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
    };
    use serde_json::Value;
    use std::sync::Arc;
    use tower::util::ServiceExt;

    async fn body_to_json(body: Body) -> Value {
        let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn create_test_app() -> Router {
        let state = AppState::new(
            &Config::default(),
            Arc::new(MemoryCache::new()),
            reqwest::Client::new(),
        );
        create_router(state)
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let app = create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_advisories_post_not_allowed() {
        let app = create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/advisories?package=lodash")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.headers()[header::ALLOW], "GET");
    }

    #[tokio::test]
    async fn test_registry_delete_not_allowed() {
        let app = create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri("/registry/react")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.headers()[header::ALLOW], "GET");
    }

    #[tokio::test]
    async fn test_advisories_head_not_allowed() {
        let app = create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .method("HEAD")
                    .uri("/advisories?package=lodash")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.headers()[header::ALLOW], "GET");
    }

    #[tokio::test]
    async fn test_registry_trailing_slash_is_bad_request() {
        let app = create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/registry/")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_to_json(response.into_body()).await;
        assert_eq!(json["error"], "Package name is required");
    }

    #[tokio::test]
    async fn test_registry_blank_name_is_bad_request() {
        let app = create_test_app();

        // Rejected before any upstream call; the default registry is never contacted
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/registry/%20%20")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_to_json(response.into_body()).await;
        assert_eq!(json["error"], "Package name is required");
    }

    #[tokio::test]
    async fn test_registry_without_name() {
        let app = create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/registry")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
