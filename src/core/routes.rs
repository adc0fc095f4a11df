// HTTP routes configuration

use crate::core::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Account endpoints
        .route("/register", post(crate::handlers::account::register_handler))
        .route("/login", post(crate::handlers::account::login_handler))
        .route("/health", get(crate::handlers::health::health_handler))

        // Admin endpoints (require API key)
        .route("/metrics", get(crate::handlers::metrics::metrics_handler))
        .route("/online", get(crate::handlers::online::online_handler))

        .fallback(crate::handlers::fallback::fallback_handler)

        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::state::test_support::create_test_state;
    use crate::models::account::{ErrorResponse, RegisterResponse};
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn json_post(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_register_then_login_over_router() {
        let state = create_test_state();
        let app = build_router(Arc::clone(&state));

        let response = app
            .clone()
            .oneshot(json_post(
                "/register",
                r#"{"nickname":"alice","school":"mit","password":"secret"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let registered: RegisterResponse = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(registered.user_id, 0);

        let response = app
            .oneshot(json_post("/login", r#"{"user_id":0,"password":"secret"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_login_wrong_password_over_router() {
        let state = create_test_state();
        state.registry.register("alice", "mit", "secret").unwrap();
        let app = build_router(state);

        let response = app
            .oneshot(json_post("/login", r#"{"user_id":0,"password":"nope"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: ErrorResponse = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body.code, "authentication_failed");
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let app = build_router(create_test_state());

        let response = app
            .oneshot(Request::builder().uri("/announce").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: ErrorResponse = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body.code, "not_found");
    }

    #[tokio::test]
    async fn test_health_route() {
        let app = build_router(create_test_state());

        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
