use crate::core::error::RegistryError;
use crate::core::state::AppState;
use crate::models::account::{LoginRequest, RegisterRequest, RegisterResponse, SuccessResponse};
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use std::sync::Arc;
use tracing::{info, warn};

/// Create an account
///
/// POST /register  {"nickname": .., "school": .., "password": ..}
pub async fn register_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RegisterRequest>,
) -> Result<Response, RegistryError> {
    let result = state
        .registry
        .register(&request.nickname, &request.school, &request.password);

    state.metrics.record_registration(result.is_ok());

    let user_id = result.map_err(|e| {
        warn!(error = %e, code = e.code(), "Registration rejected");
        e
    })?;

    info!(
        user_id,
        nickname = %request.nickname,
        school = %request.school,
        "User registered"
    );

    Ok((
        StatusCode::OK,
        Json(RegisterResponse {
            success: true,
            user_id,
        }),
    )
        .into_response())
}

/// Authenticate an account
///
/// POST /login  {"user_id": .., "password": ..}
pub async fn login_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LoginRequest>,
) -> Result<Response, RegistryError> {
    let result = state.registry.login(request.user_id, &request.password);

    state.metrics.record_login(result.is_ok());

    if let Err(e) = result {
        warn!(user_id = request.user_id, error = %e, code = e.code(), "Login rejected");
        return Err(e);
    }

    info!(user_id = request.user_id, "User logged in");

    Ok((
        StatusCode::OK,
        Json(SuccessResponse {
            success: true,
            message: "Login successful".to_string(),
        }),
    )
        .into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::state::test_support::create_test_state;
    use crate::models::account::ErrorResponse;
    use crate::models::user::UserStatus;
    use axum::body::Body;
    use http_body_util::BodyExt;
    use std::sync::atomic::Ordering;

    fn register_request(nickname: &str, school: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            nickname: nickname.to_string(),
            school: school.to_string(),
            password: password.to_string(),
        }
    }

    async fn read_json<T: serde::de::DeserializeOwned>(response: Response) -> T {
        let (_, body) = response.into_parts();
        let bytes = Body::new(body).collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_register_success() {
        let state = create_test_state();

        let response = register_handler(
            State(Arc::clone(&state)),
            Json(register_request("alice", "mit", "secret")),
        )
        .await
        .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body: RegisterResponse = read_json(response).await;
        assert!(body.success);
        assert_eq!(body.user_id, 0);
        assert_eq!(state.registry.len(), 1);
        assert_eq!(state.metrics.registrations.load(Ordering::Relaxed), 1);
    }

    #[tokio::test]
    async fn test_register_empty_field() {
        let state = create_test_state();

        let err = register_handler(
            State(Arc::clone(&state)),
            Json(register_request("alice", "", "secret")),
        )
        .await
        .unwrap_err();
        assert_eq!(err, RegistryError::InvalidArgument("school"));

        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: ErrorResponse = read_json(response).await;
        assert_eq!(body.code, "invalid_argument");

        assert!(state.registry.is_empty());
        assert_eq!(state.metrics.failed_registrations.load(Ordering::Relaxed), 1);
    }

    #[tokio::test]
    async fn test_login_flow() {
        let state = create_test_state();
        let id = state.registry.register("alice", "mit", "secret").unwrap();

        let err = login_handler(
            State(Arc::clone(&state)),
            Json(LoginRequest {
                user_id: id,
                password: "wrong".to_string(),
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::UNAUTHORIZED);
        assert_eq!(state.registry.status_of(id), Some(UserStatus::LoginFailed));

        let response = login_handler(
            State(Arc::clone(&state)),
            Json(LoginRequest {
                user_id: id,
                password: "secret".to_string(),
            }),
        )
        .await
        .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(state.registry.status_of(id), Some(UserStatus::LoginSuccess));

        assert_eq!(state.metrics.successful_logins.load(Ordering::Relaxed), 1);
        assert_eq!(state.metrics.failed_logins.load(Ordering::Relaxed), 1);
    }

    #[tokio::test]
    async fn test_login_unknown_user() {
        let state = create_test_state();

        let err = login_handler(
            State(state),
            Json(LoginRequest {
                user_id: 999,
                password: "x".to_string(),
            }),
        )
        .await
        .unwrap_err();

        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body: ErrorResponse = read_json(response).await;
        assert_eq!(body.code, "user_not_found");
        assert!(!body.success);
    }
}
