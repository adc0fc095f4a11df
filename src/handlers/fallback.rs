use crate::models::account::ErrorResponse;
use axum::{
    http::{StatusCode, Uri},
    response::{IntoResponse, Json, Response},
};
use tracing::debug;

pub async fn fallback_handler(uri: Uri) -> Response {
    debug!(path = %uri.path(), "Unknown route");

    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            success: false,
            code: "not_found".to_string(),
            error: format!(
                "No route for {}. Valid endpoints: /register, /login, /health, /metrics, /online",
                uri.path()
            ),
        }),
    )
        .into_response()
}
