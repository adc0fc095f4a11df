use crate::core::error::MonitoringError;
use crate::core::state::AppState;
use crate::models::account::{ApiKeyQuery, OnlineUser, OnlineUsersResponse};
use crate::utils::auth::constant_time_eq;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use std::sync::Arc;
use tracing::warn;

/// Current push targets, in promotion order
///
/// GET /online?api_key=<key>
pub async fn online_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ApiKeyQuery>,
) -> Result<Response, MonitoringError> {
    if !constant_time_eq(&params.api_key, &state.config.security.api_key) {
        warn!("Unauthorized online list access attempt");
        return Err(MonitoringError::InvalidApiKey);
    }

    let users = state
        .registry
        .snapshot_online_users()
        .iter()
        .map(OnlineUser::from)
        .collect();

    Ok((
        StatusCode::OK,
        Json(OnlineUsersResponse {
            success: true,
            users,
        }),
    )
        .into_response())
}
