// Centralized error handling for the chat server

use crate::models::account::ErrorResponse;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use std::net::IpAddr;
use thiserror::Error;

/// Outcomes of a rejected registry operation
///
/// All of these are request-level rejections; none of them leaves a partial
/// mutation behind.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Invalid argument: {0} must not be empty")]
    InvalidArgument(&'static str),

    #[error("User not found: {0}")]
    UserNotFound(u32),

    #[error("Authentication failed")]
    AuthenticationFailed,

    #[error("User {0} has not logged in")]
    NotAuthenticated(u32),

    #[error("No user ids left to allocate")]
    IdSpaceExhausted,
}

impl RegistryError {
    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            RegistryError::InvalidArgument(_) => "invalid_argument",
            RegistryError::UserNotFound(_) => "user_not_found",
            RegistryError::AuthenticationFailed => "authentication_failed",
            RegistryError::NotAuthenticated(_) => "not_authenticated",
            RegistryError::IdSpaceExhausted => "id_space_exhausted",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            RegistryError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            RegistryError::UserNotFound(_) => StatusCode::NOT_FOUND,
            RegistryError::AuthenticationFailed => StatusCode::UNAUTHORIZED,
            RegistryError::NotAuthenticated(_) => StatusCode::UNAUTHORIZED,
            RegistryError::IdSpaceExhausted => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl IntoResponse for RegistryError {
    fn into_response(self) -> Response {
        (
            self.status_code(),
            Json(ErrorResponse {
                success: false,
                code: self.code().to_string(),
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

/// Reasons an inbound chat datagram is dropped
#[derive(Error, Debug)]
pub enum DatagramError {
    #[error("Datagram too large: {len} bytes > {max} bytes")]
    Oversized { len: usize, max: usize },

    #[error("Malformed datagram: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Rate limit exceeded for {0}")]
    RateLimited(IpAddr),

    #[error("Sender rejected: {0}")]
    Rejected(#[from] RegistryError),
}

#[derive(Error, Debug)]
pub enum MonitoringError {
    #[error("Invalid API key")]
    InvalidApiKey,
}

impl IntoResponse for MonitoringError {
    fn into_response(self) -> Response {
        let status = match self {
            MonitoringError::InvalidApiKey => StatusCode::UNAUTHORIZED,
        };

        (
            status,
            Json(ErrorResponse {
                success: false,
                code: "invalid_api_key".to_string(),
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}
