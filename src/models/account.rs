use crate::models::user::UserRecord;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub nickname: String,
    pub school: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub success: bool,
    pub user_id: u32,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub user_id: u32,
    pub password: String,
}

#[derive(Deserialize)]
pub struct ApiKeyQuery {
    pub api_key: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SuccessResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub code: String,
    pub error: String,
}

/// Public view of an online user; never carries the password
#[derive(Debug, Serialize, Deserialize)]
pub struct OnlineUser {
    pub user_id: u32,
    pub nickname: String,
    pub school: String,
    pub status: String,
    pub endpoint: Option<SocketAddr>,
}

impl From<&UserRecord> for OnlineUser {
    fn from(user: &UserRecord) -> Self {
        Self {
            user_id: user.id(),
            nickname: user.nickname().to_string(),
            school: user.school().to_string(),
            status: user.status().as_str().to_string(),
            endpoint: user.endpoint(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct OnlineUsersResponse {
    pub success: bool,
    pub users: Vec<OnlineUser>,
}
