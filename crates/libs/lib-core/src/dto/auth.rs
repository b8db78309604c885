//! Authentication request and response types.

use crate::model::store::models::{AccountStatus, Role, User};
use serde::{Deserialize, Serialize};

/// Signup request payload.
///
/// `role` defaults to a regular patient account when omitted. Admin accounts
/// cannot be self-registered.
#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: Option<Role>,
}

/// Login request payload.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Public view of a user, safe to return to clients.
#[derive(Debug, Clone, Serialize)]
pub struct UserInfo {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub role: Role,
    pub account_status: AccountStatus,
    pub avatar_url: Option<String>,
}

impl From<User> for UserInfo {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            role: user.role,
            account_status: user.account_status,
            avatar_url: user.avatar_url,
        }
    }
}

/// Successful signup/login response.
///
/// `token` is absent for accounts that are still pending moderation; those
/// accounts only receive a token from login once approved.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    pub user: UserInfo,
    pub message: String,
}

/// Error response body for the auth endpoints.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
