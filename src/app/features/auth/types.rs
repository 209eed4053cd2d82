use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::app::db;

/// Request body for POST /api/auth/sign-up.
#[derive(Debug, Deserialize, Validate)]
pub struct SignUpRequest {
    #[validate(length(min = 1, max = 255, message = "Name must be 1–255 characters"))]
    pub name: String,
    #[validate(length(min = 1, max = 254))]
    pub email: String,
    pub password: String,
}

/// Request body for POST /api/auth/sign-in.
#[derive(Debug, Deserialize, Validate)]
pub struct SignInRequest {
    #[validate(length(min = 1, max = 254))]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// Public view of a user. Never carries the password hash.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub email_verified: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

impl From<db::User> for UserResponse {
    fn from(user: db::User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            email_verified: user.email_verified,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Response for sign-up and sign-in.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserResponse,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionInfo {
    pub expires_at: i64,
    pub active_organization_id: Option<String>,
}

/// Response for GET /api/auth/session.
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub user: UserResponse,
    pub session: SessionInfo,
}
