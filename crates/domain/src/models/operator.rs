//! Operator account domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// An administrator account in the credential store.
#[derive(Debug, Clone, Serialize)]
pub struct Operator {
    pub id: i64,
    pub username: String,
    #[serde(skip_serializing)] // Never serialize the hash into API responses
    pub password_hash: String,
    pub is_active: bool,
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Login request payload.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, max = 64, message = "username is required"))]
    pub username: String,

    #[validate(length(min = 1, max = 1024, message = "password is required"))]
    pub password: String,
}

/// Issued operator session token.
#[derive(Debug, Clone, Serialize)]
pub struct SessionToken {
    pub token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub username: String,
}

impl SessionToken {
    pub fn bearer(token: String, expires_in: i64, username: String) -> Self {
        Self {
            token,
            token_type: "Bearer".to_string(),
            expires_in,
            username,
        }
    }
}
