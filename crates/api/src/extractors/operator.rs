//! Operator JWT authentication extractor.
//!
//! Provides an Axum extractor for validating Bearer tokens on the
//! operator-facing endpoints.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use crate::app::AppState;
use crate::error::ApiError;
use persistence::repositories::OperatorRepository;
use shared::jwt::extract_operator_id;

/// Authenticated operator resolved from a Bearer token.
///
/// Validates the token signature and expiry, then loads the account so
/// that disabled or deleted operators are rejected even while their
/// tokens are still inside the expiry window.
#[derive(Debug, Clone)]
pub struct OperatorAuth {
    /// Operator row id from the token subject claim.
    pub operator_id: i64,
    /// Username of the account, for request logging.
    pub username: String,
}

fn bearer_token(header: &str) -> Option<&str> {
    header.strip_prefix("Bearer ")
}

#[async_trait]
impl FromRequestParts<AppState> for OperatorAuth {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("Authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| ApiError::Unauthorized("Missing Authorization header".to_string()))?;

        let token = bearer_token(auth_header).ok_or_else(|| {
            ApiError::Unauthorized("Invalid Authorization header format".to_string())
        })?;

        let claims = state.jwt.validate_token(token)?;
        let operator_id = extract_operator_id(&claims)?;

        let repo = OperatorRepository::new(state.pool.clone());
        let operator = repo
            .find_by_id(operator_id)
            .await?
            .ok_or_else(|| ApiError::Unauthorized("Invalid token".to_string()))?;

        if operator.is_active == 0 {
            return Err(ApiError::Unauthorized("Account is disabled".to_string()));
        }

        Ok(OperatorAuth {
            operator_id: operator.id,
            username: operator.username,
        })
    }
}
