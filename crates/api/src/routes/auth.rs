//! Operator authentication endpoint.

use axum::{extract::State, Json};
use chrono::Utc;
use tracing::{info, warn};

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::ValidatedJson;
use crate::response::ApiResponse;
use domain::models::operator::{LoginRequest, SessionToken};
use persistence::repositories::OperatorRepository;
use shared::password::verify_password;

/// Exchange operator credentials for a session token.
///
/// POST /login
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> Result<Json<ApiResponse<SessionToken>>, ApiError> {
    let repo = OperatorRepository::new(state.pool.clone());

    let operator = repo
        .find_by_username(&request.username)
        .await?
        .ok_or_else(|| {
            warn!(username = %request.username, "login attempt for unknown account");
            ApiError::Unauthorized("Invalid username or password".to_string())
        })?;

    if operator.is_active == 0 {
        warn!(username = %operator.username, "login attempt for disabled account");
        return Err(ApiError::Unauthorized("Account is disabled".to_string()));
    }

    let valid = verify_password(&request.password, &operator.password_hash)
        .map_err(|e| ApiError::Internal(format!("Password verification failed: {}", e)))?;
    if !valid {
        warn!(username = %operator.username, "login attempt with wrong password");
        return Err(ApiError::Unauthorized(
            "Invalid username or password".to_string(),
        ));
    }

    let (token, _jti) = state.jwt.generate_token(operator.id, &operator.username)?;

    repo.update_last_login(operator.id, Utc::now().timestamp_millis())
        .await?;

    info!(username = %operator.username, "operator logged in");

    Ok(Json(ApiResponse::data(SessionToken::bearer(
        token,
        state.config.auth.token_expiry_secs,
        operator.username,
    ))))
}
