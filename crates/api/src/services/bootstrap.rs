//! Operator bootstrap for initial setup.
//!
//! Creates the first operator account on startup if configured. This is
//! a one-time operation that does nothing once the account exists.

use chrono::Utc;
use sqlx::AnyPool;
use tracing::{info, warn};

use crate::config::AuthConfig;
use persistence::repositories::OperatorRepository;
use shared::password::{hash_password, PasswordError};

/// Error types for operator bootstrap.
#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Password hashing error: {0}")]
    PasswordHash(#[from] PasswordError),
}

/// Bootstrap the first operator account if configured.
///
/// Called on startup after the schema is in place. Idempotent: when the
/// account already exists, including the case where a second instance
/// races this one, it does nothing.
pub async fn bootstrap_operator(
    pool: &AnyPool,
    config: &AuthConfig,
) -> Result<(), BootstrapError> {
    let username = config.bootstrap_username.trim();

    if username.is_empty() {
        return Ok(());
    }

    if config.bootstrap_password.is_empty() {
        warn!(
            "FLEET__AUTH__BOOTSTRAP_USERNAME is set but FLEET__AUTH__BOOTSTRAP_PASSWORD is empty - skipping bootstrap"
        );
        return Ok(());
    }

    let repo = OperatorRepository::new(pool.clone());

    if repo.find_by_username(username).await?.is_some() {
        info!(username = %username, "bootstrap operator already exists - skipping");
        return Ok(());
    }

    let password_hash = hash_password(&config.bootstrap_password)?;
    let now = Utc::now().timestamp_millis();

    match repo.create_operator(username, &password_hash, now).await {
        Ok(operator) => {
            info!(
                username = %operator.username,
                operator_id = operator.id,
                "bootstrap operator created"
            );
            warn!(
                "SECURITY: Remove FLEET__AUTH__BOOTSTRAP_USERNAME and \
                 FLEET__AUTH__BOOTSTRAP_PASSWORD from configuration after initial setup"
            );
            Ok(())
        }
        Err(sqlx::Error::Database(err)) if err.is_unique_violation() => {
            info!(username = %username, "bootstrap operator created by another instance");
            Ok(())
        }
        Err(err) => Err(err.into()),
    }
}
