//! Operator account entity (database row mapping).

use domain::models::Operator;
use sqlx::FromRow;

use super::millis_to_utc;

/// Database row mapping for the operators table.
#[derive(Debug, Clone, FromRow)]
pub struct OperatorEntity {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
    pub is_active: i64,
    pub last_login: Option<i64>,
    pub created_at: i64,
}

impl From<OperatorEntity> for Operator {
    fn from(entity: OperatorEntity) -> Self {
        Self {
            id: entity.id,
            username: entity.username,
            password_hash: entity.password_hash,
            is_active: entity.is_active != 0,
            last_login: entity.last_login.map(millis_to_utc),
            created_at: millis_to_utc(entity.created_at),
        }
    }
}
