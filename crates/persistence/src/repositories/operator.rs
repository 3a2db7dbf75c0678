//! Operator account repository for database operations.

use sqlx::AnyPool;

use crate::entities::OperatorEntity;

/// Repository for operator account database operations.
#[derive(Clone)]
pub struct OperatorRepository {
    pool: AnyPool,
}

impl OperatorRepository {
    /// Creates a new OperatorRepository with the given connection pool.
    pub fn new(pool: AnyPool) -> Self {
        Self { pool }
    }

    /// Find an operator by username.
    pub async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<OperatorEntity>, sqlx::Error> {
        sqlx::query_as::<_, OperatorEntity>(
            r#"
            SELECT id, username, password_hash, is_active, last_login, created_at
            FROM operators
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
    }

    /// Find an operator by ID.
    pub async fn find_by_id(&self, id: i64) -> Result<Option<OperatorEntity>, sqlx::Error> {
        sqlx::query_as::<_, OperatorEntity>(
            r#"
            SELECT id, username, password_hash, is_active, last_login, created_at
            FROM operators
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Create an operator account.
    pub async fn create_operator(
        &self,
        username: &str,
        password_hash: &str,
        now_millis: i64,
    ) -> Result<OperatorEntity, sqlx::Error> {
        sqlx::query_as::<_, OperatorEntity>(
            r#"
            INSERT INTO operators (username, password_hash, is_active, created_at)
            VALUES ($1, $2, 1, $3)
            RETURNING id, username, password_hash, is_active, last_login, created_at
            "#,
        )
        .bind(username)
        .bind(password_hash)
        .bind(now_millis)
        .fetch_one(&self.pool)
        .await
    }

    /// Update an operator's last login timestamp.
    pub async fn update_last_login(&self, id: i64, now_millis: i64) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE operators SET last_login = $2 WHERE id = $1")
            .bind(id)
            .bind(now_millis)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
