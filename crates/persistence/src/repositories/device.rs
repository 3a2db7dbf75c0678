//! Device repository for database operations.

use domain::models::device::RegisterStatus;
use sqlx::AnyPool;

use crate::entities::{DeviceEntity, DeviceWithLatestLogEntity};

/// Repository for device-related database operations.
#[derive(Clone)]
pub struct DeviceRepository {
    pool: AnyPool,
}

impl DeviceRepository {
    /// Creates a new DeviceRepository with the given connection pool.
    pub fn new(pool: AnyPool) -> Self {
        Self { pool }
    }

    /// Registers a device, updating the row when it already exists.
    ///
    /// The update runs first so the common re-registration path is a
    /// single statement. A unique violation on the insert means another
    /// request created the row after our update saw nothing; the update
    /// is then retried and the result reported as an update.
    pub async fn register_device(
        &self,
        device_id: &str,
        model: &str,
        manufacturer: &str,
        os_version: Option<&str>,
        app_version: Option<&str>,
        now_millis: i64,
    ) -> Result<RegisterStatus, sqlx::Error> {
        if self
            .update_registration(device_id, model, manufacturer, os_version, app_version, now_millis)
            .await?
        {
            return Ok(RegisterStatus::Updated);
        }

        let inserted = sqlx::query(
            r#"
            INSERT INTO devices (device_id, model, manufacturer, os_version, app_version,
                                 is_active, first_seen, last_seen, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, 1, $6, $7, $8, $9)
            "#,
        )
        .bind(device_id)
        .bind(model)
        .bind(manufacturer)
        .bind(os_version)
        .bind(app_version)
        .bind(now_millis)
        .bind(now_millis)
        .bind(now_millis)
        .bind(now_millis)
        .execute(&self.pool)
        .await;

        match inserted {
            Ok(_) => Ok(RegisterStatus::Created),
            Err(sqlx::Error::Database(err)) if err.is_unique_violation() => {
                self.update_registration(
                    device_id,
                    model,
                    manufacturer,
                    os_version,
                    app_version,
                    now_millis,
                )
                .await?;
                Ok(RegisterStatus::Updated)
            }
            Err(err) => Err(err),
        }
    }

    async fn update_registration(
        &self,
        device_id: &str,
        model: &str,
        manufacturer: &str,
        os_version: Option<&str>,
        app_version: Option<&str>,
        now_millis: i64,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE devices
            SET model = $2, manufacturer = $3, os_version = $4, app_version = $5,
                is_active = 1, last_seen = $6, updated_at = $7
            WHERE device_id = $1
            "#,
        )
        .bind(device_id)
        .bind(model)
        .bind(manufacturer)
        .bind(os_version)
        .bind(app_version)
        .bind(now_millis)
        .bind(now_millis)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Find a device by its client-chosen identifier.
    pub async fn find_by_device_id(
        &self,
        device_id: &str,
    ) -> Result<Option<DeviceEntity>, sqlx::Error> {
        sqlx::query_as::<_, DeviceEntity>(
            r#"
            SELECT id, device_id, model, manufacturer, os_version, app_version,
                   is_active, first_seen, last_seen, created_at, updated_at
            FROM devices
            WHERE device_id = $1
            "#,
        )
        .bind(device_id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Bump last_seen without touching registration metadata.
    /// Returns false when the device is unknown.
    pub async fn touch_last_seen(
        &self,
        device_id: &str,
        now_millis: i64,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE devices
            SET last_seen = $2, updated_at = $3
            WHERE device_id = $1
            "#,
        )
        .bind(device_id)
        .bind(now_millis)
        .bind(now_millis)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Set the stored active flag. Returns the updated device.
    pub async fn set_active(
        &self,
        device_id: &str,
        is_active: bool,
        now_millis: i64,
    ) -> Result<Option<DeviceEntity>, sqlx::Error> {
        sqlx::query_as::<_, DeviceEntity>(
            r#"
            UPDATE devices
            SET is_active = $2, updated_at = $3
            WHERE device_id = $1
            RETURNING id, device_id, model, manufacturer, os_version, app_version,
                      is_active, first_seen, last_seen, created_at, updated_at
            "#,
        )
        .bind(device_id)
        .bind(if is_active { 1_i64 } else { 0 })
        .bind(now_millis)
        .fetch_optional(&self.pool)
        .await
    }

    /// Delete a device. Its log rows cascade at the database level.
    /// Returns false when the device is unknown.
    pub async fn delete_device(&self, device_id: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM devices WHERE device_id = $1")
            .bind(device_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Count devices matching the filters.
    pub async fn count_devices(
        &self,
        active_filter: Option<bool>,
        search_filter: Option<&str>,
    ) -> Result<i64, sqlx::Error> {
        let mut query = String::from("SELECT COUNT(*) FROM devices");

        let mut param_idx = 1;
        let mut conditions = Vec::new();

        if active_filter.is_some() {
            conditions.push(format!("is_active = ${}", param_idx));
            param_idx += 1;
        }

        if search_filter.is_some() {
            conditions.push(search_condition("", param_idx));
        }

        if !conditions.is_empty() {
            query.push_str(" WHERE ");
            query.push_str(&conditions.join(" AND "));
        }

        let mut q = sqlx::query_scalar::<_, i64>(&query);

        if let Some(active) = active_filter {
            q = q.bind(if active { 1_i64 } else { 0 });
        }

        if let Some(search) = search_filter {
            q = q.bind(like_pattern(search));
        }

        q.fetch_one(&self.pool).await
    }

    /// List devices matching the filters, each joined with its latest log.
    ///
    /// Most recently seen first; devices sharing a last_seen stay in
    /// insertion order.
    pub async fn list_devices(
        &self,
        active_filter: Option<bool>,
        search_filter: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<DeviceWithLatestLogEntity>, sqlx::Error> {
        let mut query = String::from(
            r#"
            SELECT d.id, d.device_id, d.model, d.manufacturer, d.os_version, d.app_version,
                   d.is_active, d.first_seen, d.last_seen, d.created_at, d.updated_at,
                   l.id AS log_id, l.battery_level, l.network_status, l.latitude, l.longitude,
                   l.local_ip, l.public_ip, l.timestamp AS log_timestamp,
                   l.created_at AS log_created_at
            FROM devices d
            LEFT JOIN device_logs l ON l.id = (
                SELECT l2.id FROM device_logs l2
                WHERE l2.device_id = d.device_id
                ORDER BY l2.timestamp DESC, l2.id DESC
                LIMIT 1
            )
            "#,
        );

        let mut param_idx = 1;
        let mut conditions = Vec::new();

        if active_filter.is_some() {
            conditions.push(format!("d.is_active = ${}", param_idx));
            param_idx += 1;
        }

        if search_filter.is_some() {
            conditions.push(search_condition("d.", param_idx));
            param_idx += 1;
        }

        if !conditions.is_empty() {
            query.push_str(" WHERE ");
            query.push_str(&conditions.join(" AND "));
        }

        query.push_str(&format!(
            " ORDER BY d.last_seen DESC, d.id ASC LIMIT ${} OFFSET ${}",
            param_idx,
            param_idx + 1
        ));

        let mut q = sqlx::query_as::<_, DeviceWithLatestLogEntity>(&query);

        if let Some(active) = active_filter {
            q = q.bind(if active { 1_i64 } else { 0 });
        }

        if let Some(search) = search_filter {
            q = q.bind(like_pattern(search));
        }

        q.bind(limit).bind(offset).fetch_all(&self.pool).await
    }
}

/// Case-insensitive substring condition over the searchable columns,
/// sharing one placeholder.
fn search_condition(prefix: &str, param_idx: usize) -> String {
    format!(
        "(LOWER({p}device_id) LIKE ${i} ESCAPE '\\' \
         OR LOWER({p}model) LIKE ${i} ESCAPE '\\' \
         OR LOWER({p}manufacturer) LIKE ${i} ESCAPE '\\')",
        p = prefix,
        i = param_idx
    )
}

/// Lowercased `%term%` pattern with LIKE metacharacters escaped, so the
/// search term is always matched literally.
fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    for c in term.to_lowercase().chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    format!("%{}%", escaped)
}
