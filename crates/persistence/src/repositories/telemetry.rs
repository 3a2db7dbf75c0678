//! Telemetry log repository for database operations.

use domain::models::telemetry::SyncRequest;
use sqlx::AnyPool;

use crate::entities::TelemetryRecordEntity;

/// Repository for telemetry log database operations.
#[derive(Clone)]
pub struct TelemetryRepository {
    pool: AnyPool,
}

impl TelemetryRepository {
    /// Creates a new TelemetryRepository with the given connection pool.
    pub fn new(pool: AnyPool) -> Self {
        Self { pool }
    }

    /// Append a telemetry record and bump the owning device, atomically.
    ///
    /// The device update doubles as the existence check and, on Postgres,
    /// row-locks the device so concurrent syncs for one device serialize.
    /// Returns false without writing anything when the device has never
    /// registered.
    pub async fn record_sync(
        &self,
        sync: &SyncRequest,
        now_millis: i64,
    ) -> Result<bool, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let touched = sqlx::query(
            r#"
            UPDATE devices
            SET last_seen = $2, is_active = 1, updated_at = $3
            WHERE device_id = $1
            "#,
        )
        .bind(&sync.device_id)
        .bind(now_millis)
        .bind(now_millis)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if touched == 0 {
            tx.rollback().await?;
            return Ok(false);
        }

        sqlx::query(
            r#"
            INSERT INTO device_logs (device_id, battery_level, network_status, latitude,
                                     longitude, local_ip, public_ip, timestamp, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(&sync.device_id)
        .bind(sync.battery_level)
        .bind(&sync.network_status)
        .bind(sync.latitude)
        .bind(sync.longitude)
        .bind(&sync.local_ip)
        .bind(&sync.public_ip)
        .bind(sync.timestamp)
        .bind(now_millis)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(true)
    }

    /// Most recent record for a device, by device-reported timestamp.
    pub async fn latest_for_device(
        &self,
        device_id: &str,
    ) -> Result<Option<TelemetryRecordEntity>, sqlx::Error> {
        sqlx::query_as::<_, TelemetryRecordEntity>(
            r#"
            SELECT id, device_id, battery_level, network_status, latitude, longitude,
                   local_ip, public_ip, timestamp, created_at
            FROM device_logs
            WHERE device_id = $1
            ORDER BY timestamp DESC, id DESC
            LIMIT 1
            "#,
        )
        .bind(device_id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Page of records for a device, newest device-reported timestamp first.
    pub async fn list_for_device(
        &self,
        device_id: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<TelemetryRecordEntity>, sqlx::Error> {
        sqlx::query_as::<_, TelemetryRecordEntity>(
            r#"
            SELECT id, device_id, battery_level, network_status, latitude, longitude,
                   local_ip, public_ip, timestamp, created_at
            FROM device_logs
            WHERE device_id = $1
            ORDER BY timestamp DESC, id DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(device_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
    }

    /// Total records stored for a device.
    pub async fn count_for_device(&self, device_id: &str) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM device_logs WHERE device_id = $1")
            .bind(device_id)
            .fetch_one(&self.pool)
            .await
    }
}
