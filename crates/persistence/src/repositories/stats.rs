//! Fleet-wide aggregate queries.

use chrono::{DateTime, Duration, Utc};
use domain::models::stats::{ManufacturerCount, ACTIVITY_WINDOW_HOURS, TOP_MANUFACTURERS};
use domain::models::FleetStats;
use sqlx::AnyPool;

/// Repository for aggregate statistics over the whole fleet.
#[derive(Clone)]
pub struct StatsRepository {
    pool: AnyPool,
}

impl StatsRepository {
    /// Creates a new StatsRepository with the given connection pool.
    pub fn new(pool: AnyPool) -> Self {
        Self { pool }
    }

    /// Aggregate counters for the stats endpoint.
    ///
    /// Active devices and recent logs both mean "within the activity
    /// window before `now`". Device activity is judged on last_seen,
    /// independent of the stored is_active flag; log recency is judged
    /// on server receipt time.
    pub async fn fleet_stats(&self, now: DateTime<Utc>) -> Result<FleetStats, sqlx::Error> {
        let cutoff = (now - Duration::hours(ACTIVITY_WINDOW_HOURS)).timestamp_millis();

        let total_devices: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM devices")
            .fetch_one(&self.pool)
            .await?;

        let active_devices: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM devices WHERE last_seen >= $1")
                .bind(cutoff)
                .fetch_one(&self.pool)
                .await?;

        let total_logs: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM device_logs")
            .fetch_one(&self.pool)
            .await?;

        let recent_logs: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM device_logs WHERE created_at >= $1")
                .bind(cutoff)
                .fetch_one(&self.pool)
                .await?;

        let manufacturers: Vec<(String, i64)> = sqlx::query_as(
            r#"
            SELECT manufacturer, COUNT(*) AS device_count
            FROM devices
            GROUP BY manufacturer
            ORDER BY device_count DESC, manufacturer ASC
            LIMIT $1
            "#,
        )
        .bind(TOP_MANUFACTURERS)
        .fetch_all(&self.pool)
        .await?;

        Ok(FleetStats {
            total_devices,
            active_devices,
            total_logs,
            recent_logs,
            devices_by_manufacturer: manufacturers
                .into_iter()
                .map(|(manufacturer, count)| ManufacturerCount {
                    manufacturer,
                    count,
                })
                .collect(),
        })
    }
}
