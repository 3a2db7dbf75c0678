//! Telemetry log entity (database row mapping).

use domain::models::TelemetryRecord;
use sqlx::FromRow;

use super::millis_to_utc;

/// Database row mapping for the device_logs table.
///
/// `timestamp` is the device-reported moment and is carried verbatim;
/// `created_at` is when the server accepted the record.
#[derive(Debug, Clone, FromRow)]
pub struct TelemetryRecordEntity {
    pub id: i64,
    pub device_id: String,
    pub battery_level: Option<i64>,
    pub network_status: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub local_ip: Option<String>,
    pub public_ip: Option<String>,
    pub timestamp: i64,
    pub created_at: i64,
}

impl From<TelemetryRecordEntity> for TelemetryRecord {
    fn from(entity: TelemetryRecordEntity) -> Self {
        Self {
            id: entity.id,
            device_id: entity.device_id,
            battery_level: entity.battery_level,
            network_status: entity.network_status,
            latitude: entity.latitude,
            longitude: entity.longitude,
            local_ip: entity.local_ip,
            public_ip: entity.public_ip,
            timestamp: entity.timestamp,
            created_at: millis_to_utc(entity.created_at),
        }
    }
}
