//! Device entity (database row mapping).

use domain::models::device::DeviceWithTelemetry;
use domain::models::{Device, TelemetryRecord};
use sqlx::FromRow;

use super::millis_to_utc;

/// Database row mapping for the devices table.
#[derive(Debug, Clone, FromRow)]
pub struct DeviceEntity {
    pub id: i64,
    pub device_id: String,
    pub model: String,
    pub manufacturer: String,
    pub os_version: Option<String>,
    pub app_version: Option<String>,
    pub is_active: i64,
    pub first_seen: i64,
    pub last_seen: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

impl From<DeviceEntity> for Device {
    fn from(entity: DeviceEntity) -> Self {
        Self {
            id: entity.id,
            device_id: entity.device_id,
            model: entity.model,
            manufacturer: entity.manufacturer,
            os_version: entity.os_version,
            app_version: entity.app_version,
            is_active: entity.is_active != 0,
            first_seen: millis_to_utc(entity.first_seen),
            last_seen: millis_to_utc(entity.last_seen),
            created_at: millis_to_utc(entity.created_at),
            updated_at: millis_to_utc(entity.updated_at),
        }
    }
}

/// Database row mapping for a device joined with its latest log.
///
/// The log columns are null for a device that has never synced.
#[derive(Debug, Clone, FromRow)]
pub struct DeviceWithLatestLogEntity {
    pub id: i64,
    pub device_id: String,
    pub model: String,
    pub manufacturer: String,
    pub os_version: Option<String>,
    pub app_version: Option<String>,
    pub is_active: i64,
    pub first_seen: i64,
    pub last_seen: i64,
    pub created_at: i64,
    pub updated_at: i64,
    pub log_id: Option<i64>,
    pub battery_level: Option<i64>,
    pub network_status: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub local_ip: Option<String>,
    pub public_ip: Option<String>,
    pub log_timestamp: Option<i64>,
    pub log_created_at: Option<i64>,
}

impl DeviceWithLatestLogEntity {
    fn latest_log(&self) -> Option<TelemetryRecord> {
        let id = self.log_id?;
        let timestamp = self.log_timestamp?;
        let created_at = self.log_created_at?;
        Some(TelemetryRecord {
            id,
            device_id: self.device_id.clone(),
            battery_level: self.battery_level,
            network_status: self.network_status.clone(),
            latitude: self.latitude,
            longitude: self.longitude,
            local_ip: self.local_ip.clone(),
            public_ip: self.public_ip.clone(),
            timestamp,
            created_at: millis_to_utc(created_at),
        })
    }
}

impl From<DeviceWithLatestLogEntity> for DeviceWithTelemetry {
    fn from(entity: DeviceWithLatestLogEntity) -> Self {
        let latest_log = entity.latest_log();
        Self {
            device: Device {
                id: entity.id,
                device_id: entity.device_id,
                model: entity.model,
                manufacturer: entity.manufacturer,
                os_version: entity.os_version,
                app_version: entity.app_version,
                is_active: entity.is_active != 0,
                first_seen: millis_to_utc(entity.first_seen),
                last_seen: millis_to_utc(entity.last_seen),
                created_at: millis_to_utc(entity.created_at),
                updated_at: millis_to_utc(entity.updated_at),
            },
            latest_log,
        }
    }
}
