//! Telemetry log domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// One immutable telemetry observation submitted by a device.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryRecord {
    pub id: i64,
    pub device_id: String,
    pub battery_level: Option<i64>,
    pub network_status: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub local_ip: Option<String>,
    pub public_ip: Option<String>,
    /// Client-supplied capture time, epoch milliseconds, stored verbatim.
    pub timestamp: i64,
    /// Server receipt time, used only for rolling-window aggregates.
    pub created_at: DateTime<Utc>,
}

/// Request payload for a telemetry sync.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SyncRequest {
    #[validate(length(min = 1, max = 255, message = "device_id must not be empty"))]
    pub device_id: String,

    #[validate(custom(function = "shared::validation::validate_battery_level"))]
    pub battery_level: Option<i64>,

    #[validate(length(max = 64, message = "network_status is too long"))]
    pub network_status: Option<String>,

    #[validate(custom(function = "shared::validation::validate_latitude"))]
    pub latitude: Option<f64>,

    #[validate(custom(function = "shared::validation::validate_longitude"))]
    pub longitude: Option<f64>,

    #[validate(length(max = 64, message = "local_ip is too long"))]
    pub local_ip: Option<String>,

    #[validate(length(max = 64, message = "public_ip is too long"))]
    pub public_ip: Option<String>,

    #[validate(custom(function = "shared::validation::validate_timestamp_millis"))]
    pub timestamp: i64,
}

/// Request payload for a heartbeat.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct HeartbeatRequest {
    #[validate(length(min = 1, max = 255, message = "device_id must not be empty"))]
    pub device_id: String,
}

/// Request payload for a device config fetch.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct DeviceConfigRequest {
    #[validate(length(min = 1, max = 255, message = "device_id must not be empty"))]
    pub device_id: String,
}

/// Operating parameters served to devices.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClientConfig {
    pub sync_interval_minutes: i64,
    pub heartbeat_interval_minutes: i64,
    pub location_enabled: bool,
}
