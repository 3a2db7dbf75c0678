//! Device registry domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use validator::Validate;

use crate::models::telemetry::TelemetryRecord;

/// A registered device in the fleet.
///
/// Exactly one row exists per `device_id` for the lifetime of the device;
/// registration is an upsert and never creates a second row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Device {
    pub id: i64,
    pub device_id: String,
    pub model: String,
    pub manufacturer: String,
    pub os_version: Option<String>,
    pub app_version: Option<String>,
    pub is_active: bool,
    /// Set once at first registration, never touched afterwards.
    pub first_seen: DateTime<Utc>,
    /// Advanced by every registration, sync, and heartbeat.
    pub last_seen: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Outcome of a registration upsert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RegisterStatus {
    Created,
    Updated,
}

impl RegisterStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RegisterStatus::Created => "created",
            RegisterStatus::Updated => "updated",
        }
    }
}

impl fmt::Display for RegisterStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Request payload for device registration.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterDeviceRequest {
    #[validate(length(min = 1, max = 255, message = "device_id must not be empty"))]
    pub device_id: String,

    #[validate(length(min = 1, max = 255, message = "model must not be empty"))]
    pub model: String,

    #[validate(length(min = 1, max = 255, message = "manufacturer must not be empty"))]
    pub manufacturer: String,

    #[validate(length(max = 255, message = "os_version is too long"))]
    pub os_version: Option<String>,

    #[validate(length(max = 255, message = "app_version is too long"))]
    pub app_version: Option<String>,
}

/// Response payload for device registration.
#[derive(Debug, Clone, Serialize)]
pub struct RegisterDeviceResponse {
    pub device_id: String,
    pub status: RegisterStatus,
}

/// Fleet listing entry: the device enriched with its most recent telemetry
/// record, or `null` when it has never synced.
#[derive(Debug, Clone, Serialize)]
pub struct DeviceWithTelemetry {
    #[serde(flatten)]
    pub device: Device,
    pub latest_log: Option<TelemetryRecord>,
}

/// Request payload for the operator active-flag toggle.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SetDeviceActiveRequest {
    pub is_active: bool,
}

/// Activity filter for fleet listings, applied to the stored `is_active`
/// flag rather than recomputed from `last_seen`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeviceStatusFilter {
    #[default]
    All,
    Active,
    Inactive,
}

impl FromStr for DeviceStatusFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" => Ok(DeviceStatusFilter::All),
            "active" => Ok(DeviceStatusFilter::Active),
            "inactive" => Ok(DeviceStatusFilter::Inactive),
            _ => Err(format!("Invalid status filter: {}", s)),
        }
    }
}

impl fmt::Display for DeviceStatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DeviceStatusFilter::All => "all",
            DeviceStatusFilter::Active => "active",
            DeviceStatusFilter::Inactive => "inactive",
        };
        write!(f, "{}", s)
    }
}
