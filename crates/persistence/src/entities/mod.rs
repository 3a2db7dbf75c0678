//! Database entity definitions.
//!
//! Entities are direct mappings to database rows. The `Any` driver
//! decodes neither booleans nor datetime columns, so rows carry flags
//! as 0/1 integers and moments as UNIX epoch milliseconds; conversions
//! into domain models restore the richer types.

use chrono::{DateTime, Utc};

pub mod device;
pub mod operator;
pub mod telemetry;

pub use device::{DeviceEntity, DeviceWithLatestLogEntity};
pub use operator::OperatorEntity;
pub use telemetry::TelemetryRecordEntity;

/// Epoch milliseconds to UTC, clamping anything unrepresentable to the epoch.
pub(crate) fn millis_to_utc(millis: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(millis).unwrap_or(DateTime::UNIX_EPOCH)
}
