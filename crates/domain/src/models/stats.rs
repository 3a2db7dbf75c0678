//! Fleet statistics domain models.

use serde::Serialize;

/// Width of the rolling activity window used by [`FleetStats`].
///
/// "Active" here means `last_seen` within the window at query time; it is
/// independent of the stored `is_active` flag.
pub const ACTIVITY_WINDOW_HOURS: i64 = 24;

/// Number of manufacturers reported in the per-manufacturer breakdown.
pub const TOP_MANUFACTURERS: i64 = 10;

/// Fleet-wide statistics.
#[derive(Debug, Clone, Serialize)]
pub struct FleetStats {
    pub total_devices: i64,
    pub active_devices: i64,
    pub total_logs: i64,
    pub recent_logs: i64,
    pub devices_by_manufacturer: Vec<ManufacturerCount>,
}

/// One manufacturer bucket, ordered by count descending then name.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ManufacturerCount {
    pub manufacturer: String,
    pub count: i64,
}
