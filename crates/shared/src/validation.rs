//! Common validation utilities for telemetry fields.

use validator::ValidationError;

/// Validates that a latitude value is within valid range (-90 to 90).
pub fn validate_latitude(lat: f64) -> Result<(), ValidationError> {
    if (-90.0..=90.0).contains(&lat) {
        Ok(())
    } else {
        let mut err = ValidationError::new("latitude_range");
        err.message = Some("Latitude must be between -90 and 90".into());
        Err(err)
    }
}

/// Validates that a longitude value is within valid range (-180 to 180).
pub fn validate_longitude(lon: f64) -> Result<(), ValidationError> {
    if (-180.0..=180.0).contains(&lon) {
        Ok(())
    } else {
        let mut err = ValidationError::new("longitude_range");
        err.message = Some("Longitude must be between -180 and 180".into());
        Err(err)
    }
}

/// Validates that a battery level is within valid range (0 to 100).
pub fn validate_battery_level(level: i64) -> Result<(), ValidationError> {
    if (0..=100).contains(&level) {
        Ok(())
    } else {
        let mut err = ValidationError::new("battery_range");
        err.message = Some("Battery level must be between 0 and 100".into());
        Err(err)
    }
}

/// Validates a client-supplied timestamp in milliseconds since epoch.
///
/// The value is caller-controlled and stored verbatim, so the only
/// requirement is that it is non-negative.
pub fn validate_timestamp_millis(timestamp_millis: i64) -> Result<(), ValidationError> {
    if timestamp_millis >= 0 {
        Ok(())
    } else {
        let mut err = ValidationError::new("timestamp_range");
        err.message = Some("Timestamp must be a non-negative integer".into());
        Err(err)
    }
}
