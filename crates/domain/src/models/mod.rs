//! Domain models for the fleet registry.

pub mod device;
pub mod operator;
pub mod stats;
pub mod telemetry;

pub use device::Device;
pub use operator::Operator;
pub use stats::FleetStats;
pub use telemetry::TelemetryRecord;
