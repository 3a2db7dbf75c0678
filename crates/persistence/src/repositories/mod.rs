//! Repository implementations for database operations.

pub mod device;
pub mod operator;
pub mod stats;
pub mod telemetry;

pub use device::DeviceRepository;
pub use operator::OperatorRepository;
pub use stats::StatsRepository;
pub use telemetry::TelemetryRepository;
