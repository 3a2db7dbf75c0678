//! Domain layer for the fleet registry backend.
//!
//! This crate contains the domain models and request/response DTOs
//! (Device, TelemetryRecord, Operator, FleetStats) together with their
//! validation rules. It performs no I/O.

pub mod models;
