//! Persistence layer for the fleet registry.
//!
//! This crate contains:
//! - Database connection management for both supported backends
//! - Schema bootstrap
//! - Entity definitions (database row mappings)
//! - Repository implementations

pub mod db;
pub mod entities;
pub mod repositories;
pub mod schema;
