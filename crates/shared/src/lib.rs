//! Shared utilities and common types for the fleet registry backend.
//!
//! This crate provides common functionality used across all other crates:
//! - Digest helpers for credential comparison
//! - Password hashing with Argon2id
//! - Operator JWT generation and validation
//! - Offset pagination math
//! - Telemetry field validation

pub mod crypto;
pub mod jwt;
pub mod pagination;
pub mod password;
pub mod validation;
