//! Startup services.

pub mod bootstrap;

#[allow(unused_imports)] // Re-exports for downstream use
pub use bootstrap::{bootstrap_operator, BootstrapError};
