//! Custom Axum extractors.
//!
//! Extractors for authenticating and validating request data.

pub mod device_key;
pub mod json_body;
pub mod operator;

#[allow(unused_imports)] // Re-exports for downstream use
pub use device_key::{DeviceKeyAuth, DEVICE_KEY_HEADER};
#[allow(unused_imports)] // Re-exports for downstream use
pub use json_body::ValidatedJson;
#[allow(unused_imports)] // Re-exports for downstream use
pub use operator::OperatorAuth;
