//! Device API key extractor.
//!
//! Provides an Axum extractor that gates the device-facing endpoints.

use axum::{
    async_trait,
    extract::{FromRequestParts, Query},
    http::{request::Parts, Uri},
};
use serde::Deserialize;

use crate::app::AppState;
use crate::error::ApiError;
use shared::crypto::digest_eq;

/// Header carrying the fleet device key.
pub const DEVICE_KEY_HEADER: &str = "X-API-Key";

#[derive(Debug, Deserialize)]
struct DeviceKeyQuery {
    key: Option<String>,
}

/// Proof that the request carried the fleet device key.
///
/// The key is read from the `X-API-Key` header, falling back to the
/// `key` query parameter for clients that cannot set headers. A missing
/// key and a wrong key are rejected with distinct 401 messages.
#[derive(Debug, Clone, Copy)]
pub struct DeviceKeyAuth;

impl DeviceKeyAuth {
    /// Compares a supplied key against the configured key.
    fn verify(supplied: &str, expected: &str) -> bool {
        digest_eq(supplied, expected)
    }
}

fn query_key(uri: &Uri) -> Option<String> {
    Query::<DeviceKeyQuery>::try_from_uri(uri)
        .ok()
        .and_then(|Query(params)| params.key)
}

#[async_trait]
impl FromRequestParts<AppState> for DeviceKeyAuth {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let supplied = parts
            .headers
            .get(DEVICE_KEY_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string())
            .or_else(|| query_key(&parts.uri));

        let supplied =
            supplied.ok_or_else(|| ApiError::Unauthorized("API key required".to_string()))?;

        if !Self::verify(&supplied, &state.config.auth.device_key) {
            return Err(ApiError::Unauthorized("Invalid API key".to_string()));
        }

        Ok(DeviceKeyAuth)
    }
}
