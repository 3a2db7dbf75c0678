//! JSON body extraction with field validation.

use axum::{
    async_trait,
    extract::{FromRequest, Request},
    Json,
};
use validator::Validate;

use crate::error::ApiError;

/// JSON body that has passed field validation.
///
/// Folds body deserialization and `validator` checks into one step so
/// that malformed JSON and failed validation both surface as a 400
/// response envelope instead of axum's plain-text rejections.
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: serde::de::DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(payload) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::Validation(rejection.body_text()))?;

        payload.validate()?;

        Ok(ValidatedJson(payload))
    }
}
