//! JSON body extractor that validates before the handler runs.

use crate::error::AppError;
use crate::service::Validate;
use async_trait::async_trait;
use axum::{
    extract::{FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;

/// Deserializes the body as `T` and runs [`Validate::validate`]. Malformed
/// JSON becomes `bad_request`; rule failures become `validation_error`.
pub struct ValidJson<T: Validate>(pub T::Valid);

#[async_trait]
impl<T, S> FromRequest<S> for ValidJson<T>
where
    T: Validate + DeserializeOwned + Send,
    T::Valid: Send,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(body) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
        Ok(ValidJson(body.validate()?))
    }
}
