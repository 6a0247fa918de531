//! Numeric id from the request path.

use crate::error::AppError;
use async_trait::async_trait;
use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
};

/// `{id}` segment parsed as a student id; anything non-numeric is `bad_request`.
#[derive(Clone, Copy, Debug)]
pub struct StudentId(pub i64);

#[async_trait]
impl<S> FromRequestParts<S> for StudentId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
        raw.trim()
            .parse()
            .map(StudentId)
            .map_err(|_| AppError::BadRequest(format!("invalid id '{}'", raw)))
    }
}
