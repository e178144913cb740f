//! Path identifier extractor.

use crate::error::ApiError;
use axum::{
    async_trait,
    extract::{FromRequestParts, Path},
    http::request::Parts,
};
use serde::de::DeserializeOwned;

/// The single path parameter of a resource route, e.g. `/galas/:gala_id`.
#[derive(Debug, Clone, Copy)]
pub struct ResourceId<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for ResourceId<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<T>::from_request_parts(parts, state).await?;
        Ok(Self(id))
    }
}
