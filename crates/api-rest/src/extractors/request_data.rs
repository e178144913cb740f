//! Request envelope extractor.

use crate::error::ApiError;
use axum::{
    async_trait,
    extract::{FromRequest, Request},
    Json,
};
use serde::{de::DeserializeOwned, Deserialize};
use validator::Validate;

/// Body of every write request: `{ "data": { ... } }`
#[derive(Debug, Deserialize)]
pub struct RequestEnvelope<T> {
    /// The payload; may be absent
    #[serde(default = "Option::default")]
    pub data: Option<T>,
}

/// Extracts and validates the `data` of a [`RequestEnvelope`].
///
/// A missing `data` is rejected with the `data` field error
/// "no request data".
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestData<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for RequestData<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(envelope) = Json::<RequestEnvelope<T>>::from_request(req, state).await?;

        let data = envelope
            .data
            .ok_or_else(|| ApiError::field("data", "no request data"))?;
        data.validate()?;

        Ok(RequestData(data))
    }
}

impl<T> std::ops::Deref for RequestData<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
