//! Pagination extractor.

use crate::error::ApiError;
use axum::{
    async_trait,
    extract::{FromRequestParts, Query},
    http::request::Parts,
};
use gala_common::PaginationFilter;
use serde::Deserialize;
use utoipa::IntoParams;

/// Query parameters for pagination
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct PaginationQuery {
    /// Page number (1-indexed, default 1)
    #[serde(default)]
    pub page_number: Option<u32>,

    /// Items per page (default 10, at most 50)
    #[serde(default)]
    pub page_size: Option<u32>,
}

/// Extracted pagination filter
#[derive(Debug, Clone, Copy, Default)]
pub struct Pagination(pub PaginationFilter);

#[async_trait]
impl<S> FromRequestParts<S> for Pagination
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(query) = Query::<PaginationQuery>::from_request_parts(parts, state).await?;

        Ok(Self(PaginationFilter::new(
            query.page_number.unwrap_or_default(),
            query.page_size.unwrap_or_default(),
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    async fn extract(uri: &str) -> Result<Pagination, ApiError> {
        let (mut parts, _) = Request::builder().uri(uri).body(()).unwrap().into_parts();
        Pagination::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn test_defaults() {
        let Pagination(filter) = extract("/api/galas").await.unwrap();
        assert_eq!(filter, PaginationFilter::default());
    }

    #[tokio::test]
    async fn test_clamps_page_size() {
        let Pagination(filter) = extract("/api/galas?pageNumber=3&pageSize=500")
            .await
            .unwrap();
        assert_eq!(filter.page_number(), 3);
        assert_eq!(filter.page_size(), 50);
    }

    #[tokio::test]
    async fn test_rejects_garbage() {
        assert!(extract("/api/galas?pageNumber=abc").await.is_err());
    }
}
