//! Standardized API response types.
//!
//! Every body is wrapped in a [`Response`] envelope: `data`, `succeeded`,
//! `errors` and `message`. Listings use [`PagedResponse`], which adds
//! navigation links built by the [`PaginationUriService`].

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::IntoResponse,
    Json,
};
use gala_common::{Page, PaginationFilter, PaginationUriService};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use url::Url;

use crate::error::{ApiError, ApiResult};

/// Field name to message
pub type ErrorMap = BTreeMap<String, String>;

/// Standard API response wrapper
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Response<T> {
    /// Response data
    pub data: Option<T>,

    /// Indicates if the request was successful
    pub succeeded: bool,

    /// Errors by field, `null` on success
    pub errors: Option<ErrorMap>,

    /// Empty on success, the status reason otherwise
    pub message: String,
}

impl<T> Response<T> {
    /// Create a success response with data
    pub fn success(data: T) -> Self {
        Self {
            data: Some(data),
            succeeded: true,
            errors: None,
            message: String::new(),
        }
    }
}

impl Response<serde_json::Value> {
    /// Create a failure response for `status`
    pub fn failure(status: StatusCode, errors: ErrorMap) -> Self {
        Self {
            data: None,
            succeeded: false,
            errors: Some(errors),
            message: status.canonical_reason().unwrap_or_default().to_string(),
        }
    }
}

impl<T> IntoResponse for Response<T>
where
    T: Serialize,
{
    fn into_response(self) -> axum::response::Response {
        Json(self).into_response()
    }
}

/// Paginated API response
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PagedResponse<T> {
    /// Envelope fields
    #[serde(flatten)]
    pub response: Response<Vec<T>>,

    /// Current page number (1-indexed)
    pub page_number: u32,

    /// Items per page
    pub page_size: u32,

    /// Link to the first page
    pub first_page: Url,

    /// Link to the last page
    pub last_page: Url,

    /// Total number of pages
    pub total_pages: u32,

    /// Total number of records
    pub total_records: usize,

    /// Link to the next page, if any
    pub next_page: Option<Url>,

    /// Link to the previous page, if any
    pub previous_page: Option<Url>,
}

impl<T> PagedResponse<T> {
    /// Wrap a page, linking its neighbours under `route`.
    pub fn new(page: Page<T>, uris: &PaginationUriService, route: &str) -> ApiResult<Self> {
        let filter = page.filter;
        let total_pages = page.total_pages();
        let link = |page_number: u32| -> ApiResult<Url> {
            uris.page_uri(&filter.with_page(page_number), route)
                .map_err(|e| ApiError::Internal(e.to_string()))
        };

        let next_page = page
            .has_next()
            .then(|| link(filter.page_number() + 1))
            .transpose()?;
        let previous_page = page
            .has_previous()
            .then(|| link(filter.page_number() - 1))
            .transpose()?;

        Ok(Self {
            page_number: filter.page_number(),
            page_size: filter.page_size(),
            first_page: link(1)?,
            last_page: link(total_pages.max(1))?,
            total_pages,
            total_records: page.total_records,
            next_page,
            previous_page,
            response: Response::success(page.items),
        })
    }

    /// An empty first listing page.
    pub fn empty(filter: PaginationFilter, uris: &PaginationUriService, route: &str) -> ApiResult<Self> {
        Self::new(Page::from_all(Vec::new(), filter), uris, route)
    }
}

impl<T> IntoResponse for PagedResponse<T>
where
    T: Serialize,
{
    fn into_response(self) -> axum::response::Response {
        Json(self).into_response()
    }
}

/// Created response (HTTP 201) with a `Location` header
pub struct Created<T> {
    /// Path of the created resource
    pub location: String,

    /// The created resource
    pub data: T,
}

impl<T> Created<T> {
    /// Created resource `data` reachable at `location`
    pub fn at(location: impl Into<String>, data: T) -> Self {
        Self {
            location: location.into(),
            data,
        }
    }
}

impl<T> IntoResponse for Created<T>
where
    T: Serialize,
{
    fn into_response(self) -> axum::response::Response {
        let body = Json(Response::success(self.data));
        match HeaderValue::try_from(self.location) {
            Ok(location) => (StatusCode::CREATED, [(header::LOCATION, location)], body).into_response(),
            Err(_) => (StatusCode::CREATED, body).into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uris() -> PaginationUriService {
        PaginationUriService::new("http://localhost:5000").unwrap()
    }

    #[test]
    fn test_success_envelope() {
        let json = serde_json::to_value(Response::success(42)).unwrap();
        assert_eq!(json["data"], 42);
        assert_eq!(json["succeeded"], true);
        assert!(json["errors"].is_null());
        assert_eq!(json["message"], "");
    }

    #[test]
    fn test_failure_envelope() {
        let mut errors = ErrorMap::new();
        errors.insert("data".to_string(), "no request data".to_string());
        let json = serde_json::to_value(Response::failure(StatusCode::BAD_REQUEST, errors)).unwrap();
        assert_eq!(json["succeeded"], false);
        assert_eq!(json["message"], "Bad Request");
        assert_eq!(json["errors"]["data"], "no request data");
    }

    #[test]
    fn test_paged_response_links() {
        let page = Page::from_all((1..=23).collect::<Vec<_>>(), PaginationFilter::new(2, 10));
        let paged = PagedResponse::new(page, &uris(), "/api/galas").unwrap();
        let json = serde_json::to_value(&paged).unwrap();

        assert_eq!(json["pageNumber"], 2);
        assert_eq!(json["pageSize"], 10);
        assert_eq!(json["totalPages"], 3);
        assert_eq!(json["totalRecords"], 23);
        assert_eq!(json["succeeded"], true);
        assert_eq!(json["data"].as_array().unwrap().len(), 10);
        assert_eq!(
            json["firstPage"],
            "http://localhost:5000/api/galas?pageNumber=1&pageSize=10"
        );
        assert_eq!(
            json["lastPage"],
            "http://localhost:5000/api/galas?pageNumber=3&pageSize=10"
        );
        assert_eq!(
            json["nextPage"],
            "http://localhost:5000/api/galas?pageNumber=3&pageSize=10"
        );
        assert_eq!(
            json["previousPage"],
            "http://localhost:5000/api/galas?pageNumber=1&pageSize=10"
        );
    }

    #[test]
    fn test_empty_page_has_no_neighbours() {
        let paged =
            PagedResponse::<u32>::empty(PaginationFilter::default(), &uris(), "/api/galas").unwrap();
        assert_eq!(paged.total_pages, 0);
        assert!(paged.next_page.is_none());
        assert!(paged.previous_page.is_none());
        assert_eq!(
            paged.last_page.as_str(),
            "http://localhost:5000/api/galas?pageNumber=1&pageSize=10"
        );
    }
}
