//! Pagination utilities.
//!
//! This module provides the page filter accepted by list endpoints, an
//! in-memory page slicer, and the service that builds absolute page links.

use serde::{Deserialize, Serialize};
use url::Url;

/// Default page number (1-indexed)
pub const DEFAULT_PAGE_NUMBER: u32 = 1;

/// Default items per page
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Maximum items per page
pub const MAX_PAGE_SIZE: u32 = 50;

/// Requested page of a listing.
///
/// Deserialization goes through [`PaginationFilter::new`], so a filter is
/// always clamped whichever way it was built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "PageRequest")]
pub struct PaginationFilter {
    /// Page number (1-indexed)
    page_number: u32,

    /// Items per page, at most [`MAX_PAGE_SIZE`]
    page_size: u32,
}

/// Page numbers as received, before clamping.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PageRequest {
    #[serde(default)]
    page_number: u32,
    #[serde(default)]
    page_size: u32,
}

impl From<PageRequest> for PaginationFilter {
    fn from(request: PageRequest) -> Self {
        Self::new(request.page_number, request.page_size)
    }
}

impl Default for PaginationFilter {
    fn default() -> Self {
        Self {
            page_number: DEFAULT_PAGE_NUMBER,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PaginationFilter {
    /// Create a filter, clamping the page size and replacing zeros with defaults.
    pub fn new(page_number: u32, page_size: u32) -> Self {
        let page_number = if page_number == 0 {
            DEFAULT_PAGE_NUMBER
        } else {
            page_number
        };
        let page_size = if page_size == 0 {
            DEFAULT_PAGE_SIZE
        } else {
            page_size.min(MAX_PAGE_SIZE)
        };

        Self {
            page_number,
            page_size,
        }
    }

    /// Page number (1-indexed)
    pub fn page_number(&self) -> u32 {
        self.page_number
    }

    /// Items per page
    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Number of items preceding this page.
    pub fn offset(&self) -> usize {
        (self.page_number as usize).saturating_sub(1) * self.page_size as usize
    }

    /// The same page size at another page number.
    pub fn with_page(&self, page_number: u32) -> Self {
        Self::new(page_number, self.page_size)
    }

    /// Number of pages needed for `total_records` items.
    pub fn total_pages(&self, total_records: usize) -> u32 {
        total_records.div_ceil(self.page_size as usize) as u32
    }
}

/// One page of items plus the counts needed to navigate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    /// The items on this page
    pub items: Vec<T>,

    /// The filter that produced this page
    pub filter: PaginationFilter,

    /// Total number of items across all pages
    pub total_records: usize,
}

impl<T> Page<T> {
    /// Slice a fully materialized listing down to the requested page.
    pub fn from_all(items: Vec<T>, filter: PaginationFilter) -> Self {
        let total_records = items.len();
        let items = items
            .into_iter()
            .skip(filter.offset())
            .take(filter.page_size() as usize)
            .collect();

        Self {
            items,
            filter,
            total_records,
        }
    }

    /// Total number of pages
    pub fn total_pages(&self) -> u32 {
        self.filter.total_pages(self.total_records)
    }

    /// Whether a later page exists
    pub fn has_next(&self) -> bool {
        self.filter.page_number() < self.total_pages()
    }

    /// Whether an earlier page exists
    pub fn has_previous(&self) -> bool {
        self.filter.page_number() > 1
    }

    /// Transform every item, keeping the paging information.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            filter: self.filter,
            total_records: self.total_records,
        }
    }
}

/// Errors raised while building page links
#[derive(Debug, thiserror::Error)]
pub enum PaginationError {
    /// The configured base URI is not an absolute URL
    #[error("Invalid base URI '{uri}': {source}")]
    InvalidBaseUri {
        /// The rejected value
        uri: String,
        /// Parser failure
        #[source]
        source: url::ParseError,
    },

    /// The route could not be joined onto the base URI
    #[error("Invalid route '{0}'")]
    InvalidRoute(String),
}

/// Builds absolute links to pages of a listing.
#[derive(Debug, Clone)]
pub struct PaginationUriService {
    base_uri: Url,
}

impl PaginationUriService {
    /// Create a service rooted at `base_uri`, e.g. `http://localhost:5000`.
    pub fn new(base_uri: &str) -> Result<Self, PaginationError> {
        let base_uri = Url::parse(base_uri).map_err(|source| PaginationError::InvalidBaseUri {
            uri: base_uri.to_string(),
            source,
        })?;

        Ok(Self { base_uri })
    }

    /// The base URI links are built from
    pub fn base_uri(&self) -> &Url {
        &self.base_uri
    }

    /// Absolute link to the page described by `filter` under `route`.
    ///
    /// `route` is resolved from the base URI's root, with or without a leading
    /// slash.
    pub fn page_uri(&self, filter: &PaginationFilter, route: &str) -> Result<Url, PaginationError> {
        let path = format!("/{}", route.trim_start_matches('/'));
        let mut uri = self
            .base_uri
            .join(&path)
            .map_err(|_| PaginationError::InvalidRoute(route.to_string()))?;

        uri.query_pairs_mut()
            .clear()
            .append_pair("pageNumber", &filter.page_number().to_string())
            .append_pair("pageSize", &filter.page_size().to_string());

        Ok(uri)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_pagination_filter_default() {
        let filter = PaginationFilter::default();
        assert_eq!(filter.page_number(), 1);
        assert_eq!(filter.page_size(), 10);
        assert_eq!(filter.offset(), 0);
    }

    #[test]
    fn test_pagination_filter_clamps_page_size() {
        let filter = PaginationFilter::new(12, 456);
        assert_eq!(filter.page_number(), 12);
        assert_eq!(filter.page_size(), MAX_PAGE_SIZE);
    }

    #[test]
    fn test_pagination_filter_zero_values() {
        let filter = PaginationFilter::new(0, 0);
        assert_eq!(filter, PaginationFilter::default());
    }

    #[test]
    fn test_deserialized_filter_is_clamped() {
        let filter: PaginationFilter =
            serde_json::from_str(r#"{"pageNumber": 0, "pageSize": 500}"#).unwrap();
        assert_eq!(filter.page_number(), 1);
        assert_eq!(filter.page_size(), MAX_PAGE_SIZE);
        assert_eq!(filter.offset(), 0);

        let filter: PaginationFilter = serde_json::from_str("{}").unwrap();
        assert_eq!(filter, PaginationFilter::default());
    }

    #[test]
    fn test_total_pages() {
        let filter = PaginationFilter::new(2, 5);
        assert_eq!(filter.total_pages(12), 3);
        assert_eq!(filter.total_pages(10), 2);
        assert_eq!(filter.total_pages(0), 0);
    }

    #[test]
    fn test_page_from_all() {
        let data: Vec<u32> = (1..=12).collect();
        let page = Page::from_all(data, PaginationFilter::new(2, 5));

        assert_eq!(page.items, vec![6, 7, 8, 9, 10]);
        assert_eq!(page.total_records, 12);
        assert_eq!(page.total_pages(), 3);
        assert!(page.has_next());
        assert!(page.has_previous());
    }

    #[test]
    fn test_page_past_the_end_is_empty() {
        let page = Page::from_all(vec![1, 2, 3], PaginationFilter::new(4, 5));
        assert!(page.items.is_empty());
        assert_eq!(page.total_records, 3);
        assert!(!page.has_next());
    }

    #[test]
    fn test_page_uri() {
        let service = PaginationUriService::new("http://localhost:5000").unwrap();

        let uri = service
            .page_uri(&PaginationFilter::new(5, 10), "/api/v1/galas")
            .unwrap();
        assert_eq!(
            uri.as_str(),
            "http://localhost:5000/api/v1/galas?pageNumber=5&pageSize=10"
        );

        let uri = service
            .page_uri(&PaginationFilter::new(2, 5), "/api/programs")
            .unwrap();
        assert_eq!(
            uri.as_str(),
            "http://localhost:5000/api/programs?pageNumber=2&pageSize=5"
        );
    }

    #[test]
    fn test_page_uri_with_large_page_size() {
        let service = PaginationUriService::new("http://localhost:5000").unwrap();
        let uri = service
            .page_uri(&PaginationFilter::new(12, 456), "/api/performers")
            .unwrap();
        assert_eq!(
            uri.as_str(),
            "http://localhost:5000/api/performers?pageNumber=12&pageSize=50"
        );
    }

    #[test]
    fn test_page_uri_with_relative_route() {
        let service = PaginationUriService::new("http://localhost:5000/").unwrap();
        let uri = service
            .page_uri(&PaginationFilter::new(3, 5), "api/data")
            .unwrap();
        assert_eq!(
            uri.as_str(),
            "http://localhost:5000/api/data?pageNumber=3&pageSize=5"
        );
    }

    #[test]
    fn test_invalid_base_uri() {
        assert!(PaginationUriService::new("localhost").is_err());
    }

    proptest! {
        #[test]
        fn prop_page_never_exceeds_page_size(len in 0usize..200, page in 0u32..20, size in 0u32..80) {
            let filter = PaginationFilter::new(page, size);
            let page = Page::from_all((0..len).collect::<Vec<_>>(), filter);
            prop_assert!(page.items.len() <= filter.page_size() as usize);
            prop_assert!(filter.page_size() <= MAX_PAGE_SIZE);
            prop_assert_eq!(page.total_records, len);
        }
    }
}
