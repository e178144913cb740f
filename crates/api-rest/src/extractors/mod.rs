//! Custom Axum extractors.
//!
//! This module provides reusable extractors for common patterns
//! like pagination, list-valued query parameters, and the request envelope.

pub mod list_query;
pub mod pagination;
pub mod request_data;
pub mod resource_id;

pub use list_query::{IdList, ListKey, Years, Zodiac};
pub use pagination::{Pagination, PaginationQuery};
pub use request_data::{RequestData, RequestEnvelope};
pub use resource_id::ResourceId;
