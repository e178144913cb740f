//! Gala Catalog REST API
//!
//! This crate provides the Axum-based REST API over the gala, program and
//! performer repositories, with OpenAPI documentation and uniform response
//! envelopes.
//!
//! ## Architecture
//!
//! The API is organized into the following modules:
//!
//! - **app**: Application builder, middleware stack and OpenAPI document
//! - **state**: Shared state holding the repositories
//! - **routes**: HTTP route handlers organized by resource
//! - **middleware**: Request ID and request logging
//! - **extractors**: Custom Axum extractors for common patterns
//! - **responses**: Standardized response envelopes
//! - **error**: HTTP error handling and conversion
//!
//! ## Usage
//!
//! ```rust,no_run
//! use gala_api_rest::{create_app, ApiConfig, AppState};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ApiConfig::default();
//!     let listener = tokio::net::TcpListener::bind(config.socket_addr()).await?;
//!     let app = create_app(AppState::in_memory(config)?);
//!
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod app;
pub mod config;
pub mod error;
pub mod extractors;
pub mod middleware;
pub mod responses;
pub mod routes;
pub mod state;

// Re-export commonly used types
pub use app::{create_app, ApiDoc};
pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};
pub use state::AppState;
