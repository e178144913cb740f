//! Common utilities shared by the gala catalog crates.
//!
//! This crate provides:
//! - Configuration management
//! - Telemetry bootstrap
//! - Pagination helpers
//! - Retry backoff

pub mod config;
pub mod pagination;
pub mod retry;
pub mod telemetry;

// Re-export commonly used types
pub use config::{AppConfig, ServerConfig, StoreConfig, StoreProvider, TelemetryConfig};
pub use pagination::{Page, PaginationError, PaginationFilter, PaginationUriService};
pub use retry::{ExponentialBackoff, RetryConfig};
pub use telemetry::init_tracing;

/// Common error type used throughout the crate
pub type Result<T> = std::result::Result<T, anyhow::Error>;
