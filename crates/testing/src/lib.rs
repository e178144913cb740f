//! Testing utilities for the gala catalog
//!
//! This crate provides:
//! - Builder patterns for gala, program and performer test data
//! - Fixtures that seed a linked catalog through the repositories
//! - Deterministic key generators and a call-counting store wrapper
//!
//! # Examples
//!
//! ```
//! use gala_testing::builders::GalaBuilder;
//!
//! let gala = GalaBuilder::new()
//!     .with_name("Spring Gala")
//!     .with_year(2020)
//!     .build();
//! assert_eq!(gala.year, 2020);
//! ```

pub mod builders;
pub mod fixtures;
pub mod mocks;

// Re-export commonly used types
pub use builders::*;
pub use fixtures::*;
pub use mocks::*;

// Re-export testing dependencies for convenience
pub use fake;
pub use proptest;
