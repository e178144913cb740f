//! Infrastructure layer for the gala catalog
//!
//! This crate provides implementations for:
//! - Document storage (in-memory, and DynamoDB behind the `dynamodb` feature)
//! - Primary key generation
//! - The generic repository and the gala, program and performer repositories
//!
//! ## Architecture
//!
//! Repositories are written once against the [`DocumentStore`] trait and the
//! domain's entity contracts, so the storage backend can be swapped for
//! testing or deployment without touching repository logic.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use gala_infrastructure::{DocumentRepository, InMemoryDocumentStore, Repository};
//! use gala_domain::Gala;
//!
//! let store = Arc::new(InMemoryDocumentStore::new());
//! let galas = DocumentRepository::<Gala, _>::new(store);
//! let created = galas.create_entity(Gala::new("Spring Gala", 2020, vec![])).await?;
//! ```

pub mod keys;
pub mod repositories;
pub mod store;

pub use keys::{KeyGenerator, RandomKeyGenerator};
pub use repositories::{
    DocumentRepository, GalaRepository, PerformerRepository, ProgramRepository, Repository,
};
#[cfg(feature = "dynamodb")]
pub use store::DynamoDbDocumentStore;
pub use store::{
    Document, DocumentStore, InMemoryDocumentStore, IndexKey, IndexValue, SecondaryIndex,
    YEAR_INDEX,
};

use gala_domain::Entity;

// Re-export result and error types
pub type Result<T> = std::result::Result<T, Error>;

/// Infrastructure-level errors
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Identity collision on create
    #[error("Conflict: {0}")]
    Conflict(String),

    /// No record for the requested key
    #[error("Not found: {0}")]
    NotFound(String),

    /// Entity type registered without a required capability
    #[error("Not supported: {0}")]
    NotSupported(String),

    /// Stored version differs from the one being written
    #[error("Version conflict on {kind} {key}: expected {expected:?}, found {actual:?}")]
    VersionConflict {
        kind: &'static str,
        key: String,
        expected: Option<i64>,
        actual: Option<i64>,
    },

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Errors reported by the storage backend
    #[error("Storage error: {0}")]
    Storage(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl Error {
    /// `NotFound` for `key` of entity type `E`
    pub fn not_found<E: Entity>(key: E::Id) -> Self {
        Error::NotFound(format!("{} {}", E::KIND, key))
    }

    /// Get HTTP status code for this error
    pub fn http_status(&self) -> u16 {
        match self {
            Error::Conflict(_) => 400,
            Error::NotFound(_) => 404,
            Error::NotSupported(_) => 501,
            Error::VersionConflict { .. }
            | Error::Serialization(_)
            | Error::Storage(_)
            | Error::Configuration(_) => 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gala_domain::{Gala, GalaId};

    #[test]
    fn test_error_http_status() {
        assert_eq!(Error::Conflict("x".into()).http_status(), 400);
        assert_eq!(Error::NotFound("x".into()).http_status(), 404);
        assert_eq!(Error::NotSupported("x".into()).http_status(), 501);
        assert_eq!(Error::Storage("x".into()).http_status(), 500);
    }

    #[test]
    fn test_not_found_names_kind_and_key() {
        let id = GalaId::new();
        let err = Error::not_found::<Gala>(id);
        assert_eq!(err.to_string(), format!("Not found: Gala {id}"));
    }
}
