//! Application state and dependency injection.
//!
//! This module defines the shared application state that is passed
//! to all route handlers via Axum's state extraction.

use crate::config::ApiConfig;
use gala_common::{PaginationError, PaginationUriService};
use gala_domain::{Gala, Performer, Program};
use gala_infrastructure::{
    DocumentRepository, DocumentStore, GalaRepository, InMemoryDocumentStore, PerformerRepository,
    ProgramRepository,
};
use std::sync::Arc;

/// Application state shared across all requests
#[derive(Clone)]
pub struct AppState {
    /// API configuration
    pub config: Arc<ApiConfig>,

    /// Gala repository (type-erased)
    pub galas: Arc<dyn GalaRepository>,

    /// Program repository (type-erased)
    pub programs: Arc<dyn ProgramRepository>,

    /// Performer repository (type-erased)
    pub performers: Arc<dyn PerformerRepository>,

    /// Builds page links for paged responses
    pub pagination: Arc<PaginationUriService>,
}

impl AppState {
    /// Create the state with every repository backed by `store`.
    pub fn new<S: DocumentStore>(config: ApiConfig, store: Arc<S>) -> Result<Self, PaginationError> {
        let pagination = PaginationUriService::new(&config.base_url)?;

        Ok(Self {
            galas: Arc::new(DocumentRepository::<Gala, S>::new(Arc::clone(&store))),
            programs: Arc::new(DocumentRepository::<Program, S>::new(Arc::clone(&store))),
            performers: Arc::new(DocumentRepository::<Performer, S>::new(store)),
            pagination: Arc::new(pagination),
            config: Arc::new(config),
        })
    }

    /// Create a state backed by a fresh in-memory store.
    /// Suitable for development and testing
    pub fn in_memory(config: ApiConfig) -> Result<Self, PaginationError> {
        Self::new(config, Arc::new(InMemoryDocumentStore::new()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_memory_state() {
        let state = AppState::in_memory(ApiConfig::default()).unwrap();
        assert_eq!(state.pagination.base_uri().as_str(), "http://localhost:5000/");
    }

    #[test]
    fn test_relative_base_url_is_rejected() {
        let config = ApiConfig {
            base_url: "not a url".to_string(),
            ..Default::default()
        };
        assert!(AppState::in_memory(config).is_err());
    }
}
