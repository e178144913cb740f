//! Repository implementations for data persistence.
//!
//! [`DocumentRepository`] is the single implementation of [`Repository`];
//! the resource repositories add relationship and index queries on top of it.

mod gala_repository;
mod performer_repository;
mod program_repository;

pub use gala_repository::*;
pub use performer_repository::*;
pub use program_repository::*;

use async_trait::async_trait;
use chrono::Utc;
use gala_domain::{Entity, EntityMetadata};
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::{debug, instrument};

use crate::keys::{KeyGenerator, RandomKeyGenerator};
use crate::store::{Document, DocumentStore};
use crate::{Error, Result};

/// Common repository trait for CRUD operations.
#[async_trait]
pub trait Repository<E: Entity>: Send + Sync {
    /// Store a new entity under a freshly generated key.
    ///
    /// Fails with [`Error::Conflict`] if the generated key equals the id the
    /// caller put on `entity`.
    async fn create_entity(&self, entity: E) -> Result<E>;

    /// Load an entity, failing with [`Error::NotFound`] when absent.
    async fn read_entity(&self, key: E::Id) -> Result<E>;

    /// Replace the mutable fields of the stored entity with those of `patch`.
    async fn update_entity(&self, key: E::Id, patch: E) -> Result<E>;

    /// Remove (`hard_delete`) or flag as deleted; returns the last known state.
    async fn delete_entity(&self, key: E::Id, hard_delete: bool) -> Result<E>;

    /// Load every entity found for `keys`. Missing keys are skipped.
    async fn query_entities_by_keys(&self, keys: &[E::Id]) -> Result<Vec<E>>;
}

/// Generic [`Repository`] over a [`DocumentStore`].
pub struct DocumentRepository<E, S> {
    store: Arc<S>,
    keys: Arc<dyn KeyGenerator>,
    _entity: PhantomData<fn() -> E>,
}

impl<E, S> DocumentRepository<E, S>
where
    E: Document,
    S: DocumentStore,
{
    /// Create a repository using random keys.
    pub fn new(store: Arc<S>) -> Self {
        Self::with_key_generator(store, Arc::new(RandomKeyGenerator))
    }

    /// Create a repository drawing keys from `keys`.
    pub fn with_key_generator(store: Arc<S>, keys: Arc<dyn KeyGenerator>) -> Self {
        Self {
            store,
            keys,
            _entity: PhantomData,
        }
    }

    /// The underlying store
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    async fn load_existing(&self, key: E::Id) -> Result<E> {
        self.store
            .load::<E>(key)
            .await?
            .ok_or_else(|| Error::not_found::<E>(key))
    }
}

impl<E, S> Clone for DocumentRepository<E, S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            keys: Arc::clone(&self.keys),
            _entity: PhantomData,
        }
    }
}

#[async_trait]
impl<E, S> Repository<E> for DocumentRepository<E, S>
where
    E: Document,
    S: DocumentStore,
{
    #[instrument(skip_all, fields(kind = E::KIND))]
    async fn create_entity(&self, mut entity: E) -> Result<E> {
        let key = E::Id::from(self.keys.next_key());
        if key == entity.id() {
            return Err(Error::Conflict(format!("{} {} already exists", E::KIND, key)));
        }

        entity.set_id(key);
        *entity.metadata_mut() = EntityMetadata::created(Utc::now());

        self.store.save(entity).await?;
        let created = self.load_existing(key).await?;

        debug!(key = %key, "Entity created");
        Ok(created)
    }

    #[instrument(skip_all, fields(kind = E::KIND, key = %key))]
    async fn read_entity(&self, key: E::Id) -> Result<E> {
        self.load_existing(key).await
    }

    #[instrument(skip_all, fields(kind = E::KIND, key = %key))]
    async fn update_entity(&self, key: E::Id, patch: E) -> Result<E> {
        let original = self.load_existing(key).await?;

        let assign = E::capabilities()
            .assign()
            .ok_or_else(|| Error::NotSupported(format!("{} is not assignable", E::KIND)))?;

        let mut updated = assign(&original, &patch);
        updated.metadata_mut().touch(Utc::now());

        let saved = self.store.save(updated).await?;
        debug!("Entity updated");
        Ok(saved)
    }

    #[instrument(skip_all, fields(kind = E::KIND, key = %key, hard_delete = hard_delete))]
    async fn delete_entity(&self, key: E::Id, hard_delete: bool) -> Result<E> {
        let original = self.load_existing(key).await?;

        if hard_delete {
            self.store.delete::<E>(key).await?;
            debug!("Entity removed");
            return Ok(original);
        }

        let soft_delete = E::capabilities()
            .soft_delete()
            .ok_or_else(|| Error::NotFound(E::KIND.to_string()))?;

        let mut deleted = soft_delete(&original);
        deleted.metadata_mut().touch(Utc::now());

        let saved = self.store.save(deleted).await?;
        debug!("Entity flagged as deleted");
        Ok(saved)
    }

    #[instrument(skip_all, fields(kind = E::KIND, count = keys.len()))]
    async fn query_entities_by_keys(&self, keys: &[E::Id]) -> Result<Vec<E>> {
        if keys.is_empty() {
            return Ok(Vec::new());
        }

        let found = self.store.batch_get::<E>(keys).await?;
        debug!(found = found.len(), "Entities loaded by key");
        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryDocumentStore;
    use gala_domain::{Capabilities, PerformerId};
    use serde::{Deserialize, Serialize};

    /// A record registered without any optional capability.
    #[derive(Debug, Clone, Serialize, Deserialize)]
    #[serde(rename_all = "PascalCase")]
    struct Note {
        id: PerformerId,
        text: String,
        #[serde(flatten)]
        metadata: EntityMetadata,
    }

    impl Entity for Note {
        type Id = PerformerId;
        const KIND: &'static str = "Note";

        fn id(&self) -> PerformerId {
            self.id
        }

        fn set_id(&mut self, id: PerformerId) {
            self.id = id;
        }

        fn metadata(&self) -> &EntityMetadata {
            &self.metadata
        }

        fn metadata_mut(&mut self) -> &mut EntityMetadata {
            &mut self.metadata
        }

        fn capabilities() -> Capabilities<Self> {
            Capabilities::none()
        }
    }

    impl Document for Note {
        const TABLE: &'static str = "Notes";
    }

    fn note(text: &str) -> Note {
        Note {
            id: PerformerId::nil(),
            text: text.to_string(),
            metadata: EntityMetadata::default(),
        }
    }

    fn repository() -> DocumentRepository<Note, InMemoryDocumentStore> {
        DocumentRepository::new(Arc::new(InMemoryDocumentStore::new()))
    }

    #[tokio::test]
    async fn test_update_without_assign_capability_is_not_supported() {
        let repo = repository();
        let created = repo.create_entity(note("a")).await.unwrap();

        let err = repo.update_entity(created.id, note("b")).await.unwrap_err();
        assert!(matches!(err, Error::NotSupported(_)));
    }

    #[tokio::test]
    async fn test_soft_delete_without_capability_is_not_found() {
        let repo = repository();
        let created = repo.create_entity(note("a")).await.unwrap();

        let err = repo.delete_entity(created.id, false).await.unwrap_err();
        match err {
            Error::NotFound(message) => assert_eq!(message, "Note"),
            other => panic!("unexpected error: {other:?}"),
        }

        // Still stored
        assert_eq!(repo.read_entity(created.id).await.unwrap().text, "a");
    }

    #[tokio::test]
    async fn test_hard_delete_without_capability_succeeds() {
        let repo = repository();
        let created = repo.create_entity(note("a")).await.unwrap();

        let removed = repo.delete_entity(created.id, true).await.unwrap();
        assert_eq!(removed.id, created.id);
        assert!(repo.store().is_empty::<Note>());
    }

    #[tokio::test]
    async fn test_empty_key_list() {
        let repo = repository();
        assert!(repo.query_entities_by_keys(&[]).await.unwrap().is_empty());
    }
}
