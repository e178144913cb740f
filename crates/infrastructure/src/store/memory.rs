//! Process-local document store.
//!
//! Documents are kept in their serialized JSON form so that the store
//! behaves like a real document database: callers never share memory with
//! stored records, and secondary index lookups compare attribute values.

use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::Value;
use std::collections::HashMap;
use tracing::{debug, instrument};
use uuid::Uuid;

use super::{
    check_version, ensure_indexed, unique_keys, Document, DocumentStore, IndexKey,
    VERSION_ATTRIBUTE,
};
use crate::Result;

type Table = HashMap<Uuid, Value>;

/// In-memory [`DocumentStore`].
#[derive(Debug, Default)]
pub struct InMemoryDocumentStore {
    tables: RwLock<HashMap<&'static str, Table>>,
}

impl InMemoryDocumentStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents stored for `D`
    pub fn len<D: Document>(&self) -> usize {
        self.tables.read().get(D::TABLE).map_or(0, HashMap::len)
    }

    /// Whether no documents are stored for `D`
    pub fn is_empty<D: Document>(&self) -> bool {
        self.len::<D>() == 0
    }

    /// Drop every table
    pub fn clear(&self) {
        self.tables.write().clear();
    }

    fn decode<D: Document>(value: &Value) -> Result<D> {
        Ok(serde_json::from_value(value.clone())?)
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    #[instrument(skip(self), fields(table = D::TABLE))]
    async fn load<D: Document>(&self, key: D::Id) -> Result<Option<D>> {
        let key: Uuid = key.into();
        let tables = self.tables.read();
        tables
            .get(D::TABLE)
            .and_then(|table| table.get(&key))
            .map(Self::decode)
            .transpose()
    }

    #[instrument(skip(self, document), fields(table = D::TABLE, key = %document.id()))]
    async fn save<D: Document>(&self, document: D) -> Result<D> {
        let key: Uuid = document.id().into();
        let mut value = serde_json::to_value(&document)?;

        let mut tables = self.tables.write();
        let table = tables.entry(D::TABLE).or_default();

        let stored = table
            .get(&key)
            .and_then(|existing| existing.get(VERSION_ATTRIBUTE))
            .and_then(Value::as_i64);
        let next = check_version(&document, stored)?;

        if let (Some(object), Some(version)) = (value.as_object_mut(), next) {
            object.insert(VERSION_ATTRIBUTE.to_string(), Value::from(version));
        }

        let saved = Self::decode(&value)?;
        table.insert(key, value);
        debug!(version = ?next, "Document saved");

        Ok(saved)
    }

    #[instrument(skip(self), fields(table = D::TABLE))]
    async fn delete<D: Document>(&self, key: D::Id) -> Result<()> {
        let key: Uuid = key.into();
        let removed = self
            .tables
            .write()
            .get_mut(D::TABLE)
            .and_then(|table| table.remove(&key));
        debug!(existed = removed.is_some(), "Document deleted");
        Ok(())
    }

    #[instrument(skip(self, keys), fields(table = D::TABLE, count = keys.len()))]
    async fn batch_get<D: Document>(&self, keys: &[D::Id]) -> Result<Vec<D>> {
        let tables = self.tables.read();
        let Some(table) = tables.get(D::TABLE) else {
            return Ok(Vec::new());
        };

        unique_keys(keys)
            .into_iter()
            .filter_map(|key| {
                let key: Uuid = key.into();
                table.get(&key)
            })
            .map(Self::decode)
            .collect()
    }

    #[instrument(skip(self), fields(table = D::TABLE, index = key.index.name))]
    async fn query<D: Document>(&self, key: &IndexKey) -> Result<Vec<D>> {
        ensure_indexed::<D>(key)?;
        let target = key.value.to_json();
        let tables = self.tables.read();
        let Some(table) = tables.get(D::TABLE) else {
            return Ok(Vec::new());
        };

        table
            .values()
            .filter(|value| value.get(key.index.attribute) == Some(&target))
            .map(Self::decode)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{IndexValue, YEAR_INDEX};
    use crate::Error;
    use gala_domain::{Entity, Gala, GalaId, Program};

    fn gala(name: &str, year: u32) -> Gala {
        let mut gala = Gala::new(name, year, Vec::new());
        gala.set_id(GalaId::new());
        gala
    }

    #[tokio::test]
    async fn test_first_save_assigns_version_zero() {
        let store = InMemoryDocumentStore::new();
        let saved = store.save(gala("Spring", 2020)).await.unwrap();
        assert_eq!(saved.metadata().version_number, Some(0));
        assert_eq!(store.len::<Gala>(), 1);
    }

    #[tokio::test]
    async fn test_save_increments_version() {
        let store = InMemoryDocumentStore::new();
        let saved = store.save(gala("Spring", 2020)).await.unwrap();
        let saved = store.save(saved).await.unwrap();
        assert_eq!(saved.metadata().version_number, Some(1));
    }

    #[tokio::test]
    async fn test_stale_save_conflicts() {
        let store = InMemoryDocumentStore::new();
        let first = store.save(gala("Spring", 2020)).await.unwrap();
        store.save(first.clone()).await.unwrap();

        let err = store.save(first).await.unwrap_err();
        assert!(matches!(
            err,
            Error::VersionConflict {
                expected: Some(0),
                actual: Some(1),
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_batch_get_skips_missing_and_repeats() {
        let store = InMemoryDocumentStore::new();
        let a = store.save(gala("A", 2020)).await.unwrap();
        let b = store.save(gala("B", 2021)).await.unwrap();

        let found: Vec<Gala> = store
            .batch_get(&[b.id, GalaId::new(), a.id, b.id])
            .await
            .unwrap();
        let ids: Vec<_> = found.iter().map(|g| g.id).collect();
        assert_eq!(ids, vec![b.id, a.id]);
    }

    #[tokio::test]
    async fn test_query_matches_attribute() {
        let store = InMemoryDocumentStore::new();
        store.save(gala("A", 2020)).await.unwrap();
        store.save(gala("B", 2020)).await.unwrap();
        store.save(gala("C", 2021)).await.unwrap();

        let key = IndexKey::new(YEAR_INDEX, IndexValue::Number(2020));
        let found: Vec<Gala> = store.query(&key).await.unwrap();
        assert_eq!(found.len(), 2);
        assert!(found.iter().all(|g| g.year == 2020));
    }

    #[tokio::test]
    async fn test_query_on_unindexed_table_is_not_supported() {
        let store = InMemoryDocumentStore::new();
        let key = IndexKey::new(YEAR_INDEX, IndexValue::Number(2020));

        let err = store.query::<Program>(&key).await.unwrap_err();
        assert!(matches!(err, Error::NotSupported(_)));
    }

    #[tokio::test]
    async fn test_delete_absent_key_is_ok() {
        let store = InMemoryDocumentStore::new();
        store.delete::<Gala>(GalaId::new()).await.unwrap();
        assert!(store.is_empty::<Gala>());
    }

    #[tokio::test]
    async fn test_clear() {
        let store = InMemoryDocumentStore::new();
        store.save(gala("A", 2020)).await.unwrap();
        store.clear();
        assert!(store.is_empty::<Gala>());
    }
}
