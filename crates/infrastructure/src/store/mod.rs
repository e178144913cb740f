//! Document store abstraction.
//!
//! A document store keeps one logical table per record kind, keyed by the
//! record's primary key, with optional secondary indexes on plain attributes.
//! Every implementation enforces the same optimistic concurrency protocol on
//! [`DocumentStore::save`]:
//!
//! - the incoming document's `VersionNumber` must equal the stored one
//!   (absent when no record exists), otherwise [`Error::VersionConflict`];
//! - a successful write stores `previous + 1`, or `0` for a first write.
//!
//! Dropping an operation's future abandons the store call; nothing is rolled
//! back.

use async_trait::async_trait;
use gala_domain::Entity;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use crate::{Error, Result};

#[cfg(feature = "dynamodb")]
pub mod dynamodb;
pub mod memory;

#[cfg(feature = "dynamodb")]
pub use dynamodb::DynamoDbDocumentStore;
pub use memory::InMemoryDocumentStore;

/// Attribute holding the primary key
pub const KEY_ATTRIBUTE: &str = "Id";

/// Attribute holding the concurrency token
pub const VERSION_ATTRIBUTE: &str = "VersionNumber";

/// A secondary index over one attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SecondaryIndex {
    /// Index name
    pub name: &'static str,
    /// Indexed attribute
    pub attribute: &'static str,
}

/// Index over a gala's `Year` attribute
pub const YEAR_INDEX: SecondaryIndex = SecondaryIndex {
    name: "YearIndex",
    attribute: "Year",
};

/// Value looked up in a secondary index.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IndexValue {
    Number(i64),
    Text(String),
}

impl IndexValue {
    /// JSON form, as the attribute appears in a stored document
    pub fn to_json(&self) -> Value {
        match self {
            Self::Number(n) => Value::from(*n),
            Self::Text(s) => Value::from(s.as_str()),
        }
    }
}

/// An exact-match lookup against a secondary index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexKey {
    pub index: SecondaryIndex,
    pub value: IndexValue,
}

impl IndexKey {
    /// Create a lookup for `value` in `index`
    pub fn new(index: SecondaryIndex, value: IndexValue) -> Self {
        Self { index, value }
    }
}

/// A record kind the store knows how to persist.
pub trait Document: Entity + Serialize + DeserializeOwned {
    /// Logical table name
    const TABLE: &'static str;

    /// Secondary indexes maintained for the table
    const INDEXES: &'static [SecondaryIndex] = &[];
}

/// Persistence primitives consumed by the repositories.
#[async_trait]
pub trait DocumentStore: Send + Sync + 'static {
    /// Load a document by primary key.
    async fn load<D: Document>(&self, key: D::Id) -> Result<Option<D>>;

    /// Write a document, returning it as persisted (with its new version).
    async fn save<D: Document>(&self, document: D) -> Result<D>;

    /// Remove a document. Removing an absent key is not an error.
    async fn delete<D: Document>(&self, key: D::Id) -> Result<()>;

    /// Fetch many documents in one round trip. Missing keys are omitted and
    /// repeated keys are returned once.
    async fn batch_get<D: Document>(&self, keys: &[D::Id]) -> Result<Vec<D>>;

    /// Fetch every document whose indexed attribute equals the lookup value.
    async fn query<D: Document>(&self, key: &IndexKey) -> Result<Vec<D>>;
}

/// Fail unless the stored version matches the incoming one.
pub(crate) fn check_version<D: Document>(
    document: &D,
    stored: Option<i64>,
) -> Result<Option<i64>> {
    let expected = document.metadata().version_number;
    if expected != stored {
        return Err(Error::VersionConflict {
            kind: D::KIND,
            key: document.id().to_string(),
            expected,
            actual: stored,
        });
    }

    Ok(Some(stored.map_or(0, |version| version + 1)))
}

/// Fail unless `D` maintains the index being queried.
pub(crate) fn ensure_indexed<D: Document>(key: &IndexKey) -> Result<()> {
    if D::INDEXES.contains(&key.index) {
        Ok(())
    } else {
        Err(Error::NotSupported(format!(
            "{} has no index {}",
            D::KIND,
            key.index.name
        )))
    }
}

/// Keys with repeats removed, first occurrence kept.
pub(crate) fn unique_keys<K: Copy + Eq + std::hash::Hash>(keys: &[K]) -> Vec<K> {
    let mut seen = std::collections::HashSet::with_capacity(keys.len());
    keys.iter().copied().filter(|key| seen.insert(*key)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_value_json() {
        assert_eq!(IndexValue::Number(2020).to_json(), serde_json::json!(2020));
        assert_eq!(
            IndexValue::Text("Rat".into()).to_json(),
            serde_json::json!("Rat")
        );
    }

    #[test]
    fn test_unique_keys_keeps_first_occurrence() {
        assert_eq!(unique_keys(&[3, 1, 3, 2, 1]), vec![3, 1, 2]);
    }
}
