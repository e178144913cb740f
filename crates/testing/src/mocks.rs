//! Test doubles for the storage seams.
//!
//! Provides deterministic key generators and a store wrapper that counts
//! round trips, for asserting how many store calls an operation makes.

use async_trait::async_trait;
use gala_infrastructure::{Document, DocumentStore, IndexKey, KeyGenerator, Result};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use uuid::Uuid;

/// Keys `00000000-0000-0000-0000-000000000001`, `...02`, and so on.
#[derive(Debug, Default)]
pub struct SequenceKeyGenerator {
    next: AtomicU64,
}

impl SequenceKeyGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// The `n`th key this generator hands out (1-based).
    pub fn key(n: u64) -> Uuid {
        Uuid::from_u64_pair(0, n)
    }
}

impl KeyGenerator for SequenceKeyGenerator {
    fn next_key(&self) -> Uuid {
        let n = self.next.fetch_add(1, Ordering::SeqCst) + 1;
        Self::key(n)
    }
}

/// Hands out a scripted list of keys, then falls back to random ones.
#[derive(Debug, Default)]
pub struct FixedKeyGenerator {
    keys: Mutex<VecDeque<Uuid>>,
}

impl FixedKeyGenerator {
    pub fn new(keys: impl IntoIterator<Item = Uuid>) -> Self {
        Self {
            keys: Mutex::new(keys.into_iter().collect()),
        }
    }

    /// Always the same key.
    pub fn single(key: Uuid) -> Arc<Self> {
        Arc::new(Self::new(std::iter::repeat(key).take(64)))
    }
}

impl KeyGenerator for FixedKeyGenerator {
    fn next_key(&self) -> Uuid {
        self.keys.lock().pop_front().unwrap_or_else(Uuid::new_v4)
    }
}

/// Round trips observed by a [`RecordingStore`].
#[derive(Debug, Default)]
pub struct StoreCalls {
    pub loads: AtomicUsize,
    pub saves: AtomicUsize,
    pub deletes: AtomicUsize,
    pub batch_gets: AtomicUsize,
    pub queries: AtomicUsize,
}

impl StoreCalls {
    /// Every call so far
    pub fn total(&self) -> usize {
        self.loads() + self.saves() + self.deletes() + self.batch_gets() + self.queries()
    }

    pub fn loads(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }

    pub fn saves(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    pub fn deletes(&self) -> usize {
        self.deletes.load(Ordering::SeqCst)
    }

    pub fn batch_gets(&self) -> usize {
        self.batch_gets.load(Ordering::SeqCst)
    }

    pub fn queries(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    pub fn reset(&self) {
        for counter in [
            &self.loads,
            &self.saves,
            &self.deletes,
            &self.batch_gets,
            &self.queries,
        ] {
            counter.store(0, Ordering::SeqCst);
        }
    }
}

/// Wraps a store and counts every call made through it.
#[derive(Debug)]
pub struct RecordingStore<S> {
    inner: S,
    calls: StoreCalls,
}

impl<S: DocumentStore> RecordingStore<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            calls: StoreCalls::default(),
        }
    }

    pub fn calls(&self) -> &StoreCalls {
        &self.calls
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }
}

#[async_trait]
impl<S: DocumentStore> DocumentStore for RecordingStore<S> {
    async fn load<D: Document>(&self, key: D::Id) -> Result<Option<D>> {
        self.calls.loads.fetch_add(1, Ordering::SeqCst);
        self.inner.load(key).await
    }

    async fn save<D: Document>(&self, document: D) -> Result<D> {
        self.calls.saves.fetch_add(1, Ordering::SeqCst);
        self.inner.save(document).await
    }

    async fn delete<D: Document>(&self, key: D::Id) -> Result<()> {
        self.calls.deletes.fetch_add(1, Ordering::SeqCst);
        self.inner.delete::<D>(key).await
    }

    async fn batch_get<D: Document>(&self, keys: &[D::Id]) -> Result<Vec<D>> {
        self.calls.batch_gets.fetch_add(1, Ordering::SeqCst);
        self.inner.batch_get(keys).await
    }

    async fn query<D: Document>(&self, key: &IndexKey) -> Result<Vec<D>> {
        self.calls.queries.fetch_add(1, Ordering::SeqCst);
        self.inner.query(key).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gala_domain::{Gala, GalaId};
    use gala_infrastructure::InMemoryDocumentStore;

    #[test]
    fn test_sequence_keys() {
        let keys = SequenceKeyGenerator::new();
        assert_eq!(keys.next_key(), SequenceKeyGenerator::key(1));
        assert_eq!(keys.next_key(), SequenceKeyGenerator::key(2));
    }

    #[test]
    fn test_fixed_keys_then_random() {
        let first = Uuid::new_v4();
        let keys = FixedKeyGenerator::new([first]);
        assert_eq!(keys.next_key(), first);
        assert_ne!(keys.next_key(), first);
    }

    #[tokio::test]
    async fn test_recording_store_counts_calls() {
        let store = RecordingStore::new(InMemoryDocumentStore::new());
        let missing: Option<Gala> = store.load(GalaId::new()).await.unwrap();
        assert!(missing.is_none());
        store.delete::<Gala>(GalaId::new()).await.unwrap();

        assert_eq!(store.calls().loads(), 1);
        assert_eq!(store.calls().deletes(), 1);
        assert_eq!(store.calls().total(), 2);

        store.calls().reset();
        assert_eq!(store.calls().total(), 0);
    }
}
