//! In-process document store
//!
//! Backs `memory://` deployments and the test suite. Fault switches make
//! reads, writes or collection listing fail on demand.

use std::collections::BTreeMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use serde_json::Value;

use super::{
    Document, DocumentStore, ID_FIELD, StoreError, matches_filter, new_document_id,
    stamp_timestamps,
};

pub struct MemoryStore {
    name: String,
    collections: RwLock<BTreeMap<String, Vec<Document>>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    fail_listing: AtomicBool,
}

impl MemoryStore {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            collections: RwLock::new(BTreeMap::new()),
            fail_reads: AtomicBool::new(false),
            fail_writes: AtomicBool::new(false),
            fail_listing: AtomicBool::new(false),
        }
    }

    /// Make `count` and `query` fail.
    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Make `insert` fail.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Make `list_collections` fail.
    pub fn set_fail_listing(&self, fail: bool) {
        self.fail_listing.store(fail, Ordering::SeqCst);
    }

    fn check(flag: &AtomicBool, operation: &str) -> Result<(), StoreError> {
        if flag.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable(format!(
                "injected {} failure",
                operation
            )));
        }
        Ok(())
    }

    fn poisoned<T>(_: T) -> StoreError {
        StoreError::Unavailable("memory store lock poisoned".to_string())
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    fn name(&self) -> &str {
        &self.name
    }

    async fn count(&self, collection: &str, filter: &Document) -> Result<u64, StoreError> {
        Self::check(&self.fail_reads, "read")?;
        let collections = self.collections.read().map_err(Self::poisoned)?;
        let count = collections
            .get(collection)
            .map(|docs| docs.iter().filter(|d| matches_filter(d, filter)).count())
            .unwrap_or(0);
        Ok(count as u64)
    }

    async fn insert(&self, collection: &str, mut document: Document) -> Result<String, StoreError> {
        Self::check(&self.fail_writes, "write")?;
        let id = new_document_id();
        stamp_timestamps(&mut document);
        document.insert(ID_FIELD.to_string(), Value::String(id.clone()));

        let mut collections = self.collections.write().map_err(Self::poisoned)?;
        collections
            .entry(collection.to_string())
            .or_default()
            .push(document);
        Ok(id)
    }

    async fn query(
        &self,
        collection: &str,
        filter: Option<&Document>,
    ) -> Result<Vec<Document>, StoreError> {
        Self::check(&self.fail_reads, "read")?;
        let collections = self.collections.read().map_err(Self::poisoned)?;
        let docs = collections
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .filter(|d| filter.is_none_or(|f| matches_filter(d, f)))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        Ok(docs)
    }

    async fn list_collections(&self) -> Result<Vec<String>, StoreError> {
        Self::check(&self.fail_listing, "listing")?;
        let collections = self.collections.read().map_err(Self::poisoned)?;
        Ok(collections.keys().cloned().collect())
    }
}
