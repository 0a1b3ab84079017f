//! Document store access
//!
//! Schemaless documents (`serde_json::Map`) grouped into named collections.
//! The store assigns each inserted document an identity, exposed under
//! [`ID_FIELD`]. Typed records are produced by [`from_document`], which renames
//! the identity to the public `id` field and validates required fields.
//!
//! Implementations:
//! - [`memory::MemoryStore`]: in-process, used by `memory://` and tests
//! - [`postgres::PgDocumentStore`]: PostgreSQL JSONB table

pub mod memory;
pub mod postgres;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use thiserror::Error;

use crate::config::{AppConfig, MEMORY_STORE_URL};

pub use memory::MemoryStore;
pub use postgres::PgDocumentStore;

/// A schemaless document.
pub type Document = serde_json::Map<String, Value>;

/// Store-assigned identity field.
pub const ID_FIELD: &str = "_id";
/// Public identity field on API records.
pub const PUBLIC_ID_FIELD: &str = "id";

pub mod collections {
    pub const RESTAURANT: &str = "restaurant";
    pub const MENU_ITEM: &str = "menuitem";
    pub const ORDER: &str = "order";
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Malformed {collection} document: {reason}")]
    Deserialization { collection: String, reason: String },

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Accessor over a document store.
///
/// Filters are equality matches on top-level fields; an empty filter matches
/// every document in the collection.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Database name, reported by diagnostics
    fn name(&self) -> &str;

    async fn count(&self, collection: &str, filter: &Document) -> Result<u64, StoreError>;

    /// Insert a document and return its store-assigned identity.
    async fn insert(&self, collection: &str, document: Document) -> Result<String, StoreError>;

    async fn query(
        &self,
        collection: &str,
        filter: Option<&Document>,
    ) -> Result<Vec<Document>, StoreError>;

    async fn list_collections(&self) -> Result<Vec<String>, StoreError>;
}

/// Open the configured store, or `None` for demo mode.
///
/// A PostgreSQL connection failure is logged and degrades to demo mode.
pub async fn connect(config: &AppConfig) -> Option<Arc<dyn DocumentStore>> {
    let Some((url, name)) = config.store_settings() else {
        tracing::info!("No database configured, running in demo mode");
        return None;
    };

    if url == MEMORY_STORE_URL {
        tracing::info!("Using in-memory document store '{}'", name);
        return Some(Arc::new(MemoryStore::new(name)));
    }

    match PgDocumentStore::connect(url, name).await {
        Ok(store) => Some(Arc::new(store)),
        Err(e) => {
            tracing::warn!("Database connection failed, running in demo mode: {}", e);
            None
        }
    }
}

/// Serialize a record into a document.
pub fn to_document<T: Serialize>(value: &T) -> Result<Document, StoreError> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        other => Err(StoreError::Deserialization {
            collection: String::new(),
            reason: format!("expected an object, got {}", other),
        }),
    }
}

/// Serialize a record for insertion, dropping its public `id` so the store
/// assigns a fresh identity.
pub fn to_new_document<T: Serialize>(value: &T) -> Result<Document, StoreError> {
    let mut document = to_document(value)?;
    document.remove(PUBLIC_ID_FIELD);
    Ok(document)
}

/// Map a stored document into a typed record.
pub fn from_document<T: DeserializeOwned>(
    collection: &str,
    mut document: Document,
) -> Result<T, StoreError> {
    let id = document
        .remove(ID_FIELD)
        .ok_or_else(|| StoreError::Deserialization {
            collection: collection.to_string(),
            reason: format!("missing field `{}`", ID_FIELD),
        })?;

    let id = match id {
        Value::String(s) => s,
        other => other.to_string(),
    };
    document.insert(PUBLIC_ID_FIELD.to_string(), Value::String(id));

    serde_json::from_value(Value::Object(document)).map_err(|e| StoreError::Deserialization {
        collection: collection.to_string(),
        reason: e.to_string(),
    })
}

/// Single-field equality filter.
pub fn filter_eq(field: &str, value: impl Into<Value>) -> Document {
    let mut filter = Document::new();
    filter.insert(field.to_string(), value.into());
    filter
}

pub fn matches_filter(document: &Document, filter: &Document) -> bool {
    filter
        .iter()
        .all(|(field, expected)| document.get(field) == Some(expected))
}

/// Set `created_at` and `updated_at` on a document about to be inserted.
pub fn stamp_timestamps(document: &mut Document) {
    let now = Value::String(Utc::now().to_rfc3339());
    document.insert("created_at".to_string(), now.clone());
    document.insert("updated_at".to_string(), now);
}

/// Fresh store identity: 32 lowercase hex characters.
pub fn new_document_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}
