//! PostgreSQL document store
//!
//! All collections share one JSONB table inside the configured schema:
//!
//! ```text
//! <schema>.documents (id TEXT, collection TEXT, body JSONB, created_at TIMESTAMPTZ)
//! ```
//!
//! Equality filters become JSONB containment (`body @> filter`).

use async_trait::async_trait;
use serde_json::Value;
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::types::Json;
use std::time::Duration;

use crate::config::is_valid_schema_name;

use super::{Document, DocumentStore, ID_FIELD, StoreError, new_document_id, stamp_timestamps};

/// PostgreSQL-backed document store
pub struct PgDocumentStore {
    pool: PgPool,
    schema: String,
}

impl PgDocumentStore {
    /// Connect, check the server responds and make sure the document table exists.
    ///
    /// `schema` must be a plain SQL identifier.
    pub async fn connect(database_url: &str, schema: &str) -> Result<Self, StoreError> {
        if !is_valid_schema_name(schema) {
            return Err(StoreError::Unavailable(format!(
                "invalid schema name '{}'",
                schema
            )));
        }

        let pool = PgPoolOptions::new()
            .max_connections(10)
            .acquire_timeout(Duration::from_secs(5))
            .connect(database_url)
            .await?;

        tracing::info!("PostgreSQL connection pool established (schema '{}')", schema);

        let store = Self {
            pool,
            schema: schema.to_string(),
        };
        store.health_check().await?;
        store.init_schema().await?;
        Ok(store)
    }

    /// Round-trip a trivial query.
    pub async fn health_check(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn init_schema(&self) -> Result<(), StoreError> {
        sqlx::query(&format!("CREATE SCHEMA IF NOT EXISTS {}", self.schema))
            .execute(&self.pool)
            .await?;

        sqlx::query(&format!(
            r#"CREATE TABLE IF NOT EXISTS {} (
                id TEXT PRIMARY KEY,
                collection TEXT NOT NULL,
                body JSONB NOT NULL,
                created_at TIMESTAMPTZ NOT NULL DEFAULT now()
            )"#,
            self.table()
        ))
        .execute(&self.pool)
        .await?;

        sqlx::query(&format!(
            "CREATE INDEX IF NOT EXISTS documents_collection_idx ON {} (collection)",
            self.table()
        ))
        .execute(&self.pool)
        .await?;

        tracing::debug!("Document table {} ready", self.table());
        Ok(())
    }

    fn table(&self) -> String {
        format!("{}.documents", self.schema)
    }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    fn name(&self) -> &str {
        &self.schema
    }

    async fn count(&self, collection: &str, filter: &Document) -> Result<u64, StoreError> {
        let count: i64 = sqlx::query_scalar(&format!(
            "SELECT COUNT(*) FROM {} WHERE collection = $1 AND body @> $2",
            self.table()
        ))
        .bind(collection)
        .bind(Json(filter))
        .fetch_one(&self.pool)
        .await?;

        Ok(count.max(0) as u64)
    }

    async fn insert(&self, collection: &str, mut document: Document) -> Result<String, StoreError> {
        let id = new_document_id();
        document.remove(ID_FIELD);
        stamp_timestamps(&mut document);

        sqlx::query(&format!(
            "INSERT INTO {} (id, collection, body) VALUES ($1, $2, $3)",
            self.table()
        ))
        .bind(&id)
        .bind(collection)
        .bind(Json(&document))
        .execute(&self.pool)
        .await?;

        Ok(id)
    }

    async fn query(
        &self,
        collection: &str,
        filter: Option<&Document>,
    ) -> Result<Vec<Document>, StoreError> {
        let match_all = Document::new();
        let filter = filter.unwrap_or(&match_all);

        let rows: Vec<(String, Json<Document>)> = sqlx::query_as(&format!(
            "SELECT id, body FROM {} WHERE collection = $1 AND body @> $2 ORDER BY created_at, id",
            self.table()
        ))
        .bind(collection)
        .bind(Json(filter))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(id, Json(mut body))| {
                body.insert(ID_FIELD.to_string(), Value::String(id));
                body
            })
            .collect())
    }

    async fn list_collections(&self) -> Result<Vec<String>, StoreError> {
        let names: Vec<String> = sqlx::query_scalar(&format!(
            "SELECT DISTINCT collection FROM {} ORDER BY collection",
            self.table()
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(names)
    }
}
