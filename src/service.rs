//! Ordering service
//!
//! Translates requests into document-store operations, or into demo fixture
//! lookups when no store is configured.
//!
//! Failure policy:
//! - Reads (`list_restaurants`, `list_menu`) never fail. A store error is
//!   logged and replaced by the demo fixtures.
//! - Writes (`seed_demo_data`, `create_order`) surface store errors, since a
//!   failed write must not be acknowledged as success.

use std::env;
use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

use crate::config::{DATABASE_NAME_VAR, DATABASE_URL_VAR};
use crate::fixtures::{self, DEMO_ORDER_ID};
use crate::models::{MenuItem, Order, OrderError, OrderRequest, Restaurant};
use crate::store::{
    Document, DocumentStore, StoreError, collections, filter_eq, from_document, to_document,
    to_new_document,
};

/// Maximum number of collection names reported by diagnostics
const DIAGNOSTIC_COLLECTION_LIMIT: usize = 10;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Order(#[from] OrderError),
}

/// Whether requests are served from the store or from demo fixtures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum StorageMode {
    Demo,
    Db,
}

/// Service and store status report
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Diagnostics {
    #[schema(example = "✅ Running")]
    pub backend: String,
    #[schema(example = "✅ Connected & Working")]
    pub database: String,
    /// Whether DATABASE_URL is set; the value itself is never reported
    #[schema(example = "✅ Set")]
    pub database_url: String,
    /// Whether DATABASE_NAME is set
    #[schema(example = "✅ Set")]
    pub database_name: String,
    #[schema(example = "Connected")]
    pub connection_status: String,
    pub collections: Vec<String>,
}

#[derive(Clone)]
pub struct OrderingService {
    store: Option<Arc<dyn DocumentStore>>,
}

impl OrderingService {
    /// `None` selects demo mode.
    pub fn new(store: Option<Arc<dyn DocumentStore>>) -> Self {
        Self { store }
    }

    pub fn demo() -> Self {
        Self::new(None)
    }

    pub fn mode(&self) -> StorageMode {
        match self.store {
            Some(_) => StorageMode::Db,
            None => StorageMode::Demo,
        }
    }

    pub fn health(&self) -> &'static str {
        "SnackSprint backend is running"
    }

    /// Insert the demo restaurant and its menu into an empty store.
    ///
    /// A no-op in demo mode and when any restaurant already exists.
    pub async fn seed_demo_data(&self) -> Result<StorageMode, ServiceError> {
        let Some(store) = &self.store else {
            return Ok(StorageMode::Demo);
        };

        let existing = store
            .count(collections::RESTAURANT, &Document::new())
            .await?;
        if existing > 0 {
            tracing::debug!("Seed skipped, {} restaurants present", existing);
            return Ok(StorageMode::Db);
        }

        let restaurant_id = store
            .insert(
                collections::RESTAURANT,
                to_new_document(&fixtures::demo_restaurant())?,
            )
            .await?;

        let menu = fixtures::demo_menu();
        for item in &menu {
            let mut document = to_new_document(item)?;
            document.insert("restaurant_id".to_string(), restaurant_id.clone().into());
            store.insert(collections::MENU_ITEM, document).await?;
        }

        tracing::info!(
            "Seeded restaurant {} with {} menu items",
            restaurant_id,
            menu.len()
        );
        Ok(StorageMode::Db)
    }

    /// All restaurants, falling back to the demo restaurant.
    pub async fn list_restaurants(&self) -> Vec<Restaurant> {
        with_demo_fallback(self.fetch_restaurants().await, "restaurants", || {
            vec![fixtures::demo_restaurant()]
        })
    }

    /// All restaurants, without the fallback policy.
    pub async fn fetch_restaurants(&self) -> Result<Vec<Restaurant>, StoreError> {
        let Some(store) = &self.store else {
            return Ok(vec![fixtures::demo_restaurant()]);
        };

        store
            .query(collections::RESTAURANT, None)
            .await?
            .into_iter()
            .map(|doc| from_document(collections::RESTAURANT, doc))
            .collect()
    }

    /// Menu of one restaurant, falling back to the matching demo items.
    pub async fn list_menu(&self, restaurant_id: &str) -> Vec<MenuItem> {
        with_demo_fallback(self.fetch_menu(restaurant_id).await, "menu", || {
            fixtures::demo_menu_for(restaurant_id)
        })
    }

    /// Menu of one restaurant, without the fallback policy.
    pub async fn fetch_menu(&self, restaurant_id: &str) -> Result<Vec<MenuItem>, StoreError> {
        let Some(store) = &self.store else {
            return Ok(fixtures::demo_menu_for(restaurant_id));
        };

        let filter = filter_eq("restaurant_id", restaurant_id);
        store
            .query(collections::MENU_ITEM, Some(&filter))
            .await?
            .into_iter()
            .map(|doc| from_document(collections::MENU_ITEM, doc))
            .collect()
    }

    /// Persist a pending order and return its id.
    ///
    /// Demo mode persists nothing and always answers [`DEMO_ORDER_ID`].
    pub async fn create_order(&self, request: OrderRequest) -> Result<String, ServiceError> {
        let order = Order::from_request(request)?;

        let Some(store) = &self.store else {
            tracing::debug!("Demo order accepted, total {}", order.total);
            return Ok(DEMO_ORDER_ID.to_string());
        };

        let order_id = store
            .insert(collections::ORDER, to_document(&order)?)
            .await
            .inspect_err(|e| tracing::error!("Order insert failed: {}", e))?;

        tracing::info!(
            "Order {} created for restaurant {}, total {}",
            order_id,
            order.restaurant_id,
            order.total
        );
        Ok(order_id)
    }

    pub async fn diagnostics(&self) -> Diagnostics {
        self.diagnostics_with(|key| env::var_os(key).is_some()).await
    }

    /// Diagnostics with an injectable environment presence check.
    pub async fn diagnostics_with<F>(&self, is_set: F) -> Diagnostics
    where
        F: Fn(&str) -> bool,
    {
        let presence = |key: &str| {
            if is_set(key) {
                "✅ Set".to_string()
            } else {
                "❌ Not Set".to_string()
            }
        };

        let mut report = Diagnostics {
            backend: "✅ Running".to_string(),
            database: "ℹ️ Using demo mode (no database)".to_string(),
            database_url: presence(DATABASE_URL_VAR),
            database_name: presence(DATABASE_NAME_VAR),
            connection_status: "Not Connected".to_string(),
            collections: Vec::new(),
        };

        if let Some(store) = &self.store {
            report.connection_status = "Connected".to_string();
            match store.list_collections().await {
                Ok(names) => {
                    report.collections = names
                        .into_iter()
                        .take(DIAGNOSTIC_COLLECTION_LIMIT)
                        .collect();
                    report.database = "✅ Connected & Working".to_string();
                }
                Err(e) => {
                    tracing::warn!("Collection listing on '{}' failed: {}", store.name(), e);
                    report.database = "⚠️  Connected but Error".to_string();
                }
            }
        }

        report
    }
}

/// Replace a failed read with demo data.
fn with_demo_fallback<T, F>(result: Result<Vec<T>, StoreError>, what: &str, fallback: F) -> Vec<T>
where
    F: FnOnce() -> Vec<T>,
{
    result.unwrap_or_else(|e| {
        tracing::warn!("Reading {} failed, serving demo data: {}", what, e);
        fallback()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::DEMO_RESTAURANT_ID;
    use crate::models::{OrderItem, order_status};
    use crate::store::MemoryStore;
    use serde_json::json;

    fn store_backed() -> (Arc<MemoryStore>, OrderingService) {
        let store = Arc::new(MemoryStore::new("test"));
        let service = OrderingService::new(Some(store.clone() as Arc<dyn DocumentStore>));
        (store, service)
    }

    fn order_request(items: Vec<(f64, i64)>) -> OrderRequest {
        OrderRequest {
            restaurant_id: DEMO_RESTAURANT_ID.to_string(),
            customer_name: "Ada".to_string(),
            phone: "555-0100".to_string(),
            address: "12 Analytical Way".to_string(),
            notes: Some("Ring twice".to_string()),
            items: items
                .into_iter()
                .enumerate()
                .map(|(i, (price, quantity))| OrderItem {
                    item_id: format!("m{}", i + 1),
                    name: format!("Item {}", i + 1),
                    price,
                    quantity,
                })
                .collect(),
        }
    }

    #[tokio::test]
    async fn test_demo_mode_reads() {
        let service = OrderingService::demo();
        assert_eq!(service.mode(), StorageMode::Demo);

        let restaurants = service.list_restaurants().await;
        assert_eq!(restaurants.len(), 1);
        assert_eq!(restaurants[0].id, DEMO_RESTAURANT_ID);

        assert_eq!(service.list_menu(DEMO_RESTAURANT_ID).await.len(), 3);
        assert!(service.list_menu("nonexistent-id").await.is_empty());
    }

    #[tokio::test]
    async fn test_demo_mode_seed_is_noop() {
        let service = OrderingService::demo();
        assert_eq!(service.seed_demo_data().await.unwrap(), StorageMode::Demo);
    }

    #[tokio::test]
    async fn test_demo_mode_order_returns_placeholder() {
        let service = OrderingService::demo();
        let first = service
            .create_order(order_request(vec![(9.99, 1)]))
            .await
            .unwrap();
        let second = service
            .create_order(order_request(vec![(1.0, 4)]))
            .await
            .unwrap();
        assert_eq!(first, DEMO_ORDER_ID);
        assert_eq!(second, DEMO_ORDER_ID);
    }

    #[tokio::test]
    async fn test_seed_is_idempotent() {
        let (store, service) = store_backed();

        assert_eq!(service.seed_demo_data().await.unwrap(), StorageMode::Db);
        assert_eq!(service.seed_demo_data().await.unwrap(), StorageMode::Db);

        let all = Document::new();
        assert_eq!(store.count(collections::RESTAURANT, &all).await.unwrap(), 1);
        assert_eq!(store.count(collections::MENU_ITEM, &all).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_seeded_menu_references_restaurant() {
        let (_store, service) = store_backed();
        service.seed_demo_data().await.unwrap();

        let restaurants = service.list_restaurants().await;
        assert_eq!(restaurants.len(), 1);
        let restaurant_id = &restaurants[0].id;
        assert_ne!(restaurant_id, DEMO_RESTAURANT_ID);

        let menu = service.list_menu(restaurant_id).await;
        assert_eq!(menu.len(), 3);
        assert!(menu.iter().all(|m| &m.restaurant_id == restaurant_id));
        assert!(menu.iter().all(|m| !m.id.is_empty()));
        assert_ne!(menu[0].id, menu[1].id);
        assert_ne!(menu[1].id, menu[2].id);

        // demo ids do not exist in the store
        assert!(service.list_menu(DEMO_RESTAURANT_ID).await.is_empty());
    }

    #[tokio::test]
    async fn test_seed_surfaces_store_errors() {
        let (store, service) = store_backed();
        store.set_fail_reads(true);
        assert!(service.seed_demo_data().await.is_err());

        store.set_fail_reads(false);
        store.set_fail_writes(true);
        assert!(service.seed_demo_data().await.is_err());
    }

    #[tokio::test]
    async fn test_read_errors_fall_back_to_demo() {
        let (store, service) = store_backed();
        service.seed_demo_data().await.unwrap();
        store.set_fail_reads(true);

        assert!(service.fetch_restaurants().await.is_err());
        let restaurants = service.list_restaurants().await;
        assert_eq!(restaurants, vec![fixtures::demo_restaurant()]);

        assert_eq!(service.list_menu(DEMO_RESTAURANT_ID).await.len(), 3);
        assert!(service.list_menu("other").await.is_empty());
    }

    #[tokio::test]
    async fn test_malformed_document_falls_back() {
        let (store, service) = store_backed();
        // restaurant without a name
        let mut document = Document::new();
        document.insert("cuisine".to_string(), json!("Thai"));
        store
            .insert(collections::RESTAURANT, document)
            .await
            .unwrap();

        assert!(matches!(
            service.fetch_restaurants().await,
            Err(StoreError::Deserialization { .. })
        ));
        assert_eq!(service.list_restaurants().await[0].id, DEMO_RESTAURANT_ID);
    }

    #[tokio::test]
    async fn test_create_order_persists_snapshot() {
        let (store, service) = store_backed();
        let order_id = service
            .create_order(order_request(vec![(9.99, 1), (8.49, 0)]))
            .await
            .unwrap();

        let docs = store.query(collections::ORDER, None).await.unwrap();
        assert_eq!(docs.len(), 1);
        let doc = &docs[0];
        assert_eq!(doc.get("_id"), Some(&json!(order_id)));
        assert_eq!(doc.get("total"), Some(&json!(18.48)));
        assert_eq!(doc.get("status"), Some(&json!(order_status::PENDING)));
        assert_eq!(doc.get("notes"), Some(&json!("Ring twice")));
        // quantities are stored as submitted
        assert_eq!(doc["items"][1]["quantity"], json!(0));
        assert_eq!(doc["items"][1]["price"], json!(8.49));
    }

    #[tokio::test]
    async fn test_create_order_write_failure() {
        let (store, service) = store_backed();
        store.set_fail_writes(true);
        let err = service
            .create_order(order_request(vec![(9.99, 1)]))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Store(_)));
    }

    #[tokio::test]
    async fn test_create_order_invalid_price() {
        let service = OrderingService::demo();
        let err = service
            .create_order(order_request(vec![(f64::NAN, 1)]))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Order(_)));
    }

    #[tokio::test]
    async fn test_diagnostics_demo_mode() {
        let report = OrderingService::demo()
            .diagnostics_with(|key| key == DATABASE_URL_VAR)
            .await;
        assert_eq!(report.backend, "✅ Running");
        assert_eq!(report.connection_status, "Not Connected");
        assert!(report.database.contains("demo mode"));
        assert_eq!(report.database_url, "✅ Set");
        assert_eq!(report.database_name, "❌ Not Set");
        assert!(report.collections.is_empty());
    }

    #[tokio::test]
    async fn test_diagnostics_store_mode() {
        let (store, service) = store_backed();
        service.seed_demo_data().await.unwrap();

        let report = service.diagnostics_with(|_| true).await;
        assert_eq!(report.connection_status, "Connected");
        assert_eq!(report.database, "✅ Connected & Working");
        assert_eq!(report.collections, vec!["menuitem", "restaurant"]);

        store.set_fail_listing(true);
        let report = service.diagnostics_with(|_| false).await;
        assert_eq!(report.connection_status, "Connected");
        assert_eq!(report.database, "⚠️  Connected but Error");
        assert!(report.collections.is_empty());
        assert_eq!(report.database_url, "❌ Not Set");
    }

    #[tokio::test]
    async fn test_diagnostics_caps_collection_names() {
        let (store, service) = store_backed();
        for i in 0..12 {
            store
                .insert(&format!("extra{:02}", i), Document::new())
                .await
                .unwrap();
        }
        assert_eq!(store.list_collections().await.unwrap().len(), 12);

        let report = service.diagnostics_with(|_| true).await;
        assert_eq!(report.collections.len(), DIAGNOSTIC_COLLECTION_LIMIT);
        assert_eq!(report.collections[0], "extra00");
        assert_eq!(report.collections[9], "extra09");
    }
}
