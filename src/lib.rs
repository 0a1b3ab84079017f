//! SnackSprint - food ordering backend
//!
//! REST endpoints to list restaurants, list menu items and place orders,
//! backed by a document store. Without a configured store the service runs
//! in demo mode and answers from built-in fixtures.
//!
//! # Modules
//!
//! - [`config`] - YAML + environment configuration
//! - [`logging`] - tracing subscriber setup
//! - [`models`] - Restaurant, MenuItem and Order records, order totals
//! - [`fixtures`] - built-in demo restaurant and menu
//! - [`store`] - document store accessor (PostgreSQL, in-memory)
//! - [`service`] - the ordering service behind every route
//! - [`gateway`] - axum HTTP transport

pub mod config;
pub mod fixtures;
pub mod gateway;
pub mod logging;
pub mod models;
pub mod service;
pub mod store;

// Convenient re-exports at crate root
pub use config::AppConfig;
pub use models::{MenuItem, Order, OrderError, OrderItem, OrderRequest, Restaurant, SpiceLevel};
pub use service::{Diagnostics, OrderingService, ServiceError, StorageMode};
pub use store::{DocumentStore, MemoryStore, PgDocumentStore, StoreError};
