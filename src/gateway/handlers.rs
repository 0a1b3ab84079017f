//! Route handlers
//!
//! Read routes always answer 200. Write routes answer 500 with
//! `{"detail": ...}` when the store rejects the write.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use utoipa::OpenApi;

use super::error::AppError;
use super::openapi::ApiDoc;
use super::state::AppState;
use super::types::{MessageResponse, OrderCreatedResponse, OrderPayload, SeedResponse};
use crate::models::{MenuItem, Restaurant};
use crate::service::Diagnostics;

/// Service greeting
#[utoipa::path(
    get,
    path = "/",
    responses((status = 200, description = "Service is up", body = MessageResponse)),
    tag = "System"
)]
pub async fn read_root(State(state): State<Arc<AppState>>) -> Json<MessageResponse> {
    Json(MessageResponse {
        message: state.service.health().to_string(),
    })
}

/// Seed the demo restaurant and menu (idempotent)
#[utoipa::path(
    post,
    path = "/seed",
    responses(
        (status = 200, description = "Seeded, already seeded, or demo mode", body = SeedResponse),
        (status = 500, description = "Store error", body = super::types::ErrorDetail)
    ),
    tag = "Catalog"
)]
pub async fn seed_demo_data(
    State(state): State<Arc<AppState>>,
) -> Result<Json<SeedResponse>, AppError> {
    let mode = state.service.seed_demo_data().await.map_err(|e| {
        tracing::error!("Seeding failed: {}", e);
        AppError::from(e)
    })?;
    Ok(Json(SeedResponse { ok: true, mode }))
}

/// List restaurants
#[utoipa::path(
    get,
    path = "/restaurants",
    responses((status = 200, description = "Restaurants (demo data when the store is unavailable)", body = [Restaurant])),
    tag = "Catalog"
)]
pub async fn list_restaurants(State(state): State<Arc<AppState>>) -> Json<Vec<Restaurant>> {
    Json(state.service.list_restaurants().await)
}

/// List the menu of one restaurant
#[utoipa::path(
    get,
    path = "/menu/{restaurant_id}",
    params(("restaurant_id" = String, Path, description = "Restaurant id")),
    responses((status = 200, description = "Menu items, possibly empty", body = [MenuItem])),
    tag = "Catalog"
)]
pub async fn list_menu(
    State(state): State<Arc<AppState>>,
    Path(restaurant_id): Path<String>,
) -> Json<Vec<MenuItem>> {
    Json(state.service.list_menu(&restaurant_id).await)
}

/// Place an order
#[utoipa::path(
    post,
    path = "/orders",
    request_body = crate::models::OrderRequest,
    responses(
        (status = 200, description = "Order accepted", body = OrderCreatedResponse),
        (status = 422, description = "Malformed payload", body = super::types::ErrorDetail),
        (status = 500, description = "Total computation or store error", body = super::types::ErrorDetail)
    ),
    tag = "Orders"
)]
pub async fn create_order(
    State(state): State<Arc<AppState>>,
    OrderPayload(request): OrderPayload,
) -> Result<Json<OrderCreatedResponse>, AppError> {
    let order_id = state.service.create_order(request).await?;
    Ok(Json(OrderCreatedResponse { ok: true, order_id }))
}

/// Service and store diagnostics
#[utoipa::path(
    get,
    path = "/test",
    responses((status = 200, description = "Diagnostics report", body = Diagnostics)),
    tag = "System"
)]
pub async fn diagnostics(State(state): State<Arc<AppState>>) -> Json<Diagnostics> {
    Json(state.service.diagnostics().await)
}

/// GET /api-docs/openapi.json
pub async fn openapi_json() -> impl IntoResponse {
    match ApiDoc::openapi().to_json() {
        Ok(json) => (
            StatusCode::OK,
            [(axum::http::header::CONTENT_TYPE, "application/json")],
            json,
        )
            .into_response(),
        Err(e) => AppError::Internal(format!("OpenAPI serialization failed: {}", e)).into_response(),
    }
}
