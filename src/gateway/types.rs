//! Request and response types for the HTTP surface
//!
//! - [`OrderPayload`]: extractor that rejects structurally invalid orders
//! - [`ErrorDetail`]: `{"detail": ...}` body shared by all failures

use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::models::OrderRequest;
use crate::service::StorageMode;

#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    #[schema(example = "SnackSprint backend is running")]
    pub message: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SeedResponse {
    #[schema(example = true)]
    pub ok: bool,
    pub mode: StorageMode,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderCreatedResponse {
    #[schema(example = true)]
    pub ok: bool,
    #[schema(example = "demo-order-1")]
    pub order_id: String,
}

/// Error body
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorDetail {
    #[schema(example = "Database error: pool timed out while waiting for an open connection")]
    pub detail: String,
}

/// Order body validated at the framework level.
///
/// Handlers never see a payload with missing fields or wrong types.
#[derive(Debug)]
pub struct OrderPayload(pub OrderRequest);

/// Rejection for [`OrderPayload`]. Keeps the status axum chose
/// (400 syntax, 415 content type, 422 schema).
#[derive(Debug)]
pub struct PayloadRejection {
    pub status: StatusCode,
    pub detail: String,
}

impl From<JsonRejection> for PayloadRejection {
    fn from(rejection: JsonRejection) -> Self {
        Self {
            status: rejection.status(),
            detail: rejection.body_text(),
        }
    }
}

impl IntoResponse for PayloadRejection {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorDetail {
                detail: self.detail,
            }),
        )
            .into_response()
    }
}

impl<S> FromRequest<S> for OrderPayload
where
    S: Send + Sync,
{
    type Rejection = PayloadRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(request) = Json::<OrderRequest>::from_request(req, state).await?;
        tracing::debug!(
            "Order payload for restaurant {} with {} items",
            request.restaurant_id,
            request.items.len()
        );
        Ok(OrderPayload(request))
    }
}
