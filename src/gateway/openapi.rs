//! OpenAPI documentation
//!
//! - OpenAPI JSON: `http://localhost:8000/api-docs/openapi.json`

use utoipa::OpenApi;

use crate::gateway::types::{ErrorDetail, MessageResponse, OrderCreatedResponse, SeedResponse};
use crate::models::{MenuItem, OrderItem, OrderRequest, Restaurant, SpiceLevel};
use crate::service::{Diagnostics, StorageMode};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "SnackSprint API",
        version = "1.0.1",
        description = "Food ordering demo backend: restaurants, menus and orders.",
        license(name = "MIT")
    ),
    servers(
        (url = "http://localhost:8000", description = "Development"),
    ),
    paths(
        crate::gateway::handlers::read_root,
        crate::gateway::handlers::seed_demo_data,
        crate::gateway::handlers::list_restaurants,
        crate::gateway::handlers::list_menu,
        crate::gateway::handlers::create_order,
        crate::gateway::handlers::diagnostics,
    ),
    components(
        schemas(
            MessageResponse,
            SeedResponse,
            OrderCreatedResponse,
            ErrorDetail,
            Restaurant,
            MenuItem,
            SpiceLevel,
            OrderItem,
            OrderRequest,
            Diagnostics,
            StorageMode,
        )
    ),
    tags(
        (name = "Catalog", description = "Restaurants and menus"),
        (name = "Orders", description = "Order placement"),
        (name = "System", description = "Health and diagnostics")
    )
)]
pub struct ApiDoc;
