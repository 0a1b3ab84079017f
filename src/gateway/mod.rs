pub mod error;
pub mod handlers;
pub mod openapi;
pub mod state;
pub mod types;

use std::sync::Arc;

use anyhow::Context;
use axum::{
    Router,
    routing::{get, post},
};
use tokio::net::TcpListener;
use tokio::signal::{self, ctrl_c};
use tower_http::cors::CorsLayer;

use crate::config::GatewayConfig;
use crate::service::OrderingService;
use state::AppState;

/// Build the application router.
///
/// CORS mirrors the caller's origin and headers and allows credentials, so
/// any origin may call every route.
pub fn router(service: OrderingService) -> Router {
    let state = Arc::new(AppState::new(service));

    Router::new()
        .route("/", get(handlers::read_root))
        .route("/seed", post(handlers::seed_demo_data))
        .route("/restaurants", get(handlers::list_restaurants))
        .route("/menu/{restaurant_id}", get(handlers::list_menu))
        .route("/orders", post(handlers::create_order))
        .route("/test", get(handlers::diagnostics))
        .route("/api-docs/openapi.json", get(handlers::openapi_json))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

/// Start the HTTP gateway and serve until Ctrl-C or SIGTERM.
pub async fn run_server(config: &GatewayConfig, service: OrderingService) -> anyhow::Result<()> {
    let mode = service.mode();
    let app = router(service);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    tracing::info!("Gateway listening on http://{} ({:?} mode)", addr, mode);
    tracing::info!("API Docs: http://{}/api-docs/openapi.json", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
        tracing::info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
                tracing::info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                tracing::error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
