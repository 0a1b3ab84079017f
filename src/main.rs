//! SnackSprint API server
//!
//! ```text
//! cargo run -- [--env dev] [--port 8000]
//! ```
//!
//! Set `DATABASE_URL` and `DATABASE_NAME` for store-backed mode; without
//! them every route answers from demo fixtures.

use snacksprint::config::{AppConfig, ConfigSource};
use snacksprint::service::OrderingService;
use snacksprint::{gateway, logging, store};

fn get_env() -> String {
    let args: Vec<String> = std::env::args().collect();
    for i in 0..args.len() {
        if (args[i] == "--env" || args[i] == "-e") && i + 1 < args.len() {
            return args[i + 1].clone();
        }
    }
    "dev".to_string()
}

/// Get port override from command line (--port argument)
fn get_port_override() -> Option<u16> {
    let args: Vec<String> = std::env::args().collect();
    for i in 0..args.len() {
        if args[i] == "--port" && i + 1 < args.len() {
            return args[i + 1].parse().ok();
        }
    }
    None
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env = get_env();
    let (mut app_config, config_source) = AppConfig::load(&env)?;
    if let Some(port) = get_port_override() {
        app_config.gateway.port = port;
    }
    let _log_guard = logging::init_logging(&app_config);

    tracing::info!("Starting SnackSprint API ({} config)", env);
    if let ConfigSource::Defaults(path) = &config_source {
        tracing::info!("{} not found, using defaults", path);
    }

    let store = store::connect(&app_config).await;
    let service = OrderingService::new(store);

    gateway::run_server(&app_config.gateway, service).await
}
