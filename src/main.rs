//! Payroll engine HTTP server.
//!
//! Reads its configuration directory from `PAYROLL_ENGINE_CONFIG` and binds
//! to `PAYROLL_ENGINE_ADDR`.

use std::sync::Arc;

use payroll_engine::api::{AppState, create_router};
use payroll_engine::config::ConfigLoader;
use payroll_engine::store::InMemoryStore;
use tracing::info;
use tracing_subscriber::EnvFilter;

const DEFAULT_CONFIG_DIR: &str = "./config/default";
const DEFAULT_ADDR: &str = "0.0.0.0:3000";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config_dir =
        std::env::var("PAYROLL_ENGINE_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_DIR.to_string());
    let addr = std::env::var("PAYROLL_ENGINE_ADDR").unwrap_or_else(|_| DEFAULT_ADDR.to_string());

    let config = ConfigLoader::load(&config_dir)?;
    info!(config_dir = %config_dir, "Configuration loaded");

    let state = AppState::new(config, Arc::new(InMemoryStore::new()));
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(addr = %addr, "Payroll engine listening");

    axum::serve(listener, create_router(state)).await?;
    Ok(())
}
