//! EV Insight Service - Main Entry Point

use anyhow::{Context, Result};
use api::{init_logging, run_server, ServiceConfig};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let config = ServiceConfig::load().context("Failed to load configuration")?;
    init_logging(&config.logging);

    info!("=== EV Insight Service v{} ===", env!("CARGO_PKG_VERSION"));
    info!(
        health_model = %config.models.health_model_path.display(),
        value_model = %config.models.value_model_path.display(),
        sales_model = %config.models.sales_model_path.display(),
        "Loading models"
    );

    run_server(config).await.context("API server failed")?;

    Ok(())
}
