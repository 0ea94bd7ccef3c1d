//! EV Insight API Server
//!
//! Serves battery health classification, value-for-money analysis and
//! sales forecasts over HTTP.

use axum::{
    routing::{get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

pub mod config;
mod error;
pub mod routes;
mod state;

pub use config::{LogFormat, LoggingConfig, ServiceConfig};
pub use error::ApiError;
pub use state::AppState;

/// Create the application router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/predict_health", post(routes::health::predict_health))
        .route("/predict_value", post(routes::value::predict_value))
        .route("/predict_sales", get(routes::sales::predict_sales))
        .route("/health", get(routes::status::health_check))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Initialize logging. `RUST_LOG` takes precedence over the configured level.
pub fn init_logging(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    let result = match config.format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
    };

    if let Err(e) = result {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

fn install_metrics_exporter(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => info!(%addr, "Prometheus exporter listening"),
        Err(e) => warn!(%addr, error = %e, "Failed to install Prometheus exporter"),
    }
}

/// Run the server
pub async fn run_server(config: ServiceConfig) -> std::io::Result<()> {
    if let Some(addr) = config.metrics.listen_addr {
        install_metrics_exporter(addr);
    }

    let state = Arc::new(AppState::load(&config.models, config.insights));
    let app = create_router(state);

    let addr = config.server.address();
    info!("Starting API server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
