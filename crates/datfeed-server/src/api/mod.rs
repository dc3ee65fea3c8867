pub mod response;

use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::compression::CompressionLayer;

use datfeed_ingest::upstream::{build_sink, LedgerClient, SalesQuery, SalesSink};
use datfeed_ingest::IngestionCoordinator;

use crate::config::Config;
use crate::features;
use crate::middleware;
use response::HealthResponse;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub coordinator: IngestionCoordinator,
    pub sink: Arc<dyn SalesSink>,
    pub query: SalesQuery,
}

impl AppState {
    /// Wire the ledger client, forwarding sink and query passthrough from config
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let client = LedgerClient::new(config.ledger())?;
        let options = config.sink_options();

        tracing::info!(
            upstream = %client.base_url(),
            strategy = %options.strategy,
            concurrency = options.concurrency,
            "Upstream ledger client ready"
        );

        Ok(Self {
            coordinator: IngestionCoordinator::new(),
            sink: build_sink(client.clone(), options),
            query: SalesQuery::new(client),
        })
    }
}

/// Create the application router with all routes and middleware
pub fn create_router(state: AppState, config: &Config) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", features::router(state))
        // Apply layers from innermost to outermost
        .layer(middleware::body_limit_layers(&config.uploads))
        .layer(CompressionLayer::new())
        .layer(middleware::tracing_layer())
        .layer(middleware::cors_layer(&config.cors))
}

async fn health_check() -> HealthResponse {
    HealthResponse::ok()
}
