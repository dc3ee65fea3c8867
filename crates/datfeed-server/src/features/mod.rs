//! Feature modules implementing the datfeed API
//!
//! Each feature is a vertical slice:
//! - `commands/` - operations that change something (ingest a file, forward records)
//! - `queries/` - read operations relayed to the upstream ledger
//! - `routes.rs` - HTTP route definitions
//!
//! # Features
//!
//! - **uploads**: fixed-width `.dat` file ingestion
//! - **sales**: forwarding to and querying the upstream sales ledger

pub mod sales;
pub mod shared;
pub mod uploads;

use axum::Router;

use crate::api::AppState;

/// Creates the API router with all feature routes mounted
///
/// - `/uploads` - `.dat` file ingestion
/// - `/sales` - forwarding, listing and search
pub fn router(state: AppState) -> Router<()> {
    Router::new()
        .nest("/uploads", uploads::uploads_routes())
        .nest("/sales", sales::sales_routes())
        .with_state(state)
}
