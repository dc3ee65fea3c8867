//! Datfeed Server Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! HTTP front end for the fixed-width sales pipeline.
//!
//! # Overview
//!
//! - **Uploads**: `POST /api/v1/uploads` parses a `.dat` file and reports
//!   accepted records and rejected lines
//! - **Forwarding**: `POST /api/v1/sales/forward` delivers records to the
//!   upstream sales ledger with the configured strategy
//! - **Queries**: `GET /api/v1/sales`, `/sales/paged` and `/sales/search`
//!   relay the ledger's paged envelope
//!
//! # Architecture
//!
//! Features are vertical slices under [`features`], split into commands
//! (uploads, forwarding) and queries (list, search). Every failure is turned
//! into the flat error envelope by [`error::AppError`].
//!
//! # Example
//!
//! ```no_run
//! use datfeed_server::{api, config::Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load()?;
//!     let state = api::AppState::from_config(&config)?;
//!     let app = api::create_router(state, &config);
//!
//!     let listener = tokio::net::TcpListener::bind("127.0.0.1:8000").await?;
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod features;
pub mod middleware;

// Re-export commonly used types
pub use api::{create_router, AppState};
pub use error::{AppError, AppResult};
