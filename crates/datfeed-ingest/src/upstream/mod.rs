//! Upstream sales ledger integration
//!
//! - [`client`]: HTTP transport with read/write timeouts
//! - [`sink`]: batch and per-record forwarding strategies
//! - [`query`]: list, paged list and search passthrough
//! - [`wire`]: request and response shapes the ledger speaks

pub mod client;
pub mod query;
pub mod sink;
pub mod wire;

pub use client::{LedgerClient, LedgerConfig, UpstreamError};
pub use query::{ListParams, PagedListParams, QueryError, SalesQuery, SearchParams};
pub use sink::{
    BatchSink, ForwardFailure, ForwardResult, ForwardStrategy, PerRecordSink, SalesSink,
};
pub use wire::{LedgerSale, UpstreamSale};

use std::sync::Arc;

/// Settings needed to build a [`SalesSink`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SinkOptions {
    pub strategy: ForwardStrategy,
    pub concurrency: usize,
    pub register_catalog: bool,
}

impl Default for SinkOptions {
    fn default() -> Self {
        Self {
            strategy: ForwardStrategy::Batch,
            concurrency: sink::DEFAULT_FORWARD_CONCURRENCY,
            register_catalog: false,
        }
    }
}

/// Build the configured forwarding strategy
pub fn build_sink(client: LedgerClient, options: SinkOptions) -> Arc<dyn SalesSink> {
    match options.strategy {
        ForwardStrategy::Batch => Arc::new(BatchSink::new(client)),
        ForwardStrategy::PerRecord => Arc::new(
            PerRecordSink::new(client)
                .with_concurrency(options.concurrency)
                .with_catalog_registration(options.register_catalog),
        ),
    }
}
