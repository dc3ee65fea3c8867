//! Forwarding strategies
//!
//! A [`SalesSink`] delivers canonical records to the upstream ledger. The
//! strategy is picked once at startup; callers only see the trait.
//!
//! - [`BatchSink`]: one POST with the whole array, all-or-nothing
//! - [`PerRecordSink`]: one POST per record through a bounded concurrent
//!   stream, optionally registering products and clients first

use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::{info, warn};

use datfeed_common::SaleRecord;

use super::client::{LedgerClient, UpstreamError, CLIENTS_PATH, PRODUCTS_PATH, SALES_PATH};
use super::wire::{unique_catalog, UpstreamSale};

/// Default number of in-flight requests for per-record forwarding
pub const DEFAULT_FORWARD_CONCURRENCY: usize = 5;

/// Upper bound accepted for per-record concurrency
pub const MAX_FORWARD_CONCURRENCY: usize = 32;

// ============================================================================
// Strategy and result types
// ============================================================================

/// How a list of records is delivered upstream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ForwardStrategy {
    #[default]
    Batch,
    PerRecord,
}

impl ForwardStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            ForwardStrategy::Batch => "batch",
            ForwardStrategy::PerRecord => "per-record",
        }
    }
}

impl fmt::Display for ForwardStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ForwardStrategy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "batch" => Ok(ForwardStrategy::Batch),
            "per-record" | "per_record" | "record" => Ok(ForwardStrategy::PerRecord),
            _ => Err(anyhow::anyhow!(
                "Invalid forward strategy: {} (expected 'batch' or 'per-record')",
                s
            )),
        }
    }
}

/// One record (or the whole batch) that did not reach the ledger
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForwardFailure {
    /// `None` when the failure covers the whole batch
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    pub message: String,
}

impl ForwardFailure {
    fn new(record_id: Option<String>, err: &UpstreamError) -> Self {
        Self {
            record_id,
            status: err.status(),
            message: err.to_string(),
        }
    }
}

/// Outcome of one forwarding call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForwardResult {
    pub strategy: ForwardStrategy,
    pub records_sent: usize,
    pub total_records: usize,
    pub failures: Vec<ForwardFailure>,
}

impl ForwardResult {
    pub fn new(strategy: ForwardStrategy, total_records: usize) -> Self {
        Self {
            strategy,
            records_sent: 0,
            total_records,
            failures: Vec::new(),
        }
    }

    /// Every record reached the ledger
    pub fn is_complete(&self) -> bool {
        self.records_sent == self.total_records
    }

    /// There was something to send and none of it arrived
    pub fn nothing_delivered(&self) -> bool {
        self.total_records > 0 && self.records_sent == 0
    }
}

// ============================================================================
// Sink trait
// ============================================================================

/// Delivery strategy for canonical records
///
/// Implementations never return errors: every failure is folded into the
/// [`ForwardResult`].
#[async_trait]
pub trait SalesSink: Send + Sync {
    async fn forward(&self, records: &[SaleRecord]) -> ForwardResult;

    async fn forward_one(&self, record: &SaleRecord) -> ForwardResult {
        self.forward(std::slice::from_ref(record)).await
    }

    fn strategy(&self) -> ForwardStrategy;
}

// ============================================================================
// Batch
// ============================================================================

/// Sends the whole record list in a single POST
#[derive(Debug, Clone)]
pub struct BatchSink {
    client: LedgerClient,
}

impl BatchSink {
    pub fn new(client: LedgerClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SalesSink for BatchSink {
    #[tracing::instrument(skip(self, records), fields(total = records.len()))]
    async fn forward(&self, records: &[SaleRecord]) -> ForwardResult {
        let mut result = ForwardResult::new(ForwardStrategy::Batch, records.len());
        if records.is_empty() {
            return result;
        }

        let body: Vec<UpstreamSale> = records.iter().map(UpstreamSale::from).collect();

        match self.client.post_json(SALES_PATH, &body).await {
            Ok(()) => {
                result.records_sent = records.len();
                info!(sent = result.records_sent, "Batch forwarded");
            },
            Err(e) => {
                warn!(error = %e, "Batch forward failed");
                result.failures.push(ForwardFailure::new(None, &e));
            },
        }

        result
    }

    fn strategy(&self) -> ForwardStrategy {
        ForwardStrategy::Batch
    }
}

// ============================================================================
// Per record
// ============================================================================

/// Sends one POST per record with bounded concurrency
#[derive(Debug, Clone)]
pub struct PerRecordSink {
    client: LedgerClient,
    concurrency: usize,
    register_catalog: bool,
}

impl PerRecordSink {
    pub fn new(client: LedgerClient) -> Self {
        Self {
            client,
            concurrency: DEFAULT_FORWARD_CONCURRENCY,
            register_catalog: false,
        }
    }

    /// Clamped to `1..=MAX_FORWARD_CONCURRENCY`
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.clamp(1, MAX_FORWARD_CONCURRENCY);
        self
    }

    /// Register unique products and clients before the sales
    pub fn with_catalog_registration(mut self, enabled: bool) -> Self {
        self.register_catalog = enabled;
        self
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    async fn post_all<B>(&self, path: &'static str, bodies: Vec<B>) -> usize
    where
        B: Serialize + Send + Sync + 'static,
    {
        let requests: Vec<_> = bodies
            .into_iter()
            .map(|body| {
                let client = self.client.clone();
                async move {
                    match client.post_json(path, &body).await {
                        Ok(()) => true,
                        Err(e) => {
                            warn!(%path, error = %e, "Catalog registration failed");
                            false
                        },
                    }
                }
            })
            .collect();

        let outcomes: Vec<bool> = stream::iter(requests)
            .buffer_unordered(self.concurrency)
            .collect()
            .await;

        outcomes.into_iter().filter(|ok| *ok).count()
    }

    async fn register(&self, records: &[SaleRecord]) {
        let (products, clients) = unique_catalog(records);

        let (product_count, client_count) = (products.len(), clients.len());

        let products_ok = self.post_all(PRODUCTS_PATH, products).await;
        let clients_ok = self.post_all(CLIENTS_PATH, clients).await;

        info!(
            products = product_count,
            products_ok,
            clients = client_count,
            clients_ok,
            "Catalog registration finished"
        );
    }
}

#[async_trait]
impl SalesSink for PerRecordSink {
    #[tracing::instrument(skip(self, records), fields(total = records.len(), concurrency = self.concurrency))]
    async fn forward(&self, records: &[SaleRecord]) -> ForwardResult {
        let mut result = ForwardResult::new(ForwardStrategy::PerRecord, records.len());
        if records.is_empty() {
            return result;
        }

        if self.register_catalog {
            self.register(records).await;
        }

        // Each request owns its body and client handle
        let requests: Vec<_> = records
            .iter()
            .map(|record| {
                let client = self.client.clone();
                let body = UpstreamSale::from(record);
                async move { client.post_json(SALES_PATH, &body).await }
            })
            .collect();

        // `buffered` keeps input order, so outcomes line up with records
        let outcomes: Vec<Result<(), UpstreamError>> = stream::iter(requests)
            .buffered(self.concurrency)
            .collect()
            .await;

        for (record, outcome) in records.iter().zip(outcomes) {
            match outcome {
                Ok(()) => result.records_sent += 1,
                Err(e) => {
                    warn!(record_id = %record.id, error = %e, "Record forward failed");
                    result
                        .failures
                        .push(ForwardFailure::new(Some(record.id.clone()), &e));
                },
            }
        }

        info!(
            sent = result.records_sent,
            failed = result.failures.len(),
            "Per-record forward finished"
        );

        result
    }

    fn strategy(&self) -> ForwardStrategy {
        ForwardStrategy::PerRecord
    }
}
