//! Datfeed Ingest Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! The fixed-width sales pipeline: parse `.dat` lines, convert them into
//! canonical [`SaleRecord`](datfeed_common::SaleRecord)s, and talk to the
//! upstream sales ledger.
//!
//! # Components
//!
//! - **parser**: one line to one [`RawItem`](datfeed_common::RawItem)
//! - **converter**: raw item to canonical record with a derived total
//! - **coordinator**: whole file to [`IngestionResult`](datfeed_common::IngestionResult)
//! - **upstream**: ledger client, forwarding strategies and query passthrough
//!
//! # Example
//!
//! ```no_run
//! use datfeed_ingest::coordinator;
//! use datfeed_ingest::upstream::{build_sink, LedgerClient, LedgerConfig, SalesSink, SinkOptions};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let bytes = std::fs::read("./vendas.dat")?;
//!     let result = coordinator::ingest(&bytes)?;
//!
//!     let client = LedgerClient::new(LedgerConfig::new("http://localhost:8080"))?;
//!     let sink = build_sink(client, SinkOptions::default());
//!     let outcome = sink.forward(&result.records).await;
//!     println!("{}/{} sent", outcome.records_sent, outcome.total_records);
//!     Ok(())
//! }
//! ```

pub mod converter;
pub mod coordinator;
pub mod parser;
pub mod upstream;

pub use converter::to_sale_record;
pub use coordinator::{ingest, IngestError, IngestionCoordinator};
pub use parser::{parse_line, FieldSpan, FixedWidthParser, ParseError, RecordLayout};
