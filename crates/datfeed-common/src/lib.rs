//! Datfeed Common Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Shared types, utilities, and error handling for the datfeed workspace.
//!
//! # Overview
//!
//! - **Types**: raw fixed-width records, the canonical [`SaleRecord`], the
//!   per-file [`IngestionResult`] and the upstream [`PagedResult`] envelope
//! - **Error Handling**: [`DatfeedError`] and the crate [`Result`] alias
//! - **Logging**: tracing subscriber setup shared by the server and the CLI
//! - **Checksums**: SHA-256 digests for uploaded files
//!
//! # Example
//!
//! ```no_run
//! use datfeed_common::{checksum, IngestionResult};
//!
//! fn fingerprint(bytes: &[u8], result: &IngestionResult) {
//!     let digest = checksum::sha256_hex(bytes);
//!     tracing::info!(%digest, processed = result.records_processed, "file fingerprint");
//! }
//! ```

pub mod checksum;
pub mod error;
pub mod logging;
pub mod types;

// Re-export commonly used types
pub use error::{DatfeedError, Result};
pub use types::{
    IngestionResult, PagedResult, RawClient, RawItem, RawProduct, RejectedLine, SaleRecord,
};
