//! Domain types shared by the ingestion pipeline, the server and the CLI
//!
//! Raw types mirror one fixed-width line field for field. [`SaleRecord`] is the
//! canonical, self-consistent representation used everywhere after conversion.
//! All JSON field names are camelCase and decimals travel as JSON numbers.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// ============================================================================
// Raw records (one per valid fixed-width line)
// ============================================================================

/// Product block of a raw line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawProduct {
    pub id: i64,
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub unit_value: Decimal,
}

/// Client block of a raw line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawClient {
    pub id: i64,
    pub name: String,
}

/// One parsed line, before conversion
///
/// `sale_date` is the trimmed positional slice; it is not validated as a
/// calendar date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawItem {
    pub sale_date: String,
    pub quantity_sold: i64,
    pub product: RawProduct,
    pub client: RawClient,
}

// ============================================================================
// Canonical record
// ============================================================================

/// Canonical sale record
///
/// `total_value` is always `quantity * unit_value`. The optional product and
/// client ids are carried so a record can be re-nested for the upstream ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleRecord {
    pub id: String,
    pub sale_date: String,
    pub customer_name: String,
    pub product_name: String,
    pub quantity: i64,
    #[serde(with = "rust_decimal::serde::float")]
    pub unit_value: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_value: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<i64>,
}

impl SaleRecord {
    /// Compare two records ignoring the run-scoped synthetic id
    pub fn same_sale(&self, other: &SaleRecord) -> bool {
        self.sale_date == other.sale_date
            && self.customer_name == other.customer_name
            && self.product_name == other.product_name
            && self.quantity == other.quantity
            && self.unit_value == other.unit_value
            && self.total_value == other.total_value
            && self.product_id == other.product_id
            && self.client_id == other.client_id
    }
}

// ============================================================================
// Ingestion result
// ============================================================================

/// A line that could not be turned into a record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RejectedLine {
    /// 1-based physical line number in the source file
    pub line_number: usize,
    pub reason: String,
}

/// Outcome of ingesting one file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestionResult {
    pub records_processed: usize,
    pub records_rejected: usize,
    pub records: Vec<SaleRecord>,
    pub rejected_lines: Vec<RejectedLine>,
}

impl IngestionResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an accepted record
    pub fn accept(&mut self, record: SaleRecord) {
        self.records.push(record);
        self.records_processed += 1;
    }

    /// Append a rejected line
    pub fn reject(&mut self, line_number: usize, reason: impl Into<String>) {
        self.rejected_lines.push(RejectedLine {
            line_number,
            reason: reason.into(),
        });
        self.records_rejected += 1;
    }

    /// True when no line was rejected
    pub fn is_clean(&self) -> bool {
        self.rejected_lines.is_empty()
    }
}

// ============================================================================
// Paged envelope
// ============================================================================

/// Paged envelope returned by the upstream ledger
///
/// Fields the pipeline does not model (`pageable`, `sort`, `numberOfElements`,
/// ...) are kept in `extra` and written back untouched, so relaying an
/// envelope preserves its shape. Page position fields are optional and stay
/// absent on output when the ledger leaves them out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PagedResult<T> {
    pub content: Vec<T>,
    pub total_elements: u64,
    pub total_pages: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last: Option<bool>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl<T> PagedResult<T> {
    /// Map items to a different type, keeping the pagination metadata
    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> PagedResult<U> {
        PagedResult {
            content: self.content.into_iter().map(f).collect(),
            total_elements: self.total_elements,
            total_pages: self.total_pages,
            number: self.number,
            size: self.size,
            first: self.first,
            last: self.last,
            extra: self.extra,
        }
    }

    /// Fallible variant of [`PagedResult::map`]
    pub fn try_map<U, E, F: FnMut(T) -> std::result::Result<U, E>>(
        self,
        f: F,
    ) -> std::result::Result<PagedResult<U>, E> {
        let content = self
            .content
            .into_iter()
            .map(f)
            .collect::<std::result::Result<Vec<U>, E>>()?;
        Ok(PagedResult {
            content,
            total_elements: self.total_elements,
            total_pages: self.total_pages,
            number: self.number,
            size: self.size,
            first: self.first,
            last: self.last,
            extra: self.extra,
        })
    }

    /// Zero-based page index, `0` when the ledger omits it
    pub fn page_index(&self) -> u64 {
        self.number.unwrap_or(0)
    }

    pub fn has_next(&self) -> bool {
        match self.last {
            Some(last) => !last,
            None => self.page_index() + 1 < self.total_pages,
        }
    }

    pub fn has_previous(&self) -> bool {
        match self.first {
            Some(first) => !first,
            None => self.page_index() > 0,
        }
    }
}
