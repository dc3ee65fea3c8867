//! Batch ingestion coordinator
//!
//! Reads a whole file, runs every non-blank line through the parser and the
//! converter, and collects accepted records and rejected lines side by side.
//! A bad line never stops the run.

use thiserror::Error;
use tracing::{debug, info, warn};

use datfeed_common::IngestionResult;

use crate::converter::to_sale_record;
use crate::parser::{FixedWidthParser, RecordLayout};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// File-level ingestion failure
#[derive(Error, Debug)]
pub enum IngestError {
    #[error("file is not valid UTF-8: {0}")]
    Decode(#[from] std::str::Utf8Error),
}

/// Coordinates parsing and conversion of one file
#[derive(Debug, Clone, Copy, Default)]
pub struct IngestionCoordinator {
    parser: FixedWidthParser,
}

impl IngestionCoordinator {
    /// Coordinator for the canonical layout
    pub fn new() -> Self {
        Self::default()
    }

    /// Coordinator for a specific format version
    pub fn with_parser(parser: FixedWidthParser) -> Self {
        Self { parser }
    }

    pub fn layout(&self) -> &RecordLayout {
        self.parser.layout()
    }

    /// Decode raw file bytes and ingest them
    pub fn ingest(&self, file_bytes: &[u8]) -> Result<IngestionResult, IngestError> {
        let bytes = file_bytes.strip_prefix(UTF8_BOM).unwrap_or(file_bytes);
        let content = std::str::from_utf8(bytes)?;
        Ok(self.ingest_str(content))
    }

    /// Ingest already-decoded file content
    pub fn ingest_str(&self, content: &str) -> IngestionResult {
        let mut result = IngestionResult::new();

        for (index, line) in content.lines().enumerate() {
            let line_number = index + 1;

            if line.trim().is_empty() {
                continue;
            }

            match self.parser.parse_line(line, line_number) {
                Ok(item) => {
                    let record = to_sale_record(item, result.records_processed + 1);
                    debug!(line_number, id = %record.id, "Accepted sales line");
                    result.accept(record);
                },
                Err(e) => {
                    warn!(line_number, reason = %e, "Rejected sales line");
                    result.reject(line_number, e.to_string());
                },
            }
        }

        info!(
            processed = result.records_processed,
            rejected = result.records_rejected,
            "Ingestion finished"
        );

        result
    }
}

/// Ingest raw file bytes with the canonical layout
pub fn ingest(file_bytes: &[u8]) -> Result<IngestionResult, IngestError> {
    IngestionCoordinator::new().ingest(file_bytes)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn valid_line(product: &str, quantity: u32) -> String {
        format!(
            "{:0>4}{:<54}{:0>4}{:<50}{:0>4}{:0>9}{:<11}",
            1, product, 7, "Maria Clara", quantity, "10.00", "2025-01-10"
        )
    }

    #[test]
    fn test_empty_file() {
        let result = ingest(b"").unwrap();
        assert_eq!(result.records_processed, 0);
        assert!(result.rejected_lines.is_empty());
    }

    #[test]
    fn test_mixed_lines_continue_after_rejection() {
        let content = format!(
            "{}\nshort line\n{}\n",
            valid_line("Bolo", 2),
            valid_line("Torta", 3)
        );

        let result = ingest(content.as_bytes()).unwrap();
        assert_eq!(result.records_processed, 2);
        assert_eq!(result.records_rejected, 1);
        assert_eq!(result.rejected_lines[0].line_number, 2);
        assert!(result.rejected_lines[0].reason.contains("too short"));

        assert_eq!(result.records[0].id, "dat-1");
        assert_eq!(result.records[1].id, "dat-2");
        assert_eq!(result.records[1].total_value, Decimal::new(3000, 2));
    }

    #[test]
    fn test_blank_lines_are_not_counted() {
        let content = format!("\n   \n{}\r\n\r\n", valid_line("Bolo", 1));
        let result = ingest(content.as_bytes()).unwrap();
        assert_eq!(result.records_processed, 1);
        assert_eq!(result.records_rejected, 0);
    }

    #[test]
    fn test_line_numbers_are_physical() {
        let content = format!("\n{}\n\nbad\n", valid_line("Bolo", 1));
        let result = ingest(content.as_bytes()).unwrap();
        assert_eq!(result.rejected_lines[0].line_number, 4);
    }

    #[test]
    fn test_bom_is_stripped() {
        let mut bytes = UTF8_BOM.to_vec();
        bytes.extend_from_slice(valid_line("Bolo", 1).as_bytes());
        let result = ingest(&bytes).unwrap();
        assert_eq!(result.records_processed, 1);
        assert_eq!(result.records[0].product_id, Some(1));
    }

    #[test]
    fn test_invalid_utf8_is_a_decode_error() {
        let err = ingest(&[0x30, 0xFF, 0xFE]).unwrap_err();
        assert!(matches!(err, IngestError::Decode(_)));
    }

    #[test]
    fn test_reparse_is_stable() {
        let content = format!("{}\n{}", valid_line("Bolo", 2), valid_line("Torta", 5));
        let first = ingest(content.as_bytes()).unwrap();
        let second = ingest(content.as_bytes()).unwrap();
        assert_eq!(first, second);
        assert!(first.records[0].same_sale(&second.records[0]));
    }
}
