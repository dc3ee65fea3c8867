//! Ingest an uploaded `.dat` file
//!
//! Validates the upload, runs it through the ingestion coordinator and
//! answers with the accepted records plus a report of every rejected line.
//! `originalData` repeats the accepted records in the ledger's write shape
//! so a client can preview them and post them back to the forward endpoint.

use serde::{Deserialize, Serialize};

use datfeed_common::checksum::sha256_hex;
use datfeed_common::{RejectedLine, SaleRecord};
use datfeed_ingest::upstream::UpstreamSale;
use datfeed_ingest::{IngestError, IngestionCoordinator};

use crate::error::AppError;
use crate::features::shared::validation::{validate_dat_filename, FilenameValidationError};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestFileCommand {
    pub filename: String,
    #[serde(skip)]
    pub content: Vec<u8>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestFileResponse {
    pub success: bool,
    pub data: Vec<SaleRecord>,
    pub original_data: Vec<UpstreamSale>,
    pub records_processed: usize,
    pub records_rejected: usize,
    pub rejected_lines: Vec<RejectedLine>,
    pub filename: String,
    pub size: usize,
    pub checksum: String,
}

#[derive(Debug, thiserror::Error)]
pub enum IngestFileError {
    #[error(transparent)]
    Filename(#[from] FilenameValidationError),
    #[error("File content is required and cannot be empty")]
    ContentRequired,
    #[error("File could not be decoded: {0}")]
    Decode(#[from] IngestError),
}

impl IngestFileCommand {
    pub fn validate(&self) -> Result<(), IngestFileError> {
        validate_dat_filename(&self.filename)?;
        if self.content.is_empty() {
            return Err(IngestFileError::ContentRequired);
        }
        Ok(())
    }
}

impl From<IngestFileError> for AppError {
    fn from(err: IngestFileError) -> Self {
        match err {
            IngestFileError::Filename(_) | IngestFileError::ContentRequired => {
                AppError::Validation(err.to_string())
            },
            IngestFileError::Decode(e) => e.into(),
        }
    }
}

#[tracing::instrument(skip(coordinator, command), fields(filename = %command.filename, size = command.content.len()))]
pub fn handle(
    coordinator: &IngestionCoordinator,
    command: IngestFileCommand,
) -> Result<IngestFileResponse, IngestFileError> {
    command.validate()?;

    let checksum = sha256_hex(&command.content);
    let result = coordinator.ingest(&command.content)?;

    tracing::info!(
        processed = result.records_processed,
        rejected = result.records_rejected,
        checksum = %checksum,
        "Sales file ingested"
    );

    let original_data = result.records.iter().map(UpstreamSale::from).collect();

    Ok(IngestFileResponse {
        success: true,
        data: result.records,
        original_data,
        records_processed: result.records_processed,
        records_rejected: result.records_rejected,
        rejected_lines: result.rejected_lines,
        filename: command.filename.trim().to_string(),
        size: command.content.len(),
        checksum,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn line(product_id: u32, name: &str, client: &str, qty: u32, cents: u32) -> String {
        format!(
            "{:0>4}{:<54}{:0>4}{:<50}{:0>4}{:0>9}{:<11}",
            product_id,
            name,
            7,
            client,
            qty,
            format!("{}.{:02}", cents / 100, cents % 100),
            "2025-01-10"
        )
    }

    fn command(filename: &str, content: &str) -> IngestFileCommand {
        IngestFileCommand {
            filename: filename.to_string(),
            content: content.as_bytes().to_vec(),
        }
    }

    #[test]
    fn test_validation_success() {
        assert!(command("vendas.dat", "x").validate().is_ok());
    }

    #[test]
    fn test_validation_wrong_extension() {
        assert!(matches!(
            command("vendas.csv", "x").validate(),
            Err(IngestFileError::Filename(FilenameValidationError::InvalidExtension { .. }))
        ));
    }

    #[test]
    fn test_validation_empty_content() {
        assert!(matches!(
            command("vendas.dat", "").validate(),
            Err(IngestFileError::ContentRequired)
        ));
    }

    #[test]
    fn test_handle_reports_records_and_rejections() {
        let content = format!(
            "{}\nshort line\n{}\n",
            line(1, "Brigadeiro", "Maria", 3, 550),
            line(2, "Cocada", "Joao", 2, 1085)
        );

        let response =
            handle(&IngestionCoordinator::new(), command(" vendas.dat ", &content)).unwrap();

        assert!(response.success);
        assert_eq!(response.records_processed, 2);
        assert_eq!(response.records_rejected, 1);
        assert_eq!(response.rejected_lines[0].line_number, 2);
        assert_eq!(response.filename, "vendas.dat");
        assert_eq!(response.size, content.len());
        assert_eq!(response.checksum, sha256_hex(content.as_bytes()));
        assert_eq!(response.data[1].total_value.to_string(), "21.70");

        assert_eq!(response.original_data.len(), 2);
        assert_eq!(response.original_data[1].produto.nome_produto, "Cocada");
        assert_eq!(response.original_data[1].produto.id, Some(2));
        assert_eq!(response.original_data[1].cliente.nome_cliente, "Joao");
        assert_eq!(response.original_data[1].qtd_vendida, 2);
    }

    #[test]
    fn test_handle_rejects_invalid_utf8() {
        let cmd = IngestFileCommand {
            filename: "vendas.dat".to_string(),
            content: vec![0xff, 0xfe, 0x00],
        };
        assert!(matches!(
            handle(&IngestionCoordinator::new(), cmd),
            Err(IngestFileError::Decode(_))
        ));
    }
}
