//! Forward sale records to the upstream ledger
//!
//! Accepts canonical records, raw parsed items, or sales already in the
//! ledger's write shape (the `originalData` preview of an upload). Anything
//! but canonical records is converted first.

use serde::{Deserialize, Serialize};
use serde_json::json;

use datfeed_common::{RawItem, SaleRecord};
use datfeed_ingest::converter::{to_sale_records, upstream_to_sale_records};
use datfeed_ingest::upstream::{
    ForwardFailure, ForwardResult, ForwardStrategy, SalesSink, UpstreamSale,
};

use crate::error::AppError;

/// Records to forward, in any accepted shape
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ForwardPayload {
    Records(Vec<SaleRecord>),
    Raw(Vec<RawItem>),
    Upstream(Vec<UpstreamSale>),
}

impl ForwardPayload {
    pub fn into_records(self) -> Vec<SaleRecord> {
        match self {
            ForwardPayload::Records(records) => records,
            ForwardPayload::Raw(items) => to_sale_records(items),
            ForwardPayload::Upstream(sales) => upstream_to_sale_records(sales),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForwardSalesCommand {
    pub data: ForwardPayload,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForwardSalesResponse {
    /// True only when every record reached the ledger
    pub success: bool,
    pub strategy: ForwardStrategy,
    pub records_sent: usize,
    pub total_records: usize,
    pub failures: Vec<ForwardFailure>,
}

impl From<ForwardResult> for ForwardSalesResponse {
    fn from(result: ForwardResult) -> Self {
        Self {
            success: result.is_complete(),
            strategy: result.strategy,
            records_sent: result.records_sent,
            total_records: result.total_records,
            failures: result.failures,
        }
    }
}

#[tracing::instrument(skip(sink, command))]
pub async fn handle(
    sink: &dyn SalesSink,
    command: ForwardSalesCommand,
) -> Result<ForwardSalesResponse, AppError> {
    let records = command.data.into_records();
    let result = sink.forward(&records).await;

    if result.nothing_delivered() {
        return Err(AppError::UpstreamUnavailable {
            details: json!({
                "strategy": result.strategy,
                "recordsSent": 0,
                "totalRecords": result.total_records,
                "failures": result.failures,
            }),
        });
    }

    if !result.is_complete() {
        tracing::warn!(
            sent = result.records_sent,
            total = result.total_records,
            "Forwarding partially failed"
        );
    }

    Ok(result.into())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Records what it was asked to send and fails the configured ids
    struct RecordingSink {
        seen: Mutex<Vec<SaleRecord>>,
        failing: Vec<String>,
    }

    impl RecordingSink {
        fn failing(ids: &[&str]) -> Self {
            Self {
                seen: Mutex::new(Vec::new()),
                failing: ids.iter().map(|s| s.to_string()).collect(),
            }
        }
    }

    #[async_trait]
    impl SalesSink for RecordingSink {
        async fn forward(&self, records: &[SaleRecord]) -> ForwardResult {
            self.seen.lock().unwrap().extend_from_slice(records);
            let mut result = ForwardResult::new(ForwardStrategy::PerRecord, records.len());
            for record in records {
                if self.failing.contains(&record.id) {
                    result.failures.push(ForwardFailure {
                        record_id: Some(record.id.clone()),
                        status: Some(500),
                        message: "boom".to_string(),
                    });
                } else {
                    result.records_sent += 1;
                }
            }
            result
        }

        fn strategy(&self) -> ForwardStrategy {
            ForwardStrategy::PerRecord
        }
    }

    fn raw_payload() -> serde_json::Value {
        json!({
            "data": [
                {
                    "saleDate": "2025-01-10",
                    "quantitySold": 3,
                    "product": { "id": 1, "name": "Brigadeiro", "unitValue": 5.5 },
                    "client": { "id": 7, "name": "Maria" }
                },
                {
                    "saleDate": "2025-01-11",
                    "quantitySold": 2,
                    "product": { "id": 2, "name": "Cocada", "unitValue": 10.85 },
                    "client": { "id": 8, "name": "Joao" }
                }
            ]
        })
    }

    #[test]
    fn test_payload_accepts_canonical_records() {
        let command: ForwardSalesCommand = serde_json::from_value(json!({
            "data": [{
                "id": "dat-1",
                "saleDate": "2025-01-10",
                "customerName": "Maria",
                "productName": "Brigadeiro",
                "quantity": 3,
                "unitValue": 5.5,
                "totalValue": 16.5
            }]
        }))
        .unwrap();
        assert!(matches!(command.data, ForwardPayload::Records(ref r) if r.len() == 1));
    }

    #[test]
    fn test_payload_converts_raw_items() {
        let command: ForwardSalesCommand = serde_json::from_value(raw_payload()).unwrap();
        let records = command.data.into_records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, "dat-1");
        assert_eq!(records[1].total_value.to_string(), "21.70");
    }

    #[tokio::test]
    async fn test_payload_accepts_ledger_write_shape() {
        let sink = RecordingSink::failing(&[]);
        let command: ForwardSalesCommand = serde_json::from_value(json!({
            "data": [{
                "data_venda": "2025-01-10",
                "qtd_vendida": 21,
                "produto": { "id": 1, "nome_produto": "Brigadeiro Gourmet", "valor_unit": 200.0 },
                "cliente": { "id_cliente": 7, "nome_cliente": "Maria Clara" }
            }]
        }))
        .unwrap();
        assert!(matches!(command.data, ForwardPayload::Upstream(ref s) if s.len() == 1));

        let response = handle(&sink, command).await.unwrap();

        assert!(response.success);
        assert_eq!(response.records_sent, 1);
        let seen = sink.seen.lock().unwrap();
        assert_eq!(seen[0].id, "dat-1");
        assert_eq!(seen[0].customer_name, "Maria Clara");
        assert_eq!(serde_json::to_value(&seen[0]).unwrap()["totalValue"], 4200.0);
        assert_eq!(seen[0].client_id, Some(7));
    }

    #[tokio::test]
    async fn test_partial_failure_is_reported() {
        let sink = RecordingSink::failing(&["dat-2"]);
        let command: ForwardSalesCommand = serde_json::from_value(raw_payload()).unwrap();

        let response = handle(&sink, command).await.unwrap();

        assert!(!response.success);
        assert_eq!(response.records_sent, 1);
        assert_eq!(response.total_records, 2);
        assert_eq!(response.failures[0].record_id.as_deref(), Some("dat-2"));
        assert_eq!(sink.seen.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_nothing_delivered_is_upstream_unavailable() {
        let sink = RecordingSink::failing(&["dat-1", "dat-2"]);
        let command: ForwardSalesCommand = serde_json::from_value(raw_payload()).unwrap();

        let err = handle(&sink, command).await.unwrap_err();
        match err {
            AppError::UpstreamUnavailable { details } => {
                assert_eq!(details["totalRecords"], 2);
                assert_eq!(details["failures"].as_array().unwrap().len(), 2);
            },
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_empty_list_succeeds() {
        let sink = RecordingSink::failing(&[]);
        let command = ForwardSalesCommand {
            data: ForwardPayload::Records(Vec::new()),
        };

        let response = handle(&sink, command).await.unwrap();
        assert!(response.success);
        assert_eq!(response.total_records, 0);
    }
}
