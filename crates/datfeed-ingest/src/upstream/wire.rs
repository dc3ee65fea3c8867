//! Upstream ledger wire shapes
//!
//! The ledger speaks snake_case Portuguese field names on writes and
//! camelCase on reads; both are kept out of the canonical types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use datfeed_common::SaleRecord;

// ============================================================================
// Write side
// ============================================================================

/// Product sub-object of a sale, also the body of `POST /produtos`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UpstreamProduct {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub nome_produto: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub valor_unit: Decimal,
}

/// Client sub-object of a sale, also the body of `POST /clientes`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UpstreamClient {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id_cliente: Option<i64>,
    pub nome_cliente: String,
}

/// Body of `POST /vendas`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpstreamSale {
    pub data_venda: String,
    pub qtd_vendida: i64,
    pub produto: UpstreamProduct,
    pub cliente: UpstreamClient,
}

impl From<&SaleRecord> for UpstreamSale {
    fn from(record: &SaleRecord) -> Self {
        Self {
            data_venda: record.sale_date.clone(),
            qtd_vendida: record.quantity,
            produto: UpstreamProduct {
                id: record.product_id,
                nome_produto: record.product_name.clone(),
                valor_unit: record.unit_value,
            },
            cliente: UpstreamClient {
                id_cliente: record.client_id,
                nome_cliente: record.customer_name.clone(),
            },
        }
    }
}

/// Unique products and clients referenced by a set of records, first
/// occurrence wins
pub fn unique_catalog(records: &[SaleRecord]) -> (Vec<UpstreamProduct>, Vec<UpstreamClient>) {
    let mut products: Vec<UpstreamProduct> = Vec::new();
    let mut clients: Vec<UpstreamClient> = Vec::new();

    for sale in records.iter().map(UpstreamSale::from) {
        let product_key = (sale.produto.id, sale.produto.nome_produto.as_str());
        if !products
            .iter()
            .any(|p| (p.id, p.nome_produto.as_str()) == product_key)
        {
            products.push(sale.produto.clone());
        }

        let client_key = (sale.cliente.id_cliente, sale.cliente.nome_cliente.as_str());
        if !clients
            .iter()
            .any(|c| (c.id_cliente, c.nome_cliente.as_str()) == client_key)
        {
            clients.push(sale.cliente.clone());
        }
    }

    (products, clients)
}

// ============================================================================
// Read side
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerName {
    pub nome: String,
}

/// One sale as returned by the ledger's list and search endpoints
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerSale {
    pub id: serde_json::Value,
    pub data_venda: String,
    pub cliente: LedgerName,
    pub produto: LedgerName,
    pub quantidade: i64,
    #[serde(with = "rust_decimal::serde::float")]
    pub valor_unitario: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub valor_total_venda: Decimal,
}

impl LedgerSale {
    /// Canonical view of a ledger row; the ledger's own total is kept as sent
    pub fn into_sale_record(self) -> SaleRecord {
        let id = match self.id {
            serde_json::Value::String(s) => s,
            other => other.to_string(),
        };

        SaleRecord {
            id,
            sale_date: self.data_venda,
            customer_name: self.cliente.nome,
            product_name: self.produto.nome,
            quantity: self.quantidade,
            unit_value: self.valor_unitario,
            total_value: self.valor_total_venda,
            product_id: None,
            client_id: None,
        }
    }
}
