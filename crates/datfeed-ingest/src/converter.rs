//! Raw item to canonical sale record conversion

use rust_decimal::Decimal;

use datfeed_common::{RawItem, SaleRecord};

use crate::upstream::UpstreamSale;

/// Prefix of the run-scoped synthetic record id
pub const RECORD_ID_PREFIX: &str = "dat-";

/// Convert a parsed item into a [`SaleRecord`]
///
/// The total is always recomputed from quantity and unit value, never taken
/// from the input.
pub fn to_sale_record(item: RawItem, synthetic_index: usize) -> SaleRecord {
    let total_value = Decimal::from(item.quantity_sold) * item.product.unit_value;

    SaleRecord {
        id: format!("{}{}", RECORD_ID_PREFIX, synthetic_index),
        sale_date: item.sale_date,
        customer_name: item.client.name,
        product_name: item.product.name,
        quantity: item.quantity_sold,
        unit_value: item.product.unit_value,
        total_value,
        product_id: Some(item.product.id),
        client_id: Some(item.client.id),
    }
}

/// Convert a list of items, numbering them from 1
pub fn to_sale_records(items: impl IntoIterator<Item = RawItem>) -> Vec<SaleRecord> {
    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| to_sale_record(item, i + 1))
        .collect()
}

/// Convert a sale already in the ledger's write shape
///
/// Used when a caller echoes back the preview returned by an upload. The
/// total is recomputed the same way as for parsed items.
pub fn upstream_to_sale_record(sale: UpstreamSale, synthetic_index: usize) -> SaleRecord {
    let total_value = Decimal::from(sale.qtd_vendida) * sale.produto.valor_unit;

    SaleRecord {
        id: format!("{}{}", RECORD_ID_PREFIX, synthetic_index),
        sale_date: sale.data_venda,
        customer_name: sale.cliente.nome_cliente,
        product_name: sale.produto.nome_produto,
        quantity: sale.qtd_vendida,
        unit_value: sale.produto.valor_unit,
        total_value,
        product_id: sale.produto.id,
        client_id: sale.cliente.id_cliente,
    }
}

/// Convert a list of ledger-shaped sales, numbering them from 1
pub fn upstream_to_sale_records(sales: impl IntoIterator<Item = UpstreamSale>) -> Vec<SaleRecord> {
    sales
        .into_iter()
        .enumerate()
        .map(|(i, sale)| upstream_to_sale_record(sale, i + 1))
        .collect()
}
