//! Query passthrough
//!
//! Relays pagination, sort and search parameters to the ledger and hands its
//! paged envelope back unchanged. Items stay untyped JSON so nothing the
//! ledger sends is lost on the way through.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use datfeed_common::{PagedResult, SaleRecord};

use super::client::{LedgerClient, UpstreamError, SALES_PAGED_PATH, SALES_PATH, SALES_SEARCH_PATH};
use super::wire::LedgerSale;

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_PAGE: u32 = 0;
pub const DEFAULT_LIST_SIZE: u32 = 10;
pub const DEFAULT_PAGED_SIZE: u32 = 20;
pub const MAX_PAGE_SIZE: u32 = 100;
pub const DEFAULT_LIST_SORT: &str = "id,desc";
pub const DEFAULT_SORT_BY: &str = "dataVenda";
pub const DEFAULT_SORT_DIR: &str = "desc";

// ============================================================================
// Errors
// ============================================================================

#[derive(Error, Debug)]
pub enum QueryError {
    #[error("search term is required")]
    TermRequired,

    #[error("page size must be between 1 and {max}, got {size}")]
    InvalidSize { size: u32, max: u32 },

    #[error("sort direction must be 'asc' or 'desc', got '{0}'")]
    InvalidSortDirection(String),

    #[error(transparent)]
    Upstream(#[from] UpstreamError),
}

impl QueryError {
    /// Caller mistakes, as opposed to upstream failures
    pub fn is_validation(&self) -> bool {
        !matches!(self, QueryError::Upstream(_))
    }
}

// ============================================================================
// Parameters
// ============================================================================

/// Parameters of `GET /vendas`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListParams {
    pub page: Option<u32>,
    pub size: Option<u32>,
    /// `field,direction`, e.g. `id,desc`
    pub sort: Option<String>,
}

/// Parameters of `GET /vendas/paginado`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PagedListParams {
    pub page: Option<u32>,
    pub size: Option<u32>,
    pub sort_by: Option<String>,
    pub sort_dir: Option<String>,
}

/// Parameters of `GET /vendas/buscar`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchParams {
    #[serde(alias = "query", alias = "termo")]
    pub term: Option<String>,
    pub page: Option<u32>,
    pub size: Option<u32>,
}

fn validate_size(size: Option<u32>, default: u32) -> Result<u32, QueryError> {
    let size = size.unwrap_or(default);
    if size == 0 || size > MAX_PAGE_SIZE {
        return Err(QueryError::InvalidSize {
            size,
            max: MAX_PAGE_SIZE,
        });
    }
    Ok(size)
}

fn validate_direction(direction: &str) -> Result<String, QueryError> {
    let normalized = direction.trim().to_lowercase();
    match normalized.as_str() {
        "asc" | "desc" => Ok(normalized),
        _ => Err(QueryError::InvalidSortDirection(direction.to_string())),
    }
}

/// Validate a `field,direction` sort spec; a bare field is accepted as is
fn validate_sort(sort: Option<&str>) -> Result<String, QueryError> {
    let sort = match sort.map(str::trim) {
        Some(s) if !s.is_empty() => s,
        _ => return Ok(DEFAULT_LIST_SORT.to_string()),
    };

    match sort.split_once(',') {
        Some((field, direction)) => {
            let direction = validate_direction(direction)?;
            Ok(format!("{},{}", field.trim(), direction))
        },
        None => Ok(sort.to_string()),
    }
}

// ============================================================================
// Query service
// ============================================================================

/// Read side of the upstream ledger
#[derive(Debug, Clone)]
pub struct SalesQuery {
    client: LedgerClient,
}

impl SalesQuery {
    pub fn new(client: LedgerClient) -> Self {
        Self { client }
    }

    /// `GET /vendas?page&size&sort`
    #[tracing::instrument(skip(self))]
    pub async fn list_sales(&self, params: &ListParams) -> Result<PagedResult<Value>, QueryError> {
        let size = validate_size(params.size, DEFAULT_LIST_SIZE)?;
        let sort = validate_sort(params.sort.as_deref())?;
        let query = [
            ("page", params.page.unwrap_or(DEFAULT_PAGE).to_string()),
            ("size", size.to_string()),
            ("sort", sort),
        ];

        Ok(self.client.get_json(SALES_PATH, &query).await?)
    }

    /// `GET /vendas/paginado?page&size&sortBy&sortDir`
    #[tracing::instrument(skip(self))]
    pub async fn list_sales_paged(
        &self,
        params: &PagedListParams,
    ) -> Result<PagedResult<Value>, QueryError> {
        let size = validate_size(params.size, DEFAULT_PAGED_SIZE)?;
        let sort_dir = validate_direction(params.sort_dir.as_deref().unwrap_or(DEFAULT_SORT_DIR))?;
        let sort_by = params
            .sort_by
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_SORT_BY);

        let query = [
            ("page", params.page.unwrap_or(DEFAULT_PAGE).to_string()),
            ("size", size.to_string()),
            ("sortBy", sort_by.to_string()),
            ("sortDir", sort_dir),
        ];

        Ok(self.client.get_json(SALES_PAGED_PATH, &query).await?)
    }

    /// `GET /vendas/buscar?termo&page&size`
    #[tracing::instrument(skip(self))]
    pub async fn search_sales(
        &self,
        params: &SearchParams,
    ) -> Result<PagedResult<Value>, QueryError> {
        let term = params
            .term
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(QueryError::TermRequired)?;
        let size = validate_size(params.size, DEFAULT_PAGED_SIZE)?;

        let query = [
            ("termo", term.to_string()),
            ("page", params.page.unwrap_or(DEFAULT_PAGE).to_string()),
            ("size", size.to_string()),
        ];

        Ok(self.client.get_json(SALES_SEARCH_PATH, &query).await?)
    }
}

/// Decode relayed ledger rows into canonical records
pub fn into_sale_records(
    page: PagedResult<Value>,
) -> Result<PagedResult<SaleRecord>, UpstreamError> {
    page.try_map(|item| {
        serde_json::from_value::<LedgerSale>(item)
            .map(LedgerSale::into_sale_record)
            .map_err(|e| UpstreamError::Decode(e.to_string()))
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_size() {
        assert_eq!(validate_size(None, 10).unwrap(), 10);
        assert_eq!(validate_size(Some(100), 10).unwrap(), 100);
        assert!(matches!(
            validate_size(Some(0), 10),
            Err(QueryError::InvalidSize { size: 0, max: 100 })
        ));
        assert!(validate_size(Some(101), 10).is_err());
    }

    #[test]
    fn test_validate_sort() {
        assert_eq!(validate_sort(None).unwrap(), "id,desc");
        assert_eq!(validate_sort(Some("  ")).unwrap(), "id,desc");
        assert_eq!(validate_sort(Some("dataVenda,ASC")).unwrap(), "dataVenda,asc");
        assert_eq!(validate_sort(Some("quantidade")).unwrap(), "quantidade");
        assert!(matches!(
            validate_sort(Some("id,sideways")),
            Err(QueryError::InvalidSortDirection(_))
        ));
    }

    #[test]
    fn test_search_params_accept_both_names() {
        let params: SearchParams = serde_json::from_value(serde_json::json!({"termo": "bolo"})).unwrap();
        assert_eq!(params.term.as_deref(), Some("bolo"));
        let params: SearchParams = serde_json::from_value(serde_json::json!({"query": "torta"})).unwrap();
        assert_eq!(params.term.as_deref(), Some("torta"));
    }

    #[test]
    fn test_query_error_classification() {
        assert!(QueryError::TermRequired.is_validation());
        assert!(!QueryError::Upstream(UpstreamError::Decode("x".into())).is_validation());
    }
}
