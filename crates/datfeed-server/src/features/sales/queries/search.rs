//! Search sales by customer or product

use serde_json::Value;

use datfeed_common::PagedResult;
use datfeed_ingest::upstream::{SalesQuery, SearchParams};

use crate::error::AppResult;

#[tracing::instrument(skip(query))]
pub async fn search(query: &SalesQuery, params: SearchParams) -> AppResult<PagedResult<Value>> {
    let page = query.search_sales(&params).await?;
    tracing::debug!(matches = page.total_elements, "Searched sales");
    Ok(page)
}
