//! List sales queries
//!
//! Both variants relay the ledger's paged envelope untouched. The plain list
//! uses Spring-style `sort=field,dir`; the paged list takes `sortBy` and
//! `sortDir` separately.

use serde_json::Value;

use datfeed_common::PagedResult;
use datfeed_ingest::upstream::{ListParams, PagedListParams, SalesQuery};

use crate::error::AppResult;

#[tracing::instrument(skip(query))]
pub async fn list_recent(query: &SalesQuery, params: ListParams) -> AppResult<PagedResult<Value>> {
    let page = query.list_sales(&params).await?;
    tracing::debug!(items = page.content.len(), total = page.total_elements, "Listed sales");
    Ok(page)
}

#[tracing::instrument(skip(query))]
pub async fn list_paged(
    query: &SalesQuery,
    params: PagedListParams,
) -> AppResult<PagedResult<Value>> {
    let page = query.list_sales_paged(&params).await?;
    tracing::debug!(
        items = page.content.len(),
        page = page.page_index(),
        total_pages = page.total_pages,
        "Listed sales page"
    );
    Ok(page)
}
