use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    routing::{get, post},
    Json, Router,
};
use serde_json::Value;

use datfeed_common::PagedResult;
use datfeed_ingest::upstream::{ListParams, PagedListParams, SearchParams};

use crate::api::AppState;
use crate::error::AppResult;

use super::commands::{ForwardSalesCommand, ForwardSalesResponse};
use super::queries;

pub fn sales_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_sales))
        .route("/paged", get(list_sales_paged))
        .route("/search", get(search_sales))
        .route("/forward", post(forward_sales))
}

#[tracing::instrument(skip(state, payload))]
async fn forward_sales(
    State(state): State<AppState>,
    payload: Result<Json<ForwardSalesCommand>, JsonRejection>,
) -> AppResult<Json<ForwardSalesResponse>> {
    let Json(command) = payload?;
    let response = super::commands::forward::handle(state.sink.as_ref(), command).await?;
    Ok(Json(response))
}

#[tracing::instrument(skip(state, params))]
async fn list_sales(
    State(state): State<AppState>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> AppResult<Json<PagedResult<Value>>> {
    let Query(params) = params?;
    Ok(Json(queries::list_recent(&state.query, params).await?))
}

#[tracing::instrument(skip(state, params))]
async fn list_sales_paged(
    State(state): State<AppState>,
    params: Result<Query<PagedListParams>, QueryRejection>,
) -> AppResult<Json<PagedResult<Value>>> {
    let Query(params) = params?;
    Ok(Json(queries::list_paged(&state.query, params).await?))
}

#[tracing::instrument(skip(state, params))]
async fn search_sales(
    State(state): State<AppState>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> AppResult<Json<PagedResult<Value>>> {
    let Query(params) = params?;
    Ok(Json(queries::search(&state.query, params).await?))
}
