//! Dynamic query handlers.

use crate::error::AppError;
use crate::response::QueryResponse;
use crate::service::QueryService;
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryParams {
    #[serde(default)]
    pub joins: bool,
    #[serde(default = "default_depth")]
    pub depth: u8,
    #[serde(default)]
    pub hierarchical: bool,
}

fn default_depth() -> u8 {
    1
}

pub async fn query_table(
    State(state): State<AppState>,
    Path(table): Path<String>,
    Query(params): Query<QueryParams>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let output = QueryService::query_table(
        &state.pool,
        &table,
        params.joins,
        params.depth,
        params.hierarchical,
    )
    .await?;
    Ok((
        axum::http::StatusCode::OK,
        Json(QueryResponse::from_output(output, params.joins, params.depth)),
    ))
}

pub async fn list_tables(
    State(state): State<AppState>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let tables = QueryService::list_tables(&state.pool).await?;
    Ok((
        axum::http::StatusCode::OK,
        Json(serde_json::json!({
            "total": tables.len(),
            "tables": tables
        })),
    ))
}
