//! Catalog CRUD handlers: create, read, update, deactivate, list.

use crate::catalog::MetadataInput;
use crate::error::AppError;
use crate::response::{MetaCount, SuccessMany, SuccessOne};
use crate::service::MetadataService;
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    #[serde(default = "default_only_active")]
    pub only_active: bool,
}

fn default_only_active() -> bool {
    true
}

pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<MetadataInput>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let created = MetadataService::create(&state.pool, &input).await?;
    Ok((
        axum::http::StatusCode::CREATED,
        Json(SuccessOne {
            data: created,
            meta: None,
        }),
    ))
}

pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let rows = MetadataService::list(&state.pool, params.only_active).await?;
    let count = rows.len() as u64;
    Ok((
        axum::http::StatusCode::OK,
        Json(SuccessMany {
            data: rows,
            meta: MetaCount { count },
        }),
    ))
}

pub async fn read(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let row = MetadataService::get(&state.pool, id).await?;
    Ok((
        axum::http::StatusCode::OK,
        Json(SuccessOne {
            data: row,
            meta: None,
        }),
    ))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(input): Json<MetadataInput>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let row = MetadataService::update(&state.pool, id, &input).await?;
    Ok((
        axum::http::StatusCode::OK,
        Json(SuccessOne {
            data: row,
            meta: None,
        }),
    ))
}

pub async fn deactivate(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    MetadataService::deactivate(&state.pool, id).await?;
    Ok(axum::http::StatusCode::NO_CONTENT)
}
