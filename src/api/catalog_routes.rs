//! Catalog REST API routes
//!
//! ## Endpoints
//!
//! - `POST   /api/catalog`            - create a record
//! - `GET    /api/catalog`            - list records (`?limit=&offset=`)
//! - `GET    /api/catalog/:term`      - find by ordinal, storage id or name
//! - `PATCH  /api/catalog/:term`      - rename a record found by any identifier
//! - `DELETE /api/catalog/:id`        - delete by storage id only

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use serde::Serialize;
use uuid::Uuid;

use super::error::ApiError;
use super::AppState;
use crate::catalog::{CatalogRecord, NewCatalogRecord, PageRequest, RecordPatch};

// ============================================================================
// Response Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct UpdateResponse {
    pub updated: u64,
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub deleted: u64,
}

// ============================================================================
// Router Creation
// ============================================================================

pub fn create_catalog_router(state: AppState) -> Router {
    Router::new()
        .route("/api/catalog", get(find_all).post(create))
        .route(
            "/api/catalog/:term",
            get(find_one).patch(update).delete(remove),
        )
        .with_state(state)
}

// ============================================================================
// Handlers
// ============================================================================

async fn create(
    State(state): State<AppState>,
    input: Result<Json<NewCatalogRecord>, JsonRejection>,
) -> Result<(StatusCode, Json<CatalogRecord>), ApiError> {
    let Json(input) = input?;
    let record = state.catalog.create(input).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

async fn find_all(
    State(state): State<AppState>,
    page: Result<Query<PageRequest>, QueryRejection>,
) -> Result<Json<Vec<CatalogRecord>>, ApiError> {
    let Query(page) = page?;
    Ok(Json(state.catalog.find_all(page).await?))
}

async fn find_one(
    State(state): State<AppState>,
    Path(term): Path<String>,
) -> Result<Json<CatalogRecord>, ApiError> {
    Ok(Json(state.catalog.find_one(&term).await?))
}

async fn update(
    State(state): State<AppState>,
    Path(term): Path<String>,
    patch: Result<Json<RecordPatch>, JsonRejection>,
) -> Result<Json<UpdateResponse>, ApiError> {
    let Json(patch) = patch?;
    let updated = state.catalog.update(&term, patch).await?;
    Ok(Json(UpdateResponse { updated }))
}

async fn remove(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let storage_id = parse_storage_id(&id)?;
    let deleted = state.catalog.remove(storage_id).await?;
    Ok(Json(DeleteResponse { deleted }))
}

/// Delete only accepts the precise storage handle
fn parse_storage_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw)
        .map_err(|_| ApiError::BadRequest(format!("'{}' is not a valid storage id", raw)))
}
