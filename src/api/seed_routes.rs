//! Seed API route
//!
//! - `GET /api/seed` - run the one-shot seed, 201 with the raw entries fetched

use axum::{extract::State, http::StatusCode, response::Json, routing::get, Router};

use super::error::ApiError;
use super::AppState;
use crate::species_source::NamedResource;

pub fn create_seed_router(state: AppState) -> Router {
    Router::new()
        .route("/api/seed", get(execute_seed))
        .with_state(state)
}

async fn execute_seed(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<Vec<NamedResource>>), ApiError> {
    let entries = state.seed.execute_seed().await?;
    Ok((StatusCode::CREATED, Json(entries)))
}
