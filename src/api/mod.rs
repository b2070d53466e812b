//! REST API for the species catalog

pub mod catalog_routes;
pub mod error;
pub mod seed_routes;

use std::sync::Arc;

use axum::{response::Json, routing::get, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::catalog::CatalogService;
use crate::seed::SeedService;

pub use catalog_routes::create_catalog_router;
pub use error::{ApiError, ErrorResponse};
pub use seed_routes::create_seed_router;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<CatalogService>,
    pub seed: Arc<SeedService>,
}

impl AppState {
    pub fn new(catalog: Arc<CatalogService>, seed: Arc<SeedService>) -> Self {
        Self { catalog, seed }
    }
}

/// Build the full router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .merge(create_catalog_router(state.clone()))
        .merge(create_seed_router(state))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}
