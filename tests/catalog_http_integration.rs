//! HTTP router tests over the in-memory store, driven with `oneshot`

#![cfg(feature = "server")]

mod helpers;

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use helpers::{catalog_over, seeded_store, species_page, MockSpeciesSource};
use species_catalog::api::{build_router, AppState};
use species_catalog::{InMemoryCatalogStore, SeedConfig, SeedService};

fn app_over(store: Arc<InMemoryCatalogStore>, source: MockSpeciesSource) -> Router {
    let catalog = Arc::new(catalog_over(store));
    let seed = Arc::new(SeedService::new(
        catalog.clone(),
        Arc::new(source),
        SeedConfig::default(),
    ));
    build_router(AppState::new(catalog, seed))
}

async fn app(records: &[(i64, &str)]) -> Router {
    app_over(
        seeded_store(records).await,
        MockSpeciesSource::unreachable(),
    )
}

async fn send(app: Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

#[tokio::test]
async fn health_is_ok() {
    let (status, body) = send(app(&[]).await, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn create_returns_201_with_normalized_record() {
    let (status, body) = send(
        app(&[]).await,
        "POST",
        "/api/catalog",
        Some(json!({ "ordinal": 25, "name": "Pikachu" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["ordinal"], 25);
    assert_eq!(body["name"], "pikachu");
    assert!(body["storage_id"].is_string());
}

#[tokio::test]
async fn create_duplicate_returns_409() {
    let (status, body) = send(
        app(&[(25, "pikachu")]).await,
        "POST",
        "/api/catalog",
        Some(json!({ "ordinal": 25, "name": "raichu" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], true);
    assert_eq!(body["code"], "CONFLICT");
}

#[tokio::test]
async fn create_invalid_returns_400() {
    let (status, body) = send(
        app(&[]).await,
        "POST",
        "/api/catalog",
        Some(json!({ "ordinal": 0, "name": "ghost" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_INPUT");
}

#[tokio::test]
async fn malformed_body_returns_json_400() {
    let (status, body) = send(
        app(&[]).await,
        "POST",
        "/api/catalog",
        Some(json!({ "ordinal": "x", "name": "ghost" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], true);
    assert_eq!(body["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn malformed_patch_body_returns_json_400() {
    let (status, body) = send(
        app(&[(1, "bulbasaur")]).await,
        "PATCH",
        "/api/catalog/1",
        Some(json!({ "name": 7 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn malformed_query_returns_json_400() {
    let (status, body) = send(app(&[]).await, "GET", "/api/catalog?offset=-1", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], true);
    assert_eq!(body["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn list_honours_limit_and_offset() {
    let router = app(&[(1, "bulbasaur"), (2, "ivysaur"), (3, "venusaur")]).await;
    let (status, body) = send(router, "GET", "/api/catalog?limit=2&offset=1", None).await;
    assert_eq!(status, StatusCode::OK);
    let ordinals: Vec<i64> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["ordinal"].as_i64().unwrap())
        .collect();
    assert_eq!(ordinals, vec![2, 3]);
}

#[tokio::test]
async fn find_by_ordinal_and_name() {
    let router = app(&[(25, "pikachu")]).await;

    let (status, body) = send(router.clone(), "GET", "/api/catalog/25", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "pikachu");

    let (status, body) = send(router, "GET", "/api/catalog/PIKACHU", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ordinal"], 25);
}

#[tokio::test]
async fn find_unknown_returns_404() {
    let (status, body) = send(app(&[]).await, "GET", "/api/catalog/missingno", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn patch_renames_record() {
    let router = app(&[(1, "bulbasaur")]).await;

    let (status, body) = send(
        router.clone(),
        "PATCH",
        "/api/catalog/1",
        Some(json!({ "name": "Foo" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["updated"], 1);

    let (status, body) = send(router, "GET", "/api/catalog/foo", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ordinal"], 1);
}

#[tokio::test]
async fn delete_by_storage_id_then_404() {
    let store = seeded_store(&[(1, "bulbasaur")]).await;
    let router = app_over(store.clone(), MockSpeciesSource::unreachable());
    let id = store.snapshot().await[0].storage_id;
    let uri = format!("/api/catalog/{}", id);

    let (status, body) = send(router.clone(), "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["deleted"], 1);

    let (status, _) = send(router, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_by_ordinal_is_rejected() {
    let store = seeded_store(&[(1, "bulbasaur")]).await;
    let router = app_over(store.clone(), MockSpeciesSource::unreachable());

    let (status, body) = send(router, "DELETE", "/api/catalog/1", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "BAD_REQUEST");
    assert_eq!(store.len().await, 1);
}

#[tokio::test]
async fn seed_returns_201_with_raw_entries() {
    let store = Arc::new(InMemoryCatalogStore::new());
    let source = MockSpeciesSource::returning(species_page(&[(1, "bulbasaur"), (25, "pikachu")]));
    let router = app_over(store.clone(), source);

    let (status, body) = send(router, "GET", "/api/seed", None).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body.as_array().unwrap().len(), 2);
    assert_eq!(body[1]["url"], "https://pokeapi.co/api/v2/pokemon/25/");
    assert_eq!(store.len().await, 2);
}

#[tokio::test]
async fn seed_with_unreachable_source_returns_502() {
    let store = Arc::new(InMemoryCatalogStore::new());
    let router = app_over(store.clone(), MockSpeciesSource::unreachable());

    let (status, body) = send(router, "GET", "/api/seed", None).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"], true);
    assert!(store.is_empty().await);
}
