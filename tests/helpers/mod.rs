//! Shared fixtures for catalog integration tests

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use species_catalog::catalog::PageWindow;
use species_catalog::{
    CatalogRecord, CatalogService, CatalogStore, FetchError, HttpAdapter, InMemoryCatalogStore,
    NewCatalogRecord, PaginationDefaults, RecordFilter, RecordPatch, StoreError,
};

// ============================================================================
// Catalog fixtures
// ============================================================================

pub fn catalog_over(store: Arc<InMemoryCatalogStore>) -> CatalogService {
    CatalogService::new(store, PaginationDefaults::default())
}

pub async fn seeded_store(records: &[(i64, &str)]) -> Arc<InMemoryCatalogStore> {
    let store = Arc::new(InMemoryCatalogStore::new());
    store
        .insert_many(
            records
                .iter()
                .map(|(ordinal, name)| NewCatalogRecord::new(*ordinal, *name))
                .collect(),
        )
        .await
        .expect("seed fixture records");
    store
}

// ============================================================================
// External source fixtures
// ============================================================================

/// Page body in the shape of the external species API
pub fn species_page(entries: &[(i64, &str)]) -> serde_json::Value {
    let results: Vec<serde_json::Value> = entries
        .iter()
        .map(|(ordinal, name)| {
            serde_json::json!({
                "name": name,
                "url": format!("https://pokeapi.co/api/v2/pokemon/{}/", ordinal),
            })
        })
        .collect();
    serde_json::json!({
        "count": entries.len(),
        "next": null,
        "previous": null,
        "results": results,
    })
}

/// Adapter returning a canned body and recording requested URLs
pub struct MockSpeciesSource {
    body: Option<serde_json::Value>,
    pub requested: std::sync::Mutex<Vec<String>>,
}

impl MockSpeciesSource {
    pub fn returning(body: serde_json::Value) -> Self {
        Self {
            body: Some(body),
            requested: std::sync::Mutex::new(Vec::new()),
        }
    }

    /// Adapter whose every fetch fails
    pub fn unreachable() -> Self {
        Self {
            body: None,
            requested: std::sync::Mutex::new(Vec::new()),
        }
    }

    pub fn requested_urls(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }
}

#[async_trait]
impl HttpAdapter for MockSpeciesSource {
    async fn get_json(&self, url: &str) -> Result<serde_json::Value, FetchError> {
        self.requested.lock().unwrap().push(url.to_string());
        match &self.body {
            Some(body) => Ok(body.clone()),
            None => Err(FetchError::new(url, anyhow::anyhow!("connection refused"))),
        }
    }
}

// ============================================================================
// Failing store
// ============================================================================

/// Store whose every call fails with a backend error
#[derive(Default)]
pub struct BrokenStore {
    pub calls: AtomicUsize,
}

impl BrokenStore {
    fn fail<T>(&self) -> Result<T, StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(StoreError::Backend(anyhow::anyhow!(
            "connection to server at 10.0.0.5 refused"
        )))
    }
}

#[async_trait]
impl CatalogStore for BrokenStore {
    async fn find_one(&self, _filter: &RecordFilter) -> Result<Option<CatalogRecord>, StoreError> {
        self.fail()
    }

    async fn find_many(&self, _page: PageWindow) -> Result<Vec<CatalogRecord>, StoreError> {
        self.fail()
    }

    async fn insert_one(&self, _record: NewCatalogRecord) -> Result<CatalogRecord, StoreError> {
        self.fail()
    }

    async fn insert_many(
        &self,
        _records: Vec<NewCatalogRecord>,
    ) -> Result<Vec<CatalogRecord>, StoreError> {
        self.fail()
    }

    async fn update_one(
        &self,
        _filter: &RecordFilter,
        _patch: &RecordPatch,
    ) -> Result<u64, StoreError> {
        self.fail()
    }

    async fn delete_one(&self, _filter: &RecordFilter) -> Result<u64, StoreError> {
        self.fail()
    }
}
