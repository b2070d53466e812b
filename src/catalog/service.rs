//! Catalog Service - CRUD orchestration for species records
//!
//! Normalizes names on every write, resolves reads and updates through the
//! [`EntityResolver`], and translates store failures into [`CatalogError`].

use std::sync::Arc;

use tracing::{debug, info};
use uuid::Uuid;

use super::resolver::EntityResolver;
use super::types::{CatalogRecord, NewCatalogRecord, PageRequest, RecordPatch};
use crate::config::PaginationDefaults;
use crate::database::{CatalogStore, RecordFilter};
use crate::error::{CatalogError, CatalogResult};

#[derive(Clone)]
pub struct CatalogService {
    store: Arc<dyn CatalogStore>,
    resolver: EntityResolver,
    pagination: PaginationDefaults,
}

impl CatalogService {
    pub fn new(store: Arc<dyn CatalogStore>, pagination: PaginationDefaults) -> Self {
        Self {
            resolver: EntityResolver::new(store.clone()),
            store,
            pagination,
        }
    }

    pub async fn create(&self, input: NewCatalogRecord) -> CatalogResult<CatalogRecord> {
        let input = input.normalized()?;
        let record = self
            .store
            .insert_one(input)
            .await
            .map_err(|e| CatalogError::from_store(e, "create"))?;

        info!(ordinal = record.ordinal, name = %record.name, "Created catalog record");
        Ok(record)
    }

    /// Bulk insert. The batch is committed whole or not at all; any
    /// duplicate (against the store or inside the batch) fails the call
    /// with `Conflict`.
    pub async fn create_many(
        &self,
        inputs: Vec<NewCatalogRecord>,
    ) -> CatalogResult<Vec<CatalogRecord>> {
        let inputs = inputs
            .into_iter()
            .map(NewCatalogRecord::normalized)
            .collect::<CatalogResult<Vec<_>>>()?;

        if inputs.is_empty() {
            return Ok(Vec::new());
        }

        let records = self
            .store
            .insert_many(inputs)
            .await
            .map_err(|e| CatalogError::from_store(e, "create_many"))?;

        info!(count = records.len(), "Created catalog records in bulk");
        Ok(records)
    }

    /// Records ordered by ordinal ascending
    pub async fn find_all(&self, page: PageRequest) -> CatalogResult<Vec<CatalogRecord>> {
        let window = page.resolve(self.pagination)?;
        self.store
            .find_many(window)
            .await
            .map_err(|e| CatalogError::from_store(e, "find_all"))
    }

    pub async fn find_one(&self, term: &str) -> CatalogResult<CatalogRecord> {
        self.resolver.resolve(term).await
    }

    /// Resolve `term` with the same precedence as reads, then update the
    /// resolved record by ordinal. Returns the number of records updated.
    pub async fn update(&self, term: &str, patch: RecordPatch) -> CatalogResult<u64> {
        let patch = patch.normalized()?;
        let record = self.resolver.resolve(term).await?;

        if patch.is_empty() {
            debug!(ordinal = record.ordinal, "Empty patch, nothing to update");
            return Ok(0);
        }

        let updated = self
            .store
            .update_one(&RecordFilter::Ordinal(record.ordinal), &patch)
            .await
            .map_err(|e| CatalogError::from_store(e, "update"))?;

        info!(
            ordinal = record.ordinal,
            name = ?patch.name,
            updated,
            "Updated catalog record"
        );
        Ok(updated)
    }

    /// Delete strictly by storage id. Fails with `NotFound` when nothing
    /// was deleted.
    pub async fn remove(&self, storage_id: Uuid) -> CatalogResult<u64> {
        let deleted = self
            .store
            .delete_one(&RecordFilter::StorageId(storage_id))
            .await
            .map_err(|e| CatalogError::from_store(e, "remove"))?;

        if deleted == 0 {
            return Err(CatalogError::not_found(storage_id.to_string()));
        }

        info!(storage_id = %storage_id, "Deleted catalog record");
        Ok(deleted)
    }

    /// Drop inputs whose ordinal or normalized name is already stored.
    /// Used by the skip-existing seed mode.
    pub async fn retain_unseen(
        &self,
        inputs: Vec<NewCatalogRecord>,
    ) -> CatalogResult<Vec<NewCatalogRecord>> {
        let mut unseen = Vec::with_capacity(inputs.len());

        for input in inputs {
            let input = input.normalized()?;
            if self.exists(&RecordFilter::Ordinal(input.ordinal)).await?
                || self.exists(&RecordFilter::Name(input.name.clone())).await?
            {
                debug!(ordinal = input.ordinal, name = %input.name, "Record already present");
                continue;
            }
            unseen.push(input);
        }

        Ok(unseen)
    }

    async fn exists(&self, filter: &RecordFilter) -> CatalogResult<bool> {
        self.store
            .find_one(filter)
            .await
            .map(|found| found.is_some())
            .map_err(|e| CatalogError::from_store(e, "exists"))
    }
}
