//! In-memory store gateway

use std::collections::{BTreeMap, HashMap, HashSet};

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{CatalogStore, RecordFilter, StoreError};
use crate::catalog::{CatalogRecord, NewCatalogRecord, PageWindow, RecordPatch};

#[derive(Debug, Default)]
struct MemoryState {
    /// Primary map, keyed and therefore ordered by ordinal
    by_ordinal: BTreeMap<i64, CatalogRecord>,
    /// name -> ordinal
    name_index: HashMap<String, i64>,
}

impl MemoryState {
    fn check_new(&self, record: &NewCatalogRecord) -> Result<(), StoreError> {
        if self.by_ordinal.contains_key(&record.ordinal) {
            return Err(unique_violation("ordinal", record.ordinal));
        }
        if self.name_index.contains_key(&record.name) {
            return Err(unique_violation("name", &record.name));
        }
        Ok(())
    }

    fn insert(&mut self, record: NewCatalogRecord) -> CatalogRecord {
        let stored = CatalogRecord {
            storage_id: Uuid::now_v7(),
            ordinal: record.ordinal,
            name: record.name,
        };
        self.name_index.insert(stored.name.clone(), stored.ordinal);
        self.by_ordinal.insert(stored.ordinal, stored.clone());
        stored
    }

    fn find(&self, filter: &RecordFilter) -> Option<&CatalogRecord> {
        match filter {
            RecordFilter::Ordinal(ordinal) => self.by_ordinal.get(ordinal),
            RecordFilter::Name(name) => self
                .name_index
                .get(name)
                .and_then(|ordinal| self.by_ordinal.get(ordinal)),
            RecordFilter::StorageId(_) => self.by_ordinal.values().find(|r| filter.matches(r)),
        }
    }
}

fn unique_violation(key: &str, value: impl ToString) -> StoreError {
    StoreError::UniqueViolation {
        key: key.to_string(),
        value: value.to_string(),
    }
}

/// Process-local store with the same invariants as the Postgres store
#[derive(Debug, Default)]
pub struct InMemoryCatalogStore {
    state: RwLock<MemoryState>,
}

impl InMemoryCatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.state.read().await.by_ordinal.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Full snapshot ordered by ordinal
    pub async fn snapshot(&self) -> Vec<CatalogRecord> {
        self.state.read().await.by_ordinal.values().cloned().collect()
    }
}

#[async_trait]
impl CatalogStore for InMemoryCatalogStore {
    async fn find_one(&self, filter: &RecordFilter) -> Result<Option<CatalogRecord>, StoreError> {
        Ok(self.state.read().await.find(filter).cloned())
    }

    async fn find_many(&self, page: PageWindow) -> Result<Vec<CatalogRecord>, StoreError> {
        let state = self.state.read().await;
        Ok(state
            .by_ordinal
            .values()
            .skip(page.offset as usize)
            .take(page.limit as usize)
            .cloned()
            .collect())
    }

    async fn insert_one(&self, record: NewCatalogRecord) -> Result<CatalogRecord, StoreError> {
        let mut state = self.state.write().await;
        state.check_new(&record)?;
        Ok(state.insert(record))
    }

    async fn insert_many(
        &self,
        records: Vec<NewCatalogRecord>,
    ) -> Result<Vec<CatalogRecord>, StoreError> {
        let mut state = self.state.write().await;

        // Validate the whole batch, including duplicates inside it, before writing anything
        {
            let mut batch_ordinals = HashSet::new();
            let mut batch_names = HashSet::new();
            for record in &records {
                state.check_new(record)?;
                if !batch_ordinals.insert(record.ordinal) {
                    return Err(unique_violation("ordinal", record.ordinal));
                }
                if !batch_names.insert(record.name.as_str()) {
                    return Err(unique_violation("name", &record.name));
                }
            }
        }

        Ok(records.into_iter().map(|r| state.insert(r)).collect())
    }

    async fn update_one(
        &self,
        filter: &RecordFilter,
        patch: &RecordPatch,
    ) -> Result<u64, StoreError> {
        let mut state = self.state.write().await;
        let Some(current) = state.find(filter).cloned() else {
            return Ok(0);
        };

        if let Some(new_name) = &patch.name {
            if *new_name != current.name {
                if state.name_index.contains_key(new_name) {
                    return Err(unique_violation("name", new_name));
                }
                state.name_index.remove(&current.name);
                state.name_index.insert(new_name.clone(), current.ordinal);
                if let Some(stored) = state.by_ordinal.get_mut(&current.ordinal) {
                    stored.name = new_name.clone();
                }
            }
        }

        Ok(1)
    }

    async fn delete_one(&self, filter: &RecordFilter) -> Result<u64, StoreError> {
        let mut state = self.state.write().await;
        let Some(found) = state.find(filter).cloned() else {
            return Ok(0);
        };
        state.name_index.remove(&found.name);
        state.by_ordinal.remove(&found.ordinal);
        Ok(1)
    }
}
