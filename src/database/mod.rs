//! Store gateway
//!
//! [`CatalogStore`] is the only way the catalog touches persistence. Two
//! implementations exist: [`InMemoryCatalogStore`] (tests, `--store memory`)
//! and, with the `database` feature, [`PgCatalogStore`] on Postgres.
//!
//! Both enforce the identity invariants: one record per ordinal and one per
//! lower-cased name. A write that would break either fails with
//! [`StoreError::UniqueViolation`] and leaves the store unchanged.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::catalog::{CatalogRecord, NewCatalogRecord, PageWindow, RecordPatch};

pub mod memory_store;

#[cfg(feature = "database")]
pub mod catalog_repository;

pub use memory_store::InMemoryCatalogStore;

#[cfg(feature = "database")]
pub use catalog_repository::{DatabaseConfig, PgCatalogStore};

/// Single-field equality predicate over a catalog record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordFilter {
    Ordinal(i64),
    StorageId(Uuid),
    /// Compared against the stored (already lower-cased) name
    Name(String),
}

impl RecordFilter {
    pub fn matches(&self, record: &CatalogRecord) -> bool {
        match self {
            Self::Ordinal(ordinal) => record.ordinal == *ordinal,
            Self::StorageId(id) => record.storage_id == *id,
            Self::Name(name) => record.name == *name,
        }
    }

    pub fn field(&self) -> &'static str {
        match self {
            Self::Ordinal(_) => "ordinal",
            Self::StorageId(_) => "storage_id",
            Self::Name(_) => "name",
        }
    }
}

impl std::fmt::Display for RecordFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ordinal(ordinal) => write!(f, "ordinal = {}", ordinal),
            Self::StorageId(id) => write!(f, "storage_id = {}", id),
            Self::Name(name) => write!(f, "name = '{}'", name),
        }
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("unique violation on {key} = {value}")]
    UniqueViolation { key: String, value: String },

    #[error("store backend failure: {0}")]
    Backend(#[from] anyhow::Error),
}

/// Persistence capability set consumed by the catalog.
///
/// Each call is atomic with respect to the records it touches. `insert_many`
/// is all-or-nothing.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn find_one(&self, filter: &RecordFilter) -> Result<Option<CatalogRecord>, StoreError>;

    /// Records ordered by ordinal ascending, windowed by `page`.
    async fn find_many(&self, page: PageWindow) -> Result<Vec<CatalogRecord>, StoreError>;

    async fn insert_one(&self, record: NewCatalogRecord) -> Result<CatalogRecord, StoreError>;

    async fn insert_many(
        &self,
        records: Vec<NewCatalogRecord>,
    ) -> Result<Vec<CatalogRecord>, StoreError>;

    /// Returns the number of records updated.
    async fn update_one(&self, filter: &RecordFilter, patch: &RecordPatch)
        -> Result<u64, StoreError>;

    /// Returns the number of records deleted.
    async fn delete_one(&self, filter: &RecordFilter) -> Result<u64, StoreError>;
}
