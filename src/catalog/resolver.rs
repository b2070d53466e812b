//! Entity resolution
//!
//! Resolves an unclassified search term to exactly one catalog record.
//!
//! ```text
//! classify(term)
//!     ├─ Numeric(n)    ──► ordinal = n     ──► name = lower(term)
//!     ├─ StorageId(id) ──► storage_id = id ──► name = lower(term)
//!     └─ Name(s)       ──────────────────────► name = lower(term)
//!
//! first hit wins; all strategies missed ──► NotFound(term)
//! ```
//!
//! Ordinals, storage ids and names occupy disjoint key spaces, so there is
//! no ambiguity detection across strategies, only a fixed precedence.

use std::sync::Arc;

use tracing::debug;

use super::classifier::{classify, SearchTerm};
use super::types::CatalogRecord;
use crate::database::{CatalogStore, RecordFilter};
use crate::error::{CatalogError, CatalogResult};

/// Ordered lookups to attempt for a term
pub fn lookup_plan(term: &str) -> Vec<RecordFilter> {
    let by_name = RecordFilter::Name(term.to_lowercase());
    match classify(term) {
        SearchTerm::Numeric(ordinal) => vec![RecordFilter::Ordinal(ordinal), by_name],
        SearchTerm::StorageId(id) => vec![RecordFilter::StorageId(id), by_name],
        SearchTerm::Name(_) => vec![by_name],
    }
}

#[derive(Clone)]
pub struct EntityResolver {
    store: Arc<dyn CatalogStore>,
}

impl EntityResolver {
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self { store }
    }

    pub async fn resolve(&self, term: &str) -> CatalogResult<CatalogRecord> {
        for filter in lookup_plan(term) {
            let found = self
                .store
                .find_one(&filter)
                .await
                .map_err(|e| CatalogError::from_store(e, "resolve"))?;

            if let Some(record) = found {
                debug!(term = %term, strategy = filter.field(), ordinal = record.ordinal, "Resolved search term");
                return Ok(record);
            }
            debug!(term = %term, strategy = filter.field(), "Lookup strategy missed");
        }

        Err(CatalogError::not_found(term))
    }
}
