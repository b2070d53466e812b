//! Seed Service
//!
//! One-shot bulk population of the catalog from the external source:
//! fetch a single page, transform each entry into `{ordinal, name}`, and
//! hand the whole batch to [`CatalogService::create_many`].

use std::sync::Arc;

use tracing::{info, warn};

use crate::catalog::{CatalogService, NewCatalogRecord};
use crate::config::{SeedConfig, SeedMode};
use crate::error::{CatalogError, CatalogResult};
use crate::species_source::{fetch_json, HttpAdapter, NamedResource, SpeciesPage};

pub struct SeedService {
    catalog: Arc<CatalogService>,
    http: Arc<dyn HttpAdapter>,
    config: SeedConfig,
}

impl SeedService {
    pub fn new(catalog: Arc<CatalogService>, http: Arc<dyn HttpAdapter>, config: SeedConfig) -> Self {
        Self {
            catalog,
            http,
            config,
        }
    }

    /// Run the seed and return the raw entries that were fetched.
    ///
    /// A fetch or transform failure aborts before the catalog is touched.
    /// In `Strict` mode a rerun against a populated catalog fails with
    /// `Conflict`; in `SkipExisting` mode records already present are
    /// dropped from the batch first.
    pub async fn execute_seed(&self) -> CatalogResult<Vec<NamedResource>> {
        let url = self.config.collection_url();
        info!(url = %url, mode = ?self.config.mode, "Starting catalog seed");

        let page: SpeciesPage = fetch_json(self.http.as_ref(), &url).await.map_err(|e| {
            warn!(url = %url, error = ?e, "Seed fetch failed");
            CatalogError::from(e)
        })?;

        let records = transform(&page.results)?;

        let batch = match self.config.mode {
            SeedMode::Strict => records,
            SeedMode::SkipExisting => {
                let fetched = records.len();
                let unseen = self.catalog.retain_unseen(records).await?;
                if unseen.len() < fetched {
                    warn!(
                        skipped = fetched - unseen.len(),
                        "Seed skipping records already in the catalog"
                    );
                }
                unseen
            }
        };

        let inserted = self.catalog.create_many(batch).await?;

        info!(
            fetched = page.results.len(),
            inserted = inserted.len(),
            "Catalog seed complete"
        );
        Ok(page.results)
    }
}

/// Pure, order-preserving transform of raw entries into new records
pub fn transform(entries: &[NamedResource]) -> CatalogResult<Vec<NewCatalogRecord>> {
    entries
        .iter()
        .map(|entry| {
            let ordinal = entry.ordinal().ok_or_else(|| {
                CatalogError::internal(
                    "seed_transform",
                    anyhow::anyhow!(
                        "entry '{}' has no numeric trailing segment in reference URL {}",
                        entry.name,
                        entry.url
                    ),
                )
            })?;
            Ok(NewCatalogRecord::new(ordinal, entry.name.clone()))
        })
        .collect()
}
