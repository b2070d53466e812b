//! Species Catalog
//!
//! A catalog of species records that is populated in bulk from an external,
//! paginated HTTP source and queried by any of three identifier kinds
//! without the caller declaring which one it is using.
//!
//! ## Architecture
//!
//! ```text
//! caller ──► CatalogService ──► EntityResolver ──► classify() + CatalogStore
//!
//! SeedService ──► HttpAdapter (fetch) ──► transform ──► CatalogService::create_many
//! ```
//!
//! - [`catalog::classify`] tags a search term as numeric, storage id or name.
//! - [`catalog::EntityResolver`] turns a search term into exactly one record.
//! - [`catalog::CatalogService`] orchestrates CRUD and translates store errors.
//! - [`database::CatalogStore`] is the persistence seam (memory or Postgres).
//! - [`species_source::HttpAdapter`] is the external-source seam.
//! - [`seed::SeedService`] performs the one-shot bulk seed.

pub mod catalog;
pub mod config;
pub mod database;
pub mod error;
pub mod seed;
pub mod species_source;

#[cfg(feature = "server")]
pub mod api;

pub use catalog::{
    classify, CatalogRecord, CatalogService, EntityResolver, NewCatalogRecord, PageRequest,
    RecordPatch, SearchTerm,
};
pub use config::{CatalogConfig, PaginationDefaults, SeedConfig, SeedMode};
pub use database::{CatalogStore, InMemoryCatalogStore, RecordFilter, StoreError};
pub use error::{CatalogError, CatalogResult};
pub use seed::SeedService;
pub use species_source::{FetchError, HttpAdapter, NamedResource, ReqwestAdapter, SpeciesPage};
