//! Species catalog core
//!
//! Classification, resolution and CRUD orchestration over a
//! [`CatalogStore`](crate::database::CatalogStore).

pub mod classifier;
pub mod resolver;
pub mod service;
pub mod types;

pub use classifier::{classify, SearchTerm};
pub use resolver::{lookup_plan, EntityResolver};
pub use service::CatalogService;
pub use types::{
    normalize_name, CatalogRecord, NewCatalogRecord, PageRequest, PageWindow, RecordPatch,
};
