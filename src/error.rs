//! Catalog error taxonomy
//!
//! Every operation of the resolver, the catalog service and the seeding
//! pipeline fails with a [`CatalogError`]. Raw store failures are translated
//! at the service boundary: uniqueness violations become `Conflict`,
//! everything else becomes `Internal` and is logged once, in full, where the
//! translation happens.

use thiserror::Error;

use crate::database::StoreError;
use crate::species_source::FetchError;

pub type CatalogResult<T> = Result<T, CatalogError>;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("no catalog record matches search term \"{term}\"")]
    NotFound { term: String },

    #[error("a catalog record already exists with {key} = {value}")]
    Conflict { key: String, value: String },

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Detail is kept for logging only and never rendered to callers.
    #[error("internal catalog error, check server logs")]
    Internal(#[source] anyhow::Error),
}

impl CatalogError {
    pub fn not_found(term: impl Into<String>) -> Self {
        Self::NotFound { term: term.into() }
    }

    /// Translate a store failure. Unique violations surface as `Conflict`;
    /// anything else is logged with `operation` and collapsed into `Internal`.
    pub fn from_store(err: StoreError, operation: &str) -> Self {
        match err {
            StoreError::UniqueViolation { key, value } => Self::Conflict { key, value },
            StoreError::Backend(source) => {
                tracing::error!(operation, error = ?source, "Catalog store operation failed");
                Self::Internal(source)
            }
        }
    }

    /// Wrap an unexpected failure that did not come from the store.
    pub fn internal(operation: &str, source: anyhow::Error) -> Self {
        tracing::error!(operation, error = ?source, "Catalog operation failed");
        Self::Internal(source)
    }

    pub fn http_status(&self) -> u16 {
        match self {
            Self::NotFound { .. } => 404,
            Self::Conflict { .. } => 409,
            Self::InvalidInput(_) => 400,
            Self::Fetch(_) => 502,
            Self::Internal(_) => 500,
        }
    }

    /// Stable machine-readable code for API bodies.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Conflict { .. } => "CONFLICT",
            Self::InvalidInput(_) => "INVALID_INPUT",
            Self::Fetch(_) => "FETCH_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}
