//! Catalog record types

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::PaginationDefaults;
use crate::error::{CatalogError, CatalogResult};

/// A persisted catalog record, with store metadata stripped
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogRecord {
    /// Opaque identifier assigned by the store
    pub storage_id: Uuid,
    /// Natural key, unique and immutable
    pub ordinal: i64,
    /// Unique, stored lower case
    pub name: String,
}

/// Fields for creating a new record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCatalogRecord {
    pub ordinal: i64,
    pub name: String,
}

impl NewCatalogRecord {
    pub fn new(ordinal: i64, name: impl Into<String>) -> Self {
        Self {
            ordinal,
            name: name.into(),
        }
    }

    /// Validate and lower-case the name, ready for insertion
    pub fn normalized(self) -> CatalogResult<Self> {
        if self.ordinal < 1 {
            return Err(CatalogError::InvalidInput(format!(
                "ordinal must be a positive integer, got {}",
                self.ordinal
            )));
        }
        Ok(Self {
            ordinal: self.ordinal,
            name: normalize_name(&self.name)?,
        })
    }
}

/// Partial update; only `name` is mutable
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordPatch {
    #[serde(default)]
    pub name: Option<String>,
}

impl RecordPatch {
    pub fn rename(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none()
    }

    pub fn normalized(self) -> CatalogResult<Self> {
        Ok(Self {
            name: self.name.as_deref().map(normalize_name).transpose()?,
        })
    }
}

/// Listing window; omitted fields fall back to configured defaults
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

impl PageRequest {
    pub fn new(limit: u32, offset: u32) -> Self {
        Self {
            limit: Some(limit),
            offset: Some(offset),
        }
    }

    pub fn resolve(self, defaults: PaginationDefaults) -> CatalogResult<PageWindow> {
        let limit = self.limit.unwrap_or(defaults.limit);
        if limit == 0 {
            return Err(CatalogError::InvalidInput(
                "limit must be at least 1".to_string(),
            ));
        }
        Ok(PageWindow {
            limit,
            offset: self.offset.unwrap_or(defaults.offset),
        })
    }
}

/// Concrete window handed to the store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub limit: u32,
    pub offset: u32,
}

/// Names are stored and compared in lower case
pub fn normalize_name(name: &str) -> CatalogResult<String> {
    if name.trim().is_empty() {
        return Err(CatalogError::InvalidInput(
            "name must not be empty".to_string(),
        ));
    }
    Ok(name.to_lowercase())
}
