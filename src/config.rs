//! Catalog configuration
//!
//! Pagination defaults and seeding parameters are read once, into an
//! explicit [`CatalogConfig`] that is handed to the services at
//! construction time.

use std::str::FromStr;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

const DEFAULT_PAGE_LIMIT: u32 = 10;
const DEFAULT_PAGE_OFFSET: u32 = 0;
const DEFAULT_SOURCE_URL: &str = "https://pokeapi.co/api/v2";
const DEFAULT_RESOURCE_PATH: &str = "pokemon";
const DEFAULT_SEED_PAGE_SIZE: u32 = 650;

/// Top-level configuration for the catalog and the seeding pipeline
#[derive(Debug, Clone, Default)]
pub struct CatalogConfig {
    pub pagination: PaginationDefaults,
    pub seed: SeedConfig,
}

/// Defaults applied when a listing request omits `limit` or `offset`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationDefaults {
    pub limit: u32,
    pub offset: u32,
}

impl Default for PaginationDefaults {
    fn default() -> Self {
        Self {
            limit: DEFAULT_PAGE_LIMIT,
            offset: DEFAULT_PAGE_OFFSET,
        }
    }
}

/// How a seed run treats records that are already in the catalog
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SeedMode {
    /// Submit the whole batch; any existing record fails the run with Conflict.
    #[default]
    Strict,
    /// Drop records whose ordinal or name already exists, insert the rest.
    SkipExisting,
}

impl FromStr for SeedMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(Self::Strict),
            "skip-existing" | "skip_existing" => Ok(Self::SkipExisting),
            other => bail!("unknown seed mode '{}', expected strict or skip-existing", other),
        }
    }
}

/// Parameters of the one-shot seed fetch
#[derive(Debug, Clone)]
pub struct SeedConfig {
    /// Base URL of the external source (e.g. `https://pokeapi.co/api/v2`)
    pub source_base_url: String,
    /// Collection path below the base URL
    pub resource_path: String,
    /// Maximum number of entries requested in the single page
    pub page_size: u32,
    pub mode: SeedMode,
    pub fetch_timeout: Duration,
    /// Extra attempts after a retryable fetch failure
    pub fetch_retries: u32,
    pub retry_backoff: Duration,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            source_base_url: DEFAULT_SOURCE_URL.to_string(),
            resource_path: DEFAULT_RESOURCE_PATH.to_string(),
            page_size: DEFAULT_SEED_PAGE_SIZE,
            mode: SeedMode::Strict,
            fetch_timeout: Duration::from_secs(30),
            fetch_retries: 2,
            retry_backoff: Duration::from_millis(250),
        }
    }
}

impl SeedConfig {
    /// Full URL of the single page fetched by a seed run
    pub fn collection_url(&self) -> String {
        format!(
            "{}/{}?limit={}",
            self.source_base_url.trim_end_matches('/'),
            self.resource_path.trim_matches('/'),
            self.page_size
        )
    }
}

impl CatalogConfig {
    /// Build configuration from process environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let pagination = PaginationDefaults {
            limit: parse_or(&lookup, "DEFAULT_LIMIT", defaults.pagination.limit)?,
            offset: parse_or(&lookup, "DEFAULT_OFFSET", defaults.pagination.offset)?,
        };
        if pagination.limit == 0 {
            bail!("DEFAULT_LIMIT must be at least 1");
        }

        let seed = SeedConfig {
            source_base_url: lookup("SEED_SOURCE_URL").unwrap_or(defaults.seed.source_base_url),
            resource_path: lookup("SEED_RESOURCE_PATH").unwrap_or(defaults.seed.resource_path),
            page_size: parse_or(&lookup, "SEED_PAGE_SIZE", defaults.seed.page_size)?,
            mode: parse_or(&lookup, "SEED_MODE", defaults.seed.mode)?,
            fetch_timeout: Duration::from_secs(parse_or(
                &lookup,
                "SEED_FETCH_TIMEOUT_SECS",
                defaults.seed.fetch_timeout.as_secs(),
            )?),
            fetch_retries: parse_or(&lookup, "SEED_FETCH_RETRIES", defaults.seed.fetch_retries)?,
            retry_backoff: Duration::from_millis(parse_or(
                &lookup,
                "SEED_RETRY_BACKOFF_MS",
                defaults.seed.retry_backoff.as_millis() as u64,
            )?),
        };
        url::Url::parse(&seed.source_base_url)
            .with_context(|| format!("SEED_SOURCE_URL is not a valid URL: {}", seed.source_base_url))?;

        Ok(Self { pagination, seed })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("invalid value '{}' for {}: {}", raw, key, e)),
        None => Ok(default),
    }
}
