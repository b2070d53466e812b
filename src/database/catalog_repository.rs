//! Postgres store gateway
//!
//! Canonical DB schema (`"catalog".species_records`):
//! - storage_id uuid PK (assigned here, v7)
//! - ordinal bigint UNIQUE
//! - name text UNIQUE (lower case)
//! - created_at, updated_at timestamps (never returned to callers)

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgDatabaseError, PgPoolOptions};
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::{CatalogStore, RecordFilter, StoreError};
use crate::catalog::{CatalogRecord, NewCatalogRecord, PageWindow, RecordPatch};

const SCHEMA_SQL: &str = r#"
CREATE SCHEMA IF NOT EXISTS "catalog";

CREATE TABLE IF NOT EXISTS "catalog".species_records (
    storage_id uuid PRIMARY KEY,
    ordinal bigint NOT NULL CONSTRAINT species_records_ordinal_key UNIQUE CHECK (ordinal > 0),
    name text NOT NULL CONSTRAINT species_records_name_key UNIQUE,
    created_at timestamptz NOT NULL DEFAULT NOW(),
    updated_at timestamptz NOT NULL DEFAULT NOW()
);
"#;

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub database_url: String,
    pub max_connections: u32,
    pub connection_timeout: Duration,
    pub idle_timeout: Option<Duration>,
    pub max_lifetime: Option<Duration>,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            database_url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| "postgresql://localhost:5432/species_catalog".to_string()),
            max_connections: std::env::var("DATABASE_POOL_SIZE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(10),
            connection_timeout: Duration::from_secs(30),
            idle_timeout: Some(Duration::from_secs(600)), // 10 minutes
            max_lifetime: Some(Duration::from_secs(1800)), // 30 minutes
        }
    }
}

impl DatabaseConfig {
    pub fn with_url(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            ..Self::default()
        }
    }

    /// Open a connection pool with this configuration
    pub async fn connect(&self) -> Result<PgPool, sqlx::Error> {
        info!(
            "Connecting to database: {}",
            mask_database_url(&self.database_url)
        );

        let mut pool_options = PgPoolOptions::new()
            .max_connections(self.max_connections)
            .acquire_timeout(self.connection_timeout);

        if let Some(idle_timeout) = self.idle_timeout {
            pool_options = pool_options.idle_timeout(idle_timeout);
        }

        if let Some(max_lifetime) = self.max_lifetime {
            pool_options = pool_options.max_lifetime(max_lifetime);
        }

        let pool = pool_options
            .connect(&self.database_url)
            .await
            .map_err(|e| {
                warn!("Failed to connect to database: {}", e);
                e
            })?;

        info!("Database connection pool created successfully");
        Ok(pool)
    }
}

/// Row as stored, including timestamps
#[derive(Debug, Clone, FromRow)]
struct SpeciesRow {
    storage_id: Uuid,
    ordinal: i64,
    name: String,
    #[allow(dead_code)]
    created_at: DateTime<Utc>,
    #[allow(dead_code)]
    updated_at: DateTime<Utc>,
}

impl From<SpeciesRow> for CatalogRecord {
    fn from(row: SpeciesRow) -> Self {
        Self {
            storage_id: row.storage_id,
            ordinal: row.ordinal,
            name: row.name,
        }
    }
}

/// Store gateway backed by a Postgres pool
#[derive(Clone, Debug)]
pub struct PgCatalogStore {
    pool: PgPool,
}

impl PgCatalogStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Create the schema and table when missing
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::raw_sql(SCHEMA_SQL)
            .execute(&self.pool)
            .await
            .map_err(store_error)?;
        info!("Catalog schema verified");
        Ok(())
    }

}

fn push_filter(builder: &mut QueryBuilder<'_, Postgres>, filter: &RecordFilter) {
    match filter {
        RecordFilter::Ordinal(ordinal) => {
            builder.push(" WHERE ordinal = ").push_bind(*ordinal);
        }
        RecordFilter::StorageId(id) => {
            builder.push(" WHERE storage_id = ").push_bind(*id);
        }
        RecordFilter::Name(name) => {
            builder.push(" WHERE name = ").push_bind(name.clone());
        }
    }
}

#[async_trait]
impl CatalogStore for PgCatalogStore {
    async fn find_one(&self, filter: &RecordFilter) -> Result<Option<CatalogRecord>, StoreError> {
        let mut builder = QueryBuilder::<Postgres>::new(
            r#"SELECT storage_id, ordinal, name, created_at, updated_at FROM "catalog".species_records"#,
        );
        push_filter(&mut builder, filter);

        let row = builder
            .build_query_as::<SpeciesRow>()
            .fetch_optional(&self.pool)
            .await
            .map_err(store_error)?;

        Ok(row.map(CatalogRecord::from))
    }

    async fn find_many(&self, page: PageWindow) -> Result<Vec<CatalogRecord>, StoreError> {
        let rows = sqlx::query_as::<_, SpeciesRow>(
            r#"
            SELECT storage_id, ordinal, name, created_at, updated_at
            FROM "catalog".species_records
            ORDER BY ordinal ASC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(i64::from(page.limit))
        .bind(i64::from(page.offset))
        .fetch_all(&self.pool)
        .await
        .map_err(store_error)?;

        Ok(rows.into_iter().map(CatalogRecord::from).collect())
    }

    async fn insert_one(&self, record: NewCatalogRecord) -> Result<CatalogRecord, StoreError> {
        let row = sqlx::query_as::<_, SpeciesRow>(
            r#"
            INSERT INTO "catalog".species_records (storage_id, ordinal, name, created_at, updated_at)
            VALUES ($1, $2, $3, NOW(), NOW())
            RETURNING storage_id, ordinal, name, created_at, updated_at
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(record.ordinal)
        .bind(&record.name)
        .fetch_one(&self.pool)
        .await
        .map_err(store_error)?;

        debug!("Inserted species record {} '{}'", row.ordinal, row.name);
        Ok(row.into())
    }

    async fn insert_many(
        &self,
        records: Vec<NewCatalogRecord>,
    ) -> Result<Vec<CatalogRecord>, StoreError> {
        let mut tx = self.pool.begin().await.map_err(store_error)?;
        let mut inserted = Vec::with_capacity(records.len());

        for record in &records {
            let row = sqlx::query_as::<_, SpeciesRow>(
                r#"
                INSERT INTO "catalog".species_records (storage_id, ordinal, name, created_at, updated_at)
                VALUES ($1, $2, $3, NOW(), NOW())
                RETURNING storage_id, ordinal, name, created_at, updated_at
                "#,
            )
            .bind(Uuid::now_v7())
            .bind(record.ordinal)
            .bind(&record.name)
            .fetch_one(&mut *tx)
            .await
            .map_err(store_error)?;
            inserted.push(CatalogRecord::from(row));
        }

        // Dropping `tx` on an earlier error rolls the whole batch back
        tx.commit().await.map_err(store_error)?;

        debug!("Inserted {} species records", inserted.len());
        Ok(inserted)
    }

    async fn update_one(
        &self,
        filter: &RecordFilter,
        patch: &RecordPatch,
    ) -> Result<u64, StoreError> {
        let mut builder = QueryBuilder::<Postgres>::new(r#"UPDATE "catalog".species_records SET name = COALESCE("#);
        builder
            .push_bind(patch.name.clone())
            .push(", name), updated_at = NOW()");
        push_filter(&mut builder, filter);

        let result = builder
            .build()
            .execute(&self.pool)
            .await
            .map_err(store_error)?;

        Ok(result.rows_affected())
    }

    async fn delete_one(&self, filter: &RecordFilter) -> Result<u64, StoreError> {
        let mut builder = QueryBuilder::<Postgres>::new(r#"DELETE FROM "catalog".species_records"#);
        push_filter(&mut builder, filter);

        let result = builder
            .build()
            .execute(&self.pool)
            .await
            .map_err(store_error)?;

        Ok(result.rows_affected())
    }
}

/// Translate a sqlx error, recognizing unique-constraint violations
fn store_error(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            let detail = db_err
                .try_downcast_ref::<PgDatabaseError>()
                .and_then(|pg| pg.detail())
                .and_then(parse_key_detail);

            let (key, value) = detail.unwrap_or_else(|| {
                let key = match db_err.constraint() {
                    Some(c) if c.contains("ordinal") => "ordinal",
                    Some(c) if c.contains("name") => "name",
                    Some(c) if c.contains("pkey") => "storage_id",
                    _ => "unknown",
                };
                (key.to_string(), String::new())
            });
            return StoreError::UniqueViolation { key, value };
        }
    }
    StoreError::Backend(anyhow::Error::new(err).context("Catalog database operation failed"))
}

/// Parse a Postgres unique-violation detail such as
/// `Key (name)=(pikachu) already exists.` into `("name", "pikachu")`.
fn parse_key_detail(detail: &str) -> Option<(String, String)> {
    let rest = detail.strip_prefix("Key (")?;
    let (key, rest) = rest.split_once(")=(")?;
    let (value, _) = rest.rsplit_once(") already exists")?;
    Some((key.to_string(), value.to_string()))
}

/// Mask sensitive information in database URL for logging
pub(crate) fn mask_database_url(url: &str) -> String {
    if let Ok(parsed) = url::Url::parse(url) {
        let mut masked = parsed.clone();
        if parsed.password().is_some() {
            let _ = masked.set_password(Some("***"));
        }
        masked.to_string()
    } else if url.chars().count() > 20 {
        // Slice by chars, not bytes
        let head: String = url.chars().take(10).collect();
        let mut tail: Vec<char> = url.chars().rev().take(10).collect();
        tail.reverse();
        format!("{}***{}", head, tail.into_iter().collect::<String>())
    } else {
        "***".to_string()
    }
}
