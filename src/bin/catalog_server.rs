//! Species catalog REST server
//!
//! Reads `.env`, then CLI flags / env vars:
//!   CATALOG_LISTEN_ADDR - listen address (default: 0.0.0.0:3000)
//!   CATALOG_STORE       - `postgres` (default) or `memory`
//!   DATABASE_URL        - Postgres connection string (postgres store only)
//! Catalog and seed settings come from `CatalogConfig::from_env`.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tokio::net::TcpListener;

use species_catalog::api::{build_router, AppState};
use species_catalog::database::{DatabaseConfig, PgCatalogStore};
use species_catalog::{
    CatalogConfig, CatalogService, CatalogStore, InMemoryCatalogStore, ReqwestAdapter, SeedService,
};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum StoreBackend {
    Memory,
    Postgres,
}

#[derive(Debug, Parser)]
#[command(name = "catalog_server")]
#[command(about = "Species catalog REST server")]
struct Args {
    /// Address to listen on for HTTP requests
    #[arg(short, long, env = "CATALOG_LISTEN_ADDR", default_value = "0.0.0.0:3000")]
    listen: String,

    /// Store backend
    #[arg(long, env = "CATALOG_STORE", value_enum, default_value_t = StoreBackend::Postgres)]
    store: StoreBackend,

    /// Postgres connection string
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,species_catalog=debug,tower_http=debug".into()),
        )
        .init();

    let args = Args::parse();
    let config = CatalogConfig::from_env().context("Invalid catalog configuration")?;

    tracing::info!(
        store = ?args.store,
        default_limit = config.pagination.limit,
        default_offset = config.pagination.offset,
        seed_url = %config.seed.collection_url(),
        "Configuration loaded"
    );

    let store: Arc<dyn CatalogStore> = match args.store {
        StoreBackend::Memory => Arc::new(InMemoryCatalogStore::new()),
        StoreBackend::Postgres => {
            let db_config = match args.database_url {
                Some(url) => DatabaseConfig::with_url(url),
                None => DatabaseConfig::default(),
            };
            let pool = db_config
                .connect()
                .await
                .context("Failed to connect to database")?;
            let pg = PgCatalogStore::new(pool);
            pg.ensure_schema()
                .await
                .context("Failed to prepare catalog schema")?;
            Arc::new(pg)
        }
    };

    let catalog = Arc::new(CatalogService::new(store, config.pagination));
    let http = Arc::new(ReqwestAdapter::from_config(&config.seed)?);
    let seed = Arc::new(SeedService::new(catalog.clone(), http, config.seed.clone()));

    let app = build_router(AppState::new(catalog, seed));

    let listener = TcpListener::bind(&args.listen)
        .await
        .with_context(|| format!("Failed to bind {}", args.listen))?;
    tracing::info!(addr = %args.listen, "Species catalog listening");

    axum::serve(listener, app).await?;
    Ok(())
}
