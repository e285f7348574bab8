pub mod app_config;
pub mod database;
pub mod catalog_repo;
pub mod plan_repo;
pub mod memory;

use std::sync::Arc;
use tracing::info;
use emi_core::{CatalogLoader, CatalogService, EmiPlanRepository, ProductRepository};

pub use app_config::{Config, DatabaseConfig, RunMode};
pub use database::DbClient;
pub use catalog_repo::StoreProductRepository;
pub use plan_repo::StoreEmiPlanRepository;
pub use memory::InMemoryCatalog;

/// Startup failures of the storage layer. Callers treat both as fatal.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Database connection failed: {0}")]
    Connection(#[from] sqlx::Error),
    #[error("Database migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// The repository pair every catalog operation runs against
#[derive(Clone)]
pub struct Repositories {
    pub products: Arc<dyn ProductRepository>,
    pub plans: Arc<dyn EmiPlanRepository>,
}

impl Repositories {
    pub fn postgres(db: &DbClient) -> Self {
        Self {
            products: Arc::new(StoreProductRepository::new(db.pool.clone())),
            plans: Arc::new(StoreEmiPlanRepository::new(db.pool.clone())),
        }
    }

    pub fn in_memory() -> Self {
        let catalog = Arc::new(InMemoryCatalog::new());
        Self {
            products: catalog.clone(),
            plans: catalog,
        }
    }

    /// Connect and migrate, or build the in-process store for `memory:` URLs.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, StoreError> {
        if config.url.starts_with("memory:") {
            info!("Using in-memory catalog store");
            return Ok(Self::in_memory());
        }

        let db = DbClient::new(config).await?;
        db.migrate().await?;
        Ok(Self::postgres(&db))
    }

    pub fn service(&self) -> CatalogService {
        CatalogService::new(self.products.clone(), self.plans.clone())
    }

    pub fn loader(&self) -> CatalogLoader {
        CatalogLoader::new(self.products.clone(), self.plans.clone())
    }
}
