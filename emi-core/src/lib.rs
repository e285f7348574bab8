pub mod repository;
pub mod service;
pub mod loader;

use emi_catalog::ValidationError;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("{entity} not found: {key}")]
    NotFound {
        entity: &'static str,
        key: String,
    },
    #[error("Storage error: {0}")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl CoreError {
    pub fn not_found(entity: &'static str, key: impl ToString) -> Self {
        Self::NotFound {
            entity,
            key: key.to_string(),
        }
    }

    pub fn storage(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Storage(err.into())
    }
}

pub type CoreResult<T> = Result<T, CoreError>;

pub use repository::{EmiPlanRepository, ProductRepository};
pub use service::{CatalogService, ProductDetails};
pub use loader::{CatalogLoader, LoadReport};
