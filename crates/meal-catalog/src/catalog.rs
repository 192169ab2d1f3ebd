//! Catalog collaborator contract
//!
//! The planner never owns the dish store; it reads it through
//! [`DishCatalog`]. Implementations may be in-memory, a database or a
//! remote service, but every query must return dishes in a stable order
//! (ascending [`DishId`]) so seeded selection stays reproducible.

use crate::dish::{Dish, DishId, SlotCategory};
use crate::filter::FilterOptions;
use async_trait::async_trait;
use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::Arc;

/// Errors raised by a catalog backend
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// Backend could not be reached
    #[error("catalog unavailable: {0}")]
    Unavailable(String),

    /// Catalog document is malformed
    #[error("invalid catalog data: {0}")]
    Decode(#[from] serde_json::Error),

    /// IO error reading catalog source
    #[error("io error reading {path}: {source}")]
    Io {
        /// Source path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Two dishes share an id
    #[error("duplicate dish id: {0}")]
    DuplicateId(DishId),
}

impl CatalogError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Read-only dish store
///
/// Each call may be a suspension point; callers issue them sequentially.
#[async_trait]
pub trait DishCatalog: Send + Sync {
    /// Number of dishes across every category
    async fn count_all_dishes(&self) -> Result<usize, CatalogError>;

    /// Dishes of `category` that pass every field of `filters` and whose id
    /// is not in `exclude_ids`, sorted by ascending id
    async fn query_candidates(
        &self,
        category: SlotCategory,
        filters: &FilterOptions,
        exclude_ids: &BTreeSet<DishId>,
    ) -> Result<Vec<Dish>, CatalogError>;

    /// Look a dish up by id
    async fn get_dish_by_id(&self, id: DishId) -> Result<Option<Dish>, CatalogError>;
}

#[async_trait]
impl<T: DishCatalog + ?Sized> DishCatalog for Arc<T> {
    async fn count_all_dishes(&self) -> Result<usize, CatalogError> {
        (**self).count_all_dishes().await
    }

    async fn query_candidates(
        &self,
        category: SlotCategory,
        filters: &FilterOptions,
        exclude_ids: &BTreeSet<DishId>,
    ) -> Result<Vec<Dish>, CatalogError> {
        (**self)
            .query_candidates(category, filters, exclude_ids)
            .await
    }

    async fn get_dish_by_id(&self, id: DishId) -> Result<Option<Dish>, CatalogError> {
        (**self).get_dish_by_id(id).await
    }
}
