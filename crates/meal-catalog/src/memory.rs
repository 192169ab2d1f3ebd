//! In-memory catalog
//!
//! Reference [`DishCatalog`] backed by a `BTreeMap`, so iteration order is
//! the id order the contract requires.

use crate::catalog::{CatalogError, DishCatalog};
use crate::dish::{Dish, DishId, SlotCategory};
use crate::filter::FilterOptions;
use async_trait::async_trait;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

/// Dish catalog held in memory
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    dishes: BTreeMap<DishId, Dish>,
}

impl InMemoryCatalog {
    /// Empty catalog
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from dishes, rejecting duplicate ids
    ///
    /// # Errors
    /// [`CatalogError::DuplicateId`] on the first repeated id.
    pub fn from_dishes(dishes: impl IntoIterator<Item = Dish>) -> Result<Self, CatalogError> {
        let mut catalog = Self::new();
        for dish in dishes {
            catalog.insert(dish)?;
        }
        Ok(catalog)
    }

    /// Parse a JSON array of dishes
    ///
    /// # Errors
    /// Malformed JSON or duplicate ids.
    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let dishes: Vec<Dish> = serde_json::from_str(json)?;
        Self::from_dishes(dishes)
    }

    /// Read and parse a JSON array of dishes
    ///
    /// # Errors
    /// IO failure, malformed JSON or duplicate ids.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let json =
            std::fs::read_to_string(path).map_err(|e| CatalogError::io_error(path, e))?;
        let catalog = Self::from_json_str(&json)?;
        tracing::debug!(path = %path.display(), dishes = catalog.len(), "loaded catalog");
        Ok(catalog)
    }

    /// Add one dish; free-text attributes are lowercased on ingest
    ///
    /// # Errors
    /// [`CatalogError::DuplicateId`] if the id is taken.
    pub fn insert(&mut self, dish: Dish) -> Result<(), CatalogError> {
        if self.dishes.contains_key(&dish.id) {
            return Err(CatalogError::DuplicateId(dish.id));
        }
        self.dishes.insert(dish.id, dish.normalized());
        Ok(())
    }

    /// Number of dishes
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.dishes.len()
    }

    /// Whether the catalog holds no dishes
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dishes.is_empty()
    }

    /// Dishes in id order
    pub fn iter(&self) -> impl Iterator<Item = &Dish> {
        self.dishes.values()
    }
}

#[async_trait]
impl DishCatalog for InMemoryCatalog {
    async fn count_all_dishes(&self) -> Result<usize, CatalogError> {
        Ok(self.dishes.len())
    }

    async fn query_candidates(
        &self,
        category: SlotCategory,
        filters: &FilterOptions,
        exclude_ids: &BTreeSet<DishId>,
    ) -> Result<Vec<Dish>, CatalogError> {
        let candidates: Vec<Dish> = self
            .dishes
            .values()
            .filter(|d| d.slot_category == category)
            .filter(|d| !exclude_ids.contains(&d.id))
            .filter(|d| filters.matches(d))
            .cloned()
            .collect();

        tracing::trace!(
            %category,
            excluded = exclude_ids.len(),
            found = candidates.len(),
            "candidate query"
        );
        Ok(candidates)
    }

    async fn get_dish_by_id(&self, id: DishId) -> Result<Option<Dish>, CatalogError> {
        Ok(self.dishes.get(&id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dish::KosherStyle;

    fn catalog() -> InMemoryCatalog {
        InMemoryCatalog::from_dishes([
            Dish::new(30, "minestrone", SlotCategory::Soup).with_kosher(KosherStyle::Pareve),
            Dish::new(10, "chicken soup", SlotCategory::Soup).with_kosher(KosherStyle::Meat),
            Dish::new(20, "clam chowder", SlotCategory::Soup),
            Dish::new(40, "blueberry muffin", SlotCategory::Muffin),
        ])
        .unwrap()
    }

    #[tokio::test]
    async fn query_returns_id_order() {
        let catalog = catalog();
        let soups = catalog
            .query_candidates(SlotCategory::Soup, &FilterOptions::new(), &BTreeSet::new())
            .await
            .unwrap();

        let ids: Vec<u64> = soups.iter().map(|d| d.id.value()).collect();
        assert_eq!(ids, vec![10, 20, 30]);
    }

    #[tokio::test]
    async fn query_applies_filters_and_exclusions() {
        let catalog = catalog();
        let exclude = BTreeSet::from([DishId(10)]);
        let soups = catalog
            .query_candidates(SlotCategory::Soup, &FilterOptions::new().kosher_only(), &exclude)
            .await
            .unwrap();

        assert_eq!(soups.len(), 1);
        assert_eq!(soups[0].name, "minestrone");
    }

    #[tokio::test]
    async fn counts_and_lookups() {
        let catalog = catalog();
        assert_eq!(catalog.count_all_dishes().await.unwrap(), 4);
        assert!(catalog.get_dish_by_id(DishId(40)).await.unwrap().is_some());
        assert!(catalog.get_dish_by_id(DishId(99)).await.unwrap().is_none());
    }

    #[test]
    fn rejects_duplicate_ids() {
        let result = InMemoryCatalog::from_dishes([
            Dish::new(1, "a", SlotCategory::Soup),
            Dish::new(1, "b", SlotCategory::Salad),
        ]);
        assert!(matches!(result, Err(CatalogError::DuplicateId(DishId(1)))));
    }

    #[test]
    fn json_ingest_lowercases() {
        let catalog = InMemoryCatalog::from_json_str(
            r#"[{"id": 5, "name": "Caesar", "slot_category": "salad",
                 "ingredients": ["Romaine", "Parmesan"], "allergens": ["Dairy"]}]"#,
        )
        .unwrap();

        let dish = catalog.iter().next().unwrap();
        assert!(dish.ingredients.contains("romaine"));
        assert!(dish.allergens.contains("dairy"));
    }

    #[test]
    fn json_ingest_reports_bad_documents() {
        let err = InMemoryCatalog::from_json_str("{not json").unwrap_err();
        assert!(matches!(err, CatalogError::Decode(_)));
    }
}
