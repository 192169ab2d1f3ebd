//! Lock validation
//!
//! A lock pins a dish to a slot. It must still exist, belong to the slot's
//! category and satisfy every filter; otherwise it is rejected with the
//! specific rule it broke. Rejected locks are reported, never dropped or
//! swapped for another dish.

use meal_catalog::{
    CatalogError, Dish, DishCatalog, DishId, FilterOptions, FilterViolation, SlotCategory,
};
use serde::{Deserialize, Serialize};

/// Why a locked dish cannot fill its slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum LockRejection {
    /// No such dish in the catalog
    #[error("dish {dish_id} does not exist")]
    DishNotFound {
        /// Locked id
        dish_id: DishId,
    },

    /// Dish belongs to another category
    #[error("category mismatch: dish {dish_id} is a {actual} dish, not {expected}")]
    CategoryMismatch {
        /// Locked id
        dish_id: DishId,
        /// Slot being resolved
        expected: SlotCategory,
        /// Dish's own category
        actual: SlotCategory,
    },

    /// Dish breaks a filter
    #[error("{violation}")]
    FilterViolation {
        /// Locked id
        dish_id: DishId,
        /// Broken rule
        violation: FilterViolation,
    },

    /// Dish already fills another slot the same day
    #[error("dish {dish_id} is already chosen for another slot on this day")]
    AlreadyChosenToday {
        /// Locked id
        dish_id: DishId,
    },
}

/// Outcome of [`validate_locked_dish`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LockValidation {
    /// Lock can be honoured
    Valid(Dish),
    /// Lock breaks a rule
    Invalid(LockRejection),
}

impl LockValidation {
    /// Whether the lock can be honoured
    #[inline]
    #[must_use]
    pub fn is_valid(&self) -> bool {
        matches!(self, LockValidation::Valid(_))
    }

    /// Validated dish
    #[must_use]
    pub fn dish(&self) -> Option<&Dish> {
        match self {
            LockValidation::Valid(dish) => Some(dish),
            LockValidation::Invalid(_) => None,
        }
    }

    /// Rejection reason
    #[must_use]
    pub fn reason(&self) -> Option<&LockRejection> {
        match self {
            LockValidation::Valid(_) => None,
            LockValidation::Invalid(reason) => Some(reason),
        }
    }
}

/// Check a locked dish against the slot's category and the filters
///
/// # Errors
/// Only catalog failures; rule violations come back as
/// [`LockValidation::Invalid`].
pub async fn validate_locked_dish<C>(
    catalog: &C,
    dish_id: DishId,
    category: SlotCategory,
    filters: &FilterOptions,
) -> Result<LockValidation, CatalogError>
where
    C: DishCatalog + ?Sized,
{
    let Some(dish) = catalog.get_dish_by_id(dish_id).await? else {
        return Ok(LockValidation::Invalid(LockRejection::DishNotFound { dish_id }));
    };

    if dish.slot_category != category {
        return Ok(LockValidation::Invalid(LockRejection::CategoryMismatch {
            dish_id,
            expected: category,
            actual: dish.slot_category,
        }));
    }

    if let Err(violation) = filters.check(&dish) {
        return Ok(LockValidation::Invalid(LockRejection::FilterViolation {
            dish_id,
            violation,
        }));
    }

    Ok(LockValidation::Valid(dish))
}
