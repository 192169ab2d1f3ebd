//! Day generation
//!
//! Resolves every category for one day in list order. Each resolved dish
//! joins the day's exclusion set before the next category is resolved, so
//! category order decides who gets first pick.

use crate::error::PlanError;
use crate::rng::SeededRng;
use crate::slot::{SlotOutcome, SlotRequest, SlotResolver};
use crate::types::{GeneratedDay, LockedDishes, PlanWarning};
use indexmap::IndexMap;
use meal_catalog::{CatalogError, DishCatalog, DishId, SlotCategory};
use std::collections::BTreeSet;

/// Outcome of one day
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DayOutcome {
    /// Every category filled
    Completed {
        /// The day
        day: GeneratedDay,
        /// Relaxation warnings
        warnings: Vec<PlanWarning>,
    },
    /// At least one category failed; no partial day is returned
    Failed {
        /// Every category error of the day
        errors: Vec<PlanError>,
        /// Warnings from slots that did resolve
        warnings: Vec<PlanWarning>,
    },
}

/// Generates single days against a fixed category list
#[derive(Debug)]
pub struct DayGenerator<'a, C: ?Sized> {
    resolver: SlotResolver<'a, C>,
    categories: &'a [SlotCategory],
    no_repeat_across_week: bool,
}

impl<'a, C> DayGenerator<'a, C>
where
    C: DishCatalog + ?Sized,
{
    /// Create day generator
    #[must_use]
    pub fn new(
        resolver: SlotResolver<'a, C>,
        categories: &'a [SlotCategory],
        no_repeat_across_week: bool,
    ) -> Self {
        Self {
            resolver,
            categories,
            no_repeat_across_week,
        }
    }

    /// Generate day `day_index`
    ///
    /// On success the day's dishes are merged into `week_exclusions` when
    /// the no-repeat rule is on. A failed day leaves it untouched.
    ///
    /// # Errors
    /// Only catalog failures.
    pub async fn generate(
        &self,
        day_index: usize,
        locks: Option<&LockedDishes>,
        week_exclusions: &mut BTreeSet<DishId>,
        rng: &mut SeededRng,
    ) -> Result<DayOutcome, CatalogError> {
        let mut day_exclusions = BTreeSet::new();
        let mut dishes = IndexMap::with_capacity(self.categories.len());
        let mut warnings = Vec::new();
        let mut errors = Vec::new();

        for &category in self.categories {
            let request = SlotRequest {
                day: day_index,
                category,
                lock: locks.and_then(|l| l.get(category)),
                day_exclusions: &day_exclusions,
                week_exclusions: &*week_exclusions,
            };

            let outcome = self.resolver.resolve(request, rng).await?;
            match outcome {
                SlotOutcome::Resolved(slot) => {
                    day_exclusions.insert(slot.dish.id);
                    warnings.extend(slot.warning);
                    dishes.insert(category, slot.dish);
                }
                SlotOutcome::Failed(error) => errors.push(error),
            }
        }

        if !errors.is_empty() {
            tracing::warn!(day = day_index, failed = errors.len(), "day failed");
            return Ok(DayOutcome::Failed { errors, warnings });
        }

        if self.no_repeat_across_week {
            week_exclusions.extend(day_exclusions);
        }

        tracing::debug!(day = day_index, dishes = dishes.len(), "day generated");
        Ok(DayOutcome::Completed {
            day: GeneratedDay { day_index, dishes },
            warnings,
        })
    }
}
