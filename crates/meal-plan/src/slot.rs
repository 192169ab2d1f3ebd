//! Slot resolution
//!
//! Fills one category for one day. Two paths:
//!
//! ```text
//! locked:    LockedPending ──► Resolved | LockError
//! unlocked:  UnlockedPending ──► CandidatesFound ──► Resolved
//!                           └──► NoCandidates ──► RelaxedRetry ──► RelaxedFound ──► Resolved (+warning)
//!                                                             └──► StillNone ──► Error
//! ```
//!
//! Relaxation only ever drops the week-wide exclusion. Same-day exclusions
//! and user filters always hold.

use crate::error::PlanError;
use crate::lock::{validate_locked_dish, LockRejection, LockValidation};
use crate::rng::{shuffle, SeededRng};
use crate::types::PlanWarning;
use meal_catalog::{CatalogError, Dish, DishCatalog, DishId, FilterOptions, SlotCategory};
use std::collections::BTreeSet;

/// How a slot was filled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionPath {
    /// Caller-pinned dish
    Locked,
    /// Seeded pick from unused candidates
    Random,
    /// Seeded pick after dropping the week-wide exclusion
    Relaxed,
}

/// A filled slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSlot {
    /// Chosen dish
    pub dish: Dish,
    /// Path taken
    pub path: ResolutionPath,
    /// Set when a repeat across the week was forced
    pub warning: Option<PlanWarning>,
}

/// Outcome of one slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotOutcome {
    /// Slot filled
    Resolved(ResolvedSlot),
    /// Slot left empty
    Failed(PlanError),
}

/// Inputs for one slot
#[derive(Debug, Clone, Copy)]
pub struct SlotRequest<'a> {
    /// 0-based day index
    pub day: usize,
    /// Category to fill
    pub category: SlotCategory,
    /// Pinned dish, if any
    pub lock: Option<DishId>,
    /// Dishes already picked this day
    pub day_exclusions: &'a BTreeSet<DishId>,
    /// Dishes picked on earlier days; empty when repeats are allowed
    pub week_exclusions: &'a BTreeSet<DishId>,
}

/// Resolves slots against a catalog under fixed filters
#[derive(Debug)]
pub struct SlotResolver<'a, C: ?Sized> {
    catalog: &'a C,
    filters: &'a FilterOptions,
    diagnose_filters: bool,
}

impl<'a, C> SlotResolver<'a, C>
where
    C: DishCatalog + ?Sized,
{
    /// Create resolver
    #[must_use]
    pub fn new(catalog: &'a C, filters: &'a FilterOptions) -> Self {
        Self {
            catalog,
            filters,
            diagnose_filters: true,
        }
    }

    /// Toggle limiting-filter diagnosis on empty slots
    #[must_use]
    pub fn with_diagnose_filters(mut self, enabled: bool) -> Self {
        self.diagnose_filters = enabled;
        self
    }

    /// Fill one slot
    ///
    /// # Errors
    /// Only catalog failures; unfillable slots come back as
    /// [`SlotOutcome::Failed`].
    pub async fn resolve(
        &self,
        request: SlotRequest<'_>,
        rng: &mut SeededRng,
    ) -> Result<SlotOutcome, CatalogError> {
        match request.lock {
            Some(dish_id) => self.resolve_locked(request, dish_id).await,
            None => self.resolve_unlocked(request, rng).await,
        }
    }

    async fn resolve_locked(
        &self,
        request: SlotRequest<'_>,
        dish_id: DishId,
    ) -> Result<SlotOutcome, CatalogError> {
        let validation =
            validate_locked_dish(self.catalog, dish_id, request.category, self.filters).await?;

        let rejection = match validation {
            LockValidation::Valid(dish) if request.day_exclusions.contains(&dish.id) => {
                LockRejection::AlreadyChosenToday { dish_id }
            }
            LockValidation::Valid(dish) => {
                tracing::debug!(day = request.day, category = %request.category, dish = %dish.id, "lock honoured");
                return Ok(SlotOutcome::Resolved(ResolvedSlot {
                    dish,
                    path: ResolutionPath::Locked,
                    warning: None,
                }));
            }
            LockValidation::Invalid(reason) => reason,
        };

        tracing::warn!(day = request.day, category = %request.category, %dish_id, %rejection, "lock rejected");
        Ok(SlotOutcome::Failed(PlanError::LockConflict {
            day: request.day,
            category: request.category,
            dish_id,
            reason: rejection,
        }))
    }

    async fn resolve_unlocked(
        &self,
        request: SlotRequest<'_>,
        rng: &mut SeededRng,
    ) -> Result<SlotOutcome, CatalogError> {
        let exclusions: BTreeSet<DishId> = request
            .day_exclusions
            .union(request.week_exclusions)
            .copied()
            .collect();

        let candidates = self
            .catalog
            .query_candidates(request.category, self.filters, &exclusions)
            .await?;

        if let Some(dish) = pick(candidates, rng) {
            tracing::debug!(day = request.day, category = %request.category, dish = %dish.id, "slot resolved");
            return Ok(SlotOutcome::Resolved(ResolvedSlot {
                dish,
                path: ResolutionPath::Random,
                warning: None,
            }));
        }

        if !request.week_exclusions.is_empty() {
            let relaxed = self
                .catalog
                .query_candidates(request.category, self.filters, request.day_exclusions)
                .await?;

            if let Some(dish) = pick(relaxed, rng) {
                let warning = PlanWarning::repeat_across_week(request.day, request.category, &dish);
                tracing::warn!(day = request.day, category = %request.category, dish = %dish.id, "repeat forced across week");
                return Ok(SlotOutcome::Resolved(ResolvedSlot {
                    dish,
                    path: ResolutionPath::Relaxed,
                    warning: Some(warning),
                }));
            }
        }

        let error = self.diagnose(request).await?;
        tracing::warn!(day = request.day, category = %request.category, %error, "slot unresolved");
        Ok(SlotOutcome::Failed(error))
    }

    /// Build the error for an empty slot with the counts the caller needs
    async fn diagnose(&self, request: SlotRequest<'_>) -> Result<PlanError, CatalogError> {
        let none = BTreeSet::new();
        let category_total = self
            .catalog
            .query_candidates(request.category, &FilterOptions::default(), &none)
            .await?
            .len();
        let filtered_count = self
            .catalog
            .query_candidates(request.category, self.filters, &none)
            .await?
            .len();

        let active_filters = self.filters.active_fields();
        let mut limiting_filters = Vec::new();
        if self.diagnose_filters && filtered_count == 0 && category_total > 0 {
            for field in &active_filters {
                let relaxed = self.filters.without(*field);
                let freed = self
                    .catalog
                    .query_candidates(request.category, &relaxed, &none)
                    .await?;
                if !freed.is_empty() {
                    limiting_filters.push(*field);
                }
            }
        }

        Ok(PlanError::NoCandidatesForCategory {
            day: request.day,
            category: request.category,
            category_total,
            filtered_count,
            active_filters,
            limiting_filters,
        })
    }
}

/// Shuffle with the plan's stream and take the first
fn pick(mut candidates: Vec<Dish>, rng: &mut SeededRng) -> Option<Dish> {
    if candidates.is_empty() {
        return None;
    }
    shuffle(&mut candidates, rng);
    Some(candidates.swap_remove(0))
}
