//! Plan generation
//!
//! The top-level entry point. One call:
//! 1. Uses the caller's seed verbatim (generating one only when absent) and
//!    echoes it back
//! 2. Fails fast with `NO_DISHES_IN_DB` on an empty catalog
//! 3. Picks the category list (profile, else configured defaults)
//! 4. Generates each day in order from a single seeded stream
//! 5. Folds day outcomes into success, partial success or failure
//!
//! Weekly plans apply locks to day 0 only; later days pick freely under the
//! no-repeat rule.

use crate::config::{first_occurrences, PlannerConfig};
use crate::day::{DayGenerator, DayOutcome};
use crate::error::{PlanError, PlannerError};
use crate::rng::{generate_seed, SeededRng};
use crate::slot::SlotResolver;
use crate::types::{
    CategoryProfile, GeneratedPlan, PlanGenerationResult, PlanRequest, PlanWarning,
};
use meal_catalog::{DishCatalog, SlotCategory};
use std::collections::BTreeSet;

/// Meal plan generator over a read-only catalog
#[derive(Debug)]
pub struct PlanGenerator<C> {
    catalog: C,
    config: PlannerConfig,
}

impl<C: DishCatalog> PlanGenerator<C> {
    /// Create generator with default configuration
    #[inline]
    #[must_use]
    pub fn new(catalog: C) -> Self {
        Self::with_config(catalog, PlannerConfig::default())
    }

    /// Create generator with configuration
    #[inline]
    #[must_use]
    pub fn with_config(catalog: C, config: PlannerConfig) -> Self {
        Self { catalog, config }
    }

    /// Get configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Get catalog
    #[inline]
    #[must_use]
    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    /// Generate a plan
    ///
    /// Domain failures (empty catalog, unfillable slots, bad locks) come
    /// back inside [`PlanGenerationResult::Failure`] or as warnings.
    ///
    /// # Errors
    /// - [`PlannerError::Catalog`] if the catalog backend fails
    /// - [`PlannerError::Timeout`] if the configured deadline passes
    pub async fn generate_plan(
        &self,
        request: &PlanRequest,
    ) -> Result<PlanGenerationResult, PlannerError> {
        match self.config.timeout() {
            Some(deadline) => tokio::time::timeout(deadline, self.run(request))
                .await
                .map_err(|_| PlannerError::Timeout {
                    duration_ms: self.config.timeout_ms.unwrap_or_default(),
                })?,
            None => self.run(request).await,
        }
    }

    async fn run(&self, request: &PlanRequest) -> Result<PlanGenerationResult, PlannerError> {
        let seed = request.seed.clone().unwrap_or_else(generate_seed);
        let requested_days = request.mode.day_count();
        tracing::info!(%seed, mode = %request.mode, requested_days, "generating plan");

        if self.catalog.count_all_dishes().await? == 0 {
            tracing::warn!("catalog is empty");
            return Ok(PlanGenerationResult::Failure {
                seed,
                errors: vec![PlanError::NoDishesInDb],
                warnings: Vec::new(),
            });
        }

        let categories = self.resolve_categories(request.profile.as_ref());
        for locked in request.locks.categories() {
            if !categories.contains(&locked) {
                tracing::debug!(category = %locked, "lock ignored, category not in plan");
            }
        }

        let mut rng = SeededRng::new(&seed);
        let resolver = SlotResolver::new(&self.catalog, &request.filters)
            .with_diagnose_filters(self.config.diagnose_filters);
        let day_generator =
            DayGenerator::new(resolver, &categories, request.no_repeat_across_week);

        let mut week_exclusions = BTreeSet::new();
        let mut days = Vec::with_capacity(requested_days);
        let mut warnings = Vec::new();
        let mut errors = Vec::new();

        for day_index in 0..requested_days {
            let locks = (day_index == 0).then_some(&request.locks);
            let outcome = day_generator
                .generate(day_index, locks, &mut week_exclusions, &mut rng)
                .await?;

            match outcome {
                DayOutcome::Completed {
                    day,
                    warnings: day_warnings,
                } => {
                    days.push(day);
                    warnings.extend(day_warnings);
                }
                DayOutcome::Failed {
                    errors: day_errors,
                    warnings: day_warnings,
                } => {
                    errors.extend(day_errors);
                    warnings.extend(day_warnings);
                }
            }
        }

        if days.is_empty() {
            tracing::warn!(%seed, errors = errors.len(), "no day could be generated");
            return Ok(PlanGenerationResult::Failure {
                seed,
                errors,
                warnings,
            });
        }

        if days.len() < requested_days {
            warnings.push(PlanWarning::partial_plan(days.len(), requested_days));
        }

        tracing::info!(
            %seed,
            produced = days.len(),
            requested_days,
            warnings = warnings.len(),
            "plan generated"
        );
        Ok(PlanGenerationResult::Success {
            plan: GeneratedPlan {
                days,
                seed,
                mode: request.mode,
                profile_id: request.profile.as_ref().map(|p| p.id.clone()),
            },
            warnings,
        })
    }

    /// Profile categories when usable, else the configured defaults
    ///
    /// Either way each category appears once, at its first position.
    fn resolve_categories(&self, profile: Option<&CategoryProfile>) -> Vec<SlotCategory> {
        let Some(profile) = profile else {
            return first_occurrences(&self.config.default_categories);
        };

        match profile.parse_categories() {
            Ok(categories) => categories,
            Err(e) => {
                tracing::warn!(profile = %profile.id, error = %e, "unusable profile, using default categories");
                first_occurrences(&self.config.default_categories)
            }
        }
    }
}
