//! Core types for plan generation
//!
//! Defines the request the caller hands in and the plan that comes back:
//! - Plan mode, locks and category profiles
//! - Generated days and plans
//! - Warnings and the overall generation result

use crate::config::{first_occurrences, PlannerConfig};
use crate::error::{PlanError, ProfileError};
use indexmap::IndexMap;
use meal_catalog::{Dish, DishId, FilterOptions, SlotCategory};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Number of days in a weekly plan
pub const WEEK_DAYS: usize = 7;

/// How many days to generate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanMode {
    /// One day
    #[default]
    Daily,
    /// Seven days
    Weekly,
}

impl PlanMode {
    /// Days generated in this mode
    #[inline]
    #[must_use]
    pub fn day_count(self) -> usize {
        match self {
            PlanMode::Daily => 1,
            PlanMode::Weekly => WEEK_DAYS,
        }
    }
}

impl fmt::Display for PlanMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PlanMode::Daily => "daily",
            PlanMode::Weekly => "weekly",
        })
    }
}

/// Caller-pinned dishes, one per category at most
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LockedDishes(BTreeMap<SlotCategory, DishId>);

impl LockedDishes {
    /// No locks
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pin `dish_id` to `category`
    #[must_use]
    pub fn with(mut self, category: SlotCategory, dish_id: impl Into<DishId>) -> Self {
        self.0.insert(category, dish_id.into());
        self
    }

    /// Pinned dish for `category`
    #[inline]
    #[must_use]
    pub fn get(&self, category: SlotCategory) -> Option<DishId> {
        self.0.get(&category).copied()
    }

    /// Whether nothing is pinned
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Pinned categories in category order
    pub fn categories(&self) -> impl Iterator<Item = SlotCategory> + '_ {
        self.0.keys().copied()
    }
}

/// Stored category-list preset
///
/// `categories` is kept in its stored form, a JSON array of category
/// identifiers, and only parsed at generation time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryProfile {
    /// Profile identifier, echoed in the plan
    pub id: String,
    /// Raw JSON array, e.g. `["soup", "main_beef"]`
    pub categories: String,
}

impl CategoryProfile {
    /// Profile from an already-serialized category list
    #[must_use]
    pub fn new(id: impl Into<String>, categories: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            categories: categories.into(),
        }
    }

    /// Profile from a category slice
    #[must_use]
    pub fn from_categories(id: impl Into<String>, categories: &[SlotCategory]) -> Self {
        let names: Vec<&str> = categories.iter().map(|c| c.as_str()).collect();
        Self {
            id: id.into(),
            categories: serde_json::Value::from(names).to_string(),
        }
    }

    /// Parse the stored list, dropping repeats after their first position
    ///
    /// # Errors
    /// Malformed JSON, unknown identifiers or an empty list.
    pub fn parse_categories(&self) -> Result<Vec<SlotCategory>, ProfileError> {
        let names: Vec<String> = serde_json::from_str(&self.categories)?;
        let parsed = names
            .iter()
            .map(|name| name.parse::<SlotCategory>())
            .collect::<Result<Vec<_>, _>>()?;
        let categories = first_occurrences(&parsed);
        if categories.is_empty() {
            return Err(ProfileError::Empty);
        }
        Ok(categories)
    }
}

/// Everything a caller supplies for one generation
///
/// Fields left out of a serialized request take their [`Default`] values;
/// the no-repeat rule defaults to on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanRequest {
    /// Filters every slot must satisfy
    pub filters: FilterOptions,
    /// Daily or weekly
    pub mode: PlanMode,
    /// Optional category preset
    pub profile: Option<CategoryProfile>,
    /// Pinned dishes; weekly plans apply them to day 0 only
    pub locks: LockedDishes,
    /// Seed for reproducible output; generated when absent
    pub seed: Option<String>,
    /// Forbid a dish on more than one day
    pub no_repeat_across_week: bool,
}

impl Default for PlanRequest {
    fn default() -> Self {
        Self {
            filters: FilterOptions::default(),
            mode: PlanMode::default(),
            profile: None,
            locks: LockedDishes::default(),
            seed: None,
            no_repeat_across_week: true,
        }
    }
}

impl PlanRequest {
    /// Request for `mode` with no filters, locks or profile
    #[must_use]
    pub fn new(mode: PlanMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    /// Request seeded from configured defaults
    #[must_use]
    pub fn from_config(config: &PlannerConfig) -> Self {
        Self {
            mode: config.default_mode,
            no_repeat_across_week: config.no_repeat_across_week,
            ..Self::default()
        }
    }

    /// With filters
    #[must_use]
    pub fn with_filters(mut self, filters: FilterOptions) -> Self {
        self.filters = filters;
        self
    }

    /// With mode
    #[must_use]
    pub fn with_mode(mut self, mode: PlanMode) -> Self {
        self.mode = mode;
        self
    }

    /// With profile
    #[must_use]
    pub fn with_profile(mut self, profile: CategoryProfile) -> Self {
        self.profile = Some(profile);
        self
    }

    /// With locks
    #[must_use]
    pub fn with_locks(mut self, locks: LockedDishes) -> Self {
        self.locks = locks;
        self
    }

    /// With seed
    #[must_use]
    pub fn with_seed(mut self, seed: impl Into<String>) -> Self {
        self.seed = Some(seed.into());
        self
    }

    /// With cross-day repeat rule
    #[must_use]
    pub fn with_no_repeat_across_week(mut self, enabled: bool) -> Self {
        self.no_repeat_across_week = enabled;
        self
    }
}

/// One generated day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedDay {
    /// 0-based day index
    pub day_index: usize,
    /// Selected dish per category, in resolution order
    pub dishes: IndexMap<SlotCategory, Dish>,
}

impl GeneratedDay {
    /// Dish chosen for `category`
    #[must_use]
    pub fn dish(&self, category: SlotCategory) -> Option<&Dish> {
        self.dishes.get(&category)
    }

    /// Ids of every dish chosen this day
    pub fn dish_ids(&self) -> impl Iterator<Item = DishId> + '_ {
        self.dishes.values().map(|d| d.id)
    }
}

/// A generated plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedPlan {
    /// Successful days, in order
    pub days: Vec<GeneratedDay>,
    /// Seed that reproduces this plan
    pub seed: String,
    /// Requested mode
    pub mode: PlanMode,
    /// Profile the categories came from
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_id: Option<String>,
}

impl GeneratedPlan {
    /// Days the mode asked for
    #[inline]
    #[must_use]
    pub fn requested_days(&self) -> usize {
        self.mode.day_count()
    }

    /// Whether every requested day was produced
    #[inline]
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.days.len() == self.requested_days()
    }
}

/// Warning classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    /// Relaxation reused a dish from an earlier day
    RepeatAcrossWeek,
    /// Fewer days produced than requested
    PartialPlan,
}

/// Non-fatal note attached to a result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanWarning {
    /// Classification
    pub kind: WarningKind,
    /// 0-based day, when scoped to one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub day: Option<usize>,
    /// Slot, when scoped to one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<SlotCategory>,
    /// User-facing text
    pub message: String,
}

impl PlanWarning {
    /// A weekly repeat was forced for `category` on `day`
    #[must_use]
    pub fn repeat_across_week(day: usize, category: SlotCategory, dish: &Dish) -> Self {
        Self {
            kind: WarningKind::RepeatAcrossWeek,
            day: Some(day),
            category: Some(category),
            message: format!(
                "day {}: no unused dishes left this week, had to repeat '{}' for {category}",
                day + 1,
                dish.name
            ),
        }
    }

    /// Only `produced` of `requested` days came out
    #[must_use]
    pub fn partial_plan(produced: usize, requested: usize) -> Self {
        Self {
            kind: WarningKind::PartialPlan,
            day: None,
            category: None,
            message: format!("only {produced} of {requested} requested days could be generated"),
        }
    }
}

impl fmt::Display for PlanWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Overall result of a generation call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum PlanGenerationResult {
    /// At least one day was produced
    Success {
        /// The plan
        plan: GeneratedPlan,
        /// Relaxation and partial-plan warnings
        warnings: Vec<PlanWarning>,
    },
    /// No day was produced
    Failure {
        /// Seed used, for reproducing the failure
        seed: String,
        /// Every collected error
        errors: Vec<PlanError>,
        /// Warnings gathered before failing
        warnings: Vec<PlanWarning>,
    },
}

impl PlanGenerationResult {
    /// Whether a plan came back
    #[inline]
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// The plan, on success
    #[must_use]
    pub fn plan(&self) -> Option<&GeneratedPlan> {
        match self {
            Self::Success { plan, .. } => Some(plan),
            Self::Failure { .. } => None,
        }
    }

    /// Errors, empty on success
    #[must_use]
    pub fn errors(&self) -> &[PlanError] {
        match self {
            Self::Success { .. } => &[],
            Self::Failure { errors, .. } => errors,
        }
    }

    /// Warnings
    #[must_use]
    pub fn warnings(&self) -> &[PlanWarning] {
        match self {
            Self::Success { warnings, .. } | Self::Failure { warnings, .. } => warnings,
        }
    }

    /// Seed used, on both outcomes
    #[must_use]
    pub fn seed(&self) -> &str {
        match self {
            Self::Success { plan, .. } => &plan.seed,
            Self::Failure { seed, .. } => seed,
        }
    }
}
