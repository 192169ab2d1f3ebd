//! Error types for plan generation
//!
//! Two layers:
//! - [`PlanError`]: domain failures reported inside a
//!   [`PlanGenerationResult`](crate::PlanGenerationResult) (empty catalog,
//!   unfillable slot, rejected lock)
//! - [`PlannerError`]: failures of the whole call (catalog backend down,
//!   timeout), returned as `Err`

use crate::lock::LockRejection;
use meal_catalog::{CatalogError, DishId, FilterField, SlotCategory, UnknownCategory};
use serde::{Deserialize, Serialize};

/// Machine-readable error code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlanErrorCode {
    /// Catalog holds no dishes at all
    NoDishesInDb,
    /// A slot has no usable candidate
    NoCandidatesForCategory,
    /// A caller-pinned dish violates constraints
    LockConflict,
    /// Reserved for aggregate-level reporting
    ConstraintsTooStrict,
}

/// Domain failure attached to a plan result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[serde(tag = "code", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlanError {
    /// Catalog is empty; no day was attempted
    #[error("the dish catalog is empty, add dishes before generating a plan")]
    NoDishesInDb,

    /// Slot could not be filled even after relaxation
    #[error(
        "day {}: no {category} available ({filtered_count} of {category_total} dishes match your filters)",
        .day + 1
    )]
    NoCandidatesForCategory {
        /// 0-based day index
        day: usize,
        /// Unfilled slot
        category: SlotCategory,
        /// Dishes in the category, ignoring filters
        category_total: usize,
        /// Dishes in the category passing the filters, ignoring exclusions;
        /// when non-zero, every one of them is already on this day
        filtered_count: usize,
        /// Every constrained filter field
        active_filters: Vec<FilterField>,
        /// Active fields whose removal alone would free a candidate
        limiting_filters: Vec<FilterField>,
    },

    /// Caller-pinned dish rejected
    #[error("day {}: locked dish {dish_id} cannot fill {category}: {reason}", .day + 1)]
    LockConflict {
        /// 0-based day index
        day: usize,
        /// Slot the lock targeted
        category: SlotCategory,
        /// Locked dish id
        dish_id: DishId,
        /// Specific failed rule
        reason: LockRejection,
    },

    /// Reserved for aggregate-level reporting
    #[error("constraints too strict: {message}")]
    ConstraintsTooStrict {
        /// Slot, when the failure is scoped to one
        category: Option<SlotCategory>,
        /// Explanation
        message: String,
    },
}

impl PlanError {
    /// Error code
    #[must_use]
    pub fn code(&self) -> PlanErrorCode {
        match self {
            PlanError::NoDishesInDb => PlanErrorCode::NoDishesInDb,
            PlanError::NoCandidatesForCategory { .. } => PlanErrorCode::NoCandidatesForCategory,
            PlanError::LockConflict { .. } => PlanErrorCode::LockConflict,
            PlanError::ConstraintsTooStrict { .. } => PlanErrorCode::ConstraintsTooStrict,
        }
    }

    /// Slot the error is scoped to
    #[must_use]
    pub fn category(&self) -> Option<SlotCategory> {
        match self {
            PlanError::NoDishesInDb => None,
            PlanError::NoCandidatesForCategory { category, .. }
            | PlanError::LockConflict { category, .. } => Some(*category),
            PlanError::ConstraintsTooStrict { category, .. } => *category,
        }
    }

    /// 0-based day the error occurred on
    #[must_use]
    pub fn day(&self) -> Option<usize> {
        match self {
            PlanError::NoCandidatesForCategory { day, .. } | PlanError::LockConflict { day, .. } => {
                Some(*day)
            }
            _ => None,
        }
    }

    /// Actionable follow-up for the user, when one can be derived
    #[must_use]
    pub fn hint(&self) -> Option<String> {
        match self {
            PlanError::NoCandidatesForCategory { category_total: 0, category, .. } => {
                Some(format!("the catalog has no {category} dishes yet"))
            }
            PlanError::NoCandidatesForCategory {
                limiting_filters,
                filtered_count: 0,
                ..
            } if !limiting_filters.is_empty() => {
                let names: Vec<&str> = limiting_filters.iter().map(|f| f.label()).collect();
                Some(format!("try loosening: {}", names.join(", ")))
            }
            PlanError::NoCandidatesForCategory {
                filtered_count,
                category,
                ..
            } if *filtered_count > 0 => Some(format!(
                "every matching {category} dish is already on this day, add more {category} dishes"
            )),
            PlanError::LockConflict { category, .. } => {
                Some(format!("unlock {category} or pick a dish that fits your filters"))
            }
            _ => None,
        }
    }
}

/// Stored category profile could not be used
#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    /// Not a JSON array of strings
    #[error("malformed category list: {0}")]
    Malformed(#[from] serde_json::Error),

    /// Contains an unknown identifier
    #[error(transparent)]
    UnknownCategory(#[from] UnknownCategory),

    /// Parsed to zero categories
    #[error("category list is empty")]
    Empty,
}

/// Whole-call failure of the generator
#[derive(Debug, thiserror::Error)]
pub enum PlannerError {
    /// Catalog backend failed
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Generation exceeded the configured deadline
    #[error("plan generation timed out after {duration_ms}ms")]
    Timeout {
        /// Configured deadline
        duration_ms: u64,
    },
}

impl PlannerError {
    /// Check if error is retryable
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Timeout { .. } | Self::Catalog(CatalogError::Unavailable(_))
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use meal_catalog::FilterViolation;

    fn no_candidates(filtered_count: usize, category_total: usize) -> PlanError {
        PlanError::NoCandidatesForCategory {
            day: 0,
            category: SlotCategory::SideVegetable,
            category_total,
            filtered_count,
            active_filters: vec![FilterField::KosherOnly, FilterField::MaxTotalTime],
            limiting_filters: vec![FilterField::MaxTotalTime],
        }
    }

    #[test]
    fn codes_serialize_screaming() {
        let json = serde_json::to_value(PlanError::NoDishesInDb).unwrap();
        assert_eq!(json["code"], "NO_DISHES_IN_DB");

        let json = serde_json::to_value(no_candidates(0, 12)).unwrap();
        assert_eq!(json["code"], "NO_CANDIDATES_FOR_CATEGORY");
        assert_eq!(json["category"], "side_vegetable");
        assert_eq!(json["category_total"], 12);
        assert_eq!(json["limiting_filters"][0], "max_total_time");
    }

    #[test]
    fn no_candidates_message_counts() {
        let err = no_candidates(0, 12);
        let msg = err.to_string();
        assert!(msg.starts_with("day 1: no side_vegetable"));
        assert!(msg.ends_with("(0 of 12 dishes match your filters)"));
        assert_eq!(err.code(), PlanErrorCode::NoCandidatesForCategory);
        assert_eq!(err.category(), Some(SlotCategory::SideVegetable));
    }

    #[test]
    fn hints_distinguish_causes() {
        assert!(no_candidates(0, 0).hint().unwrap().contains("no side_vegetable dishes"));
        assert!(no_candidates(0, 12).hint().unwrap().contains("max total time"));
        assert!(no_candidates(3, 12).hint().unwrap().contains("already on this day"));
        assert!(PlanError::NoDishesInDb.hint().is_none());
    }

    #[test]
    fn lock_conflict_round_trips() {
        let err = PlanError::LockConflict {
            day: 0,
            category: SlotCategory::Soup,
            dish_id: DishId(9),
            reason: LockRejection::FilterViolation {
                dish_id: DishId(9),
                violation: FilterViolation::NotKosher,
            },
        };
        let json = serde_json::to_string(&err).unwrap();
        let back: PlanError = serde_json::from_str(&json).unwrap();
        assert_eq!(back, err);
        assert_eq!(back.day(), Some(0));
    }

    #[test]
    fn planner_error_retryable() {
        assert!(PlannerError::Timeout { duration_ms: 10 }.is_retryable());
        assert!(PlannerError::Catalog(CatalogError::Unavailable("down".into())).is_retryable());
        assert!(!PlannerError::Catalog(CatalogError::DuplicateId(DishId(1))).is_retryable());
    }
}
