//! Meal Plan - seeded meal plan generation
//!
//! Draws one dish per category per day from a [`DishCatalog`], honouring:
//! - User filters on every slot
//! - Caller-pinned ("locked") dishes
//! - No dish twice in a day, and optionally no dish twice in a week
//! - A seed that makes every plan reproducible
//!
//! Slots are resolved greedily and independently; the only fallback is
//! dropping the week-wide exclusion when a slot would otherwise be empty.
//!
//! # Example
//!
//! ```rust,ignore
//! use meal_plan::{PlanGenerator, PlanMode, PlanRequest};
//! use meal_catalog::{FilterOptions, InMemoryCatalog};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let catalog = InMemoryCatalog::from_json_file("dishes.json")?;
//! let generator = PlanGenerator::new(catalog);
//!
//! let request = PlanRequest::new(PlanMode::Weekly)
//!     .with_filters(FilterOptions::new().kosher_only())
//!     .with_seed("family-week-12");
//! let result = generator.generate_plan(&request).await?;
//!
//! if let Some(plan) = result.plan() {
//!     println!("{} of {} days", plan.days.len(), plan.requested_days());
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

// Core modules
pub mod config;
pub mod day;
pub mod error;
pub mod generator;
pub mod lock;
pub mod rng;
pub mod slot;
pub mod types;

// Re-exports for convenience
pub use config::{ConfigError, PlannerConfig};
pub use day::{DayGenerator, DayOutcome};
pub use error::{PlanError, PlanErrorCode, PlannerError, ProfileError};
pub use generator::PlanGenerator;
pub use lock::{validate_locked_dish, LockRejection, LockValidation};
pub use rng::{generate_seed, hash_seed, shuffle, SeededRng};
pub use slot::{ResolutionPath, ResolvedSlot, SlotOutcome, SlotRequest, SlotResolver};
pub use types::{
    CategoryProfile, GeneratedDay, GeneratedPlan, LockedDishes, PlanGenerationResult, PlanMode,
    PlanRequest, PlanWarning, WarningKind, WEEK_DAYS,
};

pub use meal_catalog::DishCatalog;

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for generating plans
    pub use crate::{
        CategoryProfile, GeneratedPlan, LockedDishes, PlanGenerationResult, PlanGenerator,
        PlanMode, PlanRequest, PlannerConfig,
    };
    pub use meal_catalog::{DishCatalog, FilterOptions, InMemoryCatalog, SlotCategory};
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
