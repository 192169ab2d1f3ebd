//! Meal Catalog
//!
//! Dish data model and the read-only catalog contract the planner consumes.
//!
//! # Core Concepts
//!
//! - [`Dish`]: One catalog entry with its filterable attributes
//! - [`SlotCategory`]: The food role a dish fills
//! - [`FilterOptions`]: Conjunctive predicate over dish attributes
//! - [`DishCatalog`]: Async collaborator trait (count, query, lookup)
//! - [`InMemoryCatalog`]: Reference implementation with id-ordered results
//!
//! # Example
//!
//! ```rust,ignore
//! use meal_catalog::{Dish, DishCatalog, FilterOptions, InMemoryCatalog, SlotCategory};
//!
//! let catalog = InMemoryCatalog::from_json_file("dishes.json")?;
//! let soups = catalog
//!     .query_candidates(SlotCategory::Soup, &FilterOptions::new().kosher_only(), &Default::default())
//!     .await?;
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod catalog;
mod dish;
mod filter;
mod memory;

pub use catalog::{CatalogError, DishCatalog};
pub use dish::{Difficulty, Dish, DishId, KosherStyle, SlotCategory, UnknownCategory};
pub use filter::{FilterField, FilterOptions, FilterViolation};
pub use memory::InMemoryCatalog;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
