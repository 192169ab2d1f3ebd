//! Dish filters
//!
//! [`FilterOptions`] is a conjunctive predicate over [`Dish`] attributes.
//! A field left at its default (false, empty set, `None`) places no
//! constraint on that dimension; an empty allow-list never rejects.

use crate::dish::{Difficulty, Dish, KosherStyle};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// User-supplied filters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterOptions {
    /// Only certified kosher dishes
    pub kosher_only: bool,
    /// Allowed kosher styles
    pub kosher_styles: BTreeSet<KosherStyle>,
    /// Allowed difficulties
    pub difficulties: BTreeSet<Difficulty>,
    /// Allowed main proteins
    pub main_proteins: BTreeSet<String>,
    /// Allowed cuisines
    pub cuisines: BTreeSet<String>,
    /// Dish must contain all of these
    pub required_ingredients: BTreeSet<String>,
    /// Dish must contain none of these
    pub excluded_ingredients: BTreeSet<String>,
    /// Dish must carry none of these allergens
    pub excluded_allergens: BTreeSet<String>,
    /// Upper bound on prep + cook time
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_total_time_minutes: Option<u32>,
}

/// One filterable dimension of [`FilterOptions`]
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum FilterField {
    /// `kosher_only`
    KosherOnly,
    /// `kosher_styles`
    KosherStyle,
    /// `difficulties`
    Difficulty,
    /// `main_proteins`
    MainProtein,
    /// `cuisines`
    Cuisine,
    /// `required_ingredients`
    RequiredIngredients,
    /// `excluded_ingredients`
    ExcludedIngredients,
    /// `excluded_allergens`
    ExcludedAllergens,
    /// `max_total_time_minutes`
    MaxTotalTime,
}

impl FilterField {
    /// Every field, in evaluation order
    pub const ALL: [FilterField; 9] = [
        FilterField::KosherOnly,
        FilterField::KosherStyle,
        FilterField::Difficulty,
        FilterField::MainProtein,
        FilterField::Cuisine,
        FilterField::RequiredIngredients,
        FilterField::ExcludedIngredients,
        FilterField::ExcludedAllergens,
        FilterField::MaxTotalTime,
    ];

    /// Human label
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            FilterField::KosherOnly => "kosher only",
            FilterField::KosherStyle => "kosher style",
            FilterField::Difficulty => "difficulty",
            FilterField::MainProtein => "main protein",
            FilterField::Cuisine => "cuisine",
            FilterField::RequiredIngredients => "required ingredients",
            FilterField::ExcludedIngredients => "excluded ingredients",
            FilterField::ExcludedAllergens => "excluded allergens",
            FilterField::MaxTotalTime => "max total time",
        }
    }
}

impl fmt::Display for FilterField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The first constraint a dish fails
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum FilterViolation {
    /// Not kosher under `kosher_only`
    #[error("dish is not kosher but only kosher dishes are allowed")]
    NotKosher,

    /// Kosher style outside the allow-list
    #[error("kosher style '{style}' is not among the allowed styles")]
    KosherStyleNotAllowed {
        /// Offending style
        style: KosherStyle,
    },

    /// Difficulty outside the allow-list
    #[error("difficulty '{difficulty}' is not among the allowed difficulties")]
    DifficultyNotAllowed {
        /// Offending difficulty
        difficulty: Difficulty,
    },

    /// Main protein outside the allow-list
    #[error("main protein '{}' is not among the allowed proteins", .protein.as_deref().unwrap_or("none"))]
    MainProteinNotAllowed {
        /// Offending protein, if any
        protein: Option<String>,
    },

    /// Cuisine outside the allow-list
    #[error("cuisine '{}' is not among the allowed cuisines", .cuisine.as_deref().unwrap_or("none"))]
    CuisineNotAllowed {
        /// Offending cuisine, if any
        cuisine: Option<String>,
    },

    /// Lacks a required ingredient
    #[error("dish does not contain required ingredient '{ingredient}'")]
    MissingRequiredIngredient {
        /// Missing ingredient
        ingredient: String,
    },

    /// Contains an excluded ingredient
    #[error("dish contains excluded ingredient '{ingredient}'")]
    ContainsExcludedIngredient {
        /// Offending ingredient
        ingredient: String,
    },

    /// Carries an excluded allergen
    #[error("dish contains excluded allergen '{allergen}'")]
    ContainsExcludedAllergen {
        /// Offending allergen
        allergen: String,
    },

    /// Too slow
    #[error("total time of {total_minutes} min exceeds the maximum of {max_minutes} min")]
    TotalTimeExceeded {
        /// prep + cook
        total_minutes: u32,
        /// Configured limit
        max_minutes: u32,
    },
}

impl FilterViolation {
    /// Field this violation belongs to
    #[must_use]
    pub fn field(&self) -> FilterField {
        match self {
            FilterViolation::NotKosher => FilterField::KosherOnly,
            FilterViolation::KosherStyleNotAllowed { .. } => FilterField::KosherStyle,
            FilterViolation::DifficultyNotAllowed { .. } => FilterField::Difficulty,
            FilterViolation::MainProteinNotAllowed { .. } => FilterField::MainProtein,
            FilterViolation::CuisineNotAllowed { .. } => FilterField::Cuisine,
            FilterViolation::MissingRequiredIngredient { .. } => FilterField::RequiredIngredients,
            FilterViolation::ContainsExcludedIngredient { .. } => FilterField::ExcludedIngredients,
            FilterViolation::ContainsExcludedAllergen { .. } => FilterField::ExcludedAllergens,
            FilterViolation::TotalTimeExceeded { .. } => FilterField::MaxTotalTime,
        }
    }
}

impl FilterOptions {
    /// No constraints
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Require kosher dishes
    #[must_use]
    pub fn kosher_only(mut self) -> Self {
        self.kosher_only = true;
        self
    }

    /// Restrict kosher styles
    #[must_use]
    pub fn with_kosher_styles(mut self, styles: impl IntoIterator<Item = KosherStyle>) -> Self {
        self.kosher_styles.extend(styles);
        self
    }

    /// Restrict difficulties
    #[must_use]
    pub fn with_difficulties(mut self, levels: impl IntoIterator<Item = Difficulty>) -> Self {
        self.difficulties.extend(levels);
        self
    }

    /// Restrict main proteins
    #[must_use]
    pub fn with_main_proteins<I, S>(mut self, proteins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.main_proteins.extend(lowercase(proteins));
        self
    }

    /// Restrict cuisines
    #[must_use]
    pub fn with_cuisines<I, S>(mut self, cuisines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.cuisines.extend(lowercase(cuisines));
        self
    }

    /// Ingredients every dish must contain
    #[must_use]
    pub fn with_required_ingredients<I, S>(mut self, ingredients: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.required_ingredients.extend(lowercase(ingredients));
        self
    }

    /// Ingredients no dish may contain
    #[must_use]
    pub fn with_excluded_ingredients<I, S>(mut self, ingredients: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.excluded_ingredients.extend(lowercase(ingredients));
        self
    }

    /// Allergens no dish may carry
    #[must_use]
    pub fn with_excluded_allergens<I, S>(mut self, allergens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.excluded_allergens.extend(lowercase(allergens));
        self
    }

    /// Cap prep + cook time
    #[must_use]
    pub fn with_max_total_time(mut self, minutes: u32) -> Self {
        self.max_total_time_minutes = Some(minutes);
        self
    }

    /// Whether `field` constrains anything
    #[must_use]
    pub fn is_active(&self, field: FilterField) -> bool {
        match field {
            FilterField::KosherOnly => self.kosher_only,
            FilterField::KosherStyle => !self.kosher_styles.is_empty(),
            FilterField::Difficulty => !self.difficulties.is_empty(),
            FilterField::MainProtein => !self.main_proteins.is_empty(),
            FilterField::Cuisine => !self.cuisines.is_empty(),
            FilterField::RequiredIngredients => !self.required_ingredients.is_empty(),
            FilterField::ExcludedIngredients => !self.excluded_ingredients.is_empty(),
            FilterField::ExcludedAllergens => !self.excluded_allergens.is_empty(),
            FilterField::MaxTotalTime => self.max_total_time_minutes.is_some(),
        }
    }

    /// Every field that constrains anything
    #[must_use]
    pub fn active_fields(&self) -> Vec<FilterField> {
        FilterField::ALL
            .into_iter()
            .filter(|f| self.is_active(*f))
            .collect()
    }

    /// Copy with `field` reset to "no constraint"
    #[must_use]
    pub fn without(&self, field: FilterField) -> Self {
        let mut relaxed = self.clone();
        match field {
            FilterField::KosherOnly => relaxed.kosher_only = false,
            FilterField::KosherStyle => relaxed.kosher_styles.clear(),
            FilterField::Difficulty => relaxed.difficulties.clear(),
            FilterField::MainProtein => relaxed.main_proteins.clear(),
            FilterField::Cuisine => relaxed.cuisines.clear(),
            FilterField::RequiredIngredients => relaxed.required_ingredients.clear(),
            FilterField::ExcludedIngredients => relaxed.excluded_ingredients.clear(),
            FilterField::ExcludedAllergens => relaxed.excluded_allergens.clear(),
            FilterField::MaxTotalTime => relaxed.max_total_time_minutes = None,
        }
        relaxed
    }

    /// Check `dish` against every active field, in [`FilterField::ALL`] order
    ///
    /// # Errors
    /// The first violated constraint.
    pub fn check(&self, dish: &Dish) -> Result<(), FilterViolation> {
        if self.kosher_only && !dish.kosher {
            return Err(FilterViolation::NotKosher);
        }

        if !self.kosher_styles.is_empty() && !self.kosher_styles.contains(&dish.kosher_style) {
            return Err(FilterViolation::KosherStyleNotAllowed {
                style: dish.kosher_style,
            });
        }

        if !self.difficulties.is_empty() && !self.difficulties.contains(&dish.difficulty) {
            return Err(FilterViolation::DifficultyNotAllowed {
                difficulty: dish.difficulty,
            });
        }

        if !self.main_proteins.is_empty()
            && !allowed(&self.main_proteins, dish.main_protein.as_deref())
        {
            return Err(FilterViolation::MainProteinNotAllowed {
                protein: dish.main_protein.clone(),
            });
        }

        if !self.cuisines.is_empty() && !allowed(&self.cuisines, dish.cuisine.as_deref()) {
            return Err(FilterViolation::CuisineNotAllowed {
                cuisine: dish.cuisine.clone(),
            });
        }

        if let Some(missing) = self
            .required_ingredients
            .iter()
            .find(|i| !dish.ingredients.contains(&i.to_lowercase()))
        {
            return Err(FilterViolation::MissingRequiredIngredient {
                ingredient: missing.clone(),
            });
        }

        if let Some(found) = self
            .excluded_ingredients
            .iter()
            .find(|i| dish.ingredients.contains(&i.to_lowercase()))
        {
            return Err(FilterViolation::ContainsExcludedIngredient {
                ingredient: found.clone(),
            });
        }

        if let Some(found) = self
            .excluded_allergens
            .iter()
            .find(|a| dish.allergens.contains(&a.to_lowercase()))
        {
            return Err(FilterViolation::ContainsExcludedAllergen {
                allergen: found.clone(),
            });
        }

        if let Some(max) = self.max_total_time_minutes {
            let total = dish.total_time_minutes();
            if total > max {
                return Err(FilterViolation::TotalTimeExceeded {
                    total_minutes: total,
                    max_minutes: max,
                });
            }
        }

        Ok(())
    }

    /// Whether `dish` passes every active field
    #[inline]
    #[must_use]
    pub fn matches(&self, dish: &Dish) -> bool {
        self.check(dish).is_ok()
    }
}

fn allowed(list: &BTreeSet<String>, value: Option<&str>) -> bool {
    value.is_some_and(|v| list.iter().any(|l| l.eq_ignore_ascii_case(v)))
}

fn lowercase<I, S>(values: I) -> impl Iterator<Item = String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    values.into_iter().map(|v| v.as_ref().to_lowercase())
}
