//! Dish data model
//!
//! A [`Dish`] is one catalog entry. Dishes are owned by the catalog and are
//! read-only for the duration of a generation run.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Stable catalog identifier of a dish
///
/// Ordering on ids is the catalog's stable sort key.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct DishId(pub u64);

impl DishId {
    /// Raw numeric value
    #[inline]
    #[must_use]
    pub fn value(self) -> u64 {
        self.0
    }
}

impl From<u64> for DishId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl fmt::Display for DishId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Food role a dish fills in a plan
///
/// Declaration order is the default resolution order of a day.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum SlotCategory {
    /// Soup course
    Soup,
    /// Salad course
    Salad,
    /// Beef main
    MainBeef,
    /// Chicken main
    MainChicken,
    /// Fish main
    MainFish,
    /// Vegetarian main
    MainVegetarian,
    /// Starch side (rice, potatoes, ...)
    SideStarch,
    /// Vegetable side
    SideVegetable,
    /// Muffin
    Muffin,
    /// Dessert
    Dessert,
}

impl SlotCategory {
    /// Every category, in declaration order
    pub const ALL: [SlotCategory; 10] = [
        SlotCategory::Soup,
        SlotCategory::Salad,
        SlotCategory::MainBeef,
        SlotCategory::MainChicken,
        SlotCategory::MainFish,
        SlotCategory::MainVegetarian,
        SlotCategory::SideStarch,
        SlotCategory::SideVegetable,
        SlotCategory::Muffin,
        SlotCategory::Dessert,
    ];

    /// Wire identifier
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SlotCategory::Soup => "soup",
            SlotCategory::Salad => "salad",
            SlotCategory::MainBeef => "main_beef",
            SlotCategory::MainChicken => "main_chicken",
            SlotCategory::MainFish => "main_fish",
            SlotCategory::MainVegetarian => "main_vegetarian",
            SlotCategory::SideStarch => "side_starch",
            SlotCategory::SideVegetable => "side_vegetable",
            SlotCategory::Muffin => "muffin",
            SlotCategory::Dessert => "dessert",
        }
    }
}

impl fmt::Display for SlotCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown category identifier
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown slot category: '{0}'")]
pub struct UnknownCategory(pub String);

impl FromStr for SlotCategory {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SlotCategory::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

/// Kosher style of a dish
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum KosherStyle {
    /// Contains meat
    Meat,
    /// Contains dairy
    Dairy,
    /// Neither meat nor dairy
    #[default]
    Pareve,
}

impl fmt::Display for KosherStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            KosherStyle::Meat => "meat",
            KosherStyle::Dairy => "dairy",
            KosherStyle::Pareve => "pareve",
        })
    }
}

/// Preparation difficulty
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    /// Weeknight friendly
    #[default]
    Easy,
    /// Some effort
    Medium,
    /// Project cooking
    Hard,
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        })
    }
}

/// One catalog entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dish {
    /// Catalog identity
    pub id: DishId,
    /// Display name
    pub name: String,
    /// Slot this dish can fill
    pub slot_category: SlotCategory,
    /// Certified kosher
    #[serde(default)]
    pub kosher: bool,
    /// Meat / dairy / pareve
    #[serde(default)]
    pub kosher_style: KosherStyle,
    /// Preparation difficulty
    #[serde(default)]
    pub difficulty: Difficulty,
    /// Main protein, lowercase
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub main_protein: Option<String>,
    /// Cuisine, lowercase
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cuisine: Option<String>,
    /// Preparation time in minutes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prep_time_minutes: Option<u32>,
    /// Cooking time in minutes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cook_time_minutes: Option<u32>,
    /// Ingredient names, lowercase
    #[serde(default)]
    pub ingredients: BTreeSet<String>,
    /// Allergen names, lowercase
    #[serde(default)]
    pub allergens: BTreeSet<String>,
}

impl Dish {
    /// Create a pareve, easy, non-kosher dish with no optional attributes
    #[must_use]
    pub fn new(id: impl Into<DishId>, name: impl Into<String>, category: SlotCategory) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            slot_category: category,
            kosher: false,
            kosher_style: KosherStyle::default(),
            difficulty: Difficulty::default(),
            main_protein: None,
            cuisine: None,
            prep_time_minutes: None,
            cook_time_minutes: None,
            ingredients: BTreeSet::new(),
            allergens: BTreeSet::new(),
        }
    }

    /// Combined prep and cook time; absent values count as zero
    #[inline]
    #[must_use]
    pub fn total_time_minutes(&self) -> u32 {
        self.prep_time_minutes
            .unwrap_or(0)
            .saturating_add(self.cook_time_minutes.unwrap_or(0))
    }

    /// Lowercase every free-text attribute used by filters
    #[must_use]
    pub fn normalized(mut self) -> Self {
        self.main_protein = self.main_protein.map(|p| p.to_lowercase());
        self.cuisine = self.cuisine.map(|c| c.to_lowercase());
        self.ingredients = self.ingredients.iter().map(|i| i.to_lowercase()).collect();
        self.allergens = self.allergens.iter().map(|a| a.to_lowercase()).collect();
        self
    }

    /// Mark kosher with the given style
    #[must_use]
    pub fn with_kosher(mut self, style: KosherStyle) -> Self {
        self.kosher = true;
        self.kosher_style = style;
        self
    }

    /// Set kosher style without certifying
    #[must_use]
    pub fn with_kosher_style(mut self, style: KosherStyle) -> Self {
        self.kosher_style = style;
        self
    }

    /// Set difficulty
    #[must_use]
    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = difficulty;
        self
    }

    /// Set main protein
    #[must_use]
    pub fn with_main_protein(mut self, protein: impl Into<String>) -> Self {
        self.main_protein = Some(protein.into().to_lowercase());
        self
    }

    /// Set cuisine
    #[must_use]
    pub fn with_cuisine(mut self, cuisine: impl Into<String>) -> Self {
        self.cuisine = Some(cuisine.into().to_lowercase());
        self
    }

    /// Set prep and cook times
    #[must_use]
    pub fn with_times(mut self, prep: Option<u32>, cook: Option<u32>) -> Self {
        self.prep_time_minutes = prep;
        self.cook_time_minutes = cook;
        self
    }

    /// Add ingredients
    #[must_use]
    pub fn with_ingredients<I, S>(mut self, ingredients: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.ingredients
            .extend(ingredients.into_iter().map(|i| i.as_ref().to_lowercase()));
        self
    }

    /// Add allergens
    #[must_use]
    pub fn with_allergens<I, S>(mut self, allergens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.allergens
            .extend(allergens.into_iter().map(|a| a.as_ref().to_lowercase()));
        self
    }
}
