//! Testing utilities for the meal planner workspace
//!
//! Shared dish fixtures and ready-made catalogs.

#![allow(missing_docs)]

use meal_catalog::{Difficulty, Dish, InMemoryCatalog, KosherStyle, SlotCategory};

pub fn catalog_with(dishes: impl IntoIterator<Item = Dish>) -> InMemoryCatalog {
    InMemoryCatalog::from_dishes(dishes).unwrap()
}

/// One soup (id 1) and one muffin (id 2)
pub fn soup_and_muffin_catalog() -> InMemoryCatalog {
    catalog_with([
        Dish::new(1, "split pea soup", SlotCategory::Soup).with_kosher(KosherStyle::Pareve),
        Dish::new(2, "banana muffin", SlotCategory::Muffin).with_kosher(KosherStyle::Dairy),
    ])
}

/// Four dishes in every category with varied attributes
///
/// Ids are `category_index * 100 + n` for `n` in `1..=4`.
pub fn sample_catalog() -> InMemoryCatalog {
    let proteins = ["beef", "chicken", "fish", "beans"];
    let cuisines = ["italian", "mexican", "japanese", "ashkenazi"];
    let styles = [KosherStyle::Meat, KosherStyle::Dairy, KosherStyle::Pareve];
    let levels = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];
    let allergens = ["gluten", "dairy", "nuts", "egg"];
    let ingredients = ["onion", "garlic", "tomato", "potato", "carrot", "rice"];

    let mut dishes = Vec::new();
    for (c, category) in SlotCategory::ALL.into_iter().enumerate() {
        for n in 0..4usize {
            let id = (c * 100 + n + 1) as u64;
            let seed = c + n;
            let mut dish = Dish::new(id, format!("{category} {}", n + 1), category)
                .with_kosher_style(styles[seed % styles.len()])
                .with_difficulty(levels[(c * 2 + n) % levels.len()])
                .with_main_protein(proteins[seed % proteins.len()])
                .with_cuisine(cuisines[(c + 2 * n) % cuisines.len()])
                .with_times(Some(5 + 5 * n as u32), Some(10 * (c as u32 % 5) + 5))
                .with_ingredients([
                    ingredients[seed % ingredients.len()],
                    ingredients[(seed + 3) % ingredients.len()],
                ])
                .with_allergens([allergens[seed % allergens.len()]]);
            if seed % 3 != 0 {
                dish.kosher = true;
            }
            dishes.push(dish);
        }
    }
    catalog_with(dishes)
}
