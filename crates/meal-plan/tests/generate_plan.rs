//! End-to-end behaviour of `PlanGenerator::generate_plan`.
//!
//! Each test builds a small catalog, runs one generation and checks the
//! observable contract: which days come back, which errors and warnings
//! are attached, and that the same seed reproduces the same plan.

use async_trait::async_trait;
use meal_catalog::{
    CatalogError, Dish, DishCatalog, DishId, FilterOptions, InMemoryCatalog, KosherStyle,
    SlotCategory,
};
use meal_plan::{
    CategoryProfile, GeneratedDay, LockRejection, LockedDishes, PlanError, PlanErrorCode,
    PlanGenerationResult, PlanGenerator, PlanMode, PlanRequest, PlannerConfig, PlannerError,
    WarningKind,
};
use meal_test_utils::{catalog_with, sample_catalog, soup_and_muffin_catalog};
use mockall::mock;
use pretty_assertions::assert_eq;
use std::collections::BTreeSet;
use std::time::Duration;

mock! {
    pub Catalog {}

    #[async_trait]
    impl DishCatalog for Catalog {
        async fn count_all_dishes(&self) -> Result<usize, CatalogError>;
        async fn query_candidates(
            &self,
            category: SlotCategory,
            filters: &FilterOptions,
            exclude_ids: &BTreeSet<DishId>,
        ) -> Result<Vec<Dish>, CatalogError>;
        async fn get_dish_by_id(&self, id: DishId) -> Result<Option<Dish>, CatalogError>;
    }
}

fn only(categories: &[SlotCategory]) -> CategoryProfile {
    CategoryProfile::from_categories("test", categories)
}

fn soups(count: u64) -> InMemoryCatalog {
    catalog_with((1..=count).map(|id| Dish::new(id, format!("soup {id}"), SlotCategory::Soup)))
}

/// An empty catalog fails fast with NO_DISHES_IN_DB and never
/// queries for candidates.
#[tokio::test]
async fn empty_catalog_fails_without_querying() {
    let mut catalog = MockCatalog::new();
    catalog.expect_count_all_dishes().times(1).returning(|| Ok(0));
    catalog.expect_query_candidates().never();
    catalog.expect_get_dish_by_id().never();

    let generator = PlanGenerator::new(catalog);
    let request = PlanRequest::new(PlanMode::Weekly)
        .with_seed("empty")
        .with_locks(LockedDishes::new().with(SlotCategory::Soup, 1));
    let result = generator.generate_plan(&request).await.unwrap();

    assert!(!result.is_success());
    assert_eq!(result.errors(), &[PlanError::NoDishesInDb]);
    assert_eq!(result.seed(), "empty");
}

#[tokio::test]
async fn empty_in_memory_catalog() {
    let generator = PlanGenerator::new(InMemoryCatalog::new());
    let result = generator
        .generate_plan(&PlanRequest::new(PlanMode::Daily))
        .await
        .unwrap();
    assert_eq!(result.errors()[0].code(), PlanErrorCode::NoDishesInDb);
}

/// Same catalog, filters and seed give byte-identical plans.
#[tokio::test]
async fn same_seed_same_plan() {
    let generator = PlanGenerator::new(sample_catalog());
    let request = PlanRequest::new(PlanMode::Weekly)
        .with_seed("reproducible")
        .with_filters(FilterOptions::new().with_excluded_allergens(["nuts"]));

    let first = generator.generate_plan(&request).await.unwrap();
    let second = generator.generate_plan(&request).await.unwrap();

    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
    assert_eq!(first, second);
}

#[tokio::test]
async fn different_seeds_usually_differ() {
    let generator = PlanGenerator::new(soups(20));
    let request = PlanRequest::new(PlanMode::Weekly).with_profile(only(&[SlotCategory::Soup]));

    let mut distinct = BTreeSet::new();
    for seed in ["a", "b", "c", "d"] {
        let result = generator
            .generate_plan(&request.clone().with_seed(seed))
            .await
            .unwrap();
        let ids: Vec<DishId> = result
            .plan()
            .unwrap()
            .days
            .iter()
            .flat_map(GeneratedDay::dish_ids)
            .collect();
        distinct.insert(ids);
    }
    assert!(distinct.len() > 1);
}

/// One soup, one muffin, weekly, no repeats, soup only: day 0 takes the
/// soup and every later day has to repeat it with a warning.
#[tokio::test]
async fn single_soup_week_relaxes_with_warnings() {
    let generator = PlanGenerator::new(soup_and_muffin_catalog());
    let request = PlanRequest::new(PlanMode::Weekly)
        .with_seed("soup-week")
        .with_no_repeat_across_week(true)
        .with_profile(only(&[SlotCategory::Soup]));

    let result = generator.generate_plan(&request).await.unwrap();
    let plan = result.plan().expect("relaxation keeps the week alive");

    assert!(plan.is_complete());
    for day in &plan.days {
        assert_eq!(day.dish(SlotCategory::Soup).unwrap().id, DishId(1));
        assert!(day.dish(SlotCategory::Muffin).is_none());
    }

    let warnings = result.warnings();
    assert_eq!(warnings.len(), 6);
    assert!(warnings.iter().all(|w| w.kind == WarningKind::RepeatAcrossWeek));
    assert_eq!(warnings[0].day, Some(1));
    assert!(warnings[0].message.contains("repeat"));
    assert!(warnings[0].message.contains("for soup"));
}

#[tokio::test]
async fn repeats_allowed_means_no_warnings() {
    let generator = PlanGenerator::new(soup_and_muffin_catalog());
    let request = PlanRequest::new(PlanMode::Weekly)
        .with_no_repeat_across_week(false)
        .with_profile(only(&[SlotCategory::Soup]));

    let result = generator.generate_plan(&request).await.unwrap();
    assert!(result.plan().unwrap().is_complete());
    assert!(result.warnings().is_empty());
}

/// A lock pointing at a main_beef dish cannot fill the soup slot.
#[tokio::test]
async fn lock_in_wrong_category_fails_the_day() {
    let catalog = catalog_with([
        Dish::new(1, "borscht", SlotCategory::Soup),
        Dish::new(10, "short ribs", SlotCategory::MainBeef),
    ]);
    let generator = PlanGenerator::new(catalog);
    let request = PlanRequest::new(PlanMode::Daily)
        .with_profile(only(&[SlotCategory::Soup]))
        .with_locks(LockedDishes::new().with(SlotCategory::Soup, 10));

    let result = generator.generate_plan(&request).await.unwrap();

    let PlanGenerationResult::Failure { errors, .. } = &result else {
        panic!("expected failure, got {result:?}");
    };
    assert_eq!(errors.len(), 1);
    let PlanError::LockConflict { category, dish_id, reason, .. } = &errors[0] else {
        panic!("expected lock conflict");
    };
    assert_eq!(*category, SlotCategory::Soup);
    assert_eq!(*dish_id, DishId(10));
    assert!(matches!(reason, LockRejection::CategoryMismatch { .. }));
    assert!(reason.to_string().contains("category mismatch"));
}

#[tokio::test]
async fn lock_over_time_limit_cites_total_time() {
    let catalog = catalog_with([
        Dish::new(1, "stew", SlotCategory::MainBeef).with_times(Some(20), Some(20)),
        Dish::new(2, "steak", SlotCategory::MainBeef).with_times(Some(5), Some(10)),
    ]);
    let generator = PlanGenerator::new(catalog);
    let request = PlanRequest::new(PlanMode::Daily)
        .with_profile(only(&[SlotCategory::MainBeef]))
        .with_filters(FilterOptions::new().with_max_total_time(30))
        .with_locks(LockedDishes::new().with(SlotCategory::MainBeef, 1));

    let result = generator.generate_plan(&request).await.unwrap();

    assert!(!result.is_success());
    let message = result.errors()[0].to_string();
    assert!(message.contains("total time of 40 min exceeds the maximum of 30 min"));
}

#[tokio::test]
async fn valid_lock_is_honoured() {
    let generator = PlanGenerator::new(soups(5));
    let request = PlanRequest::new(PlanMode::Daily)
        .with_profile(only(&[SlotCategory::Soup]))
        .with_locks(LockedDishes::new().with(SlotCategory::Soup, 4));

    for seed in ["x", "y", "z"] {
        let result = generator
            .generate_plan(&request.clone().with_seed(seed))
            .await
            .unwrap();
        let day = &result.plan().unwrap().days[0];
        assert_eq!(day.dish(SlotCategory::Soup).unwrap().id, DishId(4));
    }
}

/// Weekly locks pin day 0 only; the locked dish then stays out of the rest
/// of the week under the no-repeat rule.
#[tokio::test]
async fn weekly_locks_apply_to_first_day_only() {
    let generator = PlanGenerator::new(soups(8));
    let request = PlanRequest::new(PlanMode::Weekly)
        .with_seed("locked-week")
        .with_profile(only(&[SlotCategory::Soup]))
        .with_locks(LockedDishes::new().with(SlotCategory::Soup, 5));

    let result = generator.generate_plan(&request).await.unwrap();
    let plan = result.plan().unwrap();

    assert!(plan.is_complete());
    assert!(result.warnings().is_empty());
    let ids: Vec<DishId> = plan
        .days
        .iter()
        .map(|d| d.dish(SlotCategory::Soup).unwrap().id)
        .collect();
    assert_eq!(ids[0], DishId(5));
    assert!(!ids[1..].contains(&DishId(5)));

    let unique: BTreeSet<_> = ids.iter().collect();
    assert_eq!(unique.len(), 7);
}

/// A broken lock sinks day 0 only; the other six days still come back as a
/// partial success.
#[tokio::test]
async fn failed_first_day_gives_partial_success() {
    let catalog = catalog_with(
        (1..=10).map(|id| {
            let dish = Dish::new(id, format!("soup {id}"), SlotCategory::Soup);
            if id == 1 {
                dish
            } else {
                dish.with_kosher(KosherStyle::Pareve)
            }
        }),
    );
    let generator = PlanGenerator::new(catalog);
    let request = PlanRequest::new(PlanMode::Weekly)
        .with_seed("partial")
        .with_profile(only(&[SlotCategory::Soup]))
        .with_filters(FilterOptions::new().kosher_only())
        .with_locks(LockedDishes::new().with(SlotCategory::Soup, 1));

    let result = generator.generate_plan(&request).await.unwrap();
    let PlanGenerationResult::Success { plan, warnings } = &result else {
        panic!("expected partial success, got {result:?}");
    };

    assert_eq!(plan.days.len(), 6);
    assert!(!plan.is_complete());
    assert_eq!(plan.days[0].day_index, 1);
    let partial: Vec<_> = warnings
        .iter()
        .filter(|w| w.kind == WarningKind::PartialPlan)
        .collect();
    assert_eq!(partial.len(), 1);
    assert!(partial[0].message.contains("6 of 7"));
}

#[tokio::test]
async fn unfillable_category_fails_every_day() {
    let generator = PlanGenerator::new(soup_and_muffin_catalog());
    let request = PlanRequest::new(PlanMode::Weekly)
        .with_profile(only(&[SlotCategory::Soup, SlotCategory::Dessert]));

    let result = generator.generate_plan(&request).await.unwrap();

    assert!(!result.is_success());
    assert_eq!(result.errors().len(), 7);
    let days: Vec<_> = result.errors().iter().filter_map(PlanError::day).collect();
    assert_eq!(days, (0..7).collect::<Vec<_>>());
    assert!(result
        .errors()
        .iter()
        .all(|e| e.category() == Some(SlotCategory::Dessert)));
}

#[tokio::test]
async fn strict_filters_are_explained() {
    let generator = PlanGenerator::new(sample_catalog());
    let request = PlanRequest::new(PlanMode::Daily)
        .with_profile(only(&[SlotCategory::SideVegetable]))
        .with_filters(FilterOptions::new().with_max_total_time(1));

    let result = generator.generate_plan(&request).await.unwrap();

    let PlanError::NoCandidatesForCategory {
        category_total,
        filtered_count,
        limiting_filters,
        ..
    } = &result.errors()[0]
    else {
        panic!("expected no candidates");
    };
    assert_eq!(*category_total, 4);
    assert_eq!(*filtered_count, 0);
    assert_eq!(limiting_filters.len(), 1);
    assert!(result.errors()[0].to_string().contains("0 of 4"));
}

#[tokio::test]
async fn daily_plan_covers_every_default_category() {
    let generator = PlanGenerator::new(sample_catalog());
    let result = generator
        .generate_plan(&PlanRequest::new(PlanMode::Daily).with_seed("all"))
        .await
        .unwrap();

    let plan = result.plan().unwrap();
    assert!(plan.is_complete());
    let day = &plan.days[0];
    let order: Vec<_> = day.dishes.keys().copied().collect();
    assert_eq!(order, SlotCategory::ALL.to_vec());
    for (category, dish) in &day.dishes {
        assert_eq!(dish.slot_category, *category);
    }
}

#[tokio::test]
async fn no_dish_twice_in_one_day() {
    let generator = PlanGenerator::new(sample_catalog());
    let request = PlanRequest::new(PlanMode::Weekly).with_seed("per-day");
    let result = generator.generate_plan(&request).await.unwrap();

    for day in &result.plan().unwrap().days {
        let mut seen = BTreeSet::new();
        for id in day.dish_ids() {
            assert!(seen.insert(id), "dish {id} repeated within a day");
        }
    }
}

#[tokio::test]
async fn catalog_failure_aborts_the_call() {
    let mut catalog = MockCatalog::new();
    catalog.expect_count_all_dishes().returning(|| Ok(3));
    catalog
        .expect_query_candidates()
        .returning(|_, _, _| Err(CatalogError::Unavailable("connection reset".into())));

    let generator = PlanGenerator::new(catalog);
    let err = generator
        .generate_plan(&PlanRequest::new(PlanMode::Daily))
        .await
        .unwrap_err();

    assert!(matches!(err, PlannerError::Catalog(CatalogError::Unavailable(_))));
    assert!(err.is_retryable());
}

struct SlowCatalog(InMemoryCatalog);

#[async_trait]
impl DishCatalog for SlowCatalog {
    async fn count_all_dishes(&self) -> Result<usize, CatalogError> {
        tokio::time::sleep(Duration::from_secs(10)).await;
        self.0.count_all_dishes().await
    }

    async fn query_candidates(
        &self,
        category: SlotCategory,
        filters: &FilterOptions,
        exclude_ids: &BTreeSet<DishId>,
    ) -> Result<Vec<Dish>, CatalogError> {
        self.0.query_candidates(category, filters, exclude_ids).await
    }

    async fn get_dish_by_id(&self, id: DishId) -> Result<Option<Dish>, CatalogError> {
        self.0.get_dish_by_id(id).await
    }
}

#[tokio::test(start_paused = true)]
async fn timeout_wraps_whole_call() {
    let config = PlannerConfig::new().with_timeout(Duration::from_millis(50));
    let generator = PlanGenerator::with_config(SlowCatalog(soups(3)), config);

    let err = generator
        .generate_plan(&PlanRequest::new(PlanMode::Daily))
        .await
        .unwrap_err();
    assert!(matches!(err, PlannerError::Timeout { duration_ms: 50 }));
}

#[tokio::test]
async fn shared_catalog_behind_arc() {
    let catalog = std::sync::Arc::new(soups(3));
    let generator = PlanGenerator::new(std::sync::Arc::clone(&catalog));
    let result = generator
        .generate_plan(&PlanRequest::new(PlanMode::Daily).with_profile(only(&[SlotCategory::Soup])))
        .await
        .unwrap();
    assert!(result.is_success());
    assert_eq!(catalog.len(), 3);
}
