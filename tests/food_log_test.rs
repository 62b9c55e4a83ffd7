// ABOUTME: Integration tests for the food diary service and the per-user session
// ABOUTME: Logging, batches, manual entries, recent foods, live summaries, and target resolution
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use chrono::NaiveDate;
use common::{at, candidate, init_test_logging, oats};
use fitpro::services::FoodLogService;
use fitpro::session::Session;
use fitpro::stores::Stores;
use fitpro_core::errors::ErrorCode;
use fitpro_core::models::{DerivedMetrics, MealType, ProfileUpdate};
use fitpro_intelligence::config::FallbackTargetsConfig;
use fitpro_intelligence::portion::{ManualFood, PendingItem};
use fitpro_intelligence::DailyTargets;

fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 14).unwrap()
}

fn close(actual: f64, expected: f64) -> bool {
    (actual - expected).abs() < 1e-6
}

fn service(stores: &Stores) -> FoodLogService {
    FoodLogService::new(stores, FallbackTargetsConfig::default())
}

fn targets() -> DailyTargets {
    DailyTargets::fallback(&FallbackTargetsConfig::default())
}

#[tokio::test]
async fn test_log_food_scales_and_records_recent() {
    init_test_logging();
    let stores = Stores::in_memory();
    let food_log = service(&stores);

    let entry = food_log
        .log_food("u1", day(), &oats(), " 40 ", MealType::Breakfast, at(8, 0))
        .await
        .unwrap();
    assert_eq!(entry.name, "Rolled oats");
    assert!(close(entry.amount, 40.0));
    assert!(close(entry.calories, 149.0));
    assert!(close(entry.protein_g, 5.4));
    assert_eq!(entry.barcode.as_deref(), Some("4000000000017"));

    let recent = food_log.recent_foods().list("u1", None).await.unwrap();
    assert_eq!(recent.len(), 1);
    assert_eq!(recent[0].id, "4000000000017");
    assert!(close(recent[0].last_amount, 40.0));
}

#[tokio::test]
async fn test_malformed_amount_defaults_to_100g() {
    let stores = Stores::in_memory();
    let entry = service(&stores)
        .log_food("u1", day(), &oats(), "lots", MealType::Snack, at(15, 0))
        .await
        .unwrap();
    assert!(close(entry.amount, 100.0));
    assert!(close(entry.calories, 372.0));
}

#[tokio::test]
async fn test_batch_shares_meal_and_timestamp() {
    let stores = Stores::in_memory();
    let food_log = service(&stores);
    let apple = candidate("Apple", None, [52.0, 0.3, 13.8, 0.2]);
    let items = vec![
        PendingItem::from_input(oats(), "40"),
        PendingItem::from_input(apple, "150"),
    ];

    let logged = food_log
        .log_batch("u1", day(), &items, MealType::Breakfast, at(8, 30))
        .await
        .unwrap();
    assert_eq!(logged.len(), 2);
    assert!(logged
        .iter()
        .all(|e| e.meal_type == MealType::Breakfast && e.logged_at == at(8, 30)));
    assert!(close(logged[1].calories, 78.0));

    let recent = food_log.recent_foods().list("u1", None).await.unwrap();
    assert_eq!(recent.len(), 2);

    let err = food_log
        .log_batch("u1", day(), &[], MealType::Lunch, at(12, 0))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidInput);
}

#[tokio::test]
async fn test_manual_entry_is_validated_and_not_recent() {
    let stores = Stores::in_memory();
    let food_log = service(&stores);
    let manual = ManualFood {
        name: " Homemade soup ".to_owned(),
        brand: None,
        amount: 1.0,
        unit: "bowl".to_owned(),
        calories: 240.4,
        protein_g: 12.26,
        carbs_g: 30.0,
        fat_g: 6.0,
    };

    let entry = food_log
        .log_manual("u1", day(), manual.clone(), MealType::Dinner, at(19, 0))
        .await
        .unwrap();
    assert_eq!(entry.name, "Homemade soup");
    assert_eq!(entry.unit, "bowl");
    assert!(close(entry.calories, 240.0));
    assert!(close(entry.protein_g, 12.3));
    assert!(food_log.recent_foods().list("u1", None).await.unwrap().is_empty());

    let err = food_log
        .log_manual(
            "u1",
            day(),
            ManualFood {
                name: "  ".to_owned(),
                ..manual.clone()
            },
            MealType::Dinner,
            at(19, 0),
        )
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::MissingRequiredField);

    let err = food_log
        .log_manual(
            "u1",
            day(),
            ManualFood {
                fat_g: -1.0,
                ..manual
            },
            MealType::Dinner,
            at(19, 0),
        )
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ValueOutOfRange);
}

#[tokio::test]
async fn test_watch_day_recomputes_summary() {
    init_test_logging();
    let stores = Stores::in_memory();
    let food_log = service(&stores);
    let mut watch = food_log.watch_day("u1", day(), targets()).await.unwrap();
    assert_eq!(watch.current().entry_count(), 0);

    let entry = food_log
        .log_food("u1", day(), &oats(), "40", MealType::Breakfast, at(8, 0))
        .await
        .unwrap();
    let summary = watch.changed().await.unwrap();
    assert_eq!(summary.entry_count(), 1);
    assert!(close(summary.consumed.calories, 149.0));
    assert!(close(summary.remaining.calories, 1851.0));

    food_log.delete_entry("u1", day(), &entry.id).await.unwrap();
    let summary = watch.changed().await.unwrap();
    assert_eq!(summary.entry_count(), 0);

    watch.set_targets(DailyTargets {
        calories: 1000.0,
        ..targets()
    });
    assert!(close(watch.current().remaining.calories, 1000.0));
    watch.unsubscribe();

    let summary = food_log.daily_summary("u1", day(), targets()).await.unwrap();
    assert_eq!(summary.entry_count(), 0);
}

#[tokio::test]
async fn test_session_targets_follow_profile() {
    init_test_logging();
    let stores = Stores::in_memory();
    let mut session = Session::start("u1", stores.clone(), FallbackTargetsConfig::default())
        .await
        .unwrap();
    assert_eq!(session.user_id(), "u1");
    assert!(session.profile().is_none());
    assert!(!session.is_onboarded());
    assert!(close(session.daily_targets().calories, 2000.0));
    assert!(close(session.daily_targets().fat_g, 65.0));

    stores
        .profiles
        .merge_profile(
            "u1",
            ProfileUpdate {
                completion: Some(DerivedMetrics {
                    basal_metabolic_rate: 1760.0,
                    total_daily_energy_expenditure: 2728.0,
                    daily_calorie_target: 2228.0,
                    daily_protein_target_g: 195.0,
                    daily_carbs_target_g: 195.0,
                    daily_fat_target_g: 0.0,
                }),
                ..ProfileUpdate::default()
            },
            at(10, 0),
        )
        .await
        .unwrap();

    let profile = session.profile_changed().await.unwrap().unwrap();
    assert!(profile.is_onboarded());
    assert!(session.is_onboarded());
    let targets = session.daily_targets();
    assert!(close(targets.calories, 2228.0));
    assert!(close(targets.protein_g, 195.0));
    // A zero stored target falls back for that field only
    assert!(close(targets.fat_g, 65.0));
    session.end();
}

#[tokio::test]
async fn test_session_requires_user_id() {
    let err = Session::start(" ", Stores::in_memory(), FallbackTargetsConfig::default())
        .await
        .err()
        .unwrap();
    assert_eq!(err.code, ErrorCode::MissingRequiredField);
}
