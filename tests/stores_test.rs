// ABOUTME: Integration tests for the store traits over in-memory and SQLite backends
// ABOUTME: The same behavior suite runs against memory, sqlite::memory:, and a file database
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use chrono::{Duration, NaiveDate};
use common::{at, candidate, init_test_logging, porridge_draft};
use fitpro::config::DatabaseUrl;
use fitpro::services::RecipeService;
use fitpro::stores::{ImageStorage, MemoryImageStorage, SqliteStore, Stores};
use fitpro_core::errors::ErrorCode;
use fitpro_core::models::{Goal, MealType, ProfileUpdate, RelationKind};
use fitpro_intelligence::portion::entry_from_candidate;
use std::sync::Arc;
use tempfile::TempDir;

fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 14).unwrap()
}

async fn profile_suite(stores: &Stores) {
    assert!(stores.profiles.get_profile("u1").await.unwrap().is_none());
    let mut feed = stores.profiles.subscribe_profile("u1").await.unwrap();
    assert!(feed.current().is_none());

    stores
        .profiles
        .merge_profile(
            "u1",
            ProfileUpdate {
                weight_kg: Some(80.0),
                goal: Some(Goal::WeightLoss),
                target_weight_kg: Some(75.0),
                ..ProfileUpdate::default()
            },
            at(9, 0),
        )
        .await
        .unwrap();
    let merged = stores
        .profiles
        .merge_profile(
            "u1",
            ProfileUpdate {
                height_cm: Some(180.0),
                ..ProfileUpdate::default()
            },
            at(9, 5),
        )
        .await
        .unwrap();
    assert_eq!(merged.weight_kg, Some(80.0));
    assert_eq!(merged.height_cm, Some(180.0));
    assert_eq!(merged.updated_at, at(9, 5));

    let seen = feed.changed().await.unwrap().unwrap();
    assert_eq!(seen.height_cm, Some(180.0));

    let cleared = stores
        .profiles
        .merge_profile(
            "u1",
            ProfileUpdate {
                goal: Some(Goal::Maintenance),
                clear_target_weight: true,
                ..ProfileUpdate::default()
            },
            at(9, 10),
        )
        .await
        .unwrap();
    assert_eq!(cleared.target_weight_kg, None);
    assert_eq!(cleared.weight_kg, Some(80.0));
    feed.unsubscribe();
}

async fn food_log_suite(stores: &Stores) {
    let oats = candidate("Oats", None, [372.0, 13.5, 58.7, 7.0]);
    let mut watch = stores.food_log.subscribe_day("u1", day()).await.unwrap();
    assert!(watch.current().is_empty());

    let late = stores
        .food_log
        .add_entry("u1", day(), entry_from_candidate(&oats, 50.0, MealType::Snack, at(15, 0)))
        .await
        .unwrap();
    let early = stores
        .food_log
        .add_entry("u1", day(), entry_from_candidate(&oats, 40.0, MealType::Breakfast, at(8, 0)))
        .await
        .unwrap();
    assert_ne!(late.id, early.id);

    let listed = stores.food_log.list_entries("u1", day()).await.unwrap();
    let ids: Vec<&str> = listed.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, [early.id.as_str(), late.id.as_str()]);

    assert!(stores
        .food_log
        .list_entries("u1", day() + Duration::days(1))
        .await
        .unwrap()
        .is_empty());
    assert!(stores.food_log.list_entries("u2", day()).await.unwrap().is_empty());

    stores.food_log.delete_entry("u1", day(), &late.id).await.unwrap();
    let err = stores
        .food_log
        .delete_entry("u1", day(), &late.id)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ResourceNotFound);

    assert!(watch.has_changed());
    let latest = watch.changed().await.unwrap();
    assert_eq!(latest.len(), 1);
    assert_eq!(latest[0].id, early.id);
}

async fn recipe_suite(stores: &Stores) {
    let service = RecipeService::new(stores);
    let recipe = service
        .create("u1", porridge_draft(true), None, at(9, 0))
        .await
        .unwrap();
    let loaded = stores.recipes.get_recipe(&recipe.id).await.unwrap().unwrap();
    assert_eq!(loaded, recipe);

    let liked = stores
        .recipes
        .set_relation(RelationKind::Like, "u2", &recipe.id, true, at(9, 1))
        .await
        .unwrap();
    assert_eq!(liked.like_count, 1);
    let repeated = stores
        .recipes
        .set_relation(RelationKind::Like, "u2", &recipe.id, true, at(9, 2))
        .await
        .unwrap();
    assert_eq!(repeated.like_count, 1);
    let unliked_twice = {
        stores
            .recipes
            .set_relation(RelationKind::Like, "u2", &recipe.id, false, at(9, 3))
            .await
            .unwrap();
        stores
            .recipes
            .set_relation(RelationKind::Like, "u2", &recipe.id, false, at(9, 4))
            .await
            .unwrap()
    };
    assert_eq!(unliked_twice.like_count, 0);
    assert!(!unliked_twice.liked);

    stores
        .recipes
        .set_relation(RelationKind::Save, "u2", &recipe.id, true, at(9, 5))
        .await
        .unwrap();
    assert_eq!(stores.recipes.saved_recipes("u2").await.unwrap().len(), 1);

    stores.recipes.delete_recipe(&recipe.id).await.unwrap();
    assert!(stores.recipes.get_recipe(&recipe.id).await.unwrap().is_none());
    assert!(stores.recipes.saved_recipes("u2").await.unwrap().is_empty());
    let err = stores
        .recipes
        .set_relation(RelationKind::Like, "u2", &recipe.id, true, at(9, 6))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ResourceNotFound);
}

async fn recent_food_suite(stores: &Stores) {
    let oats = candidate("Oats", Some("4000000000017"), [372.0, 13.5, 58.7, 7.0]);
    let apple = candidate("Apple", None, [52.0, 0.3, 13.8, 0.2]);

    stores
        .recent_foods
        .record_use("u1", "4000000000017", &oats, 40.0, at(8, 0))
        .await
        .unwrap();
    stores
        .recent_foods
        .record_use("u1", "apple", &apple, 150.0, at(10, 0))
        .await
        .unwrap();
    let again = stores
        .recent_foods
        .record_use("u1", "4000000000017", &oats, 60.0, at(12, 0))
        .await
        .unwrap();
    assert_eq!(again.use_count, 2);
    assert!((again.last_amount - 60.0).abs() < f64::EPSILON);

    let recent = stores.recent_foods.recent_foods("u1", 20).await.unwrap();
    let ids: Vec<&str> = recent.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, ["4000000000017", "apple"]);
    assert_eq!(stores.recent_foods.recent_foods("u1", 1).await.unwrap().len(), 1);
    assert!(stores.recent_foods.recent_foods("u2", 20).await.unwrap().is_empty());
}

async fn run_suite(stores: Stores) {
    profile_suite(&stores).await;
    food_log_suite(&stores).await;
    recipe_suite(&stores).await;
    recent_food_suite(&stores).await;
}

#[tokio::test]
async fn test_memory_stores() {
    init_test_logging();
    run_suite(Stores::in_memory()).await;
}

#[tokio::test]
async fn test_sqlite_memory_stores() {
    init_test_logging();
    run_suite(Stores::sqlite(&DatabaseUrl::Memory).await.unwrap()).await;
}

#[tokio::test]
async fn test_sqlite_file_stores_persist() {
    init_test_logging();
    let dir = TempDir::new().unwrap();
    let url = DatabaseUrl::SQLite {
        path: dir.path().join("fitpro.db"),
    };

    let stores = Stores::from_config(Some(&url)).await.unwrap();
    run_suite(stores).await;

    // A second connection sees what the first one wrote
    let reopened = SqliteStore::connect(&url).await.unwrap();
    let stores = Stores {
        profiles: Arc::new(reopened),
        ..Stores::in_memory()
    };
    let profile = stores.profiles.get_profile("u1").await.unwrap().unwrap();
    assert_eq!(profile.goal, Some(Goal::Maintenance));
}

/// Writers racing on one diary day, with a subscriber that either exists before the
/// writes or subscribes while they run
async fn concurrent_day_writes(stores: &Stores, rounds: u32) {
    const WRITERS: u32 = 16;
    for round in 0..rounds {
        let day = day() + Duration::days(i64::from(round));
        let early = if round % 2 == 0 {
            Some(stores.food_log.subscribe_day("racer", day).await.unwrap())
        } else {
            None
        };

        let writers: Vec<_> = (0..WRITERS)
            .map(|minute| {
                let food_log = stores.food_log.clone();
                tokio::spawn(async move {
                    let apple = candidate("Apple", None, [52.0, 0.3, 13.8, 0.2]);
                    food_log
                        .add_entry(
                            "racer",
                            day,
                            entry_from_candidate(&apple, 100.0, MealType::Snack, at(8, minute)),
                        )
                        .await
                        .unwrap();
                })
            })
            .collect();
        let during = stores.food_log.subscribe_day("racer", day).await.unwrap();
        for writer in writers {
            writer.await.unwrap();
        }

        let stored = stores.food_log.list_entries("racer", day).await.unwrap();
        assert_eq!(stored.len(), 16);
        assert_eq!(during.current(), stored, "round {round}");
        if let Some(early) = early {
            assert_eq!(early.current(), stored, "round {round}");
        }
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_memory_day_feed_ends_on_stored_entries() {
    concurrent_day_writes(&Stores::in_memory(), 200).await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_sqlite_day_feed_ends_on_stored_entries() {
    let dir = TempDir::new().unwrap();
    let url = DatabaseUrl::SQLite {
        path: dir.path().join("feed.db"),
    };
    let stores = Stores::from_config(Some(&url)).await.unwrap();
    concurrent_day_writes(&stores, 20).await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_profile_feed_ends_on_stored_profile() {
    let stores = Stores::in_memory();
    let writers: Vec<_> = (1..=16_u32)
        .map(|n| {
            let profiles = stores.profiles.clone();
            tokio::spawn(async move {
                profiles
                    .merge_profile(
                        "racer",
                        ProfileUpdate {
                            weight_kg: Some(f64::from(60 + n)),
                            ..ProfileUpdate::default()
                        },
                        at(9, n),
                    )
                    .await
                    .unwrap();
            })
        })
        .collect();
    let feed = stores.profiles.subscribe_profile("racer").await.unwrap();
    for writer in writers {
        writer.await.unwrap();
    }

    let stored = stores.profiles.get_profile("racer").await.unwrap();
    assert_eq!(feed.current(), stored);
}

#[tokio::test]
async fn test_image_storage_round_trip() {
    let storage = MemoryImageStorage::with_base_url("https://images.test");
    let url = storage
        .upload("users/u1/recipes/r1.jpg", vec![1, 2, 3], "image/jpeg")
        .await
        .unwrap();
    assert!(url.starts_with("https://images.test/o/users%2Fu1%2Frecipes%2Fr1.jpg?alt=media&token="));
    assert_eq!(
        storage.object("users/u1/recipes/r1.jpg"),
        Some((vec![1, 2, 3], "image/jpeg".to_owned()))
    );

    storage.delete("users/u1/recipes/r1.jpg").await.unwrap();
    assert!(storage.is_empty());
    let err = storage.resolve_url("users/u1/recipes/r1.jpg").await.unwrap_err();
    assert_eq!(err.code, ErrorCode::ResourceNotFound);
    assert!(storage.upload(" ", Vec::new(), "image/jpeg").await.is_err());
}
