// ABOUTME: Integration tests for optimistic local state and recipe like/save toggles
// ABOUTME: Commit failures roll back by applying the inverse delta to the current state
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use common::{at, init_test_logging, porridge_draft};
use fitpro::errors::AppError;
use fitpro::optimistic::{Optimistic, SocialDelta};
use fitpro::services::RecipeService;
use fitpro::stores::Stores;
use fitpro_core::errors::ErrorCode;
use fitpro_core::models::RecipeSocialState;

fn state(liked: bool, saved: bool, like_count: u32) -> RecipeSocialState {
    RecipeSocialState {
        liked,
        saved,
        like_count,
    }
}

#[tokio::test]
async fn test_successful_commit_keeps_optimistic_value() {
    let local = Optimistic::new(state(false, false, 2));
    let mut feed = local.subscribe();

    let value = local
        .update(SocialDelta::Like, || async { Ok::<_, AppError>(7) })
        .await
        .unwrap();
    assert_eq!(value, 7);
    assert_eq!(local.current(), state(true, false, 3));
    assert_eq!(feed.changed().await.unwrap(), state(true, false, 3));
}

#[tokio::test]
async fn test_failed_commit_rolls_back() {
    init_test_logging();
    let local = Optimistic::new(state(false, true, 2));

    let err = local
        .update(SocialDelta::Like, || async {
            assert_eq!(local.current(), state(true, true, 3));
            Err::<(), _>(AppError::storage("offline"))
        })
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::StorageError);
    assert_eq!(local.current(), state(false, true, 2));
}

#[tokio::test]
async fn test_rollback_applies_to_state_changed_in_flight() {
    let local = Optimistic::new(state(false, false, 5));

    let result = local
        .update(SocialDelta::Save, || async {
            // A confirmed value arrives while the write is pending
            local.set(state(true, true, 9));
            Err::<(), _>(AppError::storage("offline"))
        })
        .await;
    assert!(result.is_err());
    assert_eq!(local.current(), state(true, false, 9));
}

#[tokio::test]
async fn test_toggle_like_confirms_store_state() {
    init_test_logging();
    let stores = Stores::in_memory();
    let recipes = RecipeService::new(&stores);
    let recipe = recipes
        .create("author", porridge_draft(true), None, at(9, 0))
        .await
        .unwrap();

    let local = Optimistic::new(recipes.social_state("u2", &recipe.id).await.unwrap());
    let liked = recipes.toggle_like("u2", &recipe.id, &local).await.unwrap();
    assert_eq!(liked, state(true, false, 1));
    assert_eq!(local.current(), liked);

    let saved = recipes.toggle_save("u2", &recipe.id, &local).await.unwrap();
    assert_eq!(saved, state(true, true, 1));

    let unliked = recipes.toggle_like("u2", &recipe.id, &local).await.unwrap();
    assert_eq!(unliked, state(false, true, 0));
    assert_eq!(recipes.saved_recipes("u2").await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_toggle_on_missing_recipe_rolls_back() {
    let stores = Stores::in_memory();
    let recipes = RecipeService::new(&stores);
    let local = Optimistic::new(state(false, false, 4));

    let err = recipes
        .toggle_like("u2", "missing", &local)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ResourceNotFound);
    assert_eq!(local.current(), state(false, false, 4));
}

#[tokio::test]
async fn test_toggle_on_hidden_private_recipe_rolls_back() {
    let stores = Stores::in_memory();
    let recipes = RecipeService::new(&stores);
    let recipe = recipes
        .create("author", porridge_draft(false), None, at(9, 0))
        .await
        .unwrap();
    let local = Optimistic::new(RecipeSocialState::default());

    let err = recipes
        .toggle_save("u2", &recipe.id, &local)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ResourceNotFound);
    assert_eq!(local.current(), RecipeSocialState::default());
}
