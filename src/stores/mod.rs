// ABOUTME: Collaborator store traits for profiles, the food diary, recipes, recent foods, and images
// ABOUTME: Stores bundle with in-memory and SQLite backends selected from configuration
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Collaborator stores
//!
//! Persistence is an external concern. The traits here are the contract the services
//! rely on: partial profile merges, an append-only per-day food log with delete,
//! author-scoped recipes with like/save membership records, recent foods, and binary
//! image storage. Every store that feeds a live view publishes to a
//! [`feed::ChangeFeed`] after it writes.

/// Keyed change feeds and subscriptions
pub mod feed;
/// `DashMap`-backed stores for tests and offline use
pub mod memory;
/// `SQLite` stores via `sqlx`
pub mod sqlite;

pub use feed::{ChangeFeed, Subscription};
pub use memory::{
    MemoryFoodLogStore, MemoryImageStorage, MemoryProfileStore, MemoryRecentFoodStore,
    MemoryRecipeStore,
};
pub use sqlite::SqliteStore;

use crate::config::DatabaseUrl;
use crate::errors::AppResult;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use fitpro_core::models::{
    FoodCandidate, FoodEntry, NewFoodEntry, ProfileUpdate, Recipe, RecentFood, RecipeSocialState,
    RelationKind, UserProfile,
};
use std::sync::Arc;
use tracing::info;

/// Per-user profile documents with partial merge-updates
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Load a profile
    async fn get_profile(&self, user_id: &str) -> AppResult<Option<UserProfile>>;

    /// Merge the present fields of `update`, creating the profile if needed
    async fn merge_profile(
        &self,
        user_id: &str,
        update: ProfileUpdate,
        now: DateTime<Utc>,
    ) -> AppResult<UserProfile>;

    /// Subscribe to a profile document
    async fn subscribe_profile(&self, user_id: &str)
        -> AppResult<Subscription<Option<UserProfile>>>;
}

/// Append-only food diary partitioned by user and calendar day
#[async_trait]
pub trait FoodLogStore: Send + Sync {
    /// Append an entry and return it with its assigned id
    async fn add_entry(
        &self,
        user_id: &str,
        day: NaiveDate,
        entry: NewFoodEntry,
    ) -> AppResult<FoodEntry>;

    /// Delete one entry
    ///
    /// Fails with `ResourceNotFound` if the entry is not in that day.
    async fn delete_entry(&self, user_id: &str, day: NaiveDate, entry_id: &str) -> AppResult<()>;

    /// Entries of one day in `logged_at` order
    async fn list_entries(&self, user_id: &str, day: NaiveDate) -> AppResult<Vec<FoodEntry>>;

    /// Subscribe to one day's entries
    async fn subscribe_day(
        &self,
        user_id: &str,
        day: NaiveDate,
    ) -> AppResult<Subscription<Vec<FoodEntry>>>;
}

/// Recipe documents plus like/save membership records
#[async_trait]
pub trait RecipeStore: Send + Sync {
    /// Insert a new recipe
    async fn insert_recipe(&self, recipe: &Recipe) -> AppResult<()>;

    /// Replace an existing recipe; `like_count` is left as stored
    async fn replace_recipe(&self, recipe: &Recipe) -> AppResult<()>;

    /// Load a recipe
    async fn get_recipe(&self, recipe_id: &str) -> AppResult<Option<Recipe>>;

    /// Delete a recipe and every relation pointing at it
    async fn delete_recipe(&self, recipe_id: &str) -> AppResult<()>;

    /// Recipes by one author, newest first
    async fn recipes_by_author(&self, author_id: &str) -> AppResult<Vec<Recipe>>;

    /// Public recipes, newest first
    async fn public_recipes(&self) -> AppResult<Vec<Recipe>>;

    /// Create or remove a membership record
    ///
    /// Idempotent. For likes, `like_count` changes only when membership changes and
    /// never drops below zero.
    async fn set_relation(
        &self,
        kind: RelationKind,
        user_id: &str,
        recipe_id: &str,
        present: bool,
        now: DateTime<Utc>,
    ) -> AppResult<RecipeSocialState>;

    /// Viewer flags and like count for one recipe
    async fn social_state(&self, user_id: &str, recipe_id: &str) -> AppResult<RecipeSocialState>;

    /// Recipes a user saved, most recently saved first
    async fn saved_recipes(&self, user_id: &str) -> AppResult<Vec<Recipe>>;
}

/// Recently logged foods, upserted per log
#[async_trait]
pub trait RecentFoodStore: Send + Sync {
    /// Upsert a recent food, incrementing its use count
    async fn record_use(
        &self,
        user_id: &str,
        id: &str,
        food: &FoodCandidate,
        amount: f64,
        at: DateTime<Utc>,
    ) -> AppResult<RecentFood>;

    /// Most recently used first
    async fn recent_foods(&self, user_id: &str, limit: usize) -> AppResult<Vec<RecentFood>>;
}

/// Binary object storage keyed by path
#[async_trait]
pub trait ImageStorage: Send + Sync {
    /// Store bytes at `path` and return a download URL
    async fn upload(&self, path: &str, bytes: Vec<u8>, content_type: &str) -> AppResult<String>;

    /// Fresh download URL for an existing object
    async fn resolve_url(&self, path: &str) -> AppResult<String>;

    /// Remove an object; removing a missing object is not an error
    async fn delete(&self, path: &str) -> AppResult<()>;
}

/// All collaborator stores the services need
#[derive(Clone)]
pub struct Stores {
    /// Profile documents
    pub profiles: Arc<dyn ProfileStore>,
    /// Food diary
    pub food_log: Arc<dyn FoodLogStore>,
    /// Recipes and relations
    pub recipes: Arc<dyn RecipeStore>,
    /// Recent foods
    pub recent_foods: Arc<dyn RecentFoodStore>,
    /// Image objects
    pub images: Arc<dyn ImageStorage>,
}

impl Stores {
    /// Fresh in-memory stores
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            profiles: Arc::new(MemoryProfileStore::new()),
            food_log: Arc::new(MemoryFoodLogStore::new()),
            recipes: Arc::new(MemoryRecipeStore::new()),
            recent_foods: Arc::new(MemoryRecentFoodStore::new()),
            images: Arc::new(MemoryImageStorage::new()),
        }
    }

    /// `SQLite`-backed stores; images stay in memory
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or migrated
    pub async fn sqlite(url: &DatabaseUrl) -> AppResult<Self> {
        let store = Arc::new(SqliteStore::connect(url).await?);
        Ok(Self {
            profiles: store.clone(),
            food_log: store.clone(),
            recipes: store.clone(),
            recent_foods: store,
            images: Arc::new(MemoryImageStorage::new()),
        })
    }

    /// Stores for an optional database location
    ///
    /// # Errors
    ///
    /// Returns an error if a configured database cannot be opened
    pub async fn from_config(database: Option<&DatabaseUrl>) -> AppResult<Self> {
        match database {
            Some(url) => {
                info!(database = %url, "Opening SQLite stores");
                Self::sqlite(url).await
            }
            None => {
                info!("Using in-memory stores");
                Ok(Self::in_memory())
            }
        }
    }
}
