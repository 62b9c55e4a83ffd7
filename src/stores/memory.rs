// ABOUTME: In-memory collaborator stores backed by DashMap for tests and offline use
// ABOUTME: Publishes profile and diary-day changes to change feeds after each write
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::feed::{ChangeFeed, Subscription};
use super::{FoodLogStore, ImageStorage, ProfileStore, RecentFoodStore, RecipeStore};
use crate::errors::{AppError, AppResult, StorageError};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use dashmap::DashMap;
use fitpro_core::models::{
    FoodCandidate, FoodEntry, NewFoodEntry, ProfileUpdate, Recipe, RecentFood, RecipeSocialState,
    RelationKind, UserProfile,
};
use std::cmp::Reverse;
use tracing::debug;
use uuid::Uuid;

/// Host used in download URLs handed out by [`MemoryImageStorage`]
pub const MEMORY_STORAGE_BASE_URL: &str = "https://storage.local";

/// Build a tokenized download URL for an object path
#[must_use]
pub fn download_url(base_url: &str, path: &str, token: &str) -> String {
    format!(
        "{}/o/{}?alt=media&token={token}",
        base_url.trim_end_matches('/'),
        urlencoding::encode(path)
    )
}

/// Profile documents keyed by user id
#[derive(Debug, Default)]
pub struct MemoryProfileStore {
    profiles: DashMap<String, UserProfile>,
    feed: ChangeFeed<String, Option<UserProfile>>,
}

impl MemoryProfileStore {
    /// Empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProfileStore for MemoryProfileStore {
    async fn get_profile(&self, user_id: &str) -> AppResult<Option<UserProfile>> {
        Ok(self.profiles.get(user_id).map(|p| p.clone()))
    }

    async fn merge_profile(
        &self,
        user_id: &str,
        update: ProfileUpdate,
        now: DateTime<Utc>,
    ) -> AppResult<UserProfile> {
        let key = user_id.to_owned();
        let _ordering = self.feed.lock(&key).await;
        let merged = {
            let mut profile = self
                .profiles
                .entry(user_id.to_owned())
                .or_insert_with(|| UserProfile::new(user_id));
            profile.apply_update(update, now);
            profile.clone()
        };
        self.feed.publish(&key, Some(merged.clone()));
        Ok(merged)
    }

    async fn subscribe_profile(
        &self,
        user_id: &str,
    ) -> AppResult<Subscription<Option<UserProfile>>> {
        let key = user_id.to_owned();
        let _ordering = self.feed.lock(&key).await;
        let current = self.get_profile(user_id).await?;
        Ok(self.feed.subscribe(key, current))
    }
}

type DayKey = (String, NaiveDate);

/// Food diary keyed by user and day
#[derive(Debug, Default)]
pub struct MemoryFoodLogStore {
    days: DashMap<DayKey, Vec<FoodEntry>>,
    feed: ChangeFeed<DayKey, Vec<FoodEntry>>,
}

impl MemoryFoodLogStore {
    /// Empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn snapshot(&self, key: &DayKey) -> Vec<FoodEntry> {
        self.days.get(key).map(|d| d.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl FoodLogStore for MemoryFoodLogStore {
    async fn add_entry(
        &self,
        user_id: &str,
        day: NaiveDate,
        entry: NewFoodEntry,
    ) -> AppResult<FoodEntry> {
        let key = (user_id.to_owned(), day);
        let entry = entry.into_entry(Uuid::new_v4().to_string());
        let _ordering = self.feed.lock(&key).await;
        {
            let mut entries = self.days.entry(key.clone()).or_default();
            entries.push(entry.clone());
            entries.sort_by_key(|e| e.logged_at);
        }
        self.feed.publish(&key, self.snapshot(&key));
        Ok(entry)
    }

    async fn delete_entry(&self, user_id: &str, day: NaiveDate, entry_id: &str) -> AppResult<()> {
        let key = (user_id.to_owned(), day);
        let _ordering = self.feed.lock(&key).await;
        let removed = self.days.get_mut(&key).is_some_and(|mut entries| {
            let before = entries.len();
            entries.retain(|e| e.id != entry_id);
            entries.len() < before
        });
        if !removed {
            return Err(StorageError::not_found("Food entry", entry_id).into());
        }
        self.feed.publish(&key, self.snapshot(&key));
        Ok(())
    }

    async fn list_entries(&self, user_id: &str, day: NaiveDate) -> AppResult<Vec<FoodEntry>> {
        Ok(self.snapshot(&(user_id.to_owned(), day)))
    }

    async fn subscribe_day(
        &self,
        user_id: &str,
        day: NaiveDate,
    ) -> AppResult<Subscription<Vec<FoodEntry>>> {
        let key = (user_id.to_owned(), day);
        let _ordering = self.feed.lock(&key).await;
        let current = self.snapshot(&key);
        Ok(self.feed.subscribe(key, current))
    }
}

type RelationKey = (RelationKind, String, String);

/// Recipes and like/save membership records
#[derive(Debug, Default)]
pub struct MemoryRecipeStore {
    recipes: DashMap<String, Recipe>,
    relations: DashMap<RelationKey, DateTime<Utc>>,
}

impl MemoryRecipeStore {
    /// Empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn has_relation(&self, kind: RelationKind, user_id: &str, recipe_id: &str) -> bool {
        self.relations
            .contains_key(&(kind, user_id.to_owned(), recipe_id.to_owned()))
    }

    fn newest_first(mut recipes: Vec<Recipe>) -> Vec<Recipe> {
        recipes.sort_by_key(|r| Reverse(r.created_at));
        recipes
    }
}

#[async_trait]
impl RecipeStore for MemoryRecipeStore {
    async fn insert_recipe(&self, recipe: &Recipe) -> AppResult<()> {
        self.recipes.insert(recipe.id.clone(), recipe.clone());
        Ok(())
    }

    async fn replace_recipe(&self, recipe: &Recipe) -> AppResult<()> {
        let mut stored = self
            .recipes
            .get_mut(&recipe.id)
            .ok_or_else(|| StorageError::not_found("Recipe", recipe.id.clone()))?;
        let like_count = stored.like_count;
        *stored = Recipe {
            like_count,
            ..recipe.clone()
        };
        Ok(())
    }

    async fn get_recipe(&self, recipe_id: &str) -> AppResult<Option<Recipe>> {
        Ok(self.recipes.get(recipe_id).map(|r| r.clone()))
    }

    async fn delete_recipe(&self, recipe_id: &str) -> AppResult<()> {
        if self.recipes.remove(recipe_id).is_none() {
            return Err(StorageError::not_found("Recipe", recipe_id).into());
        }
        self.relations.retain(|(_, _, rid), _| rid != recipe_id);
        Ok(())
    }

    async fn recipes_by_author(&self, author_id: &str) -> AppResult<Vec<Recipe>> {
        let recipes = self
            .recipes
            .iter()
            .filter(|r| r.author_id == author_id)
            .map(|r| r.clone())
            .collect();
        Ok(Self::newest_first(recipes))
    }

    async fn public_recipes(&self) -> AppResult<Vec<Recipe>> {
        let recipes = self
            .recipes
            .iter()
            .filter(|r| r.is_public)
            .map(|r| r.clone())
            .collect();
        Ok(Self::newest_first(recipes))
    }

    async fn set_relation(
        &self,
        kind: RelationKind,
        user_id: &str,
        recipe_id: &str,
        present: bool,
        now: DateTime<Utc>,
    ) -> AppResult<RecipeSocialState> {
        let mut recipe = self
            .recipes
            .get_mut(recipe_id)
            .ok_or_else(|| StorageError::not_found("Recipe", recipe_id))?;
        let key = (kind, user_id.to_owned(), recipe_id.to_owned());
        let changed = if present {
            let inserted = !self.relations.contains_key(&key);
            if inserted {
                self.relations.insert(key, now);
            }
            inserted
        } else {
            self.relations.remove(&key).is_some()
        };

        if changed && kind == RelationKind::Like {
            recipe.like_count = if present {
                recipe.like_count.saturating_add(1)
            } else {
                recipe.like_count.saturating_sub(1)
            };
        }
        debug!(%kind, user_id, recipe_id, present, changed, "Relation updated");

        let like_count = recipe.like_count;
        drop(recipe);
        Ok(RecipeSocialState {
            liked: self.has_relation(RelationKind::Like, user_id, recipe_id),
            saved: self.has_relation(RelationKind::Save, user_id, recipe_id),
            like_count,
        })
    }

    async fn social_state(&self, user_id: &str, recipe_id: &str) -> AppResult<RecipeSocialState> {
        let like_count = self
            .recipes
            .get(recipe_id)
            .map(|r| r.like_count)
            .ok_or_else(|| StorageError::not_found("Recipe", recipe_id))?;
        Ok(RecipeSocialState {
            liked: self.has_relation(RelationKind::Like, user_id, recipe_id),
            saved: self.has_relation(RelationKind::Save, user_id, recipe_id),
            like_count,
        })
    }

    async fn saved_recipes(&self, user_id: &str) -> AppResult<Vec<Recipe>> {
        let mut saved: Vec<(DateTime<Utc>, String)> = self
            .relations
            .iter()
            .filter(|r| r.key().0 == RelationKind::Save && r.key().1 == user_id)
            .map(|r| (*r.value(), r.key().2.clone()))
            .collect();
        saved.sort_by_key(|(at, _)| Reverse(*at));
        Ok(saved
            .into_iter()
            .filter_map(|(_, id)| self.recipes.get(&id).map(|r| r.clone()))
            .collect())
    }
}

/// Recent foods keyed by user and food id
#[derive(Debug, Default)]
pub struct MemoryRecentFoodStore {
    foods: DashMap<(String, String), RecentFood>,
}

impl MemoryRecentFoodStore {
    /// Empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RecentFoodStore for MemoryRecentFoodStore {
    async fn record_use(
        &self,
        user_id: &str,
        id: &str,
        food: &FoodCandidate,
        amount: f64,
        at: DateTime<Utc>,
    ) -> AppResult<RecentFood> {
        let mut recent = self
            .foods
            .entry((user_id.to_owned(), id.to_owned()))
            .or_insert_with(|| RecentFood {
                id: id.to_owned(),
                food: food.clone(),
                last_used_at: at,
                last_amount: amount,
                use_count: 0,
            });
        recent.food = food.clone();
        recent.last_used_at = at;
        recent.last_amount = amount;
        recent.use_count = recent.use_count.saturating_add(1);
        Ok(recent.clone())
    }

    async fn recent_foods(&self, user_id: &str, limit: usize) -> AppResult<Vec<RecentFood>> {
        let mut foods: Vec<RecentFood> = self
            .foods
            .iter()
            .filter(|f| f.key().0 == user_id)
            .map(|f| f.value().clone())
            .collect();
        foods.sort_by_key(|f| Reverse(f.last_used_at));
        foods.truncate(limit);
        Ok(foods)
    }
}

#[derive(Debug, Clone)]
struct StoredObject {
    bytes: Vec<u8>,
    content_type: String,
}

/// Object storage kept in memory, handing out tokenized download URLs
#[derive(Debug)]
pub struct MemoryImageStorage {
    base_url: String,
    objects: DashMap<String, StoredObject>,
}

impl Default for MemoryImageStorage {
    fn default() -> Self {
        Self::with_base_url(MEMORY_STORAGE_BASE_URL)
    }
}

impl MemoryImageStorage {
    /// Empty storage on the default host
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty storage issuing URLs under `base_url`
    #[must_use]
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            objects: DashMap::new(),
        }
    }

    /// Stored bytes and content type of an object
    #[must_use]
    pub fn object(&self, path: &str) -> Option<(Vec<u8>, String)> {
        self.objects
            .get(path)
            .map(|o| (o.bytes.clone(), o.content_type.clone()))
    }

    /// Number of stored objects
    #[must_use]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// True when nothing is stored
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

#[async_trait]
impl ImageStorage for MemoryImageStorage {
    async fn upload(&self, path: &str, bytes: Vec<u8>, content_type: &str) -> AppResult<String> {
        if path.trim().is_empty() {
            return Err(AppError::invalid_input("Object path must not be empty"));
        }
        debug!(path, size = bytes.len(), content_type, "Storing object");
        self.objects.insert(
            path.to_owned(),
            StoredObject {
                bytes,
                content_type: content_type.to_owned(),
            },
        );
        self.resolve_url(path).await
    }

    async fn resolve_url(&self, path: &str) -> AppResult<String> {
        if !self.objects.contains_key(path) {
            return Err(StorageError::not_found("Image", path).into());
        }
        Ok(download_url(
            &self.base_url,
            path,
            &Uuid::new_v4().to_string(),
        ))
    }

    async fn delete(&self, path: &str) -> AppResult<()> {
        self.objects.remove(path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_download_url_encodes_path() {
        let url = download_url("https://storage.local/", "users/u1/recipes/r1.jpg", "t");
        assert_eq!(
            url,
            "https://storage.local/o/users%2Fu1%2Frecipes%2Fr1.jpg?alt=media&token=t"
        );
    }

    #[tokio::test]
    async fn test_resolve_missing_object_is_not_found() {
        let storage = MemoryImageStorage::new();
        assert!(storage.resolve_url("missing.jpg").await.is_err());
        storage.delete("missing.jpg").await.unwrap();
    }
}
