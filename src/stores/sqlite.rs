// ABOUTME: SQLite implementation of the profile, food log, recipe, and recent food stores
// ABOUTME: JSON document columns with indexed keys, change feeds published in commit order
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # `SQLite` stores
//!
//! Each record is stored as a JSON document next to the columns it is queried by.
//! The recipe `like_count` column is authoritative; the copy inside the document is
//! overwritten on read so that relation writes never have to rewrite the document.

use super::feed::{ChangeFeed, Subscription};
use super::{FoodLogStore, ProfileStore, RecentFoodStore, RecipeStore};
use crate::config::DatabaseUrl;
use crate::errors::{AppError, AppResult, StorageError};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use fitpro_core::models::{
    day_key, FoodCandidate, FoodEntry, NewFoodEntry, ProfileUpdate, Recipe, RecentFood,
    RecipeSocialState, RelationKind, UserProfile,
};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Error as SqlxError, Row, SqlitePool};
use tracing::{debug, info};
use uuid::Uuid;

/// Connections kept open for a file database
const FILE_POOL_CONNECTIONS: u32 = 5;

/// `SQLite`-backed stores sharing one pool
pub struct SqliteStore {
    pool: SqlitePool,
    profile_feed: ChangeFeed<String, Option<UserProfile>>,
    day_feed: ChangeFeed<(String, NaiveDate), Vec<FoodEntry>>,
}

impl SqliteStore {
    /// Open the database and run migrations
    ///
    /// An in-memory database is pinned to a single connection that never expires,
    /// since every new connection would otherwise see an empty database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or migrated
    pub async fn connect(url: &DatabaseUrl) -> AppResult<Self> {
        let connected = match url {
            DatabaseUrl::Memory => {
                SqlitePoolOptions::new()
                    .max_connections(1)
                    .idle_timeout(None)
                    .max_lifetime(None)
                    .connect("sqlite::memory:")
                    .await
            }
            DatabaseUrl::SQLite { path } => {
                let options = SqliteConnectOptions::new()
                    .filename(path)
                    .create_if_missing(true);
                SqlitePoolOptions::new()
                    .max_connections(FILE_POOL_CONNECTIONS)
                    .connect_with(options)
                    .await
            }
        };
        let pool = connected.map_err(|e| AppError::from(StorageError::from(e)))?;

        let store = Self {
            pool,
            profile_feed: ChangeFeed::new(),
            day_feed: ChangeFeed::new(),
        };
        store.migrate().await?;
        info!(database = %url, "SQLite stores ready");
        Ok(store)
    }

    /// Get a reference to the pool
    #[must_use]
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Create tables and indexes
    ///
    /// # Errors
    ///
    /// Returns an error if a statement fails
    pub async fn migrate(&self) -> AppResult<()> {
        let statements = [
            r"
            CREATE TABLE IF NOT EXISTS profiles (
                user_id TEXT PRIMARY KEY,
                data TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            ",
            r"
            CREATE TABLE IF NOT EXISTS food_entries (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                day TEXT NOT NULL,
                logged_at TEXT NOT NULL,
                data TEXT NOT NULL
            )
            ",
            "CREATE INDEX IF NOT EXISTS idx_food_entries_user_day ON food_entries(user_id, day)",
            r"
            CREATE TABLE IF NOT EXISTS recipes (
                id TEXT PRIMARY KEY,
                author_id TEXT NOT NULL,
                is_public BOOLEAN NOT NULL DEFAULT false,
                like_count INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL,
                data TEXT NOT NULL
            )
            ",
            "CREATE INDEX IF NOT EXISTS idx_recipes_author ON recipes(author_id)",
            r"
            CREATE TABLE IF NOT EXISTS recipe_relations (
                kind TEXT NOT NULL CHECK (kind IN ('like', 'save')),
                user_id TEXT NOT NULL,
                recipe_id TEXT NOT NULL REFERENCES recipes(id) ON DELETE CASCADE,
                created_at TEXT NOT NULL,
                PRIMARY KEY (kind, user_id, recipe_id)
            )
            ",
            r"
            CREATE TABLE IF NOT EXISTS recent_foods (
                user_id TEXT NOT NULL,
                id TEXT NOT NULL,
                data TEXT NOT NULL,
                last_used_at TEXT NOT NULL,
                last_amount REAL NOT NULL,
                use_count INTEGER NOT NULL DEFAULT 0,
                PRIMARY KEY (user_id, id)
            )
            ",
        ];
        for statement in statements {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .map_err(query_error("run migrations"))?;
        }
        Ok(())
    }

    async fn load_day(&self, user_id: &str, day: NaiveDate) -> AppResult<Vec<FoodEntry>> {
        let rows = sqlx::query(
            r"
            SELECT data FROM food_entries
            WHERE user_id = $1 AND day = $2
            ORDER BY logged_at, id
            ",
        )
        .bind(user_id)
        .bind(day_key(day))
        .fetch_all(&self.pool)
        .await
        .map_err(query_error("list food entries"))?;

        rows.iter().map(row_to_food_entry).collect()
    }

    async fn has_relation(
        &self,
        kind: RelationKind,
        user_id: &str,
        recipe_id: &str,
    ) -> AppResult<bool> {
        let row = sqlx::query(
            "SELECT 1 FROM recipe_relations WHERE kind = $1 AND user_id = $2 AND recipe_id = $3",
        )
        .bind(kind.as_str())
        .bind(user_id)
        .bind(recipe_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(query_error("read recipe relation"))?;
        Ok(row.is_some())
    }
}

#[async_trait]
impl ProfileStore for SqliteStore {
    async fn get_profile(&self, user_id: &str) -> AppResult<Option<UserProfile>> {
        let row = sqlx::query("SELECT data FROM profiles WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(query_error("get profile"))?;

        row.map(|r| row_to_profile(&r)).transpose()
    }

    async fn merge_profile(
        &self,
        user_id: &str,
        update: ProfileUpdate,
        now: DateTime<Utc>,
    ) -> AppResult<UserProfile> {
        let key = user_id.to_owned();
        let _ordering = self.profile_feed.lock(&key).await;
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(query_error("begin profile update"))?;

        let row = sqlx::query("SELECT data FROM profiles WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(query_error("get profile"))?;
        let mut profile = match row {
            Some(r) => row_to_profile(&r)?,
            None => UserProfile::new(user_id),
        };
        profile.apply_update(update, now);
        let data = serde_json::to_string(&profile)?;

        sqlx::query(
            r"
            INSERT INTO profiles (user_id, data, updated_at) VALUES ($1, $2, $3)
            ON CONFLICT(user_id) DO UPDATE SET data = excluded.data, updated_at = excluded.updated_at
            ",
        )
        .bind(user_id)
        .bind(&data)
        .bind(timestamp(&now))
        .execute(&mut *tx)
        .await
        .map_err(query_error("save profile"))?;

        tx.commit()
            .await
            .map_err(query_error("commit profile update"))?;

        self.profile_feed.publish(&key, Some(profile.clone()));
        Ok(profile)
    }

    async fn subscribe_profile(
        &self,
        user_id: &str,
    ) -> AppResult<Subscription<Option<UserProfile>>> {
        let key = user_id.to_owned();
        let _ordering = self.profile_feed.lock(&key).await;
        let current = self.get_profile(user_id).await?;
        Ok(self.profile_feed.subscribe(key, current))
    }
}

#[async_trait]
impl FoodLogStore for SqliteStore {
    async fn add_entry(
        &self,
        user_id: &str,
        day: NaiveDate,
        entry: NewFoodEntry,
    ) -> AppResult<FoodEntry> {
        let entry = entry.into_entry(Uuid::new_v4().to_string());
        let data = serde_json::to_string(&entry)?;
        let key = (user_id.to_owned(), day);
        let _ordering = self.day_feed.lock(&key).await;

        sqlx::query(
            r"
            INSERT INTO food_entries (id, user_id, day, logged_at, data)
            VALUES ($1, $2, $3, $4, $5)
            ",
        )
        .bind(&entry.id)
        .bind(user_id)
        .bind(day_key(day))
        .bind(timestamp(&entry.logged_at))
        .bind(&data)
        .execute(&self.pool)
        .await
        .map_err(query_error("add food entry"))?;

        debug!(user_id, day = %day, entry_id = %entry.id, "Food entry added");
        let entries = self.load_day(user_id, day).await?;
        self.day_feed.publish(&key, entries);
        Ok(entry)
    }

    async fn delete_entry(&self, user_id: &str, day: NaiveDate, entry_id: &str) -> AppResult<()> {
        let key = (user_id.to_owned(), day);
        let _ordering = self.day_feed.lock(&key).await;
        let result =
            sqlx::query("DELETE FROM food_entries WHERE id = $1 AND user_id = $2 AND day = $3")
                .bind(entry_id)
                .bind(user_id)
                .bind(day_key(day))
                .execute(&self.pool)
                .await
                .map_err(query_error("delete food entry"))?;

        if result.rows_affected() == 0 {
            return Err(StorageError::not_found("Food entry", entry_id).into());
        }
        let entries = self.load_day(user_id, day).await?;
        self.day_feed.publish(&key, entries);
        Ok(())
    }

    async fn list_entries(&self, user_id: &str, day: NaiveDate) -> AppResult<Vec<FoodEntry>> {
        self.load_day(user_id, day).await
    }

    async fn subscribe_day(
        &self,
        user_id: &str,
        day: NaiveDate,
    ) -> AppResult<Subscription<Vec<FoodEntry>>> {
        let key = (user_id.to_owned(), day);
        let _ordering = self.day_feed.lock(&key).await;
        let current = self.load_day(user_id, day).await?;
        Ok(self.day_feed.subscribe(key, current))
    }
}

#[async_trait]
impl RecipeStore for SqliteStore {
    async fn insert_recipe(&self, recipe: &Recipe) -> AppResult<()> {
        let data = serde_json::to_string(recipe)?;
        sqlx::query(
            r"
            INSERT INTO recipes (id, author_id, is_public, like_count, created_at, data)
            VALUES ($1, $2, $3, $4, $5, $6)
            ",
        )
        .bind(&recipe.id)
        .bind(&recipe.author_id)
        .bind(recipe.is_public)
        .bind(i64::from(recipe.like_count))
        .bind(timestamp(&recipe.created_at))
        .bind(&data)
        .execute(&self.pool)
        .await
        .map_err(query_error("create recipe"))?;
        Ok(())
    }

    async fn replace_recipe(&self, recipe: &Recipe) -> AppResult<()> {
        let data = serde_json::to_string(recipe)?;
        let result = sqlx::query(
            r"
            UPDATE recipes SET author_id = $1, is_public = $2, created_at = $3, data = $4
            WHERE id = $5
            ",
        )
        .bind(&recipe.author_id)
        .bind(recipe.is_public)
        .bind(timestamp(&recipe.created_at))
        .bind(&data)
        .bind(&recipe.id)
        .execute(&self.pool)
        .await
        .map_err(query_error("update recipe"))?;

        if result.rows_affected() == 0 {
            return Err(StorageError::not_found("Recipe", recipe.id.clone()).into());
        }
        Ok(())
    }

    async fn get_recipe(&self, recipe_id: &str) -> AppResult<Option<Recipe>> {
        let row = sqlx::query("SELECT data, like_count FROM recipes WHERE id = $1")
            .bind(recipe_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(query_error("get recipe"))?;

        row.map(|r| row_to_recipe(&r)).transpose()
    }

    async fn delete_recipe(&self, recipe_id: &str) -> AppResult<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(query_error("begin recipe delete"))?;

        sqlx::query("DELETE FROM recipe_relations WHERE recipe_id = $1")
            .bind(recipe_id)
            .execute(&mut *tx)
            .await
            .map_err(query_error("delete recipe relations"))?;

        let result = sqlx::query("DELETE FROM recipes WHERE id = $1")
            .bind(recipe_id)
            .execute(&mut *tx)
            .await
            .map_err(query_error("delete recipe"))?;

        if result.rows_affected() == 0 {
            return Err(StorageError::not_found("Recipe", recipe_id).into());
        }
        tx.commit()
            .await
            .map_err(query_error("commit recipe delete"))?;
        Ok(())
    }

    async fn recipes_by_author(&self, author_id: &str) -> AppResult<Vec<Recipe>> {
        let rows = sqlx::query(
            r"
            SELECT data, like_count FROM recipes
            WHERE author_id = $1
            ORDER BY created_at DESC
            ",
        )
        .bind(author_id)
        .fetch_all(&self.pool)
        .await
        .map_err(query_error("list recipes by author"))?;

        rows.iter().map(row_to_recipe).collect()
    }

    async fn public_recipes(&self) -> AppResult<Vec<Recipe>> {
        let rows = sqlx::query(
            r"
            SELECT data, like_count FROM recipes
            WHERE is_public = true
            ORDER BY created_at DESC
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(query_error("list public recipes"))?;

        rows.iter().map(row_to_recipe).collect()
    }

    async fn set_relation(
        &self,
        kind: RelationKind,
        user_id: &str,
        recipe_id: &str,
        present: bool,
        now: DateTime<Utc>,
    ) -> AppResult<RecipeSocialState> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(query_error("begin relation update"))?;

        let exists = sqlx::query("SELECT 1 FROM recipes WHERE id = $1")
            .bind(recipe_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(query_error("get recipe"))?;
        if exists.is_none() {
            return Err(StorageError::not_found("Recipe", recipe_id).into());
        }

        let written = if present {
            sqlx::query(
                r"
                INSERT OR IGNORE INTO recipe_relations (kind, user_id, recipe_id, created_at)
                VALUES ($1, $2, $3, $4)
                ",
            )
            .bind(kind.as_str())
            .bind(user_id)
            .bind(recipe_id)
            .bind(timestamp(&now))
            .execute(&mut *tx)
            .await
        } else {
            sqlx::query(
                "DELETE FROM recipe_relations WHERE kind = $1 AND user_id = $2 AND recipe_id = $3",
            )
            .bind(kind.as_str())
            .bind(user_id)
            .bind(recipe_id)
            .execute(&mut *tx)
            .await
        };
        let result = written.map_err(query_error("write recipe relation"))?;

        let changed = result.rows_affected() > 0;
        if changed && kind == RelationKind::Like {
            let delta: i64 = if present { 1 } else { -1 };
            sqlx::query("UPDATE recipes SET like_count = MAX(like_count + $1, 0) WHERE id = $2")
                .bind(delta)
                .bind(recipe_id)
                .execute(&mut *tx)
                .await
                .map_err(query_error("update like count"))?;
        }

        tx.commit()
            .await
            .map_err(query_error("commit relation update"))?;
        debug!(%kind, user_id, recipe_id, present, changed, "Relation updated");

        self.social_state(user_id, recipe_id).await
    }

    async fn social_state(&self, user_id: &str, recipe_id: &str) -> AppResult<RecipeSocialState> {
        let row = sqlx::query("SELECT like_count FROM recipes WHERE id = $1")
            .bind(recipe_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(query_error("get like count"))?
            .ok_or_else(|| StorageError::not_found("Recipe", recipe_id))?;
        let like_count: i64 = row.get("like_count");

        Ok(RecipeSocialState {
            liked: self
                .has_relation(RelationKind::Like, user_id, recipe_id)
                .await?,
            saved: self
                .has_relation(RelationKind::Save, user_id, recipe_id)
                .await?,
            like_count: count_from_db(like_count),
        })
    }

    async fn saved_recipes(&self, user_id: &str) -> AppResult<Vec<Recipe>> {
        let rows = sqlx::query(
            r"
            SELECT r.data, r.like_count FROM recipe_relations rel
            JOIN recipes r ON r.id = rel.recipe_id
            WHERE rel.kind = 'save' AND rel.user_id = $1
            ORDER BY rel.created_at DESC
            ",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(query_error("list saved recipes"))?;

        rows.iter().map(row_to_recipe).collect()
    }
}

#[async_trait]
impl RecentFoodStore for SqliteStore {
    async fn record_use(
        &self,
        user_id: &str,
        id: &str,
        food: &FoodCandidate,
        amount: f64,
        at: DateTime<Utc>,
    ) -> AppResult<RecentFood> {
        let data = serde_json::to_string(food)?;
        let row = sqlx::query(
            r"
            INSERT INTO recent_foods (user_id, id, data, last_used_at, last_amount, use_count)
            VALUES ($1, $2, $3, $4, $5, 1)
            ON CONFLICT(user_id, id) DO UPDATE SET
                data = excluded.data,
                last_used_at = excluded.last_used_at,
                last_amount = excluded.last_amount,
                use_count = recent_foods.use_count + 1
            RETURNING use_count
            ",
        )
        .bind(user_id)
        .bind(id)
        .bind(&data)
        .bind(timestamp(&at))
        .bind(amount)
        .fetch_one(&self.pool)
        .await
        .map_err(query_error("record recent food"))?;
        let use_count: i64 = row.get("use_count");

        Ok(RecentFood {
            id: id.to_owned(),
            food: food.clone(),
            last_used_at: at,
            last_amount: amount,
            use_count: count_from_db(use_count),
        })
    }

    async fn recent_foods(&self, user_id: &str, limit: usize) -> AppResult<Vec<RecentFood>> {
        let rows = sqlx::query(
            r"
            SELECT id, data, last_used_at, last_amount, use_count FROM recent_foods
            WHERE user_id = $1
            ORDER BY last_used_at DESC
            LIMIT $2
            ",
        )
        .bind(user_id)
        .bind(i64::try_from(limit).unwrap_or(i64::MAX))
        .fetch_all(&self.pool)
        .await
        .map_err(query_error("list recent foods"))?;

        rows.iter().map(row_to_recent_food).collect()
    }
}

/// Map a `sqlx` failure to a storage error naming the action
fn query_error(action: &'static str) -> impl FnOnce(SqlxError) -> AppError {
    move |e| AppError::storage(format!("Failed to {action}: {e}"))
}

/// Fixed-width UTC timestamps so text ordering matches time ordering
fn timestamp(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_timestamp(raw: &str) -> AppResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|d| d.with_timezone(&Utc))
        .map_err(|e| AppError::internal(format!("Invalid timestamp '{raw}': {e}")))
}

fn count_from_db(count: i64) -> u32 {
    u32::try_from(count.max(0)).unwrap_or(u32::MAX)
}

fn row_to_profile(row: &SqliteRow) -> AppResult<UserProfile> {
    let data: String = row.get("data");
    Ok(serde_json::from_str(&data).map_err(StorageError::from)?)
}

fn row_to_food_entry(row: &SqliteRow) -> AppResult<FoodEntry> {
    let data: String = row.get("data");
    Ok(serde_json::from_str(&data).map_err(StorageError::from)?)
}

fn row_to_recipe(row: &SqliteRow) -> AppResult<Recipe> {
    let data: String = row.get("data");
    let like_count: i64 = row.get("like_count");
    let mut recipe: Recipe = serde_json::from_str(&data).map_err(StorageError::from)?;
    recipe.like_count = count_from_db(like_count);
    Ok(recipe)
}

fn row_to_recent_food(row: &SqliteRow) -> AppResult<RecentFood> {
    let data: String = row.get("data");
    let last_used_at: String = row.get("last_used_at");
    let use_count: i64 = row.get("use_count");
    Ok(RecentFood {
        id: row.get("id"),
        food: serde_json::from_str(&data).map_err(StorageError::from)?,
        last_used_at: parse_timestamp(&last_used_at)?,
        last_amount: row.get("last_amount"),
        use_count: count_from_db(use_count),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamps_sort_lexically() {
        let earlier = DateTime::parse_from_rfc3339("2025-03-07T08:00:00.5Z")
            .unwrap()
            .with_timezone(&Utc);
        let later = DateTime::parse_from_rfc3339("2025-03-07T08:00:01Z")
            .unwrap()
            .with_timezone(&Utc);
        assert!(timestamp(&earlier) < timestamp(&later));
        assert_eq!(parse_timestamp(&timestamp(&later)).unwrap(), later);
    }

    #[test]
    fn test_negative_count_clamps_to_zero() {
        assert_eq!(count_from_db(-3), 0);
        assert_eq!(count_from_db(12), 12);
    }
}
