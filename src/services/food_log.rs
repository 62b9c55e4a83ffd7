// ABOUTME: Food diary service: scaled entries from search results, manual entries, and batches
// ABOUTME: Daily summaries computed on demand or fed live from the day's change feed
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::recent_foods::RecentFoodService;
use crate::errors::{AppError, AppResult};
use crate::stores::{FoodLogStore, Stores, Subscription};
use chrono::{DateTime, NaiveDate, Utc};
use fitpro_core::models::{FoodCandidate, FoodEntry, MealType};
use fitpro_intelligence::config::FallbackTargetsConfig;
use fitpro_intelligence::portion::{
    entries_for_batch, entry_from_candidate, manual_entry, parse_amount, ManualFood,
    PendingItem,
};
use fitpro_intelligence::{summarize_day, DailyNutritionSummary, DailyTargets};
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Writes and summarizes the per-day food diary
#[derive(Clone)]
pub struct FoodLogService {
    food_log: Arc<dyn FoodLogStore>,
    recent: RecentFoodService,
    fallbacks: FallbackTargetsConfig,
}

impl FoodLogService {
    /// Service over the food log and recent food stores
    #[must_use]
    pub fn new(stores: &Stores, fallbacks: FallbackTargetsConfig) -> Self {
        Self {
            food_log: stores.food_log.clone(),
            recent: RecentFoodService::new(stores.recent_foods.clone()),
            fallbacks,
        }
    }

    /// Recent food service used when logging
    #[must_use]
    pub const fn recent_foods(&self) -> &RecentFoodService {
        &self.recent
    }

    /// Log a searched or scanned food
    ///
    /// The amount text is parsed leniently and defaults to 100 g. The food is also
    /// recorded as a recent food; that part never fails the call.
    ///
    /// # Errors
    ///
    /// Returns an error if the food log store fails
    #[instrument(skip(self, food), fields(food = %food.name))]
    pub async fn log_food(
        &self,
        user_id: &str,
        day: NaiveDate,
        food: &FoodCandidate,
        amount_input: &str,
        meal_type: MealType,
        logged_at: DateTime<Utc>,
    ) -> AppResult<FoodEntry> {
        let grams = parse_amount(amount_input);
        let entry = self
            .food_log
            .add_entry(
                user_id,
                day,
                entry_from_candidate(food, grams, meal_type, logged_at),
            )
            .await?;
        self.recent.record(user_id, food, grams, logged_at).await;
        info!(
            user_id,
            entry_id = %entry.id,
            meal = %meal_type,
            grams,
            calories = entry.calories,
            "Food logged"
        );
        Ok(entry)
    }

    /// Log every pending item into one meal with a shared timestamp
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for an empty batch, or the first store failure; entries
    /// written before the failure stay in the diary
    #[instrument(skip(self, items), fields(items = items.len()))]
    pub async fn log_batch(
        &self,
        user_id: &str,
        day: NaiveDate,
        items: &[PendingItem],
        meal_type: MealType,
        logged_at: DateTime<Utc>,
    ) -> AppResult<Vec<FoodEntry>> {
        if items.is_empty() {
            return Err(AppError::invalid_input("Nothing to log"));
        }
        let mut logged = Vec::with_capacity(items.len());
        for (item, entry) in items
            .iter()
            .zip(entries_for_batch(items, meal_type, logged_at))
        {
            logged.push(self.food_log.add_entry(user_id, day, entry).await?);
            self.recent
                .record(user_id, &item.food, item.grams, logged_at)
                .await;
        }
        info!(user_id, count = logged.len(), meal = %meal_type, "Batch logged");
        Ok(logged)
    }

    /// Log a food typed in by hand
    ///
    /// # Errors
    ///
    /// Returns a validation error for an empty name, non-positive amount, or negative
    /// macro, or a store failure
    #[instrument(skip(self, food), fields(food = %food.name))]
    pub async fn log_manual(
        &self,
        user_id: &str,
        day: NaiveDate,
        food: ManualFood,
        meal_type: MealType,
        logged_at: DateTime<Utc>,
    ) -> AppResult<FoodEntry> {
        let entry = manual_entry(food, meal_type, logged_at)?;
        let entry = self.food_log.add_entry(user_id, day, entry).await?;
        info!(user_id, entry_id = %entry.id, meal = %meal_type, "Manual food logged");
        Ok(entry)
    }

    /// Delete one entry
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` if the entry is not in that day
    #[instrument(skip(self))]
    pub async fn delete_entry(&self, user_id: &str, day: NaiveDate, entry_id: &str) -> AppResult<()> {
        self.food_log.delete_entry(user_id, day, entry_id).await?;
        info!(user_id, entry_id, "Food entry deleted");
        Ok(())
    }

    /// Entries of one day
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails
    pub async fn entries(&self, user_id: &str, day: NaiveDate) -> AppResult<Vec<FoodEntry>> {
        self.food_log.list_entries(user_id, day).await
    }

    /// Summary of one day against `targets`
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails
    pub async fn daily_summary(
        &self,
        user_id: &str,
        day: NaiveDate,
        targets: DailyTargets,
    ) -> AppResult<DailyNutritionSummary> {
        let entries = self.food_log.list_entries(user_id, day).await?;
        Ok(summarize_day(&entries, targets, &self.fallbacks))
    }

    /// Live summary of one day, recomputed on every diary change
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot subscribe
    pub async fn watch_day(
        &self,
        user_id: &str,
        day: NaiveDate,
        targets: DailyTargets,
    ) -> AppResult<DailySummaryWatch> {
        let subscription = self.food_log.subscribe_day(user_id, day).await?;
        debug!(user_id, day = %day, "Watching diary day");
        Ok(DailySummaryWatch {
            subscription,
            targets,
            fallbacks: self.fallbacks,
        })
    }
}

/// Daily summary fed from a diary-day subscription
#[derive(Debug)]
pub struct DailySummaryWatch {
    subscription: Subscription<Vec<FoodEntry>>,
    targets: DailyTargets,
    fallbacks: FallbackTargetsConfig,
}

impl DailySummaryWatch {
    /// Summary of the latest entries
    #[must_use]
    pub fn current(&self) -> DailyNutritionSummary {
        summarize_day(&self.subscription.current(), self.targets, &self.fallbacks)
    }

    /// Wait for the next diary change and summarize it
    ///
    /// # Errors
    ///
    /// Returns an error if the store dropped the feed
    pub async fn changed(&mut self) -> AppResult<DailyNutritionSummary> {
        let entries = self.subscription.changed().await?;
        Ok(summarize_day(&entries, self.targets, &self.fallbacks))
    }

    /// Use new targets, for example after the profile changed
    pub const fn set_targets(&mut self, targets: DailyTargets) {
        self.targets = targets;
    }

    /// Stop watching
    pub fn unsubscribe(self) {
        self.subscription.unsubscribe();
    }
}
