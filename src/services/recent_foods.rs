// ABOUTME: Recently logged foods: stable document ids and best-effort usage recording
// ABOUTME: Barcodes identify packaged foods, name slugs everything else
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::errors::AppResult;
use crate::stores::RecentFoodStore;
use chrono::{DateTime, Utc};
use fitpro_core::constants::recent_foods::{
    MIN_BARCODE_ID_LEN, RECENT_FOODS_LIMIT, RECENT_FOOD_SLUG_MAX,
};
use fitpro_core::models::{FoodCandidate, RecentFood};
use std::sync::Arc;
use tracing::{debug, warn};

/// Document id for a recent food
///
/// The barcode when it is longer than three characters, otherwise the lowercased
/// name with every character outside `[a-z0-9]` replaced by `-`, cut to 60 characters.
#[must_use]
pub fn recent_food_id(food: &FoodCandidate) -> String {
    if let Some(barcode) = food
        .barcode
        .as_deref()
        .map(str::trim)
        .filter(|b| b.chars().count() > MIN_BARCODE_ID_LEN)
    {
        return barcode.to_owned();
    }
    food.name
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_lowercase() || c.is_ascii_digit() {
                c
            } else {
                '-'
            }
        })
        .take(RECENT_FOOD_SLUG_MAX)
        .collect()
}

/// Records and lists recently logged foods
#[derive(Clone)]
pub struct RecentFoodService {
    store: Arc<dyn RecentFoodStore>,
}

impl RecentFoodService {
    /// Service over a recent food store
    #[must_use]
    pub fn new(store: Arc<dyn RecentFoodStore>) -> Self {
        Self { store }
    }

    /// Record that `food` was logged; failures are logged and swallowed
    pub async fn record(
        &self,
        user_id: &str,
        food: &FoodCandidate,
        amount: f64,
        at: DateTime<Utc>,
    ) -> Option<RecentFood> {
        let id = recent_food_id(food);
        match self.store.record_use(user_id, &id, food, amount, at).await {
            Ok(recent) => {
                debug!(user_id, food_id = %id, use_count = recent.use_count, "Recent food recorded");
                Some(recent)
            }
            Err(e) => {
                warn!(user_id, food_id = %id, error = %e, "Failed to record recent food");
                None
            }
        }
    }

    /// Most recently used foods, `limit` defaulting to 20
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails
    pub async fn list(&self, user_id: &str, limit: Option<usize>) -> AppResult<Vec<RecentFood>> {
        self.store
            .recent_foods(user_id, limit.unwrap_or(RECENT_FOODS_LIMIT))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fitpro_core::models::NutritionPer100g;

    fn food(name: &str, barcode: Option<&str>) -> FoodCandidate {
        FoodCandidate {
            barcode: barcode.map(str::to_owned),
            name: name.to_owned(),
            brand: None,
            image_url: None,
            nutrition: NutritionPer100g::default(),
            nutriscore: None,
        }
    }

    #[test]
    fn test_barcode_is_preferred_id() {
        assert_eq!(
            recent_food_id(&food("Milk", Some(" 4001234567890 "))),
            "4001234567890"
        );
    }

    #[test]
    fn test_short_barcode_falls_back_to_slug() {
        assert_eq!(recent_food_id(&food("Greek Yogurt 2%", Some("123"))), "greek-yogurt-2-");
    }

    #[test]
    fn test_slug_is_truncated() {
        let id = recent_food_id(&food(&"Ä".repeat(80), None));
        assert_eq!(id.chars().count(), RECENT_FOOD_SLUG_MAX);
        assert!(id.chars().all(|c| c == '-'));
    }
}
