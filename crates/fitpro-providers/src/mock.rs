// ABOUTME: In-memory food database provider for tests and offline use
// ABOUTME: Substring search over fixed foods with a switchable failure mode and call counter
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::food_database::{BarcodeLookup, FoodDatabaseProvider};
use async_trait::async_trait;
use fitpro_core::errors::ProviderError;
use fitpro_core::models::{FoodCandidate, NutritionPer100g};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Provider name reported by the mock
const MOCK_PROVIDER: &str = "MockFoodDatabase";

/// Mock food database (no network calls)
pub struct MockFoodDatabase {
    foods: Vec<FoodCandidate>,
    failing: AtomicBool,
    search_calls: AtomicUsize,
}

fn food(barcode: &str, name: &str, brand: Option<&str>, nutrition: NutritionPer100g) -> FoodCandidate {
    FoodCandidate {
        barcode: Some(barcode.to_owned()),
        name: name.to_owned(),
        brand: brand.map(str::to_owned),
        image_url: None,
        nutrition,
        nutriscore: None,
    }
}

impl MockFoodDatabase {
    /// Mock with a few common foods
    #[must_use]
    pub fn new() -> Self {
        Self::with_foods(vec![
            food(
                "4000000000017",
                "Haferflocken",
                Some("Kölln"),
                NutritionPer100g {
                    calories: 372.0,
                    protein_g: 13.5,
                    carbs_g: 58.7,
                    fat_g: 7.0,
                    fiber_g: Some(10.0),
                    sugar_g: Some(0.7),
                },
            ),
            food(
                "4000000000024",
                "Apple",
                None,
                NutritionPer100g {
                    calories: 52.0,
                    protein_g: 0.3,
                    carbs_g: 13.8,
                    fat_g: 0.2,
                    fiber_g: Some(2.4),
                    sugar_g: Some(10.4),
                },
            ),
            food(
                "4000000000031",
                "Chicken breast",
                None,
                NutritionPer100g {
                    calories: 165.0,
                    protein_g: 31.0,
                    carbs_g: 0.0,
                    fat_g: 3.6,
                    fiber_g: None,
                    sugar_g: None,
                },
            ),
        ])
    }

    /// Mock with the given foods
    #[must_use]
    pub const fn with_foods(foods: Vec<FoodCandidate>) -> Self {
        Self {
            foods,
            failing: AtomicBool::new(false),
            search_calls: AtomicUsize::new(0),
        }
    }

    /// Make every subsequent call fail with a network error
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Number of `search` calls that reached the mock
    #[must_use]
    pub fn search_calls(&self) -> usize {
        self.search_calls.load(Ordering::SeqCst)
    }

    fn check_failure(&self) -> Result<(), ProviderError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(ProviderError::Network {
                provider: MOCK_PROVIDER,
                message: "simulated outage".to_owned(),
            });
        }
        Ok(())
    }
}

impl Default for MockFoodDatabase {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FoodDatabaseProvider for MockFoodDatabase {
    fn name(&self) -> &'static str {
        MOCK_PROVIDER
    }

    async fn search(&self, query: &str) -> Result<Vec<FoodCandidate>, ProviderError> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        self.check_failure()?;

        let needle = query.trim().to_lowercase();
        Ok(self
            .foods
            .iter()
            .filter(|f| f.name.to_lowercase().contains(&needle))
            .cloned()
            .collect())
    }

    async fn lookup_barcode(&self, barcode: &str) -> Result<BarcodeLookup, ProviderError> {
        self.check_failure()?;
        Ok(self
            .foods
            .iter()
            .find(|f| f.barcode.as_deref() == Some(barcode.trim()))
            .cloned()
            .map_or(BarcodeLookup::NotFound, BarcodeLookup::Found))
    }
}
