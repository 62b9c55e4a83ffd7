// ABOUTME: Food log aggregation into per-meal and whole-day totals against daily targets
// ABOUTME: Clamped remaining budget, separate over-target amounts, and clamped progress ratios
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Daily nutrition summary
//!
//! [`summarize_day`] is a pure function over one day's entries. Live views feed it
//! from a food log subscription; it never touches a store itself.
//!
//! Rounding follows the diary display: calories are whole numbers, grams keep one
//! decimal. Day totals are the sum of the rounded bucket totals so the four buckets
//! always reconcile exactly with the day.

use crate::config::FallbackTargetsConfig;
use fitpro_core::models::{round1, DerivedMetrics, FoodEntry, MacroTotals, MealType};
use serde::{Deserialize, Serialize};

/// The four daily targets the aggregator divides by
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct DailyTargets {
    /// Calories (kcal)
    pub calories: f64,
    /// Protein (g)
    pub protein_g: f64,
    /// Carbohydrates (g)
    pub carbs_g: f64,
    /// Fat (g)
    pub fat_g: f64,
}

/// A usable divisor: positive and finite
fn usable(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite() && *v > 0.0)
}

impl DailyTargets {
    /// The configured fallback targets
    #[must_use]
    pub const fn fallback(fallbacks: &FallbackTargetsConfig) -> Self {
        Self {
            calories: fallbacks.calories,
            protein_g: fallbacks.protein_g,
            carbs_g: fallbacks.carbs_g,
            fat_g: fallbacks.fat_g,
        }
    }

    /// Targets from stored metrics, substituting the fallback per macro when a value
    /// is missing, zero, negative, or not finite
    #[must_use]
    pub fn resolve(metrics: Option<&DerivedMetrics>, fallbacks: &FallbackTargetsConfig) -> Self {
        Self::from_parts(
            metrics.map(|m| m.daily_calorie_target),
            metrics.map(|m| m.daily_protein_target_g),
            metrics.map(|m| m.daily_carbs_target_g),
            metrics.map(|m| m.daily_fat_target_g),
            fallbacks,
        )
    }

    /// Targets from individually optional values, with per-field fallback
    #[must_use]
    pub fn from_parts(
        calories: Option<f64>,
        protein_g: Option<f64>,
        carbs_g: Option<f64>,
        fat_g: Option<f64>,
        fallbacks: &FallbackTargetsConfig,
    ) -> Self {
        Self {
            calories: usable(calories).unwrap_or(fallbacks.calories),
            protein_g: usable(protein_g).unwrap_or(fallbacks.protein_g),
            carbs_g: usable(carbs_g).unwrap_or(fallbacks.carbs_g),
            fat_g: usable(fat_g).unwrap_or(fallbacks.fat_g),
        }
    }

    /// As a totals record
    #[must_use]
    pub const fn as_totals(&self) -> MacroTotals {
        MacroTotals::new(self.calories, self.protein_g, self.carbs_g, self.fat_g)
    }

    /// Guarantee every divisor is usable, falling back per field
    #[must_use]
    fn sanitized(self, fallbacks: &FallbackTargetsConfig) -> Self {
        Self::from_parts(
            Some(self.calories),
            Some(self.protein_g),
            Some(self.carbs_g),
            Some(self.fat_g),
            fallbacks,
        )
    }
}

/// One meal bucket
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MealSummary {
    /// Bucket
    pub meal_type: MealType,
    /// Entries in `logged_at` order
    pub entries: Vec<FoodEntry>,
    /// Rounded totals of the bucket
    pub totals: MacroTotals,
}

impl MealSummary {
    fn empty(meal_type: MealType) -> Self {
        Self {
            meal_type,
            entries: Vec::new(),
            totals: MacroTotals::ZERO,
        }
    }
}

/// Aggregated view of one diary day
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DailyNutritionSummary {
    /// Breakfast, lunch, dinner, snack; always all four
    pub meals: Vec<MealSummary>,
    /// Targets actually used (after fallback)
    pub targets: DailyTargets,
    /// Consumed totals for the day
    pub consumed: MacroTotals,
    /// `max(0, target - consumed)` per macro
    pub remaining: MacroTotals,
    /// `max(0, consumed - target)` per macro
    pub over_target: MacroTotals,
    /// Calorie progress in percent, clamped to 0..=100
    pub calorie_progress_percent: f64,
    /// Protein progress, clamped to 0..=1
    pub protein_progress: f64,
    /// Carbohydrate progress, clamped to 0..=1
    pub carbs_progress: f64,
    /// Fat progress, clamped to 0..=1
    pub fat_progress: f64,
}

impl DailyNutritionSummary {
    /// Bucket for a meal type
    #[must_use]
    pub fn meal(&self, meal_type: MealType) -> Option<&MealSummary> {
        self.meals.iter().find(|m| m.meal_type == meal_type)
    }

    /// Consumed calories exceed the calorie target
    #[must_use]
    pub fn is_over_calories(&self) -> bool {
        self.over_target.calories > 0.0
    }

    /// Number of entries across all buckets
    #[must_use]
    pub fn entry_count(&self) -> usize {
        self.meals.iter().map(|m| m.entries.len()).sum()
    }
}

/// Clamp a ratio, mapping NaN to the lower bound
fn clamp_ratio(value: f64, max: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, max)
}

/// Round calories to whole kcal and grams to one decimal after a subtraction
fn round_diff(totals: MacroTotals) -> MacroTotals {
    MacroTotals::new(
        totals.calories.round(),
        round1(totals.protein_g),
        round1(totals.carbs_g),
        round1(totals.fat_g),
    )
}

/// Roll up one day's entries against the given targets
///
/// Entries with an unknown meal type have already been mapped to snack when they were
/// decoded. Targets that are not usable divisors are replaced by `fallbacks`.
#[must_use]
pub fn summarize_day(
    entries: &[FoodEntry],
    targets: DailyTargets,
    fallbacks: &FallbackTargetsConfig,
) -> DailyNutritionSummary {
    let targets = targets.sanitized(fallbacks);

    let mut sorted: Vec<&FoodEntry> = entries.iter().collect();
    sorted.sort_by_key(|entry| entry.logged_at);

    let mut meals: Vec<MealSummary> = MealType::ALL.into_iter().map(MealSummary::empty).collect();
    let mut raw_totals = [MacroTotals::ZERO; 4];

    for entry in sorted {
        let index = MealType::ALL
            .iter()
            .position(|m| *m == entry.meal_type)
            .unwrap_or(MealType::ALL.len() - 1);
        raw_totals[index] = raw_totals[index].plus(&entry.macros());
        meals[index].entries.push(entry.clone());
    }

    for (meal, raw) in meals.iter_mut().zip(raw_totals) {
        meal.totals = raw.rounded();
    }

    let consumed = meals
        .iter()
        .fold(MacroTotals::ZERO, |acc, meal| acc.plus(&meal.totals))
        .rounded();

    let target_totals = targets.as_totals();
    let remaining = round_diff(target_totals.zip_with(&consumed, |t, c| (t - c).max(0.0)));
    let over_target = round_diff(consumed.zip_with(&target_totals, |c, t| (c - t).max(0.0)));

    DailyNutritionSummary {
        meals,
        targets,
        consumed,
        remaining,
        over_target,
        calorie_progress_percent: clamp_ratio(consumed.calories / targets.calories * 100.0, 100.0),
        protein_progress: clamp_ratio(consumed.protein_g / targets.protein_g, 1.0),
        carbs_progress: clamp_ratio(consumed.carbs_g / targets.carbs_g, 1.0),
        fat_progress: clamp_ratio(consumed.fat_g / targets.fat_g, 1.0),
    }
}
