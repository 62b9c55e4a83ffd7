// ABOUTME: Portion scaling from per-100g food data to absolute diary entry values
// ABOUTME: Amount parsing, manual entry validation, and pending batch preview totals
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Portion scaling
//!
//! Food databases report nutrition per 100 g. Entries in the diary store absolute
//! values for the logged amount, so scaling happens exactly once here when an entry
//! is created and is never re-derived afterwards.

use chrono::{DateTime, Utc};
use fitpro_core::constants::nutrition::{DEFAULT_PORTION_GRAMS, REFERENCE_GRAMS};
use fitpro_core::errors::{AppError, AppResult};
use fitpro_core::models::{round1, FoodCandidate, MacroTotals, MealType, NewFoodEntry};
use fitpro_core::parsing::{safe_parse_number, ParseOptions};
use serde::{Deserialize, Serialize};

/// Unit recorded for entries scaled from per-100g data
pub const GRAM_UNIT: &str = "g";

/// Scale a per-100g value to `grams`, rounded to one decimal
#[must_use]
pub fn scale_nutrient(per_100g: f64, grams: f64) -> f64 {
    round1(per_100g * grams / REFERENCE_GRAMS)
}

/// Recover a per-100g value from a value scaled to `grams`
///
/// Returns 0 when `grams` is not positive.
#[must_use]
pub fn unscale_nutrient(scaled: f64, grams: f64) -> f64 {
    if grams <= 0.0 {
        return 0.0;
    }
    scaled * REFERENCE_GRAMS / grams
}

/// Parse the amount field; empty, malformed, or non-positive input means 100 g
#[must_use]
pub fn parse_amount(input: &str) -> f64 {
    let grams = safe_parse_number(input, ParseOptions::with_default(DEFAULT_PORTION_GRAMS));
    if grams > 0.0 {
        grams
    } else {
        DEFAULT_PORTION_GRAMS
    }
}

/// Scale only when the optional nutrient is present and non-zero
fn scale_optional(per_100g: Option<f64>, grams: f64) -> Option<f64> {
    per_100g
        .filter(|value| value.abs() > f64::EPSILON)
        .map(|value| scale_nutrient(value, grams))
}

/// Scaled calories and macros for `grams` of a candidate
///
/// Calories are whole numbers, the macros keep one decimal.
#[must_use]
pub fn scaled_macros(food: &FoodCandidate, grams: f64) -> MacroTotals {
    let n = &food.nutrition;
    MacroTotals::new(
        scale_nutrient(n.calories, grams).round(),
        scale_nutrient(n.protein_g, grams),
        scale_nutrient(n.carbs_g, grams),
        scale_nutrient(n.fat_g, grams),
    )
}

/// Build a diary entry for `grams` of a searched or scanned food
#[must_use]
pub fn entry_from_candidate(
    food: &FoodCandidate,
    grams: f64,
    meal_type: MealType,
    logged_at: DateTime<Utc>,
) -> NewFoodEntry {
    let macros = scaled_macros(food, grams);
    NewFoodEntry {
        name: food.name.clone(),
        brand: food.brand.clone(),
        barcode: food.barcode.clone(),
        amount: grams,
        unit: GRAM_UNIT.to_owned(),
        calories: macros.calories,
        protein_g: macros.protein_g,
        carbs_g: macros.carbs_g,
        fat_g: macros.fat_g,
        fiber_g: scale_optional(food.nutrition.fiber_g, grams),
        sugar_g: scale_optional(food.nutrition.sugar_g, grams),
        meal_type,
        logged_at,
    }
}

/// Food typed in by hand with absolute values for the stated amount
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ManualFood {
    /// Food name
    pub name: String,
    /// Brand name
    #[serde(default)]
    pub brand: Option<String>,
    /// Amount eaten
    pub amount: f64,
    /// Unit of `amount`
    pub unit: String,
    /// Energy (kcal)
    pub calories: f64,
    /// Protein (g)
    pub protein_g: f64,
    /// Carbohydrates (g)
    pub carbs_g: f64,
    /// Fat (g)
    pub fat_g: f64,
}

/// Validate a manual food and turn it into a diary entry
///
/// # Errors
///
/// Returns `MissingRequiredField` for an empty name, and `ValueOutOfRange` for a
/// non-positive amount or a negative or non-finite macro.
pub fn manual_entry(
    food: ManualFood,
    meal_type: MealType,
    logged_at: DateTime<Utc>,
) -> AppResult<NewFoodEntry> {
    let name = food.name.trim();
    if name.is_empty() {
        return Err(AppError::missing_field("name"));
    }
    if !food.amount.is_finite() || food.amount <= 0.0 {
        return Err(AppError::value_out_of_range("Amount must be positive"));
    }
    let values = [food.calories, food.protein_g, food.carbs_g, food.fat_g];
    if values.iter().any(|v| !v.is_finite() || *v < 0.0) {
        return Err(AppError::value_out_of_range(
            "Calories and macros must not be negative",
        ));
    }

    let unit = match food.unit.trim() {
        "" => GRAM_UNIT.to_owned(),
        unit => unit.to_owned(),
    };

    Ok(NewFoodEntry {
        name: name.to_owned(),
        brand: food.brand.filter(|b| !b.trim().is_empty()),
        barcode: None,
        amount: food.amount,
        unit,
        calories: food.calories.round(),
        protein_g: round1(food.protein_g),
        carbs_g: round1(food.carbs_g),
        fat_g: round1(food.fat_g),
        fiber_g: None,
        sugar_g: None,
        meal_type,
        logged_at,
    })
}

/// A food picked for logging but not yet saved
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PendingItem {
    /// Selected food
    pub food: FoodCandidate,
    /// Amount in grams
    pub grams: f64,
}

impl PendingItem {
    /// Pending item from the raw amount field
    #[must_use]
    pub fn from_input(food: FoodCandidate, amount_input: &str) -> Self {
        Self {
            food,
            grams: parse_amount(amount_input),
        }
    }
}

/// Totals shown under the pending list before saving
#[must_use]
pub fn preview_totals(items: &[PendingItem]) -> MacroTotals {
    items
        .iter()
        .map(|item| scaled_macros(&item.food, item.grams))
        .fold(MacroTotals::ZERO, |acc, m| acc.plus(&m))
        .rounded()
}

/// Entries for every pending item, all logged in the same meal at the same time
#[must_use]
pub fn entries_for_batch(
    items: &[PendingItem],
    meal_type: MealType,
    logged_at: DateTime<Utc>,
) -> Vec<NewFoodEntry> {
    items
        .iter()
        .map(|item| entry_from_candidate(&item.food, item.grams, meal_type, logged_at))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use fitpro_core::models::NutritionPer100g;

    fn oats() -> FoodCandidate {
        FoodCandidate {
            barcode: Some("4000000000001".to_owned()),
            name: "Oats".to_owned(),
            brand: None,
            image_url: None,
            nutrition: NutritionPer100g {
                calories: 372.0,
                protein_g: 13.5,
                carbs_g: 58.7,
                fat_g: 7.0,
                fiber_g: Some(10.0),
                sugar_g: Some(0.0),
            },
            nutriscore: Some("a".to_owned()),
        }
    }

    #[test]
    fn test_scale_nutrient_rounds_to_one_decimal() {
        assert!((scale_nutrient(13.5, 45.0) - 6.1).abs() < 1e-9);
        assert!((scale_nutrient(372.0, 100.0) - 372.0).abs() < 1e-9);
    }

    #[test]
    fn test_unscale_recovers_per_100g_value() {
        let scaled = scale_nutrient(13.5, 40.0);
        assert!((unscale_nutrient(scaled, 40.0) - 13.5).abs() < 1e-9);
        assert!(unscale_nutrient(5.0, 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_parse_amount_defaults() {
        assert!((parse_amount("") - 100.0).abs() < f64::EPSILON);
        assert!((parse_amount("abc") - 100.0).abs() < f64::EPSILON);
        assert!((parse_amount("0") - 100.0).abs() < f64::EPSILON);
        assert!((parse_amount(" 250 ") - 250.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_optional_nutrients_skip_zero() {
        let entry = entry_from_candidate(&oats(), 50.0, MealType::Breakfast, Utc::now());
        assert!(entry.fiber_g.is_some_and(|f| (f - 5.0).abs() < 1e-9));
        assert!(entry.sugar_g.is_none());
        assert!((entry.calories - 186.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_manual_entry_rejects_negative_macros() {
        let food = ManualFood {
            name: "Shake".to_owned(),
            brand: None,
            amount: 1.0,
            unit: "serving".to_owned(),
            calories: 200.0,
            protein_g: -1.0,
            carbs_g: 10.0,
            fat_g: 2.0,
        };
        assert!(manual_entry(food, MealType::Snack, Utc::now()).is_err());
    }
}
