// ABOUTME: Food logging models: meal types, macro totals, search candidates, and diary entries
// ABOUTME: FoodEntry values are absolute for the logged amount, never per-100g
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Meal bucket a food entry belongs to
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum MealType {
    /// Breakfast meal
    Breakfast,
    /// Lunch meal
    Lunch,
    /// Dinner meal
    Dinner,
    /// Anything else
    Snack,
}

impl MealType {
    /// Buckets in display order
    pub const ALL: [Self; 4] = [Self::Breakfast, Self::Lunch, Self::Dinner, Self::Snack];

    /// Parse meal type from string; unknown values land in the snack bucket
    #[must_use]
    pub fn from_str_lossy(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "breakfast" => Self::Breakfast,
            "lunch" => Self::Lunch,
            "dinner" => Self::Dinner,
            _ => Self::Snack,
        }
    }

    /// Wire name
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Breakfast => "breakfast",
            Self::Lunch => "lunch",
            Self::Dinner => "dinner",
            Self::Snack => "snack",
        }
    }
}

impl fmt::Display for MealType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for MealType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.as_deref().map_or(Self::Snack, Self::from_str_lossy))
    }
}

/// Round to one decimal place
#[must_use]
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Calories plus the three macronutrients
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct MacroTotals {
    /// Energy (kcal)
    pub calories: f64,
    /// Protein (g)
    pub protein_g: f64,
    /// Carbohydrates (g)
    pub carbs_g: f64,
    /// Fat (g)
    pub fat_g: f64,
}

impl MacroTotals {
    /// All zeros
    pub const ZERO: Self = Self {
        calories: 0.0,
        protein_g: 0.0,
        carbs_g: 0.0,
        fat_g: 0.0,
    };

    /// Construct from the four values
    #[must_use]
    pub const fn new(calories: f64, protein_g: f64, carbs_g: f64, fat_g: f64) -> Self {
        Self {
            calories,
            protein_g,
            carbs_g,
            fat_g,
        }
    }

    /// Field-wise sum
    #[must_use]
    pub fn plus(&self, other: &Self) -> Self {
        Self {
            calories: self.calories + other.calories,
            protein_g: self.protein_g + other.protein_g,
            carbs_g: self.carbs_g + other.carbs_g,
            fat_g: self.fat_g + other.fat_g,
        }
    }

    /// Display rounding: whole kcal, grams to one decimal
    #[must_use]
    pub fn rounded(&self) -> Self {
        Self {
            calories: self.calories.round(),
            protein_g: round1(self.protein_g),
            carbs_g: round1(self.carbs_g),
            fat_g: round1(self.fat_g),
        }
    }

    /// Apply `op` to each pair of fields
    #[must_use]
    pub fn zip_with(&self, other: &Self, op: impl Fn(f64, f64) -> f64) -> Self {
        Self {
            calories: op(self.calories, other.calories),
            protein_g: op(self.protein_g, other.protein_g),
            carbs_g: op(self.carbs_g, other.carbs_g),
            fat_g: op(self.fat_g, other.fat_g),
        }
    }
}

/// Nutrition facts per 100 g, as reported by a food database
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct NutritionPer100g {
    /// Energy (kcal)
    pub calories: f64,
    /// Protein (g)
    pub protein_g: f64,
    /// Carbohydrates (g)
    pub carbs_g: f64,
    /// Fat (g)
    pub fat_g: f64,
    /// Fiber (g)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fiber_g: Option<f64>,
    /// Sugar (g)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sugar_g: Option<f64>,
}

impl NutritionPer100g {
    /// Calories and macros only
    #[must_use]
    pub const fn macros(&self) -> MacroTotals {
        MacroTotals::new(self.calories, self.protein_g, self.carbs_g, self.fat_g)
    }

    /// True when every headline value is zero
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.calories <= 0.0 && self.protein_g <= 0.0 && self.carbs_g <= 0.0 && self.fat_g <= 0.0
    }
}

/// One normalized food from a text search or barcode lookup
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FoodCandidate {
    /// Product barcode
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub barcode: Option<String>,
    /// Display name
    pub name: String,
    /// Brand name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    /// Image reference
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Per-100g nutrition
    pub nutrition: NutritionPer100g,
    /// Quality grade label (Nutri-Score letter)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nutriscore: Option<String>,
}

/// Food entry about to be written to the diary
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewFoodEntry {
    /// Food name
    pub name: String,
    /// Brand name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    /// Product barcode
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub barcode: Option<String>,
    /// Logged amount
    pub amount: f64,
    /// Unit of `amount`
    pub unit: String,
    /// Energy for the amount (kcal)
    pub calories: f64,
    /// Protein for the amount (g)
    pub protein_g: f64,
    /// Carbohydrates for the amount (g)
    pub carbs_g: f64,
    /// Fat for the amount (g)
    pub fat_g: f64,
    /// Fiber for the amount (g)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fiber_g: Option<f64>,
    /// Sugar for the amount (g)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sugar_g: Option<f64>,
    /// Meal bucket
    pub meal_type: MealType,
    /// When the user logged it
    pub logged_at: DateTime<Utc>,
}

impl NewFoodEntry {
    /// Attach a store-assigned id
    #[must_use]
    pub fn into_entry(self, id: impl Into<String>) -> FoodEntry {
        FoodEntry {
            id: id.into(),
            name: self.name,
            brand: self.brand,
            barcode: self.barcode,
            amount: self.amount,
            unit: self.unit,
            calories: self.calories,
            protein_g: self.protein_g,
            carbs_g: self.carbs_g,
            fat_g: self.fat_g,
            fiber_g: self.fiber_g,
            sugar_g: self.sugar_g,
            meal_type: self.meal_type,
            logged_at: self.logged_at,
        }
    }
}

/// Persisted food diary entry; immutable once written
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FoodEntry {
    /// Store-assigned identifier
    pub id: String,
    /// Food name
    pub name: String,
    /// Brand name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    /// Product barcode
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub barcode: Option<String>,
    /// Logged amount
    pub amount: f64,
    /// Unit of `amount`
    pub unit: String,
    /// Energy for the amount (kcal)
    pub calories: f64,
    /// Protein for the amount (g)
    pub protein_g: f64,
    /// Carbohydrates for the amount (g)
    pub carbs_g: f64,
    /// Fat for the amount (g)
    pub fat_g: f64,
    /// Fiber for the amount (g)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fiber_g: Option<f64>,
    /// Sugar for the amount (g)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sugar_g: Option<f64>,
    /// Meal bucket
    #[serde(default = "default_meal_type")]
    pub meal_type: MealType,
    /// When the user logged it
    pub logged_at: DateTime<Utc>,
}

const fn default_meal_type() -> MealType {
    MealType::Snack
}

impl FoodEntry {
    /// Calories and macros of this entry
    #[must_use]
    pub const fn macros(&self) -> MacroTotals {
        MacroTotals::new(self.calories, self.protein_g, self.carbs_g, self.fat_g)
    }
}

/// Frequently used food, upserted each time it is logged
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecentFood {
    /// Document id (barcode or name slug)
    pub id: String,
    /// Food as it was last logged
    pub food: FoodCandidate,
    /// Last time it was logged
    pub last_used_at: DateTime<Utc>,
    /// Amount used last time, pre-fills the amount picker
    pub last_amount: f64,
    /// Approximate number of times logged
    pub use_count: u32,
}

/// Format a calendar date as the diary key (`YYYY-MM-DD`)
#[must_use]
pub fn day_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Parse a diary key back into a date
#[must_use]
pub fn parse_day_key(key: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(key.trim(), "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_meal_type_is_snack() {
        assert_eq!(MealType::from_str_lossy("Brunch"), MealType::Snack);
        assert_eq!(MealType::from_str_lossy(" LUNCH "), MealType::Lunch);

        let parsed: MealType = serde_json::from_str("\"midnight\"").unwrap();
        assert_eq!(parsed, MealType::Snack);
        let parsed: MealType = serde_json::from_str("null").unwrap();
        assert_eq!(parsed, MealType::Snack);
    }

    #[test]
    fn test_macro_totals_rounding() {
        let totals = MacroTotals::new(899.5, 10.04, 20.05, 3.333).rounded();
        assert!((totals.calories - 900.0).abs() < f64::EPSILON);
        assert!((totals.protein_g - 10.0).abs() < 1e-9);
        assert!((totals.fat_g - 3.3).abs() < 1e-9);
    }

    #[test]
    fn test_day_key_format() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 7).unwrap();
        assert_eq!(day_key(date), "2025-03-07");
        assert_eq!(parse_day_key("2025-03-07"), Some(date));
        assert_eq!(parse_day_key("07.03.2025"), None);
    }

    #[test]
    fn test_entry_missing_meal_type_defaults_to_snack() {
        let json = serde_json::json!({
            "id": "e1",
            "name": "Apple",
            "amount": 150.0,
            "unit": "g",
            "calories": 78.0,
            "protein_g": 0.4,
            "carbs_g": 20.7,
            "fat_g": 0.3,
            "logged_at": "2025-03-07T08:00:00Z"
        });
        let entry: FoodEntry = serde_json::from_value(json).unwrap();
        assert_eq!(entry.meal_type, MealType::Snack);
    }
}
