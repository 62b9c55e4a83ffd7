// ABOUTME: Recipe models: ingredients, overrides, per-portion nutrition, and like/save relations
// ABOUTME: Drafts carry author input; persisted recipes add ids, timestamps, and like counts
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::AppError;

/// Recipe difficulty rating
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    /// Beginner friendly
    #[serde(alias = "simple")]
    Easy,
    /// Some experience needed
    #[serde(alias = "normal")]
    Medium,
    /// Advanced
    #[serde(alias = "difficult")]
    Hard,
}

impl Difficulty {
    /// Wire name
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "easy" | "simple" => Ok(Self::Easy),
            "medium" | "normal" => Ok(Self::Medium),
            "hard" | "difficult" => Ok(Self::Hard),
            other => Err(AppError::invalid_input(format!(
                "Unknown difficulty: {other}"
            ))),
        }
    }
}

/// Recipe ingredient with optional per-100g macros
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Ingredient {
    /// Ingredient name
    pub name: String,
    /// Amount used in the whole recipe
    pub amount: f64,
    /// Unit of `amount`
    pub unit: String,
    /// Energy per 100 g (kcal)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calories: Option<f64>,
    /// Protein per 100 g
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protein_g: Option<f64>,
    /// Carbohydrates per 100 g
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub carbs_g: Option<f64>,
    /// Fat per 100 g
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fat_g: Option<f64>,
}

impl Ingredient {
    /// Ingredient without nutrition data
    #[must_use]
    pub fn new(name: impl Into<String>, amount: f64, unit: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            amount,
            unit: unit.into(),
            calories: None,
            protein_g: None,
            carbs_g: None,
            fat_g: None,
        }
    }

    /// Attach per-100g macros
    #[must_use]
    pub const fn with_macros(mut self, calories: f64, protein_g: f64, carbs_g: f64, fat_g: f64) -> Self {
        self.calories = Some(calories);
        self.protein_g = Some(protein_g);
        self.carbs_g = Some(carbs_g);
        self.fat_g = Some(fat_g);
        self
    }

    /// True when all four macros are known
    #[must_use]
    pub const fn has_complete_macros(&self) -> bool {
        self.calories.is_some()
            && self.protein_g.is_some()
            && self.carbs_g.is_some()
            && self.fat_g.is_some()
    }
}

/// Author-entered totals for the whole recipe
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct MacroOverrides {
    /// Total energy (kcal)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calories: Option<f64>,
    /// Total protein (g)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protein_g: Option<f64>,
    /// Total carbohydrates (g)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub carbs_g: Option<f64>,
    /// Total fat (g)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fat_g: Option<f64>,
}

impl MacroOverrides {
    /// True when every field is set
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.calories.is_some()
            && self.protein_g.is_some()
            && self.carbs_g.is_some()
            && self.fat_g.is_some()
    }

    /// True when no field is set
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.calories.is_none()
            && self.protein_g.is_none()
            && self.carbs_g.is_none()
            && self.fat_g.is_none()
    }
}

/// Where per-portion nutrition values came from
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NutritionSource {
    /// Summed from ingredient data
    Ingredients,
    /// Every field from author overrides
    Overrides,
    /// Some fields overridden, the rest from ingredients
    Mixed,
}

/// Per-portion nutrition of a recipe
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct RecipeNutrition {
    /// Energy per portion (kcal, whole number)
    pub calories: f64,
    /// Protein per portion (g)
    pub protein_g: f64,
    /// Carbohydrates per portion (g)
    pub carbs_g: f64,
    /// Fat per portion (g)
    pub fat_g: f64,
    /// Every ingredient had all four macros, or all four were overridden
    pub has_complete_data: bool,
    /// Provenance of the values
    pub source: NutritionSource,
}

impl RecipeNutrition {
    /// All-zero result flagged incomplete
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            calories: 0.0,
            protein_g: 0.0,
            carbs_g: 0.0,
            fat_g: 0.0,
            has_complete_data: false,
            source: NutritionSource::Ingredients,
        }
    }
}

/// Author input for creating or editing a recipe
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecipeDraft {
    /// Recipe title
    pub title: String,
    /// Visible to other users
    #[serde(default)]
    pub is_public: bool,
    /// Vegan flag
    #[serde(default)]
    pub is_vegan: bool,
    /// Difficulty; required
    #[serde(default)]
    pub difficulty: Option<Difficulty>,
    /// Number of portions
    pub portions: u32,
    /// Preparation time in minutes
    pub prep_time_mins: u32,
    /// Cooking time in minutes
    pub cook_time_mins: u32,
    /// Ordered ingredients
    #[serde(default)]
    pub ingredients: Vec<Ingredient>,
    /// Ordered instruction steps
    #[serde(default)]
    pub instructions: Vec<String>,
    /// Optional whole-recipe totals
    #[serde(default)]
    pub overrides: MacroOverrides,
}

/// Persisted recipe
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Recipe {
    /// Recipe identifier
    pub id: String,
    /// Owning user
    pub author_id: String,
    /// Recipe title
    pub title: String,
    /// Visible to other users
    pub is_public: bool,
    /// Vegan flag
    pub is_vegan: bool,
    /// Difficulty rating
    pub difficulty: Difficulty,
    /// Number of portions
    pub portions: u32,
    /// Preparation time in minutes
    pub prep_time_mins: u32,
    /// Cooking time in minutes
    pub cook_time_mins: u32,
    /// Ordered ingredients
    pub ingredients: Vec<Ingredient>,
    /// Ordered instruction steps
    pub instructions: Vec<String>,
    /// Whole-recipe totals entered by the author
    #[serde(default)]
    pub overrides: MacroOverrides,
    /// Derived per-portion nutrition
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nutrition: Option<RecipeNutrition>,
    /// Image reference
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Number of likes
    #[serde(default)]
    pub like_count: u32,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Last edit time
    pub updated_at: DateTime<Utc>,
}

impl Recipe {
    /// Preparation plus cooking time
    #[must_use]
    pub const fn total_time_mins(&self) -> u32 {
        self.prep_time_mins.saturating_add(self.cook_time_mins)
    }

    /// Per-portion calories if nutrition was computed
    #[must_use]
    pub fn calories_per_portion(&self) -> Option<f64> {
        self.nutrition.map(|n| n.calories)
    }
}

/// Kind of user-recipe membership record
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum RelationKind {
    /// User liked the recipe
    Like,
    /// User saved the recipe
    Save,
}

impl RelationKind {
    /// Storage name
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Like => "like",
            Self::Save => "save",
        }
    }
}

impl fmt::Display for RelationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Membership record; its existence is the state
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecipeRelation {
    /// Like or save
    pub kind: RelationKind,
    /// User holding the relation
    pub user_id: String,
    /// Target recipe
    pub recipe_id: String,
    /// When the relation was created
    pub created_at: DateTime<Utc>,
}

/// Per-viewer social state of one recipe
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecipeSocialState {
    /// Viewer liked it
    pub liked: bool,
    /// Viewer saved it
    pub saved: bool,
    /// Total likes
    pub like_count: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_difficulty_parsing() {
        assert_eq!("Easy".parse::<Difficulty>().unwrap(), Difficulty::Easy);
        assert_eq!("difficult".parse::<Difficulty>().unwrap(), Difficulty::Hard);
        assert!("extreme".parse::<Difficulty>().is_err());
    }

    #[test]
    fn test_ingredient_completeness() {
        let bare = Ingredient::new("Salt", 5.0, "g");
        assert!(!bare.has_complete_macros());
        let full = Ingredient::new("Oats", 80.0, "g").with_macros(372.0, 13.5, 58.7, 7.0);
        assert!(full.has_complete_macros());
    }

    #[test]
    fn test_override_flags() {
        let none = MacroOverrides::default();
        assert!(none.is_empty());
        assert!(!none.is_complete());
        let partial = MacroOverrides {
            calories: Some(800.0),
            ..MacroOverrides::default()
        };
        assert!(!partial.is_empty());
        assert!(!partial.is_complete());
    }
}
