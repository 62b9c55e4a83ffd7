// ABOUTME: Per-portion recipe nutrition from per-100g ingredient macros and author overrides
// ABOUTME: Tracks whether every value was backed by complete data
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use fitpro_core::constants::nutrition::REFERENCE_GRAMS;
use fitpro_core::models::{
    round1, Ingredient, MacroOverrides, NutritionSource, RecipeNutrition,
};

/// Sum of one macro over all ingredients, and whether every ingredient had it
fn ingredient_total(ingredients: &[Ingredient], field: impl Fn(&Ingredient) -> Option<f64>) -> (f64, bool) {
    ingredients.iter().fold((0.0, true), |(total, complete), ingredient| {
        let factor = ingredient.amount.max(0.0) / REFERENCE_GRAMS;
        match field(ingredient) {
            Some(per_100g) => (total + per_100g * factor, complete),
            None => (total, false),
        }
    })
}

/// Whole-recipe value for one field: the override when present, else the ingredient sum
fn resolve_field(
    override_value: Option<f64>,
    ingredients: &[Ingredient],
    field: impl Fn(&Ingredient) -> Option<f64>,
) -> (f64, bool) {
    match override_value {
        Some(total) => (total, true),
        None if ingredients.is_empty() => (0.0, false),
        None => ingredient_total(ingredients, field),
    }
}

/// Per-portion calories and macros of a recipe
///
/// Ingredient macros are per 100 g of the ingredient amount. Author overrides are
/// whole-recipe totals and win per field. Calories are rounded to whole kcal, grams to
/// one decimal. With no ingredients and no overrides, or fewer than one portion, the
/// result is all zeros and flagged incomplete.
#[must_use]
pub fn calculate_recipe_nutrition(
    ingredients: &[Ingredient],
    portions: u32,
    overrides: &MacroOverrides,
) -> RecipeNutrition {
    if portions == 0 || (ingredients.is_empty() && overrides.is_empty()) {
        return RecipeNutrition::empty();
    }
    let portions = f64::from(portions);

    let (calories, calories_ok) = resolve_field(overrides.calories, ingredients, |i| i.calories);
    let (protein, protein_ok) = resolve_field(overrides.protein_g, ingredients, |i| i.protein_g);
    let (carbs, carbs_ok) = resolve_field(overrides.carbs_g, ingredients, |i| i.carbs_g);
    let (fat, fat_ok) = resolve_field(overrides.fat_g, ingredients, |i| i.fat_g);

    let source = if overrides.is_complete() {
        NutritionSource::Overrides
    } else if overrides.is_empty() {
        NutritionSource::Ingredients
    } else {
        NutritionSource::Mixed
    };

    RecipeNutrition {
        calories: (calories / portions).round(),
        protein_g: round1(protein / portions),
        carbs_g: round1(carbs / portions),
        fat_g: round1(fat / portions),
        has_complete_data: calories_ok && protein_ok && carbs_ok && fat_ok,
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_macro_marks_incomplete() {
        let ingredients = vec![
            Ingredient::new("Rice", 200.0, "g").with_macros(130.0, 2.7, 28.0, 0.3),
            Ingredient::new("Soy sauce", 10.0, "ml"),
        ];
        let result = calculate_recipe_nutrition(&ingredients, 2, &MacroOverrides::default());
        assert!(!result.has_complete_data);
        assert!((result.calories - 130.0).abs() < f64::EPSILON);
        assert_eq!(result.source, NutritionSource::Ingredients);
    }

    #[test]
    fn test_zero_portions_is_empty() {
        let ingredients = vec![Ingredient::new("Rice", 200.0, "g").with_macros(130.0, 2.7, 28.0, 0.3)];
        let result = calculate_recipe_nutrition(&ingredients, 0, &MacroOverrides::default());
        assert_eq!(result, RecipeNutrition::empty());
    }
}
