// ABOUTME: Recipe draft validation before create or edit
// ABOUTME: Required fields, positive counts, ingredient checks, and instruction normalization
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use fitpro_core::constants::recipes::MAX_INSTRUCTION_CHARS;
use fitpro_core::errors::{AppError, AppResult};
use fitpro_core::models::{Difficulty, Ingredient, MacroOverrides, RecipeDraft};
use serde_json::json;

/// A draft that passed validation, with trimmed title and instructions
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedDraft {
    /// Trimmed title
    pub title: String,
    /// Visible to other users
    pub is_public: bool,
    /// Vegan flag
    pub is_vegan: bool,
    /// Difficulty rating
    pub difficulty: Difficulty,
    /// Number of portions (> 0)
    pub portions: u32,
    /// Preparation minutes (> 0)
    pub prep_time_mins: u32,
    /// Cooking minutes (> 0)
    pub cook_time_mins: u32,
    /// Ingredients with trimmed names
    pub ingredients: Vec<Ingredient>,
    /// Non-empty trimmed steps
    pub instructions: Vec<String>,
    /// Whole-recipe overrides
    pub overrides: MacroOverrides,
}

fn require_positive(value: u32, field: &'static str) -> AppResult<u32> {
    if value == 0 {
        return Err(AppError::value_out_of_range(format!("{field} must be greater than 0"))
            .with_details(json!({ "field": field })));
    }
    Ok(value)
}

fn validate_overrides(overrides: &MacroOverrides) -> AppResult<()> {
    let values = [
        overrides.calories,
        overrides.protein_g,
        overrides.carbs_g,
        overrides.fat_g,
    ];
    if values.into_iter().flatten().any(|v| !v.is_finite() || v < 0.0) {
        return Err(AppError::value_out_of_range(
            "Nutrition overrides must not be negative",
        ));
    }
    Ok(())
}

/// Validate and normalize a recipe draft
///
/// # Errors
///
/// Returns `MissingRequiredField` for a blank title or missing difficulty,
/// `ValueOutOfRange` for zero portions or times, a blank ingredient name, a
/// non-positive ingredient amount or a negative override, and `InvalidInput` for an
/// instruction step longer than the allowed length.
pub fn validate_recipe_draft(draft: RecipeDraft) -> AppResult<ValidatedDraft> {
    let title = draft.title.trim().to_owned();
    if title.is_empty() {
        return Err(AppError::missing_field("title"));
    }
    let difficulty = draft
        .difficulty
        .ok_or_else(|| AppError::missing_field("difficulty"))?;

    let portions = require_positive(draft.portions, "portions")?;
    let prep_time_mins = require_positive(draft.prep_time_mins, "prep_time_mins")?;
    let cook_time_mins = require_positive(draft.cook_time_mins, "cook_time_mins")?;

    let mut ingredients = Vec::with_capacity(draft.ingredients.len());
    for (index, mut ingredient) in draft.ingredients.into_iter().enumerate() {
        let name = ingredient.name.trim();
        if name.is_empty() {
            return Err(AppError::value_out_of_range("Ingredient name must not be empty")
                .with_details(json!({ "ingredient": index })));
        }
        if !ingredient.amount.is_finite() || ingredient.amount <= 0.0 {
            return Err(AppError::value_out_of_range(format!(
                "Ingredient '{name}' needs an amount greater than 0"
            ))
            .with_details(json!({ "ingredient": index })));
        }
        ingredient.name = name.to_owned();
        ingredients.push(ingredient);
    }

    let mut instructions = Vec::with_capacity(draft.instructions.len());
    for step in &draft.instructions {
        let step = step.trim();
        if step.is_empty() {
            continue;
        }
        let chars = step.chars().count();
        if chars > MAX_INSTRUCTION_CHARS {
            return Err(AppError::invalid_input(format!(
                "Instruction step {} has {chars} characters, limit is {MAX_INSTRUCTION_CHARS}",
                instructions.len() + 1
            )));
        }
        instructions.push(step.to_owned());
    }

    validate_overrides(&draft.overrides)?;

    Ok(ValidatedDraft {
        title,
        is_public: draft.is_public,
        is_vegan: draft.is_vegan,
        difficulty,
        portions,
        prep_time_mins,
        cook_time_mins,
        ingredients,
        instructions,
        overrides: draft.overrides,
    })
}
