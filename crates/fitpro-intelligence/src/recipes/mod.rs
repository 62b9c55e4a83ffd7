// ABOUTME: Recipe calculations: per-portion nutrition, list filtering and sorting, draft validation
// ABOUTME: Pure helpers used by the recipe service before and after persistence
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Recipes Module
//!
//! - `nutrition`: per-portion macros from per-100g ingredient data or author overrides
//! - `filters`: title search, vegan filter, and the four list sort orders
//! - `validation`: checks a draft before it is written and normalizes instructions

/// Recipe list search, filter, and sort
pub mod filters;
/// Per-portion nutrition
pub mod nutrition;
/// Draft validation and normalization
pub mod validation;

pub use filters::{apply_recipe_filters, RecipeFilters, RecipeSort};
pub use nutrition::calculate_recipe_nutrition;
pub use validation::{validate_recipe_draft, ValidatedDraft};
