// ABOUTME: Core data models for the FitPro nutrition and recipe tracker
// ABOUTME: Re-exports profile, food diary, and recipe types
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Data Models
//!
//! Plain serializable records shared by the calculators, providers, stores and services.
//!
//! ## Core Models
//!
//! - `UserProfile`: biometric inputs plus the derived targets written at onboarding
//! - `FoodEntry`: one logged food item with absolute macros for the logged amount
//! - `FoodCandidate`: a normalized food database result with per-100g nutrition
//! - `Recipe`: an authored recipe with ingredients, instructions and per-portion nutrition

/// Food diary models
pub mod food;
/// User profile models
pub mod profile;
/// Recipe models
pub mod recipe;

pub use food::{
    day_key, parse_day_key, round1, FoodCandidate, FoodEntry, MacroTotals, MealType,
    NewFoodEntry, NutritionPer100g, RecentFood,
};
pub use profile::{
    ActivityLevel, DerivedMetrics, Gender, Goal, Occupation, OnboardingStep, ProfileUpdate,
    UserProfile,
};
pub use recipe::{
    Difficulty, Ingredient, MacroOverrides, NutritionSource, Recipe, RecipeDraft,
    RecipeNutrition, RecipeRelation, RecipeSocialState, RelationKind,
};
