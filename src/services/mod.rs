// ABOUTME: Application services composing the pure calculators with the collaborator stores
// ABOUTME: Onboarding, food logging, recent foods, recipes, and image reference resolution
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Services
//!
//! Each service validates input, calls into `fitpro-intelligence` for the arithmetic,
//! and writes through the store traits. None of them keeps state of its own beyond
//! the store handles and configuration it was built with.

/// Food diary logging and live daily summaries
pub mod food_log;
/// Image reference parsing and URL re-resolution
pub mod images;
/// Step-by-step profile onboarding
pub mod onboarding;
/// Recently logged foods
pub mod recent_foods;
/// Recipe authoring, discovery, likes and saves
pub mod recipes;

pub use food_log::{DailySummaryWatch, FoodLogService};
pub use images::{recipe_image_path, resolve_image_url, storage_path_from_url};
pub use onboarding::OnboardingService;
pub use recent_foods::{recent_food_id, RecentFoodService};
pub use recipes::{ImageUpload, RecipeService};
