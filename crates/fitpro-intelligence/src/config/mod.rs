// ABOUTME: Configuration module for fitpro-intelligence crate
// ABOUTME: Re-exports nutrition configuration types and the configuration error
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Configuration validation errors
pub mod error;
/// Nutrition formula coefficients, goal rules, and fallback targets
pub mod nutrition;

pub use error::ConfigError;
pub use nutrition::{
    ActivityFactorsConfig, BmrConfig, FallbackTargetsConfig, GoalAdjustmentsConfig,
    MacroRatios, MacroSplitConfig, NutritionConfig,
};
