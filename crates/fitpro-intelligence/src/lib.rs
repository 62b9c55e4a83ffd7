// ABOUTME: Nutrition intelligence crate for FitPro
// ABOUTME: Target calculation, portion scaling, daily aggregation, and recipe nutrition
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # FitPro Intelligence
//!
//! Synchronous, side-effect free calculations. Every function takes its inputs and a
//! [`config::NutritionConfig`] (or part of it) explicitly so it can be tested without
//! any store, network, or global state.
//!
//! ## Modules
//!
//! - **config**: nutrition coefficients, goal rules, fallback targets
//! - **`metrics_calculator`**: age, BMR, TDEE, calorie and macro targets
//! - **portion**: per-100g to logged-amount scaling
//! - **`daily_summary`**: per-meal and per-day aggregation against targets
//! - **recipes**: per-portion recipe nutrition, list filters, draft validation

/// Nutrition configuration
pub mod config;

/// Food log aggregation
pub mod daily_summary;

/// Energy and macro target calculation
pub mod metrics_calculator;

/// Portion scaling and entry construction
pub mod portion;

/// Recipe nutrition, filters, and validation
pub mod recipes;

pub use config::{ConfigError, NutritionConfig};
pub use daily_summary::{summarize_day, DailyNutritionSummary, DailyTargets, MealSummary};
pub use metrics_calculator::{
    calculate_age, calculate_user_metrics, has_required_age, CalculatedMetrics,
};
