// ABOUTME: Daily energy and macro target calculation using the Mifflin-St Jeor equation
// ABOUTME: Age, BMR, TDEE, goal-adjusted calorie target, and per-goal macro gram targets
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Metrics Calculator Module
//!
//! Pure functions turning a completed profile snapshot into the targets stored at the
//! end of onboarding. Every output is rounded to a whole number. Given the same
//! profile, date and configuration the result is always the same.
//!
//! # Scientific References
//!
//! - Mifflin, M.D., et al. (1990). A new predictive equation for resting energy expenditure.
//!   *American Journal of Clinical Nutrition*, 51(2), 241-247.
//!   <https://doi.org/10.1093/ajcn/51.2.241>

use crate::config::{
    ActivityFactorsConfig, BmrConfig, GoalAdjustmentsConfig, MacroSplitConfig, NutritionConfig,
};
use chrono::{Datelike, NaiveDate};
use fitpro_core::errors::{AppError, AppResult};
use fitpro_core::models::{ActivityLevel, DerivedMetrics, Gender, Goal, UserProfile};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Everything the calculator needs, already validated as present
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct MetricsInput {
    /// Body weight (kg)
    pub weight_kg: f64,
    /// Height (cm)
    pub height_cm: f64,
    /// Age in whole years
    pub age: u32,
    /// Gender
    pub gender: Gender,
    /// Activity level
    pub activity_level: ActivityLevel,
    /// Weight goal
    pub goal: Goal,
}

/// Calculator output, including the age it was computed for
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct CalculatedMetrics {
    /// Age in years
    pub age: u32,
    /// Basal Metabolic Rate (kcal/day)
    pub bmr: f64,
    /// Total Daily Energy Expenditure (kcal/day)
    pub tdee: f64,
    /// Goal-adjusted daily calorie target (kcal)
    pub daily_calorie_target: f64,
    /// Daily protein target (g)
    pub daily_protein_target_g: f64,
    /// Daily carbohydrate target (g)
    pub daily_carbs_target_g: f64,
    /// Daily fat target (g)
    pub daily_fat_target_g: f64,
}

impl CalculatedMetrics {
    /// Fields persisted on the profile
    #[must_use]
    pub const fn into_derived(self) -> DerivedMetrics {
        DerivedMetrics {
            basal_metabolic_rate: self.bmr,
            total_daily_energy_expenditure: self.tdee,
            daily_calorie_target: self.daily_calorie_target,
            daily_protein_target_g: self.daily_protein_target_g,
            daily_carbs_target_g: self.daily_carbs_target_g,
            daily_fat_target_g: self.daily_fat_target_g,
        }
    }
}

/// Gram targets for the three macronutrients
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct MacroTargets {
    /// Protein (g)
    pub protein_g: f64,
    /// Carbohydrates (g)
    pub carbs_g: f64,
    /// Fat (g)
    pub fat_g: f64,
}

/// Whole years between `birthday` and `today`
///
/// The year difference is decremented when this year's birthday has not happened yet.
/// Returns `None` for a birthday after `today`.
#[must_use]
pub fn calculate_age(birthday: NaiveDate, today: NaiveDate) -> Option<u32> {
    if birthday > today {
        return None;
    }
    let mut age = today.year() - birthday.year();
    if (today.month(), today.day()) < (birthday.month(), birthday.day()) {
        age -= 1;
    }
    u32::try_from(age).ok()
}

/// Whether someone born on `birthday` is at least `min_age` years old on `today`
///
/// A negative minimum or a birthday in the future never qualifies.
#[must_use]
pub fn has_required_age(min_age: i32, birthday: NaiveDate, today: NaiveDate) -> bool {
    let Ok(min_age) = u32::try_from(min_age) else {
        return false;
    };
    calculate_age(birthday, today).is_some_and(|age| age >= min_age)
}

/// Calculate Basal Metabolic Rate using Mifflin-St Jeor equation (1990)
///
/// Formula: BMR = (10 x `weight_kg`) + (6.25 x `height_cm`) - (5 x age) + `gender_offset`
/// - Men: +5
/// - Women: -161
/// - Undisclosed: -78
///
/// The result is rounded to the nearest kcal.
///
/// # Errors
///
/// Returns an error if weight or height is not a positive finite number
pub fn calculate_bmr(
    weight_kg: f64,
    height_cm: f64,
    age: u32,
    gender: Gender,
    config: &BmrConfig,
) -> AppResult<f64> {
    if !weight_kg.is_finite() || weight_kg <= 0.0 {
        return Err(AppError::value_out_of_range("Weight must be positive"));
    }
    if !height_cm.is_finite() || height_cm <= 0.0 {
        return Err(AppError::value_out_of_range("Height must be positive"));
    }

    let weight_component = config.msj_weight_coef * weight_kg;
    let height_component = config.msj_height_coef * height_cm;
    let age_component = config.msj_age_coef * f64::from(age);

    let bmr = weight_component + height_component + age_component + config.gender_constant(gender);
    Ok(bmr.round())
}

/// Calculate Total Daily Energy Expenditure (TDEE)
///
/// Formula: TDEE = BMR x Activity Factor, rounded to the nearest kcal
///
/// # Errors
///
/// Returns an error if BMR is not positive
pub fn calculate_tdee(
    bmr: f64,
    activity_level: ActivityLevel,
    config: &ActivityFactorsConfig,
) -> AppResult<f64> {
    if bmr <= 0.0 {
        return Err(AppError::value_out_of_range("BMR must be positive"));
    }
    Ok((bmr * config.multiplier(activity_level)).round())
}

/// Goal-adjusted calorie target, never below the configured daily floor
#[must_use]
pub fn calculate_calorie_target(tdee: f64, goal: Goal, config: &GoalAdjustmentsConfig) -> f64 {
    (tdee + config.delta(goal)).max(config.min_daily_calories)
}

/// Split a calorie target into gram targets using the goal's ratios
///
/// Each gram target is rounded on its own, so their energy equivalent can differ from
/// the calorie target by a few kcal.
#[must_use]
pub fn calculate_macro_targets(
    calorie_target: f64,
    goal: Goal,
    config: &MacroSplitConfig,
) -> MacroTargets {
    let ratios = config.ratios(goal);
    MacroTargets {
        protein_g: (calorie_target * ratios.protein / config.kcal_per_gram_protein).round(),
        carbs_g: (calorie_target * ratios.carbs / config.kcal_per_gram_carbs).round(),
        fat_g: (calorie_target * ratios.fat / config.kcal_per_gram_fat).round(),
    }
}

/// Run the full calculation for already validated inputs
///
/// # Errors
///
/// Returns an error if weight or height is not positive, or the BMR comes out non-positive
pub fn calculate_metrics(
    input: &MetricsInput,
    config: &NutritionConfig,
) -> AppResult<CalculatedMetrics> {
    let bmr = calculate_bmr(
        input.weight_kg,
        input.height_cm,
        input.age,
        input.gender,
        &config.bmr,
    )?;
    let tdee = calculate_tdee(bmr, input.activity_level, &config.activity_factors)?;
    let daily_calorie_target = calculate_calorie_target(tdee, input.goal, &config.goal_adjustments);
    let macros = calculate_macro_targets(daily_calorie_target, input.goal, &config.macro_split);

    debug!(
        age = input.age,
        bmr,
        tdee,
        daily_calorie_target,
        goal = %input.goal,
        "Calculated nutrition targets"
    );

    Ok(CalculatedMetrics {
        age: input.age,
        bmr,
        tdee,
        daily_calorie_target,
        daily_protein_target_g: macros.protein_g,
        daily_carbs_target_g: macros.carbs_g,
        daily_fat_target_g: macros.fat_g,
    })
}

/// Collect calculator inputs from a profile snapshot
///
/// # Errors
///
/// Returns `MissingRequiredField` naming the first absent field, `ValueOutOfRange` when
/// height or weight is not positive, and `InvalidInput` for a birthday after `today`.
pub fn metrics_input_from_profile(profile: &UserProfile, today: NaiveDate) -> AppResult<MetricsInput> {
    let birthday = profile
        .birthday
        .ok_or_else(|| AppError::missing_field("birthday"))?;
    let weight_kg = profile
        .weight_kg
        .ok_or_else(|| AppError::missing_field("weight_kg"))?;
    let height_cm = profile
        .height_cm
        .ok_or_else(|| AppError::missing_field("height_cm"))?;
    let gender = profile
        .gender
        .ok_or_else(|| AppError::missing_field("gender"))?;
    let activity_level = profile
        .activity_level
        .ok_or_else(|| AppError::missing_field("activity_level"))?;
    let goal = profile.goal.ok_or_else(|| AppError::missing_field("goal"))?;

    if weight_kg <= 0.0 || height_cm <= 0.0 {
        return Err(AppError::value_out_of_range(
            "Height and weight must be positive",
        ));
    }

    let age = calculate_age(birthday, today)
        .ok_or_else(|| AppError::invalid_input("Birthday lies in the future"))?;

    Ok(MetricsInput {
        weight_kg,
        height_cm,
        age,
        gender,
        activity_level,
        goal,
    })
}

/// Compute targets for a profile as of `today`
///
/// # Errors
///
/// Returns an error if any required profile field is missing or non-positive; callers
/// must not finish onboarding in that case
pub fn calculate_user_metrics(
    profile: &UserProfile,
    today: NaiveDate,
    config: &NutritionConfig,
) -> AppResult<CalculatedMetrics> {
    let input = metrics_input_from_profile(profile, today)
        .map_err(|e| e.with_user_id(profile.user_id.clone()))?;
    calculate_metrics(&input, config)
}
