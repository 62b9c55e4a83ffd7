// ABOUTME: Integration tests for age, BMR, TDEE, calorie target, and macro split calculation
// ABOUTME: Covers gender offsets, the calorie floor, goal ratios, and profile-driven metrics
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use chrono::NaiveDate;
use fitpro_core::errors::ErrorCode;
use fitpro_core::models::{ActivityLevel, Gender, Goal, UserProfile};
use fitpro_intelligence::metrics_calculator::{
    calculate_bmr, calculate_calorie_target, calculate_macro_targets, calculate_metrics,
    calculate_tdee, metrics_input_from_profile, MetricsInput,
};
use fitpro_intelligence::{calculate_age, calculate_user_metrics, has_required_age, NutritionConfig};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn input(weight_kg: f64, height_cm: f64, age: u32, gender: Gender) -> MetricsInput {
    MetricsInput {
        weight_kg,
        height_cm,
        age,
        gender,
        activity_level: ActivityLevel::ModeratelyActive,
        goal: Goal::WeightLoss,
    }
}

#[test]
fn test_age_counts_completed_years() {
    assert_eq!(calculate_age(date(1990, 6, 15), date(2025, 6, 14)), Some(34));
    assert_eq!(calculate_age(date(1990, 6, 15), date(2025, 6, 15)), Some(35));
    assert_eq!(calculate_age(date(2026, 1, 1), date(2025, 6, 15)), None);
}

#[test]
fn test_required_age_boundary() {
    let today = date(2025, 3, 14);
    assert!(has_required_age(18, date(2007, 3, 14), today));
    assert!(!has_required_age(18, date(2007, 3, 15), today));
}

#[test]
fn test_bmr_gender_offsets() {
    let config = NutritionConfig::default();
    assert!((calculate_bmr(80.0, 180.0, 30, Gender::Male, &config.bmr).unwrap() - 1780.0).abs() < f64::EPSILON);
    assert!((calculate_bmr(60.0, 165.0, 25, Gender::Female, &config.bmr).unwrap() - 1345.0).abs() < f64::EPSILON);
    assert!((calculate_bmr(70.0, 172.0, 40, Gender::Undisclosed, &config.bmr).unwrap() - 1497.0).abs() < f64::EPSILON);
}

#[test]
fn test_male_female_bmr_differ_by_166() {
    let config = NutritionConfig::default();
    for (weight, height, age) in [(70.0, 175.0, 30), (80.0, 180.0, 30), (55.5, 162.3, 47), (120.0, 201.0, 65)] {
        let male = calculate_bmr(weight, height, age, Gender::Male, &config.bmr).unwrap();
        let female = calculate_bmr(weight, height, age, Gender::Female, &config.bmr).unwrap();
        assert!((male - female - 166.0).abs() < f64::EPSILON, "{weight} kg, {height} cm, {age} y");
    }
}

#[test]
fn test_bmr_rejects_non_positive_body_values() {
    let config = NutritionConfig::default();
    let err = calculate_bmr(0.0, 180.0, 30, Gender::Male, &config.bmr).unwrap_err();
    assert_eq!(err.code, ErrorCode::ValueOutOfRange);
    assert!(calculate_bmr(80.0, -1.0, 30, Gender::Male, &config.bmr).is_err());
    assert!(calculate_bmr(f64::NAN, 180.0, 30, Gender::Male, &config.bmr).is_err());
}

#[test]
fn test_tdee_multiplies_by_activity() {
    let config = NutritionConfig::default();
    let tdee = calculate_tdee(1780.0, ActivityLevel::ModeratelyActive, &config.activity_factors).unwrap();
    assert!((tdee - 2759.0).abs() < f64::EPSILON);
    assert!(calculate_tdee(0.0, ActivityLevel::Sedentary, &config.activity_factors).is_err());
}

#[test]
fn test_tdee_uses_fixed_multiplier_for_every_level() {
    let config = NutritionConfig::default();
    let expected = [
        (ActivityLevel::Sedentary, 1.2),
        (ActivityLevel::LightlyActive, 1.375),
        (ActivityLevel::ModeratelyActive, 1.55),
        (ActivityLevel::VeryActive, 1.725),
        (ActivityLevel::ExtremelyActive, 1.9),
    ];
    assert_eq!(expected.len(), ActivityLevel::ALL.len());
    for (level, multiplier) in expected {
        assert!(ActivityLevel::ALL.contains(&level));
        assert!((config.activity_factors.multiplier(level) - multiplier).abs() < f64::EPSILON);
        // 1680 times each multiplier is a whole number, so rounding cannot hide an error
        let tdee = calculate_tdee(1680.0, level, &config.activity_factors).unwrap();
        assert!((tdee - 1680.0 * multiplier).abs() < 1e-9, "{level:?}");
    }
}

#[test]
fn test_worked_example_from_bmr_1680() {
    let config = NutritionConfig::default();
    let tdee = calculate_tdee(1680.0, ActivityLevel::ModeratelyActive, &config.activity_factors).unwrap();
    assert!((tdee - 2604.0).abs() < f64::EPSILON);
    let target = calculate_calorie_target(tdee, Goal::WeightLoss, &config.goal_adjustments);
    assert!((target - 2104.0).abs() < f64::EPSILON);
    let macros = calculate_macro_targets(target, Goal::WeightLoss, &config.macro_split);
    assert!((macros.protein_g - 184.0).abs() < f64::EPSILON);
    assert!((macros.carbs_g - 184.0).abs() < f64::EPSILON);
    assert!((macros.fat_g - 70.0).abs() < f64::EPSILON);
}

#[test]
fn test_worked_example_profile() {
    // 10 * 70 + 6.25 * 175 - 5 * 30 + 5 = 1648.75
    let metrics = calculate_metrics(&input(70.0, 175.0, 30, Gender::Male), &NutritionConfig::default()).unwrap();
    assert!((metrics.bmr - 1649.0).abs() < f64::EPSILON);
    assert!((metrics.tdee - 2556.0).abs() < f64::EPSILON);
    assert!((metrics.daily_calorie_target - 2056.0).abs() < f64::EPSILON);
    assert!((metrics.daily_protein_target_g - 180.0).abs() < f64::EPSILON);
    assert!((metrics.daily_carbs_target_g - 180.0).abs() < f64::EPSILON);
    assert!((metrics.daily_fat_target_g - 69.0).abs() < f64::EPSILON);
}

#[test]
fn test_weight_loss_targets() {
    let metrics = calculate_metrics(&input(80.0, 180.0, 30, Gender::Male), &NutritionConfig::default()).unwrap();
    assert!((metrics.bmr - 1780.0).abs() < f64::EPSILON);
    assert!((metrics.tdee - 2759.0).abs() < f64::EPSILON);
    assert!((metrics.daily_calorie_target - 2259.0).abs() < f64::EPSILON);
    assert!((metrics.daily_protein_target_g - 198.0).abs() < f64::EPSILON);
    assert!((metrics.daily_carbs_target_g - 198.0).abs() < f64::EPSILON);
    assert!((metrics.daily_fat_target_g - 75.0).abs() < f64::EPSILON);
}

#[test]
fn test_calorie_target_never_below_floor() {
    let metrics = calculate_metrics(
        &MetricsInput {
            activity_level: ActivityLevel::Sedentary,
            ..input(60.0, 165.0, 25, Gender::Female)
        },
        &NutritionConfig::default(),
    )
    .unwrap();
    // 1345 * 1.2 = 1614, minus 500 would be 1114
    assert!((metrics.tdee - 1614.0).abs() < f64::EPSILON);
    assert!((metrics.daily_calorie_target - 1200.0).abs() < f64::EPSILON);
}

#[test]
fn test_maintenance_and_gain_use_their_own_split() {
    let config = NutritionConfig::default();
    let maintain = calculate_metrics(
        &MetricsInput {
            goal: Goal::Maintenance,
            ..input(80.0, 180.0, 30, Gender::Male)
        },
        &config,
    )
    .unwrap();
    assert!((maintain.daily_calorie_target - 2759.0).abs() < f64::EPSILON);
    assert!((maintain.daily_carbs_target_g - (2759.0_f64 * 0.40 / 4.0).round()).abs() < f64::EPSILON);

    let gain = calculate_metrics(
        &MetricsInput {
            goal: Goal::WeightGain,
            ..input(80.0, 180.0, 30, Gender::Male)
        },
        &config,
    )
    .unwrap();
    assert!(gain.daily_calorie_target > maintain.daily_calorie_target);
    assert!((gain.daily_fat_target_g - (gain.daily_calorie_target * 0.25 / 9.0).round()).abs() < f64::EPSILON);
}

#[test]
fn test_user_metrics_from_complete_profile() {
    let mut profile = UserProfile::new("u1");
    profile.birthday = Some(date(1995, 3, 14));
    profile.gender = Some(Gender::Male);
    profile.height_cm = Some(180.0);
    profile.weight_kg = Some(80.0);
    profile.activity_level = Some(ActivityLevel::ModeratelyActive);
    profile.goal = Some(Goal::WeightLoss);

    let metrics = calculate_user_metrics(&profile, date(2025, 3, 14), &NutritionConfig::default()).unwrap();
    assert_eq!(metrics.age, 30);
    assert!((metrics.daily_calorie_target - 2259.0).abs() < f64::EPSILON);

    let derived = metrics.into_derived();
    assert!((derived.basal_metabolic_rate - 1780.0).abs() < f64::EPSILON);
    assert!((derived.total_daily_energy_expenditure - 2759.0).abs() < f64::EPSILON);
}

#[test]
fn test_incomplete_profile_names_missing_field() {
    let mut profile = UserProfile::new("u1");
    profile.birthday = Some(date(1995, 3, 14));
    let err = metrics_input_from_profile(&profile, date(2025, 3, 14)).unwrap_err();
    assert_eq!(err.code, ErrorCode::MissingRequiredField);
}
