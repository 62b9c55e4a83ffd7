// ABOUTME: Output formatting helpers for fitpro-cli
// ABOUTME: Human readable tables on stdout; JSON when piping is more useful
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use fitpro::errors::AppResult;
use fitpro_core::models::{FoodCandidate, MealType};
use fitpro_intelligence::{CalculatedMetrics, DailyNutritionSummary};
use serde::Serialize;

/// Print any serializable value as pretty JSON
pub fn print_json<T: Serialize>(value: &T) -> AppResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Display calculated targets
pub fn display_metrics(metrics: &CalculatedMetrics) {
    println!("\nDaily Nutrition Targets");
    println!("{}", "=".repeat(40));
    println!("   Age:        {} years", metrics.age);
    println!("   BMR:        {:.0} kcal", metrics.bmr);
    println!("   TDEE:       {:.0} kcal", metrics.tdee);
    println!("   Calories:   {:.0} kcal", metrics.daily_calorie_target);
    println!("   Protein:    {:.0} g", metrics.daily_protein_target_g);
    println!("   Carbs:      {:.0} g", metrics.daily_carbs_target_g);
    println!("   Fat:        {:.0} g", metrics.daily_fat_target_g);
}

/// Display one food candidate on a single line
pub fn display_candidate(food: &FoodCandidate) {
    let brand = food
        .brand
        .as_deref()
        .map_or_else(String::new, |b| format!(" ({b})"));
    let barcode = food.barcode.as_deref().unwrap_or("-");
    println!(
        "{:<40} {:>7.0} kcal  P {:>5.1}  C {:>5.1}  F {:>5.1}  [{barcode}]",
        format!("{}{brand}", food.name),
        food.nutrition.calories,
        food.nutrition.protein_g,
        food.nutrition.carbs_g,
        food.nutrition.fat_g,
    );
}

/// Display a daily summary with per-meal buckets and progress
pub fn display_summary(summary: &DailyNutritionSummary) {
    println!("\nDaily Summary ({} entries)", summary.entry_count());
    println!("{}", "=".repeat(60));
    for meal_type in MealType::ALL {
        if let Some(meal) = summary.meal(meal_type) {
            println!(
                "   {:<10} {:>6.0} kcal  P {:>5.1}  C {:>5.1}  F {:>5.1}  ({} items)",
                meal_type.as_str(),
                meal.totals.calories,
                meal.totals.protein_g,
                meal.totals.carbs_g,
                meal.totals.fat_g,
                meal.entries.len(),
            );
        }
    }
    println!("{}", "-".repeat(60));
    println!(
        "   Consumed   {:>6.0} / {:.0} kcal ({:.0}%)",
        summary.consumed.calories, summary.targets.calories, summary.calorie_progress_percent
    );
    println!("   Remaining  {:>6.0} kcal", summary.remaining.calories);
    if summary.is_over_calories() {
        println!("   Over the calorie target");
    }
}
