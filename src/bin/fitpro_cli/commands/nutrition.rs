// ABOUTME: Nutrition commands for fitpro-cli: metrics calculation and diary summaries
// ABOUTME: Pure calculations over command-line input and exported diary files
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::helpers::display::{display_metrics, display_summary, print_json};
use chrono::{NaiveDate, Utc};
use fitpro::errors::{AppError, AppResult};
use fitpro_core::models::{ActivityLevel, FoodEntry, Gender, Goal};
use fitpro_intelligence::metrics_calculator::{calculate_metrics, MetricsInput};
use fitpro_intelligence::{calculate_age, summarize_day, DailyTargets, NutritionConfig};
use serde::Deserialize;
use std::path::Path;
use tokio::fs;
use tracing::{debug, info};

type Result<T> = AppResult<T>;

/// Inputs of the `metrics` command
pub struct MetricsArgs {
    pub weight_kg: f64,
    pub height_cm: f64,
    pub birthday: Option<NaiveDate>,
    pub age: Option<u32>,
    pub gender: Gender,
    pub activity_level: ActivityLevel,
    pub goal: Goal,
    pub json: bool,
}

/// Optional target overrides of the `summary` command
pub struct TargetArgs {
    pub calories: Option<f64>,
    pub protein_g: Option<f64>,
    pub carbs_g: Option<f64>,
    pub fat_g: Option<f64>,
}

/// One entry of a diary export
///
/// Exports written per diary day carry the day key next to the entry. Older exports
/// without it are bucketed by the UTC date of `logged_at`, which only matches the
/// diary day when the entry was logged on the same UTC date.
#[derive(Deserialize)]
struct ExportedEntry {
    #[serde(default)]
    day: Option<NaiveDate>,
    #[serde(flatten)]
    entry: FoodEntry,
}

impl ExportedEntry {
    fn day(&self) -> NaiveDate {
        self.day.unwrap_or_else(|| self.entry.logged_at.date_naive())
    }
}

/// Entries of the export that belong to `date`, or all of them
fn entries_for_day(exported: Vec<ExportedEntry>, date: Option<NaiveDate>) -> Vec<FoodEntry> {
    exported
        .into_iter()
        .filter(|e| date.is_none_or(|d| e.day() == d))
        .map(|e| e.entry)
        .collect()
}

/// Calculate and print daily targets
pub fn metrics(args: MetricsArgs) -> Result<()> {
    let age = match (args.birthday, args.age) {
        (Some(birthday), _) => calculate_age(birthday, Utc::now().date_naive()).ok_or_else(
            || AppError::invalid_input(format!("Birthday {birthday} is in the future")),
        )?,
        (None, Some(age)) => age,
        (None, None) => return Err(AppError::missing_field("birthday or age")),
    };

    let input = MetricsInput {
        weight_kg: args.weight_kg,
        height_cm: args.height_cm,
        age,
        gender: args.gender,
        activity_level: args.activity_level,
        goal: args.goal,
    };
    let metrics = calculate_metrics(&input, NutritionConfig::global())?;
    info!(
        calorie_target = metrics.daily_calorie_target,
        "Metrics calculated"
    );
    if args.json {
        return print_json(&metrics);
    }
    display_metrics(&metrics);
    Ok(())
}

/// Summarize a JSON array of food entries
pub async fn summary(path: &Path, date: Option<NaiveDate>, targets: TargetArgs) -> Result<()> {
    let raw = fs::read_to_string(path).await.map_err(|e| {
        AppError::invalid_input(format!("Cannot read {}: {e}", path.display()))
    })?;
    let exported: Vec<ExportedEntry> = serde_json::from_str(&raw)?;
    let entries = entries_for_day(exported, date);
    debug!(count = entries.len(), "Entries loaded");

    let fallbacks = NutritionConfig::global().fallback_targets;
    let targets = DailyTargets::from_parts(
        targets.calories,
        targets.protein_g,
        targets.carbs_g,
        targets.fat_g,
        &fallbacks,
    );
    let summary = summarize_day(&entries, targets, &fallbacks);
    display_summary(&summary);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn exported(day: Option<&str>, logged_at: &str) -> serde_json::Value {
        let mut entry = json!({
            "id": "e1",
            "name": "Oats",
            "amount": 40.0,
            "unit": "g",
            "calories": 149.0,
            "protein_g": 5.4,
            "carbs_g": 23.5,
            "fat_g": 2.8,
            "meal_type": "breakfast",
            "logged_at": logged_at
        });
        if let Some(day) = day {
            entry["day"] = json!(day);
        }
        entry
    }

    #[test]
    fn test_day_key_wins_over_timestamp() {
        let raw = json!([
            exported(Some("2025-03-14"), "2025-03-13T23:30:00Z"),
            exported(None, "2025-03-14T08:00:00Z"),
            exported(Some("2025-03-15"), "2025-03-14T22:00:00Z"),
        ]);
        let parsed: Vec<ExportedEntry> = serde_json::from_value(raw).unwrap();
        let date = NaiveDate::from_ymd_opt(2025, 3, 14);

        let entries = entries_for_day(parsed, date);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].logged_at.to_rfc3339(), "2025-03-13T23:30:00+00:00");
    }

    #[test]
    fn test_no_date_keeps_everything() {
        let raw = json!([exported(None, "2025-03-14T08:00:00Z")]);
        let parsed: Vec<ExportedEntry> = serde_json::from_value(raw).unwrap();
        assert_eq!(entries_for_day(parsed, None).len(), 1);
    }
}
