// ABOUTME: Onboarding wizard steps, each validating and persisting only its own profile fields
// ABOUTME: The finish step runs the metrics calculator and stores derived targets
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::errors::{AppError, AppResult};
use crate::stores::ProfileStore;
use chrono::{NaiveDate, Utc};
use fitpro_core::constants::nutrition::MIN_ONBOARDING_AGE;
use fitpro_core::models::{
    ActivityLevel, Gender, Goal, Occupation, OnboardingStep, ProfileUpdate, UserProfile,
};
use fitpro_core::parsing::{safe_parse_number, ParseOptions};
use fitpro_intelligence::{
    calculate_user_metrics, has_required_age, CalculatedMetrics, NutritionConfig,
};
use serde_json::json;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Drives the onboarding wizard against the profile store
#[derive(Clone)]
pub struct OnboardingService {
    profiles: Arc<dyn ProfileStore>,
    config: NutritionConfig,
}

impl OnboardingService {
    /// Service using the given nutrition configuration
    #[must_use]
    pub fn new(profiles: Arc<dyn ProfileStore>, config: NutritionConfig) -> Self {
        Self { profiles, config }
    }

    /// Service using the global nutrition configuration
    #[must_use]
    pub fn with_global_config(profiles: Arc<dyn ProfileStore>) -> Self {
        Self::new(profiles, NutritionConfig::global().clone())
    }

    /// Birthday step; the user must be at least 18 on `today`
    ///
    /// # Errors
    ///
    /// Returns `ValueOutOfRange` for an underage or future birthday
    #[instrument(skip(self), fields(step = "birthday"))]
    pub async fn save_birthday(
        &self,
        user_id: &str,
        birthday: NaiveDate,
        today: NaiveDate,
    ) -> AppResult<UserProfile> {
        if !has_required_age(MIN_ONBOARDING_AGE, birthday, today) {
            return Err(AppError::value_out_of_range(format!(
                "You must be at least {MIN_ONBOARDING_AGE} years old"
            ))
            .with_user_id(user_id));
        }
        self.write(
            user_id,
            ProfileUpdate {
                birthday: Some(birthday),
                ..ProfileUpdate::default()
            },
        )
        .await
    }

    /// Lifestyle step: occupation and activity level
    ///
    /// # Errors
    ///
    /// Returns an error if the profile store fails
    #[instrument(skip(self), fields(step = "lifestyle"))]
    pub async fn save_lifestyle(
        &self,
        user_id: &str,
        occupation: Occupation,
        activity_level: ActivityLevel,
    ) -> AppResult<UserProfile> {
        self.write(
            user_id,
            ProfileUpdate {
                occupation: Some(occupation),
                activity_level: Some(activity_level),
                ..ProfileUpdate::default()
            },
        )
        .await
    }

    /// Body step: gender plus leniently parsed height and weight
    ///
    /// # Errors
    ///
    /// Returns `ValueOutOfRange` if height or weight does not parse to a positive number
    #[instrument(skip(self), fields(step = "body"))]
    pub async fn save_body(
        &self,
        user_id: &str,
        gender: Gender,
        height_input: &str,
        weight_input: &str,
    ) -> AppResult<UserProfile> {
        let height_cm = positive_input(height_input, "height")?;
        let weight_kg = positive_input(weight_input, "weight")?;
        self.write(
            user_id,
            ProfileUpdate {
                gender: Some(gender),
                height_cm: Some(height_cm),
                weight_kg: Some(weight_kg),
                ..ProfileUpdate::default()
            },
        )
        .await
    }

    /// Goal step
    ///
    /// For loss the target weight must be below the stored weight, for gain above it.
    /// Choosing maintenance clears any earlier target weight and date.
    ///
    /// # Errors
    ///
    /// Returns `MissingRequiredField` when a non-maintenance goal has no target weight,
    /// and `ValueOutOfRange` when the target contradicts the goal
    #[instrument(skip(self), fields(step = "goal"))]
    pub async fn save_goal(
        &self,
        user_id: &str,
        goal: Goal,
        target_weight_input: Option<&str>,
        target_date: Option<NaiveDate>,
    ) -> AppResult<UserProfile> {
        if !goal.requires_target_weight() {
            return self
                .write(
                    user_id,
                    ProfileUpdate {
                        goal: Some(goal),
                        clear_target_weight: true,
                        ..ProfileUpdate::default()
                    },
                )
                .await;
        }

        let target = target_weight_input
            .map(|raw| safe_parse_number(raw, ParseOptions::default()))
            .filter(|w| *w > 0.0)
            .ok_or_else(|| AppError::missing_field("target_weight").with_user_id(user_id))?;

        let current = self
            .profiles
            .get_profile(user_id)
            .await?
            .and_then(|p| p.weight_kg);
        if let Some(current) = current {
            let consistent = match goal {
                Goal::WeightLoss => target < current,
                Goal::WeightGain => target > current,
                Goal::Maintenance => true,
            };
            if !consistent {
                return Err(AppError::value_out_of_range(format!(
                    "Target weight {target} kg does not match goal {goal} from {current} kg"
                ))
                .with_user_id(user_id)
                .with_details(json!({ "field": "target_weight" })));
            }
        }

        self.write(
            user_id,
            ProfileUpdate {
                goal: Some(goal),
                target_weight_kg: Some(target),
                target_date,
                ..ProfileUpdate::default()
            },
        )
        .await
    }

    /// Finish step: compute targets from the stored profile and mark it onboarded
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` without a profile, and the calculator's error if any
    /// required field is missing; nothing is written in either case
    #[instrument(skip(self), fields(step = "finish"))]
    pub async fn finish(&self, user_id: &str, today: NaiveDate) -> AppResult<CalculatedMetrics> {
        let profile = self
            .profiles
            .get_profile(user_id)
            .await?
            .ok_or_else(|| AppError::not_found("Profile").with_user_id(user_id))?;

        let metrics = calculate_user_metrics(&profile, today, &self.config).inspect_err(|e| {
            warn!(user_id, error = %e, "Onboarding cannot finish");
        })?;

        self.write(
            user_id,
            ProfileUpdate {
                completion: Some(metrics.into_derived()),
                ..ProfileUpdate::default()
            },
        )
        .await?;

        info!(
            user_id,
            bmr = metrics.bmr,
            tdee = metrics.tdee,
            calorie_target = metrics.daily_calorie_target,
            "Onboarding complete"
        );
        Ok(metrics)
    }

    /// First incomplete step, `None` once onboarded
    ///
    /// # Errors
    ///
    /// Returns an error if the profile store fails
    pub async fn next_step(&self, user_id: &str) -> AppResult<Option<OnboardingStep>> {
        let profile = self
            .profiles
            .get_profile(user_id)
            .await?
            .unwrap_or_else(|| UserProfile::new(user_id));
        Ok(profile.next_onboarding_step())
    }

    async fn write(&self, user_id: &str, update: ProfileUpdate) -> AppResult<UserProfile> {
        self.profiles.merge_profile(user_id, update, Utc::now()).await
    }
}

fn positive_input(raw: &str, field: &'static str) -> AppResult<f64> {
    let value = safe_parse_number(raw, ParseOptions::default());
    if value <= 0.0 {
        return Err(
            AppError::value_out_of_range(format!("{field} must be a positive number"))
                .with_details(json!({ "field": field, "input": raw })),
        );
    }
    Ok(value)
}
