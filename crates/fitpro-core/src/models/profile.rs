// ABOUTME: User profile model with biometric inputs and onboarding-derived targets
// ABOUTME: Gender, ActivityLevel, Occupation, Goal enums plus partial-merge profile updates
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::errors::AppError;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lowercase, trim, and unify separators so `"Lightly-Active"` matches `lightly_active`
fn normalize_token(s: &str) -> String {
    s.trim().to_lowercase().replace(['-', ' '], "_")
}

/// Gender used to pick the Mifflin-St Jeor offset
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    /// Male (+5 kcal offset)
    Male,
    /// Female (-161 kcal offset)
    Female,
    /// Not disclosed (midpoint offset)
    #[serde(alias = "secret")]
    Undisclosed,
}

impl FromStr for Gender {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_token(s).as_str() {
            "male" | "m" => Ok(Self::Male),
            "female" | "f" => Ok(Self::Female),
            "undisclosed" | "secret" | "other" => Ok(Self::Undisclosed),
            other => Err(AppError::invalid_input(format!("Unknown gender '{other}'"))),
        }
    }
}

/// Habitual activity level; each maps to a fixed TDEE multiplier
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    /// Little or no exercise
    Sedentary,
    /// Light exercise 1-3 days/week
    LightlyActive,
    /// Moderate exercise 3-5 days/week
    ModeratelyActive,
    /// Hard exercise 6-7 days/week
    VeryActive,
    /// Physical job or training twice a day
    #[serde(alias = "extra_active")]
    ExtremelyActive,
}

impl ActivityLevel {
    /// Every level, least to most active
    pub const ALL: [Self; 5] = [
        Self::Sedentary,
        Self::LightlyActive,
        Self::ModeratelyActive,
        Self::VeryActive,
        Self::ExtremelyActive,
    ];
}

impl FromStr for ActivityLevel {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_token(s).as_str() {
            "sedentary" => Ok(Self::Sedentary),
            "lightly_active" | "light" => Ok(Self::LightlyActive),
            "moderately_active" | "moderate" => Ok(Self::ModeratelyActive),
            "very_active" | "very" => Ok(Self::VeryActive),
            "extremely_active" | "extra_active" | "extreme" => Ok(Self::ExtremelyActive),
            other => Err(AppError::invalid_input(format!(
                "Unknown activity level '{other}'"
            ))),
        }
    }
}

/// Occupation collected during onboarding (informational only)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Occupation {
    /// Student
    Student,
    /// Full-time employee
    Fulltime,
    /// Part-time employee
    Parttime,
    /// Self-employed
    Freelance,
    /// Homemaker
    Homemaker,
    /// Retired
    Retired,
    /// Not currently employed
    Unemployed,
}

impl FromStr for Occupation {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_token(s).replace('_', "").as_str() {
            "student" => Ok(Self::Student),
            "fulltime" => Ok(Self::Fulltime),
            "parttime" => Ok(Self::Parttime),
            "freelance" | "freelancer" => Ok(Self::Freelance),
            "homemaker" => Ok(Self::Homemaker),
            "retired" => Ok(Self::Retired),
            "unemployed" => Ok(Self::Unemployed),
            other => Err(AppError::invalid_input(format!(
                "Unknown occupation '{other}'"
            ))),
        }
    }
}

/// Body-weight goal driving the calorie delta and macro split
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Goal {
    /// Lose weight (caloric deficit)
    #[serde(rename = "weight_loss", alias = "lose")]
    WeightLoss,
    /// Keep current weight
    #[serde(rename = "weight_maintaining", alias = "maintain")]
    Maintenance,
    /// Gain weight (caloric surplus)
    #[serde(rename = "weight_gaining", alias = "gain")]
    WeightGain,
}

impl Goal {
    /// Every goal
    pub const ALL: [Self; 3] = [Self::WeightLoss, Self::Maintenance, Self::WeightGain];

    /// Whether the goal needs a target weight
    #[must_use]
    pub const fn requires_target_weight(&self) -> bool {
        !matches!(self, Self::Maintenance)
    }
}

impl FromStr for Goal {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_token(s).as_str() {
            "weight_loss" | "lose" | "loss" => Ok(Self::WeightLoss),
            "weight_maintaining" | "maintain" | "maintenance" => Ok(Self::Maintenance),
            "weight_gaining" | "gain" | "weight_gain" => Ok(Self::WeightGain),
            other => Err(AppError::invalid_input(format!("Unknown goal '{other}'"))),
        }
    }
}

impl fmt::Display for Goal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::WeightLoss => "weight_loss",
            Self::Maintenance => "weight_maintaining",
            Self::WeightGain => "weight_gaining",
        };
        f.write_str(label)
    }
}

/// Targets computed once when onboarding completes
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct DerivedMetrics {
    /// Basal metabolic rate (kcal/day)
    pub basal_metabolic_rate: f64,
    /// Total daily energy expenditure (kcal/day)
    pub total_daily_energy_expenditure: f64,
    /// Daily calorie target (kcal)
    pub daily_calorie_target: f64,
    /// Daily protein target (g)
    pub daily_protein_target_g: f64,
    /// Daily carbohydrate target (g)
    pub daily_carbs_target_g: f64,
    /// Daily fat target (g)
    pub daily_fat_target_g: f64,
}

/// Onboarding wizard steps in the order they are presented
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum OnboardingStep {
    /// Date of birth
    Birthday,
    /// Occupation and activity level
    Lifestyle,
    /// Gender, height, and weight
    Body,
    /// Goal, target weight, and target date
    Goal,
    /// Review and compute targets
    Finish,
}

/// Per-user profile document
///
/// Derived targets live in `metrics`; a profile is onboarded exactly when they are
/// present, so the two can never disagree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserProfile {
    /// Owning user
    pub user_id: String,
    /// Contact email
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Date of birth
    #[serde(default)]
    pub birthday: Option<NaiveDate>,
    /// Gender
    #[serde(default)]
    pub gender: Option<Gender>,
    /// Height in centimeters
    #[serde(default)]
    pub height_cm: Option<f64>,
    /// Weight in kilograms
    #[serde(default)]
    pub weight_kg: Option<f64>,
    /// Occupation
    #[serde(default)]
    pub occupation: Option<Occupation>,
    /// Activity level
    #[serde(default)]
    pub activity_level: Option<ActivityLevel>,
    /// Weight goal
    #[serde(default)]
    pub goal: Option<Goal>,
    /// Target weight in kilograms
    #[serde(default)]
    pub target_weight_kg: Option<f64>,
    /// Date by which the target weight should be reached
    #[serde(default)]
    pub target_date: Option<NaiveDate>,
    /// Derived targets, set when onboarding finishes
    #[serde(default)]
    pub metrics: Option<DerivedMetrics>,
    /// Last write time
    pub updated_at: DateTime<Utc>,
}

impl UserProfile {
    /// Empty profile for a freshly registered user
    #[must_use]
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            email: None,
            birthday: None,
            gender: None,
            height_cm: None,
            weight_kg: None,
            occupation: None,
            activity_level: None,
            goal: None,
            target_weight_kg: None,
            target_date: None,
            metrics: None,
            updated_at: Utc::now(),
        }
    }

    /// True once onboarding has stored derived targets
    #[must_use]
    pub const fn is_onboarded(&self) -> bool {
        self.metrics.is_some()
    }

    /// Merge a partial update; only fields present in `update` are written
    pub fn apply_update(&mut self, update: ProfileUpdate, now: DateTime<Utc>) {
        macro_rules! merge {
            ($($field:ident),* $(,)?) => {
                $(if let Some(value) = update.$field {
                    self.$field = Some(value);
                })*
            };
        }
        merge!(
            email,
            birthday,
            gender,
            height_cm,
            weight_kg,
            occupation,
            activity_level,
            goal,
            target_weight_kg,
            target_date,
        );
        if update.clear_target_weight {
            self.target_weight_kg = None;
            self.target_date = None;
        }
        if let Some(metrics) = update.completion {
            self.metrics = Some(metrics);
        }
        self.updated_at = now;
    }

    /// First wizard step whose fields are still missing, `None` once onboarded
    #[must_use]
    pub fn next_onboarding_step(&self) -> Option<OnboardingStep> {
        if self.is_onboarded() {
            return None;
        }
        let step = if self.birthday.is_none() {
            OnboardingStep::Birthday
        } else if self.occupation.is_none() || self.activity_level.is_none() {
            OnboardingStep::Lifestyle
        } else if self.gender.is_none() || self.height_cm.is_none() || self.weight_kg.is_none() {
            OnboardingStep::Body
        } else if self.goal.is_none()
            || (self.goal.is_some_and(|g| g.requires_target_weight())
                && self.target_weight_kg.is_none())
        {
            OnboardingStep::Goal
        } else {
            OnboardingStep::Finish
        };
        Some(step)
    }
}

/// Partial profile write; `None` fields are left untouched
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ProfileUpdate {
    /// New email
    pub email: Option<String>,
    /// New birthday
    pub birthday: Option<NaiveDate>,
    /// New gender
    pub gender: Option<Gender>,
    /// New height (cm)
    pub height_cm: Option<f64>,
    /// New weight (kg)
    pub weight_kg: Option<f64>,
    /// New occupation
    pub occupation: Option<Occupation>,
    /// New activity level
    pub activity_level: Option<ActivityLevel>,
    /// New goal
    pub goal: Option<Goal>,
    /// New target weight (kg)
    pub target_weight_kg: Option<f64>,
    /// New target date
    pub target_date: Option<NaiveDate>,
    /// Drop target weight and date (switching to maintenance)
    #[serde(default)]
    pub clear_target_weight: bool,
    /// Derived targets; writing them completes onboarding
    pub completion: Option<DerivedMetrics>,
}
