// ABOUTME: Nutrition configuration for target calculation and daily aggregation
// ABOUTME: Configures BMR coefficients, activity multipliers, goal deltas, macro splits, and fallbacks
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Nutrition Configuration
//!
//! Every number the metrics calculator and the daily aggregator depend on lives here
//! as data, so a deployment can adjust it through environment overrides without
//! touching the formulas.
//!
//! # Scientific References
//!
//! - BMR: Mifflin et al. (1990) DOI: 10.1093/ajcn/51.2.241
//! - Activity factors: `McArdle`, Katch & Katch (2010), Exercise Physiology

use super::error::ConfigError;
use fitpro_core::constants::{fallback_targets, nutrition};
use fitpro_core::models::{ActivityLevel, Gender, Goal};
use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;
use std::sync::OnceLock;
use tracing::warn;

/// Global configuration singleton
static NUTRITION_CONFIG: OnceLock<NutritionConfig> = OnceLock::new();

/// Tolerance when checking that macro ratios sum to one
const RATIO_SUM_TOLERANCE: f64 = 1e-6;

/// Nutrition configuration root
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct NutritionConfig {
    /// Basal Metabolic Rate (BMR) calculation settings
    pub bmr: BmrConfig,
    /// Activity factor multipliers for TDEE calculation
    pub activity_factors: ActivityFactorsConfig,
    /// Per-goal calorie deltas and the daily floor
    pub goal_adjustments: GoalAdjustmentsConfig,
    /// Per-goal macronutrient split
    pub macro_split: MacroSplitConfig,
    /// Targets used by the aggregator when a profile has none
    pub fallback_targets: FallbackTargetsConfig,
}

/// BMR (Basal Metabolic Rate) calculation configuration
///
/// Reference: Mifflin, M.D., et al. (1990). A new predictive equation for resting energy expenditure.
/// American Journal of Clinical Nutrition, 51(2), 241-247. DOI: 10.1093/ajcn/51.2.241
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BmrConfig {
    /// Mifflin-St Jeor weight coefficient (10.0)
    pub msj_weight_coef: f64,
    /// Mifflin-St Jeor height coefficient (6.25)
    pub msj_height_coef: f64,
    /// Mifflin-St Jeor age coefficient (-5.0)
    pub msj_age_coef: f64,
    /// Mifflin-St Jeor male constant (+5)
    pub msj_male_constant: f64,
    /// Mifflin-St Jeor female constant (-161)
    pub msj_female_constant: f64,
    /// Constant when gender is undisclosed (-78, midpoint of male and female)
    pub msj_undisclosed_constant: f64,
}

impl Default for BmrConfig {
    fn default() -> Self {
        Self {
            msj_weight_coef: 10.0,
            msj_height_coef: 6.25,
            msj_age_coef: -5.0,
            msj_male_constant: 5.0,
            msj_female_constant: -161.0,
            msj_undisclosed_constant: -78.0,
        }
    }
}

impl BmrConfig {
    /// Gender-specific constant
    #[must_use]
    pub const fn gender_constant(&self, gender: Gender) -> f64 {
        match gender {
            Gender::Male => self.msj_male_constant,
            Gender::Female => self.msj_female_constant,
            Gender::Undisclosed => self.msj_undisclosed_constant,
        }
    }
}

/// Activity factor multipliers for TDEE calculation
///
/// Reference: `McArdle`, W.D., Katch, F.I., & Katch, V.L. (2010). Exercise Physiology
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ActivityFactorsConfig {
    /// Sedentary (little/no exercise): 1.2
    pub sedentary: f64,
    /// Lightly active (1-3 days/week): 1.375
    pub lightly_active: f64,
    /// Moderately active (3-5 days/week): 1.55
    pub moderately_active: f64,
    /// Very active (6-7 days/week): 1.725
    pub very_active: f64,
    /// Extremely active (physical job or 2x/day): 1.9
    pub extremely_active: f64,
}

impl Default for ActivityFactorsConfig {
    fn default() -> Self {
        Self {
            sedentary: 1.2,
            lightly_active: 1.375,
            moderately_active: 1.55,
            very_active: 1.725,
            extremely_active: 1.9,
        }
    }
}

impl ActivityFactorsConfig {
    /// Multiplier for an activity level
    #[must_use]
    pub const fn multiplier(&self, level: ActivityLevel) -> f64 {
        match level {
            ActivityLevel::Sedentary => self.sedentary,
            ActivityLevel::LightlyActive => self.lightly_active,
            ActivityLevel::ModeratelyActive => self.moderately_active,
            ActivityLevel::VeryActive => self.very_active,
            ActivityLevel::ExtremelyActive => self.extremely_active,
        }
    }
}

/// Calorie adjustments applied to TDEE per goal
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GoalAdjustmentsConfig {
    /// Delta for weight loss (kcal): -500
    pub weight_loss_delta: f64,
    /// Delta for maintenance (kcal): 0
    pub maintenance_delta: f64,
    /// Delta for weight gain (kcal): +350
    pub weight_gain_delta: f64,
    /// Floor for the daily target regardless of goal (kcal): 1200
    pub min_daily_calories: f64,
}

impl Default for GoalAdjustmentsConfig {
    fn default() -> Self {
        Self {
            weight_loss_delta: -500.0,
            maintenance_delta: 0.0,
            weight_gain_delta: 350.0,
            min_daily_calories: nutrition::MIN_DAILY_CALORIES,
        }
    }
}

impl GoalAdjustmentsConfig {
    /// Delta for a goal
    #[must_use]
    pub const fn delta(&self, goal: Goal) -> f64 {
        match goal {
            Goal::WeightLoss => self.weight_loss_delta,
            Goal::Maintenance => self.maintenance_delta,
            Goal::WeightGain => self.weight_gain_delta,
        }
    }
}

/// Share of daily calories per macronutrient (each 0-1, summing to 1)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct MacroRatios {
    /// Protein share
    pub protein: f64,
    /// Carbohydrate share
    pub carbs: f64,
    /// Fat share
    pub fat: f64,
}

impl MacroRatios {
    /// Create a ratio triple
    #[must_use]
    pub const fn new(protein: f64, carbs: f64, fat: f64) -> Self {
        Self {
            protein,
            carbs,
            fat,
        }
    }

    /// Sum of the three shares
    #[must_use]
    pub fn sum(&self) -> f64 {
        self.protein + self.carbs + self.fat
    }
}

/// Macro split per goal plus the Atwater energy factors
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MacroSplitConfig {
    /// Weight loss split: 35/35/30
    pub weight_loss: MacroRatios,
    /// Maintenance split: 30/40/30
    pub maintenance: MacroRatios,
    /// Weight gain split: 30/45/25
    pub weight_gain: MacroRatios,
    /// kcal per gram of protein
    pub kcal_per_gram_protein: f64,
    /// kcal per gram of carbohydrate
    pub kcal_per_gram_carbs: f64,
    /// kcal per gram of fat
    pub kcal_per_gram_fat: f64,
}

impl Default for MacroSplitConfig {
    fn default() -> Self {
        Self {
            weight_loss: MacroRatios::new(0.35, 0.35, 0.30),
            maintenance: MacroRatios::new(0.30, 0.40, 0.30),
            weight_gain: MacroRatios::new(0.30, 0.45, 0.25),
            kcal_per_gram_protein: nutrition::KCAL_PER_GRAM_PROTEIN,
            kcal_per_gram_carbs: nutrition::KCAL_PER_GRAM_CARBS,
            kcal_per_gram_fat: nutrition::KCAL_PER_GRAM_FAT,
        }
    }
}

impl MacroSplitConfig {
    /// Ratios for a goal
    #[must_use]
    pub const fn ratios(&self, goal: Goal) -> MacroRatios {
        match goal {
            Goal::WeightLoss => self.weight_loss,
            Goal::Maintenance => self.maintenance,
            Goal::WeightGain => self.weight_gain,
        }
    }

    /// Validate that every goal's ratios sum to one
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidWeights` naming the first goal whose split is off,
    /// and `ConfigError::InvalidRange` for a negative share or a non-positive energy factor.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for goal in Goal::ALL {
            let ratios = self.ratios(goal);
            if ratios.protein < 0.0 || ratios.carbs < 0.0 || ratios.fat < 0.0 {
                return Err(ConfigError::InvalidRange("macro ratios must not be negative"));
            }
            let sum = ratios.sum();
            if (sum - 1.0).abs() > RATIO_SUM_TOLERANCE {
                return Err(ConfigError::InvalidWeights(format!(
                    "{goal} macro ratios sum to {sum:.4}, expected 1.0"
                )));
            }
        }
        if self.kcal_per_gram_protein <= 0.0
            || self.kcal_per_gram_carbs <= 0.0
            || self.kcal_per_gram_fat <= 0.0
        {
            return Err(ConfigError::InvalidRange("kcal per gram factors must be positive"));
        }
        Ok(())
    }
}

/// Daily targets substituted when a profile target is zero or missing
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct FallbackTargetsConfig {
    /// Calories (kcal): 2000
    pub calories: f64,
    /// Protein (g): 150
    pub protein_g: f64,
    /// Carbohydrates (g): 200
    pub carbs_g: f64,
    /// Fat (g): 65
    pub fat_g: f64,
}

impl Default for FallbackTargetsConfig {
    fn default() -> Self {
        Self {
            calories: fallback_targets::CALORIES,
            protein_g: fallback_targets::PROTEIN_G,
            carbs_g: fallback_targets::CARBS_G,
            fat_g: fallback_targets::FAT_G,
        }
    }
}

impl NutritionConfig {
    /// Get the global configuration instance
    pub fn global() -> &'static Self {
        NUTRITION_CONFIG.get_or_init(|| {
            Self::load().unwrap_or_else(|e| {
                warn!("Failed to load nutrition config: {}, using defaults", e);
                Self::default()
            })
        })
    }

    /// Load configuration from defaults and environment overrides
    ///
    /// # Errors
    ///
    /// Returns an error if environment variables contain invalid values or validation fails
    pub fn load() -> Result<Self, ConfigError> {
        let config = Self::default().apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error when a multiplier, floor, or fallback is not positive, or when
    /// macro ratios for any goal do not sum to 1.0.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for level in ActivityLevel::ALL {
            if self.activity_factors.multiplier(level) <= 0.0 {
                return Err(ConfigError::InvalidRange("activity multipliers must be positive"));
            }
        }

        if self.goal_adjustments.min_daily_calories <= 0.0 {
            return Err(ConfigError::ValueOutOfRange(
                "min_daily_calories must be positive",
            ));
        }

        self.macro_split.validate()?;

        let fallbacks = &self.fallback_targets;
        if fallbacks.calories <= 0.0
            || fallbacks.protein_g <= 0.0
            || fallbacks.carbs_g <= 0.0
            || fallbacks.fat_g <= 0.0
        {
            return Err(ConfigError::ValueOutOfRange(
                "fallback targets must be positive",
            ));
        }

        Ok(())
    }

    /// Helper function to parse and apply an environment variable override
    fn apply_env_var<T: FromStr>(env_var_name: &str, target: &mut T) -> Result<(), ConfigError> {
        if let Ok(val) = env::var(env_var_name) {
            *target = val
                .trim()
                .parse()
                .map_err(|_| ConfigError::Parse(format!("Invalid {env_var_name}")))?;
        }
        Ok(())
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(mut self) -> Result<Self, ConfigError> {
        // Goal adjustments
        Self::apply_env_var(
            "FITPRO_MIN_DAILY_CALORIES",
            &mut self.goal_adjustments.min_daily_calories,
        )?;
        Self::apply_env_var(
            "FITPRO_WEIGHT_LOSS_DELTA",
            &mut self.goal_adjustments.weight_loss_delta,
        )?;
        Self::apply_env_var(
            "FITPRO_WEIGHT_GAIN_DELTA",
            &mut self.goal_adjustments.weight_gain_delta,
        )?;

        // Fallback targets
        Self::apply_env_var(
            "FITPRO_FALLBACK_CALORIES",
            &mut self.fallback_targets.calories,
        )?;
        Self::apply_env_var(
            "FITPRO_FALLBACK_PROTEIN_G",
            &mut self.fallback_targets.protein_g,
        )?;
        Self::apply_env_var("FITPRO_FALLBACK_CARBS_G", &mut self.fallback_targets.carbs_g)?;
        Self::apply_env_var("FITPRO_FALLBACK_FAT_G", &mut self.fallback_targets.fat_g)?;

        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(NutritionConfig::default().validate().is_ok());
    }

    #[test]
    fn test_default_ratios_sum_to_one() {
        let split = MacroSplitConfig::default();
        for goal in Goal::ALL {
            assert!((split.ratios(goal).sum() - 1.0).abs() < 1e-9, "{goal}");
        }
    }

    #[test]
    fn test_bad_ratio_sum_is_rejected() {
        let mut config = NutritionConfig::default();
        config.macro_split.weight_gain = MacroRatios::new(0.3, 0.5, 0.3);
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidWeights(_)));
        assert!(err.to_string().contains("weight_gaining"));
    }

    #[test]
    fn test_non_positive_values_rejected() {
        let mut config = NutritionConfig::default();
        config.activity_factors.very_active = 0.0;
        assert!(config.validate().is_err());

        let mut config = NutritionConfig::default();
        config.fallback_targets.fat_g = -1.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_undisclosed_constant_is_midpoint() {
        let bmr = BmrConfig::default();
        let midpoint = (bmr.msj_male_constant + bmr.msj_female_constant) / 2.0;
        assert!((bmr.gender_constant(Gender::Undisclosed) - midpoint).abs() < f64::EPSILON);
    }
}
