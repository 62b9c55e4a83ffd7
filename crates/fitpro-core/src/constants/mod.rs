// ABOUTME: Constants module with domain-separated organization
// ABOUTME: Nutrition, food search, recipe, recent food, and service constants for FitPro
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Constants module
//!
//! Constants are grouped into logical domains rather than being in a single large file.
//! Values that operators may want to tune live in configuration structs instead; the
//! numbers here are the defaults those structs start from.

/// Energy and macronutrient constants
pub mod nutrition {
    /// Kilocalories per gram of protein (Atwater factor)
    pub const KCAL_PER_GRAM_PROTEIN: f64 = 4.0;
    /// Kilocalories per gram of carbohydrate (Atwater factor)
    pub const KCAL_PER_GRAM_CARBS: f64 = 4.0;
    /// Kilocalories per gram of fat (Atwater factor)
    pub const KCAL_PER_GRAM_FAT: f64 = 9.0;
    /// Kilojoules per kilocalorie
    pub const KJ_PER_KCAL: f64 = 4.184;
    /// Hard floor for a computed daily calorie target
    pub const MIN_DAILY_CALORIES: f64 = 1200.0;
    /// Reference amount for per-100g nutrition data
    pub const REFERENCE_GRAMS: f64 = 100.0;
    /// Amount assumed when the user leaves the amount field empty
    pub const DEFAULT_PORTION_GRAMS: f64 = 100.0;
    /// Minimum age (years) to complete onboarding
    pub const MIN_ONBOARDING_AGE: i32 = 18;
}

/// Daily targets used when a profile has none
pub mod fallback_targets {
    /// Fallback calorie target (kcal)
    pub const CALORIES: f64 = 2000.0;
    /// Fallback protein target (g)
    pub const PROTEIN_G: f64 = 150.0;
    /// Fallback carbohydrate target (g)
    pub const CARBS_G: f64 = 200.0;
    /// Fallback fat target (g)
    pub const FAT_G: f64 = 65.0;
}

/// Food search boundary
pub mod food_search {
    /// Provider name used in errors and logs
    pub const PROVIDER_NAME: &str = "OpenFoodFacts";
    /// Default food database base URL
    pub const DEFAULT_BASE_URL: &str = "https://world.openfoodfacts.org";
    /// Default `User-Agent` header sent to the food database
    pub const DEFAULT_USER_AGENT: &str = "FitPro/1.0 (nutrition tracker)";
    /// Default response language
    pub const DEFAULT_LANGUAGE: &str = "de";
    /// Default country scope
    pub const DEFAULT_COUNTRY: &str = "de";
    /// Results requested per search page
    pub const DEFAULT_PAGE_SIZE: u32 = 24;
    /// Request timeout in seconds
    pub const DEFAULT_TIMEOUT_SECS: u64 = 8;
    /// Connection timeout in seconds
    pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 5;
    /// Debounce window for typed queries in milliseconds
    pub const DEFAULT_DEBOUNCE_MS: u64 = 350;
    /// Search cache TTL in seconds
    pub const DEFAULT_CACHE_TTL_SECS: u64 = 600;
    /// Queries shorter than this (after trimming) never reach the network
    pub const MIN_QUERY_CHARS: usize = 2;
    /// Sort order requested from the search endpoint
    pub const SORT_BY: &str = "unique_scans_n";
}

/// Recipe limits
pub mod recipes {
    /// Maximum characters in a single instruction step
    pub const MAX_INSTRUCTION_CHARS: usize = 300;
}

/// Recently logged foods
pub mod recent_foods {
    /// Recent foods returned by default
    pub const RECENT_FOODS_LIMIT: usize = 20;
    /// Maximum length of a name-derived recent food id
    pub const RECENT_FOOD_SLUG_MAX: usize = 60;
    /// Barcodes at or below this length are not used as ids
    pub const MIN_BARCODE_ID_LEN: usize = 3;
}

/// Service identifiers for structured logging
pub mod service_names {
    /// Library and CLI service name
    pub const FITPRO: &str = "fitpro";
}
