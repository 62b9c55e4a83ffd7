// ABOUTME: Defensive normalization of OpenFoodFacts product JSON into food candidates
// ABOUTME: Every field is optional and resolved through a fallback chain of alternate keys
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Product normalization
//!
//! The product schema drifts between endpoints, locales and product age. Nothing here
//! assumes a fixed shape: each output field walks a list of keys and the first usable
//! value wins. Numbers may arrive as JSON numbers or as numeric strings.

use fitpro_core::constants::nutrition::KJ_PER_KCAL;
use fitpro_core::models::{round1, FoodCandidate, NutritionPer100g};
use serde_json::{Map, Value};

/// Energy keys holding kilocalories, in preference order
const KCAL_KEYS: [&str; 2] = ["energy-kcal_100g", "energy-kcal"];
/// Energy keys holding kilojoules, in preference order
const KJ_KEYS: [&str; 4] = ["energy-kj_100g", "energy_100g", "energy-kj", "energy"];
const PROTEIN_KEYS: [&str; 2] = ["proteins_100g", "proteins"];
const CARBS_KEYS: [&str; 2] = ["carbohydrates_100g", "carbohydrates"];
const FAT_KEYS: [&str; 2] = ["fat_100g", "fat"];
const FIBER_KEYS: [&str; 2] = ["fiber_100g", "fiber"];
const SUGAR_KEYS: [&str; 2] = ["sugars_100g", "sugars"];
const BARCODE_KEYS: [&str; 3] = ["code", "_id", "id"];
const IMAGE_KEYS: [&str; 3] = ["image_front_small_url", "image_small_url", "image_url"];
const GRADE_KEYS: [&str; 3] = ["nutrition_grades", "nutriscore_grade", "nutriscore"];

/// Product fields requested from the API for a response language
#[must_use]
pub fn requested_fields(language: &str) -> String {
    [
        "code".to_owned(),
        "_id".to_owned(),
        "id".to_owned(),
        "product_name".to_owned(),
        format!("product_name_{language}"),
        "generic_name".to_owned(),
        format!("generic_name_{language}"),
        "abbreviated_product_name".to_owned(),
        "brands".to_owned(),
        "nutriments".to_owned(),
        "nutrient_levels".to_owned(),
        "nutrition_grades".to_owned(),
        "nutriscore_grade".to_owned(),
        "nutriscore".to_owned(),
        "image_front_small_url".to_owned(),
        "image_small_url".to_owned(),
        "image_url".to_owned(),
    ]
    .join(",")
}

/// Read a number that may be encoded as a string
#[must_use]
pub fn lenient_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    number.filter(|n| n.is_finite())
}

/// First key holding a usable number
fn first_number(object: &Map<String, Value>, keys: &[&str]) -> Option<f64> {
    keys.iter()
        .find_map(|key| object.get(*key).and_then(lenient_number))
}

/// First key holding a non-blank string, trimmed
fn first_text<'a>(object: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a str> {
    keys.iter().find_map(|key| {
        object
            .get(*key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
    })
}

/// Display name: localized product name first, then generic names
fn product_name(product: &Map<String, Value>, language: &str) -> Option<String> {
    let localized_name = format!("product_name_{language}");
    let localized_generic = format!("generic_name_{language}");
    let keys = [
        localized_name.as_str(),
        "product_name",
        localized_generic.as_str(),
        "generic_name",
        "abbreviated_product_name",
    ];
    first_text(product, &keys).map(str::to_owned)
}

/// Barcode from `code`, `_id`, or `id`, accepting strings and numbers
fn barcode(product: &Map<String, Value>) -> Option<String> {
    BARCODE_KEYS.iter().find_map(|key| match product.get(*key) {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_owned()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// First entry of the comma-separated `brands` list
fn brand(product: &Map<String, Value>) -> Option<String> {
    product
        .get("brands")
        .and_then(Value::as_str)
        .and_then(|brands| brands.split(',').next())
        .map(str::trim)
        .filter(|b| !b.is_empty())
        .map(str::to_owned)
}

/// kcal per 100 g, preferring a native kcal field and converting kJ otherwise
fn energy_kcal(nutriments: &Map<String, Value>) -> f64 {
    if let Some(kcal) = first_number(nutriments, &KCAL_KEYS).filter(|k| *k > 0.0) {
        return kcal.round();
    }
    first_number(nutriments, &KJ_KEYS)
        .filter(|kj| *kj > 0.0)
        .map_or(0.0, |kj| (kj / KJ_PER_KCAL).round())
}

/// Grams per 100 g to one decimal, zero when absent
fn grams(nutriments: &Map<String, Value>, keys: &[&str]) -> f64 {
    first_number(nutriments, keys).map_or(0.0, round1)
}

/// Per-100g nutrition from a nutriments object
#[must_use]
pub fn extract_nutrition(nutriments: &Map<String, Value>) -> NutritionPer100g {
    NutritionPer100g {
        calories: energy_kcal(nutriments),
        protein_g: grams(nutriments, &PROTEIN_KEYS),
        carbs_g: grams(nutriments, &CARBS_KEYS),
        fat_g: grams(nutriments, &FAT_KEYS),
        fiber_g: first_number(nutriments, &FIBER_KEYS).map(round1),
        sugar_g: first_number(nutriments, &SUGAR_KEYS).map(round1),
    }
}

/// Normalize one product, or `None` when it has no usable name or nutrition data
#[must_use]
pub fn normalize_product(product: &Value, language: &str) -> Option<FoodCandidate> {
    let product = product.as_object()?;
    let name = product_name(product, language)?;

    let empty = Map::new();
    let nutriments = ["nutriments", "nutrient_levels"]
        .iter()
        .find_map(|key| product.get(*key).and_then(Value::as_object))
        .unwrap_or(&empty);

    let nutrition = extract_nutrition(nutriments);
    if nutrition.is_empty() {
        return None;
    }

    Some(FoodCandidate {
        barcode: barcode(product),
        name,
        brand: brand(product),
        image_url: first_text(product, &IMAGE_KEYS).map(str::to_owned),
        nutrition,
        nutriscore: first_text(product, &GRADE_KEYS).map(str::to_lowercase),
    })
}
