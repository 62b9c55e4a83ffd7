// ABOUTME: Food database commands for fitpro-cli: text search and barcode lookup
// ABOUTME: Queries Open Food Facts with the configured client settings
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::helpers::display::{display_candidate, print_json};
use fitpro::config::AppConfig;
use fitpro::errors::AppResult;
use fitpro_providers::{BarcodeLookup, FoodDatabaseProvider, OpenFoodFactsClient};
use tracing::info;

type Result<T> = AppResult<T>;

/// Search by name and print one line per match
pub async fn search(config: &AppConfig, query: &str) -> Result<()> {
    let client = OpenFoodFactsClient::new(config.food_database.client_config())?;
    let foods = client.search(query).await?;
    info!(query, results = foods.len(), "Food search finished");

    if foods.is_empty() {
        println!("No foods found for '{query}'");
        return Ok(());
    }
    for food in &foods {
        display_candidate(food);
    }
    Ok(())
}

/// Look up a barcode and print the product as JSON
pub async fn barcode(config: &AppConfig, code: &str) -> Result<()> {
    let client = OpenFoodFactsClient::new(config.food_database.client_config())?;
    match client.lookup_barcode(code).await? {
        BarcodeLookup::Found(food) => print_json(&food),
        BarcodeLookup::NotFound => {
            println!("No product with nutrition data for barcode {code}");
            Ok(())
        }
    }
}
