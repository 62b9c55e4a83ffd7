// ABOUTME: Integration tests for the food database client, debounced search, and portions
// ABOUTME: Runs the OpenFoodFacts client against a local canned HTTP server
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use common::{candidate, init_test_logging, CannedServer};
use fitpro_core::errors::{AppError, ErrorCode, ProviderError};
use fitpro_core::models::MealType;
use fitpro_intelligence::portion::{
    entries_for_batch, entry_from_candidate, parse_amount, preview_totals, PendingItem,
};
use fitpro_providers::{
    BarcodeLookup, DebouncedSearch, FoodDatabaseProvider, MockFoodDatabase, OpenFoodFactsClient,
    OpenFoodFactsConfig, SearchOutcome,
};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;

fn client_for(server: &CannedServer) -> OpenFoodFactsClient {
    OpenFoodFactsClient::new(OpenFoodFactsConfig {
        base_url: server.base_url.clone(),
        timeout_secs: 2,
        connect_timeout_secs: 2,
        ..OpenFoodFactsConfig::default()
    })
    .unwrap()
}

fn search_body() -> String {
    json!({
        "count": 3,
        "products": [
            {
                "code": "4000417025005",
                "product_name": "Greek style yogurt",
                "product_name_de": "Joghurt griechischer Art",
                "brands": "Milbona, Lidl",
                "nutrition_grades": "C",
                "nutriments": {
                    "energy-kcal_100g": "115",
                    "proteins_100g": 3.2,
                    "carbohydrates_100g": 4.04,
                    "fat_100g": 10
                }
            },
            {
                "_id": 4_001_234_567_890_u64,
                "product_name": "Skyr",
                "nutriments": { "energy_100g": 272, "proteins_100g": 11 }
            },
            { "product_name": "Mystery jar", "nutriments": {} },
            { "nutriments": { "energy-kcal_100g": 50 } }
        ]
    })
    .to_string()
}

#[tokio::test]
async fn test_search_normalizes_products() {
    init_test_logging();
    let server = CannedServer::start(200, search_body()).await;
    let client = client_for(&server);

    let foods = client.search("greek yogurt").await.unwrap();
    assert_eq!(foods.len(), 2);

    let yogurt = &foods[0];
    assert_eq!(yogurt.name, "Joghurt griechischer Art");
    assert_eq!(yogurt.brand.as_deref(), Some("Milbona"));
    assert_eq!(yogurt.barcode.as_deref(), Some("4000417025005"));
    assert_eq!(yogurt.nutriscore.as_deref(), Some("c"));
    assert!((yogurt.nutrition.calories - 115.0).abs() < f64::EPSILON);
    assert!((yogurt.nutrition.carbs_g - 4.0).abs() < 1e-9);
    assert_eq!(yogurt.nutrition.fiber_g, None);

    // 272 kJ / 4.184 = 65 kcal
    let skyr = &foods[1];
    assert_eq!(skyr.barcode.as_deref(), Some("4001234567890"));
    assert!((skyr.nutrition.calories - 65.0).abs() < f64::EPSILON);

    let request = server.request(0);
    assert!(request.starts_with("GET /cgi/search.pl?"));
    assert!(request.contains("search_terms=greek+yogurt"));
    assert!(request.contains("json=1"));
    assert!(request.contains("FitPro/1.0"));
}

#[tokio::test]
async fn test_search_results_are_cached() {
    init_test_logging();
    let server = CannedServer::start(200, search_body()).await;
    let client = client_for(&server);

    client.search("Skyr").await.unwrap();
    client.search("  skyr ").await.unwrap();
    assert_eq!(server.request_count(), 1);
    assert_eq!(client.cache_len().await, 1);

    client.clear_cache().await;
    client.search("skyr").await.unwrap();
    assert_eq!(server.request_count(), 2);
}

#[tokio::test]
async fn test_short_query_skips_network() {
    let server = CannedServer::start(200, search_body()).await;
    let client = client_for(&server);
    assert!(client.search(" a ").await.unwrap().is_empty());
    assert_eq!(server.request_count(), 0);
}

#[tokio::test]
async fn test_http_error_maps_to_provider_error() {
    init_test_logging();
    let server = CannedServer::start(503, "{\"error\":\"maintenance\"}".to_owned()).await;
    let client = client_for(&server);

    let err = client.search("oats").await.unwrap_err();
    assert!(matches!(err, ProviderError::HttpStatus { status: 503, .. }));
    let app: AppError = err.into();
    assert_ne!(app.code, ErrorCode::InvalidInput);
}

#[tokio::test]
async fn test_barcode_lookup_found() {
    let body = json!({
        "status": 1,
        "product": {
            "product_name": "Nutella",
            "nutriments": { "energy-kcal_100g": 539, "fat_100g": 30.9, "sugars_100g": 56.3 }
        }
    })
    .to_string();
    let server = CannedServer::start(200, body).await;
    let client = client_for(&server);

    let food = client.lookup_barcode("3017620422003").await.unwrap().into_food().unwrap();
    assert_eq!(food.name, "Nutella");
    assert_eq!(food.barcode.as_deref(), Some("3017620422003"));
    assert_eq!(food.nutrition.sugar_g, Some(56.3));
    assert!(server.request(0).starts_with("GET /api/v2/product/3017620422003.json"));
}

#[tokio::test]
async fn test_barcode_lookup_not_found_variants() {
    let missing = CannedServer::start(404, "{}".to_owned()).await;
    assert!(matches!(
        client_for(&missing).lookup_barcode("123").await.unwrap(),
        BarcodeLookup::NotFound
    ));

    let status_zero = CannedServer::start(200, json!({ "status": 0 }).to_string()).await;
    assert!(matches!(
        client_for(&status_zero).lookup_barcode("123").await.unwrap(),
        BarcodeLookup::NotFound
    ));

    let no_nutrition = CannedServer::start(
        200,
        json!({ "status": 1, "product": { "product_name": "Water", "nutriments": {} } }).to_string(),
    )
    .await;
    assert!(matches!(
        client_for(&no_nutrition).lookup_barcode("123").await.unwrap(),
        BarcodeLookup::NotFound
    ));
}

#[tokio::test]
async fn test_debounced_search_latest_query_wins() {
    init_test_logging();
    let provider = Arc::new(MockFoodDatabase::new());
    let search = Arc::new(DebouncedSearch::with_debounce(
        provider.clone(),
        Duration::from_millis(50),
    ));

    let first = {
        let search = search.clone();
        tokio::spawn(async move { search.submit("hafer").await })
    };
    sleep(Duration::from_millis(10)).await;
    let second = search.submit("apple").await;

    assert!(first.await.unwrap().is_superseded());
    assert_eq!(second.results().len(), 1);
    assert_eq!(second.results()[0].name, "Apple");
    assert_eq!(provider.search_calls(), 1);
}

#[tokio::test]
async fn test_cancel_drops_pending_search() {
    let provider = Arc::new(MockFoodDatabase::new());
    let search = Arc::new(DebouncedSearch::with_debounce(
        provider.clone(),
        Duration::from_millis(50),
    ));

    let pending = {
        let search = search.clone();
        tokio::spawn(async move { search.submit("apple").await })
    };
    sleep(Duration::from_millis(10)).await;
    search.cancel();

    assert!(pending.await.unwrap().is_superseded());
    assert_eq!(provider.search_calls(), 0);
}

#[tokio::test]
async fn test_debounced_search_outcomes() {
    let provider = Arc::new(MockFoodDatabase::new());
    let search = DebouncedSearch::with_debounce(provider.clone(), Duration::from_millis(1));

    assert!(matches!(search.submit("a").await, SearchOutcome::TooShort));
    assert!(matches!(search.submit("zzzz").await, SearchOutcome::Empty));

    provider.set_failing(true);
    assert!(matches!(search.submit("apple").await, SearchOutcome::Failed(_)));
    assert_eq!(provider.name(), "MockFoodDatabase");
}

#[test]
fn test_portion_scaling_for_logging() {
    let oats = candidate("Oats", None, [372.0, 13.5, 58.7, 7.0]);
    let grams = parse_amount(" 40 ");
    let entry = entry_from_candidate(&oats, grams, MealType::Breakfast, common::at(8, 0));
    assert!((entry.calories - 149.0).abs() < f64::EPSILON);
    assert!((entry.protein_g - 5.4).abs() < 1e-9);
    assert!((entry.carbs_g - 23.5).abs() < 1e-9);
    assert!((entry.amount - 40.0).abs() < f64::EPSILON);
    assert_eq!(entry.unit, "g");

    assert!((parse_amount("") - 100.0).abs() < f64::EPSILON);
    assert!((parse_amount("abc") - 100.0).abs() < f64::EPSILON);
    assert!((parse_amount("-5") - 100.0).abs() < f64::EPSILON);
}

#[test]
fn test_batch_preview_and_entries() {
    let items = vec![
        PendingItem::from_input(candidate("Oats", None, [372.0, 13.5, 58.7, 7.0]), "50"),
        PendingItem::from_input(candidate("Milk", None, [64.0, 3.4, 4.8, 3.6]), "200"),
    ];
    let preview = preview_totals(&items);
    assert!((preview.calories - 314.0).abs() < f64::EPSILON);
    assert!((preview.protein_g - 13.6).abs() < 1e-9);

    let entries = entries_for_batch(&items, MealType::Breakfast, common::at(8, 0));
    assert_eq!(entries.len(), 2);
    assert!(entries.iter().all(|e| e.meal_type == MealType::Breakfast));
    assert!(entries.iter().all(|e| e.logged_at == common::at(8, 0)));
}
