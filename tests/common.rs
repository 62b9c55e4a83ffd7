// ABOUTME: Shared test utilities and fixtures for integration tests
// ABOUTME: Quiet logging, food and recipe builders, and a local canned-response HTTP server
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(
    dead_code,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::unwrap_used,
    clippy::expect_used
)]
//! Shared test utilities for `fitpro`

use chrono::{DateTime, TimeZone, Utc};
use fitpro_core::models::{
    Difficulty, FoodCandidate, FoodEntry, Ingredient, MacroOverrides, MealType, NutritionPer100g,
    RecipeDraft,
};
use std::env;
use std::sync::{Arc, Mutex, Once};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        // TEST_LOG controls the level; quiet by default
        let log_level = match env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            _ => tracing::Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

/// Fixed UTC timestamp on 2025-03-14
pub fn at(hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 14, hour, minute, 0).unwrap()
}

/// Searched food with per-100g macros
pub fn candidate(name: &str, barcode: Option<&str>, macros: [f64; 4]) -> FoodCandidate {
    FoodCandidate {
        barcode: barcode.map(str::to_owned),
        name: name.to_owned(),
        brand: None,
        image_url: None,
        nutrition: NutritionPer100g {
            calories: macros[0],
            protein_g: macros[1],
            carbs_g: macros[2],
            fat_g: macros[3],
            fiber_g: None,
            sugar_g: None,
        },
        nutriscore: None,
    }
}

/// Rolled oats, 372 kcal per 100 g
pub fn oats() -> FoodCandidate {
    candidate("Rolled oats", Some("4000000000017"), [372.0, 13.5, 58.7, 7.0])
}

/// Diary entry with absolute macros
pub fn entry(
    id: &str,
    meal_type: MealType,
    macros: [f64; 4],
    logged_at: DateTime<Utc>,
) -> FoodEntry {
    FoodEntry {
        id: id.to_owned(),
        name: format!("food {id}"),
        brand: None,
        barcode: None,
        amount: 100.0,
        unit: "g".to_owned(),
        calories: macros[0],
        protein_g: macros[1],
        carbs_g: macros[2],
        fat_g: macros[3],
        fiber_g: None,
        sugar_g: None,
        meal_type,
        logged_at,
    }
}

/// Valid two-portion porridge draft
pub fn porridge_draft(is_public: bool) -> RecipeDraft {
    RecipeDraft {
        title: "  Porridge ".to_owned(),
        is_public,
        is_vegan: false,
        difficulty: Some(Difficulty::Easy),
        portions: 2,
        prep_time_mins: 5,
        cook_time_mins: 10,
        ingredients: vec![
            Ingredient::new("Oats", 80.0, "g").with_macros(372.0, 13.5, 58.7, 7.0),
            Ingredient::new("Milk", 200.0, "ml").with_macros(64.0, 3.4, 4.8, 3.6),
        ],
        instructions: vec![
            "Bring the milk to a simmer".to_owned(),
            "   ".to_owned(),
            "Stir in the oats".to_owned(),
        ],
        overrides: MacroOverrides::default(),
    }
}

/// Local HTTP server answering every request with one canned response
pub struct CannedServer {
    /// Base URL to point a client at
    pub base_url: String,
    /// Request lines received so far
    pub requests: Arc<Mutex<Vec<String>>>,
}

impl CannedServer {
    /// Start serving `body` with `status` on an ephemeral port
    pub async fn start(status: u16, body: String) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        let requests = Arc::new(Mutex::new(Vec::new()));
        let seen = requests.clone();

        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                let mut buffer = vec![0_u8; 16 * 1024];
                let mut read = 0;
                loop {
                    let Ok(n) = socket.read(&mut buffer[read..]).await else {
                        break;
                    };
                    if n == 0 {
                        break;
                    }
                    read += n;
                    if buffer[..read].windows(4).any(|w| w == b"\r\n\r\n") || read == buffer.len() {
                        break;
                    }
                }
                let request = String::from_utf8_lossy(&buffer[..read]).into_owned();
                let lines: Vec<&str> = request.lines().collect();
                let request_line = lines.first().copied().unwrap_or_default().to_owned();
                let user_agent = lines
                    .iter()
                    .find(|l| l.to_lowercase().starts_with("user-agent:"))
                    .map(|l| (*l).to_owned())
                    .unwrap_or_default();
                seen.lock().unwrap().push(format!("{request_line}\n{user_agent}"));

                let response = format!(
                    "HTTP/1.1 {status} Canned\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });

        Self { base_url, requests }
    }

    /// Number of requests served
    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// Request line and user agent of the n-th request
    pub fn request(&self, index: usize) -> String {
        self.requests.lock().unwrap()[index].clone()
    }
}
