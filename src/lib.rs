// ABOUTME: Main library entry point for the FitPro nutrition tracking platform
// ABOUTME: Wires configuration, logging, collaborator stores, sessions, and application services
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # FitPro
//!
//! Nutrition tracking built around three pieces of real logic: the Mifflin-St Jeor
//! target calculator, the daily food log aggregator, and a defensive food database
//! adapter. Everything else is orchestration against collaborator stores.
//!
//! ## Architecture
//!
//! - **`fitpro-core`**: errors, constants, domain models, lenient parsing
//! - **`fitpro-intelligence`**: pure calculations (targets, portions, summaries, recipes)
//! - **`fitpro-providers`**: food database clients and debounced search
//! - **this crate**: configuration, logging, stores with change feeds, the explicit
//!   [`session::Session`], optimistic updates, and the services that tie them together
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use chrono::Utc;
//! use fitpro::errors::AppResult;
//! use fitpro::services::FoodLogService;
//! use fitpro::session::Session;
//! use fitpro::stores::Stores;
//! use fitpro_intelligence::NutritionConfig;
//!
//! #[tokio::main]
//! async fn main() -> AppResult<()> {
//!     let stores = Stores::in_memory();
//!     let fallbacks = NutritionConfig::global().fallback_targets;
//!     let session = Session::start("user-1", stores.clone(), fallbacks).await?;
//!
//!     let food_log = FoodLogService::new(&stores, fallbacks);
//!     let today = Utc::now().date_naive();
//!     let summary = food_log
//!         .daily_summary(session.user_id(), today, session.daily_targets())
//!         .await?;
//!     println!("{} kcal left today", summary.remaining.calories);
//!
//!     session.end();
//!     Ok(())
//! }
//! ```

/// Environment configuration
pub mod config;

/// Error types re-exported from `fitpro-core`
pub mod errors;

/// Structured logging setup
pub mod logging;

/// Optimistic local state with rollback
pub mod optimistic;

/// Application services
pub mod services;

/// Explicit per-user session
pub mod session;

/// Collaborator store traits and implementations
pub mod stores;
