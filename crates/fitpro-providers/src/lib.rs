// ABOUTME: Food database provider crate for FitPro
// ABOUTME: Provider trait, OpenFoodFacts client and normalization, mock provider, debounced search
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # FitPro Providers
//!
//! The food search boundary. Everything the rest of the workspace knows about the
//! external nutrition database goes through [`FoodDatabaseProvider`]; the service
//! itself is treated as unreliable and schema-drifting.

/// Debounced, last-query-wins search
pub mod debounce;
/// Provider trait and lookup outcome
pub mod food_database;
/// HTTP client construction
pub mod http_client;
/// In-memory provider
pub mod mock;
/// OpenFoodFacts implementation
pub mod open_food_facts;

pub use debounce::{DebouncedSearch, SearchOutcome};
pub use food_database::{BarcodeLookup, FoodDatabaseProvider};
pub use mock::MockFoodDatabase;
pub use open_food_facts::{OpenFoodFactsClient, OpenFoodFactsConfig};
