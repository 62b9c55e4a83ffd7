// ABOUTME: OpenFoodFacts provider module
// ABOUTME: HTTP client plus schema-tolerant product normalization
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! OpenFoodFacts food database
//!
//! API reference: <https://openfoodfacts.github.io/openfoodfacts-server/api/>

/// HTTP client with search cache
pub mod client;
/// Product JSON normalization
pub mod normalize;

pub use client::{OpenFoodFactsClient, OpenFoodFactsConfig};
pub use normalize::normalize_product;
