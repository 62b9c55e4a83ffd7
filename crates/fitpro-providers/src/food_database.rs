// ABOUTME: Food database provider trait and lookup outcome types
// ABOUTME: Text search returns normalized candidates; barcode lookup distinguishes not-found from errors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use async_trait::async_trait;
use fitpro_core::errors::ProviderError;
use fitpro_core::models::FoodCandidate;
use serde::{Deserialize, Serialize};

/// Result of a barcode lookup
///
/// An unmatched barcode is a normal outcome, never an error.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "status", content = "food", rename_all = "snake_case")]
pub enum BarcodeLookup {
    /// The product exists and has usable nutrition data
    Found(FoodCandidate),
    /// No product, or a product without usable name or nutrition data
    NotFound,
}

impl BarcodeLookup {
    /// The matched food, if any
    #[must_use]
    pub fn into_food(self) -> Option<FoodCandidate> {
        match self {
            Self::Found(food) => Some(food),
            Self::NotFound => None,
        }
    }
}

/// Read-only food database queried by free text or barcode
#[async_trait]
pub trait FoodDatabaseProvider: Send + Sync {
    /// Provider name for logs and errors
    fn name(&self) -> &'static str;

    /// Search foods by free text
    ///
    /// Products without a usable name or without any calorie or macro data are
    /// dropped.
    ///
    /// # Errors
    ///
    /// Returns a [`ProviderError`] on transport failure, timeout, non-success status,
    /// or an unreadable body
    async fn search(&self, query: &str) -> Result<Vec<FoodCandidate>, ProviderError>;

    /// Look up a single product by barcode
    ///
    /// # Errors
    ///
    /// Returns a [`ProviderError`] for service failures; an unknown barcode yields
    /// `Ok(BarcodeLookup::NotFound)`
    async fn lookup_barcode(&self, barcode: &str) -> Result<BarcodeLookup, ProviderError>;
}
