// ABOUTME: Debounced food search where the latest submitted query wins
// ABOUTME: Short queries skip the network; superseded or stale results are discarded
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::food_database::FoodDatabaseProvider;
use fitpro_core::constants::food_search::{DEFAULT_DEBOUNCE_MS, MIN_QUERY_CHARS};
use fitpro_core::errors::ProviderError;
use fitpro_core::models::FoodCandidate;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

/// What a submitted query produced
#[derive(Debug)]
pub enum SearchOutcome {
    /// At least one usable candidate
    Results(Vec<FoodCandidate>),
    /// The search ran and matched nothing
    Empty,
    /// The provider failed; distinct from `Empty`
    Failed(ProviderError),
    /// Query shorter than the minimum; no request was made
    TooShort,
    /// A newer query was submitted; this result must not be shown
    Superseded,
}

impl SearchOutcome {
    /// Candidates for display, empty unless `Results`
    #[must_use]
    pub fn results(&self) -> &[FoodCandidate] {
        match self {
            Self::Results(foods) => foods,
            _ => &[],
        }
    }

    /// True for `Superseded`
    #[must_use]
    pub const fn is_superseded(&self) -> bool {
        matches!(self, Self::Superseded)
    }
}

/// Debouncer in front of a food database provider
///
/// Every `submit` takes a ticket. A submission only reaches the provider if no newer
/// ticket was issued during the debounce window, and its result is only returned if
/// no newer ticket was issued while the request was in flight.
pub struct DebouncedSearch {
    provider: Arc<dyn FoodDatabaseProvider>,
    debounce: Duration,
    generation: AtomicU64,
}

impl DebouncedSearch {
    /// Debouncer with the default 350 ms window
    #[must_use]
    pub fn new(provider: Arc<dyn FoodDatabaseProvider>) -> Self {
        Self::with_debounce(provider, Duration::from_millis(DEFAULT_DEBOUNCE_MS))
    }

    /// Debouncer with a custom window
    #[must_use]
    pub const fn with_debounce(provider: Arc<dyn FoodDatabaseProvider>, debounce: Duration) -> Self {
        Self {
            provider,
            debounce,
            generation: AtomicU64::new(0),
        }
    }

    fn is_current(&self, ticket: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == ticket
    }

    /// Invalidate any pending or in-flight submission
    pub fn cancel(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }

    /// Submit the current query text
    pub async fn submit(&self, query: &str) -> SearchOutcome {
        let ticket = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let query = query.trim();
        if query.chars().count() < MIN_QUERY_CHARS {
            return SearchOutcome::TooShort;
        }

        sleep(self.debounce).await;
        if !self.is_current(ticket) {
            debug!(query, "Search superseded during debounce");
            return SearchOutcome::Superseded;
        }

        let result = self.provider.search(query).await;
        if !self.is_current(ticket) {
            debug!(query, "Search result discarded, newer query pending");
            return SearchOutcome::Superseded;
        }

        match result {
            Ok(foods) if foods.is_empty() => SearchOutcome::Empty,
            Ok(foods) => SearchOutcome::Results(foods),
            Err(e) => {
                warn!(provider = self.provider.name(), query, error = %e, "Food search failed");
                SearchOutcome::Failed(e)
            }
        }
    }
}
