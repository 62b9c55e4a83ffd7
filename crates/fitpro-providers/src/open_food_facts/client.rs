// ABOUTME: OpenFoodFacts HTTP client for text search and barcode lookup
// ABOUTME: Sends a User-Agent, applies a bounded timeout, and caches search results with a TTL
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::normalize::{lenient_number, normalize_product, requested_fields};
use crate::food_database::{BarcodeLookup, FoodDatabaseProvider};
use crate::http_client::build_client;
use async_trait::async_trait;
use fitpro_core::constants::food_search::{
    DEFAULT_BASE_URL, DEFAULT_CACHE_TTL_SECS, DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_COUNTRY,
    DEFAULT_LANGUAGE, DEFAULT_PAGE_SIZE, DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT,
    MIN_QUERY_CHARS, PROVIDER_NAME, SORT_BY,
};
use fitpro_core::errors::ProviderError;
use fitpro_core::models::FoodCandidate;
use reqwest::header::USER_AGENT;
use reqwest::StatusCode;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Longest error body kept in a `ProviderError::HttpStatus`
const MAX_ERROR_BODY_CHARS: usize = 200;

/// OpenFoodFacts client configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenFoodFactsConfig {
    /// Base URL (default: <https://world.openfoodfacts.org>)
    pub base_url: String,
    /// `User-Agent` header value
    pub user_agent: String,
    /// Response language (`lc`), also selects localized names
    pub language: String,
    /// Country scope (`cc`)
    pub country: String,
    /// Results per search
    pub page_size: u32,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Connection timeout in seconds
    pub connect_timeout_secs: u64,
    /// Search cache TTL in seconds
    pub cache_ttl_secs: u64,
}

impl Default for OpenFoodFactsConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            language: DEFAULT_LANGUAGE.to_owned(),
            country: DEFAULT_COUNTRY.to_owned(),
            page_size: DEFAULT_PAGE_SIZE,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
            cache_ttl_secs: DEFAULT_CACHE_TTL_SECS,
        }
    }
}

/// Cache entry with expiration
#[derive(Debug, Clone)]
struct CacheEntry<T> {
    data: T,
    expires_at: Instant,
}

/// OpenFoodFacts API client
pub struct OpenFoodFactsClient {
    config: OpenFoodFactsConfig,
    http_client: reqwest::Client,
    search_cache: Arc<RwLock<HashMap<String, CacheEntry<Vec<FoodCandidate>>>>>,
}

impl OpenFoodFactsClient {
    /// Create a new client with its own pooled HTTP client
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::Network` if the HTTP client cannot be built
    pub fn new(config: OpenFoodFactsConfig) -> Result<Self, ProviderError> {
        let http_client = build_client(
            PROVIDER_NAME,
            config.timeout_secs,
            config.connect_timeout_secs,
            &config.user_agent,
        )?;
        Ok(Self {
            config,
            http_client,
            search_cache: Arc::new(RwLock::new(HashMap::new())),
        })
    }

    /// Active configuration
    #[must_use]
    pub const fn config(&self) -> &OpenFoodFactsConfig {
        &self.config
    }

    fn base_url(&self) -> &str {
        self.config.base_url.trim_end_matches('/')
    }

    fn map_send_error(&self, error: &reqwest::Error) -> ProviderError {
        ProviderError::from_reqwest(PROVIDER_NAME, self.config.timeout_secs, error)
    }

    async fn status_error(response: reqwest::Response) -> ProviderError {
        let status = response.status().as_u16();
        let body: String = response
            .text()
            .await
            .unwrap_or_default()
            .chars()
            .take(MAX_ERROR_BODY_CHARS)
            .collect();
        ProviderError::HttpStatus {
            provider: PROVIDER_NAME,
            status,
            body,
        }
    }

    async fn read_json(&self, response: reqwest::Response) -> Result<Value, ProviderError> {
        response.json::<Value>().await.map_err(|e| {
            if e.is_timeout() {
                self.map_send_error(&e)
            } else {
                ProviderError::Parse {
                    provider: PROVIDER_NAME,
                    message: e.to_string(),
                }
            }
        })
    }

    async fn cached_search(&self, key: &str) -> Option<Vec<FoodCandidate>> {
        let cache = self.search_cache.read().await;
        cache
            .get(key)
            .filter(|entry| Instant::now() < entry.expires_at)
            .map(|entry| entry.data.clone())
    }

    async fn store_search(&self, key: String, foods: &[FoodCandidate]) {
        let mut cache = self.search_cache.write().await;
        let now = Instant::now();
        cache.retain(|_, entry| now < entry.expires_at);
        cache.insert(
            key,
            CacheEntry {
                data: foods.to_vec(),
                expires_at: now + Duration::from_secs(self.config.cache_ttl_secs),
            },
        );
    }

    /// Clear the search cache
    pub async fn clear_cache(&self) {
        self.search_cache.write().await.clear();
    }

    /// Number of cached queries
    pub async fn cache_len(&self) -> usize {
        self.search_cache.read().await.len()
    }
}

#[async_trait]
impl FoodDatabaseProvider for OpenFoodFactsClient {
    fn name(&self) -> &'static str {
        PROVIDER_NAME
    }

    async fn search(&self, query: &str) -> Result<Vec<FoodCandidate>, ProviderError> {
        let query = query.trim();
        if query.chars().count() < MIN_QUERY_CHARS {
            return Ok(Vec::new());
        }

        let cache_key = query.to_lowercase();
        if let Some(hit) = self.cached_search(&cache_key).await {
            debug!(query, results = hit.len(), "Food search cache hit");
            return Ok(hit);
        }

        let url = format!("{}/cgi/search.pl", self.base_url());
        let page_size = self.config.page_size.to_string();
        let fields = requested_fields(&self.config.language);
        let response = self
            .http_client
            .get(&url)
            .header(USER_AGENT, &self.config.user_agent)
            .query(&[
                ("search_terms", query),
                ("search_simple", "1"),
                ("action", "process"),
                ("json", "1"),
                ("lc", self.config.language.as_str()),
                ("cc", self.config.country.as_str()),
                ("page_size", page_size.as_str()),
                ("sort_by", SORT_BY),
                ("fields", fields.as_str()),
            ])
            .send()
            .await
            .map_err(|e| self.map_send_error(&e))?;

        if !response.status().is_success() {
            return Err(Self::status_error(response).await);
        }

        let body = self.read_json(response).await?;
        let products = body
            .get("products")
            .and_then(Value::as_array)
            .map_or(&[][..], Vec::as_slice);

        let foods: Vec<FoodCandidate> = products
            .iter()
            .filter_map(|product| normalize_product(product, &self.config.language))
            .collect();

        info!(
            query,
            returned = products.len(),
            usable = foods.len(),
            "Food search completed"
        );

        self.store_search(cache_key, &foods).await;
        Ok(foods)
    }

    async fn lookup_barcode(&self, barcode: &str) -> Result<BarcodeLookup, ProviderError> {
        let barcode = barcode.trim();
        if barcode.is_empty() {
            return Ok(BarcodeLookup::NotFound);
        }

        let url = format!(
            "{}/api/v2/product/{}.json",
            self.base_url(),
            urlencoding::encode(barcode)
        );
        let fields = requested_fields(&self.config.language);
        let response = self
            .http_client
            .get(&url)
            .header(USER_AGENT, &self.config.user_agent)
            .query(&[
                ("fields", fields.as_str()),
                ("lc", self.config.language.as_str()),
            ])
            .send()
            .await
            .map_err(|e| self.map_send_error(&e))?;

        if response.status() == StatusCode::NOT_FOUND {
            debug!(barcode, "Barcode not found (HTTP 404)");
            return Ok(BarcodeLookup::NotFound);
        }
        if !response.status().is_success() {
            return Err(Self::status_error(response).await);
        }

        let body = self.read_json(response).await?;
        let status = body.get("status").and_then(lenient_number);
        let product = body.get("product").filter(|p| p.is_object());

        let (Some(status), Some(product)) = (status, product) else {
            debug!(barcode, "Barcode lookup returned no product");
            return Ok(BarcodeLookup::NotFound);
        };
        if (status - 1.0).abs() > f64::EPSILON {
            debug!(barcode, status, "Barcode lookup returned no product");
            return Ok(BarcodeLookup::NotFound);
        }

        let mut product = product.clone();
        if let Some(object) = product.as_object_mut() {
            object.insert("code".to_owned(), Value::String(barcode.to_owned()));
        }

        Ok(normalize_product(&product, &self.config.language)
            .map_or(BarcodeLookup::NotFound, BarcodeLookup::Found))
    }
}
