// ABOUTME: Pooled HTTP client construction for food database calls
// ABOUTME: Applies request and connect timeouts plus the provider User-Agent
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use fitpro_core::errors::ProviderError;
use reqwest::{Client, ClientBuilder};
use std::time::Duration;

/// Build a pooled client with the given timeouts and `User-Agent`
///
/// # Errors
///
/// Returns `ProviderError::Network` if the client cannot be built, for example when
/// no TLS backend is usable. There is no fallback client, so every request made by a
/// provider carries the configured timeouts.
pub fn build_client(
    provider: &'static str,
    timeout_secs: u64,
    connect_timeout_secs: u64,
    user_agent: &str,
) -> Result<Client, ProviderError> {
    ClientBuilder::new()
        .timeout(Duration::from_secs(timeout_secs))
        .connect_timeout(Duration::from_secs(connect_timeout_secs))
        .user_agent(user_agent)
        .build()
        .map_err(|e| ProviderError::Network {
            provider,
            message: format!("cannot build HTTP client: {e}"),
        })
}
