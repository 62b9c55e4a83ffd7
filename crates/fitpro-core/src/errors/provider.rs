// ABOUTME: Error types for the external food database boundary
// ABOUTME: Distinguishes network, timeout, HTTP status, and response parsing failures
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::{AppError, ErrorCode};
use thiserror::Error;

/// Failures talking to a food database provider
///
/// A barcode that simply has no match is not an error and never produces one of
/// these; providers report it as a regular lookup outcome.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Transport-level failure (DNS, connection reset, TLS)
    #[error("{provider}: network error: {message}")]
    Network {
        /// Provider name
        provider: &'static str,
        /// Underlying transport message
        message: String,
    },

    /// No response within the configured timeout
    #[error("{provider}: request timed out after {seconds}s")]
    Timeout {
        /// Provider name
        provider: &'static str,
        /// Timeout that elapsed
        seconds: u64,
    },

    /// The provider answered with a non-success status
    #[error("{provider}: HTTP {status}: {body}")]
    HttpStatus {
        /// Provider name
        provider: &'static str,
        /// HTTP status code
        status: u16,
        /// Response body (possibly truncated)
        body: String,
    },

    /// The response body was not the JSON shape we can read
    #[error("{provider}: invalid response: {message}")]
    Parse {
        /// Provider name
        provider: &'static str,
        /// Decoder message
        message: String,
    },
}

impl ProviderError {
    /// Provider that produced the error
    #[must_use]
    pub const fn provider(&self) -> &'static str {
        match self {
            Self::Network { provider, .. }
            | Self::Timeout { provider, .. }
            | Self::HttpStatus { provider, .. }
            | Self::Parse { provider, .. } => provider,
        }
    }

    /// Classify a `reqwest` error for the named provider
    #[cfg(feature = "provider-errors")]
    #[must_use]
    pub fn from_reqwest(provider: &'static str, timeout_secs: u64, error: &reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout {
                provider,
                seconds: timeout_secs,
            }
        } else if error.is_decode() {
            Self::Parse {
                provider,
                message: error.to_string(),
            }
        } else if let Some(status) = error.status() {
            Self::HttpStatus {
                provider,
                status: status.as_u16(),
                body: String::new(),
            }
        } else {
            Self::Network {
                provider,
                message: error.to_string(),
            }
        }
    }
}

impl From<ProviderError> for AppError {
    fn from(error: ProviderError) -> Self {
        match error {
            ProviderError::Timeout { provider, seconds } => {
                Self::external_timeout(provider, seconds)
            }
            ProviderError::Network { .. } => {
                Self::new(ErrorCode::ExternalServiceUnavailable, error.to_string())
            }
            ProviderError::HttpStatus { provider, status, .. } => {
                Self::external_service(provider, format!("HTTP {status}"))
                    .with_details(serde_json::json!({ "status": status }))
            }
            ProviderError::Parse { .. } => {
                Self::new(ErrorCode::ExternalServiceError, error.to_string())
            }
        }
    }
}
