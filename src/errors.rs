// ABOUTME: Application error types shared with the domain crates
// ABOUTME: Re-exports AppError, ErrorCode, StorageError, and ProviderError from fitpro-core
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Errors are defined once in `fitpro-core` so the pure crates and this crate agree on
//! codes and conversions.

pub use fitpro_core::errors::{
    AppError, AppResult, ErrorCode, ErrorContext, ErrorResponse, ProviderError, StorageError,
};
