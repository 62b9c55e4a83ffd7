// ABOUTME: Core types and constants for the FitPro nutrition tracker
// ABOUTME: Foundation crate with error handling, domain models, lenient parsing, and constants
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # FitPro Core
//!
//! Foundation crate providing shared types and constants for the FitPro workspace.
//! It has no async runtime and no I/O, so every other crate can depend on it.
//!
//! ## Modules
//!
//! - **errors**: Unified error handling with `AppError`, `ErrorCode`, and domain-specific errors
//! - **constants**: Application-wide constants organized by domain
//! - **models**: Profile, food diary and recipe records
//! - **parsing**: Lenient number parsing for user-entered text

/// Unified error handling system with standard error codes
pub mod errors;

/// Application constants organized by domain
pub mod constants;

/// Core data models (profile, food, recipe)
pub mod models;

/// Lenient numeric parsing for text inputs
pub mod parsing;
