// ABOUTME: Configuration module root for the FitPro application
// ABOUTME: Environment-only configuration; nutrition constants live in fitpro-intelligence
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Configuration is read from environment variables only. There is no config file.

/// Environment variable parsing
pub mod environment;

pub use environment::{AppConfig, DatabaseUrl, FoodDatabaseConfig};
