// ABOUTME: Command implementations for fitpro-cli
// ABOUTME: Nutrition calculations and food database lookups
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

pub mod food;
pub mod nutrition;
