// ABOUTME: Recipe list controls: case-insensitive title search, vegan filter, and sort orders
// ABOUTME: Pure function applied to any fetched recipe list before display
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use fitpro_core::models::Recipe;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Recipe list ordering
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RecipeSort {
    /// Newest first
    #[default]
    Recent,
    /// Most likes first
    MostLiked,
    /// Fewest calories per portion first, unknown last
    LowestCalories,
    /// Most calories per portion first, unknown last
    HighestCalories,
}

/// Search and filter state of a recipe list
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecipeFilters {
    /// Title substring; blank matches everything
    #[serde(default)]
    pub search: String,
    /// Only vegan recipes
    #[serde(default)]
    pub vegan_only: bool,
    /// Ordering
    #[serde(default)]
    pub sort: RecipeSort,
}

/// Order by calories, placing recipes without nutrition after all others
fn by_calories(a: &Recipe, b: &Recipe, descending: bool) -> Ordering {
    match (a.calories_per_portion(), b.calories_per_portion()) {
        (Some(x), Some(y)) => {
            let ordering = x.total_cmp(&y);
            if descending {
                ordering.reverse()
            } else {
                ordering
            }
        }
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Filter and sort recipes for display
#[must_use]
pub fn apply_recipe_filters(recipes: &[Recipe], filters: &RecipeFilters) -> Vec<Recipe> {
    let needle = filters.search.trim().to_lowercase();

    let mut result: Vec<Recipe> = recipes
        .iter()
        .filter(|r| needle.is_empty() || r.title.to_lowercase().contains(&needle))
        .filter(|r| !filters.vegan_only || r.is_vegan)
        .cloned()
        .collect();

    match filters.sort {
        RecipeSort::Recent => result.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        RecipeSort::MostLiked => result.sort_by(|a, b| b.like_count.cmp(&a.like_count)),
        RecipeSort::LowestCalories => result.sort_by(|a, b| by_calories(a, b, false)),
        RecipeSort::HighestCalories => result.sort_by(|a, b| by_calories(a, b, true)),
    }

    result
}
