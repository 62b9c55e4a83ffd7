// ABOUTME: Recipe authoring, visibility rules, discovery, and optimistic like/save toggles
// ABOUTME: Validates drafts, derives per-portion nutrition, and manages recipe images
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::images::{recipe_image_path, resolve_image_url, storage_path_from_url};
use crate::errors::{AppError, AppResult};
use crate::optimistic::{Optimistic, SocialDelta};
use crate::stores::{ImageStorage, RecipeStore, Stores};
use chrono::{DateTime, Utc};
use fitpro_core::models::{Recipe, RecipeDraft, RecipeSocialState, RelationKind};
use fitpro_intelligence::recipes::{
    apply_recipe_filters, calculate_recipe_nutrition, validate_recipe_draft, RecipeFilters,
    ValidatedDraft,
};
use std::sync::Arc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

/// Image bytes attached to a recipe create or edit
#[derive(Debug, Clone)]
pub struct ImageUpload {
    /// Encoded image
    pub bytes: Vec<u8>,
    /// MIME type, e.g. `image/jpeg`
    pub content_type: String,
}

impl ImageUpload {
    /// JPEG upload
    #[must_use]
    pub fn jpeg(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            content_type: "image/jpeg".to_owned(),
        }
    }
}

/// Identifiers and timestamps a validated draft is combined with
struct RecipeMeta<'a> {
    id: String,
    author_id: &'a str,
    image_url: Option<String>,
    like_count: u32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

fn build_recipe(draft: ValidatedDraft, meta: RecipeMeta<'_>) -> Recipe {
    let nutrition = calculate_recipe_nutrition(&draft.ingredients, draft.portions, &draft.overrides);
    Recipe {
        id: meta.id,
        author_id: meta.author_id.to_owned(),
        title: draft.title,
        is_public: draft.is_public,
        is_vegan: draft.is_vegan,
        difficulty: draft.difficulty,
        portions: draft.portions,
        prep_time_mins: draft.prep_time_mins,
        cook_time_mins: draft.cook_time_mins,
        ingredients: draft.ingredients,
        instructions: draft.instructions,
        overrides: draft.overrides,
        nutrition: Some(nutrition),
        image_url: meta.image_url,
        like_count: meta.like_count,
        created_at: meta.created_at,
        updated_at: meta.updated_at,
    }
}

/// Recipe operations with author-scoped writes
#[derive(Clone)]
pub struct RecipeService {
    recipes: Arc<dyn RecipeStore>,
    images: Arc<dyn ImageStorage>,
}

impl RecipeService {
    /// Service over the recipe and image stores
    #[must_use]
    pub fn new(stores: &Stores) -> Self {
        Self {
            recipes: stores.recipes.clone(),
            images: stores.images.clone(),
        }
    }

    /// Create a recipe owned by `author_id`
    ///
    /// # Errors
    ///
    /// Returns a validation error for an invalid draft, or a store failure
    #[instrument(skip(self, draft, image), fields(title = %draft.title))]
    pub async fn create(
        &self,
        author_id: &str,
        draft: RecipeDraft,
        image: Option<ImageUpload>,
        now: DateTime<Utc>,
    ) -> AppResult<Recipe> {
        let validated = validate_recipe_draft(draft)?;
        let id = Uuid::new_v4().to_string();
        let image_url = match image {
            Some(upload) => Some(self.upload_image(author_id, &id, upload).await?),
            None => None,
        };

        let recipe = build_recipe(
            validated,
            RecipeMeta {
                id,
                author_id,
                image_url,
                like_count: 0,
                created_at: now,
                updated_at: now,
            },
        );
        self.recipes.insert_recipe(&recipe).await?;
        info!(recipe_id = %recipe.id, author_id, public = recipe.is_public, "Recipe created");
        Ok(recipe)
    }

    /// Replace a recipe's content; only its author may do this
    ///
    /// `created_at`, `like_count`, and the existing image are kept unless a new image
    /// is supplied.
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` when the recipe is missing or not visible to the
    /// user, `PermissionDenied` for a non-author, or a validation error
    #[instrument(skip(self, draft, image))]
    pub async fn update(
        &self,
        user_id: &str,
        recipe_id: &str,
        draft: RecipeDraft,
        image: Option<ImageUpload>,
        now: DateTime<Utc>,
    ) -> AppResult<Recipe> {
        let existing = self.owned_recipe(user_id, recipe_id).await?;
        let validated = validate_recipe_draft(draft)?;
        let image_url = match image {
            Some(upload) => Some(self.upload_image(user_id, recipe_id, upload).await?),
            None => existing.image_url,
        };

        let recipe = build_recipe(
            validated,
            RecipeMeta {
                id: existing.id,
                author_id: &existing.author_id,
                image_url,
                like_count: existing.like_count,
                created_at: existing.created_at,
                updated_at: now,
            },
        );
        self.recipes.replace_recipe(&recipe).await?;
        info!(recipe_id, "Recipe updated");
        Ok(recipe)
    }

    /// Delete a recipe, its relations, and its image; only its author may do this
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` when the recipe is missing or not visible to the
    /// user, or `PermissionDenied` for a non-author
    #[instrument(skip(self))]
    pub async fn delete(&self, user_id: &str, recipe_id: &str) -> AppResult<()> {
        let existing = self.owned_recipe(user_id, recipe_id).await?;
        self.recipes.delete_recipe(recipe_id).await?;

        if let Some(path) = existing.image_url.as_deref().and_then(storage_path_from_url) {
            if let Err(e) = self.images.delete(&path).await {
                warn!(recipe_id, path = %path, error = %e, "Failed to delete recipe image");
            }
        }
        info!(recipe_id, "Recipe deleted");
        Ok(())
    }

    /// Load a recipe as seen by `viewer_id`
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` for a missing recipe or another user's private one
    pub async fn get(&self, viewer_id: &str, recipe_id: &str) -> AppResult<Recipe> {
        self.recipes
            .get_recipe(recipe_id)
            .await?
            .filter(|r| r.is_public || r.author_id == viewer_id)
            .ok_or_else(|| AppError::not_found("Recipe").with_resource_id(recipe_id))
    }

    /// Recipes by an author, newest first
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails
    pub async fn by_author(&self, author_id: &str) -> AppResult<Vec<Recipe>> {
        self.recipes.recipes_by_author(author_id).await
    }

    /// Public recipes, newest first
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails
    pub async fn public_recipes(&self) -> AppResult<Vec<Recipe>> {
        self.recipes.public_recipes().await
    }

    /// Public recipes after search, vegan filter, and sort
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails
    pub async fn discover(&self, filters: &RecipeFilters) -> AppResult<Vec<Recipe>> {
        let recipes = self.recipes.public_recipes().await?;
        Ok(apply_recipe_filters(&recipes, filters))
    }

    /// Like a recipe; liking twice counts once
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` if the recipe is not visible to the user
    pub async fn like(&self, user_id: &str, recipe_id: &str) -> AppResult<RecipeSocialState> {
        self.set_relation(RelationKind::Like, user_id, recipe_id, true)
            .await
    }

    /// Remove a like
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` if the recipe is not visible to the user
    pub async fn unlike(&self, user_id: &str, recipe_id: &str) -> AppResult<RecipeSocialState> {
        self.set_relation(RelationKind::Like, user_id, recipe_id, false)
            .await
    }

    /// Save a recipe
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` if the recipe is not visible to the user
    pub async fn save(&self, user_id: &str, recipe_id: &str) -> AppResult<RecipeSocialState> {
        self.set_relation(RelationKind::Save, user_id, recipe_id, true)
            .await
    }

    /// Remove a save
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` if the recipe is not visible to the user
    pub async fn unsave(&self, user_id: &str, recipe_id: &str) -> AppResult<RecipeSocialState> {
        self.set_relation(RelationKind::Save, user_id, recipe_id, false)
            .await
    }

    /// Liked and saved flags plus like count
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` for a missing recipe
    pub async fn social_state(
        &self,
        user_id: &str,
        recipe_id: &str,
    ) -> AppResult<RecipeSocialState> {
        self.recipes.social_state(user_id, recipe_id).await
    }

    /// Recipes the user saved, most recent first; others' private recipes are hidden
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails
    pub async fn saved_recipes(&self, user_id: &str) -> AppResult<Vec<Recipe>> {
        let saved = self.recipes.saved_recipes(user_id).await?;
        Ok(saved
            .into_iter()
            .filter(|r| r.is_public || r.author_id == user_id)
            .collect())
    }

    /// Flip the like flag optimistically, rolling back if the write fails
    ///
    /// # Errors
    ///
    /// Returns the write error after `state` has been restored
    pub async fn toggle_like(
        &self,
        user_id: &str,
        recipe_id: &str,
        state: &Optimistic<RecipeSocialState>,
    ) -> AppResult<RecipeSocialState> {
        let delta = SocialDelta::toggle_like(&state.current());
        self.toggle(RelationKind::Like, delta, user_id, recipe_id, state)
            .await
    }

    /// Flip the save flag optimistically, rolling back if the write fails
    ///
    /// # Errors
    ///
    /// Returns the write error after `state` has been restored
    pub async fn toggle_save(
        &self,
        user_id: &str,
        recipe_id: &str,
        state: &Optimistic<RecipeSocialState>,
    ) -> AppResult<RecipeSocialState> {
        let delta = SocialDelta::toggle_save(&state.current());
        self.toggle(RelationKind::Save, delta, user_id, recipe_id, state)
            .await
    }

    /// Fresh URL for a recipe's image
    ///
    /// # Errors
    ///
    /// Returns an error if the image storage cannot resolve the stored reference
    pub async fn image_url(&self, recipe: &Recipe) -> AppResult<Option<String>> {
        match recipe.image_url.as_deref() {
            Some(reference) => Ok(Some(resolve_image_url(self.images.as_ref(), reference).await?)),
            None => Ok(None),
        }
    }

    async fn toggle(
        &self,
        kind: RelationKind,
        delta: SocialDelta,
        user_id: &str,
        recipe_id: &str,
        state: &Optimistic<RecipeSocialState>,
    ) -> AppResult<RecipeSocialState> {
        let present = delta.present();
        let confirmed = state
            .update(delta, || {
                self.set_relation(kind, user_id, recipe_id, present)
            })
            .await?;
        state.set(confirmed);
        Ok(confirmed)
    }

    async fn set_relation(
        &self,
        kind: RelationKind,
        user_id: &str,
        recipe_id: &str,
        present: bool,
    ) -> AppResult<RecipeSocialState> {
        self.get(user_id, recipe_id).await?;
        let state = self
            .recipes
            .set_relation(kind, user_id, recipe_id, present, Utc::now())
            .await?;
        info!(%kind, user_id, recipe_id, present, like_count = state.like_count, "Recipe relation set");
        Ok(state)
    }

    /// The recipe if `user_id` authored it; another user's private recipe is not found
    async fn owned_recipe(&self, user_id: &str, recipe_id: &str) -> AppResult<Recipe> {
        let recipe = self.get(user_id, recipe_id).await?;
        if recipe.author_id != user_id {
            return Err(
                AppError::permission_denied("Only the author can change this recipe")
                    .with_user_id(user_id)
                    .with_resource_id(recipe_id),
            );
        }
        Ok(recipe)
    }

    async fn upload_image(
        &self,
        user_id: &str,
        recipe_id: &str,
        upload: ImageUpload,
    ) -> AppResult<String> {
        let path = recipe_image_path(user_id, recipe_id);
        self.images
            .upload(&path, upload.bytes, &upload.content_type)
            .await
    }
}
