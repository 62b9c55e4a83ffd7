// ABOUTME: Explicit per-user session holding the stores and a live profile subscription
// ABOUTME: Resolves daily targets from stored metrics with per-field fallbacks
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Session
//!
//! A [`Session`] is created when a user signs in and passed to whatever needs the
//! current user or profile. It owns one profile subscription for its lifetime;
//! [`Session::end`] releases it.

use crate::errors::{AppError, AppResult};
use crate::stores::{Stores, Subscription};
use fitpro_core::models::UserProfile;
use fitpro_intelligence::config::FallbackTargetsConfig;
use fitpro_intelligence::DailyTargets;
use tracing::{debug, info};

/// Signed-in user bound to the collaborator stores
pub struct Session {
    user_id: String,
    stores: Stores,
    fallbacks: FallbackTargetsConfig,
    profile: Subscription<Option<UserProfile>>,
}

impl Session {
    /// Start a session and subscribe to the user's profile
    ///
    /// # Errors
    ///
    /// Returns an error for an empty user id or if the profile store fails
    pub async fn start(
        user_id: impl Into<String>,
        stores: Stores,
        fallbacks: FallbackTargetsConfig,
    ) -> AppResult<Self> {
        let user_id = user_id.into();
        if user_id.trim().is_empty() {
            return Err(AppError::missing_field("user_id"));
        }
        let profile = stores.profiles.subscribe_profile(&user_id).await?;
        info!(user_id = %user_id, "Session started");
        Ok(Self {
            user_id,
            stores,
            fallbacks,
            profile,
        })
    }

    /// Signed-in user id
    #[must_use]
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Stores bound to this session
    #[must_use]
    pub const fn stores(&self) -> &Stores {
        &self.stores
    }

    /// Fallback targets used when the profile has none
    #[must_use]
    pub const fn fallbacks(&self) -> &FallbackTargetsConfig {
        &self.fallbacks
    }

    /// Latest profile snapshot, `None` before the first onboarding write
    #[must_use]
    pub fn profile(&self) -> Option<UserProfile> {
        self.profile.current()
    }

    /// True once the stored profile carries derived targets
    #[must_use]
    pub fn is_onboarded(&self) -> bool {
        self.profile().as_ref().is_some_and(UserProfile::is_onboarded)
    }

    /// Daily targets from the profile, falling back per field
    #[must_use]
    pub fn daily_targets(&self) -> DailyTargets {
        let profile = self.profile();
        DailyTargets::resolve(
            profile.as_ref().and_then(|p| p.metrics.as_ref()),
            &self.fallbacks,
        )
    }

    /// Additional subscription to the profile, independent of the session's own
    ///
    /// # Errors
    ///
    /// Returns an error if the profile store fails
    pub async fn subscribe_profile(&self) -> AppResult<Subscription<Option<UserProfile>>> {
        self.stores.profiles.subscribe_profile(&self.user_id).await
    }

    /// Wait for the next profile change
    ///
    /// # Errors
    ///
    /// Returns an error if the store dropped the feed
    pub async fn profile_changed(&mut self) -> AppResult<Option<UserProfile>> {
        let profile = self.profile.changed().await?;
        debug!(user_id = %self.user_id, "Profile changed");
        Ok(profile)
    }

    /// End the session and release its subscription
    pub fn end(self) {
        info!(user_id = %self.user_id, "Session ended");
        self.profile.unsubscribe();
    }
}
