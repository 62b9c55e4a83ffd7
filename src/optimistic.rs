// ABOUTME: Two-phase optimistic local state: apply a delta, commit remotely, roll back on failure
// ABOUTME: Like/save deltas over RecipeSocialState with precomputed inverses
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Optimistic updates
//!
//! [`Optimistic::update`] applies a [`Delta`] to the local state before the remote
//! write runs. If the write fails the inverse delta is applied to whatever the state
//! is at that moment, the failure is logged, and the error is returned. Subscribers
//! see both the optimistic value and the rollback.

use crate::errors::AppResult;
use crate::stores::Subscription;
use fitpro_core::models::RecipeSocialState;
use std::future::Future;
use tokio::sync::watch;
use tracing::{debug, warn};

/// A reversible change to local state
pub trait Delta<S> {
    /// New state with this delta applied
    fn apply(&self, state: &S) -> S;

    /// The delta that undoes this one
    #[must_use]
    fn inverse(&self) -> Self
    where
        Self: Sized;
}

/// Local state that remote writes are applied to optimistically
#[derive(Debug)]
pub struct Optimistic<S> {
    sender: watch::Sender<S>,
}

impl<S> Optimistic<S>
where
    S: Clone + Send + Sync,
{
    /// Wrap an initial state
    #[must_use]
    pub fn new(initial: S) -> Self {
        let (sender, _) = watch::channel(initial);
        Self { sender }
    }

    /// Current local state
    #[must_use]
    pub fn current(&self) -> S {
        self.sender.borrow().clone()
    }

    /// Observe every local change, including rollbacks
    #[must_use]
    pub fn subscribe(&self) -> Subscription<S> {
        Subscription::new(self.sender.subscribe())
    }

    /// Replace the local state with a confirmed value
    pub fn set(&self, state: S) {
        self.sender.send_replace(state);
    }

    /// Apply `delta`, run `commit`, and apply the inverse if `commit` fails
    ///
    /// # Errors
    ///
    /// Returns the commit error after rolling back
    pub async fn update<D, F, Fut, T>(&self, delta: D, commit: F) -> AppResult<T>
    where
        D: Delta<S>,
        F: FnOnce() -> Fut,
        Fut: Future<Output = AppResult<T>>,
    {
        let inverse = delta.inverse();
        self.sender.send_modify(|state| *state = delta.apply(state));

        match commit().await {
            Ok(value) => {
                debug!("Optimistic update committed");
                Ok(value)
            }
            Err(error) => {
                self.sender
                    .send_modify(|state| *state = inverse.apply(state));
                warn!(error = %error, "Remote write failed, local state rolled back");
                Err(error)
            }
        }
    }
}

/// Like/save flips on a recipe's social state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SocialDelta {
    /// Mark liked and count one more like
    Like,
    /// Clear liked and count one less like
    Unlike,
    /// Mark saved
    Save,
    /// Clear saved
    Unsave,
}

impl SocialDelta {
    /// Delta that flips the like flag of `state`
    #[must_use]
    pub const fn toggle_like(state: &RecipeSocialState) -> Self {
        if state.liked {
            Self::Unlike
        } else {
            Self::Like
        }
    }

    /// Delta that flips the save flag of `state`
    #[must_use]
    pub const fn toggle_save(state: &RecipeSocialState) -> Self {
        if state.saved {
            Self::Unsave
        } else {
            Self::Save
        }
    }

    /// Whether the relation exists after this delta
    #[must_use]
    pub const fn present(&self) -> bool {
        matches!(self, Self::Like | Self::Save)
    }
}

impl Delta<RecipeSocialState> for SocialDelta {
    fn apply(&self, state: &RecipeSocialState) -> RecipeSocialState {
        match self {
            Self::Like => RecipeSocialState {
                liked: true,
                like_count: state.like_count.saturating_add(1),
                ..*state
            },
            Self::Unlike => RecipeSocialState {
                liked: false,
                like_count: state.like_count.saturating_sub(1),
                ..*state
            },
            Self::Save => RecipeSocialState {
                saved: true,
                ..*state
            },
            Self::Unsave => RecipeSocialState {
                saved: false,
                ..*state
            },
        }
    }

    fn inverse(&self) -> Self {
        match self {
            Self::Like => Self::Unlike,
            Self::Unlike => Self::Like,
            Self::Save => Self::Unsave,
            Self::Unsave => Self::Save,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_and_inverse_restore_state() {
        let state = RecipeSocialState {
            liked: false,
            saved: true,
            like_count: 4,
        };
        let delta = SocialDelta::toggle_like(&state);
        assert_eq!(delta, SocialDelta::Like);

        let liked = delta.apply(&state);
        assert!(liked.liked);
        assert_eq!(liked.like_count, 5);
        assert_eq!(delta.inverse().apply(&liked), state);
    }

    #[test]
    fn test_unlike_saturates_at_zero() {
        let state = RecipeSocialState {
            liked: true,
            saved: false,
            like_count: 0,
        };
        let after = SocialDelta::Unlike.apply(&state);
        assert_eq!(after.like_count, 0);
        assert!(!after.liked);
    }

    #[test]
    fn test_save_leaves_like_count() {
        let state = RecipeSocialState::default();
        let saved = SocialDelta::toggle_save(&state).apply(&state);
        assert!(saved.saved);
        assert_eq!(saved.like_count, 0);
        assert!(SocialDelta::Save.present());
        assert!(!SocialDelta::Unsave.present());
    }
}
