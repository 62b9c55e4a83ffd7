// ABOUTME: Image reference handling: storage paths from download URLs and fresh URL resolution
// ABOUTME: Recipe image paths under users/{uid}/recipes/{recipe_id}.jpg
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Stored image references are download URLs whose tokens can go stale. Callers keep
//! the reference they were given and re-resolve it through [`resolve_image_url`]
//! whenever they need something fetchable.

use crate::errors::AppResult;
use crate::stores::ImageStorage;
use regex::Regex;
use std::borrow::Cow;
use std::sync::LazyLock;
use tracing::debug;
use url::Url;

/// Encoded object path inside a download URL
static OBJECT_PATH_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"/o/(.+?)(\?|$)").ok());

/// Storage path of a recipe image
#[must_use]
pub fn recipe_image_path(user_id: &str, recipe_id: &str) -> String {
    format!("users/{user_id}/recipes/{recipe_id}.jpg")
}

/// Storage path behind an image reference
///
/// An http(s) URL with an `/o/<encoded path>` segment yields the decoded path; any
/// other http(s) URL has no path and yields `None`; anything else is already a path.
#[must_use]
pub fn storage_path_from_url(reference: &str) -> Option<String> {
    let reference = reference.trim();
    if reference.is_empty() {
        return None;
    }
    let is_web_url = Url::parse(reference)
        .is_ok_and(|url| matches!(url.scheme(), "http" | "https"));
    if !is_web_url {
        return Some(reference.to_owned());
    }

    let encoded = OBJECT_PATH_PATTERN
        .as_ref()?
        .captures(reference)?
        .get(1)?
        .as_str();
    urlencoding::decode(encoded).ok().map(Cow::into_owned)
}

/// Fetchable URL for an image reference
///
/// References that map to a storage path get a freshly tokenized URL; external URLs
/// are returned unchanged.
///
/// # Errors
///
/// Returns an error if the storage cannot resolve the path
pub async fn resolve_image_url(storage: &dyn ImageStorage, reference: &str) -> AppResult<String> {
    match storage_path_from_url(reference) {
        Some(path) => {
            debug!(path = %path, "Re-resolving image URL");
            storage.resolve_url(&path).await
        }
        None => Ok(reference.trim().to_owned()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_from_download_url() {
        let url =
            "https://storage.local/o/users%2Fu1%2Frecipes%2Fr1.jpg?alt=media&token=abc";
        assert_eq!(
            storage_path_from_url(url).as_deref(),
            Some("users/u1/recipes/r1.jpg")
        );
        assert_eq!(
            storage_path_from_url("https://storage.local/o/images%2Fa.png").as_deref(),
            Some("images/a.png")
        );
    }

    #[test]
    fn test_external_url_has_no_path() {
        assert_eq!(
            storage_path_from_url("https://images.openfoodfacts.org/front.jpg"),
            None
        );
    }

    #[test]
    fn test_plain_value_is_a_path() {
        assert_eq!(
            storage_path_from_url(" users/u1/recipes/r1.jpg ").as_deref(),
            Some("users/u1/recipes/r1.jpg")
        );
        assert_eq!(storage_path_from_url(""), None);
    }

    #[test]
    fn test_recipe_image_path() {
        assert_eq!(recipe_image_path("u1", "r9"), "users/u1/recipes/r9.jpg");
    }
}
