// ABOUTME: Structured error types for collaborator store operations
// ABOUTME: Covers connection, query, serialization, and missing-record failures
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::{AppError, ErrorCode};
use thiserror::Error;

/// Errors raised by profile, food log, recipe, and image stores
#[derive(Debug, Error)]
pub enum StorageError {
    /// Could not open or reach the backing store
    #[error("Storage connection failed: {0}")]
    Connection(String),

    /// A query or write was rejected by the backing store
    #[error("Storage query failed: {context}")]
    Query {
        /// What the store was doing when it failed
        context: String,
    },

    /// A persisted document could not be encoded or decoded
    #[error("Stored document is malformed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The addressed record does not exist
    #[error("{entity} '{id}' not found")]
    NotFound {
        /// Kind of record (profile, food entry, recipe, ...)
        entity: &'static str,
        /// Identifier that was looked up
        id: String,
    },
}

impl StorageError {
    /// Shorthand for a missing record
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            id: id.into(),
        }
    }
}

#[cfg(feature = "database-errors")]
use sqlx::Error as SqlxError;

#[cfg(feature = "database-errors")]
impl From<SqlxError> for StorageError {
    fn from(error: SqlxError) -> Self {
        match error {
            SqlxError::Configuration(e) => Self::Connection(e.to_string()),
            SqlxError::Io(e) => Self::Connection(e.to_string()),
            SqlxError::PoolTimedOut | SqlxError::PoolClosed => {
                Self::Connection(error.to_string())
            }
            other => Self::Query {
                context: other.to_string(),
            },
        }
    }
}

impl From<StorageError> for AppError {
    fn from(error: StorageError) -> Self {
        match &error {
            StorageError::NotFound { entity, id } => {
                let resource_id = id.clone();
                Self::not_found(*entity).with_resource_id(resource_id)
            }
            StorageError::Serialization(_) => {
                Self::new(ErrorCode::SerializationError, error.to_string())
            }
            StorageError::Connection(_) | StorageError::Query { .. } => {
                Self::storage(error.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_maps_to_resource_not_found() {
        let app: AppError = StorageError::not_found("Recipe", "abc").into();
        assert_eq!(app.code, ErrorCode::ResourceNotFound);
        assert_eq!(app.context.resource_id.as_deref(), Some("abc"));
    }

    #[test]
    fn test_query_maps_to_storage_error() {
        let app: AppError = StorageError::Query {
            context: "disk full".to_owned(),
        }
        .into();
        assert_eq!(app.code, ErrorCode::StorageError);
        assert!(app.message.contains("disk full"));
    }
}
