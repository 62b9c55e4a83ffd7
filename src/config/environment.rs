// ABOUTME: Environment-based configuration for storage, the food database, and logging
// ABOUTME: Parses DATABASE_URL, FOOD_DB_* and FOOD_SEARCH_DEBOUNCE_MS with typed validation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::errors::{AppError, AppResult};
use crate::logging::LoggingConfig;
use fitpro_core::constants::food_search;
use fitpro_providers::OpenFoodFactsConfig;
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt::{self, Display, Formatter};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Type-safe database location
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum DatabaseUrl {
    /// `SQLite` database with file path
    SQLite {
        /// Path to `SQLite` database file
        path: PathBuf,
    },
    /// In-memory `SQLite` (for testing)
    Memory,
}

impl DatabaseUrl {
    /// Parse from string with validation
    ///
    /// `sqlite::memory:` selects an in-memory database, `sqlite:<path>` a file, and
    /// anything else is taken as a file path.
    ///
    /// # Errors
    ///
    /// Returns an error for an empty value or a server URL this build cannot open
    pub fn parse_url(s: &str) -> AppResult<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(AppError::config("DATABASE_URL is empty"));
        }
        if s.starts_with("postgres://") || s.starts_with("postgresql://") {
            return Err(AppError::config(
                "PostgreSQL is not supported, use a sqlite: URL",
            ));
        }
        if let Some(path_str) = s.strip_prefix("sqlite:") {
            let path_str = path_str.strip_prefix("//").unwrap_or(path_str);
            if path_str == ":memory:" {
                return Ok(Self::Memory);
            }
            return Ok(Self::SQLite {
                path: PathBuf::from(path_str),
            });
        }
        Ok(Self::SQLite {
            path: PathBuf::from(s),
        })
    }

    /// Convert to connection string
    #[must_use]
    pub fn to_connection_string(&self) -> String {
        match self {
            Self::SQLite { path } => format!("sqlite:{}", path.display()),
            Self::Memory => "sqlite::memory:".into(),
        }
    }

    /// Check if this is an in-memory database
    #[must_use]
    pub const fn is_memory(&self) -> bool {
        matches!(self, Self::Memory)
    }
}

impl Display for DatabaseUrl {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_connection_string())
    }
}

/// Food database endpoint and search behavior
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FoodDatabaseConfig {
    /// Base URL of the OpenFoodFacts-compatible service
    pub base_url: String,
    /// `User-Agent` header value
    pub user_agent: String,
    /// Response language (`lc`)
    pub language: String,
    /// Country scope (`cc`)
    pub country: String,
    /// Results per search
    pub page_size: u32,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Connection timeout in seconds
    pub connect_timeout_secs: u64,
    /// Search cache TTL in seconds
    pub cache_ttl_secs: u64,
    /// Debounce window for typed queries in milliseconds
    pub debounce_ms: u64,
}

impl Default for FoodDatabaseConfig {
    fn default() -> Self {
        Self {
            base_url: food_search::DEFAULT_BASE_URL.to_owned(),
            user_agent: food_search::DEFAULT_USER_AGENT.to_owned(),
            language: food_search::DEFAULT_LANGUAGE.to_owned(),
            country: food_search::DEFAULT_COUNTRY.to_owned(),
            page_size: food_search::DEFAULT_PAGE_SIZE,
            timeout_secs: food_search::DEFAULT_TIMEOUT_SECS,
            connect_timeout_secs: food_search::DEFAULT_CONNECT_TIMEOUT_SECS,
            cache_ttl_secs: food_search::DEFAULT_CACHE_TTL_SECS,
            debounce_ms: food_search::DEFAULT_DEBOUNCE_MS,
        }
    }
}

impl FoodDatabaseConfig {
    /// Load food database configuration from environment
    ///
    /// # Errors
    ///
    /// Returns an error if a numeric variable does not parse or a value is out of range
    pub fn from_env() -> AppResult<Self> {
        let defaults = Self::default();
        let config = Self {
            base_url: env_var_or("FOOD_DB_BASE_URL", &defaults.base_url),
            user_agent: env_var_or("FOOD_DB_USER_AGENT", &defaults.user_agent),
            language: env_var_or("FOOD_DB_LANGUAGE", &defaults.language),
            country: env_var_or("FOOD_DB_COUNTRY", &defaults.country),
            page_size: parse_env("FOOD_DB_PAGE_SIZE", defaults.page_size)?,
            timeout_secs: parse_env("FOOD_DB_TIMEOUT_SECS", defaults.timeout_secs)?,
            connect_timeout_secs: parse_env(
                "FOOD_DB_CONNECT_TIMEOUT_SECS",
                defaults.connect_timeout_secs,
            )?,
            cache_ttl_secs: parse_env("FOOD_DB_CACHE_TTL_SECS", defaults.cache_ttl_secs)?,
            debounce_ms: parse_env("FOOD_SEARCH_DEBOUNCE_MS", defaults.debounce_ms)?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate ranges
    ///
    /// # Errors
    ///
    /// Returns an error for an empty URL, zero page size, or zero timeout
    pub fn validate(&self) -> AppResult<()> {
        if self.base_url.trim().is_empty() {
            return Err(AppError::config("FOOD_DB_BASE_URL must not be empty"));
        }
        if self.page_size == 0 {
            return Err(AppError::config("FOOD_DB_PAGE_SIZE must be greater than 0"));
        }
        if self.timeout_secs == 0 {
            return Err(AppError::config(
                "FOOD_DB_TIMEOUT_SECS must be greater than 0",
            ));
        }
        Ok(())
    }

    /// Client settings for [`fitpro_providers::OpenFoodFactsClient`]
    #[must_use]
    pub fn client_config(&self) -> OpenFoodFactsConfig {
        OpenFoodFactsConfig {
            base_url: self.base_url.clone(),
            user_agent: self.user_agent.clone(),
            language: self.language.clone(),
            country: self.country.clone(),
            page_size: self.page_size,
            timeout_secs: self.timeout_secs,
            connect_timeout_secs: self.connect_timeout_secs,
            cache_ttl_secs: self.cache_ttl_secs,
        }
    }

    /// Debounce window as a duration
    #[must_use]
    pub const fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Persistent store location; in-memory stores when `None`
    pub database: Option<DatabaseUrl>,
    /// Food database settings
    pub food_database: FoodDatabaseConfig,
    /// Logging settings
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if `DATABASE_URL` or any `FOOD_DB_*` variable is invalid
    pub fn from_env() -> AppResult<Self> {
        let database = match env::var("DATABASE_URL") {
            Ok(url) => Some(DatabaseUrl::parse_url(&url)?),
            Err(_) => None,
        };
        Ok(Self {
            database,
            food_database: FoodDatabaseConfig::from_env()?,
            logging: LoggingConfig::from_env(),
        })
    }

    /// Get a summary of the configuration for logging
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "FitPro Configuration:\n\
             - Storage: {}\n\
             - Food database: {} (lc={}, cc={})\n\
             - Search: page_size={}, timeout={}s, cache_ttl={}s, debounce={}ms\n\
             - Log Level: {}",
            self.database
                .as_ref()
                .map_or_else(|| "in-memory".to_owned(), ToString::to_string),
            self.food_database.base_url,
            self.food_database.language,
            self.food_database.country,
            self.food_database.page_size,
            self.food_database.timeout_secs,
            self.food_database.cache_ttl_secs,
            self.food_database.debounce_ms,
            self.logging.level,
        )
    }
}

/// Get environment variable or default value
fn env_var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_owned())
}

/// Parse an optional environment variable, keeping `default` when unset
fn parse_env<T>(key: &str, default: T) -> AppResult<T>
where
    T: FromStr,
    T::Err: Display,
{
    match env::var(key) {
        Ok(raw) => raw.trim().parse::<T>().map_err(|e| {
            AppError::config(format!("Invalid {key} value '{raw}': {e}"))
        }),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_url_parsing() {
        assert_eq!(
            DatabaseUrl::parse_url("sqlite::memory:").unwrap(),
            DatabaseUrl::Memory
        );
        assert_eq!(
            DatabaseUrl::parse_url("sqlite:./data/fitpro.db").unwrap(),
            DatabaseUrl::SQLite {
                path: PathBuf::from("./data/fitpro.db")
            }
        );
        assert_eq!(
            DatabaseUrl::parse_url("fitpro.db").unwrap().to_connection_string(),
            "sqlite:fitpro.db"
        );
        assert!(DatabaseUrl::parse_url("postgres://localhost/db").is_err());
        assert!(DatabaseUrl::parse_url("  ").is_err());
    }

    #[test]
    fn test_food_database_defaults() {
        let config = FoodDatabaseConfig::default();
        assert_eq!(config.base_url, "https://world.openfoodfacts.org");
        assert_eq!(config.page_size, 24);
        assert_eq!(config.timeout_secs, 8);
        assert_eq!(config.debounce(), Duration::from_millis(350));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_client_config_carries_settings() {
        let config = FoodDatabaseConfig {
            language: "en".to_owned(),
            page_size: 10,
            ..FoodDatabaseConfig::default()
        };
        let client = config.client_config();
        assert_eq!(client.language, "en");
        assert_eq!(client.page_size, 10);
        assert_eq!(client.timeout_secs, 8);
    }
}
