//! Configuration management for the Showtime engine.
//!
//! Loads configuration from environment variables with sensible defaults.
//! The binary loads a `.env` file first (via `dotenvy`), so either source
//! works.

use crate::error::ConfigError;
use crate::types::ShowDate;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Catalog file locations
    pub catalog: CatalogConfig,
    /// Override of the "today" anchor (`SHOWTIME_TODAY`)
    pub today: Option<ShowDate>,
    /// Log filter (trace, debug, info, warn, error or a full directive)
    pub log_level: String,
}

/// Catalog file locations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Path to the movie catalog JSON
    pub movie_catalog: PathBuf,
    /// Path to the occupancy catalog JSON
    pub occupancy_catalog: PathBuf,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            movie_catalog: PathBuf::from("data/movies.json"),
            occupancy_catalog: PathBuf::from("data/seatmap.json"),
        }
    }
}

impl Config {
    /// Load configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if `SHOWTIME_TODAY` is set but
    /// is not a `YYYY-MM-DD` date.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if `SHOWTIME_TODAY` is set but
    /// is not a `YYYY-MM-DD` date.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = CatalogConfig::default();

        let today = match lookup("SHOWTIME_TODAY") {
            Some(raw) if !raw.trim().is_empty() => Some(raw.parse::<ShowDate>().map_err(|e| {
                ConfigError::InvalidValue {
                    variable: "SHOWTIME_TODAY",
                    value: raw.clone(),
                    reason: e.to_string(),
                }
            })?),
            _ => None,
        };

        Ok(Self {
            catalog: CatalogConfig {
                movie_catalog: lookup("SHOWTIME_MOVIE_CATALOG")
                    .map_or(defaults.movie_catalog, PathBuf::from),
                occupancy_catalog: lookup("SHOWTIME_OCCUPANCY_CATALOG")
                    .map_or(defaults.occupancy_catalog, PathBuf::from),
            },
            today,
            log_level: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}
