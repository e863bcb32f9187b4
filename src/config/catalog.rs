//! Catalog and refresh-source configuration types.

use std::time::Duration;

use serde::Deserialize;

/// Defaults applied to movies added by a catalog refresh.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Stock given to a freshly fetched movie.
    pub default_stock: i64,
    /// Full ticket price given to a freshly fetched movie.
    pub default_price: f64,
    /// Number of movies taken from the source on refresh.
    pub refresh_count: usize,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            default_stock: 100,
            default_price: 20.0,
            refresh_count: 8,
        }
    }
}

/// The Movie Database (TMDB) API configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TmdbConfig {
    /// API key. Refresh is unavailable while empty.
    pub api_key: String,
    /// API base URL (v3).
    pub base_url: String,
    /// Prefix prepended to poster paths.
    pub image_base_url: String,
    /// Language requested for titles and synopses.
    pub language: String,
    /// Region for the now-playing listing.
    pub region: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl TmdbConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for TmdbConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: "https://api.themoviedb.org/3".to_string(),
            image_base_url: "https://image.tmdb.org/t/p/w500".to_string(),
            language: "pt-BR".to_string(),
            region: "BR".to_string(),
            timeout_secs: 10,
        }
    }
}
