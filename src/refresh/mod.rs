//! Catalog refresh sources.
//!
//! A source produces a complete, freshly formatted catalog. The box office
//! decides how it is merged with the stored one.

mod tmdb;

pub use tmdb::{format_movie, TmdbCatalogSource, TmdbGenre, TmdbMovie};

use async_trait::async_trait;
use thiserror::Error;

use crate::catalog::Catalog;

#[derive(Debug, Error)]
pub enum RefreshError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("No movies available from {0}")]
    NoResults(String),

    #[error("Refresh source not configured: {0}")]
    Config(String),
}

/// Producer of a fresh catalog.
///
/// An empty catalog or an error both mean "no update available".
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn fetch_fresh_catalog(&self) -> Result<Catalog, RefreshError>;
}

/// Source that always returns the same catalog.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalogSource {
    catalog: Catalog,
}

impl StaticCatalogSource {
    pub fn new(catalog: Catalog) -> Self {
        Self { catalog }
    }
}

#[async_trait]
impl CatalogSource for StaticCatalogSource {
    async fn fetch_fresh_catalog(&self) -> Result<Catalog, RefreshError> {
        Ok(self.catalog.clone())
    }
}
