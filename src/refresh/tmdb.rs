//! The Movie Database (TMDB) catalog source.
//!
//! Lists the movies now playing in the configured region, falling back to
//! the popular listing, and formats the first `refresh_count` of them as
//! catalog entries priced with the configured defaults.

use async_trait::async_trait;
use backon::Retryable;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, info, warn};

use super::{CatalogSource, RefreshError};
use crate::catalog::{Catalog, CatalogEntry};
use crate::config::{CatalogConfig, TmdbConfig};
use crate::utils::retry::{fetch_backoff, is_retryable_http};

const NO_SYNOPSIS: &str = "Sem sinopse disponível";
const NO_GENRE: &str = "N/A";

#[derive(Debug, Clone, Deserialize)]
struct MovieList {
    #[serde(default)]
    results: Vec<TmdbMovie>,
}

/// A movie as returned by listing and detail endpoints.
///
/// Listings omit `genres`; the detail endpoint includes them.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TmdbMovie {
    pub id: Option<u64>,
    pub title: Option<String>,
    pub genres: Option<Vec<TmdbGenre>>,
    pub release_date: Option<String>,
    pub poster_path: Option<String>,
    pub overview: Option<String>,
    pub vote_average: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TmdbGenre {
    pub name: String,
}

/// Format a TMDB movie as a catalog entry with default stock and price.
pub fn format_movie(movie: &TmdbMovie, image_base_url: &str, defaults: &CatalogConfig) -> CatalogEntry {
    let genre = movie
        .genres
        .as_deref()
        .filter(|genres| !genres.is_empty())
        .map(|genres| {
            genres
                .iter()
                .map(|genre| genre.name.as_str())
                .collect::<Vec<_>>()
                .join("/")
        })
        .unwrap_or_else(|| NO_GENRE.to_string());

    let year = movie
        .release_date
        .as_deref()
        .and_then(|date| date.get(..4))
        .and_then(|year| year.parse().ok())
        .unwrap_or(0);

    let mut entry = CatalogEntry::new(defaults.default_stock, defaults.default_price)
        .with_image(format!(
            "{}{}",
            image_base_url,
            movie.poster_path.as_deref().unwrap_or_default()
        ))
        .with_year(year)
        .with_genre(genre)
        .with_synopsis(movie.overview.as_deref().unwrap_or(NO_SYNOPSIS))
        .with_rating((movie.vote_average.unwrap_or(0.0) * 10.0).round() / 10.0);
    entry.external_id = movie.id;
    entry
}

/// Catalog source backed by the TMDB v3 API.
pub struct TmdbCatalogSource {
    client: Client,
    config: TmdbConfig,
    defaults: CatalogConfig,
}

impl TmdbCatalogSource {
    pub fn new(config: TmdbConfig, defaults: CatalogConfig) -> Result<Self, RefreshError> {
        if config.api_key.is_empty() {
            return Err(RefreshError::Config("TMDB API key not set".to_string()));
        }

        let client = Client::builder().timeout(config.timeout()).build()?;

        Ok(Self {
            client,
            config,
            defaults,
        })
    }

    /// GET an endpoint with the key and language attached, retrying transient failures.
    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> Result<T, RefreshError> {
        let url = format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            endpoint.trim_start_matches('/')
        );

        let client = &self.client;
        let url = url.as_str();
        let auth = [
            ("api_key", self.config.api_key.as_str()),
            ("language", self.config.language.as_str()),
        ];

        let request = || async move {
            client
                .get(url)
                .query(&auth)
                .query(params)
                .send()
                .await?
                .error_for_status()
        };

        let response = request
            .retry(fetch_backoff())
            .when(is_retryable_http)
            .notify(|err, delay| {
                warn!(endpoint = %endpoint, error = %err, ?delay, "TMDB request failed, retrying");
            })
            .await?;

        Ok(response.json::<T>().await?)
    }

    async fn now_playing(&self) -> Result<MovieList, RefreshError> {
        self.get_json(
            "movie/now_playing",
            &[("page", "1".to_string()), ("region", self.config.region.clone())],
        )
        .await
    }

    async fn popular(&self) -> Result<MovieList, RefreshError> {
        self.get_json("movie/popular", &[("page", "1".to_string())])
            .await
    }

    /// Listing entries lack genres; fetch the details when needed.
    async fn with_details(&self, movie: TmdbMovie) -> Result<TmdbMovie, RefreshError> {
        match (movie.genres.is_some(), movie.id) {
            (false, Some(id)) => self.get_json(&format!("movie/{}", id), &[]).await,
            _ => Ok(movie),
        }
    }
}

#[async_trait]
impl CatalogSource for TmdbCatalogSource {
    async fn fetch_fresh_catalog(&self) -> Result<Catalog, RefreshError> {
        let listing = match self.now_playing().await {
            Ok(listing) if !listing.results.is_empty() => listing,
            Ok(_) => {
                debug!("Now-playing listing empty, trying popular");
                self.popular().await?
            }
            Err(e) => {
                warn!(error = %e, "Now-playing listing failed, trying popular");
                self.popular().await?
            }
        };

        if listing.results.is_empty() {
            return Err(RefreshError::NoResults(self.config.base_url.clone()));
        }

        let mut catalog = Catalog::new();
        for movie in listing.results.into_iter().take(self.defaults.refresh_count) {
            let Some(title) = movie.title.clone() else {
                continue;
            };
            match self.with_details(movie).await {
                Ok(full) => {
                    catalog.insert(
                        title,
                        format_movie(&full, &self.config.image_base_url, &self.defaults),
                    );
                }
                Err(e) => warn!(title = %title, error = %e, "Skipping movie"),
            }
        }

        info!(movies = catalog.len(), "Fetched catalog from TMDB");
        Ok(catalog)
    }
}
