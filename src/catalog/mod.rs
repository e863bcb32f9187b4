//! Movie catalog.
//!
//! Maps movie titles to the entry a ticket sale needs: stock, price and
//! descriptive metadata. Titles are matched exactly and case-sensitively;
//! only [`Catalog::search`] is case-insensitive.

mod merge;

pub use merge::merge;

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

use crate::storage::{self, lenient, DocumentStore};

/// One movie on sale.
///
/// Every field decodes leniently: a missing value or one of the wrong JSON
/// type loads as empty instead of failing the whole catalog. An entry without
/// usable `stock` or `price` still loads; purchases reject it instead.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    #[serde(
        rename = "estoque",
        default,
        deserialize_with = "lenient::opt_i64",
        skip_serializing_if = "Option::is_none"
    )]
    pub stock: Option<i64>,
    #[serde(
        rename = "preco",
        default,
        deserialize_with = "lenient::opt_f64",
        skip_serializing_if = "Option::is_none"
    )]
    pub price: Option<f64>,
    #[serde(rename = "imagem", default, deserialize_with = "lenient::string_or_empty")]
    pub image: String,
    #[serde(rename = "ano", default, deserialize_with = "lenient::i32_or_zero")]
    pub year: i32,
    #[serde(rename = "genero", default, deserialize_with = "lenient::string_or_empty")]
    pub genre: String,
    #[serde(
        rename = "sinopse",
        default,
        deserialize_with = "lenient::opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub synopsis: Option<String>,
    #[serde(
        rename = "nota",
        default,
        deserialize_with = "lenient::opt_f64",
        skip_serializing_if = "Option::is_none"
    )]
    pub rating: Option<f64>,
    #[serde(
        rename = "tmdb_id",
        default,
        deserialize_with = "lenient::opt_u64",
        skip_serializing_if = "Option::is_none"
    )]
    pub external_id: Option<u64>,
}

impl CatalogEntry {
    pub fn new(stock: i64, price: f64) -> Self {
        Self {
            stock: Some(stock),
            price: Some(price),
            ..Self::default()
        }
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = image.into();
        self
    }

    pub fn with_year(mut self, year: i32) -> Self {
        self.year = year;
        self
    }

    pub fn with_genre(mut self, genre: impl Into<String>) -> Self {
        self.genre = genre.into();
        self
    }

    pub fn with_synopsis(mut self, synopsis: impl Into<String>) -> Self {
        self.synopsis = Some(synopsis.into());
        self
    }

    pub fn with_rating(mut self, rating: f64) -> Self {
        self.rating = Some(rating);
        self
    }

    pub fn with_external_id(mut self, id: u64) -> Self {
        self.external_id = Some(id);
        self
    }
}

/// Title → entry, ordered by title.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Catalog(BTreeMap<String, CatalogEntry>);

impl<'de> Deserialize<'de> for Catalog {
    /// An entry that is not a JSON object loads as an empty entry, which keeps
    /// its title listed but unsellable.
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = BTreeMap::<String, serde_json::Value>::deserialize(deserializer)?;
        Ok(raw
            .into_iter()
            .map(|(title, value)| {
                let entry = CatalogEntry::deserialize(value).unwrap_or_else(|e| {
                    warn!(title = %title, error = %e, "Catalog entry unreadable, loading it empty");
                    CatalogEntry::default()
                });
                (title, entry)
            })
            .collect())
    }
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, title: &str) -> Option<&CatalogEntry> {
        self.0.get(title)
    }

    pub fn get_mut(&mut self, title: &str) -> Option<&mut CatalogEntry> {
        self.0.get_mut(title)
    }

    pub fn contains(&self, title: &str) -> bool {
        self.0.contains_key(title)
    }

    /// Insert or replace the entry for `title`.
    pub fn insert(&mut self, title: impl Into<String>, entry: CatalogEntry) -> Option<CatalogEntry> {
        self.0.insert(title.into(), entry)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn titles(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CatalogEntry)> {
        self.0.iter().map(|(title, entry)| (title.as_str(), entry))
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = (&String, &mut CatalogEntry)> {
        self.0.iter_mut()
    }

    /// Entries whose title contains `term`, ignoring case.
    ///
    /// A blank term matches everything.
    pub fn search(&self, term: &str) -> Catalog {
        let needle = term.trim().to_lowercase();
        if needle.is_empty() {
            return self.clone();
        }
        self.0
            .iter()
            .filter(|(title, _)| title.to_lowercase().contains(&needle))
            .map(|(title, entry)| (title.clone(), entry.clone()))
            .collect()
    }
}

impl FromIterator<(String, CatalogEntry)> for Catalog {
    fn from_iter<I: IntoIterator<Item = (String, CatalogEntry)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for Catalog {
    type Item = (String, CatalogEntry);
    type IntoIter = std::collections::btree_map::IntoIter<String, CatalogEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

const DEFAULT_PRICE: f64 = 20.0;

/// Catalog used when no store exists yet.
pub fn default_catalog() -> Catalog {
    let mut catalog = Catalog::new();
    catalog.insert(
        "Titanic",
        CatalogEntry::new(100, DEFAULT_PRICE)
            .with_image("https://image.tmdb.org/t/p/w500/9xjZS2rlVxm8SFx8kPC3aIGCOYQ.jpg")
            .with_year(1997)
            .with_genre("Romance/Drama"),
    );
    catalog.insert(
        "O Poderoso Chefão",
        CatalogEntry::new(80, DEFAULT_PRICE)
            .with_image("https://image.tmdb.org/t/p/w500/3bhkrj58Vtu7enYsRolD1fZdja1.jpg")
            .with_year(1972)
            .with_genre("Crime/Drama"),
    );
    catalog.insert(
        "A Origem",
        CatalogEntry::new(50, DEFAULT_PRICE)
            .with_image("https://image.tmdb.org/t/p/w500/edv5CZvWj09upOsy2Y6IwDhK8bt.jpg")
            .with_year(2010)
            .with_genre("Ação/Ficção"),
    );
    catalog.insert(
        "Na sua pele",
        CatalogEntry::new(60, DEFAULT_PRICE)
            .with_image("https://image.tmdb.org/t/p/w500/mwUUv7cEHvwz6re2rDbvLGN0qCo.jpg")
            .with_year(2020)
            .with_genre("Terror/Suspense"),
    );
    catalog
}

/// Load the catalog, or the built-in default when the store is absent or corrupt.
pub async fn load_catalog(store: &dyn DocumentStore, store_id: &str) -> Catalog {
    storage::load(store, store_id, default_catalog()).await
}

pub async fn save_catalog(
    store: &dyn DocumentStore,
    store_id: &str,
    catalog: &Catalog,
) -> storage::Result<()> {
    storage::save(store, store_id, catalog).await
}
