//! Sales ledger.
//!
//! Append-only record of completed sales, in chronological order, plus the
//! aggregate queries the admin view needs.

use std::collections::BTreeMap;

use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};

use crate::storage::{self, lenient, DocumentStore};

/// Display format of a sale timestamp.
pub const TIMESTAMP_FORMAT: &str = "%d/%m/%Y %H:%M";

/// Pricing tier of a sale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TicketType {
    #[serde(rename = "Inteira")]
    Full,
    #[serde(rename = "Meia")]
    Half,
}

impl TicketType {
    pub fn label(&self) -> &'static str {
        match self {
            TicketType::Full => "Inteira",
            TicketType::Half => "Meia",
        }
    }
}

impl std::fmt::Display for TicketType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// One completed purchase.
///
/// `quantity` and `total` read as zero when absent or not numbers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleRecord {
    #[serde(rename = "filme")]
    pub movie_title: String,
    #[serde(rename = "tipo")]
    pub ticket_type: TicketType,
    #[serde(rename = "quantidade", default, deserialize_with = "lenient::u64_or_zero")]
    pub quantity: u64,
    #[serde(default, deserialize_with = "lenient::f64_or_zero")]
    pub total: f64,
    #[serde(rename = "data", default, deserialize_with = "lenient::string_or_empty")]
    pub timestamp: String,
}

impl SaleRecord {
    pub fn new<Tz>(
        movie_title: impl Into<String>,
        ticket_type: TicketType,
        quantity: u64,
        total: f64,
        at: &DateTime<Tz>,
    ) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        Self {
            movie_title: movie_title.into(),
            ticket_type,
            quantity,
            total,
            timestamp: at.format(TIMESTAMP_FORMAT).to_string(),
        }
    }
}

/// A stored ledger item.
///
/// A record that does not read as a [`SaleRecord`] (unknown `tipo`, missing
/// `filme`) is kept verbatim so saving the ledger never drops history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
enum Entry {
    Sale(SaleRecord),
    Unrecognized(serde_json::Value),
}

impl Entry {
    fn movie_title(&self) -> Option<&str> {
        match self {
            Entry::Sale(record) => Some(&record.movie_title),
            Entry::Unrecognized(value) => value.get("filme").and_then(|title| title.as_str()),
        }
    }

    fn quantity(&self) -> u64 {
        match self {
            Entry::Sale(record) => record.quantity,
            Entry::Unrecognized(value) => value
                .get("quantidade")
                .and_then(|quantity| quantity.as_u64())
                .unwrap_or(0),
        }
    }

    fn total(&self) -> f64 {
        match self {
            Entry::Sale(record) => record.total,
            Entry::Unrecognized(value) => value
                .get("total")
                .and_then(|total| total.as_f64())
                .unwrap_or(0.0),
        }
    }
}

/// Chronological sequence of sales.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ledger(Vec<Entry>);

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record to this copy. Persisting is a separate [`save_ledger`].
    pub fn append(&mut self, record: SaleRecord) {
        self.0.push(Entry::Sale(record));
    }

    /// Readable sale records, oldest first.
    pub fn records(&self) -> impl DoubleEndedIterator<Item = &SaleRecord> {
        self.0.iter().filter_map(|entry| match entry {
            Entry::Sale(record) => Some(record),
            Entry::Unrecognized(_) => None,
        })
    }

    /// Number of stored records, readable or not.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Stored records that did not read as sales.
    pub fn unrecognized(&self) -> usize {
        self.0
            .iter()
            .filter(|entry| matches!(entry, Entry::Unrecognized(_)))
            .count()
    }

    pub fn last(&self) -> Option<&SaleRecord> {
        self.records().next_back()
    }
}

impl FromIterator<SaleRecord> for Ledger {
    fn from_iter<I: IntoIterator<Item = SaleRecord>>(iter: I) -> Self {
        Self(iter.into_iter().map(Entry::Sale).collect())
    }
}

/// Units sold per movie title.
///
/// Unrecognized records still count when they carry a title and quantity.
pub fn aggregate_by_movie(ledger: &Ledger) -> BTreeMap<String, u64> {
    let mut sold = BTreeMap::new();
    for entry in &ledger.0 {
        if let Some(title) = entry.movie_title() {
            *sold.entry(title.to_string()).or_insert(0) += entry.quantity();
        }
    }
    sold
}

/// Sum of `total` over every record.
pub fn total_revenue(ledger: &Ledger) -> f64 {
    ledger.0.iter().map(Entry::total).sum()
}

/// Aggregate statistics for the admin view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalesSummary {
    /// Number of completed sales (records, not tickets).
    pub total_sales: usize,
    pub total_revenue: f64,
    pub sold_by_movie: BTreeMap<String, u64>,
}

impl SalesSummary {
    pub fn from_ledger(ledger: &Ledger) -> Self {
        Self {
            total_sales: ledger.len(),
            total_revenue: total_revenue(ledger),
            sold_by_movie: aggregate_by_movie(ledger),
        }
    }
}

pub async fn load_ledger(store: &dyn DocumentStore, store_id: &str) -> Ledger {
    storage::load(store, store_id, Ledger::new()).await
}

pub async fn save_ledger(
    store: &dyn DocumentStore,
    store_id: &str,
    ledger: &Ledger,
) -> storage::Result<()> {
    storage::save(store, store_id, ledger).await
}
