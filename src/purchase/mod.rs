//! Ticket purchase transaction.
//!
//! A purchase runs `Validating -> Pricing -> StockCheck -> Committed` in one
//! shot. Any failure is terminal and leaves the catalog and ledger exactly as
//! they were; only a fully checked purchase mutates either of them.

mod pricing;
mod validation;

pub use pricing::{quote, ticket_type, Quote, HALF_PRICE_AGE_LIMIT};
pub use validation::{
    errmsg, PurchaseRequest, StudentStatus, ValidatedRequest, ValidationError, MAX_AGE, MIN_AGE,
};

use chrono::{DateTime, TimeZone};
use serde::Serialize;
use thiserror::Error;

use crate::catalog::{Catalog, CatalogEntry};
use crate::ledger::{Ledger, SaleRecord, TicketType};

/// Why a purchase was rejected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PurchaseError {
    #[error("movie not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("insufficient stock: available {available}, requested {requested}")]
    InsufficientStock { available: i64, requested: u64 },

    #[error("catalog entry for {title:?} has no usable {field}")]
    MalformedEntry { title: String, field: &'static str },
}

/// Outcome of a committed purchase.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Receipt {
    pub movie_title: String,
    pub ticket_type: TicketType,
    pub quantity: u64,
    pub unit_price: f64,
    pub total: f64,
    pub remaining_stock: i64,
    pub record: SaleRecord,
}

impl Receipt {
    /// Total with two decimal places, as shown to the buyer.
    pub fn total_display(&self) -> String {
        format!("{:.2}", self.total)
    }
}

/// Validate, price and commit a purchase of `movie_title`.
///
/// On success the entry's stock is decremented in place and one record is
/// appended to `ledger`. Persisting both is the caller's job.
pub fn execute<Tz>(
    catalog: &mut Catalog,
    ledger: &mut Ledger,
    movie_title: &str,
    request: &PurchaseRequest,
    at: &DateTime<Tz>,
) -> Result<Receipt, PurchaseError>
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let entry = catalog
        .get(movie_title)
        .ok_or_else(|| PurchaseError::NotFound(movie_title.to_string()))?;

    let request = request.validate()?;
    let (available, full_price) = sale_terms(movie_title, entry)?;
    let quote = quote(full_price, &request);

    if (available as u64) < request.quantity {
        return Err(PurchaseError::InsufficientStock {
            available,
            requested: request.quantity,
        });
    }

    // Commit
    let remaining_stock = available - request.quantity as i64;
    if let Some(entry) = catalog.get_mut(movie_title) {
        entry.stock = Some(remaining_stock);
    }

    let record = SaleRecord::new(
        movie_title,
        quote.ticket_type,
        request.quantity,
        quote.total,
        at,
    );
    ledger.append(record.clone());

    Ok(Receipt {
        movie_title: movie_title.to_string(),
        ticket_type: quote.ticket_type,
        quantity: request.quantity,
        unit_price: quote.unit_price,
        total: quote.total,
        remaining_stock,
        record,
    })
}

/// Stock and full price of an entry, if both are usable.
fn sale_terms(title: &str, entry: &CatalogEntry) -> Result<(i64, f64), PurchaseError> {
    let stock = entry
        .stock
        .filter(|stock| *stock >= 0)
        .ok_or_else(|| PurchaseError::MalformedEntry {
            title: title.to_string(),
            field: "estoque",
        })?;
    let price = entry
        .price
        .filter(|price| price.is_finite() && *price > 0.0)
        .ok_or_else(|| PurchaseError::MalformedEntry {
            title: title.to_string(),
            field: "preco",
        })?;
    Ok((stock, price))
}
