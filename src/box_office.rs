//! Box office service.
//!
//! Request-scoped orchestration over the catalog and ledger stores. Every
//! operation reloads both stores fresh; nothing is cached between calls.
//!
//! Mutations (purchases and catalog refreshes) run one at a time under a
//! single writer lock covering load, decision and both writes. The catalog is
//! a single store, so a per-title lock would still lose concurrent updates to
//! different titles.
//!
//! ## Write order and recovery
//!
//! A purchase persists the catalog first, then the ledger. If the catalog
//! write fails nothing was persisted. If the ledger write fails afterwards,
//! the catalog as loaded before the purchase is written back, so a reported
//! failure leaves both stores as they were.
//!
//! Only a crash between the two writes, or a failed write-back, leaves the
//! stored stock decremented without a matching sale record. A failed
//! write-back is logged at error level with the lost record. Nothing is
//! repaired automatically; comparing stock sold with
//! [`SalesSummary::sold_by_movie`] exposes such a discrepancy.

use std::sync::Arc;

use chrono::Local;
use serde::Serialize;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

use crate::access::{AccessError, Principal};
use crate::catalog::{self, Catalog};
use crate::config::StorageConfig;
use crate::ledger::{self, Ledger, SalesSummary};
use crate::purchase::{self, PurchaseError, PurchaseRequest, Receipt};
use crate::refresh::CatalogSource;
use crate::storage::{init_storage, DocumentStore, StorageError};

/// Discriminated outcome of a failed box office operation.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Access(#[from] AccessError),

    #[error(transparent)]
    Purchase(#[from] PurchaseError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Sales history with its running total.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct History {
    pub ledger: Ledger,
    pub total_revenue: f64,
}

/// Everything the admin view shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdminView {
    pub catalog: Catalog,
    pub sales: SalesSummary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// The stored catalog was replaced by one holding `titles` movies.
    Updated { titles: usize },
    /// The source had nothing to offer; the stored catalog is untouched.
    NoUpdate,
}

pub struct BoxOffice {
    store: Arc<dyn DocumentStore>,
    catalog_id: String,
    ledger_id: String,
    writer: Mutex<()>,
}

impl BoxOffice {
    pub fn new(store: Arc<dyn DocumentStore>, config: &StorageConfig) -> Self {
        Self {
            store,
            catalog_id: config.catalog_file.clone(),
            ledger_id: config.ledger_file.clone(),
            writer: Mutex::new(()),
        }
    }

    /// Build the configured storage backend and a box office over it.
    pub async fn from_config(config: &StorageConfig) -> std::result::Result<Self, StorageError> {
        let store = init_storage(config).await?;
        Ok(Self::new(store, config))
    }

    pub async fn catalog(&self) -> Catalog {
        catalog::load_catalog(self.store.as_ref(), &self.catalog_id).await
    }

    /// Catalog entries whose title contains `term`, ignoring case.
    pub async fn search(&self, term: &str) -> Catalog {
        self.catalog().await.search(term)
    }

    pub async fn history(&self) -> History {
        let ledger = self.ledger().await;
        History {
            total_revenue: ledger::total_revenue(&ledger),
            ledger,
        }
    }

    /// Buy tickets for `movie_title` on behalf of a logged-in user.
    ///
    /// A rejected purchase writes nothing.
    pub async fn purchase(
        &self,
        principal: &Principal,
        movie_title: &str,
        request: &PurchaseRequest,
    ) -> Result<Receipt> {
        principal.require_authenticated()?;

        let _writer = self.writer.lock().await;
        let mut catalog = self.catalog().await;
        let mut ledger = self.ledger().await;
        let unsold = catalog.clone();

        let receipt = match purchase::execute(
            &mut catalog,
            &mut ledger,
            movie_title,
            request,
            &Local::now(),
        ) {
            Ok(receipt) => receipt,
            Err(e) => {
                info!(title = %movie_title, reason = %e, "Purchase rejected");
                return Err(e.into());
            }
        };

        catalog::save_catalog(self.store.as_ref(), &self.catalog_id, &catalog).await?;
        if let Err(e) = ledger::save_ledger(self.store.as_ref(), &self.ledger_id, &ledger).await {
            warn!(title = %movie_title, error = %e, "Sale record not saved, restoring stock");
            if let Err(restore) =
                catalog::save_catalog(self.store.as_ref(), &self.catalog_id, &unsold).await
            {
                error!(
                    title = %movie_title,
                    record = ?receipt.record,
                    error = %restore,
                    "Stock saved but sale record was not; catalog and ledger disagree"
                );
            }
            return Err(e.into());
        }

        info!(
            title = %movie_title,
            ticket_type = %receipt.ticket_type,
            quantity = receipt.quantity,
            total = receipt.total,
            remaining = receipt.remaining_stock,
            "Purchase committed"
        );
        Ok(receipt)
    }

    /// Catalog and sales statistics for administrators.
    pub async fn summary(&self, principal: &Principal) -> Result<AdminView> {
        principal.require_admin()?;

        let catalog = self.catalog().await;
        let ledger = self.ledger().await;
        Ok(AdminView {
            catalog,
            sales: SalesSummary::from_ledger(&ledger),
        })
    }

    /// Replace the catalog with a fresh one from `source`.
    ///
    /// With `preserve_stock`, titles already on sale keep their current stock.
    /// An empty or failed fetch leaves the stored catalog untouched.
    pub async fn refresh_catalog(
        &self,
        principal: &Principal,
        source: &dyn CatalogSource,
        preserve_stock: bool,
    ) -> Result<RefreshOutcome> {
        principal.require_admin()?;

        let _writer = self.writer.lock().await;
        let incoming = match source.fetch_fresh_catalog().await {
            Ok(incoming) if !incoming.is_empty() => incoming,
            Ok(_) => {
                warn!("Catalog source returned no movies; keeping current catalog");
                return Ok(RefreshOutcome::NoUpdate);
            }
            Err(e) => {
                warn!(error = %e, "Catalog source failed; keeping current catalog");
                return Ok(RefreshOutcome::NoUpdate);
            }
        };

        let current = self.catalog().await;
        let merged = catalog::merge(&current, incoming, preserve_stock);
        catalog::save_catalog(self.store.as_ref(), &self.catalog_id, &merged).await?;

        info!(
            titles = merged.len(),
            preserve_stock,
            "Catalog refreshed"
        );
        Ok(RefreshOutcome::Updated {
            titles: merged.len(),
        })
    }

    async fn ledger(&self) -> Ledger {
        ledger::load_ledger(self.store.as_ref(), &self.ledger_id).await
    }
}
