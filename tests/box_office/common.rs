//! Shared fixtures for box office integration tests.

pub use std::sync::Arc;

pub use tempfile::TempDir;

pub use ticketbooth::box_office::{BoxOffice, Error, RefreshOutcome};
pub use ticketbooth::catalog::{save_catalog, Catalog, CatalogEntry};
pub use ticketbooth::config::{StorageConfig, StorageType};
pub use ticketbooth::ledger::TicketType;
pub use ticketbooth::purchase::{PurchaseError, PurchaseRequest, ValidationError};
pub use ticketbooth::storage::{DocumentStore, FilesystemStore};
pub use ticketbooth::Principal;

/// Storage config pointing at `dir`.
pub fn storage_config(dir: &TempDir) -> StorageConfig {
    StorageConfig {
        storage_type: StorageType::Filesystem,
        data_dir: dir.path().join("dados").display().to_string(),
        ..StorageConfig::default()
    }
}

/// A box office over `dir` whose catalog holds only Titanic.
pub async fn office_with_titanic(dir: &TempDir, stock: i64) -> BoxOffice {
    let config = storage_config(dir);
    let store = FilesystemStore::new(&config.data_dir).await.unwrap();
    let mut catalog = Catalog::new();
    catalog.insert("Titanic", CatalogEntry::new(stock, 20.0).with_year(1997));
    save_catalog(&store, &config.catalog_file, &catalog)
        .await
        .unwrap();

    BoxOffice::from_config(&config).await.unwrap()
}

pub fn form(age: &str, student: &str, quantity: &str) -> PurchaseRequest {
    PurchaseRequest::new(age, student, quantity)
}

pub async fn titanic_stock(office: &BoxOffice) -> Option<i64> {
    office.catalog().await.get("Titanic").and_then(|entry| entry.stock)
}
