//! Concurrent purchases against one catalog.

use futures::future::join_all;

use crate::common::*;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_purchases_never_oversell() {
    const STOCK: i64 = 5;
    const BUYERS: usize = 12;

    let dir = TempDir::new().unwrap();
    let office = Arc::new(office_with_titanic(&dir, STOCK).await);

    let purchases = (0..BUYERS).map(|_| {
        let office = Arc::clone(&office);
        tokio::spawn(async move {
            office
                .purchase(&Principal::user(), "Titanic", &form("30", "nao", "1"))
                .await
        })
    });
    let results: Vec<_> = join_all(purchases)
        .await
        .into_iter()
        .map(|joined| joined.unwrap())
        .collect();

    let succeeded = results.iter().filter(|result| result.is_ok()).count();
    assert_eq!(succeeded, STOCK as usize);
    for result in results.iter().filter(|result| result.is_err()) {
        assert!(matches!(
            result,
            Err(Error::Purchase(PurchaseError::InsufficientStock {
                available: 0,
                requested: 1
            }))
        ));
    }

    assert_eq!(titanic_stock(&office).await, Some(0));
    assert_eq!(office.history().await.ledger.len(), STOCK as usize);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_purchases_of_different_titles_keep_every_update() {
    let dir = TempDir::new().unwrap();
    let config = storage_config(&dir);
    let store = FilesystemStore::new(&config.data_dir).await.unwrap();
    let mut catalog = Catalog::new();
    catalog.insert("Titanic", CatalogEntry::new(10, 20.0));
    catalog.insert("A Origem", CatalogEntry::new(10, 20.0));
    save_catalog(&store, &config.catalog_file, &catalog)
        .await
        .unwrap();
    let office = Arc::new(BoxOffice::from_config(&config).await.unwrap());

    let purchases = ["Titanic", "A Origem", "Titanic", "A Origem"].map(|title| {
        let office = Arc::clone(&office);
        tokio::spawn(async move {
            office
                .purchase(&Principal::user(), title, &form("30", "nao", "2"))
                .await
        })
    });
    for joined in join_all(purchases).await {
        joined.unwrap().unwrap();
    }

    let catalog = office.catalog().await;
    assert_eq!(catalog.get("Titanic").unwrap().stock, Some(6));
    assert_eq!(catalog.get("A Origem").unwrap().stock, Some(6));
    assert_eq!(office.history().await.ledger.len(), 4);
}
