//! On-disk layout and durability across restarts.

use ticketbooth::catalog::default_catalog;
use ticketbooth::refresh::StaticCatalogSource;

use crate::common::*;

#[tokio::test]
async fn test_fresh_data_dir_serves_default_catalog() {
    let dir = TempDir::new().unwrap();
    let office = BoxOffice::from_config(&storage_config(&dir)).await.unwrap();

    assert_eq!(office.catalog().await, default_catalog());
    assert!(office.history().await.ledger.is_empty());
}

#[tokio::test]
async fn test_sales_survive_restart() {
    let dir = TempDir::new().unwrap();
    {
        let office = office_with_titanic(&dir, 10).await;
        office
            .purchase(&Principal::user(), "Titanic", &form("25", "nao", "3"))
            .await
            .unwrap();
    }

    let reopened = BoxOffice::from_config(&storage_config(&dir)).await.unwrap();
    assert_eq!(titanic_stock(&reopened).await, Some(7));
    let history = reopened.history().await;
    assert_eq!(history.ledger.len(), 1);
    assert_eq!(history.total_revenue, 60.0);
}

#[tokio::test]
async fn test_on_disk_field_names() {
    let dir = TempDir::new().unwrap();
    let office = office_with_titanic(&dir, 10).await;
    office
        .purchase(&Principal::user(), "Titanic", &form("16", "nao", "2"))
        .await
        .unwrap();

    let data_dir = dir.path().join("dados");
    let catalog: serde_json::Value =
        serde_json::from_slice(&std::fs::read(data_dir.join("filmes.json")).unwrap()).unwrap();
    assert_eq!(catalog["Titanic"]["estoque"], 8);
    assert_eq!(catalog["Titanic"]["preco"], 20.0);
    assert_eq!(catalog["Titanic"]["ano"], 1997);

    let ledger: serde_json::Value =
        serde_json::from_slice(&std::fs::read(data_dir.join("historico.json")).unwrap()).unwrap();
    let record = &ledger[0];
    assert_eq!(record["filme"], "Titanic");
    assert_eq!(record["tipo"], "Meia");
    assert_eq!(record["quantidade"], 2);
    assert_eq!(record["total"], 20.0);
    assert!(record["data"].is_string());
}

#[tokio::test]
async fn test_corrupt_catalog_loads_as_default() {
    let dir = TempDir::new().unwrap();
    let config = storage_config(&dir);
    std::fs::create_dir_all(&config.data_dir).unwrap();
    std::fs::write(dir.path().join("dados/filmes.json"), b"{ not json").unwrap();

    let office = BoxOffice::from_config(&config).await.unwrap();
    assert_eq!(office.catalog().await, default_catalog());
}

#[tokio::test]
async fn test_hand_edited_entry_without_stock() {
    let dir = TempDir::new().unwrap();
    let config = storage_config(&dir);
    std::fs::create_dir_all(&config.data_dir).unwrap();
    std::fs::write(
        dir.path().join("dados/filmes.json"),
        br#"{"Titanic": {"preco": 20.0}, "A Origem": {"estoque": 3, "preco": 20.0}}"#,
    )
    .unwrap();
    let office = BoxOffice::from_config(&config).await.unwrap();

    assert_eq!(office.catalog().await.len(), 2);
    let result = office
        .purchase(&Principal::user(), "Titanic", &form("30", "nao", "1"))
        .await;
    assert!(matches!(
        result,
        Err(Error::Purchase(PurchaseError::MalformedEntry { field: "estoque", .. }))
    ));

    office
        .purchase(&Principal::user(), "A Origem", &form("30", "nao", "1"))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_refresh_is_persisted() {
    let dir = TempDir::new().unwrap();
    let office = office_with_titanic(&dir, 4).await;
    let mut fresh = Catalog::new();
    fresh.insert("Titanic", CatalogEntry::new(100, 25.0));
    fresh.insert("Duna", CatalogEntry::new(100, 25.0));

    let outcome = office
        .refresh_catalog(&Principal::admin(), &StaticCatalogSource::new(fresh), true)
        .await
        .unwrap();
    assert_eq!(outcome, RefreshOutcome::Updated { titles: 2 });

    let reopened = BoxOffice::from_config(&storage_config(&dir)).await.unwrap();
    let catalog = reopened.catalog().await;
    assert_eq!(catalog.get("Titanic").unwrap().stock, Some(4));
    assert_eq!(catalog.get("Titanic").unwrap().price, Some(25.0));
    assert!(catalog.contains("Duna"));
}

#[tokio::test]
async fn test_wrong_typed_entry_does_not_replace_catalog() {
    let dir = TempDir::new().unwrap();
    let config = storage_config(&dir);
    std::fs::create_dir_all(&config.data_dir).unwrap();
    std::fs::write(
        dir.path().join("dados/filmes.json"),
        br#"{
            "Titanic": {"estoque": 3, "preco": 20.0, "ano": 1997},
            "Duna": {"estoque": "10", "preco": 20.0, "ano": null}
        }"#,
    )
    .unwrap();
    let office = BoxOffice::from_config(&config).await.unwrap();
    let buyer = Principal::user();

    let titles: Vec<String> = office.catalog().await.titles().map(String::from).collect();
    assert_eq!(titles, vec!["Duna", "Titanic"]);

    let oversell = office
        .purchase(&buyer, "Titanic", &form("30", "nao", "10"))
        .await;
    assert!(matches!(
        oversell,
        Err(Error::Purchase(PurchaseError::InsufficientStock {
            available: 3,
            requested: 10
        }))
    ));

    let duna = office.purchase(&buyer, "Duna", &form("30", "nao", "1")).await;
    assert!(matches!(
        duna,
        Err(Error::Purchase(PurchaseError::MalformedEntry { field: "estoque", .. }))
    ));

    office
        .purchase(&buyer, "Titanic", &form("30", "nao", "1"))
        .await
        .unwrap();

    let on_disk: serde_json::Value =
        serde_json::from_slice(&std::fs::read(dir.path().join("dados/filmes.json")).unwrap())
            .unwrap();
    assert_eq!(on_disk["Titanic"]["estoque"], 2);
    assert!(on_disk.get("Duna").is_some());
}

#[tokio::test]
async fn test_unknown_ticket_type_survives_new_sales() {
    let dir = TempDir::new().unwrap();
    let office = office_with_titanic(&dir, 10).await;
    let ledger_path = dir.path().join("dados/historico.json");
    std::fs::write(
        &ledger_path,
        br#"[{"filme": "Titanic", "tipo": "Cortesia", "quantidade": 1, "total": 0.0, "data": "01/01/2025 10:00"}]"#,
    )
    .unwrap();

    office
        .purchase(&Principal::user(), "Titanic", &form("30", "nao", "2"))
        .await
        .unwrap();

    let history = office.history().await;
    assert_eq!(history.ledger.len(), 2);
    assert_eq!(history.ledger.unrecognized(), 1);
    assert_eq!(history.total_revenue, 40.0);

    let on_disk: serde_json::Value =
        serde_json::from_slice(&std::fs::read(&ledger_path).unwrap()).unwrap();
    assert_eq!(on_disk[0]["tipo"], "Cortesia");
    assert_eq!(on_disk[1]["tipo"], "Inteira");
}
