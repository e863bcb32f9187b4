//! Reference purchase scenarios.

use crate::common::*;

#[tokio::test]
async fn test_full_price_purchase() {
    let dir = TempDir::new().unwrap();
    let office = office_with_titanic(&dir, 100).await;

    let receipt = office
        .purchase(&Principal::user(), "Titanic", &form("25", "nao", "2"))
        .await
        .unwrap();

    assert_eq!(receipt.ticket_type, TicketType::Full);
    assert_eq!(receipt.total_display(), "40.00");
    assert_eq!(titanic_stock(&office).await, Some(98));

    let history = office.history().await;
    assert_eq!(history.ledger.len(), 1);
    let record = history.ledger.last().unwrap();
    assert_eq!(record.movie_title, "Titanic");
    assert_eq!(record.ticket_type, TicketType::Full);
    assert_eq!(record.quantity, 2);
    assert_eq!(record.total, 40.0);
}

#[tokio::test]
async fn test_minor_pays_half() {
    let dir = TempDir::new().unwrap();
    let office = office_with_titanic(&dir, 100).await;

    let receipt = office
        .purchase(&Principal::user(), "Titanic", &form("16", "nao", "1"))
        .await
        .unwrap();

    assert_eq!(receipt.ticket_type, TicketType::Half);
    assert_eq!(receipt.total_display(), "10.00");
}

#[tokio::test]
async fn test_student_pays_half() {
    let dir = TempDir::new().unwrap();
    let office = office_with_titanic(&dir, 100).await;

    let receipt = office
        .purchase(&Principal::user(), "Titanic", &form("30", "Sim", "1"))
        .await
        .unwrap();

    assert_eq!(receipt.ticket_type, TicketType::Half);
    assert_eq!(receipt.total_display(), "10.00");
}

#[tokio::test]
async fn test_insufficient_stock() {
    let dir = TempDir::new().unwrap();
    let office = office_with_titanic(&dir, 5).await;

    let result = office
        .purchase(&Principal::user(), "Titanic", &form("30", "nao", "10"))
        .await;

    assert!(matches!(
        result,
        Err(Error::Purchase(PurchaseError::InsufficientStock {
            available: 5,
            requested: 10
        }))
    ));
    assert_eq!(titanic_stock(&office).await, Some(5));
    assert!(office.history().await.ledger.is_empty());
}

#[tokio::test]
async fn test_invalid_age() {
    let dir = TempDir::new().unwrap();
    let office = office_with_titanic(&dir, 5).await;

    let err = office
        .purchase(&Principal::user(), "Titanic", &form("-1", "nao", "1"))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        Error::Purchase(PurchaseError::Validation(ValidationError::InvalidAge))
    ));
    assert_eq!(err.to_string(), "invalid age");
    assert_eq!(titanic_stock(&office).await, Some(5));
}

#[tokio::test]
async fn test_zero_quantity() {
    let dir = TempDir::new().unwrap();
    let office = office_with_titanic(&dir, 5).await;

    let err = office
        .purchase(&Principal::user(), "Titanic", &form("30", "nao", "0"))
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "quantity must be positive");
    assert!(office.history().await.ledger.is_empty());
}

#[tokio::test]
async fn test_unknown_movie() {
    let dir = TempDir::new().unwrap();
    let office = office_with_titanic(&dir, 5).await;

    let result = office
        .purchase(&Principal::user(), "Matrix", &form("30", "nao", "1"))
        .await;

    assert!(matches!(
        result,
        Err(Error::Purchase(PurchaseError::NotFound(title))) if title == "Matrix"
    ));
}

#[tokio::test]
async fn test_anonymous_cannot_buy() {
    let dir = TempDir::new().unwrap();
    let office = office_with_titanic(&dir, 5).await;

    let result = office
        .purchase(&Principal::anonymous(), "Titanic", &form("30", "nao", "1"))
        .await;

    assert!(matches!(result, Err(Error::Access(_))));
    assert_eq!(titanic_stock(&office).await, Some(5));
}

#[tokio::test]
async fn test_sales_summary() {
    let dir = TempDir::new().unwrap();
    let office = office_with_titanic(&dir, 10).await;
    let buyer = Principal::user();

    office
        .purchase(&buyer, "Titanic", &form("25", "nao", "2"))
        .await
        .unwrap();
    office
        .purchase(&buyer, "Titanic", &form("16", "nao", "1"))
        .await
        .unwrap();

    assert!(matches!(
        office.summary(&buyer).await,
        Err(Error::Access(_))
    ));

    let view = office.summary(&Principal::admin()).await.unwrap();
    assert_eq!(view.sales.total_sales, 2);
    assert_eq!(view.sales.total_revenue, 50.0);
    assert_eq!(view.sales.sold_by_movie.get("Titanic"), Some(&3));
    assert_eq!(view.catalog.get("Titanic").unwrap().stock, Some(7));
}
