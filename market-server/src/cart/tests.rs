use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem};

use super::*;
use crate::db::init_schema;
use crate::db::models::{CaseItem, Product, Wholesale, WholesaleKind};
use crate::db::repository::{ProductRepository, WholesaleRepository};
use shared::{AppError, Selector};

async fn test_db() -> Surreal<Db> {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    init_schema(&db).await.unwrap();
    db
}

async fn seed_product(db: &Surreal<Db>, retail: f64) -> String {
    let created = ProductRepository::new(db.clone())
        .create(Product {
            id: None,
            name: "Olive oil".to_string(),
            supplier: None,
            retail_price_from: Some(retail),
            variants: vec![],
            wholesale_ids: vec![],
            is_active: true,
            created_at: 0,
        })
        .await
        .unwrap();
    created.id.unwrap().to_string()
}

/// Seed a product plus a case offer referencing it; returns (product, offer) ids
async fn seed_case_product(db: &Surreal<Db>, price: f64, discount: f64) -> (String, String) {
    let products = ProductRepository::new(db.clone());
    let wholesales = WholesaleRepository::new(db.clone());

    let product = products
        .create(Product {
            id: None,
            name: "Olive oil".to_string(),
            supplier: None,
            retail_price_from: Some(10.0),
            variants: vec![],
            wholesale_ids: vec![],
            is_active: true,
            created_at: 0,
        })
        .await
        .unwrap();
    let product_id = product.id.clone().unwrap().to_string();

    let offer = wholesales
        .create(Wholesale {
            id: None,
            kind: WholesaleKind::Case,
            supplier: None,
            case_items: vec![CaseItem {
                product_id: product_id.clone(),
                price,
                discount_percent: discount,
                quantity: 50,
            }],
            pallets: vec![],
            created_at: 0,
        })
        .await
        .unwrap();
    let offer_id = offer.id.unwrap().to_string();

    // Link the offer back onto the product
    db.query("UPDATE $p SET wholesale_ids = [$w]")
        .bind(("p", product.id.clone().unwrap()))
        .bind(("w", offer_id.clone()))
        .await
        .unwrap();

    (product_id, offer_id)
}

fn add_req(product_id: &str, selector: Selector, quantity: i64) -> AddToCartRequest {
    AddToCartRequest {
        product_id: product_id.to_string(),
        selector,
        quantity,
    }
}

#[tokio::test]
async fn add_then_increase_reprices() {
    // Scenario A: retail $10, qty 2 -> $20; +3 -> $50
    let db = test_db().await;
    let product_id = seed_product(&db, 10.0).await;
    let ledger = CartLedger::new(db);

    let line = ledger
        .add("user:alice", add_req(&product_id, Selector::Retail, 2))
        .await
        .unwrap();
    assert_eq!(line.quantity, 2);
    assert_eq!(line.price, 20.0);

    let line_id = line.id.unwrap().to_string();
    let line = ledger.increase("user:alice", &line_id, 3).await.unwrap();
    assert_eq!(line.quantity, 5);
    assert_eq!(line.price, 50.0);
}

#[tokio::test]
async fn repeated_add_merges_into_one_line() {
    // P2: q1 + q2 on the same selector yields one line
    let db = test_db().await;
    let product_id = seed_product(&db, 10.0).await;
    let ledger = CartLedger::new(db.clone());

    ledger
        .add("user:alice", add_req(&product_id, Selector::Retail, 2))
        .await
        .unwrap();
    let merged = ledger
        .add("user:alice", add_req(&product_id, Selector::Retail, 3))
        .await
        .unwrap();

    assert_eq!(merged.quantity, 5);
    assert_eq!(merged.price, 50.0);

    let (lines, total) = ledger.list("user:alice", 1, 10).await.unwrap();
    assert_eq!(lines.len(), 1);
    assert_eq!(total, 1);
}

#[tokio::test]
async fn case_wholesale_unit_price_discounted() {
    // Scenario B: case $100, 10% off -> line $90
    let db = test_db().await;
    let (product_id, offer_id) = seed_case_product(&db, 100.0, 10.0).await;
    let ledger = CartLedger::new(db);

    let line = ledger
        .add(
            "user:alice",
            add_req(&product_id, Selector::Case(offer_id), 1),
        )
        .await
        .unwrap();
    assert_eq!(line.unit_price, 90.0);
    assert_eq!(line.price, 90.0);
}

#[tokio::test]
async fn decrease_below_one_removes_line() {
    // P3: decrease >= quantity deletes; less leaves the repriced line
    let db = test_db().await;
    let product_id = seed_product(&db, 10.0).await;
    let ledger = CartLedger::new(db);

    let line = ledger
        .add("user:alice", add_req(&product_id, Selector::Retail, 3))
        .await
        .unwrap();
    let line_id = line.id.unwrap().to_string();

    match ledger.decrease("user:alice", &line_id, 1).await.unwrap() {
        DecreaseOutcome::Updated { line } => {
            assert_eq!(line.quantity, 2);
            assert_eq!(line.price, 20.0);
        }
        other => panic!("expected updated line, got {other:?}"),
    }

    match ledger.decrease("user:alice", &line_id, 5).await.unwrap() {
        DecreaseOutcome::Removed { id } => assert_eq!(id, line_id),
        other => panic!("expected removal, got {other:?}"),
    }

    let (lines, _) = ledger.list("user:alice", 1, 10).await.unwrap();
    assert!(lines.is_empty());
}

#[tokio::test]
async fn foreign_user_cannot_mutate_line() {
    // P7: ownership mismatch fails with Forbidden and writes nothing
    let db = test_db().await;
    let product_id = seed_product(&db, 10.0).await;
    let ledger = CartLedger::new(db);

    let line = ledger
        .add("user:alice", add_req(&product_id, Selector::Retail, 2))
        .await
        .unwrap();
    let line_id = line.id.unwrap().to_string();

    let err = ledger.increase("user:mallory", &line_id, 1).await;
    assert!(matches!(err, Err(AppError::Forbidden(_))));
    let err = ledger.decrease("user:mallory", &line_id, 1).await;
    assert!(matches!(err, Err(AppError::Forbidden(_))));
    let err = ledger.remove("user:mallory", &line_id).await;
    assert!(matches!(err, Err(AppError::Forbidden(_))));

    // Line untouched
    let (lines, _) = ledger.list("user:alice", 1, 10).await.unwrap();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].quantity, 2);
    assert_eq!(lines[0].price, 20.0);
}

#[tokio::test]
async fn unknown_product_aborts_add() {
    let db = test_db().await;
    let ledger = CartLedger::new(db);

    let err = ledger
        .add(
            "user:alice",
            add_req("product:missing", Selector::Retail, 1),
        )
        .await;
    assert!(matches!(err, Err(AppError::NotFound(_))));

    let (lines, _) = ledger.list("user:alice", 1, 10).await.unwrap();
    assert!(lines.is_empty());
}

#[tokio::test]
async fn list_aborts_when_product_vanishes() {
    let db = test_db().await;
    let product_id = seed_product(&db, 10.0).await;
    let ledger = CartLedger::new(db.clone());

    let line = ledger
        .add("user:alice", add_req(&product_id, Selector::Retail, 2))
        .await
        .unwrap();

    let product_rid: surrealdb::RecordId = product_id.parse().unwrap();
    db.query("DELETE $p").bind(("p", product_rid)).await.unwrap();

    let err = ledger.list("user:alice", 1, 10).await;
    assert!(matches!(err, Err(AppError::NotFound(_))));

    // The orphaned line can still be removed
    let line_id = line.id.unwrap().to_string();
    ledger.remove("user:alice", &line_id).await.unwrap();
    let (lines, _) = ledger.list("user:alice", 1, 10).await.unwrap();
    assert!(lines.is_empty());
}

#[tokio::test]
async fn list_refreshes_stale_case_discount() {
    let db = test_db().await;
    let (product_id, offer_id) = seed_case_product(&db, 100.0, 10.0).await;
    let ledger = CartLedger::new(db.clone());

    let line = ledger
        .add(
            "user:alice",
            add_req(&product_id, Selector::Case(offer_id.clone()), 2),
        )
        .await
        .unwrap();
    assert_eq!(line.price, 180.0);

    // Live discount moves from 10% to 20%
    let offer_rid: surrealdb::RecordId = offer_id.parse().unwrap();
    db.query("UPDATE $w SET case_items[0].discount_percent = 20.0")
        .bind(("w", offer_rid))
        .await
        .unwrap();

    let (views, _) = ledger.list("user:alice", 1, 10).await.unwrap();
    assert_eq!(views.len(), 1);
    assert_eq!(views[0].unit_price, 80.0);
    assert_eq!(views[0].price, 160.0);
}
