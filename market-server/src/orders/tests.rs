use std::collections::HashMap;

use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem};

use super::*;
use crate::auth::CurrentUser;
use crate::cart::{AddToCartRequest, CartLedger};
use crate::db::init_schema;
use crate::db::models::{
    Order, OrderItem, OrderStatus, OrderType, PaymentStatus, Product, SupplierStatus, User,
    Wholesale, WholesaleKind, CaseItem,
};
use crate::db::repository::{ProductRepository, UserRepository};
use shared::{AppError, Selector};

async fn test_db() -> Surreal<Db> {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    init_schema(&db).await.unwrap();
    db
}

fn customer(id: &str) -> CurrentUser {
    CurrentUser {
        id: id.to_string(),
        name: "Test".to_string(),
        role: "customer".to_string(),
    }
}

fn admin() -> CurrentUser {
    CurrentUser {
        id: "user:admin".to_string(),
        name: "Admin".to_string(),
        role: "admin".to_string(),
    }
}

async fn seed_supplier(db: &Surreal<Db>, status: SupplierStatus) -> String {
    let user = UserRepository::new(db.clone())
        .create(User {
            id: None,
            name: "Supplier".to_string(),
            email: "supplier@example.com".to_string(),
            role: "supplier".to_string(),
            supplier_status: Some(status),
            connect_account_id: None,
            charges_enabled: false,
            payouts_enabled: false,
            onboarding_completed: false,
            created_at: 0,
        })
        .await
        .unwrap();
    user.id.unwrap().to_string()
}

async fn seed_product(db: &Surreal<Db>, retail: f64, supplier: Option<&str>) -> String {
    let product = ProductRepository::new(db.clone())
        .create(Product {
            id: None,
            name: "Olive oil".to_string(),
            supplier: supplier.map(|s| s.parse().unwrap()),
            retail_price_from: Some(retail),
            variants: vec![],
            wholesale_ids: vec![],
            is_active: true,
            created_at: 0,
        })
        .await
        .unwrap();
    product.id.unwrap().to_string()
}

fn cart_add(product_id: &str, quantity: i64) -> AddToCartRequest {
    AddToCartRequest {
        product_id: product_id.to_string(),
        selector: Selector::Retail,
        quantity,
    }
}

#[tokio::test]
async fn add_to_cart_order_snapshots_cart() {
    // Scenario C: order total equals the sum of cached line prices
    let db = test_db().await;
    let p1 = seed_product(&db, 10.0, None).await;
    let p2 = seed_product(&db, 4.5, None).await;

    let ledger = CartLedger::new(db.clone());
    ledger.add("user:alice", cart_add(&p1, 2)).await.unwrap();
    ledger.add("user:alice", cart_add(&p2, 3)).await.unwrap();

    let assembler = OrderAssembler::new(db);
    let order = assembler
        .create(
            "user:alice",
            CreateOrderRequest {
                order_type: OrderType::AddToCart,
                items: vec![],
            },
        )
        .await
        .unwrap();

    assert_eq!(order.items.len(), 2);
    assert_eq!(order.total_price, 33.5);
    assert_eq!(order.payment_status, PaymentStatus::Unpaid);
    assert_eq!(order.order_status, OrderStatus::Pending);

    // Cart survives order creation
    let (lines, _) = ledger.list("user:alice", 1, 10).await.unwrap();
    assert_eq!(lines.len(), 2);
}

#[tokio::test]
async fn empty_cart_is_rejected() {
    let db = test_db().await;
    let assembler = OrderAssembler::new(db);

    let err = assembler
        .create(
            "user:alice",
            CreateOrderRequest {
                order_type: OrderType::AddToCart,
                items: vec![],
            },
        )
        .await;
    assert!(matches!(err, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn single_order_prices_from_catalog() {
    let db = test_db().await;
    let supplier_id = seed_supplier(&db, SupplierStatus::Approved).await;
    let product_id = seed_product(&db, 10.0, Some(&supplier_id)).await;

    let assembler = OrderAssembler::new(db);
    let order = assembler
        .create(
            "user:alice",
            CreateOrderRequest {
                order_type: OrderType::Single,
                items: vec![OrderItemInput {
                    product_id: product_id.clone(),
                    selector: Selector::Retail,
                    quantity: 3,
                }],
            },
        )
        .await
        .unwrap();

    assert_eq!(order.items.len(), 1);
    assert_eq!(order.items[0].unit_price, 10.0);
    assert_eq!(order.items[0].subtotal, 30.0);
    assert_eq!(order.items[0].supplier_id.as_deref(), Some(supplier_id.as_str()));
    assert_eq!(order.total_price, 30.0);
}

#[tokio::test]
async fn cancel_only_from_pending() {
    // P4: cancelled orders survive as documents and stay terminal
    let db = test_db().await;
    let product_id = seed_product(&db, 10.0, None).await;

    let assembler = OrderAssembler::new(db);
    let order = assembler
        .create(
            "user:alice",
            CreateOrderRequest {
                order_type: OrderType::Single,
                items: vec![OrderItemInput {
                    product_id,
                    selector: Selector::Retail,
                    quantity: 1,
                }],
            },
        )
        .await
        .unwrap();
    let order_id = order.id.unwrap().to_string();

    let cancelled = assembler
        .cancel(&customer("user:alice"), &order_id)
        .await
        .unwrap();
    assert_eq!(cancelled.order_status, OrderStatus::Cancelled);

    // Second cancel and admin transitions both refuse
    let err = assembler.cancel(&customer("user:alice"), &order_id).await;
    assert!(matches!(err, Err(AppError::Conflict(_))));
    let err = assembler
        .update_status(&order_id, OrderStatus::Delivered)
        .await;
    assert!(matches!(err, Err(AppError::Conflict(_))));

    // Still readable
    let found = assembler.find(&order_id).await.unwrap();
    assert_eq!(found.order_status, OrderStatus::Cancelled);
}

#[tokio::test]
async fn cancel_requires_owner_or_admin() {
    let db = test_db().await;
    let product_id = seed_product(&db, 10.0, None).await;

    let assembler = OrderAssembler::new(db);
    let order = assembler
        .create(
            "user:alice",
            CreateOrderRequest {
                order_type: OrderType::Single,
                items: vec![OrderItemInput {
                    product_id,
                    selector: Selector::Retail,
                    quantity: 1,
                }],
            },
        )
        .await
        .unwrap();
    let order_id = order.id.unwrap().to_string();

    let err = assembler.cancel(&customer("user:mallory"), &order_id).await;
    assert!(matches!(err, Err(AppError::Forbidden(_))));

    // Admin may cancel on the owner's behalf
    let cancelled = assembler.cancel(&admin(), &order_id).await.unwrap();
    assert_eq!(cancelled.order_status, OrderStatus::Cancelled);
}

#[tokio::test]
async fn delivered_transition_by_admin() {
    let db = test_db().await;
    let product_id = seed_product(&db, 10.0, None).await;

    let assembler = OrderAssembler::new(db);
    let order = assembler
        .create(
            "user:alice",
            CreateOrderRequest {
                order_type: OrderType::Single,
                items: vec![OrderItemInput {
                    product_id,
                    selector: Selector::Retail,
                    quantity: 1,
                }],
            },
        )
        .await
        .unwrap();
    let order_id = order.id.unwrap().to_string();

    let delivered = assembler
        .update_status(&order_id, OrderStatus::Delivered)
        .await
        .unwrap();
    assert_eq!(delivered.order_status, OrderStatus::Delivered);
}

#[tokio::test]
async fn supplier_orders_requires_approval() {
    let db = test_db().await;
    let supplier_id = seed_supplier(&db, SupplierStatus::Pending).await;

    let assembler = OrderAssembler::new(db);
    let err = assembler.supplier_orders(&supplier_id, 1, 10).await;
    assert!(matches!(err, Err(AppError::Forbidden(_))));
}

#[tokio::test]
async fn supplier_orders_shows_only_own_items() {
    let db = test_db().await;
    let supplier_a = seed_supplier(&db, SupplierStatus::Approved).await;
    let supplier_b = seed_supplier(&db, SupplierStatus::Approved).await;
    let pa = seed_product(&db, 10.0, Some(&supplier_a)).await;
    let pb = seed_product(&db, 7.0, Some(&supplier_b)).await;

    let assembler = OrderAssembler::new(db);
    assembler
        .create(
            "user:alice",
            CreateOrderRequest {
                order_type: OrderType::Single,
                items: vec![
                    OrderItemInput {
                        product_id: pa.clone(),
                        selector: Selector::Retail,
                        quantity: 2,
                    },
                    OrderItemInput {
                        product_id: pb,
                        selector: Selector::Retail,
                        quantity: 1,
                    },
                ],
            },
        )
        .await
        .unwrap();

    let (views, total) = assembler.supplier_orders(&supplier_a, 1, 10).await.unwrap();
    assert_eq!(total, 1);
    assert_eq!(views.len(), 1);
    assert_eq!(views[0].items.len(), 1);
    assert_eq!(views[0].items[0].product_id, pa);
    assert_eq!(views[0].supplier_total, 20.0);
}

#[test]
fn supplier_view_trims_sibling_offer_entries() {
    // A case offer covering two products must surface only the entry
    // for the item under view
    let offer: Wholesale = Wholesale {
        id: Some("wholesale:w1".parse().unwrap()),
        kind: WholesaleKind::Case,
        supplier: None,
        case_items: vec![
            CaseItem {
                product_id: "product:p1".to_string(),
                price: 100.0,
                discount_percent: 10.0,
                quantity: 50,
            },
            CaseItem {
                product_id: "product:p2".to_string(),
                price: 60.0,
                discount_percent: 5.0,
                quantity: 20,
            },
        ],
        pallets: vec![],
        created_at: 0,
    };
    let mut offers = HashMap::new();
    offers.insert("wholesale:w1".to_string(), offer);

    let order = Order {
        id: Some("order:o1".parse().unwrap()),
        user: "user:alice".to_string(),
        order_type: OrderType::Single,
        items: vec![OrderItem {
            product_id: "product:p1".to_string(),
            supplier_id: Some("user:s1".to_string()),
            selector: Selector::Case("wholesale:w1".to_string()),
            quantity: 1,
            unit_price: 90.0,
            subtotal: 90.0,
        }],
        total_price: 90.0,
        payment_status: PaymentStatus::Unpaid,
        order_status: OrderStatus::Pending,
        created_at: 0,
        updated_at: 0,
    };

    let view = supplier_view(&order, "user:s1", &offers);
    assert_eq!(view.items.len(), 1);
    let slice = view.items[0].wholesale.as_ref().unwrap();
    let case_item = slice.case_item.as_ref().unwrap();
    assert_eq!(case_item.product_id, "product:p1");
    assert_eq!(view.supplier_total, 90.0);
}
