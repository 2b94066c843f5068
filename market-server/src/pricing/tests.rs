use super::*;
use crate::db::models::{CaseItem, Pallet, PalletLine, Product, Variant, Wholesale, WholesaleKind};
use shared::Selector;
use surrealdb::RecordId;

fn record_id(s: &str) -> Option<RecordId> {
    Some(s.parse().unwrap())
}

fn product(id: &str, retail: Option<f64>) -> Product {
    Product {
        id: record_id(id),
        name: "Test product".to_string(),
        supplier: None,
        retail_price_from: retail,
        variants: vec![],
        wholesale_ids: vec![],
        is_active: true,
        created_at: 0,
    }
}

fn case_offer(id: &str, product_id: &str, price: f64, discount: f64) -> Wholesale {
    Wholesale {
        id: record_id(id),
        kind: WholesaleKind::Case,
        supplier: None,
        case_items: vec![CaseItem {
            product_id: product_id.to_string(),
            price,
            discount_percent: discount,
            quantity: 50,
        }],
        pallets: vec![],
        created_at: 0,
    }
}

fn pallet_offer(id: &str, product_id: &str, price: f64) -> Wholesale {
    Wholesale {
        id: record_id(id),
        kind: WholesaleKind::Pallet,
        supplier: None,
        case_items: vec![],
        pallets: vec![Pallet {
            id: "pl1".to_string(),
            price,
            total_cases: 40,
            items: vec![PalletLine {
                product_id: product_id.to_string(),
                case_quantity: 40,
            }],
        }],
        created_at: 0,
    }
}

#[test]
fn retail_line_uses_base_price() {
    // Scenario A: $10 retail, qty 2 -> $20
    let p = product("product:p1", Some(10.0));
    let resolved = resolve_price(&p, &[], &Selector::Retail, 2).unwrap();
    assert_eq!(resolved.unit_price, 10.0);
    assert_eq!(resolved.discount_percent, 0.0);
    assert_eq!(line_total(resolved.unit_price, 2), 20.0);
    assert_eq!(line_total(resolved.unit_price, 5), 50.0);
}

#[test]
fn retail_defaults_to_zero_without_base_price() {
    let p = product("product:p1", None);
    let resolved = resolve_price(&p, &[], &Selector::Retail, 1).unwrap();
    assert_eq!(resolved.unit_price, 0.0);
}

#[test]
fn variant_prefers_positive_discount_price() {
    let mut p = product("product:p1", Some(10.0));
    p.variants.push(Variant {
        id: "v1".to_string(),
        label: "1kg bag".to_string(),
        unit: Some("bag".to_string()),
        price: 12.0,
        discount_price: 9.5,
        stock: 100,
    });

    let resolved = resolve_price(&p, &[], &Selector::Variant("v1".to_string()), 1).unwrap();
    assert_eq!(resolved.unit_price, 9.5);
    assert_eq!(resolved.original_price, 12.0);
    assert_eq!(resolved.unit_label.as_deref(), Some("bag"));
}

#[test]
fn variant_without_discount_uses_full_price() {
    let mut p = product("product:p1", Some(10.0));
    p.variants.push(Variant {
        id: "v1".to_string(),
        label: "1kg bag".to_string(),
        unit: None,
        price: 12.0,
        discount_price: 0.0,
        stock: 100,
    });

    let resolved = resolve_price(&p, &[], &Selector::Variant("v1".to_string()), 1).unwrap();
    assert_eq!(resolved.unit_price, 12.0);
    assert_eq!(resolved.discount_percent, 0.0);
}

#[test]
fn unknown_variant_is_not_found() {
    let p = product("product:p1", Some(10.0));
    let err = resolve_price(&p, &[], &Selector::Variant("missing".to_string()), 1);
    assert!(matches!(err, Err(shared::AppError::NotFound(_))));
}

#[test]
fn case_price_applies_percentage_discount() {
    // Scenario B: case price $100, discount 10% -> unit $90
    let p = product("product:p1", Some(10.0));
    let offer = case_offer("wholesale:w1", "product:p1", 100.0, 10.0);

    let resolved =
        resolve_price(&p, &[offer], &Selector::Case("wholesale:w1".to_string()), 1).unwrap();
    assert_eq!(resolved.unit_price, 90.0);
    assert_eq!(resolved.original_price, 100.0);
    assert_eq!(resolved.discount_percent, 10.0);
    assert_eq!(line_total(resolved.unit_price, 1), 90.0);
}

#[test]
fn case_discount_rounds_to_cents() {
    let p = product("product:p1", None);
    let offer = case_offer("wholesale:w1", "product:p1", 9.99, 33.0);

    let resolved =
        resolve_price(&p, &[offer], &Selector::Case("wholesale:w1".to_string()), 1).unwrap();
    // 9.99 * 0.67 = 6.6933 -> 6.69
    assert_eq!(resolved.unit_price, 6.69);
}

#[test]
fn case_offer_missing_product_is_not_found() {
    let p = product("product:p2", None);
    let offer = case_offer("wholesale:w1", "product:p1", 100.0, 10.0);
    let err = resolve_price(&p, &[offer], &Selector::Case("wholesale:w1".to_string()), 1);
    assert!(matches!(err, Err(shared::AppError::NotFound(_))));
}

#[test]
fn pallet_is_priced_flat_per_pallet() {
    // P1: pallet flat price regardless of case count inside
    let p = product("product:p1", None);
    let offer = pallet_offer("wholesale:w2", "product:p1", 800.0);

    let resolved =
        resolve_price(&p, &[offer], &Selector::Pallet("wholesale:w2".to_string()), 3).unwrap();
    assert_eq!(resolved.unit_price, 800.0);
    assert_eq!(resolved.original_price, 800.0);
    // quantity counts pallets
    assert_eq!(line_total(resolved.unit_price, 3), 2400.0);
}

#[test]
fn kind_mismatch_is_not_found() {
    let p = product("product:p1", None);
    let offer = case_offer("wholesale:w1", "product:p1", 100.0, 10.0);
    // Asking for a pallet out of a case offer must fail
    let err = resolve_price(&p, &[offer], &Selector::Pallet("wholesale:w1".to_string()), 1);
    assert!(matches!(err, Err(shared::AppError::NotFound(_))));
}

#[test]
fn zero_or_negative_quantity_rejected() {
    let p = product("product:p1", Some(10.0));
    assert!(matches!(
        resolve_price(&p, &[], &Selector::Retail, 0),
        Err(shared::AppError::Validation(_))
    ));
    assert!(matches!(
        resolve_price(&p, &[], &Selector::Retail, -2),
        Err(shared::AppError::Validation(_))
    ));
}

#[test]
fn decimal_accumulation_is_exact() {
    // Classic floating point problem: 0.1 + 0.2 != 0.3
    let sum = to_decimal(0.1) + to_decimal(0.2);
    assert_eq!(to_f64(sum), 0.3);

    let mut total = rust_decimal::Decimal::ZERO;
    for _ in 0..1000 {
        total += to_decimal(0.01);
    }
    assert_eq!(to_f64(total), 10.0);
}
