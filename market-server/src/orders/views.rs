//! Supplier-facing order views
//!
//! A supplier sees only their own slice of an order: foreign items are
//! dropped and wholesale offers are cut down to the entry relevant to
//! the viewed item, so one supplier's offer contents never leak to
//! another.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::Serialize;
use shared::Selector;

use crate::db::models::{CaseItem, Order, OrderStatus, Pallet, PaymentStatus, Wholesale, WholesaleKind};
use crate::pricing::{to_decimal, to_f64};

/// The single entry of a wholesale offer relevant to one order item
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WholesaleSlice {
    pub offer_id: String,
    pub kind: WholesaleKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub case_item: Option<CaseItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pallet: Option<Pallet>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SupplierOrderItemView {
    pub product_id: String,
    pub selector: Selector,
    pub quantity: i64,
    pub unit_price: f64,
    pub subtotal: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wholesale: Option<WholesaleSlice>,
}

/// One order as seen by a single supplier
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SupplierOrderView {
    pub id: String,
    pub user: String,
    pub payment_status: PaymentStatus,
    pub order_status: OrderStatus,
    pub items: Vec<SupplierOrderItemView>,
    /// Sum of this supplier's subtotals only
    pub supplier_total: f64,
    pub created_at: i64,
}

/// Project an order onto one supplier's view. `offers` maps
/// "wholesale:id" strings to the fetched offer documents.
pub fn supplier_view(
    order: &Order,
    supplier_id: &str,
    offers: &HashMap<String, Wholesale>,
) -> SupplierOrderView {
    let mut items = Vec::new();
    let mut total = Decimal::ZERO;

    for item in &order.items {
        if item.supplier_id.as_deref() != Some(supplier_id) {
            continue;
        }
        total += to_decimal(item.subtotal);
        items.push(SupplierOrderItemView {
            product_id: item.product_id.clone(),
            selector: item.selector.clone(),
            quantity: item.quantity,
            unit_price: item.unit_price,
            subtotal: item.subtotal,
            wholesale: slice_for(&item.selector, &item.product_id, offers),
        });
    }

    SupplierOrderView {
        id: order.id.as_ref().map(|i| i.to_string()).unwrap_or_default(),
        user: order.user.clone(),
        payment_status: order.payment_status,
        order_status: order.order_status,
        items,
        supplier_total: to_f64(total),
        created_at: order.created_at,
    }
}

/// Cut a wholesale offer down to the entry covering one product
fn slice_for(
    selector: &Selector,
    product_id: &str,
    offers: &HashMap<String, Wholesale>,
) -> Option<WholesaleSlice> {
    let offer_id = selector.wholesale_id()?;
    let offer = offers.get(offer_id)?;

    match offer.kind {
        WholesaleKind::Case => Some(WholesaleSlice {
            offer_id: offer_id.to_string(),
            kind: offer.kind,
            case_item: offer.case_item_for(product_id).cloned(),
            pallet: None,
        }),
        WholesaleKind::Pallet => Some(WholesaleSlice {
            offer_id: offer_id.to_string(),
            kind: offer.kind,
            case_item: None,
            pallet: offer.pallet_containing(product_id).cloned(),
        }),
    }
}
