//! Order model
//!
//! Orders are immutable snapshots except for two controlled fields:
//! `payment_status` and `order_status`. Items copy product, supplier,
//! selector, quantity and unit price at creation time and are never
//! re-derived. Orders are never deleted; cancellation is a status
//! transition.

use serde::{Deserialize, Serialize};
use shared::Selector;
use surrealdb::RecordId;

use super::serde_helpers;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Unpaid,
    Paid,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Delivered,
    Cancelled,
}

/// How the order was assembled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OrderType {
    AddToCart,
    Single,
}

/// Snapshot of one purchased line
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    /// "product:id" string
    pub product_id: String,
    /// Owning supplier ("user:id"); None means platform-owned
    #[serde(default)]
    pub supplier_id: Option<String>,
    pub selector: Selector,
    pub quantity: i64,
    /// Unit price copied at order-creation time
    pub unit_price: f64,
    /// unit_price × quantity, rounded to 2 decimal places
    pub subtotal: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    /// Ordering user, "user:id" string
    pub user: String,
    pub order_type: OrderType,
    pub items: Vec<OrderItem>,
    /// Sum of item subtotals at creation
    pub total_price: f64,
    pub payment_status: PaymentStatus,
    pub order_status: OrderStatus,
    pub created_at: i64,
    pub updated_at: i64,
}
