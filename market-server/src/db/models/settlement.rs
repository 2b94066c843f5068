//! Supplier settlement model
//!
//! One record per (order, supplier), created alongside the Payment at
//! checkout time. Holds the supplier's item subtotal, the platform
//! commission taken from it and the remaining payable amount. Only an
//! explicit payout action advances `pending` to `transferred`.

use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

use super::serde_helpers;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SettlementStatus {
    Pending,
    Transferred,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupplierSettlement {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    /// "order:id" string
    pub order_id: String,
    /// "user:id" string
    pub supplier_id: String,
    /// Supplier's item subtotal
    pub total_amount: f64,
    /// Platform commission = round2(total_amount × rate)
    pub admin_commission: f64,
    /// total_amount − admin_commission
    pub payable_amount: f64,
    pub status: SettlementStatus,
    pub created_at: i64,
    pub updated_at: i64,
}
