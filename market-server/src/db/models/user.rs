//! User model
//!
//! Customers, suppliers and platform admins share one collection;
//! supplier-only fields stay None for the others. The connected-account
//! fields mirror what the payment processor reports through the
//! account webhook channel.

use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

use super::serde_helpers;

/// Supplier approval state, admin-controlled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SupplierStatus {
    Pending,
    Approved,
    Suspended,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    pub name: String,
    pub email: String,
    /// customer | supplier | admin
    pub role: String,
    /// Supplier approval state; None for non-suppliers
    #[serde(default)]
    pub supplier_status: Option<SupplierStatus>,
    /// Payment-processor connected account id
    #[serde(default)]
    pub connect_account_id: Option<String>,
    #[serde(default)]
    pub charges_enabled: bool,
    #[serde(default)]
    pub payouts_enabled: bool,
    /// Derived: charges_enabled && payouts_enabled
    #[serde(default)]
    pub onboarding_completed: bool,
    pub created_at: i64,
}

impl User {
    pub fn is_approved_supplier(&self) -> bool {
        self.role == "supplier" && self.supplier_status == Some(SupplierStatus::Approved)
    }
}
