//! Wholesale offer model
//!
//! A bulk-purchase configuration of kind `case` or `pallet`.
//!
//! - A case offer lists per-product case prices with a percentage
//!   discount.
//! - A pallet offer lists whole pallets, each priced flat for the
//!   entire pallet regardless of how many cases it bundles.
//!
//! Invariant: a given product appears at most once within one offer's
//! item list.

use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

use super::serde_helpers;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WholesaleKind {
    Case,
    Pallet,
}

/// One product's case pricing inside a case offer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseItem {
    /// Target product, "product:id" string
    pub product_id: String,
    /// Case price before discount
    pub price: f64,
    /// Percentage discount (0-100)
    #[serde(default)]
    pub discount_percent: f64,
    /// Cases available
    #[serde(default)]
    pub quantity: i64,
}

/// Constituent of a pallet: a product and how many cases of it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PalletLine {
    pub product_id: String,
    pub case_quantity: i64,
}

/// A whole pallet, priced flat
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pallet {
    /// Stable embedded id
    pub id: String,
    /// Flat price for the entire pallet
    pub price: f64,
    #[serde(default)]
    pub total_cases: i64,
    pub items: Vec<PalletLine>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Wholesale {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    pub kind: WholesaleKind,
    /// Owning supplier; None means platform-owned
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub supplier: Option<RecordId>,
    /// Populated when kind == case
    #[serde(default)]
    pub case_items: Vec<CaseItem>,
    /// Populated when kind == pallet
    #[serde(default)]
    pub pallets: Vec<Pallet>,
    pub created_at: i64,
}

impl Wholesale {
    /// Case pricing for a product within this offer
    pub fn case_item_for(&self, product_id: &str) -> Option<&CaseItem> {
        self.case_items.iter().find(|c| c.product_id == product_id)
    }

    /// The pallet containing a product within this offer
    pub fn pallet_containing(&self, product_id: &str) -> Option<&Pallet> {
        self.pallets
            .iter()
            .find(|p| p.items.iter().any(|l| l.product_id == product_id))
    }
}
