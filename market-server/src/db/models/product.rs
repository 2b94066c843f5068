//! Product model
//!
//! Catalog items with embedded variants and references to wholesale
//! offers. A product without a supplier is platform-owned (admin
//! stock). Catalog management itself lives in a separate service; the
//! commerce core only reads these documents.

use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

use super::serde_helpers;

/// Embedded product variant
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Variant {
    /// Stable embedded id, referenced by cart/order selectors
    pub id: String,
    pub label: String,
    /// Unit of sale shown next to the price ("kg", "bottle", ...)
    #[serde(default)]
    pub unit: Option<String>,
    pub price: f64,
    /// Discounted unit price; 0 or negative means no discount
    #[serde(default)]
    pub discount_price: f64,
    #[serde(default)]
    pub stock: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    pub name: String,
    /// Owning supplier; None means platform-owned
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub supplier: Option<RecordId>,
    /// Base retail unit price
    #[serde(default)]
    pub retail_price_from: Option<f64>,
    #[serde(default)]
    pub variants: Vec<Variant>,
    /// Wholesale offers referencing this product, as "wholesale:id" strings
    #[serde(default)]
    pub wholesale_ids: Vec<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    pub created_at: i64,
}

fn default_true() -> bool {
    true
}

impl Product {
    /// Look up an embedded variant by id
    pub fn variant(&self, variant_id: &str) -> Option<&Variant> {
        self.variants.iter().find(|v| v.id == variant_id)
    }

    /// Whether this product references the given wholesale offer
    pub fn references_wholesale(&self, wholesale_id: &str) -> bool {
        self.wholesale_ids.iter().any(|w| w == wholesale_id)
    }
}
