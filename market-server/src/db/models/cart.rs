//! Cart line model
//!
//! One line per (user, product, selector). `selector_key` is the
//! merge key backing the unique index; `price` is the cached line
//! total (unit_price × quantity), recomputed on every mutation.

use serde::{Deserialize, Serialize};
use shared::Selector;
use surrealdb::RecordId;

use super::serde_helpers;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartLine {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    /// Owning user, "user:id" string
    pub user: String,
    /// Target product, "product:id" string
    pub product: String,
    pub selector: Selector,
    /// "product:id|<selector key>" — unique per user
    pub selector_key: String,
    pub quantity: i64,
    /// Unit price at last mutation
    pub unit_price: f64,
    /// Cached line total = unit_price × quantity
    pub price: f64,
    pub created_at: i64,
    pub updated_at: i64,
}

impl CartLine {
    /// Merge key for a (product, selector) pair
    pub fn key_for(product_id: &str, selector: &Selector) -> String {
        format!("{}|{}", product_id, selector.line_key())
    }
}
