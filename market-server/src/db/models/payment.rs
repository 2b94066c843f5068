//! Payment model
//!
//! One record per checkout attempt. The transaction id is a
//! human-readable sequence drawn from an atomic counter, unique across
//! the whole system and never reused. An order can accumulate several
//! payment records if earlier attempts failed.

use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

use super::serde_helpers;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentState {
    Pending,
    Success,
    Failed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    /// "order:id" string
    pub order_id: String,
    /// "user:id" string
    pub user_id: String,
    /// Grand total across all owners
    pub amount: f64,
    pub status: PaymentState,
    /// Sequential human-readable id, e.g. "TXN-000042"
    pub transaction_id: String,
    /// Checkout session id from the payment processor
    #[serde(default)]
    pub session_id: Option<String>,
    /// Payment-intent reference used by webhook lookup
    #[serde(default)]
    pub payment_intent: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}
