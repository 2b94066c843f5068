//! Payment repository
//!
//! Payment records and the sequential transaction counter. The
//! Payment and its per-supplier settlements are written inside one
//! transaction: a mid-sequence failure cannot leave an orphaned
//! Payment without its settlements.

use serde::Deserialize;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{Payment, PaymentState, SupplierSettlement};

#[derive(Debug, Deserialize)]
struct CounterRow {
    value: i64,
}

#[derive(Clone)]
pub struct PaymentRepository {
    base: BaseRepository,
}

impl PaymentRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Draw the next value from the transaction counter. Atomic
    /// increment; values are monotonically increasing and never reused.
    pub async fn next_transaction_seq(&self) -> RepoResult<i64> {
        let rows: Vec<CounterRow> = self
            .base
            .db()
            .query("UPDATE counter:payment_txn SET value += 1 RETURN AFTER")
            .await?
            .take(0)?;
        rows.into_iter()
            .next()
            .map(|r| r.value)
            .ok_or_else(|| RepoError::Database("Transaction counter missing".to_string()))
    }

    /// Create the Payment and all its supplier settlements atomically.
    /// Earlier pending attempts for the same order are superseded
    /// (marked failed) in the same transaction, so exactly one attempt
    /// per order stays live.
    pub async fn create_with_settlements(
        &self,
        payment: Payment,
        settlements: Vec<SupplierSettlement>,
    ) -> RepoResult<Payment> {
        let mut sql = String::from(
            "BEGIN TRANSACTION;\n\
             UPDATE payment SET status = $failed, updated_at = $now \
             WHERE order_id = $order AND status = $pending;\n\
             CREATE payment CONTENT $payment;\n",
        );
        for i in 0..settlements.len() {
            sql.push_str(&format!("CREATE supplier_settlement CONTENT $s{i};\n"));
        }
        sql.push_str("COMMIT TRANSACTION;");

        let mut query = self
            .base
            .db()
            .query(sql)
            .bind(("order", payment.order_id.clone()))
            .bind(("now", payment.updated_at))
            .bind(("failed", PaymentState::Failed))
            .bind(("pending", PaymentState::Pending))
            .bind(("payment", payment));
        for (i, settlement) in settlements.into_iter().enumerate() {
            query = query.bind((format!("s{i}"), settlement));
        }

        let mut result = query.await?;
        let created: Vec<Payment> = result.take(1)?;
        created
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::Database("Failed to create payment".to_string()))
    }

    /// Look up the payment referenced by a checkout webhook event
    pub async fn find_by_intent(&self, payment_intent: &str) -> RepoResult<Option<Payment>> {
        let payments: Vec<Payment> = self
            .base
            .db()
            .query("SELECT * FROM payment WHERE payment_intent = $intent")
            .bind(("intent", payment_intent.to_string()))
            .await?
            .take(0)?;
        Ok(payments.into_iter().next())
    }

    /// Mark a payment successful. Replays converge on the same state.
    pub async fn mark_success(&self, payment: &Payment, now: i64) -> RepoResult<Option<Payment>> {
        let Some(id) = payment.id.clone() else {
            return Err(RepoError::Validation("Payment has no id".to_string()));
        };
        let payments: Vec<Payment> = self
            .base
            .db()
            .query("UPDATE $payment SET status = $status, updated_at = $now RETURN AFTER")
            .bind(("payment", id))
            .bind(("status", PaymentState::Success))
            .bind(("now", now))
            .await?
            .take(0)?;
        Ok(payments.into_iter().next())
    }
}
