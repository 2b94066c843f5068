//! Database module
//!
//! Embedded SurrealDB instance and schema bootstrap.

pub mod models;
pub mod repository;

use shared::AppError;
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, RocksDb};

/// Database service — owns the embedded SurrealDB handle
#[derive(Clone)]
pub struct DbService {
    pub db: Surreal<Db>,
}

impl DbService {
    /// Open the RocksDB-backed database and apply the schema
    pub async fn new(data_dir: &str) -> Result<Self, AppError> {
        let path = format!("{data_dir}/market.db");
        let db = Surreal::new::<RocksDb>(path.as_str())
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;

        db.use_ns("market")
            .use_db("market")
            .await
            .map_err(|e| AppError::database(format!("Failed to select namespace: {e}")))?;

        init_schema(&db).await?;

        tracing::info!("Database ready at {}", path);
        Ok(Self { db })
    }
}

/// Apply indexes and seed records
///
/// - cart lines are unique per (user, selector_key) so repeated adds
///   merge instead of duplicating
/// - settlements are unique per (order_id, supplier_id) so webhook
///   replays cannot create duplicates
/// - payment transaction ids are unique and come from the counter record
pub async fn init_schema(db: &Surreal<Db>) -> Result<(), AppError> {
    db.query(
        r#"
        DEFINE INDEX IF NOT EXISTS cart_line_user_key
            ON TABLE cart_line FIELDS user, selector_key UNIQUE;
        DEFINE INDEX IF NOT EXISTS settlement_order_supplier
            ON TABLE supplier_settlement FIELDS order_id, supplier_id UNIQUE;
        DEFINE INDEX IF NOT EXISTS payment_transaction_id
            ON TABLE payment FIELDS transaction_id UNIQUE;
        "#,
    )
    .await
    .map_err(|e| AppError::database(format!("Failed to define indexes: {e}")))?;

    // Seed the transaction counter; duplicate create errors are expected
    // on every start after the first.
    let _ = db.query("CREATE counter:payment_txn SET value = 0").await;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::PaymentRepository;

    #[tokio::test]
    async fn bootstrap_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let data_dir = dir.path().to_str().unwrap().to_string();

        let service = DbService::new(&data_dir).await.unwrap();
        let repo = PaymentRepository::new(service.db.clone());
        assert_eq!(repo.next_transaction_seq().await.unwrap(), 1);

        // Re-running the bootstrap must not reset the counter
        init_schema(&service.db).await.unwrap();
        assert_eq!(repo.next_transaction_seq().await.unwrap(), 2);
    }
}
