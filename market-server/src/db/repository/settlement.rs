//! Supplier settlement repository

use serde::{Deserialize, Serialize};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use surrealdb::RecordId;

use super::{BaseRepository, CountRow, RepoError, RepoResult, clamp_page};
use crate::db::models::{SettlementStatus, SupplierSettlement};

#[derive(Debug, Deserialize)]
struct SumRow {
    total: Option<f64>,
}

/// Pending/transferred payable totals for one supplier
#[derive(Debug, Clone, Serialize)]
pub struct SettlementSummary {
    #[serde(rename = "pendingAmount")]
    pub pending_amount: f64,
    #[serde(rename = "transferredAmount")]
    pub transferred_amount: f64,
}

#[derive(Clone)]
pub struct SettlementRepository {
    base: BaseRepository,
}

impl SettlementRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn find_by_order(&self, order_id: &str) -> RepoResult<Vec<SupplierSettlement>> {
        let settlements: Vec<SupplierSettlement> = self
            .base
            .db()
            .query("SELECT * FROM supplier_settlement WHERE order_id = $order")
            .bind(("order", order_id.to_string()))
            .await?
            .take(0)?;
        Ok(settlements)
    }

    pub async fn find_page_by_supplier(
        &self,
        supplier_id: &str,
        page: u32,
        limit: u32,
    ) -> RepoResult<(Vec<SupplierSettlement>, u64)> {
        let (page, limit) = clamp_page(page, limit);
        let start = (page - 1) * limit;

        let mut result = self
            .base
            .db()
            .query(
                "SELECT * FROM supplier_settlement WHERE supplier_id = $supplier \
                 ORDER BY created_at DESC LIMIT $limit START $start",
            )
            .query(
                "SELECT count() AS count FROM supplier_settlement WHERE supplier_id = $supplier GROUP ALL",
            )
            .bind(("supplier", supplier_id.to_string()))
            .bind(("limit", limit as i64))
            .bind(("start", start as i64))
            .await?;

        let settlements: Vec<SupplierSettlement> = result.take(0)?;
        let counts: Vec<CountRow> = result.take(1)?;
        Ok((settlements, counts.first().map(|c| c.count).unwrap_or(0)))
    }

    pub async fn find_page_all(
        &self,
        page: u32,
        limit: u32,
    ) -> RepoResult<(Vec<SupplierSettlement>, u64)> {
        let (page, limit) = clamp_page(page, limit);
        let start = (page - 1) * limit;

        let mut result = self
            .base
            .db()
            .query("SELECT * FROM supplier_settlement ORDER BY created_at DESC LIMIT $limit START $start")
            .query("SELECT count() AS count FROM supplier_settlement GROUP ALL")
            .bind(("limit", limit as i64))
            .bind(("start", start as i64))
            .await?;

        let settlements: Vec<SupplierSettlement> = result.take(0)?;
        let counts: Vec<CountRow> = result.take(1)?;
        Ok((settlements, counts.first().map(|c| c.count).unwrap_or(0)))
    }

    /// Sum payable amounts per status for one supplier
    pub async fn summary_for_supplier(&self, supplier_id: &str) -> RepoResult<SettlementSummary> {
        let mut result = self
            .base
            .db()
            .query(
                "SELECT math::sum(payable_amount) AS total FROM supplier_settlement \
                 WHERE supplier_id = $supplier AND status = 'pending' GROUP ALL",
            )
            .query(
                "SELECT math::sum(payable_amount) AS total FROM supplier_settlement \
                 WHERE supplier_id = $supplier AND status = 'transferred' GROUP ALL",
            )
            .bind(("supplier", supplier_id.to_string()))
            .await?;

        let pending: Vec<SumRow> = result.take(0)?;
        let transferred: Vec<SumRow> = result.take(1)?;
        Ok(SettlementSummary {
            pending_amount: pending.first().and_then(|r| r.total).unwrap_or(0.0),
            transferred_amount: transferred.first().and_then(|r| r.total).unwrap_or(0.0),
        })
    }

    /// Advance a settlement to transferred. Called by the (external)
    /// payout action, never by the webhook path.
    pub async fn mark_transferred(
        &self,
        id: &str,
        now: i64,
    ) -> RepoResult<Option<SupplierSettlement>> {
        let record_id: RecordId = id
            .parse()
            .map_err(|_| RepoError::NotFound(format!("Invalid settlement id: {id}")))?;
        let settlements: Vec<SupplierSettlement> = self
            .base
            .db()
            .query("UPDATE $settlement SET status = $status, updated_at = $now RETURN AFTER")
            .bind(("settlement", record_id))
            .bind(("status", SettlementStatus::Transferred))
            .bind(("now", now))
            .await?
            .take(0)?;
        Ok(settlements.into_iter().next())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_schema;
    use surrealdb::engine::local::Mem;

    async fn test_db() -> Surreal<Db> {
        let db = Surreal::new::<Mem>(()).await.unwrap();
        db.use_ns("test").use_db("test").await.unwrap();
        init_schema(&db).await.unwrap();
        db
    }

    async fn seed(db: &Surreal<Db>, order: &str, supplier: &str, payable: f64) -> String {
        let created: Option<SupplierSettlement> = db
            .create("supplier_settlement")
            .content(SupplierSettlement {
                id: None,
                order_id: order.to_string(),
                supplier_id: supplier.to_string(),
                total_amount: payable / 0.75,
                admin_commission: payable / 3.0,
                payable_amount: payable,
                status: SettlementStatus::Pending,
                created_at: 0,
                updated_at: 0,
            })
            .await
            .unwrap();
        created.unwrap().id.unwrap().to_string()
    }

    #[tokio::test]
    async fn summary_splits_by_status() {
        let db = test_db().await;
        let repo = SettlementRepository::new(db.clone());

        let first = seed(&db, "order:o1", "user:s1", 45.0).await;
        seed(&db, "order:o2", "user:s1", 30.0).await;
        seed(&db, "order:o3", "user:s2", 99.0).await;

        repo.mark_transferred(&first, 1).await.unwrap().unwrap();

        let summary = repo.summary_for_supplier("user:s1").await.unwrap();
        assert_eq!(summary.pending_amount, 30.0);
        assert_eq!(summary.transferred_amount, 45.0);

        let (page, total) = repo.find_page_by_supplier("user:s1", 1, 10).await.unwrap();
        assert_eq!(total, 2);
        assert_eq!(page.len(), 2);
    }

    #[tokio::test]
    async fn duplicate_order_supplier_pair_is_rejected() {
        let db = test_db().await;
        seed(&db, "order:o1", "user:s1", 45.0).await;

        let dup: Result<Option<SupplierSettlement>, surrealdb::Error> = db
            .create("supplier_settlement")
            .content(SupplierSettlement {
                id: None,
                order_id: "order:o1".to_string(),
                supplier_id: "user:s1".to_string(),
                total_amount: 60.0,
                admin_commission: 15.0,
                payable_amount: 45.0,
                status: SettlementStatus::Pending,
                created_at: 0,
                updated_at: 0,
            })
            .await;
        assert!(dup.is_err());
    }
}
