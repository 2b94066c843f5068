//! Order repository
//!
//! Orders are append-only snapshots; the only writes after creation
//! are the two controlled status fields.

use super::{BaseRepository, CountRow, RepoError, RepoResult, clamp_page};
use crate::db::models::{Order, OrderStatus, PaymentStatus};
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

const ORDER_TABLE: &str = "order";

#[derive(Clone)]
pub struct OrderRepository {
    base: BaseRepository,
}

impl OrderRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    fn parse_id(id: &str) -> RepoResult<RecordId> {
        id.parse()
            .map_err(|_| RepoError::NotFound(format!("Invalid order id: {id}")))
    }

    pub async fn create(&self, order: Order) -> RepoResult<Order> {
        let created: Option<Order> = self.base.db().create(ORDER_TABLE).content(order).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create order".to_string()))
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Order>> {
        let record_id = Self::parse_id(id)?;
        let order: Option<Order> = self.base.db().select(record_id).await?;
        Ok(order)
    }

    pub async fn find_page_by_user(
        &self,
        user: &str,
        page: u32,
        limit: u32,
    ) -> RepoResult<(Vec<Order>, u64)> {
        let (page, limit) = clamp_page(page, limit);
        let start = (page - 1) * limit;

        let mut result = self
            .base
            .db()
            .query("SELECT * FROM order WHERE user = $user ORDER BY created_at DESC LIMIT $limit START $start")
            .query("SELECT count() AS count FROM order WHERE user = $user GROUP ALL")
            .bind(("user", user.to_string()))
            .bind(("limit", limit as i64))
            .bind(("start", start as i64))
            .await?;

        let orders: Vec<Order> = result.take(0)?;
        let counts: Vec<CountRow> = result.take(1)?;
        Ok((orders, counts.first().map(|c| c.count).unwrap_or(0)))
    }

    pub async fn find_page_all(&self, page: u32, limit: u32) -> RepoResult<(Vec<Order>, u64)> {
        let (page, limit) = clamp_page(page, limit);
        let start = (page - 1) * limit;

        let mut result = self
            .base
            .db()
            .query("SELECT * FROM order ORDER BY created_at DESC LIMIT $limit START $start")
            .query("SELECT count() AS count FROM order GROUP ALL")
            .bind(("limit", limit as i64))
            .bind(("start", start as i64))
            .await?;

        let orders: Vec<Order> = result.take(0)?;
        let counts: Vec<CountRow> = result.take(1)?;
        Ok((orders, counts.first().map(|c| c.count).unwrap_or(0)))
    }

    /// Orders containing at least one item owned by the supplier
    pub async fn find_page_by_supplier(
        &self,
        supplier: &str,
        page: u32,
        limit: u32,
    ) -> RepoResult<(Vec<Order>, u64)> {
        let (page, limit) = clamp_page(page, limit);
        let start = (page - 1) * limit;

        let mut result = self
            .base
            .db()
            .query(
                "SELECT * FROM order WHERE items.supplier_id CONTAINS $supplier \
                 ORDER BY created_at DESC LIMIT $limit START $start",
            )
            .query(
                "SELECT count() AS count FROM order WHERE items.supplier_id CONTAINS $supplier GROUP ALL",
            )
            .bind(("supplier", supplier.to_string()))
            .bind(("limit", limit as i64))
            .bind(("start", start as i64))
            .await?;

        let orders: Vec<Order> = result.take(0)?;
        let counts: Vec<CountRow> = result.take(1)?;
        Ok((orders, counts.first().map(|c| c.count).unwrap_or(0)))
    }

    pub async fn update_payment_status(
        &self,
        id: &str,
        status: PaymentStatus,
        now: i64,
    ) -> RepoResult<Option<Order>> {
        let record_id = Self::parse_id(id)?;
        let orders: Vec<Order> = self
            .base
            .db()
            .query("UPDATE $order SET payment_status = $status, updated_at = $now RETURN AFTER")
            .bind(("order", record_id))
            .bind(("status", status))
            .bind(("now", now))
            .await?
            .take(0)?;
        Ok(orders.into_iter().next())
    }

    pub async fn update_order_status(
        &self,
        id: &str,
        status: OrderStatus,
        now: i64,
    ) -> RepoResult<Option<Order>> {
        let record_id = Self::parse_id(id)?;
        let orders: Vec<Order> = self
            .base
            .db()
            .query("UPDATE $order SET order_status = $status, updated_at = $now RETURN AFTER")
            .bind(("order", record_id))
            .bind(("status", status))
            .bind(("now", now))
            .await?
            .take(0)?;
        Ok(orders.into_iter().next())
    }

    pub const TABLE: &'static str = ORDER_TABLE;
}
