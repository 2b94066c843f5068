//! Cart line repository
//!
//! Quantity mutations run as single UPDATE statements so two
//! concurrent requests from the same user (two browser tabs) cannot
//! lose an update: the database evaluates `quantity += delta` and the
//! reprice in one atomic document write.

use super::{BaseRepository, CountRow, RepoError, RepoResult, clamp_page};
use crate::db::models::CartLine;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

const CART_TABLE: &str = "cart_line";

/// Outcome of a decrease operation
#[derive(Debug)]
pub enum DecreaseResult {
    /// Quantity reduced, line survives
    Updated(CartLine),
    /// Quantity reached zero, line deleted
    Removed(CartLine),
    /// No line matched the id + owner pair
    NoMatch,
}

#[derive(Clone)]
pub struct CartRepository {
    base: BaseRepository,
}

impl CartRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    fn parse_id(id: &str) -> RepoResult<RecordId> {
        id.parse()
            .map_err(|_| RepoError::NotFound(format!("Invalid cart line id: {id}")))
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<CartLine>> {
        let record_id = Self::parse_id(id)?;
        let line: Option<CartLine> = self.base.db().select(record_id).await?;
        Ok(line)
    }

    pub async fn find_all_by_user(&self, user: &str) -> RepoResult<Vec<CartLine>> {
        let lines: Vec<CartLine> = self
            .base
            .db()
            .query("SELECT * FROM cart_line WHERE user = $user ORDER BY created_at")
            .bind(("user", user.to_string()))
            .await?
            .take(0)?;
        Ok(lines)
    }

    pub async fn find_page_by_user(
        &self,
        user: &str,
        page: u32,
        limit: u32,
    ) -> RepoResult<(Vec<CartLine>, u64)> {
        let (page, limit) = clamp_page(page, limit);
        let start = (page - 1) * limit;

        let mut result = self
            .base
            .db()
            .query("SELECT * FROM cart_line WHERE user = $user ORDER BY created_at LIMIT $limit START $start")
            .query("SELECT count() AS count FROM cart_line WHERE user = $user GROUP ALL")
            .bind(("user", user.to_string()))
            .bind(("limit", limit as i64))
            .bind(("start", start as i64))
            .await?;

        let lines: Vec<CartLine> = result.take(0)?;
        let counts: Vec<CountRow> = result.take(1)?;
        let total = counts.first().map(|c| c.count).unwrap_or(0);
        Ok((lines, total))
    }

    pub async fn create(&self, line: CartLine) -> RepoResult<CartLine> {
        let created: Option<CartLine> = self.base.db().create(CART_TABLE).content(line).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create cart line".to_string()))
    }

    /// Merge a repeated add into the existing line for the same
    /// (user, product, selector) key. Returns None when no line exists.
    pub async fn merge_add(
        &self,
        user: &str,
        selector_key: &str,
        delta: i64,
        unit_price: f64,
        now: i64,
    ) -> RepoResult<Option<CartLine>> {
        let lines: Vec<CartLine> = self
            .base
            .db()
            .query(
                r#"
                UPDATE cart_line SET
                    quantity += $delta,
                    unit_price = $unit,
                    price = math::round(quantity * $unit * 100) / 100,
                    updated_at = $now
                WHERE user = $user AND selector_key = $key
                RETURN AFTER
                "#,
            )
            .bind(("delta", delta))
            .bind(("unit", unit_price))
            .bind(("now", now))
            .bind(("user", user.to_string()))
            .bind(("key", selector_key.to_string()))
            .await?
            .take(0)?;
        Ok(lines.into_iter().next())
    }

    /// Atomic increment-and-reprice. Returns None when the line does
    /// not exist or belongs to another user.
    pub async fn increment_and_reprice(
        &self,
        id: &str,
        user: &str,
        delta: i64,
        unit_price: f64,
        now: i64,
    ) -> RepoResult<Option<CartLine>> {
        let record_id = Self::parse_id(id)?;
        let lines: Vec<CartLine> = self
            .base
            .db()
            .query(
                r#"
                UPDATE $line SET
                    quantity += $delta,
                    unit_price = $unit,
                    price = math::round(quantity * $unit * 100) / 100,
                    updated_at = $now
                WHERE user = $user
                RETURN AFTER
                "#,
            )
            .bind(("line", record_id))
            .bind(("delta", delta))
            .bind(("unit", unit_price))
            .bind(("now", now))
            .bind(("user", user.to_string()))
            .await?
            .take(0)?;
        Ok(lines.into_iter().next())
    }

    /// Atomic decrement; deletes the line when quantity reaches zero.
    pub async fn decrement_or_delete(
        &self,
        id: &str,
        user: &str,
        delta: i64,
        unit_price: f64,
        now: i64,
    ) -> RepoResult<DecreaseResult> {
        let record_id = Self::parse_id(id)?;
        let mut result = self
            .base
            .db()
            .query(
                r#"
                BEGIN TRANSACTION;
                UPDATE $line SET
                    quantity -= $delta,
                    unit_price = $unit,
                    price = math::round(quantity * $unit * 100) / 100,
                    updated_at = $now
                WHERE user = $user
                RETURN AFTER;
                DELETE cart_line WHERE id = $line AND quantity < 1 RETURN BEFORE;
                COMMIT TRANSACTION;
                "#,
            )
            .bind(("line", record_id))
            .bind(("delta", delta))
            .bind(("unit", unit_price))
            .bind(("now", now))
            .bind(("user", user.to_string()))
            .await?;

        let updated: Vec<CartLine> = result.take(0)?;
        let deleted: Vec<CartLine> = result.take(1)?;

        if let Some(line) = deleted.into_iter().next() {
            return Ok(DecreaseResult::Removed(line));
        }
        match updated.into_iter().next() {
            Some(line) => Ok(DecreaseResult::Updated(line)),
            None => Ok(DecreaseResult::NoMatch),
        }
    }

    /// Refresh a cached line price after a live catalog price change
    pub async fn update_price(
        &self,
        id: &str,
        unit_price: f64,
        price: f64,
        now: i64,
    ) -> RepoResult<Option<CartLine>> {
        let record_id = Self::parse_id(id)?;
        let lines: Vec<CartLine> = self
            .base
            .db()
            .query("UPDATE $line SET unit_price = $unit, price = $price, updated_at = $now RETURN AFTER")
            .bind(("line", record_id))
            .bind(("unit", unit_price))
            .bind(("price", price))
            .bind(("now", now))
            .await?
            .take(0)?;
        Ok(lines.into_iter().next())
    }

    pub async fn delete(&self, id: &str) -> RepoResult<Option<CartLine>> {
        let record_id = Self::parse_id(id)?;
        let deleted: Option<CartLine> = self.base.db().delete(record_id).await?;
        Ok(deleted)
    }

    pub async fn clear_for_user(&self, user: &str) -> RepoResult<()> {
        self.base
            .db()
            .query("DELETE cart_line WHERE user = $user")
            .bind(("user", user.to_string()))
            .await?;
        Ok(())
    }
}
