//! Cart ledger operations

use serde::{Deserialize, Serialize};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::db::models::{CartLine, Product, Wholesale};
use crate::db::repository::{
    CartRepository, DecreaseResult, ProductRepository, WholesaleRepository,
};
use crate::pricing::{ResolvedPrice, line_total, resolve_price};
use crate::utils::validation::validate_quantity;
use shared::{AppError, AppResult, Selector};

/// Add-to-cart payload
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartRequest {
    pub product_id: String,
    #[serde(default = "default_selector")]
    pub selector: Selector,
    #[serde(default = "default_quantity")]
    pub quantity: i64,
}

fn default_selector() -> Selector {
    Selector::Retail
}

fn default_quantity() -> i64 {
    1
}

/// Increase/decrease payload; defaults to a step of one
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuantityChangeRequest {
    #[serde(default = "default_quantity")]
    pub quantity: i64,
}

/// Outcome of a decrease operation, surfaced to the client
#[derive(Debug, Serialize)]
#[serde(tag = "outcome", rename_all = "camelCase")]
pub enum DecreaseOutcome {
    /// Quantity reduced; the updated line
    Updated { line: CartLine },
    /// Quantity reached zero; the line was removed
    Removed { id: String },
}

/// Cart line enriched with catalog display data
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineView {
    pub id: String,
    pub product_id: String,
    pub product_name: String,
    pub selector: Selector,
    pub unit_label: Option<String>,
    pub quantity: i64,
    pub unit_price: f64,
    pub original_price: f64,
    pub discount_percent: f64,
    pub price: f64,
}

/// Cart ledger service
#[derive(Clone)]
pub struct CartLedger {
    carts: CartRepository,
    products: ProductRepository,
    wholesales: WholesaleRepository,
}

impl CartLedger {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            carts: CartRepository::new(db.clone()),
            products: ProductRepository::new(db.clone()),
            wholesales: WholesaleRepository::new(db),
        }
    }

    /// Add a product to the user's cart, merging into an existing line
    /// with the identical (product, selector) key.
    pub async fn add(&self, user_id: &str, req: AddToCartRequest) -> AppResult<CartLine> {
        validate_quantity(req.quantity, "quantity")?;

        let product = self.fetch_product(&req.product_id).await?;
        let resolved = self.resolve_for(&product, &req.selector).await?;

        let now = shared::util::now_millis();
        let key = CartLine::key_for(&req.product_id, &req.selector);

        // Merge path first: one atomic UPDATE; falls through to create
        // when no line matches.
        if let Some(line) = self
            .carts
            .merge_add(user_id, &key, req.quantity, resolved.unit_price, now)
            .await?
        {
            return Ok(line);
        }

        let line = CartLine {
            id: None,
            user: user_id.to_string(),
            product: req.product_id.clone(),
            selector: req.selector,
            selector_key: key,
            quantity: req.quantity,
            unit_price: resolved.unit_price,
            price: line_total(resolved.unit_price, req.quantity),
            created_at: now,
            updated_at: now,
        };
        Ok(self.carts.create(line).await?)
    }

    /// Increase a line's quantity. The unit price is re-resolved from
    /// the live catalog, not taken from the cached line.
    pub async fn increase(&self, user_id: &str, line_id: &str, delta: i64) -> AppResult<CartLine> {
        validate_quantity(delta, "quantity")?;
        let line = self.owned_line(user_id, line_id).await?;

        let product = self.fetch_product(&line.product).await?;
        let resolved = self.resolve_for(&product, &line.selector).await?;

        let now = shared::util::now_millis();
        self.carts
            .increment_and_reprice(line_id, user_id, delta, resolved.unit_price, now)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Cart line {line_id}")))
    }

    /// Decrease a line's quantity; removes the line when it reaches zero.
    pub async fn decrease(
        &self,
        user_id: &str,
        line_id: &str,
        delta: i64,
    ) -> AppResult<DecreaseOutcome> {
        validate_quantity(delta, "quantity")?;
        let line = self.owned_line(user_id, line_id).await?;

        let product = self.fetch_product(&line.product).await?;
        let resolved = self.resolve_for(&product, &line.selector).await?;

        let now = shared::util::now_millis();
        match self
            .carts
            .decrement_or_delete(line_id, user_id, delta, resolved.unit_price, now)
            .await?
        {
            DecreaseResult::Updated(line) => Ok(DecreaseOutcome::Updated { line }),
            DecreaseResult::Removed(_) => Ok(DecreaseOutcome::Removed {
                id: line_id.to_string(),
            }),
            DecreaseResult::NoMatch => Err(AppError::not_found(format!("Cart line {line_id}"))),
        }
    }

    /// Remove a line unconditionally after the ownership check.
    pub async fn remove(&self, user_id: &str, line_id: &str) -> AppResult<CartLine> {
        self.owned_line(user_id, line_id).await?;
        self.carts
            .delete(line_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Cart line {line_id}")))
    }

    /// Paginated cart listing enriched with catalog display data. A
    /// line whose live case discount moved since caching gets its
    /// stored price refreshed (advisory, not authoritative). A line
    /// whose product left the catalog aborts the read with NotFound;
    /// the line can still be removed.
    pub async fn list(
        &self,
        user_id: &str,
        page: u32,
        limit: u32,
    ) -> AppResult<(Vec<CartLineView>, u64)> {
        let (lines, total) = self.carts.find_page_by_user(user_id, page, limit).await?;

        let mut views = Vec::with_capacity(lines.len());
        for line in lines {
            let product = self.fetch_product(&line.product).await?;
            let resolved = self.resolve_for(&product, &line.selector).await?;

            let mut line = line;
            if matches!(line.selector, Selector::Case(_)) && resolved.unit_price != line.unit_price
            {
                let fresh_total = line_total(resolved.unit_price, line.quantity);
                let now = shared::util::now_millis();
                if let Some(refreshed) = self
                    .carts
                    .update_price(
                        &line.id.as_ref().map(|i| i.to_string()).unwrap_or_default(),
                        resolved.unit_price,
                        fresh_total,
                        now,
                    )
                    .await?
                {
                    line = refreshed;
                }
            }

            views.push(CartLineView {
                id: line.id.as_ref().map(|i| i.to_string()).unwrap_or_default(),
                product_id: line.product.clone(),
                product_name: product.name.clone(),
                selector: line.selector.clone(),
                unit_label: resolved.unit_label.clone(),
                quantity: line.quantity,
                unit_price: line.unit_price,
                original_price: resolved.original_price,
                discount_percent: resolved.discount_percent,
                price: line.price,
            });
        }
        Ok((views, total))
    }

    // ==================== internals ====================

    /// Fetch a line and verify ownership. Distinguishes NotFound from
    /// Forbidden so a foreign line never reads as missing.
    async fn owned_line(&self, user_id: &str, line_id: &str) -> AppResult<CartLine> {
        let line = self
            .carts
            .find_by_id(line_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Cart line {line_id}")))?;
        if line.user != user_id {
            return Err(AppError::forbidden("Cart line belongs to another user"));
        }
        Ok(line)
    }

    async fn fetch_product(&self, product_id: &str) -> AppResult<Product> {
        let product = self
            .products
            .find_by_id(product_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Product {product_id}")))?;
        if !product.is_active {
            return Err(AppError::not_found(format!("Product {product_id}")));
        }
        Ok(product)
    }

    /// Resolve the unit price, fetching the wholesale offer when the
    /// selector needs one and verifying the product references it.
    async fn resolve_for(&self, product: &Product, selector: &Selector) -> AppResult<ResolvedPrice> {
        let offers: Vec<Wholesale> = match selector.wholesale_id() {
            Some(offer_id) => {
                if !product.references_wholesale(offer_id) {
                    return Err(AppError::not_found(format!("Wholesale offer {offer_id}")));
                }
                match self.wholesales.find_by_id(offer_id).await? {
                    Some(offer) => vec![offer],
                    None => vec![],
                }
            }
            None => vec![],
        };
        resolve_price(product, &offers, selector, 1)
    }
}
