//! Order assembler
//!
//! Turns cart contents or a direct payload into an immutable order
//! snapshot. After creation the only mutable fields are the two status
//! fields; items and prices are frozen at assembly time.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::Deserialize;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::auth::CurrentUser;
use crate::db::models::{
    Order, OrderItem, OrderStatus, OrderType, PaymentStatus, Product, Wholesale,
};
use crate::db::repository::{
    CartRepository, OrderRepository, ProductRepository, UserRepository, WholesaleRepository,
};
use crate::pricing::{line_total, resolve_price, to_decimal, to_f64};
use crate::utils::validation::validate_quantity;
use shared::{AppError, AppResult, Selector};

/// Order creation payload
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub order_type: OrderType,
    /// Items for `single` orders; ignored for `addToCart`
    #[serde(default)]
    pub items: Vec<OrderItemInput>,
}

/// One requested line of a `single` order. The unit price is always
/// re-resolved from the live catalog, never taken from the caller.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemInput {
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

/// Admin status-transition payload
#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: OrderStatus,
}

/// Order assembler service
#[derive(Clone)]
pub struct OrderAssembler {
    orders: OrderRepository,
    carts: CartRepository,
    products: ProductRepository,
    wholesales: WholesaleRepository,
    users: UserRepository,
}

impl OrderAssembler {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            orders: OrderRepository::new(db.clone()),
            carts: CartRepository::new(db.clone()),
            products: ProductRepository::new(db.clone()),
            wholesales: WholesaleRepository::new(db.clone()),
            users: UserRepository::new(db),
        }
    }

    /// Assemble and persist an order for the user.
    ///
    /// `addToCart` snapshots the current cart lines at their cached
    /// prices; the cart itself is left untouched. `single` builds the
    /// items from the payload with live catalog prices.
    pub async fn create(&self, user_id: &str, req: CreateOrderRequest) -> AppResult<Order> {
        let items = match req.order_type {
            OrderType::AddToCart => self.items_from_cart(user_id).await?,
            OrderType::Single => self.items_from_payload(req.items).await?,
        };

        let total = items
            .iter()
            .fold(Decimal::ZERO, |acc, item| acc + to_decimal(item.subtotal));

        let now = shared::util::now_millis();
        let order = Order {
            id: None,
            user: user_id.to_string(),
            order_type: req.order_type,
            items,
            total_price: to_f64(total),
            payment_status: PaymentStatus::Unpaid,
            order_status: OrderStatus::Pending,
            created_at: now,
            updated_at: now,
        };
        Ok(self.orders.create(order).await?)
    }

    pub async fn find(&self, order_id: &str) -> AppResult<Order> {
        self.orders
            .find_by_id(order_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Order {order_id}")))
    }

    pub async fn my_orders(
        &self,
        user_id: &str,
        page: u32,
        limit: u32,
    ) -> AppResult<(Vec<Order>, u64)> {
        Ok(self.orders.find_page_by_user(user_id, page, limit).await?)
    }

    pub async fn all_orders(&self, page: u32, limit: u32) -> AppResult<(Vec<Order>, u64)> {
        Ok(self.orders.find_page_all(page, limit).await?)
    }

    /// Orders containing the supplier's items, projected onto the
    /// supplier's slice. Requires an approved supplier account.
    pub async fn supplier_orders(
        &self,
        supplier_id: &str,
        page: u32,
        limit: u32,
    ) -> AppResult<(Vec<super::SupplierOrderView>, u64)> {
        let supplier = self
            .users
            .find_by_id(supplier_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("User {supplier_id}")))?;
        if !supplier.is_approved_supplier() {
            return Err(AppError::forbidden("Supplier account is not approved"));
        }

        let (orders, total) = self
            .orders
            .find_page_by_supplier(supplier_id, page, limit)
            .await?;

        // Fetch each referenced offer once across the page
        let mut offers: HashMap<String, Wholesale> = HashMap::new();
        for order in &orders {
            for item in &order.items {
                if item.supplier_id.as_deref() != Some(supplier_id) {
                    continue;
                }
                let Some(offer_id) = item.selector.wholesale_id() else {
                    continue;
                };
                if offers.contains_key(offer_id) {
                    continue;
                }
                if let Some(offer) = self.wholesales.find_by_id(offer_id).await? {
                    offers.insert(offer_id.to_string(), offer);
                }
            }
        }

        let views = orders
            .iter()
            .map(|order| super::supplier_view(order, supplier_id, &offers))
            .collect();
        Ok((views, total))
    }

    /// Cancel an order. Only pending orders cancel, only by the owner
    /// or an admin; the order document survives as `cancelled`.
    pub async fn cancel(&self, actor: &CurrentUser, order_id: &str) -> AppResult<Order> {
        let order = self.find(order_id).await?;
        if order.user != actor.id && !actor.is_admin() {
            return Err(AppError::forbidden("Order belongs to another user"));
        }
        if order.order_status != OrderStatus::Pending {
            return Err(AppError::conflict("Only pending orders can be cancelled"));
        }

        let now = shared::util::now_millis();
        self.orders
            .update_order_status(order_id, OrderStatus::Cancelled, now)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Order {order_id}")))
    }

    /// Admin status transition. Cancelled orders are terminal.
    pub async fn update_status(&self, order_id: &str, status: OrderStatus) -> AppResult<Order> {
        let order = self.find(order_id).await?;
        if order.order_status == OrderStatus::Cancelled {
            return Err(AppError::conflict("Order is cancelled"));
        }

        let now = shared::util::now_millis();
        self.orders
            .update_order_status(order_id, status, now)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Order {order_id}")))
    }

    // ==================== internals ====================

    async fn items_from_cart(&self, user_id: &str) -> AppResult<Vec<OrderItem>> {
        let lines = self.carts.find_all_by_user(user_id).await?;
        if lines.is_empty() {
            return Err(AppError::validation("Cart is empty"));
        }

        let mut items = Vec::with_capacity(lines.len());
        for line in lines {
            let product = self.fetch_product(&line.product).await?;
            items.push(OrderItem {
                product_id: line.product,
                supplier_id: product.supplier.as_ref().map(|s| s.to_string()),
                selector: line.selector,
                quantity: line.quantity,
                unit_price: line.unit_price,
                subtotal: line.price,
            });
        }
        Ok(items)
    }

    async fn items_from_payload(&self, inputs: Vec<OrderItemInput>) -> AppResult<Vec<OrderItem>> {
        if inputs.is_empty() {
            return Err(AppError::validation("Order has no items"));
        }

        let mut items = Vec::with_capacity(inputs.len());
        for input in inputs {
            validate_quantity(input.quantity, "quantity")?;
            let product = self.fetch_product(&input.product_id).await?;
            let resolved = self.resolve_for(&product, &input.selector).await?;
            items.push(OrderItem {
                product_id: input.product_id,
                supplier_id: product.supplier.as_ref().map(|s| s.to_string()),
                selector: input.selector,
                quantity: input.quantity,
                unit_price: resolved.unit_price,
                subtotal: line_total(resolved.unit_price, input.quantity),
            });
        }
        Ok(items)
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

    async fn resolve_for(
        &self,
        product: &Product,
        selector: &Selector,
    ) -> AppResult<crate::pricing::ResolvedPrice> {
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
