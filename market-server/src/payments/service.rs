//! Payment service
//!
//! Creates the checkout session and the payment/settlement records for
//! one order. The Payment and every SupplierSettlement are written in
//! a single database transaction: a mid-sequence failure leaves no
//! orphaned Payment behind.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use super::provider::{CheckoutSessionRequest, PaymentProvider};
use super::split::split_payment;
use crate::core::Config;
use crate::db::models::{Payment, PaymentState, PaymentStatus, SettlementStatus, SupplierSettlement};
use crate::db::repository::{
    OrderRepository, PaymentRepository, SettlementRepository, UserRepository,
};
use crate::utils::validation::validate_redirect_url;
use shared::{AppError, AppResult};

/// Checkout request payload
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessPaymentRequest {
    pub order_id: String,
    pub success_url: String,
    pub cancel_url: String,
}

/// Checkout response: the hosted payment page to redirect to
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutResponse {
    pub checkout_url: String,
    pub transaction_id: String,
}

#[derive(Clone)]
pub struct PaymentService {
    users: UserRepository,
    orders: OrderRepository,
    payments: PaymentRepository,
    settlements: SettlementRepository,
    provider: Arc<dyn PaymentProvider>,
    commission_rate: f64,
    currency: String,
}

impl PaymentService {
    pub fn new(db: Surreal<Db>, provider: Arc<dyn PaymentProvider>, config: &Config) -> Self {
        Self {
            users: UserRepository::new(db.clone()),
            orders: OrderRepository::new(db.clone()),
            payments: PaymentRepository::new(db.clone()),
            settlements: SettlementRepository::new(db),
            provider,
            commission_rate: config.commission_rate,
            currency: config.currency.clone(),
        }
    }

    /// Start a checkout for an order: split the total, open one
    /// consolidated session with the processor, persist the Payment and
    /// the pending settlements, return the checkout URL.
    pub async fn create_payment(
        &self,
        user_id: &str,
        req: ProcessPaymentRequest,
    ) -> AppResult<CheckoutResponse> {
        validate_redirect_url(&req.success_url, "successUrl")?;
        validate_redirect_url(&req.cancel_url, "cancelUrl")?;

        self.users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("User {user_id}")))?;

        let order = self
            .orders
            .find_by_id(&req.order_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Order {}", req.order_id)))?;
        if order.user != user_id {
            return Err(AppError::forbidden("Order belongs to another user"));
        }
        if order.payment_status == PaymentStatus::Paid {
            return Err(AppError::conflict("Order is already paid"));
        }

        let split = split_payment(&order.items, self.commission_rate);
        if split.grand_total <= 0.0 {
            return Err(AppError::validation("Order total must be positive"));
        }

        let seq = self.payments.next_transaction_seq().await?;
        let transaction_id = format!("TXN-{seq:06}");

        let session = self
            .provider
            .create_checkout_session(CheckoutSessionRequest {
                amount: split.grand_total,
                currency: self.currency.clone(),
                product_name: format!("Order {}", req.order_id),
                transaction_id: transaction_id.clone(),
                success_url: req.success_url,
                cancel_url: req.cancel_url,
            })
            .await
            .inspect_err(|e| {
                tracing::error!(target: "payment", order = %req.order_id, error = %e, "Checkout session failed");
            })?;

        let now = shared::util::now_millis();
        let payment = Payment {
            id: None,
            order_id: req.order_id.clone(),
            user_id: user_id.to_string(),
            amount: split.grand_total,
            status: PaymentState::Pending,
            transaction_id: transaction_id.clone(),
            session_id: Some(session.session_id),
            payment_intent: session.payment_intent,
            created_at: now,
            updated_at: now,
        };

        // A retried checkout reuses the settlements written by the
        // earlier attempt; only missing (order, supplier) pairs are
        // created alongside the new Payment.
        let existing = self.settlements.find_by_order(&req.order_id).await?;
        let settlements: Vec<SupplierSettlement> = split
            .suppliers
            .iter()
            .filter(|(supplier, _)| !existing.iter().any(|s| &s.supplier_id == *supplier))
            .map(|(supplier, bucket)| SupplierSettlement {
                id: None,
                order_id: req.order_id.clone(),
                supplier_id: supplier.clone(),
                total_amount: bucket.total,
                admin_commission: bucket.commission,
                payable_amount: bucket.payable,
                status: SettlementStatus::Pending,
                created_at: now,
                updated_at: now,
            })
            .collect();

        self.payments
            .create_with_settlements(payment, settlements)
            .await
            .map_err(|e| {
                tracing::error!(target: "payment", order = %req.order_id, error = %e, "Payment record failed");
                AppError::PaymentRecord(e.to_string())
            })?;

        tracing::info!(
            target: "payment",
            order = %req.order_id,
            transaction = %transaction_id,
            amount = split.grand_total,
            "Checkout session created"
        );

        Ok(CheckoutResponse {
            checkout_url: session.url,
            transaction_id,
        })
    }
}
