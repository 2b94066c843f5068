//! External payment processor client
//!
//! [`PaymentProvider`] is the seam between the payment service and the
//! processor's HTTP API; tests substitute a mock. [`StripeGateway`]
//! talks to the real API with form-encoded requests.

use async_trait::async_trait;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::Deserialize;

use crate::pricing::to_decimal;
use shared::{AppError, AppResult};

const API_BASE: &str = "https://api.stripe.com/v1";

/// Parameters for one checkout session
#[derive(Debug, Clone)]
pub struct CheckoutSessionRequest {
    /// Consolidated charge amount (major units)
    pub amount: f64,
    /// ISO 4217 currency code, lowercase
    pub currency: String,
    /// Line item label shown on the checkout page
    pub product_name: String,
    /// Internal transaction id carried in session metadata
    pub transaction_id: String,
    pub success_url: String,
    pub cancel_url: String,
}

/// A created checkout session
#[derive(Debug, Clone)]
pub struct CheckoutSession {
    pub session_id: String,
    /// Hosted checkout page URL
    pub url: String,
    /// Payment-intent reference, when the processor assigns one upfront
    pub payment_intent: Option<String>,
}

/// Capability flags of a connected account
#[derive(Debug, Clone, Deserialize)]
pub struct AccountCapabilities {
    #[serde(default)]
    pub charges_enabled: bool,
    #[serde(default)]
    pub payouts_enabled: bool,
}

#[async_trait]
pub trait PaymentProvider: Send + Sync {
    /// Create a hosted checkout session for a consolidated amount
    async fn create_checkout_session(
        &self,
        req: CheckoutSessionRequest,
    ) -> AppResult<CheckoutSession>;

    /// Fetch the current capability flags of a connected account
    async fn retrieve_account(&self, account_id: &str) -> AppResult<AccountCapabilities>;
}

#[derive(Deserialize)]
struct SessionResponse {
    id: String,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    payment_intent: Option<String>,
}

/// Stripe HTTP client
pub struct StripeGateway {
    client: reqwest::Client,
    secret_key: String,
}

impl StripeGateway {
    pub fn new(secret_key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            secret_key,
        }
    }

    /// Convert a major-unit amount to the processor's minor units
    fn minor_units(amount: f64) -> AppResult<i64> {
        (to_decimal(amount) * Decimal::from(100))
            .to_i64()
            .filter(|cents| *cents > 0)
            .ok_or_else(|| AppError::validation("Charge amount out of range"))
    }
}

#[async_trait]
impl PaymentProvider for StripeGateway {
    async fn create_checkout_session(
        &self,
        req: CheckoutSessionRequest,
    ) -> AppResult<CheckoutSession> {
        let cents = Self::minor_units(req.amount)?;
        let params = [
            ("mode", "payment".to_string()),
            ("success_url", req.success_url),
            ("cancel_url", req.cancel_url),
            ("line_items[0][quantity]", "1".to_string()),
            ("line_items[0][price_data][currency]", req.currency),
            ("line_items[0][price_data][unit_amount]", cents.to_string()),
            (
                "line_items[0][price_data][product_data][name]",
                req.product_name,
            ),
            ("metadata[transaction_id]", req.transaction_id.clone()),
        ];

        let response = self
            .client
            .post(format!("{API_BASE}/checkout/sessions"))
            .bearer_auth(&self.secret_key)
            .form(&params)
            .send()
            .await
            .map_err(|e| AppError::PaymentSession(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!(target: "payment", %status, %body, "Checkout session creation failed");
            return Err(AppError::PaymentSession(format!(
                "Processor returned {status}"
            )));
        }

        let session: SessionResponse = response
            .json()
            .await
            .map_err(|e| AppError::PaymentSession(e.to_string()))?;
        let url = session
            .url
            .ok_or_else(|| AppError::PaymentSession("Session has no checkout URL".to_string()))?;

        Ok(CheckoutSession {
            session_id: session.id,
            url,
            payment_intent: session.payment_intent,
        })
    }

    async fn retrieve_account(&self, account_id: &str) -> AppResult<AccountCapabilities> {
        let response = self
            .client
            .get(format!("{API_BASE}/accounts/{account_id}"))
            .bearer_auth(&self.secret_key)
            .send()
            .await
            .map_err(|e| AppError::PaymentSession(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AppError::PaymentSession(format!(
                "Account lookup returned {}",
                response.status()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::PaymentSession(e.to_string()))
    }
}
