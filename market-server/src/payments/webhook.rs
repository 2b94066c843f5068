//! Payment webhook processor
//!
//! Two channels from the payment processor: checkout events confirm
//! payments, connected-account events sync supplier capability flags.
//! Signatures are verified over the raw request bytes before any JSON
//! parsing. Event replays must converge on the same state.

use std::sync::Arc;

use ring::hmac;
use serde::Deserialize;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use super::provider::PaymentProvider;
use crate::core::Metrics;
use crate::db::models::PaymentStatus;
use crate::db::repository::{OrderRepository, PaymentRepository, UserRepository};
use shared::{AppError, AppResult};

/// Incoming webhook event envelope
#[derive(Debug, Deserialize)]
pub struct WebhookEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    pub data: EventData,
}

#[derive(Debug, Deserialize)]
pub struct EventData {
    pub object: serde_json::Value,
}

/// Verify a `t=<ts>,v1=<hex>` signature header against the raw body.
///
/// The signed payload is `"{t}.{body}"`; the timestamp must lie within
/// the tolerance window. Any of the `v1` digests may match.
pub fn verify_signature(
    secret: &str,
    header: &str,
    body: &[u8],
    tolerance_secs: i64,
    now_secs: i64,
) -> AppResult<()> {
    let mut timestamp: Option<&str> = None;
    let mut digests: Vec<&str> = Vec::new();
    for part in header.split(',') {
        match part.trim().split_once('=') {
            Some(("t", value)) => timestamp = Some(value),
            Some(("v1", value)) => digests.push(value),
            _ => {}
        }
    }

    let timestamp = timestamp.ok_or_else(|| AppError::validation("Malformed signature header"))?;
    if digests.is_empty() {
        return Err(AppError::validation("Malformed signature header"));
    }
    let ts: i64 = timestamp
        .parse()
        .map_err(|_| AppError::validation("Malformed signature header"))?;
    if (now_secs - ts).abs() > tolerance_secs {
        return Err(AppError::validation("Signature timestamp outside tolerance"));
    }

    let mut signed = Vec::with_capacity(timestamp.len() + 1 + body.len());
    signed.extend_from_slice(timestamp.as_bytes());
    signed.push(b'.');
    signed.extend_from_slice(body);

    let key = hmac::Key::new(hmac::HMAC_SHA256, secret.as_bytes());
    for digest in digests {
        if let Ok(sig) = hex::decode(digest)
            && hmac::verify(&key, &signed, &sig).is_ok()
        {
            return Ok(());
        }
    }
    Err(AppError::validation("Signature mismatch"))
}

/// Parse a verified body into an event. Malformed payloads are counted
/// and dropped; the caller still acknowledges the delivery so the
/// processor does not redeliver a body that can never parse.
pub fn parse_event(metrics: &Metrics, body: &[u8]) -> Option<WebhookEvent> {
    match serde_json::from_slice(body) {
        Ok(event) => Some(event),
        Err(e) => {
            let count = metrics.record_unmatched_webhook();
            tracing::warn!(target: "webhook", error = %e, unmatched = count, "Malformed event payload");
            None
        }
    }
}

/// Produce a `t=<ts>,v1=<hex>` header for a payload (tests, tooling)
pub fn signature_header(secret: &str, timestamp: i64, body: &[u8]) -> String {
    let mut signed = Vec::new();
    signed.extend_from_slice(timestamp.to_string().as_bytes());
    signed.push(b'.');
    signed.extend_from_slice(body);

    let key = hmac::Key::new(hmac::HMAC_SHA256, secret.as_bytes());
    let tag = hmac::sign(&key, &signed);
    format!("t={timestamp},v1={}", hex::encode(tag.as_ref()))
}

#[derive(Clone)]
pub struct WebhookProcessor {
    payments: PaymentRepository,
    orders: OrderRepository,
    users: UserRepository,
    provider: Arc<dyn PaymentProvider>,
    metrics: Arc<Metrics>,
}

impl WebhookProcessor {
    pub fn new(db: Surreal<Db>, provider: Arc<dyn PaymentProvider>, metrics: Arc<Metrics>) -> Self {
        Self {
            payments: PaymentRepository::new(db.clone()),
            orders: OrderRepository::new(db.clone()),
            users: UserRepository::new(db),
            provider,
            metrics,
        }
    }

    /// Checkout channel. Confirms the payment referenced by the event's
    /// payment intent; unknown intents are counted and dropped.
    pub async fn handle_checkout_event(&self, event: WebhookEvent) -> AppResult<()> {
        if event.event_type != "checkout.session.completed" {
            tracing::debug!(target: "webhook", event = %event.event_type, "Ignoring checkout event");
            return Ok(());
        }

        let Some(intent) = event
            .data
            .object
            .get("payment_intent")
            .and_then(|v| v.as_str())
        else {
            let count = self.metrics.record_unmatched_webhook();
            tracing::warn!(target: "webhook", unmatched = count, "Checkout event without payment intent");
            return Ok(());
        };

        let Some(payment) = self.payments.find_by_intent(intent).await? else {
            let count = self.metrics.record_unmatched_webhook();
            tracing::warn!(
                target: "webhook",
                intent = %intent,
                unmatched = count,
                "No payment matches the confirmed intent"
            );
            return Ok(());
        };

        // Replays land here again and converge on the same state
        self.payments
            .mark_success(&payment, shared::util::now_millis())
            .await?;

        // One consolidated session covers the whole order total, and
        // starting a new checkout supersedes every earlier pending
        // attempt, so this confirmation alone settles the order.
        self.orders
            .update_payment_status(
                &payment.order_id,
                PaymentStatus::Paid,
                shared::util::now_millis(),
            )
            .await?;

        self.metrics.record_processed_webhook();
        tracing::info!(
            target: "webhook",
            order = %payment.order_id,
            transaction = %payment.transaction_id,
            "Payment confirmed"
        );
        Ok(())
    }

    /// Connected-account channel. Syncs capability flags from the
    /// provider; per-account failures are logged and swallowed.
    pub async fn handle_account_event(&self, event: WebhookEvent) -> AppResult<()> {
        if event.event_type != "account.updated" {
            tracing::debug!(target: "webhook", event = %event.event_type, "Ignoring account event");
            return Ok(());
        }

        let Some(account_id) = event.data.object.get("id").and_then(|v| v.as_str()) else {
            tracing::warn!(target: "webhook", "Account event without account id");
            return Ok(());
        };

        let capabilities = match self.provider.retrieve_account(account_id).await {
            Ok(caps) => caps,
            Err(e) => {
                tracing::warn!(target: "webhook", account = %account_id, error = %e, "Account lookup failed");
                return Ok(());
            }
        };

        match self
            .users
            .update_connect_capabilities(
                account_id,
                capabilities.charges_enabled,
                capabilities.payouts_enabled,
            )
            .await?
        {
            Some(user) => {
                tracing::info!(
                    target: "webhook",
                    account = %account_id,
                    onboarding_completed = user.onboarding_completed,
                    "Connected account updated"
                );
            }
            None => {
                tracing::warn!(target: "webhook", account = %account_id, "No user for connected account");
            }
        }
        Ok(())
    }
}
