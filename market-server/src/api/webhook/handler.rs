//! Webhook handlers
//!
//! Contract: a bad signature or malformed header is a 400; once the
//! signature verifies, the answer is always `200 {received:true}` no
//! matter what the body contains. Unparseable payloads bump the
//! unmatched counter; processing errors are logged, never surfaced, so
//! the processor does not retry forever against a bug.

use axum::{Json, body::Bytes, extract::State, http::HeaderMap};
use serde_json::{Value, json};

use crate::core::ServerState;
use crate::payments::{WebhookProcessor, parse_event, verify_signature};
use shared::{AppError, AppResult};

const SIGNATURE_HEADER: &str = "stripe-signature";

/// POST /api/v1/webhook — checkout events
pub async fn checkout(
    State(state): State<ServerState>,
    headers: HeaderMap,
    body: Bytes,
) -> AppResult<Json<Value>> {
    verify_request(&state, &headers, &body, &state.config.webhook_secret)?;

    if let Some(event) = parse_event(&state.metrics, &body)
        && let Err(e) = processor(&state).handle_checkout_event(event).await
    {
        tracing::error!(target: "webhook", error = %e, "Checkout event processing failed");
    }
    Ok(Json(json!({ "received": true })))
}

/// POST /api/v1/webhook/connected — connected-account events
pub async fn connected(
    State(state): State<ServerState>,
    headers: HeaderMap,
    body: Bytes,
) -> AppResult<Json<Value>> {
    verify_request(&state, &headers, &body, &state.config.connect_webhook_secret)?;

    if let Some(event) = parse_event(&state.metrics, &body)
        && let Err(e) = processor(&state).handle_account_event(event).await
    {
        tracing::error!(target: "webhook", error = %e, "Account event processing failed");
    }
    Ok(Json(json!({ "received": true })))
}

fn processor(state: &ServerState) -> WebhookProcessor {
    WebhookProcessor::new(state.get_db(), state.payments.clone(), state.metrics.clone())
}

/// Verify the signature over the raw request bytes
fn verify_request(
    state: &ServerState,
    headers: &HeaderMap,
    body: &[u8],
    secret: &str,
) -> AppResult<()> {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::validation("Missing signature header"))?;

    verify_signature(
        secret,
        signature,
        body,
        state.config.webhook_tolerance_secs,
        chrono::Utc::now().timestamp(),
    )
}
