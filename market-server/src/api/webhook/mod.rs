//! Webhook API
//!
//! Raw-body endpoints for the payment processor. No JWT here; the
//! HMAC signature is the authentication.

mod handler;

use axum::{Router, routing::post};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/v1/webhook", post(handler::checkout))
        .route("/api/v1/webhook/connected", post(handler::connected))
}
