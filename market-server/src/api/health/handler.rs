//! Health handler

use axum::extract::State;
use serde::Serialize;

use crate::core::ServerState;
use shared::{ApiResponse, AppResult};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthStatus {
    pub status: &'static str,
    pub version: &'static str,
    /// Checkout confirmations that matched no known payment intent
    pub unmatched_webhook_events: u64,
    pub processed_webhook_events: u64,
}

/// GET /health (public)
pub async fn health(State(state): State<ServerState>) -> AppResult<ApiResponse<HealthStatus>> {
    Ok(ApiResponse::ok(HealthStatus {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        unmatched_webhook_events: state.metrics.unmatched_webhook_events(),
        processed_webhook_events: state.metrics.processed_webhook_events(),
    }))
}
