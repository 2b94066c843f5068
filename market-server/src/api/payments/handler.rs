//! Payment API handlers

use axum::{Json, extract::State};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::payments::{CheckoutResponse, PaymentService, ProcessPaymentRequest};
use shared::{ApiResponse, AppResult};

/// POST /payment/process
pub async fn process(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(req): Json<ProcessPaymentRequest>,
) -> AppResult<ApiResponse<CheckoutResponse>> {
    let response = PaymentService::new(state.get_db(), state.payments.clone(), &state.config)
        .create_payment(&user.id, req)
        .await?;
    Ok(ApiResponse::created(response, "Checkout session created"))
}
