//! Cart API handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};

use crate::api::PageQuery;
use crate::auth::CurrentUser;
use crate::cart::{
    AddToCartRequest, CartLedger, CartLineView, DecreaseOutcome, QuantityChangeRequest,
};
use crate::core::ServerState;
use crate::db::models::CartLine;
use shared::{ApiResponse, AppResult, Pagination};

/// POST /cart/add-cart
pub async fn add(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(req): Json<AddToCartRequest>,
) -> AppResult<ApiResponse<CartLine>> {
    let line = CartLedger::new(state.get_db()).add(&user.id, req).await?;
    Ok(ApiResponse::created(line, "Added to cart"))
}

/// GET /cart/my-cart
pub async fn my_cart(
    State(state): State<ServerState>,
    user: CurrentUser,
    Query(query): Query<PageQuery>,
) -> AppResult<ApiResponse<Vec<CartLineView>>> {
    let (lines, total) = CartLedger::new(state.get_db())
        .list(&user.id, query.page, query.limit)
        .await?;
    Ok(ApiResponse::ok(lines).with_meta(Pagination::new(query.page, query.limit, total)))
}

/// PUT /cart/increase-quantity/{id}
pub async fn increase(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
    body: Option<Json<QuantityChangeRequest>>,
) -> AppResult<ApiResponse<CartLine>> {
    let delta = body.map(|Json(b)| b.quantity).unwrap_or(1);
    let line = CartLedger::new(state.get_db())
        .increase(&user.id, &id, delta)
        .await?;
    Ok(ApiResponse::ok(line))
}

/// PUT /cart/decrease-quantity/{id}
pub async fn decrease(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
    body: Option<Json<QuantityChangeRequest>>,
) -> AppResult<ApiResponse<DecreaseOutcome>> {
    let delta = body.map(|Json(b)| b.quantity).unwrap_or(1);
    let outcome = CartLedger::new(state.get_db())
        .decrease(&user.id, &id, delta)
        .await?;
    Ok(ApiResponse::ok(outcome))
}

/// DELETE /cart/remove-product/{id}
pub async fn remove(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<CartLine>> {
    let line = CartLedger::new(state.get_db()).remove(&user.id, &id).await?;
    Ok(ApiResponse::ok_with_message(line, "Removed from cart"))
}
