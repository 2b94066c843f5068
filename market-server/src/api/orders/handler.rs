//! Order API handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};

use crate::api::PageQuery;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::Order;
use crate::orders::{CreateOrderRequest, OrderAssembler, SupplierOrderView, UpdateStatusRequest};
use shared::{ApiResponse, AppError, AppResult, Pagination};

/// POST /order/create
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(req): Json<CreateOrderRequest>,
) -> AppResult<ApiResponse<Order>> {
    let order = OrderAssembler::new(state.get_db())
        .create(&user.id, req)
        .await?;
    Ok(ApiResponse::created(order, "Order created"))
}

/// GET /order/my-orders
pub async fn my_orders(
    State(state): State<ServerState>,
    user: CurrentUser,
    Query(query): Query<PageQuery>,
) -> AppResult<ApiResponse<Vec<Order>>> {
    let (orders, total) = OrderAssembler::new(state.get_db())
        .my_orders(&user.id, query.page, query.limit)
        .await?;
    Ok(ApiResponse::ok(orders).with_meta(Pagination::new(query.page, query.limit, total)))
}

/// GET /order/all-orders (admin)
pub async fn all_orders(
    State(state): State<ServerState>,
    user: CurrentUser,
    Query(query): Query<PageQuery>,
) -> AppResult<ApiResponse<Vec<Order>>> {
    if !user.is_admin() {
        return Err(AppError::forbidden("Admin role required"));
    }
    let (orders, total) = OrderAssembler::new(state.get_db())
        .all_orders(query.page, query.limit)
        .await?;
    Ok(ApiResponse::ok(orders).with_meta(Pagination::new(query.page, query.limit, total)))
}

/// GET /order/supplier-orders (approved supplier)
pub async fn supplier_orders(
    State(state): State<ServerState>,
    user: CurrentUser,
    Query(query): Query<PageQuery>,
) -> AppResult<ApiResponse<Vec<SupplierOrderView>>> {
    if !user.is_supplier() {
        return Err(AppError::forbidden("Supplier role required"));
    }
    let (orders, total) = OrderAssembler::new(state.get_db())
        .supplier_orders(&user.id, query.page, query.limit)
        .await?;
    Ok(ApiResponse::ok(orders).with_meta(Pagination::new(query.page, query.limit, total)))
}

/// PUT /order/cancel/{id} (owner or admin)
pub async fn cancel(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<Order>> {
    let order = OrderAssembler::new(state.get_db()).cancel(&user, &id).await?;
    Ok(ApiResponse::ok_with_message(order, "Order cancelled"))
}

/// PUT /order/update-status/{id} (admin)
pub async fn update_status(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(req): Json<UpdateStatusRequest>,
) -> AppResult<ApiResponse<Order>> {
    if !user.is_admin() {
        return Err(AppError::forbidden("Admin role required"));
    }
    let order = OrderAssembler::new(state.get_db())
        .update_status(&id, req.status)
        .await?;
    Ok(ApiResponse::ok_with_message(order, "Order status updated"))
}
