//! Order API

mod handler;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/order/create", post(handler::create))
        .route("/order/my-orders", get(handler::my_orders))
        .route("/order/all-orders", get(handler::all_orders))
        .route("/order/supplier-orders", get(handler::supplier_orders))
        .route("/order/cancel/{id}", put(handler::cancel))
        .route("/order/update-status/{id}", put(handler::update_status))
}
