//! Cart API

mod handler;

use axum::{
    Router,
    routing::{delete, get, post, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/cart/add-cart", post(handler::add))
        .route("/cart/my-cart", get(handler::my_cart))
        .route("/cart/increase-quantity/{id}", put(handler::increase))
        .route("/cart/decrease-quantity/{id}", put(handler::decrease))
        .route("/cart/remove-product/{id}", delete(handler::remove))
}
