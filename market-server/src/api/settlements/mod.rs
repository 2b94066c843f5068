//! Settlement API

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/settlement/my-settlements", get(handler::my_settlements))
        .route("/settlement/all-settlements", get(handler::all_settlements))
}
