//! HTTP API
//!
//! One module per route group, each exposing a `router()` merged in
//! [`crate::core::server::build_router`]. Handlers stay thin: extract,
//! delegate to a service, wrap in the response envelope.

pub mod cart;
pub mod health;
pub mod orders;
pub mod payments;
pub mod settlements;
pub mod webhook;

use serde::Deserialize;

/// Common pagination query parameters (`?page=1&limit=10`)
#[derive(Debug, Deserialize)]
pub struct PageQuery {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

fn default_page() -> u32 {
    1
}

fn default_limit() -> u32 {
    10
}
