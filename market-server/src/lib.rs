//! Marketplace commerce backend
//!
//! Multi-supplier commerce core: cart ledger, pricing resolution
//! (retail / variant / case / pallet), order assembly, split-payment
//! settlement and payment-processor webhooks.

pub mod api;
pub mod auth;
pub mod cart;
pub mod core;
pub mod db;
pub mod orders;
pub mod payments;
pub mod pricing;
pub mod utils;

pub use core::{Config, ServerState};
pub use shared::{AppError, AppResult};

/// Set up the process environment: dotenv + logging
pub fn setup_environment() {
    dotenv::dotenv().ok();
    utils::logger::init_logger();
}
