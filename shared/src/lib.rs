//! Shared types for the marketplace backend
//!
//! Common types used across crates: the unified response envelope,
//! the application error type, the price selector union, and small
//! time utilities.

pub mod error;
pub mod response;
pub mod selector;
pub mod util;

// Re-exports
pub use axum::Json;
pub use error::{AppError, AppResult};
pub use http;
pub use response::{ApiResponse, Pagination};
pub use selector::Selector;
pub use serde::{Deserialize, Serialize};
