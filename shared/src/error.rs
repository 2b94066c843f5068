//! Unified error handling
//!
//! Application-level error type and its HTTP mapping:
//! - [`AppError`] - application error enum
//! - [`AppResult`] - result alias used by handlers and services
//!
//! Every variant maps to an HTTP status and is serialized into the
//! standard [`ApiResponse`] envelope with `success: false`. Database,
//! internal and payment-gateway failures are logged with full detail
//! and surfaced with a generic message.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::error;

use crate::response::ApiResponse;

/// Application-level Result type
pub type AppResult<T> = Result<T, AppError>;

/// Application error enum
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // ========== Authentication errors (401) ==========
    #[error("Authentication required")]
    Unauthorized,

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token")]
    InvalidToken,

    // ========== Authorization errors (403) ==========
    #[error("Permission denied: {0}")]
    Forbidden(String),

    // ========== Business errors (4xx) ==========
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    // ========== Payment gateway errors ==========
    #[error("Payment session failed: {0}")]
    PaymentSession(String),

    #[error("Payment record failed: {0}")]
    PaymentRecord(String),

    // ========== System errors (5xx) ==========
    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "Please login first".to_string()),
            AppError::TokenExpired => (StatusCode::UNAUTHORIZED, "Token expired".to_string()),
            AppError::InvalidToken => (StatusCode::UNAUTHORIZED, "Invalid token".to_string()),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg.clone()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),

            AppError::PaymentSession(msg) => {
                error!(target: "payment", error = %msg, "Checkout session creation failed");
                (
                    StatusCode::BAD_GATEWAY,
                    "Failed to create payment session".to_string(),
                )
            }
            AppError::PaymentRecord(msg) => {
                error!(target: "payment", error = %msg, "Payment record creation failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to record payment".to_string(),
                )
            }
            AppError::Database(msg) => {
                error!(target: "database", error = %msg, "Database error occurred");
                (StatusCode::INTERNAL_SERVER_ERROR, "Database error".to_string())
            }
            AppError::Internal(msg) => {
                error!(target: "internal", error = %msg, "Internal error occurred");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(ApiResponse::<()>::error(status.as_u16(), message));
        (status, body).into_response()
    }
}

// ========== Helper Constructors ==========

impl AppError {
    /// Create a not found error
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound(format!("{} not found", resource.into()))
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a forbidden error
    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }

    /// Create a conflict error
    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    /// Create a database error
    pub fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Create an invalid token error
    pub fn invalid_token(_msg: impl Into<String>) -> Self {
        Self::InvalidToken
    }

    /// Create an unauthorized error
    pub fn unauthorized() -> Self {
        Self::Unauthorized
    }

    /// Create a token expired error
    pub fn token_expired() -> Self {
        Self::TokenExpired
    }
}
