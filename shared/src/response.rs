//! API Response types
//!
//! Standardized API response structures for the whole backend.

use axum::Json;
use axum::response::{IntoResponse, Response};
use http::StatusCode;
use serde::Serialize;

/// Unified API response structure
///
/// All API responses follow this format:
/// ```json
/// {
///     "success": true,
///     "message": "Success",
///     "statusCode": 200,
///     "data": { ... },
///     "meta": { ... }
/// }
/// ```
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    /// Whether the request succeeded
    pub success: bool,
    /// Human-readable message
    pub message: String,
    /// HTTP status code echoed in the body
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    /// Response data (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Pagination metadata (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<Pagination>,
}

impl<T> ApiResponse<T> {
    /// Create a successful response
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            message: "Success".to_string(),
            status_code: 200,
            data: Some(data),
            meta: None,
        }
    }

    /// Create a successful response with custom message
    pub fn ok_with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            status_code: 200,
            data: Some(data),
            meta: None,
        }
    }

    /// Create a 201 Created response
    pub fn created(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            status_code: 201,
            data: Some(data),
            meta: None,
        }
    }

    /// Create an error response
    pub fn error(status_code: u16, message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            status_code,
            data: None,
            meta: None,
        }
    }

    /// Attach pagination metadata
    pub fn with_meta(mut self, meta: Pagination) -> Self {
        self.meta = Some(meta);
        self
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::OK);
        (status, Json(self)).into_response()
    }
}

/// Pagination metadata
#[derive(Debug, Serialize, Clone)]
pub struct Pagination {
    /// Current page number (1-based)
    pub page: u32,
    /// Items per page
    pub limit: u32,
    /// Total number of items
    pub total: u64,
    /// Total number of pages
    #[serde(rename = "totalPages")]
    pub total_pages: u32,
}

impl Pagination {
    /// Create a new pagination
    pub fn new(page: u32, limit: u32, total: u64) -> Self {
        let total_pages = if limit == 0 {
            0
        } else {
            ((total as f64) / (limit as f64)).ceil() as u32
        };
        Self {
            page,
            limit,
            total,
            total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_rounds_up() {
        let p = Pagination::new(1, 10, 41);
        assert_eq!(p.total_pages, 5);
    }

    #[test]
    fn pagination_zero_limit() {
        let p = Pagination::new(1, 0, 41);
        assert_eq!(p.total_pages, 0);
    }

    #[test]
    fn envelope_shape() {
        let body = serde_json::to_value(ApiResponse::ok(1)).unwrap();
        assert_eq!(body["success"], true);
        assert_eq!(body["statusCode"], 200);
        assert_eq!(body["data"], 1);
        assert!(body.get("meta").is_none());
    }
}
