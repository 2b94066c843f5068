//! Input validation helpers
//!
//! Centralized limits and checks shared by the request handlers.

use shared::AppError;

/// Max length for client-supplied redirect URLs
pub const MAX_URL_LEN: usize = 2048;

/// Max quantity accepted on a single cart/order line
pub const MAX_LINE_QUANTITY: i64 = 100_000;

/// Validate a line quantity: positive and within bounds.
pub fn validate_quantity(quantity: i64, field: &str) -> Result<(), AppError> {
    if quantity < 1 {
        return Err(AppError::validation(format!(
            "{field} must be a positive integer"
        )));
    }
    if quantity > MAX_LINE_QUANTITY {
        return Err(AppError::validation(format!(
            "{field} exceeds the maximum of {MAX_LINE_QUANTITY}"
        )));
    }
    Ok(())
}

/// Validate a required redirect URL: non-empty, http(s), length-bounded.
pub fn validate_redirect_url(value: &str, field: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} must not be empty")));
    }
    if value.len() > MAX_URL_LEN {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {MAX_URL_LEN})",
            value.len()
        )));
    }
    if !value.starts_with("http://") && !value.starts_with("https://") {
        return Err(AppError::validation(format!(
            "{field} must be an http(s) URL"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quantity_bounds() {
        assert!(validate_quantity(1, "quantity").is_ok());
        assert!(validate_quantity(0, "quantity").is_err());
        assert!(validate_quantity(-3, "quantity").is_err());
        assert!(validate_quantity(MAX_LINE_QUANTITY + 1, "quantity").is_err());
    }

    #[test]
    fn url_scheme_required() {
        assert!(validate_redirect_url("https://shop.example/ok", "successUrl").is_ok());
        assert!(validate_redirect_url("ftp://shop.example", "successUrl").is_err());
        assert!(validate_redirect_url("", "successUrl").is_err());
    }
}
