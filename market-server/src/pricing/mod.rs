//! Pricing module
//!
//! Pure price resolution for the four price bases (retail, variant,
//! case-wholesale, pallet-wholesale). No database access and no stock
//! checks; inventory is enforced at decrement time by a separate
//! collaborator.
//!
//! Uses rust_decimal for all arithmetic; monetary values are stored as
//! f64 rounded to 2 decimal places.

mod resolver;
#[cfg(test)]
mod tests;

pub use resolver::{ResolvedPrice, line_total, resolve_price};

use rust_decimal::prelude::*;

/// Rounding for monetary values (2 decimal places, half-up)
const DECIMAL_PLACES: u32 = 2;

/// Convert f64 to Decimal for calculation
#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default()
}

/// Convert Decimal back to f64 for storage, rounded to 2 decimal places
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or_default()
}
