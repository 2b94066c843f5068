//! Cart ledger
//!
//! One line per (user, product, selector). Adds merge into existing
//! lines, decreases delete at zero, and every mutation re-checks
//! ownership before touching the document.

mod ledger;
#[cfg(test)]
mod tests;

pub use ledger::{
    AddToCartRequest, CartLedger, CartLineView, DecreaseOutcome, QuantityChangeRequest,
};
