//! Authentication
//!
//! JWT bearer validation and the [`CurrentUser`] extractor. Identity
//! issuance lives in a separate service; this module only validates
//! tokens and exposes the caller's id and role to handlers.

mod extractor;
mod jwt;

pub use jwt::{Claims, CurrentUser, JwtError, JwtService};
