//! Payments
//!
//! Split engine, checkout session service, processor client and the
//! webhook channels. The split is bookkeeping only; the customer is
//! always charged one consolidated amount.

mod provider;
mod service;
mod split;
mod webhook;

pub use provider::{
    AccountCapabilities, CheckoutSession, CheckoutSessionRequest, PaymentProvider, StripeGateway,
};
pub use service::{CheckoutResponse, PaymentService, ProcessPaymentRequest};
pub use split::{PaymentSplit, SupplierBucket, split_payment};
pub use webhook::{
    EventData, WebhookEvent, WebhookProcessor, parse_event, signature_header, verify_signature,
};
