//! Payment split engine
//!
//! Pure bookkeeping: partitions order items into an admin bucket plus
//! one bucket per supplier and computes the platform commission per
//! supplier bucket. The checkout charge itself is always one
//! consolidated amount; the split only drives settlement records.

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use crate::db::models::OrderItem;
use crate::pricing::{to_decimal, to_f64};

/// One supplier's share of an order
#[derive(Debug, Clone, PartialEq)]
pub struct SupplierBucket {
    /// Σ unit × quantity over the supplier's items
    pub total: f64,
    /// round2(total × rate)
    pub commission: f64,
    /// total − commission
    pub payable: f64,
}

/// Outcome of splitting one order's items
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentSplit {
    /// Platform-owned items (no supplier)
    pub admin_total: f64,
    /// Keyed by "user:id"; BTreeMap keeps settlement order stable
    pub suppliers: BTreeMap<String, SupplierBucket>,
    /// admin_total + Σ supplier totals
    pub grand_total: f64,
}

/// Split order items into admin and per-supplier buckets.
///
/// The commission applies per supplier bucket, never to the admin
/// bucket or the order grand total.
pub fn split_payment(items: &[OrderItem], commission_rate: f64) -> PaymentSplit {
    let rate = to_decimal(commission_rate);

    let mut admin = Decimal::ZERO;
    let mut totals: BTreeMap<String, Decimal> = BTreeMap::new();

    for item in items {
        let amount = to_decimal(item.unit_price) * Decimal::from(item.quantity);
        match &item.supplier_id {
            Some(supplier) => *totals.entry(supplier.clone()).or_default() += amount,
            None => admin += amount,
        }
    }

    let mut grand = admin;
    let mut suppliers = BTreeMap::new();
    for (supplier, total) in totals {
        grand += total;
        let commission = to_decimal(to_f64(total * rate));
        suppliers.insert(
            supplier,
            SupplierBucket {
                total: to_f64(total),
                commission: to_f64(commission),
                payable: to_f64(total - commission),
            },
        );
    }

    PaymentSplit {
        admin_total: to_f64(admin),
        suppliers,
        grand_total: to_f64(grand),
    }
}
