//! Price resolver
//!
//! Maps a (product, selector, quantity) triple onto a unit price.
//! Wholesale offers are passed in by the caller; the resolver only
//! checks that the referenced offer is present, of the right kind and
//! actually covers the target product.

use rust_decimal::Decimal;
use shared::{AppError, AppResult, Selector};

use super::{to_decimal, to_f64};
use crate::db::models::{Product, Wholesale, WholesaleKind};

/// Result of price resolution for one line
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedPrice {
    /// Effective unit price (discount applied)
    pub unit_price: f64,
    /// Price before discount
    pub original_price: f64,
    /// Discount as a percentage of the original price (0 when none)
    pub discount_percent: f64,
    /// Unit of sale label, when the basis defines one
    pub unit_label: Option<String>,
}

/// Resolve the unit price for a product under the given selector.
///
/// Quantity semantics: for a pallet selector the quantity counts whole
/// pallets — the flat pallet price is the unit price no matter how
/// many cases the pallet bundles.
pub fn resolve_price(
    product: &Product,
    wholesales: &[Wholesale],
    selector: &Selector,
    quantity: i64,
) -> AppResult<ResolvedPrice> {
    if quantity < 1 {
        return Err(AppError::validation("quantity must be a positive integer"));
    }

    let product_id = product
        .id
        .as_ref()
        .map(|id| id.to_string())
        .ok_or_else(|| AppError::internal("product has no id"))?;

    match selector {
        Selector::Retail => Ok(ResolvedPrice {
            unit_price: product.retail_price_from.unwrap_or(0.0),
            original_price: product.retail_price_from.unwrap_or(0.0),
            discount_percent: 0.0,
            unit_label: None,
        }),

        Selector::Variant(variant_id) => {
            let variant = product
                .variant(variant_id)
                .ok_or_else(|| AppError::not_found(format!("Variant {variant_id}")))?;
            let unit_price = if variant.discount_price > 0.0 {
                variant.discount_price
            } else {
                variant.price
            };
            Ok(ResolvedPrice {
                unit_price,
                original_price: variant.price,
                discount_percent: discount_percent_of(variant.price, unit_price),
                unit_label: variant.unit.clone(),
            })
        }

        Selector::Case(offer_id) => {
            let offer = find_offer(wholesales, offer_id, WholesaleKind::Case)?;
            let case_item = offer.case_item_for(&product_id).ok_or_else(|| {
                AppError::not_found(format!("Case pricing for product {product_id}"))
            })?;

            // unit = price × (1 − discount/100)
            let price = to_decimal(case_item.price);
            let factor = Decimal::ONE - to_decimal(case_item.discount_percent) / Decimal::from(100);
            Ok(ResolvedPrice {
                unit_price: to_f64(price * factor),
                original_price: case_item.price,
                discount_percent: case_item.discount_percent,
                unit_label: Some("case".to_string()),
            })
        }

        Selector::Pallet(offer_id) => {
            let offer = find_offer(wholesales, offer_id, WholesaleKind::Pallet)?;
            let pallet = offer.pallet_containing(&product_id).ok_or_else(|| {
                AppError::not_found(format!("Pallet containing product {product_id}"))
            })?;
            Ok(ResolvedPrice {
                unit_price: pallet.price,
                original_price: pallet.price,
                discount_percent: 0.0,
                unit_label: Some("pallet".to_string()),
            })
        }
    }
}

/// Line total = unit price × quantity, rounded to 2 decimal places
pub fn line_total(unit_price: f64, quantity: i64) -> f64 {
    to_f64(to_decimal(unit_price) * Decimal::from(quantity))
}

fn find_offer<'a>(
    wholesales: &'a [Wholesale],
    offer_id: &str,
    kind: WholesaleKind,
) -> AppResult<&'a Wholesale> {
    let offer = wholesales
        .iter()
        .find(|w| w.id.as_ref().is_some_and(|id| id.to_string() == offer_id))
        .ok_or_else(|| AppError::not_found(format!("Wholesale offer {offer_id}")))?;
    if offer.kind != kind {
        return Err(AppError::not_found(format!(
            "Wholesale offer {offer_id} of the requested kind"
        )));
    }
    Ok(offer)
}

fn discount_percent_of(original: f64, effective: f64) -> f64 {
    if original <= 0.0 || effective >= original {
        return 0.0;
    }
    let pct = (Decimal::ONE - to_decimal(effective) / to_decimal(original)) * Decimal::from(100);
    to_f64(pct)
}
