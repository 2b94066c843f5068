//! Price selector
//!
//! Discriminator identifying which price basis applies to a cart or
//! order line: plain retail, a product variant, a case-wholesale offer,
//! or a pallet-wholesale offer. Exactly one basis applies per line, so
//! pricing resolution can be matched exhaustively instead of probing
//! optional id fields at runtime.

use serde::{Deserialize, Serialize};

/// The price basis for a cart or order line
///
/// Wire format (adjacently tagged):
/// ```json
/// { "type": "retail" }
/// { "type": "variant", "id": "variant-uuid" }
/// { "type": "case",    "id": "wholesale:abc" }
/// { "type": "pallet",  "id": "wholesale:def" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "id", rename_all = "lowercase")]
pub enum Selector {
    /// Plain retail line, priced from the product's base unit price
    Retail,
    /// A product variant, by embedded variant id
    Variant(String),
    /// A case-wholesale offer, by wholesale document id
    Case(String),
    /// A pallet-wholesale offer, by wholesale document id
    Pallet(String),
}

impl Selector {
    /// The wholesale offer id, when this selector targets a wholesale offer
    pub fn wholesale_id(&self) -> Option<&str> {
        match self {
            Selector::Case(id) | Selector::Pallet(id) => Some(id),
            _ => None,
        }
    }

    /// The variant id, when this selector targets a variant
    pub fn variant_id(&self) -> Option<&str> {
        match self {
            Selector::Variant(id) => Some(id),
            _ => None,
        }
    }

    /// Stable key used to merge cart lines with an identical selector
    pub fn line_key(&self) -> String {
        match self {
            Selector::Retail => "retail".to_string(),
            Selector::Variant(id) => format!("variant:{id}"),
            Selector::Case(id) => format!("case:{id}"),
            Selector::Pallet(id) => format!("pallet:{id}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selector_wire_format() {
        let v: Selector = serde_json::from_str(r#"{"type":"variant","id":"v1"}"#).unwrap();
        assert_eq!(v, Selector::Variant("v1".to_string()));

        let r: Selector = serde_json::from_str(r#"{"type":"retail"}"#).unwrap();
        assert_eq!(r, Selector::Retail);
    }

    #[test]
    fn line_keys_are_distinct() {
        let keys = [
            Selector::Retail.line_key(),
            Selector::Variant("x".into()).line_key(),
            Selector::Case("x".into()).line_key(),
            Selector::Pallet("x".into()).line_key(),
        ];
        for (i, a) in keys.iter().enumerate() {
            for b in keys.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }
}
