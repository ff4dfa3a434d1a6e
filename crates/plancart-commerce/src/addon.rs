//! Add-on kinds and priced add-on offers.
//!
//! A house plan can be bought together with complementary projects. The
//! catalog describes them as loosely typed `key -> price` entries; keys are
//! mapped onto [`AddonKind`] here so that an unexpected key can never end up
//! in price math.

use crate::money::Money;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A complementary project sold alongside a plan.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AddonKind {
    Electrical,
    Hydraulic,
    Structural,
    Sanitary,
    /// A key the storefront does not know how to price.
    Unknown(String),
}

impl AddonKind {
    /// Every kind the storefront can price, in display order.
    pub const KNOWN: [AddonKind; 4] = [
        AddonKind::Electrical,
        AddonKind::Hydraulic,
        AddonKind::Structural,
        AddonKind::Sanitary,
    ];

    /// Parse a catalog key. Never fails; unrecognised keys become `Unknown`.
    pub fn parse(key: &str) -> Self {
        match key.trim().to_lowercase().as_str() {
            "electrical" => AddonKind::Electrical,
            "hydraulic" => AddonKind::Hydraulic,
            "structural" => AddonKind::Structural,
            "sanitary" => AddonKind::Sanitary,
            _ => AddonKind::Unknown(key.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            AddonKind::Electrical => "electrical",
            AddonKind::Hydraulic => "hydraulic",
            AddonKind::Structural => "structural",
            AddonKind::Sanitary => "sanitary",
            AddonKind::Unknown(key) => key,
        }
    }

    /// Whether this kind takes part in pricing.
    pub fn is_known(&self) -> bool {
        !matches!(self, AddonKind::Unknown(_))
    }

    /// Default display label.
    pub fn label(&self) -> &str {
        match self {
            AddonKind::Electrical => "Electrical project",
            AddonKind::Hydraulic => "Hydraulic project",
            AddonKind::Structural => "Structural project",
            AddonKind::Sanitary => "Sanitary project",
            AddonKind::Unknown(key) => key,
        }
    }
}

impl From<String> for AddonKind {
    fn from(s: String) -> Self {
        AddonKind::parse(&s)
    }
}

impl From<&str> for AddonKind {
    fn from(s: &str) -> Self {
        AddonKind::parse(s)
    }
}

impl From<AddonKind> for String {
    fn from(kind: AddonKind) -> Self {
        match kind {
            AddonKind::Unknown(key) => key,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for AddonKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An add-on as offered for one product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Addon {
    /// Which add-on this is.
    pub id: AddonKind,
    /// Display label.
    #[serde(default)]
    pub label: String,
    /// Price of the add-on alone.
    pub price: Money,
}

impl Addon {
    /// Create an offer with the kind's default label.
    pub fn new(id: AddonKind, price: Money) -> Self {
        let label = id.label().to_string();
        Self { id, label, price }
    }

    /// Override the label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Whether this offer may be priced: a known kind with a positive price.
    pub fn is_priceable(&self) -> bool {
        self.id.is_known() && self.price.is_positive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_kinds() {
        assert_eq!(AddonKind::parse("electrical"), AddonKind::Electrical);
        assert_eq!(AddonKind::parse(" Hydraulic "), AddonKind::Hydraulic);
        assert_eq!(AddonKind::parse("STRUCTURAL"), AddonKind::Structural);
        assert_eq!(AddonKind::parse("sanitary"), AddonKind::Sanitary);
    }

    #[test]
    fn test_unknown_kind_keeps_key() {
        let kind = AddonKind::parse("landscaping");
        assert_eq!(kind, AddonKind::Unknown("landscaping".to_string()));
        assert!(!kind.is_known());
        assert_eq!(String::from(kind), "landscaping");
    }

    #[test]
    fn test_kind_serializes_as_string() {
        let json = serde_json::to_string(&AddonKind::Electrical).unwrap();
        assert_eq!(json, "\"electrical\"");

        let kinds: Vec<AddonKind> = serde_json::from_str(r#"["hydraulic","pool"]"#).unwrap();
        assert_eq!(
            kinds,
            vec![AddonKind::Hydraulic, AddonKind::Unknown("pool".to_string())]
        );
    }

    #[test]
    fn test_priceable() {
        assert!(Addon::new(AddonKind::Electrical, Money::new(200)).is_priceable());
        assert!(!Addon::new(AddonKind::Electrical, Money::zero()).is_priceable());
        assert!(!Addon::new(AddonKind::parse("pool"), Money::new(200)).is_priceable());
    }

    #[test]
    fn test_known_order() {
        let mut kinds = vec![
            AddonKind::Sanitary,
            AddonKind::parse("pool"),
            AddonKind::Electrical,
            AddonKind::Hydraulic,
        ];
        kinds.sort();
        assert_eq!(kinds[0], AddonKind::Electrical);
        assert_eq!(kinds[1], AddonKind::Hydraulic);
        assert_eq!(kinds[2], AddonKind::Sanitary);
        assert!(!kinds[3].is_known());
    }
}
