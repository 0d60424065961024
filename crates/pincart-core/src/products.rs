use serde::{Deserialize, Serialize};

/// A product hit from any backend, normalized into the one shape the
/// aggregate response exposes.
///
/// `barcode` and `deeplink` are never null on the wire: backends that have
/// nothing to put there emit an empty string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalProduct {
    pub name: String,
    /// Maximum retail price.
    pub mrp: Option<f64>,
    pub selling_price: Option<f64>,
    /// Absolute image URL.
    pub image: Option<String>,
    /// Pack size or variant label, e.g. `"500 ml"`.
    pub variant: Option<String>,
    #[serde(default)]
    pub barcode: String,
    /// Absolute URL of the product page on the backend's storefront.
    #[serde(default)]
    pub deeplink: String,
}

impl CanonicalProduct {
    /// Starts a product with only a name; every optional field empty.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            mrp: None,
            selling_price: None,
            image: None,
            variant: None,
            barcode: String::new(),
            deeplink: String::new(),
        }
    }
}

/// Accepts a parsed price only if it is finite and strictly positive.
#[must_use]
pub fn accept_price(value: f64) -> Option<f64> {
    (value.is_finite() && value > 0.0).then_some(value)
}

/// Parses a decimal price string such as `"45.00"`.
///
/// Surrounding whitespace is ignored. Returns `None` for anything that is
/// not a finite, strictly positive number.
#[must_use]
pub fn parse_price(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().and_then(accept_price)
}
