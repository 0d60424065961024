//! Search-index response parsing.
//!
//! ## Observed hit shape
//!
//! ```json
//! {
//!   "objectID": "590003515",
//!   "product_code": 590003515,
//!   "display_name": "Heritage Toned Milk 500 ml (Pouch)",
//!   "image_path": "images/product/original/590003515/heritage.jpg",
//!   "url_path": "/p/groceries/heritage-toned-milk/590003515",
//!   "buybox_mrp": {
//!     "PANINDIAGROCERIES": { "available": false, "mrp": 28.0, "price": 27.0 },
//!     "U3HR":              { "available": true,  "mrp": 28.0, "price": 26.0 }
//!   }
//! }
//! ```

use pincart_core::CanonicalProduct;
use serde_json::Value;

use super::fields::IndexFieldMap;
use crate::error::{BackendError, RecordError};
use crate::parse_helpers::{flag, price_field, str_field, string_like};

pub(super) const SITE_URL: &str = "https://www.jiomart.com";

/// Normalizes every hit of the first result set.
///
/// `store_codes` is the resolved store preference order for the price map.
///
/// # Errors
///
/// Returns [`BackendError::UnexpectedShape`] if `results` is missing or not
/// an array.
pub fn normalize_query_response(
    body: &Value,
    store_codes: &[String],
    fields: &IndexFieldMap,
) -> Result<Vec<CanonicalProduct>, BackendError> {
    let results = body
        .get("results")
        .and_then(Value::as_array)
        .ok_or_else(|| BackendError::UnexpectedShape {
            context: "JioMart search".to_string(),
            reason: "`results` is missing or not an array".to_string(),
        })?;

    let hits = results
        .first()
        .and_then(|first| first.get("hits"))
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();
    tracing::debug!(hits = hits.len(), revision = %fields.revision, "JioMart index returned hits");

    let mut products = Vec::with_capacity(hits.len());
    for hit in hits {
        match normalize_hit(hit, store_codes, fields) {
            Ok(Some(product)) => products.push(product),
            Ok(None) => {
                tracing::debug!(object_id = ?hit.get("objectID"), "skipping unnamed JioMart hit");
            }
            Err(e) => tracing::debug!(error = %e, "skipping JioMart hit"),
        }
    }
    Ok(products)
}

fn normalize_hit(
    hit: &Value,
    store_codes: &[String],
    fields: &IndexFieldMap,
) -> Result<Option<CanonicalProduct>, RecordError> {
    let Some(name) = str_field(hit, "display_name") else {
        return Ok(None);
    };
    let record = hit
        .get("objectID")
        .and_then(string_like)
        .unwrap_or_else(|| name.to_owned());

    let price = if fields.emits_selling_price {
        hit.get("buybox_mrp")
            .map(|buybox| pick_price(buybox, store_codes, &record))
            .transpose()?
            .flatten()
    } else {
        None
    };

    Ok(Some(CanonicalProduct {
        name: name.to_owned(),
        mrp: price.and_then(|p| p.mrp),
        selling_price: price.map(|p| p.selling_price),
        image: str_field(hit, "image_path").map(|path| {
            format!("{SITE_URL}/images/product/original/{path}?im=Resize=(150,150)")
        }),
        variant: None,
        barcode: hit
            .get("product_code")
            .and_then(string_like)
            .unwrap_or_default(),
        deeplink: str_field(hit, "url_path").map_or_else(
            || SITE_URL.to_owned(),
            |path| format!("{SITE_URL}{path}"),
        ),
    }))
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) struct BuyboxPrice {
    pub mrp: Option<f64>,
    pub selling_price: f64,
}

/// Chooses the price record for a hit.
///
/// Tries each resolved store code in order; failing that, the first
/// available record in the map's document order. A record qualifies when it
/// is available and carries a selling price.
pub(super) fn pick_price(
    buybox: &Value,
    store_codes: &[String],
    record: &str,
) -> Result<Option<BuyboxPrice>, RecordError> {
    let Some(by_store) = buybox.as_object() else {
        return Ok(None);
    };

    for code in store_codes {
        if let Some(price) = by_store.get(code) {
            if let Some(found) = qualifying_price(price, record)? {
                return Ok(Some(found));
            }
        }
    }

    for (store, price) in by_store {
        if let Some(found) = qualifying_price(price, record)? {
            tracing::debug!(record, store = %store, "using fallback buybox price");
            return Ok(Some(found));
        }
    }

    Ok(None)
}

fn qualifying_price(price: &Value, record: &str) -> Result<Option<BuyboxPrice>, RecordError> {
    if !flag(price.get("available")) {
        return Ok(None);
    }
    let Some(selling_price) = price_field(price, "price", record)? else {
        return Ok(None);
    };
    Ok(Some(BuyboxPrice {
        mrp: price_field(price, "mrp", record)?,
        selling_price,
    }))
}

#[cfg(test)]
#[path = "response_test.rs"]
mod tests;
