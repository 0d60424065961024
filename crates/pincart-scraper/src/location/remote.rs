//! Remote inventory-code lookup for the JioMart storefront.
//!
//! ## Observed payload
//!
//! ```json
//! {
//!   "region_codes": { "GROCERIES": ["PANINDIAGROCERIES", "TG01"], "FASHION": ["TG01"] },
//!   "store_codes":  { "GROCERIES": ["U3HR", "S535"] }
//! }
//! ```
//!
//! Both collections are keyed by vertical. Some pincodes return a flat array
//! instead; both shapes are flattened in document order.

use std::collections::HashSet;

use reqwest::Client;
use serde_json::Value;

use crate::client::fetch_json;
use crate::error::BackendError;
use crate::parse_helpers::string_like;

const MAPPING_PATH: &str = "collection/mcat_pincode/get_mcat_inventory_code";

/// Region- and store-level codes for one pincode, duplicates removed,
/// document order kept. Scoped to a single search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InventoryCodes {
    pub region_codes: Vec<String>,
    pub store_codes: Vec<String>,
}

/// Calls the storefront's pincode mapping endpoint.
#[derive(Debug, Clone)]
pub struct InventoryCodeResolver {
    client: Client,
    base_url: String,
}

impl InventoryCodeResolver {
    #[must_use]
    pub fn new(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_owned(),
        }
    }

    /// Fetches the inventory codes for `pincode`. Never cached.
    ///
    /// # Errors
    ///
    /// - [`BackendError::NotServiceable`] on HTTP 404.
    /// - [`BackendError::UnexpectedStatus`] on any other non-2xx status.
    /// - [`BackendError::Http`] on network failure or timeout.
    /// - [`BackendError::Deserialize`] if the body is not JSON.
    /// - [`BackendError::MalformedLocationCodes`] if either collection is missing.
    pub async fn resolve(&self, pincode: &str) -> Result<InventoryCodes, BackendError> {
        let url = format!("{}/{MAPPING_PATH}/{pincode}", self.base_url);
        tracing::debug!(%url, "fetching inventory codes");

        let request = self
            .client
            .get(&url)
            .header(
                reqwest::header::ACCEPT,
                "application/json, text/javascript, */*; q=0.01",
            )
            .header(reqwest::header::ACCEPT_LANGUAGE, "en-GB,en;q=0.9")
            .header(reqwest::header::CACHE_CONTROL, "no-cache")
            .header(reqwest::header::REFERER, "https://www.jiomart.com/")
            .header("x-requested-with", "XMLHttpRequest");

        let body = match fetch_json(request, &url, &format!("inventory codes for {pincode}")).await
        {
            Err(BackendError::UnexpectedStatus { status: 404, .. }) => {
                return Err(BackendError::NotServiceable {
                    pincode: pincode.to_owned(),
                    status: 404,
                });
            }
            other => other?,
        };

        parse_inventory_codes(&body, pincode)
    }
}

/// Extracts both code collections from a mapping payload.
///
/// # Errors
///
/// Returns [`BackendError::MalformedLocationCodes`] when `region_codes` or
/// `store_codes` is missing or is neither an object of arrays nor an array.
pub fn parse_inventory_codes(body: &Value, pincode: &str) -> Result<InventoryCodes, BackendError> {
    let collection = |key: &str| -> Result<Vec<String>, BackendError> {
        let malformed = |reason: String| BackendError::MalformedLocationCodes {
            pincode: pincode.to_owned(),
            reason,
        };
        match body.get(key) {
            None | Some(Value::Null) => Err(malformed(format!("`{key}` is missing"))),
            Some(Value::Object(by_vertical)) => Ok(flatten(
                by_vertical
                    .values()
                    .filter_map(Value::as_array)
                    .flat_map(|codes| codes.iter()),
            )),
            Some(Value::Array(codes)) => Ok(flatten(codes.iter())),
            Some(other) => Err(malformed(format!("`{key}` has unexpected type: {other}"))),
        }
    };

    Ok(InventoryCodes {
        region_codes: collection("region_codes")?,
        store_codes: collection("store_codes")?,
    })
}

fn flatten<'a>(codes: impl Iterator<Item = &'a Value>) -> Vec<String> {
    let mut seen = HashSet::new();
    codes
        .filter_map(string_like)
        .filter(|code| seen.insert(code.clone()))
        .collect()
}
