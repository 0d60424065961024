//! DMart storefront search.
//!
//! ## Observed shape of `GET /api/v3/search/{query}?storeId={id}`
//!
//! ```json
//! {
//!   "products": [{
//!     "name": "Amul Taaza Toned Milk",
//!     "targetUrl": "/amul-taaza-toned-milk-pouch-p/amul-taaza-toned-milk-500ml",
//!     "sKUs": [{
//!       "skuUniqueID": "167340",
//!       "buyable": "true",
//!       "invType": "AVL",
//!       "priceMRP": "28.00",
//!       "priceSALE": "27.00",
//!       "variantTextValue": "500 ml",
//!       "productImageKey": "AMUL_TAAZA",
//!       "imgCode": "1",
//!       "articleNumber": "8901262010016"
//!     }]
//!   }]
//! }
//! ```
//!
//! `buyable` arrives as the string `"true"`; `invType` is `"OOS"` when the
//! SKU is out of stock at the store. Prices are decimal strings. Some SKUs
//! carry `imageKey` instead of `productImageKey`.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use pincart_core::{BackendName, BackendSettings, CanonicalProduct};
use reqwest::{Client, Url};
use serde_json::Value;

use crate::backend::{ProductBackend, SearchContext};
use crate::client::{build_client, fetch_json};
use crate::error::{BackendError, RecordError};
use crate::location::LocationLookup;
use crate::parse_helpers::{flag, required_price_field, str_field, string_like};

pub const SITE_URL: &str = "https://www.dmart.in";
const IMAGE_BASE: &str = "https://cdn.dmart.in/images/products/";
const OUT_OF_STOCK: &str = "OOS";

pub struct DmartBackend {
    client: Client,
    base_url: String,
    stores: Arc<dyn LocationLookup>,
    timeout: Duration,
}

impl DmartBackend {
    /// # Errors
    ///
    /// Returns [`BackendError::Http`] if the HTTP client cannot be built.
    pub fn new(
        settings: &BackendSettings,
        user_agent: &str,
        stores: Arc<dyn LocationLookup>,
    ) -> Result<Self, BackendError> {
        Ok(Self {
            client: build_client(settings.timeout_secs, user_agent)?,
            base_url: settings.base_url.trim_end_matches('/').to_owned(),
            stores,
            timeout: Duration::from_secs(settings.timeout_secs),
        })
    }

    /// Builds the search URL with `query` percent-encoded as one path segment.
    fn search_url(&self, query: &str, store_id: &str) -> Result<Url, BackendError> {
        let base = format!("{}/api/v3/search", self.base_url);
        let invalid = |reason: String| BackendError::InvalidUrl {
            url: base.clone(),
            reason,
        };

        let mut url = Url::parse(&base).map_err(|e| invalid(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|()| invalid("URL cannot be a base".to_string()))?
            .push(query);
        url.query_pairs_mut().append_pair("storeId", store_id);
        Ok(url)
    }
}

#[async_trait]
impl ProductBackend for DmartBackend {
    fn name(&self) -> BackendName {
        BackendName::Dmart
    }

    fn call_budget(&self) -> Duration {
        self.timeout
    }

    async fn fetch(&self, ctx: &SearchContext) -> Result<Vec<CanonicalProduct>, BackendError> {
        let Some(store_id) = self.stores.lookup(ctx.pincode()) else {
            return Err(BackendError::LocationUnmapped {
                backend: BackendName::Dmart,
                pincode: ctx.pincode().to_owned(),
            });
        };

        let url = self.search_url(ctx.query(), &store_id)?;
        tracing::debug!(%url, store_id = %store_id, "calling DMart search");

        let request = self
            .client
            .get(url.clone())
            .header(reqwest::header::ORIGIN, SITE_URL)
            .header(reqwest::header::REFERER, format!("{SITE_URL}/"));
        let body = fetch_json(request, url.as_str(), "DMart search").await?;

        normalize_search_response(&body)
    }
}

/// Flattens a search response into one product per eligible SKU, in
/// response order.
///
/// A missing `products` key is an empty result.
///
/// # Errors
///
/// Returns [`BackendError::UnexpectedShape`] if the body is not an object
/// or `products` is not an array.
pub fn normalize_search_response(body: &Value) -> Result<Vec<CanonicalProduct>, BackendError> {
    let shape_error = |reason: &str| BackendError::UnexpectedShape {
        context: "DMart search".to_string(),
        reason: reason.to_string(),
    };

    if !body.is_object() {
        return Err(shape_error("response is not a JSON object"));
    }
    let parents = match body.get("products") {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Array(parents)) => parents,
        Some(_) => return Err(shape_error("`products` is not an array")),
    };

    let mut products = Vec::new();
    for parent in parents {
        let parent_name = str_field(parent, "name");
        let deeplink = str_field(parent, "targetUrl")
            .map(|path| join_site(SITE_URL, path))
            .unwrap_or_default();

        let skus = parent
            .get("sKUs")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default();

        for sku in skus {
            match normalize_sku(parent_name, &deeplink, sku) {
                Ok(Some(product)) => products.push(product),
                Ok(None) => {}
                Err(e) => tracing::debug!(error = %e, "skipping DMart SKU"),
            }
        }
    }

    Ok(products)
}

/// Normalizes one SKU under its parent.
///
/// `Ok(None)` means the SKU is ineligible (not buyable, out of stock, or
/// parent unnamed). `Err` means a price could not be read.
fn normalize_sku(
    parent_name: Option<&str>,
    deeplink: &str,
    sku: &Value,
) -> Result<Option<CanonicalProduct>, RecordError> {
    if !flag(sku.get("buyable")) || str_field(sku, "invType") == Some(OUT_OF_STOCK) {
        return Ok(None);
    }
    let Some(name) = parent_name else {
        return Ok(None);
    };

    let record = sku
        .get("skuUniqueID")
        .and_then(string_like)
        .map_or_else(|| format!("sku of {name}"), |id| format!("sku {id}"));

    let mrp = required_price_field(sku, "priceMRP", &record)?;
    let selling_price = required_price_field(sku, "priceSALE", &record)?;

    Ok(Some(CanonicalProduct {
        name: name.to_owned(),
        mrp: Some(mrp),
        selling_price: Some(selling_price),
        image: image_url(sku),
        variant: str_field(sku, "variantTextValue").map(str::to_owned),
        barcode: sku
            .get("articleNumber")
            .and_then(string_like)
            .unwrap_or_default(),
        deeplink: deeplink.to_owned(),
    }))
}

/// `{IMAGE_BASE}{key}_{imgCode}_P.jpg`, where `key` is `productImageKey`
/// or, failing that, `imageKey`.
fn image_url(sku: &Value) -> Option<String> {
    let img_code = sku.get("imgCode").and_then(string_like)?;
    let key = str_field(sku, "productImageKey").or_else(|| str_field(sku, "imageKey"))?;
    Some(format!("{IMAGE_BASE}{key}_{img_code}_P.jpg"))
}

pub(crate) fn join_site(site: &str, path: &str) -> String {
    if path.starts_with('/') {
        format!("{site}{path}")
    } else {
        format!("{site}/{path}")
    }
}

#[cfg(test)]
#[path = "dmart_test.rs"]
mod tests;
