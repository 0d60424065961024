//! Instamart, Zepto and Blinkit through the 9minutes aggregator.
//!
//! One upstream call returns all three storefronts at once:
//!
//! ```json
//! {
//!   "instamart_products": [{ "name": "...", "mrp": 30, "selling_price": "28", ... }],
//!   "zepto_products":     [...],
//!   "blinkit_products":   [...]
//! }
//! ```
//!
//! Items already use the canonical field names but not the canonical types:
//! prices may be strings and barcodes may be numbers.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use pincart_core::{BackendName, BackendSettings, CanonicalProduct};
use reqwest::Client;
use serde_json::Value;

use crate::backend::{ProductBackend, SearchContext};
use crate::client::{build_client, fetch_json};
use crate::error::{BackendError, RecordError};
use crate::location::LocationLookup;
use crate::parse_helpers::{price_field, str_field, string_like};

const REFERER: &str = "https://9minutes.in/";

/// One storefront served by the 9minutes proxy.
///
/// Several of these share the upstream response for a search through the
/// [`SearchContext`] feed cell, so only the first to run pays for the call.
pub struct NineMinutesBackend {
    name: BackendName,
    client: Client,
    base_url: String,
    areas: Arc<dyn LocationLookup>,
    timeout: Duration,
}

impl NineMinutesBackend {
    /// # Errors
    ///
    /// Returns [`BackendError::Http`] if the HTTP client cannot be built.
    pub fn new(
        name: BackendName,
        settings: &BackendSettings,
        user_agent: &str,
        areas: Arc<dyn LocationLookup>,
    ) -> Result<Self, BackendError> {
        Ok(Self {
            name,
            client: build_client(settings.timeout_secs, user_agent)?,
            base_url: settings.base_url.trim_end_matches('/').to_owned(),
            areas,
            timeout: Duration::from_secs(settings.timeout_secs),
        })
    }

    /// Builds one adapter per proxied storefront over a shared client.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Http`] if the HTTP client cannot be built.
    pub fn storefronts(
        settings: &BackendSettings,
        user_agent: &str,
        areas: &Arc<dyn LocationLookup>,
    ) -> Result<Vec<Self>, BackendError> {
        let client = build_client(settings.timeout_secs, user_agent)?;
        Ok([BackendName::Instamart, BackendName::Zepto, BackendName::Blinkit]
            .into_iter()
            .map(|name| Self {
                name,
                client: client.clone(),
                base_url: settings.base_url.trim_end_matches('/').to_owned(),
                areas: Arc::clone(areas),
                timeout: Duration::from_secs(settings.timeout_secs),
            })
            .collect())
    }

    async fn call(&self, query: &str, location: &str) -> Result<Value, BackendError> {
        let url = format!("{}/api/fetch_products", self.base_url);
        tracing::debug!(%url, %location, "calling 9minutes");

        let request = self
            .client
            .get(&url)
            .query(&[("query", query), ("location", location)])
            .header(reqwest::header::ACCEPT, "*/*")
            .header(reqwest::header::REFERER, REFERER);
        fetch_json(request, &url, "9minutes products").await
    }

    /// Returns the proxy response for `location`, reusing the one already
    /// fetched for this search when it was made with the same token.
    async fn feed(&self, ctx: &SearchContext, location: &str) -> Result<Arc<Value>, BackendError> {
        let (shared_token, shared) = ctx
            .proxy_feed()
            .get_or_init(|| async {
                let outcome = self
                    .call(ctx.query(), location)
                    .await
                    .map(Arc::new)
                    .map_err(Arc::new);
                (location.to_owned(), outcome)
            })
            .await;

        if shared_token == location {
            return shared.clone().map_err(BackendError::SharedCall);
        }
        self.call(ctx.query(), location).await.map(Arc::new)
    }
}

#[async_trait]
impl ProductBackend for NineMinutesBackend {
    fn name(&self) -> BackendName {
        self.name
    }

    fn call_budget(&self) -> Duration {
        self.timeout
    }

    async fn fetch(&self, ctx: &SearchContext) -> Result<Vec<CanonicalProduct>, BackendError> {
        let Some(location) = self.areas.lookup(ctx.pincode()) else {
            return Err(BackendError::LocationUnmapped {
                backend: self.name,
                pincode: ctx.pincode().to_owned(),
            });
        };

        let body = self.feed(ctx, &location).await?;
        Ok(select_storefront(&body, self.name))
    }
}

/// Products under `"{backend}_products"`, re-coerced to the canonical types.
/// A missing or non-array key yields nothing.
#[must_use]
pub fn select_storefront(body: &Value, backend: BackendName) -> Vec<CanonicalProduct> {
    let Some(items) = body.get(backend.response_key()).and_then(Value::as_array) else {
        return Vec::new();
    };

    items
        .iter()
        .enumerate()
        .filter_map(|(index, item)| match normalize_item(item, index) {
            Ok(product) => product,
            Err(e) => {
                tracing::debug!(%backend, error = %e, "skipping proxied item");
                None
            }
        })
        .collect()
}

/// `Ok(None)` for an unnamed item; `Err` when a price is present but unusable.
fn normalize_item(item: &Value, index: usize) -> Result<Option<CanonicalProduct>, RecordError> {
    let Some(name) = str_field(item, "name") else {
        return Ok(None);
    };
    let record = format!("#{index} ({name})");

    Ok(Some(CanonicalProduct {
        name: name.to_owned(),
        mrp: price_field(item, "mrp", &record)?,
        selling_price: price_field(item, "selling_price", &record)?,
        image: str_field(item, "image").map(str::to_owned),
        variant: str_field(item, "variant").map(str::to_owned),
        barcode: item.get("barcode").and_then(string_like).unwrap_or_default(),
        deeplink: str_field(item, "deeplink").map(str::to_owned).unwrap_or_default(),
    }))
}
