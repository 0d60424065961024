//! JioMart search through its hosted search index.
//!
//! Two calls per search: the storefront maps the pincode to inventory codes,
//! then the index is queried with filters built from those codes.

mod fields;
mod response;

use std::time::Duration;

use async_trait::async_trait;
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use pincart_core::{BackendName, CanonicalProduct, JiomartSettings};
use reqwest::Client;
use serde_json::{json, Value};

pub use fields::IndexFieldMap;
pub use response::normalize_query_response;

use crate::backend::{ProductBackend, SearchContext};
use crate::client::{build_client, fetch_json};
use crate::error::BackendError;
use crate::filter::build_search_filters;
use crate::location::{InventoryCodeResolver, InventoryCodes};
use response::SITE_URL;

pub struct JiomartBackend {
    client: Client,
    resolver: InventoryCodeResolver,
    search_base_url: String,
    app_id: String,
    api_key: String,
    index_name: String,
    hits_per_page: u32,
    fields: &'static IndexFieldMap,
    timeout: Duration,
}

impl JiomartBackend {
    /// # Errors
    ///
    /// Returns [`BackendError::Http`] if the HTTP client cannot be built.
    pub fn new(settings: &JiomartSettings, user_agent: &str) -> Result<Self, BackendError> {
        let client = build_client(settings.timeout_secs, user_agent)?;
        Ok(Self {
            resolver: InventoryCodeResolver::new(client.clone(), &settings.mapping_base_url),
            client,
            search_base_url: settings.search_base_url.trim_end_matches('/').to_owned(),
            app_id: settings.app_id.clone(),
            api_key: settings.api_key.clone(),
            index_name: settings.index_name.clone(),
            hits_per_page: settings.hits_per_page.clamp(1, 100),
            fields: IndexFieldMap::for_revision(settings.revision),
            timeout: Duration::from_secs(settings.timeout_secs),
        })
    }

    #[must_use]
    pub fn field_map(&self) -> &'static IndexFieldMap {
        self.fields
    }

    /// Builds the multi-query body for one search.
    fn query_body(&self, query: &str, pincode: &str, filters: &str) -> Value {
        let analytics_tags = json!(["web", pincode, "Query Search"]).to_string();
        let user_token = uuid::Uuid::new_v4().to_string();
        let hits_per_page = self.hits_per_page.to_string();
        let attributes = self.fields.attributes_param();

        let params = encode_params(&[
            ("query", query),
            ("page", "0"),
            ("hitsPerPage", &hits_per_page),
            ("analyticsTags", &analytics_tags),
            ("filters", filters),
            ("attributesToRetrieve", &attributes),
            ("attributesToHighlight", "[]"),
            ("clickAnalytics", "false"),
            ("userToken", &user_token),
        ]);

        json!({
            "requests": [{ "indexName": self.index_name, "params": params }]
        })
    }

    async fn query_index(
        &self,
        ctx: &SearchContext,
        codes: &InventoryCodes,
        filters: &str,
    ) -> Result<Vec<CanonicalProduct>, BackendError> {
        let url = format!("{}/1/indexes/*/queries", self.search_base_url);
        tracing::debug!(
            %url,
            revision = %self.fields.revision,
            stores = codes.store_codes.len(),
            "querying JioMart index"
        );

        let request = self
            .client
            .post(&url)
            .header(reqwest::header::ACCEPT, "application/json")
            .header("x-algolia-application-id", &self.app_id)
            .header("x-algolia-api-key", &self.api_key)
            .header(reqwest::header::ORIGIN, SITE_URL)
            .header(reqwest::header::REFERER, format!("{SITE_URL}/"))
            .json(&self.query_body(ctx.query(), ctx.pincode(), filters));
        let body = fetch_json(request, &url, "JioMart search").await?;

        normalize_query_response(&body, &codes.store_codes, self.fields)
    }
}

#[async_trait]
impl ProductBackend for JiomartBackend {
    fn name(&self) -> BackendName {
        BackendName::Jiomart
    }

    /// Mapping call plus index call, each bounded by the client timeout.
    fn call_budget(&self) -> Duration {
        self.timeout * 2
    }

    async fn fetch(&self, ctx: &SearchContext) -> Result<Vec<CanonicalProduct>, BackendError> {
        let codes = self.resolver.resolve(ctx.pincode()).await?;

        let Some(filters) = build_search_filters(&codes) else {
            let missing = if codes.region_codes.is_empty() {
                "no region codes"
            } else {
                "no store codes"
            };
            return Err(BackendError::IncompleteLocationCodes {
                pincode: ctx.pincode().to_owned(),
                reason: missing.to_string(),
            });
        };

        self.query_index(ctx, &codes, &filters).await
    }
}

/// `key=value&...` with both sides percent-encoded.
fn encode_params(pairs: &[(&str, &str)]) -> String {
    pairs
        .iter()
        .map(|(key, value)| {
            format!(
                "{}={}",
                utf8_percent_encode(key, NON_ALPHANUMERIC),
                utf8_percent_encode(value, NON_ALPHANUMERIC)
            )
        })
        .collect::<Vec<_>>()
        .join("&")
}
