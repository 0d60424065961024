//! The adapter contract every product-search backend implements.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use pincart_core::{BackendName, CanonicalProduct, SearchRequest};
use serde_json::Value;
use tokio::sync::OnceCell;

use crate::error::BackendError;

/// Outcome of one shared upstream call, keyed by the location token it was
/// made with.
pub(crate) type SharedFeed = (String, Result<Arc<Value>, Arc<BackendError>>);

/// Per-request state handed to every backend task.
///
/// Read-only apart from the proxy feed cell, which the first 9minutes-backed
/// adapter fills and the others reuse.
#[derive(Debug)]
pub struct SearchContext {
    request: SearchRequest,
    request_id: String,
    proxy_feed: OnceCell<SharedFeed>,
}

impl SearchContext {
    #[must_use]
    pub fn new(request: SearchRequest, request_id: impl Into<String>) -> Self {
        Self {
            request,
            request_id: request_id.into(),
            proxy_feed: OnceCell::new(),
        }
    }

    #[must_use]
    pub fn query(&self) -> &str {
        self.request.query()
    }

    #[must_use]
    pub fn pincode(&self) -> &str {
        self.request.pincode()
    }

    #[must_use]
    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    pub(crate) fn proxy_feed(&self) -> &OnceCell<SharedFeed> {
        &self.proxy_feed
    }
}

/// Products from one backend for one search, plus the reason it came back
/// empty if it failed.
#[derive(Debug)]
pub struct BackendResult {
    pub backend: BackendName,
    pub products: Vec<CanonicalProduct>,
    pub error: Option<BackendError>,
}

impl BackendResult {
    #[must_use]
    pub fn ok(backend: BackendName, products: Vec<CanonicalProduct>) -> Self {
        Self {
            backend,
            products,
            error: None,
        }
    }

    #[must_use]
    pub fn failed(backend: BackendName, error: BackendError) -> Self {
        Self {
            backend,
            products: Vec::new(),
            error: Some(error),
        }
    }
}

/// One product-search backend.
#[async_trait]
pub trait ProductBackend: Send + Sync {
    fn name(&self) -> BackendName;

    /// Longest this backend may run for one search, covering every outbound
    /// call it makes. The orchestrator abandons the task after this.
    fn call_budget(&self) -> Duration;

    /// Runs the search and normalizes the hits.
    ///
    /// # Errors
    ///
    /// Any [`BackendError`]; callers should prefer [`ProductBackend::search`].
    async fn fetch(&self, ctx: &SearchContext) -> Result<Vec<CanonicalProduct>, BackendError>;

    /// Runs [`ProductBackend::fetch`] and folds any failure into an empty
    /// result. Never fails.
    async fn search(&self, ctx: &SearchContext) -> BackendResult {
        let backend = self.name();
        match self.fetch(ctx).await {
            Ok(products) => {
                tracing::info!(%backend, count = products.len(), "backend search completed");
                BackendResult::ok(backend, products)
            }
            Err(error) => {
                log_failure(backend, &error);
                BackendResult::failed(backend, error)
            }
        }
    }
}

pub(crate) fn log_failure(backend: BackendName, error: &BackendError) {
    if error.is_location_miss() {
        tracing::warn!(%backend, error = %error, "no location mapping; skipping backend");
    } else {
        tracing::error!(%backend, error = %error, "backend search failed");
    }
}
