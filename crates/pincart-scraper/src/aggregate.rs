//! Concurrent fan-out of one search across every configured backend.

use std::sync::Arc;
use std::time::{Duration, Instant};

use pincart_core::{AppConfig, BackendName, CanonicalProduct, LocationTables, SearchRequest};
use serde::ser::{Serialize, SerializeMap, Serializer};
use tokio::task::JoinSet;
use tracing::Instrument;

use crate::backend::{log_failure, BackendResult, ProductBackend, SearchContext};
use crate::dmart::DmartBackend;
use crate::error::BackendError;
use crate::jiomart::JiomartBackend;
use crate::location::{LocationLookup, PassthroughToken, StoreTable};
use crate::nine_minutes::NineMinutesBackend;

/// Slack past a backend's own budget so its client timeout fires first and
/// the recorded error says what actually happened.
const BUDGET_GRACE: Duration = Duration::from_millis(500);

/// Runs every backend once per search and collects whatever comes back.
pub struct Aggregator {
    backends: Vec<Arc<dyn ProductBackend>>,
    deadline: Option<Duration>,
}

impl Aggregator {
    /// `backends` order is the key order of every [`AggregateResult`].
    #[must_use]
    pub fn new(backends: Vec<Arc<dyn ProductBackend>>, deadline: Option<Duration>) -> Self {
        Self { backends, deadline }
    }

    /// Wires up all five backends from configuration, in response-key order.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Http`] if an HTTP client cannot be built.
    pub fn from_config(config: &AppConfig, tables: &LocationTables) -> Result<Self, BackendError> {
        let areas: Arc<dyn LocationLookup> =
            Arc::new(PassthroughToken::new(tables.nine_minutes.clone()));
        let stores: Arc<dyn LocationLookup> = Arc::new(StoreTable::new(tables.dmart.clone()));

        let mut backends: Vec<Arc<dyn ProductBackend>> =
            NineMinutesBackend::storefronts(&config.nine_minutes, &config.user_agent, &areas)?
                .into_iter()
                .map(|backend| Arc::new(backend) as Arc<dyn ProductBackend>)
                .collect();
        backends.push(Arc::new(DmartBackend::new(
            &config.dmart,
            &config.user_agent,
            stores,
        )?));
        backends.push(Arc::new(JiomartBackend::new(
            &config.jiomart,
            &config.user_agent,
        )?));

        Ok(Self::new(
            backends,
            config.request_deadline_secs.map(Duration::from_secs),
        ))
    }

    #[must_use]
    pub fn backend_names(&self) -> Vec<BackendName> {
        self.backends.iter().map(|b| b.name()).collect()
    }

    /// Searches every backend concurrently.
    ///
    /// Never fails: a backend that errors, panics, overruns its budget or is
    /// still running at the request deadline contributes an empty list.
    pub async fn search(&self, request: SearchRequest, request_id: &str) -> AggregateResult {
        let started = Instant::now();
        let ctx = Arc::new(SearchContext::new(request, request_id));

        let mut set = JoinSet::new();
        for (slot, backend) in self.backends.iter().enumerate() {
            let backend = Arc::clone(backend);
            let ctx = Arc::clone(&ctx);
            let name = backend.name();
            let budget = backend.call_budget() + BUDGET_GRACE;
            let span = tracing::info_span!(
                "backend_search",
                backend = %name,
                request_id = %ctx.request_id()
            );

            set.spawn(
                async move {
                    let result = match tokio::time::timeout(budget, backend.search(&ctx)).await {
                        Ok(result) => result,
                        Err(_) => {
                            let error = BackendError::TimedOut {
                                after_secs: budget.as_secs(),
                            };
                            log_failure(name, &error);
                            BackendResult::failed(name, error)
                        }
                    };
                    (slot, result)
                }
                .instrument(span),
            );
        }

        let mut slots: Vec<Option<BackendResult>> = self.backends.iter().map(|_| None).collect();
        let mut deadline_hit = false;
        match self.deadline {
            Some(deadline) => {
                if tokio::time::timeout(deadline, drain(&mut set, &mut slots))
                    .await
                    .is_err()
                {
                    deadline_hit = true;
                    tracing::warn!(
                        request_id,
                        deadline_secs = deadline.as_secs(),
                        pending = set.len(),
                        "request deadline reached; aborting remaining backends"
                    );
                    set.abort_all();
                }
            }
            None => drain(&mut set, &mut slots).await,
        }

        let results: Vec<BackendResult> = slots
            .into_iter()
            .zip(&self.backends)
            .map(|(slot, backend)| {
                slot.unwrap_or_else(|| {
                    let error = if deadline_hit {
                        BackendError::Aborted
                    } else {
                        BackendError::Panicked
                    };
                    BackendResult::failed(backend.name(), error)
                })
            })
            .collect();

        let aggregate = AggregateResult { results };
        tracing::info!(
            request_id,
            products = aggregate.total_products(),
            failed = aggregate.failures().count(),
            elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            "aggregate search completed"
        );
        aggregate
    }
}

async fn drain(
    set: &mut JoinSet<(usize, BackendResult)>,
    slots: &mut [Option<BackendResult>],
) {
    while let Some(joined) = set.join_next().await {
        match joined {
            Ok((slot, result)) => slots[slot] = Some(result),
            Err(e) if e.is_panic() => tracing::error!(error = %e, "backend task panicked"),
            Err(e) => tracing::warn!(error = %e, "backend task cancelled"),
        }
    }
}

/// One entry per configured backend, in configuration order.
///
/// Serializes as `{"<backend>_products": [...], ...}` with every backend
/// present, failed ones as `[]`.
#[derive(Debug)]
pub struct AggregateResult {
    results: Vec<BackendResult>,
}

impl AggregateResult {
    #[must_use]
    pub fn results(&self) -> &[BackendResult] {
        &self.results
    }

    /// Products from `backend`; empty if it failed or is not configured.
    #[must_use]
    pub fn products(&self, backend: BackendName) -> &[CanonicalProduct] {
        self.results
            .iter()
            .find(|r| r.backend == backend)
            .map(|r| r.products.as_slice())
            .unwrap_or_default()
    }

    pub fn failures(&self) -> impl Iterator<Item = (BackendName, &BackendError)> {
        self.results
            .iter()
            .filter_map(|r| r.error.as_ref().map(|e| (r.backend, e)))
    }

    #[must_use]
    pub fn total_products(&self) -> usize {
        self.results.iter().map(|r| r.products.len()).sum()
    }
}

impl Serialize for AggregateResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.results.len()))?;
        for result in &self.results {
            map.serialize_entry(result.backend.response_key(), &result.products)?;
        }
        map.end()
    }
}

#[cfg(test)]
#[path = "aggregate_test.rs"]
mod tests;
