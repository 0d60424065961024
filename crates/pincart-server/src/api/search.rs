use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Extension, Json,
};
use pincart_core::SearchRequest;
use pincart_scraper::AggregateResult;
use tracing::Instrument;

use crate::middleware::RequestId;

use super::{ApiError, AppState};

/// Raw `query` and `pincode` parameters. A repeated parameter keeps its
/// first value.
#[derive(Debug, Default, PartialEq, Eq)]
pub(super) struct SearchQuery {
    pub query: Option<String>,
    pub pincode: Option<String>,
}

impl SearchQuery {
    pub(super) fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut params = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "query" => &mut params.query,
                "pincode" => &mut params.pincode,
                _ => continue,
            };
            slot.get_or_insert(value);
        }
        params
    }
}

/// `GET /search_all?query=..&pincode=..`
///
/// Validation is the only failure a caller can see; backend outages show up
/// as empty lists.
pub(super) async fn search_all(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    pairs: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<Json<AggregateResult>, ApiError> {
    let Query(pairs) = pairs.map_err(|rejection| {
        tracing::info!(request_id = %req_id.0, error = %rejection, "unparsable query string");
        ApiError::bad_request(rejection.body_text())
    })?;
    let params = SearchQuery::from_pairs(pairs);

    let request = SearchRequest::new(params.query.as_deref(), params.pincode.as_deref())
        .map_err(|e| {
            tracing::info!(request_id = %req_id.0, error = %e, "rejected search request");
            ApiError::bad_request(e)
        })?;

    let span = tracing::info_span!(
        "search_all",
        request_id = %req_id.0,
        pincode = %request.pincode(),
        query = %request.query()
    );
    let result = state
        .aggregator
        .search(request, &req_id.0)
        .instrument(span)
        .await;

    Ok(Json(result))
}
