use std::sync::Arc;

use pincart_core::BackendName;
use thiserror::Error;

/// Why a backend contributed nothing to an aggregate search.
///
/// Every variant is local to one backend: the orchestrator logs it, records
/// it on the [`crate::BackendResult`], and reports an empty product list.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("unexpected response shape for {context}: {reason}")]
    UnexpectedShape { context: String, reason: String },

    #[error("no {backend} location mapping for pincode {pincode}")]
    LocationUnmapped {
        backend: BackendName,
        pincode: String,
    },

    #[error("pincode {pincode} is not serviceable (HTTP {status})")]
    NotServiceable { pincode: String, status: u16 },

    #[error("malformed location codes for pincode {pincode}: {reason}")]
    MalformedLocationCodes { pincode: String, reason: String },

    #[error("location codes for pincode {pincode} are incomplete: {reason}")]
    IncompleteLocationCodes { pincode: String, reason: String },

    #[error("invalid request URL \"{url}\": {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("shared upstream call failed: {0}")]
    SharedCall(Arc<BackendError>),

    #[error("timed out after {after_secs}s")]
    TimedOut { after_secs: u64 },

    #[error("aborted at the request deadline")]
    Aborted,

    #[error("backend task panicked")]
    Panicked,
}

impl BackendError {
    /// `true` for a plain "nothing to search here" outcome, as opposed to a
    /// backend fault. Used to pick the log level.
    #[must_use]
    pub fn is_location_miss(&self) -> bool {
        matches!(
            self,
            BackendError::LocationUnmapped { .. } | BackendError::NotServiceable { .. }
        )
    }
}

/// A single upstream record that could not be normalized. The record is
/// skipped; its siblings are unaffected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("record {record}: field `{field}` {reason}")]
pub struct RecordError {
    pub record: String,
    pub field: &'static str,
    pub reason: String,
}

impl RecordError {
    pub(crate) fn new(record: impl Into<String>, field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            record: record.into(),
            field,
            reason: reason.into(),
        }
    }
}
