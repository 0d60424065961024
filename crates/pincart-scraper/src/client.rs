//! Shared HTTP plumbing for backend adapters.

use std::time::Duration;

use reqwest::{Client, RequestBuilder};
use serde_json::Value;

use crate::error::BackendError;

/// Maximum number of body bytes quoted in logs for a non-2xx response.
const ERROR_BODY_PREVIEW: usize = 200;

/// Builds the `reqwest::Client` for one backend.
///
/// `timeout_secs` bounds each whole call (connect, send and body read).
/// A call that exceeds it fails with [`BackendError::Http`] and its
/// connection is dropped.
///
/// # Errors
///
/// Returns [`BackendError::Http`] if the underlying client cannot be
/// constructed (e.g., invalid TLS config).
pub fn build_client(timeout_secs: u64, user_agent: &str) -> Result<Client, BackendError> {
    let client = Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .connect_timeout(Duration::from_secs(timeout_secs.min(10)))
        .user_agent(user_agent)
        .build()?;
    Ok(client)
}

/// Sends `request` and decodes the body as JSON.
///
/// # Errors
///
/// - [`BackendError::Http`] on network failure or timeout.
/// - [`BackendError::UnexpectedStatus`] on any non-2xx status.
/// - [`BackendError::Deserialize`] if the body is not valid JSON.
pub(crate) async fn fetch_json(
    request: RequestBuilder,
    url: &str,
    context: &str,
) -> Result<Value, BackendError> {
    let response = request.send().await?;
    let status = response.status();

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        tracing::debug!(
            url,
            status = status.as_u16(),
            body = %preview(&body),
            "non-success response body"
        );
        return Err(BackendError::UnexpectedStatus {
            status: status.as_u16(),
            url: url.to_owned(),
        });
    }

    let body = response.text().await?;
    serde_json::from_str::<Value>(&body).map_err(|e| BackendError::Deserialize {
        context: context.to_owned(),
        source: e,
    })
}

fn preview(body: &str) -> &str {
    let end = (0..=ERROR_BODY_PREVIEW.min(body.len()))
        .rev()
        .find(|&i| body.is_char_boundary(i))
        .unwrap_or(0);
    &body[..end]
}
