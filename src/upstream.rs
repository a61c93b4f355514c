//! Shared plumbing for the outbound HTTP clients.

use crate::server::metrics::record_upstream_error;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

pub const USER_AGENT: &str = concat!("toronto-artists-server/", env!("CARGO_PKG_VERSION"));

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Error returned by any third-party API call.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("{service} responded with status {status}: {message}")]
    Status {
        service: &'static str,
        status: u16,
        message: String,
    },

    #[error("not found: {0}")]
    NotFound(String),

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("request timed out")]
    Timeout,
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            FetchError::Timeout
        } else if e.is_decode() {
            FetchError::InvalidResponse(e.to_string())
        } else {
            FetchError::Connection(e.to_string())
        }
    }
}

pub fn build_http_client() -> Result<reqwest::Client, FetchError> {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(REQUEST_TIMEOUT)
        .build()
        .map_err(FetchError::from)
}

/// Sends `request` and turns transport failures and non-2xx statuses into
/// a `FetchError`, counting both against `service`.
pub async fn send(
    service: &'static str,
    request: reqwest::RequestBuilder,
) -> Result<reqwest::Response, FetchError> {
    let response = match request.send().await {
        Ok(response) => response,
        Err(e) => {
            warn!(service, error = %e, "Upstream request failed");
            record_upstream_error(service);
            return Err(e.into());
        }
    };

    let status = response.status();
    debug!(service, status = status.as_u16(), url = %response.url(), "Upstream response");
    if status.is_success() {
        return Ok(response);
    }

    record_upstream_error(service);
    let message = response.text().await.unwrap_or_default();
    Err(FetchError::Status {
        service,
        status: status.as_u16(),
        message,
    })
}
