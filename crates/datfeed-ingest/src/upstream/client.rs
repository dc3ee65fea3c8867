//! HTTP client for the upstream sales ledger
//!
//! Thin wrapper around `reqwest` that applies the read/write timeouts and
//! turns every transport or status failure into an [`UpstreamError`].
//! There are no retries.

use reqwest::{Client, StatusCode, Url};
use serde::{de::DeserializeOwned, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use datfeed_common::{DatfeedError, Result};

// ============================================================================
// Ledger Client Constants
// ============================================================================

/// Default timeout for GET requests in seconds
pub const DEFAULT_READ_TIMEOUT_SECS: u64 = 10;

/// Default timeout for POST requests in seconds
pub const DEFAULT_WRITE_TIMEOUT_SECS: u64 = 30;

pub const SALES_PATH: &str = "/vendas";
pub const SALES_PAGED_PATH: &str = "/vendas/paginado";
pub const SALES_SEARCH_PATH: &str = "/vendas/buscar";
pub const PRODUCTS_PATH: &str = "/produtos";
pub const CLIENTS_PATH: &str = "/clientes";

/// Upstream bodies echoed into errors are cut to this many characters
const MAX_ERROR_BODY_CHARS: usize = 512;

// ============================================================================
// Errors
// ============================================================================

/// Failure talking to the upstream ledger
#[derive(Error, Debug)]
pub enum UpstreamError {
    #[error("upstream request to {url} timed out")]
    Timeout { url: String },

    #[error("could not connect to upstream at {url}: {message}")]
    Connect { url: String, message: String },

    #[error("upstream returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("could not decode upstream response: {0}")]
    Decode(String),

    #[error("upstream request failed: {0}")]
    Request(String),
}

impl UpstreamError {
    /// HTTP status reported by the upstream, if it answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            UpstreamError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    fn from_reqwest(err: reqwest::Error, url: &str) -> Self {
        if err.is_timeout() {
            UpstreamError::Timeout {
                url: url.to_string(),
            }
        } else if err.is_connect() {
            UpstreamError::Connect {
                url: url.to_string(),
                message: err.to_string(),
            }
        } else if err.is_decode() {
            UpstreamError::Decode(err.to_string())
        } else {
            UpstreamError::Request(err.to_string())
        }
    }
}

// ============================================================================
// Configuration
// ============================================================================

/// Connection settings for [`LedgerClient`]
#[derive(Debug, Clone)]
pub struct LedgerConfig {
    pub base_url: String,
    pub read_timeout: Duration,
    pub write_timeout: Duration,
}

impl LedgerConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            read_timeout: Duration::from_secs(DEFAULT_READ_TIMEOUT_SECS),
            write_timeout: Duration::from_secs(DEFAULT_WRITE_TIMEOUT_SECS),
        }
    }

    pub fn with_read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }

    pub fn with_write_timeout(mut self, timeout: Duration) -> Self {
        self.write_timeout = timeout;
        self
    }
}

/// Check that `url` is an absolute http(s) URL and return it without a
/// trailing slash
pub fn validate_base_url(url: &str) -> Result<String> {
    let trimmed = url.trim();
    if trimmed.is_empty() {
        return Err(DatfeedError::invalid_url(url, "URL is empty"));
    }

    let parsed = Url::parse(trimmed).map_err(|e| DatfeedError::invalid_url(trimmed, e.to_string()))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(DatfeedError::invalid_url(
            trimmed,
            format!("unsupported scheme '{}', expected http or https", parsed.scheme()),
        ));
    }

    Ok(trimmed.trim_end_matches('/').to_string())
}

// ============================================================================
// Client
// ============================================================================

/// Client for the upstream sales ledger
///
/// Cheap to clone; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct LedgerClient {
    client: Client,
    base_url: String,
    read_timeout: Duration,
    write_timeout: Duration,
}

impl LedgerClient {
    pub fn new(config: LedgerConfig) -> Result<Self> {
        let base_url = validate_base_url(&config.base_url)?;

        let client = Client::builder()
            .user_agent(concat!("datfeed/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| DatfeedError::HttpClient(e.to_string()))?;

        Ok(Self {
            client,
            base_url,
            read_timeout: config.read_timeout,
            write_timeout: config.write_timeout,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// GET `path` with query parameters and decode the JSON body
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> std::result::Result<T, UpstreamError> {
        let url = self.url(path);
        debug!(%url, ?query, "GET upstream");

        let response = self
            .client
            .get(&url)
            .query(query)
            .timeout(self.read_timeout)
            .send()
            .await
            .map_err(|e| UpstreamError::from_reqwest(e, &url))?;

        let body = read_success_body(response, &url).await?;
        serde_json::from_str(&body).map_err(|e| UpstreamError::Decode(e.to_string()))
    }

    /// POST a JSON body to `path`; any 2xx status is success
    pub async fn post_json<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> std::result::Result<(), UpstreamError> {
        let url = self.url(path);
        debug!(%url, "POST upstream");

        let response = self
            .client
            .post(&url)
            .json(body)
            .timeout(self.write_timeout)
            .send()
            .await
            .map_err(|e| UpstreamError::from_reqwest(e, &url))?;

        read_success_body(response, &url).await.map(|_| ())
    }
}

async fn read_success_body(
    response: reqwest::Response,
    url: &str,
) -> std::result::Result<String, UpstreamError> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| UpstreamError::from_reqwest(e, url))?;

    if status.is_success() {
        Ok(body)
    } else {
        Err(status_error(status, &body))
    }
}

fn status_error(status: StatusCode, body: &str) -> UpstreamError {
    let body: String = body.chars().take(MAX_ERROR_BODY_CHARS).collect();
    UpstreamError::Status {
        status: status.as_u16(),
        body,
    }
}
