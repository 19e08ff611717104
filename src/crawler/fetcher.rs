//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the harvester, including:
//! - Building the HTTP client with fixed browser-like headers and timeouts
//! - Consulting the robots policy before each request
//! - Sleeping a randomized delay before each request
//! - Classifying failures (denied, HTTP status, transport)
//!
//! Failures never propagate: `fetch` logs them and returns `None`, which
//! callers treat as the end of the current traversal branch. There is no retry.

use crate::config::{FetcherConfig, HeadersConfig};
use crate::crawler::delay::RandomDelay;
use crate::robots::PolicyGate;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, USER_AGENT};
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Why a fetch produced no content
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Not allowed to fetch: {url}")]
    PolicyDenied { url: String },

    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Error fetching {url}: {source}")]
    Transport { url: String, source: reqwest::Error },
}

/// Counters kept by the fetcher for the run summary
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FetchStats {
    pub pages_fetched: usize,
    pub pages_denied: usize,
    pub fetch_failures: usize,
}

/// Builds an HTTP client with the fixed header set and explicit timeouts
///
/// # Example
///
/// ```no_run
/// use catalog_harvest::config::{FetcherConfig, HeadersConfig};
/// use catalog_harvest::crawler::build_http_client;
///
/// let client = build_http_client(&HeadersConfig::default(), &FetcherConfig::default()).unwrap();
/// ```
pub fn build_http_client(
    headers: &HeadersConfig,
    fetcher: &FetcherConfig,
) -> Result<Client, crate::HarvestError> {
    let mut default_headers = HeaderMap::new();
    default_headers.insert(
        USER_AGENT,
        header_value("user-agent", &headers.user_agent)?,
    );
    default_headers.insert(ACCEPT, header_value("accept", &headers.accept)?);
    default_headers.insert(
        ACCEPT_LANGUAGE,
        header_value("accept-language", &headers.accept_language)?,
    );

    let client = Client::builder()
        .default_headers(default_headers)
        .timeout(Duration::from_secs(fetcher.timeout_secs))
        .connect_timeout(Duration::from_secs(fetcher.connect_timeout_secs))
        .gzip(true)
        .brotli(true)
        .build()?;

    Ok(client)
}

fn header_value(name: &str, value: &str) -> Result<HeaderValue, crate::ConfigError> {
    HeaderValue::from_str(value).map_err(|e| {
        crate::ConfigError::Validation(format!("{} is not a valid header value: {}", name, e))
    })
}

/// Rate-limited, policy-aware page retrieval
pub struct Fetcher {
    client: Client,
    gate: PolicyGate,
    delay: RandomDelay,
    stats: FetchStats,
}

impl Fetcher {
    pub fn new(client: Client, gate: PolicyGate, delay: RandomDelay) -> Self {
        Self {
            client,
            gate,
            delay,
            stats: FetchStats::default(),
        }
    }

    /// Fetches the HTML body of `url`
    ///
    /// Returns `None` when the policy denies the URL, the transport fails or
    /// the server answers with a non-success status. Each case is logged.
    pub async fn fetch(&mut self, url: &Url) -> Option<String> {
        match self.try_fetch(url).await {
            Ok(body) => {
                self.stats.pages_fetched += 1;
                Some(body)
            }
            Err(e @ FetchError::PolicyDenied { .. }) => {
                self.stats.pages_denied += 1;
                tracing::warn!("{}", e);
                None
            }
            Err(e) => {
                self.stats.fetch_failures += 1;
                tracing::warn!("{}", e);
                None
            }
        }
    }

    /// Single attempt: policy check, politeness delay, GET
    pub async fn try_fetch(&self, url: &Url) -> Result<String, FetchError> {
        if !self.gate.allowed(url) {
            return Err(FetchError::PolicyDenied {
                url: url.to_string(),
            });
        }

        self.delay.wait().await;

        let transport = |source| FetchError::Transport {
            url: url.to_string(),
            source,
        };

        let response = self.client.get(url.clone()).send().await.map_err(transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(transport)
    }

    pub fn stats(&self) -> FetchStats {
        self.stats
    }
}
