//! Robots.txt handling module
//!
//! This module loads the site's robots.txt once at startup and answers
//! permission checks for the wildcard user agent for the rest of the run.

mod parser;

pub use parser::ParsedRobots;

use crate::HarvestError;
use reqwest::{Client, StatusCode};
use url::Url;

/// User agent token the policy is evaluated against
pub const WILDCARD_AGENT: &str = "*";

/// Gate consulted before every fetch
#[derive(Debug, Clone)]
pub struct PolicyGate {
    robots: ParsedRobots,
}

impl PolicyGate {
    /// Wraps an already parsed policy
    pub fn new(robots: ParsedRobots) -> Self {
        Self { robots }
    }

    /// Fetches and parses robots.txt
    ///
    /// | Response | Policy |
    /// |----------|--------|
    /// | 2xx | Parsed body |
    /// | 401, 403 | Deny all |
    /// | Other 4xx | Allow all |
    /// | 5xx, transport error | `HarvestError::RobotsUnavailable` |
    ///
    /// # Arguments
    ///
    /// * `client` - The configured HTTP client
    /// * `robots_url` - Absolute URL of robots.txt
    pub async fn load(client: &Client, robots_url: &Url) -> Result<Self, HarvestError> {
        let unavailable = |reason: String| HarvestError::RobotsUnavailable {
            url: robots_url.to_string(),
            reason,
        };

        let response = client
            .get(robots_url.clone())
            .send()
            .await
            .map_err(|e| unavailable(e.to_string()))?;

        let status = response.status();
        let robots = if status.is_success() {
            let body = response.text().await.map_err(|e| unavailable(e.to_string()))?;
            ParsedRobots::from_content(&body)
        } else if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            tracing::warn!("robots.txt returned {}, treating every URL as disallowed", status);
            ParsedRobots::deny_all()
        } else if status.is_client_error() {
            tracing::info!("robots.txt returned {}, treating every URL as allowed", status);
            ParsedRobots::allow_all()
        } else {
            return Err(unavailable(format!("HTTP {}", status)));
        };

        tracing::debug!("Loaded robots policy from {}", robots_url);
        Ok(Self::new(robots))
    }

    /// Returns whether `url` may be fetched by the wildcard user agent
    pub fn allowed(&self, url: &Url) -> bool {
        self.robots.is_allowed(url.as_str(), WILDCARD_AGENT)
    }

    /// Crawl-delay declared for the wildcard group, in seconds
    pub fn crawl_delay(&self) -> Option<f64> {
        self.robots.wildcard_crawl_delay()
    }
}
