//! Robots.txt parser implementation
//!
//! This module provides functionality for parsing robots.txt content using the robotstxt crate.

use robotstxt::DefaultMatcher;

/// How a loaded policy answers permission checks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PolicyMode {
    /// Evaluate the stored robots.txt content
    Rules,
    /// No robots.txt published; everything may be fetched
    AllowAll,
    /// Access to robots.txt was refused; nothing may be fetched
    DenyAll,
}

/// Parsed robots.txt data
///
/// This is a wrapper around the robotstxt crate's matcher, providing a simplified
/// interface for checking if URLs are allowed.
#[derive(Debug, Clone)]
pub struct ParsedRobots {
    /// Raw robots.txt content
    content: String,
    mode: PolicyMode,
}

impl ParsedRobots {
    /// Creates a new ParsedRobots from raw robots.txt content
    pub fn from_content(content: &str) -> Self {
        Self {
            content: content.to_string(),
            mode: PolicyMode::Rules,
        }
    }

    /// Creates a permissive ParsedRobots that allows everything
    ///
    /// Used when the site answers robots.txt with a client error such as 404.
    pub fn allow_all() -> Self {
        Self {
            content: String::new(),
            mode: PolicyMode::AllowAll,
        }
    }

    /// Creates a ParsedRobots that refuses everything
    ///
    /// Used when the site answers robots.txt with 401 or 403.
    pub fn deny_all() -> Self {
        Self {
            content: String::new(),
            mode: PolicyMode::DenyAll,
        }
    }

    /// Checks if a URL is allowed for the given user agent
    ///
    /// # Arguments
    ///
    /// * `url` - The absolute URL to check
    /// * `user_agent` - The user agent token (`*` for the wildcard group)
    pub fn is_allowed(&self, url: &str, user_agent: &str) -> bool {
        match self.mode {
            PolicyMode::AllowAll => true,
            PolicyMode::DenyAll => false,
            PolicyMode::Rules if self.content.trim().is_empty() => true,
            PolicyMode::Rules => {
                let mut matcher = DefaultMatcher::default();
                matcher.one_agent_allowed_by_robots(&self.content, user_agent, url)
            }
        }
    }

    /// Gets the crawl delay declared for the wildcard (`*`) group, in seconds
    pub fn wildcard_crawl_delay(&self) -> Option<f64> {
        if self.mode != PolicyMode::Rules {
            return None;
        }

        // Consecutive User-agent lines form one group; the first rule line closes it
        let mut group_agents: Vec<String> = Vec::new();
        let mut group_open = true;
        let mut delay = None;

        for line in self.content.lines() {
            let trimmed = line.split('#').next().unwrap_or("").trim();
            if trimmed.is_empty() {
                continue;
            }

            let Some((key, value)) = trimmed.split_once(':') else {
                continue;
            };
            let key = key.trim().to_lowercase();
            let value = value.trim();

            if key == "user-agent" {
                if !group_open {
                    group_agents.clear();
                    group_open = true;
                }
                group_agents.push(value.to_string());
                continue;
            }

            group_open = false;
            if key == "crawl-delay" && group_agents.iter().any(|agent| agent == "*") {
                if let Ok(seconds) = value.parse::<f64>() {
                    delay = Some(seconds);
                }
            }
        }

        delay
    }
}
