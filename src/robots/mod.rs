//! Robots.txt handling module
//!
//! The crawl targets a single host, so one `RobotsPolicy` is resolved against
//! the entry URL before any worker starts and is shared read-only afterwards.

mod parser;

pub use parser::{parse_rules, RobotsRule, RuleSetParser};

use reqwest::{Client, StatusCode};
use url::Url;

/// Exclusion rules for one host and one crawler identity
///
/// Evaluation is first-match in file order: the first recorded rule whose path
/// is a prefix of the URL's path decides. This is not the longest-prefix rule
/// most robots.txt consumers use.
#[derive(Debug, Clone)]
pub struct RobotsPolicy {
    user_agent: String,
    /// Host the rules apply to; `None` until `parse` or `from_content` ran
    host: Option<String>,
    rules: Vec<RobotsRule>,
}

impl RobotsPolicy {
    /// Creates an empty policy that allows everything
    pub fn new(user_agent: &str) -> Self {
        Self {
            user_agent: user_agent.to_string(),
            host: None,
            rules: Vec::new(),
        }
    }

    /// Builds a policy directly from robots.txt content for `host`
    pub fn from_content(user_agent: &str, host: &str, content: &str) -> Self {
        Self {
            user_agent: user_agent.to_string(),
            host: Some(host.to_string()),
            rules: parse_rules(content, user_agent),
        }
    }

    /// Fetches and parses `<scheme>://<host>/robots.txt` for the seed URL
    ///
    /// A non-200 answer or a transport failure leaves the rule list empty, so
    /// every URL stays allowed and the crawl proceeds.
    ///
    /// # Returns
    ///
    /// * `true` - Robots.txt was loaded, or treated as absent
    /// * `false` - No robots.txt URL could be derived from the seed
    pub async fn parse(&mut self, client: &Client, seed: &Url) -> bool {
        let robots_url = match seed.join("/robots.txt") {
            Ok(url) => url,
            Err(e) => {
                tracing::warn!("Cannot derive robots.txt URL from {}: {}", seed, e);
                return false;
            }
        };
        let Some(host) = robots_url.host_str() else {
            tracing::warn!("Seed URL {} has no host", seed);
            return false;
        };
        self.host = Some(host.to_string());
        self.rules.clear();

        tracing::debug!("Fetching {}", robots_url);
        let response = match client.get(robots_url.clone()).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::info!("No robots.txt at {} ({}), nothing restricted", robots_url, e);
                return true;
            }
        };

        if response.status() != StatusCode::OK {
            tracing::info!(
                "robots.txt at {} returned {}, nothing restricted",
                robots_url,
                response.status()
            );
            return true;
        }

        match response.text().await {
            Ok(body) => {
                self.rules = parse_rules(&body, &self.user_agent);
                tracing::info!(
                    "Loaded {} robots.txt rules for '{}' on {}",
                    self.rules.len(),
                    self.user_agent,
                    host
                );
            }
            Err(e) => {
                tracing::info!("Failed to read {} ({}), nothing restricted", robots_url, e);
            }
        }

        true
    }

    /// Checks whether the URL may be crawled
    ///
    /// Always true before rules were loaded, and for URLs on other hosts.
    pub fn allowed(&self, url: &Url) -> bool {
        let Some(host) = &self.host else {
            return true;
        };

        if url.host_str() != Some(host.as_str()) {
            return true;
        }

        let path = url.path();
        self.rules
            .iter()
            .find(|rule| path.starts_with(&rule.path))
            .map_or(true, |rule| rule.allow)
    }

    pub fn rules(&self) -> &[RobotsRule] {
        &self.rules
    }
}
