//! URL handling module for Wiki-Ripple
//!
//! This module provides URL canonicalization, robots wildcard matching, and the
//! host/path filter that decides which URLs belong to the crawled encyclopedia
//! and recovers a page title from its path.

mod matcher;
mod normalize;

use crate::CrawlError;
use regex::Regex;
use url::Url;

// Re-export main functions
pub use matcher::{matches_wildcard, wildcard_to_regex};
pub use normalize::{canonicalize, decode_path, parse_http_url};

/// Host and path filter for crawlable article URLs
///
/// Both patterns must match the *whole* host or path. The path pattern carries
/// a single capture group that yields the article title.
#[derive(Debug, Clone)]
pub struct UrlFilter {
    host: Regex,
    path: Regex,
}

impl UrlFilter {
    /// Compiles a filter from the configured host and path patterns
    ///
    /// # Arguments
    ///
    /// * `host_pattern` - Pattern the host must match
    /// * `path_pattern` - Pattern the path must match, with one capture group
    ///
    /// # Returns
    ///
    /// * `Ok(UrlFilter)` - Both patterns compiled
    /// * `Err(CrawlError)` - A pattern failed to compile
    pub fn new(host_pattern: &str, path_pattern: &str) -> Result<Self, CrawlError> {
        Ok(Self {
            host: Regex::new(&full_match(host_pattern))?,
            path: Regex::new(&full_match(path_pattern))?,
        })
    }

    /// Returns true if the URL's host and raw path both match
    pub fn matches(&self, url: &Url) -> bool {
        match url.host_str() {
            Some(host) => self.host.is_match(host) && self.path.is_match(url.path()),
            None => false,
        }
    }

    /// Recovers the article title from a URL's path
    ///
    /// The path is decoded with [`decode_path`], matched against the path
    /// pattern, and the capture group's underscores are replaced by spaces.
    ///
    /// # Examples
    ///
    /// ```
    /// use url::Url;
    /// use wiki_ripple::url::UrlFilter;
    ///
    /// let filter = UrlFilter::new("^en.wikipedia.org$", "^/wiki/([^:]*)$").unwrap();
    /// let url = Url::parse("https://en.wikipedia.org/wiki/Caf%C3%A9_society").unwrap();
    /// assert_eq!(filter.title_of(&url), Some("Café society".to_string()));
    /// ```
    pub fn title_of(&self, url: &Url) -> Option<String> {
        let decoded = decode_path(url.path());
        let captures = self.path.captures(&decoded)?;
        let title = captures.get(1)?.as_str();
        Some(title.replace('_', " "))
    }
}

/// Wraps a pattern so that it has to match the entire input
fn full_match(pattern: &str) -> String {
    format!("^(?:{})$", pattern)
}
