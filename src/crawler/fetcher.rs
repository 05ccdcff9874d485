//! HTTP fetcher implementation
//!
//! This module handles all page requests for the crawler:
//! - Building the HTTP client with the crawler's user agent
//! - GET requests that follow redirects to the final article URL
//! - Classifying failures as per-item errors

use crate::CrawlError;
use reqwest::{redirect::Policy, Client};
use std::time::Duration;
use url::Url;

/// Maximum redirect hops followed for one fetch
const MAX_REDIRECTS: usize = 10;

/// A successfully fetched page
#[derive(Debug)]
pub struct FetchedPage {
    /// Final URL after redirects
    pub final_url: Url,
    /// Page body content
    pub body: String,
}

/// Builds an HTTP client with proper configuration
///
/// Redirects are followed by the client, so `Special:Random`-style entry
/// pages resolve to the article they point at.
///
/// # Example
///
/// ```no_run
/// use wiki_ripple::crawler::build_http_client;
///
/// let client = build_http_client("wiki-ripple").unwrap();
/// ```
pub fn build_http_client(user_agent: &str) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent)
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .redirect(Policy::limited(MAX_REDIRECTS))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a URL and returns the body together with the post-redirect URL
///
/// # Returns
///
/// * `Ok(FetchedPage)` - 2xx response with a readable body
/// * `Err(CrawlError)` - Transport failure or non-2xx status
pub async fn fetch_page(client: &Client, url: &str) -> crate::Result<FetchedPage> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|source| CrawlError::Http {
            url: url.to_string(),
            source,
        })?;

    let status = response.status();
    let final_url = response.url().clone();

    if !status.is_success() {
        return Err(CrawlError::Status {
            url: final_url.to_string(),
            status: status.as_u16(),
        });
    }

    let body = response.text().await.map_err(|source| CrawlError::Http {
        url: final_url.to_string(),
        source,
    })?;

    Ok(FetchedPage {
        final_url,
        body,
    })
}
