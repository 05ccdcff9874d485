//! Crawler module for page fetching, extraction and persistence
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with redirect resolution
//! - Article extraction and link discovery
//! - Per-worker frontiers and worker/writer pipeline pairs
//! - Overall crawl coordination

mod coordinator;
mod fetcher;
mod frontier;
mod parser;
mod worker;
mod writer;

pub use coordinator::{partition, partition_all, Coordinator};
pub use fetcher::{build_http_client, fetch_page, FetchedPage};
pub use frontier::{Frontier, FrontierItem};
pub use parser::{extract_page, parse_last_modified, ExtractedPage};
pub use worker::{CrawlContext, CrawlWorker, WorkerReport};
pub use writer::{CompletionCallback, PageWriter, WriterReport};

use crate::config::Config;
use crate::output::RunSummary;

/// Runs a complete crawl against the configured database
///
/// # Returns
///
/// * `Ok(RunSummary)` - Every pipeline finished; the summary says how
/// * `Err(CrawlError)` - The run could not start
pub async fn run_crawl(config: Config) -> crate::Result<RunSummary> {
    Coordinator::new(config)?.run().await
}
