//! Crawler coordinator - run orchestration
//!
//! The coordinator resolves robots.txt once, splits the page target across the
//! workers, builds one worker/writer pair per share, and sums what the writers
//! committed once every pair has shut down.

use crate::config::{validate, Config};
use crate::crawler::fetcher::build_http_client;
use crate::crawler::worker::{CrawlContext, CrawlWorker};
use crate::crawler::writer::PageWriter;
use crate::output::RunSummary;
use crate::robots::RobotsPolicy;
use crate::state::VisitedSet;
use crate::storage::{SqliteStorage, Storage, StorageResult};
use crate::url::{parse_http_url, UrlFilter};
use reqwest::Client;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;
use url::Url;

/// Page share of worker `index` when `total` pages are split across `workers`
///
/// The first `total % workers` workers get one page more than the rest, so the
/// shares always add up to `total`.
pub fn partition(total: u64, workers: u64, index: u64) -> u64 {
    if workers == 0 {
        return 0;
    }
    let base = total / workers;
    if index < total % workers {
        base + 1
    } else {
        base
    }
}

/// Every worker's share, in worker order
pub fn partition_all(total: u64, workers: usize) -> Vec<u64> {
    (0..workers as u64)
        .map(|index| partition(total, workers as u64, index))
        .collect()
}

/// Main crawler coordinator structure
pub struct Coordinator {
    config: Config,
    client: Client,
    filter: UrlFilter,
    seed: Url,
    visited: Arc<VisitedSet>,
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Configuration is valid and the HTTP client was built
    /// * `Err(CrawlError)` - Invalid configuration or malformed entry URL
    pub fn new(config: Config) -> crate::Result<Self> {
        validate(&config)?;

        let seed = parse_http_url(&config.entry_url)?;
        let filter = UrlFilter::new(&config.host_pattern, &config.path_pattern)?;
        let client = build_http_client(&config.user_agent)?;

        Ok(Self {
            config,
            client,
            filter,
            seed,
            visited: Arc::new(VisitedSet::new()),
        })
    }

    /// The visited set shared by all workers of this coordinator
    pub fn visited(&self) -> &Arc<VisitedSet> {
        &self.visited
    }

    /// Runs the crawl against the configured SQLite database
    pub async fn run(&self) -> crate::Result<RunSummary> {
        let path = PathBuf::from(&self.config.database_path);
        self.run_with(move |_| SqliteStorage::open(&path)).await
    }

    /// Runs the crawl, opening each writer's storage with `open_storage`
    ///
    /// A pipeline whose storage cannot be opened is left out; the other pairs
    /// still run.
    pub async fn run_with<S, F>(&self, mut open_storage: F) -> crate::Result<RunSummary>
    where
        S: Storage + 'static,
        F: FnMut(usize) -> StorageResult<S>,
    {
        let started = Instant::now();
        tracing::info!(
            "Starting crawl of {} pages with {} workers from {}",
            self.config.pages,
            self.config.workers,
            self.seed
        );

        let mut robots = RobotsPolicy::new(&self.config.user_agent);
        if !robots.parse(&self.client, &self.seed).await {
            tracing::warn!("Could not resolve robots.txt for {}", self.seed);
        }

        let context = Arc::new(CrawlContext {
            config: self.config.clone(),
            client: self.client.clone(),
            robots,
            filter: self.filter.clone(),
            visited: Arc::clone(&self.visited),
            seed: self.seed.clone(),
        });

        let committed = Arc::new(AtomicU64::new(0));
        let mut handles = Vec::with_capacity(self.config.workers);

        for (id, share) in partition_all(self.config.pages, self.config.workers)
            .into_iter()
            .enumerate()
        {
            let storage = match open_storage(id) {
                Ok(storage) => storage,
                Err(e) => {
                    tracing::error!(worker = id, "Cannot open storage, pipeline skipped: {}", e);
                    continue;
                }
            };

            let (sender, receiver) = mpsc::channel(self.config.queue_capacity);
            let total = Arc::clone(&committed);
            let writer = PageWriter::new(id, storage, receiver, self.config.batch_size)
                .on_exit(move |count| {
                    total.fetch_add(count, Ordering::SeqCst);
                })
                .spawn();

            let worker = CrawlWorker::new(id, share, Arc::clone(&context), sender, writer);
            handles.push(tokio::spawn(worker.run()));
        }

        let mut workers = Vec::with_capacity(handles.len());
        for handle in handles {
            match handle.await {
                Ok(report) => workers.push(report),
                Err(e) => tracing::error!("Worker task failed: {}", e),
            }
        }

        let summary = RunSummary {
            committed: committed.load(Ordering::SeqCst),
            workers,
            elapsed: started.elapsed(),
        };
        summary.log();

        Ok(summary)
    }
}
