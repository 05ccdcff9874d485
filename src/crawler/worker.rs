//! Crawl worker
//!
//! The producing half of a pipeline pair. A worker walks its own breadth-first
//! frontier, re-seeding from the entry URL whenever it runs dry, and hands each
//! extracted page to its writer over a bounded queue. A full queue suspends the
//! worker, which is the only flow control between the two.

use crate::config::Config;
use crate::crawler::fetcher::fetch_page;
use crate::crawler::frontier::{Frontier, FrontierItem};
use crate::crawler::parser::extract_page;
use crate::crawler::writer::WriterReport;
use crate::output::format_elapsed;
use crate::robots::RobotsPolicy;
use crate::state::{Page, VisitedSet, WorkerExit, WorkerState};
use crate::storage::StorageError;
use crate::url::{canonicalize, UrlFilter};
use reqwest::Client;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use url::Url;

/// Read-only state shared by every worker of a run
pub struct CrawlContext {
    pub config: Config,
    pub client: Client,
    pub robots: RobotsPolicy,
    pub filter: UrlFilter,
    pub visited: Arc<VisitedSet>,
    pub seed: Url,
}

/// What happened to one frontier item after it was fetched
enum ItemOutcome {
    /// A page went to the writer
    Stored,

    /// Fetch, filter, dedup or extraction dropped the item
    Discarded,

    /// The writer closed its queue
    QueueClosed,
}

/// Final account of one worker
#[derive(Debug, Clone)]
pub struct WorkerReport {
    pub worker_id: usize,
    pub share: u64,
    pub crawled: u64,
    pub exit: WorkerExit,
    /// `None` if the writer task panicked
    pub writer: Option<WriterReport>,
    pub elapsed: Duration,
}

pub struct CrawlWorker {
    id: usize,
    share: u64,
    context: Arc<CrawlContext>,
    seed_canonical: String,
    frontier: Frontier,
    state: WorkerState,
    crawled: u64,
    sender: Option<mpsc::Sender<Page>>,
    writer: Option<JoinHandle<WriterReport>>,
}

impl CrawlWorker {
    /// Pairs a worker with the sending end of its writer's queue
    ///
    /// # Arguments
    ///
    /// * `id` - Pipeline index
    /// * `share` - Number of pages this worker has to hand over
    /// * `context` - Run-wide shared state
    /// * `sender` - Queue into the paired writer
    /// * `writer` - The paired writer's task, joined during shutdown
    pub fn new(
        id: usize,
        share: u64,
        context: Arc<CrawlContext>,
        sender: mpsc::Sender<Page>,
        writer: JoinHandle<WriterReport>,
    ) -> Self {
        let seed_canonical = canonicalize(&context.seed);
        Self {
            id,
            share,
            context,
            seed_canonical,
            frontier: Frontier::new(),
            state: WorkerState::Seeding,
            crawled: 0,
            sender: Some(sender),
            writer: Some(writer),
        }
    }

    /// Crawls until the share is reached or the pipeline breaks, then shuts the pair down
    pub async fn run(mut self) -> WorkerReport {
        let started = Instant::now();
        tracing::info!(worker = self.id, "Worker started with a share of {} pages", self.share);

        let exit = self.crawl(started).await;

        // Dropping the sender lets the writer drain the queue and flush
        self.transition(WorkerState::Draining);
        self.sender.take();
        let writer = match self.writer.take() {
            Some(handle) => match handle.await {
                Ok(report) => Some(report),
                Err(e) => {
                    tracing::error!(worker = self.id, "Writer task failed: {}", e);
                    None
                }
            },
            None => None,
        };
        self.transition(WorkerState::Stopped);

        let elapsed = started.elapsed();
        tracing::info!(
            worker = self.id,
            "Worker stopped ({}): {} of {} pages crawled, elapsed {}",
            exit,
            self.crawled,
            self.share,
            format_elapsed(elapsed)
        );

        WorkerReport {
            worker_id: self.id,
            share: self.share,
            crawled: self.crawled,
            exit,
            writer,
            elapsed,
        }
    }

    async fn crawl(&mut self, started: Instant) -> WorkerExit {
        let progress_every = self.share.min(self.context.config.batch_size as u64).max(1);

        loop {
            if self.crawled >= self.share {
                return WorkerExit::TargetReached;
            }
            if self.sender.as_ref().map_or(true, |s| s.is_closed()) {
                tracing::warn!(
                    worker = self.id,
                    "{}, stopping",
                    StorageError::WriterClosed(self.id)
                );
                return WorkerExit::WriterFailed;
            }

            self.transition(WorkerState::Seeding);
            let item = self
                .frontier
                .pop()
                .unwrap_or_else(|| FrontierItem::seed(self.context.seed.as_str()));

            let url = match Url::parse(&item.url) {
                Ok(url) => url,
                Err(e) => {
                    tracing::debug!(worker = self.id, "Skipping malformed URL {}: {}", item.url, e);
                    continue;
                }
            };

            if !self.context.robots.allowed(&url) {
                if item.is_seed() {
                    tracing::error!(
                        worker = self.id,
                        "Entry URL {} is disallowed by robots.txt, cannot crawl",
                        url
                    );
                    return WorkerExit::SeedDisallowed;
                }
                tracing::debug!(worker = self.id, "Disallowed by robots.txt: {}", url);
                continue;
            }

            if self.context.visited.contains(&canonicalize(&url)) {
                continue;
            }

            match self.process(&item, &url).await {
                ItemOutcome::QueueClosed => {
                    tracing::warn!(
                        worker = self.id,
                        "{}, dropping page",
                        StorageError::WriterClosed(self.id)
                    );
                    return WorkerExit::WriterFailed;
                }
                ItemOutcome::Stored => {
                    if self.crawled % progress_every == 0 {
                        tracing::info!(
                            worker = self.id,
                            "Crawled {} pages, {:.2}% completed, elapsed {}",
                            self.crawled,
                            self.crawled as f64 * 100.0 / self.share as f64,
                            format_elapsed(started.elapsed())
                        );
                    }
                }
                ItemOutcome::Discarded => {}
            }

            let interval = self.context.config.interval();
            if !interval.is_zero() && self.crawled < self.share {
                tokio::time::sleep(interval).await;
            }
        }
    }

    /// Fetches, filters, extracts and enqueues one item
    async fn process(&mut self, item: &FrontierItem, url: &Url) -> ItemOutcome {
        let context = Arc::clone(&self.context);

        self.transition(WorkerState::Fetching);
        let fetched = match fetch_page(&context.client, url.as_str()).await {
            Ok(fetched) => fetched,
            Err(e) => {
                tracing::debug!(worker = self.id, "Fetch failed: {}", e);
                return ItemOutcome::Discarded;
            }
        };

        let resolved = fetched.final_url;
        if !context.filter.matches(&resolved) {
            tracing::debug!(worker = self.id, "Resolved URL {} is not an article", resolved);
            return ItemOutcome::Discarded;
        }

        // The entry URL stays out of the visited set so it can be re-seeded forever
        let item_canonical = canonicalize(url);
        if !item.is_seed() {
            context.visited.insert(&item_canonical);
        }
        let resolved_canonical = canonicalize(&resolved);
        if resolved_canonical != item_canonical
            && resolved_canonical != self.seed_canonical
            && !context.visited.insert(&resolved_canonical)
        {
            tracing::debug!(worker = self.id, "Already visited {}", resolved_canonical);
            return ItemOutcome::Discarded;
        }

        self.transition(WorkerState::Extracting);
        let Some(extracted) = extract_page(&fetched.body, &resolved, &context.filter) else {
            tracing::debug!(worker = self.id, "No page extracted from {}", resolved);
            return ItemOutcome::Discarded;
        };

        self.transition(WorkerState::Enqueuing);
        let Some(sender) = self.sender.as_ref() else {
            return ItemOutcome::QueueClosed;
        };
        if sender.send(extracted.page).await.is_err() {
            return ItemOutcome::QueueClosed;
        }
        self.crawled += 1;

        if item.depth < context.config.depth {
            let next: Vec<String> = extracted
                .links
                .iter()
                .map(canonicalize)
                .filter(|link| !context.visited.contains(link))
                .collect();
            let pushed = self.frontier.push_links(next, item.depth + 1);
            tracing::trace!(
                worker = self.id,
                "Queued {} links at depth {}, frontier size {}",
                pushed,
                item.depth + 1,
                self.frontier.len()
            );
        }

        ItemOutcome::Stored
    }

    fn transition(&mut self, next: WorkerState) {
        if self.state != next {
            tracing::trace!(worker = self.id, "{} -> {}", self.state, next);
            self.state = next;
        }
    }
}
