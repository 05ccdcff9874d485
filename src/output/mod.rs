//! Output module for run summaries and reports
//!
//! This module handles:
//! - Formatting elapsed times the way progress lines print them
//! - The end-of-run summary across all pipeline pairs
//! - Database statistics for `--stats`

pub mod stats;

pub use stats::{load_statistics, print_statistics, PageStatistics};

use crate::crawler::WorkerReport;
use std::time::Duration;

/// Formats a duration as `HH:MM:SS.mmm`
///
/// Hours are not wrapped at 24.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use wiki_ripple::output::format_elapsed;
///
/// assert_eq!(format_elapsed(Duration::from_millis(3_723_045)), "01:02:03.045");
/// ```
pub fn format_elapsed(elapsed: Duration) -> String {
    let millis = elapsed.as_millis();
    let hours = millis / 3_600_000;
    let minutes = (millis / 60_000) % 60;
    let seconds = (millis / 1_000) % 60;
    format!(
        "{:02}:{:02}:{:02}.{:03}",
        hours,
        minutes,
        seconds,
        millis % 1_000
    )
}

/// Result of a whole run
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Sum of the committed counts of writers that finished cleanly
    pub committed: u64,

    /// One report per pipeline that was started
    pub workers: Vec<WorkerReport>,

    pub elapsed: Duration,
}

impl RunSummary {
    /// Number of pipelines that ended in a failure
    pub fn failed_pipelines(&self) -> usize {
        self.workers
            .iter()
            .filter(|w| !w.exit.is_clean() || w.writer.map_or(true, |r| r.failed))
            .count()
    }

    /// Logs one line per worker followed by the run total
    pub fn log(&self) {
        for worker in &self.workers {
            let committed = worker.writer.map_or(0, |r| r.committed);
            tracing::info!(
                worker = worker.worker_id,
                "{} of {} pages crawled, {} committed, {} ({})",
                worker.crawled,
                worker.share,
                committed,
                worker.exit,
                format_elapsed(worker.elapsed)
            );
        }

        let failed = self.failed_pipelines();
        if failed > 0 {
            tracing::warn!("{} of {} pipelines failed", failed, self.workers.len());
        }
        tracing::info!(
            "Crawl finished: {} pages committed in {}",
            self.committed,
            format_elapsed(self.elapsed)
        );
    }
}
