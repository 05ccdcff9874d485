use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_WORKERS: usize = 10;
pub const DEFAULT_PAGES: u64 = 750_000;
pub const DEFAULT_DEPTH: u32 = 10;
pub const DEFAULT_INTERVAL_MS: u64 = 5000;
pub const DEFAULT_ENTRY_URL: &str = "https://en.wikipedia.org/wiki/Special:Random";
pub const DEFAULT_HOST_PATTERN: &str = "^en.wikipedia.org$";
/// Special pages (such as `Help:Contents`) carry a colon and are never crawled
pub const DEFAULT_PATH_PATTERN: &str = "^/wiki/([^:]*)$";
pub const DEFAULT_USER_AGENT: &str = "wiki-ripple";
pub const DEFAULT_BATCH_SIZE: usize = 50;
pub const DEFAULT_QUEUE_CAPACITY: usize = 1024;

/// Per-run crawl configuration
///
/// Immutable once the run starts; shared by every worker/writer pair.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Config {
    /// Number of worker/writer pairs
    pub workers: usize,

    /// Total number of pages to persist, split across workers
    pub pages: u64,

    /// Maximum BFS depth from the entry URL
    pub depth: u32,

    /// Politeness interval between fetches of one worker (milliseconds)
    pub interval_ms: u64,

    /// Entry URL every worker seeds (and re-seeds) from
    pub entry_url: String,

    /// Pattern the whole host of a crawled URL must match
    pub host_pattern: String,

    /// Pattern the whole path must match; its single capture group is the page title
    pub path_pattern: String,

    /// Path to the SQLite database file
    pub database_path: String,

    /// Identity used both for the HTTP user agent and robots.txt matching
    pub user_agent: String,

    /// Pages per write transaction
    pub batch_size: usize,

    /// Capacity of each worker's bounded page queue
    pub queue_capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
            pages: DEFAULT_PAGES,
            depth: DEFAULT_DEPTH,
            interval_ms: DEFAULT_INTERVAL_MS,
            entry_url: DEFAULT_ENTRY_URL.to_string(),
            host_pattern: DEFAULT_HOST_PATTERN.to_string(),
            path_pattern: DEFAULT_PATH_PATTERN.to_string(),
            database_path: String::new(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            batch_size: DEFAULT_BATCH_SIZE,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
        }
    }
}

impl Config {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}
