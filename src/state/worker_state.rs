/// Worker loop states for tracking crawl progress
use std::fmt;

/// The current step of a crawl worker's loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorkerState {
    /// Picking the next frontier item, or synthesizing the entry URL
    Seeding,

    /// Fetching a page and resolving redirects
    Fetching,

    /// Extracting title, content, categories and links
    Extracting,

    /// Handing the page to the writer and growing the frontier
    Enqueuing,

    /// Target reached or writer gone; waiting for the writer to finish
    Draining,

    /// Worker has exited
    Stopped,
}

impl fmt::Display for WorkerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Seeding => "seeding",
            Self::Fetching => "fetching",
            Self::Extracting => "extracting",
            Self::Enqueuing => "enqueuing",
            Self::Draining => "draining",
            Self::Stopped => "stopped",
        };
        write!(f, "{}", name)
    }
}

/// Why a crawl worker stopped producing pages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerExit {
    /// The worker's page share was handed to the writer
    TargetReached,

    /// The paired writer failed and closed its queue
    WriterFailed,

    /// The entry URL itself is disallowed by robots.txt
    SeedDisallowed,
}

impl WorkerExit {
    /// Returns true if the pipeline ended without a failure
    pub fn is_clean(&self) -> bool {
        matches!(self, Self::TargetReached)
    }
}

impl fmt::Display for WorkerExit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            Self::TargetReached => "target reached",
            Self::WriterFailed => "writer failed",
            Self::SeedDisallowed => "entry URL disallowed by robots.txt",
        };
        write!(f, "{}", reason)
    }
}
