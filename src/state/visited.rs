//! Process-wide visited URL set shared by all crawl workers

use dashmap::DashSet;

/// Concurrent set of canonical URLs that have been processed
///
/// Grows monotonically; there is no removal. Two workers may still race on the
/// same URL between `contains` and `insert`, which the storage primary key
/// absorbs as an ignored duplicate insert.
#[derive(Debug, Default)]
pub struct VisitedSet {
    urls: DashSet<String>,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks a canonical URL as visited
    ///
    /// Returns true if the URL was not present before.
    pub fn insert(&self, url: &str) -> bool {
        self.urls.insert(url.to_string())
    }

    pub fn contains(&self, url: &str) -> bool {
        self.urls.contains(url)
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }
}
