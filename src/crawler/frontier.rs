//! Per-worker breadth-first frontier
//!
//! Each worker owns its frontier; nothing here is shared. Duplicates are only
//! removed within a single push, the visited set takes care of the rest at
//! dequeue time.

use std::collections::{HashSet, VecDeque};

/// A URL waiting to be fetched, annotated with its BFS depth
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontierItem {
    /// Canonical URL
    pub url: String,

    /// Distance from the entry URL
    pub depth: u32,
}

impl FrontierItem {
    pub fn new(url: impl Into<String>, depth: u32) -> Self {
        Self {
            url: url.into(),
            depth,
        }
    }

    /// The entry URL item, synthesized whenever the frontier runs dry
    pub fn seed(url: impl Into<String>) -> Self {
        Self::new(url, 0)
    }

    /// Links are always pushed at depth 1 or more, so depth 0 is the entry URL
    pub fn is_seed(&self) -> bool {
        self.depth == 0
    }
}

/// FIFO queue of pending URLs
#[derive(Debug, Default)]
pub struct Frontier {
    queue: VecDeque<FrontierItem>,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes the oldest pending item
    pub fn pop(&mut self) -> Option<FrontierItem> {
        self.queue.pop_front()
    }

    /// Appends a batch of links at `depth`, dropping repeats within the batch
    ///
    /// URLs already waiting in the queue from an earlier push are not looked at.
    ///
    /// # Returns
    ///
    /// The number of items actually appended
    pub fn push_links<I>(&mut self, urls: I, depth: u32) -> usize
    where
        I: IntoIterator<Item = String>,
    {
        let mut seen = HashSet::new();
        let before = self.queue.len();
        for url in urls {
            if seen.insert(url.clone()) {
                self.queue.push_back(FrontierItem::new(url, depth));
            }
        }
        self.queue.len() - before
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
