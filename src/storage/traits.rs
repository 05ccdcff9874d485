//! Storage traits and error types
//!
//! This module defines the trait interface for storage backends and
//! associated error types.

use crate::state::Page;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Corrupt row for '{title}': {message}")]
    CorruptRow { title: String, message: String },

    #[error("Writer for pipeline {0} is closed")]
    WriterClosed(usize),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// A row as read by the indexing side: title, content and split categories
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexRow {
    pub title: String,
    pub content: String,
    pub categories: Vec<String>,
}

/// Trait for storage backend implementations
///
/// One writer owns one backend; backends are moved into the writer's
/// blocking task and therefore must be `Send`.
pub trait Storage: Send {
    /// Writes a batch of pages as a single transaction
    ///
    /// Pages whose title already exists are skipped without error. On any
    /// failure the whole transaction is rolled back.
    ///
    /// # Returns
    ///
    /// The number of rows actually inserted
    fn write_batch(&mut self, pages: &[Page]) -> StorageResult<usize>;

    /// Counts all stored pages
    fn count_pages(&self) -> StorageResult<u64>;

    /// Reads one page of rows, in table order, the way the indexer pages through them
    fn load_pages(&self, limit: u64, offset: u64) -> StorageResult<Vec<IndexRow>>;

    /// Reads a full page back by title
    fn get_page(&self, title: &str) -> StorageResult<Option<Page>>;
}

/// Lets callers pick a backend per pipeline at runtime
impl<S: Storage + ?Sized> Storage for Box<S> {
    fn write_batch(&mut self, pages: &[Page]) -> StorageResult<usize> {
        (**self).write_batch(pages)
    }

    fn count_pages(&self) -> StorageResult<u64> {
        (**self).count_pages()
    }

    fn load_pages(&self, limit: u64, offset: u64) -> StorageResult<Vec<IndexRow>> {
        (**self).load_pages(limit, offset)
    }

    fn get_page(&self, title: &str) -> StorageResult<Option<Page>> {
        (**self).get_page(title)
    }
}
