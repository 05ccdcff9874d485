//! Storage module for persisting crawled pages
//!
//! This module handles all database operations for the crawler:
//! - SQLite database initialization and schema bootstrap
//! - Batched, transactional, insert-if-absent page writes
//! - Reading pages back the way the indexing side does

mod schema;
mod sqlite;
mod traits;

pub use schema::{initialize_schema, INSERT_PAGE_SQL, SCHEMA_SQL};
pub use sqlite::SqliteStorage;
pub use traits::{IndexRow, Storage, StorageError, StorageResult};

use std::path::Path;

/// Opens a storage database, creating the `pages` table if absent
pub fn open_storage(path: &Path) -> StorageResult<SqliteStorage> {
    SqliteStorage::open(path)
}
