//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the Storage trait.

use crate::state::{split_column, Page, LAST_MODIFY_FORMAT};
use crate::storage::schema::{initialize_schema, INSERT_PAGE_SQL};
use crate::storage::traits::{IndexRow, Storage, StorageError, StorageResult};
use chrono::NaiveDateTime;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::time::Duration;

/// How long a writer waits for another writer's lock on the same file
const BUSY_TIMEOUT: Duration = Duration::from_secs(30);

/// SQLite storage backend
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Opens (or creates) the database file and bootstraps the schema
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteStorage)` - Successfully opened/created database
    /// * `Err(StorageError)` - Failed to open database
    pub fn open(path: &Path) -> StorageResult<Self> {
        let conn = Connection::open(path)?;

        // Several writers share one file
        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;
        ",
        )?;
        conn.busy_timeout(BUSY_TIMEOUT)?;

        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database
    pub fn open_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }
}

impl Storage for SqliteStorage {
    fn write_batch(&mut self, pages: &[Page]) -> StorageResult<usize> {
        // Dropping an uncommitted transaction rolls it back
        let tx = self.conn.transaction()?;
        let mut inserted = 0;
        {
            let mut stmt = tx.prepare_cached(INSERT_PAGE_SQL)?;
            for page in pages {
                inserted += stmt.execute(params![
                    page.title(),
                    page.content(),
                    page.categories_column(),
                    page.last_modify_column(),
                    page.out_links_column(),
                ])?;
            }
        }
        tx.commit()?;
        Ok(inserted)
    }

    fn count_pages(&self) -> StorageResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM pages", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    fn load_pages(&self, limit: u64, offset: u64) -> StorageResult<Vec<IndexRow>> {
        let mut stmt = self
            .conn
            .prepare("SELECT title, content, categories FROM pages LIMIT ?1 OFFSET ?2")?;

        let rows = stmt
            .query_map(params![limit as i64, offset as i64], |row| {
                Ok(IndexRow {
                    title: row.get(0)?,
                    content: row.get(1)?,
                    categories: split_column(&row.get::<_, String>(2)?),
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(rows)
    }

    fn get_page(&self, title: &str) -> StorageResult<Option<Page>> {
        let row = self
            .conn
            .query_row(
                "SELECT title, content, categories, lastModify, outLinks FROM pages WHERE title = ?1",
                params![title],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, String>(3)?,
                        row.get::<_, Option<String>>(4)?,
                    ))
                },
            )
            .optional()?;

        let Some((title, content, categories, last_modify, out_links)) = row else {
            return Ok(None);
        };

        let last_modify = NaiveDateTime::parse_from_str(&last_modify, LAST_MODIFY_FORMAT)
            .map_err(|e| StorageError::CorruptRow {
                title: title.clone(),
                message: format!("lastModify '{}': {}", last_modify, e),
            })?;

        let corrupt_title = title.clone();
        Page::new(
            title,
            content,
            split_column(&categories),
            last_modify,
            split_column(out_links.as_deref().unwrap_or_default()),
        )
        .map(Some)
        .ok_or(StorageError::CorruptRow {
            title: corrupt_title,
            message: "empty content or categories".to_string(),
        })
    }
}
