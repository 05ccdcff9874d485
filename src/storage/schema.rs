//! Database schema definitions
//!
//! The crawl writes into one table. The indexing side reads `title`,
//! `content` and `categories` back with `LIMIT`/`OFFSET` paging.

/// SQL schema for the database
pub const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS pages (
    title TEXT PRIMARY KEY,
    content TEXT NOT NULL,
    categories TEXT NOT NULL,
    lastModify TEXT NOT NULL,
    outLinks TEXT
);
"#;

/// Insert-if-absent on `title`: a collision is silently ignored, never overwritten
pub const INSERT_PAGE_SQL: &str =
    "INSERT OR IGNORE INTO pages (title, content, categories, lastModify, outLinks) VALUES (?1, ?2, ?3, ?4, ?5)";

/// Initializes the database schema
///
/// Idempotent; safe to run against an existing database.
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}
