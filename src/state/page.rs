//! The page record exchanged between a crawl worker and its writer

use chrono::NaiveDateTime;

/// Storage format of `last_modify`
pub const LAST_MODIFY_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Separator used when list fields are flattened into one column
const COLUMN_SEPARATOR: char = '|';

/// An extracted encyclopedia article
///
/// Immutable once built. `content` and `categories` are never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    title: String,
    content: String,
    categories: Vec<String>,
    last_modify: NaiveDateTime,
    out_links: Vec<String>,
}

impl Page {
    /// Builds a page, refusing empty content or an empty category list
    ///
    /// # Returns
    ///
    /// * `Some(Page)` - All invariants hold
    /// * `None` - `content` or `categories` is empty
    pub fn new(
        title: String,
        content: String,
        categories: Vec<String>,
        last_modify: NaiveDateTime,
        out_links: Vec<String>,
    ) -> Option<Self> {
        if content.is_empty() || categories.is_empty() {
            return None;
        }

        Some(Self {
            title,
            content,
            categories,
            last_modify,
            out_links,
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn last_modify(&self) -> NaiveDateTime {
        self.last_modify
    }

    pub fn out_links(&self) -> &[String] {
        &self.out_links
    }

    /// `categories` as stored: `'|'`-joined, order preserved
    pub fn categories_column(&self) -> String {
        join_column(&self.categories)
    }

    /// `out_links` as stored: `'|'`-joined, empty when there are none
    pub fn out_links_column(&self) -> String {
        join_column(&self.out_links)
    }

    /// `last_modify` as stored, e.g. `2018-01-18 21:30`
    pub fn last_modify_column(&self) -> String {
        self.last_modify.format(LAST_MODIFY_FORMAT).to_string()
    }
}

/// Joins a list into a single `'|'`-separated column value
pub fn join_column(items: &[String]) -> String {
    let mut joined = String::new();
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            joined.push(COLUMN_SEPARATOR);
        }
        joined.push_str(item);
    }
    joined
}

/// Splits a stored column back into its ordered list; empty input yields an empty list
pub fn split_column(column: &str) -> Vec<String> {
    if column.is_empty() {
        return Vec::new();
    }
    column.split(COLUMN_SEPARATOR).map(str::to_string).collect()
}
