//! Statistics from the crawl database
//!
//! This module provides functionality for extracting and displaying
//! what the pages table currently holds.

use crate::storage::{Storage, StorageResult};

/// Summary of the stored pages
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageStatistics {
    /// Number of rows in the pages table
    pub total_pages: u64,

    /// Titles of the first rows, in table order
    pub sample_titles: Vec<String>,

    /// Average number of categories over the sampled rows
    pub average_categories: usize,
}

/// Loads statistics from storage
///
/// # Arguments
///
/// * `storage` - The storage backend to query
/// * `sample` - How many rows to read for the title sample
pub fn load_statistics(storage: &dyn Storage, sample: u64) -> StorageResult<PageStatistics> {
    let total_pages = storage.count_pages()?;
    let rows = storage.load_pages(sample, 0)?;

    let average_categories = if rows.is_empty() {
        0
    } else {
        rows.iter().map(|row| row.categories.len()).sum::<usize>() / rows.len()
    };

    Ok(PageStatistics {
        total_pages,
        sample_titles: rows.into_iter().map(|row| row.title).collect(),
        average_categories,
    })
}

/// Prints statistics to stdout
pub fn print_statistics(stats: &PageStatistics) {
    println!("=== Page Statistics ===\n");
    println!("  Stored pages: {}", stats.total_pages);

    if stats.sample_titles.is_empty() {
        return;
    }

    println!(
        "  Categories per page (first {}): {}",
        stats.sample_titles.len(),
        stats.average_categories
    );
    println!();
    println!("First pages:");
    for title in &stats.sample_titles {
        println!("  - {}", title);
    }
}
