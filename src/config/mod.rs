//! Configuration module for Wiki-Ripple
//!
//! This module handles loading, parsing, and validating the run configuration.
//! Every key is optional; missing keys fall back to the crawler defaults.
//!
//! # Example
//!
//! ```no_run
//! use wiki_ripple::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("crawl.toml")).unwrap();
//! println!("Crawler will use max depth: {}", config.depth);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, DEFAULT_BATCH_SIZE, DEFAULT_DEPTH, DEFAULT_ENTRY_URL, DEFAULT_HOST_PATTERN,
    DEFAULT_INTERVAL_MS, DEFAULT_PAGES, DEFAULT_PATH_PATTERN, DEFAULT_QUEUE_CAPACITY,
    DEFAULT_USER_AGENT, DEFAULT_WORKERS,
};

// Re-export parser and validation functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate;
