//! Wiki-Ripple main entry point
//!
//! This is the command-line interface for the Wiki-Ripple encyclopedia crawler.

use anyhow::Context;
use clap::Parser;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;
use wiki_ripple::config::{load_config_with_hash, validate, Config};
use wiki_ripple::crawler::run_crawl;
use wiki_ripple::output::{load_statistics, print_statistics};
use wiki_ripple::storage::open_storage;

/// Rows listed by `--stats`
const STATS_SAMPLE: u64 = 10;

/// Wiki-Ripple: a polite encyclopedia crawler
///
/// Wiki-Ripple crawls an encyclopedia breadth-first from an entry URL with
/// several worker/writer pairs, respecting robots.txt and a politeness
/// interval, and stores every article in a SQLite `pages` table.
#[derive(Parser, Debug)]
#[command(name = "wiki-ripple")]
#[command(version = "1.0.0")]
#[command(about = "A polite encyclopedia crawler", long_about = None)]
struct Cli {
    /// Path to the SQLite database
    #[arg(value_name = "DATABASE")]
    database: PathBuf,

    /// Number of worker/writer pairs
    #[arg(short = 't', long = "workers")]
    workers: Option<usize>,

    /// Total number of pages to store
    #[arg(short = 'c', long = "pages")]
    pages: Option<u64>,

    /// Maximum crawl depth from the entry URL
    #[arg(short = 'd', long = "depth")]
    depth: Option<u32>,

    /// Politeness interval between fetches, in milliseconds
    #[arg(short = 'i', long = "interval")]
    interval: Option<u64>,

    /// Entry URL every worker starts (and restarts) from
    #[arg(short = 'u', long = "entry-url")]
    entry_url: Option<String>,

    /// Pattern the whole host must match
    #[arg(short = 'H', long = "host-regex")]
    host_regex: Option<String>,

    /// Pattern the whole path must match, with one capture group for the title
    #[arg(short = 'P', long = "path-regex")]
    path_regex: Option<String>,

    /// Write logs to this file instead of stdout
    #[arg(short = 'l', long = "log-output", value_name = "FILE")]
    log_output: Option<PathBuf>,

    /// Path to a TOML configuration file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Show statistics from the database and exit
    #[arg(long)]
    stats: bool,
}

impl Cli {
    /// Applies command-line overrides on top of the file or default configuration
    fn apply_to(&self, config: &mut Config) {
        config.database_path = self.database.to_string_lossy().into_owned();
        if let Some(workers) = self.workers {
            config.workers = workers;
        }
        if let Some(pages) = self.pages {
            config.pages = pages;
        }
        if let Some(depth) = self.depth {
            config.depth = depth;
        }
        if let Some(interval) = self.interval {
            config.interval_ms = interval;
        }
        if let Some(entry_url) = &self.entry_url {
            config.entry_url = entry_url.clone();
        }
        if let Some(host_regex) = &self.host_regex {
            config.host_pattern = host_regex.clone();
        }
        if let Some(path_regex) = &self.path_regex {
            config.path_pattern = path_regex.clone();
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet, cli.log_output.as_deref())?;

    if cli.stats {
        return handle_stats(&cli.database);
    }

    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };
    cli.apply_to(&mut config);
    validate(&config).context("Invalid configuration")?;

    // Create the pages table up front so a bad database path fails before any fetch
    open_storage(Path::new(&config.database_path))
        .with_context(|| format!("Cannot open database {}", config.database_path))?;

    tracing::info!(
        "Crawling {} pages with {} workers, depth {}, interval {}ms",
        config.pages,
        config.workers,
        config.depth,
        config.interval_ms
    );

    let summary = run_crawl(config).await.context("Crawl failed")?;
    if summary.failed_pipelines() > 0 {
        tracing::warn!(
            "{} pipelines failed; {} pages were committed",
            summary.failed_pipelines(),
            summary.committed
        );
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// With `log_output` set, log lines go to that file without ANSI colors.
fn setup_logging(verbose: u8, quiet: bool, log_output: Option<&Path>) -> anyhow::Result<()> {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("wiki_ripple=info,warn"),
            1 => EnvFilter::new("wiki_ripple=debug,info"),
            2 => EnvFilter::new("wiki_ripple=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false);

    match log_output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Cannot open log file {}", path.display()))?;
            builder.with_ansi(false).with_writer(Mutex::new(file)).init();
        }
        None => builder.init(),
    }

    Ok(())
}

/// Handles the --stats mode: shows what the database holds
fn handle_stats(database: &Path) -> anyhow::Result<()> {
    println!("Database: {}\n", database.display());

    let storage = open_storage(database)
        .with_context(|| format!("Cannot open database {}", database.display()))?;
    let stats = load_statistics(&storage, STATS_SAMPLE)?;
    print_statistics(&stats);

    Ok(())
}
