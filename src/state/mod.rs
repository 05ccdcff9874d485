//! State module for the crawl pipelines
//!
//! # Components
//!
//! - `Page`: an extracted article, produced by a worker and consumed by its writer
//! - `VisitedSet`: the process-wide set of canonical URLs already processed
//! - `WorkerState`: the explicit state of one crawl worker's loop

mod page;
mod visited;
mod worker_state;

// Re-export main types
pub use page::{join_column, split_column, Page, LAST_MODIFY_FORMAT};
pub use visited::VisitedSet;
pub use worker_state::{WorkerExit, WorkerState};
