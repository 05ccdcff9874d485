//! Persistence writer
//!
//! The writer half of a pipeline pair. It runs on the blocking pool, drains the
//! worker's bounded queue and commits pages in batches, one transaction each.
//! The worker dropping its sender is the termination signal: whatever is still
//! queued gets written, the partial batch is flushed, and the writer returns.

use crate::state::Page;
use crate::storage::{Storage, StorageResult};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Invoked once with the number of rows this writer committed
pub type CompletionCallback = Box<dyn FnOnce(u64) + Send + 'static>;

/// Outcome of one writer's run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriterReport {
    pub writer_id: usize,

    /// Rows actually inserted; titles that already existed are not counted
    pub committed: u64,

    /// True if a batch failed and the writer stopped early
    pub failed: bool,
}

/// Consumes pages from one worker and persists them
pub struct PageWriter<S: Storage> {
    id: usize,
    storage: S,
    receiver: mpsc::Receiver<Page>,
    batch_size: usize,
    on_exit: Option<CompletionCallback>,
}

impl<S: Storage + 'static> PageWriter<S> {
    pub fn new(id: usize, storage: S, receiver: mpsc::Receiver<Page>, batch_size: usize) -> Self {
        Self {
            id,
            storage,
            receiver,
            batch_size: batch_size.max(1),
            on_exit: None,
        }
    }

    /// Registers a callback receiving the committed total after a clean run
    pub fn on_exit<F>(mut self, callback: F) -> Self
    where
        F: FnOnce(u64) + Send + 'static,
    {
        self.on_exit = Some(Box::new(callback));
        self
    }

    /// Runs the writer on the blocking thread pool
    pub fn spawn(self) -> JoinHandle<WriterReport> {
        tokio::task::spawn_blocking(move || self.run())
    }

    /// Blocking writer loop
    ///
    /// Must not be called from inside an async context; use `spawn` there.
    pub fn run(mut self) -> WriterReport {
        let mut batch: Vec<Page> = Vec::with_capacity(self.batch_size);
        let mut committed: u64 = 0;
        let mut failed = false;

        while let Some(page) = self.receiver.blocking_recv() {
            batch.push(page);
            if batch.len() < self.batch_size {
                continue;
            }

            match self.commit(&mut batch) {
                Ok(inserted) => committed += inserted,
                Err(e) => {
                    failed = true;
                    tracing::error!(
                        writer = self.id,
                        "Batch commit failed, rolled back and stopping: {}",
                        e
                    );
                    break;
                }
            }
        }

        if !failed && !batch.is_empty() {
            match self.commit(&mut batch) {
                Ok(inserted) => committed += inserted,
                Err(e) => {
                    failed = true;
                    tracing::error!(writer = self.id, "Final commit failed, rolled back: {}", e);
                }
            }
        }

        // Fails any pending or future send from the paired worker
        self.receiver.close();

        if failed {
            tracing::warn!(
                writer = self.id,
                "Writer terminated after a failure, {} pages committed",
                committed
            );
        } else {
            tracing::info!(writer = self.id, "Writer finished, {} pages committed", committed);
            if let Some(callback) = self.on_exit.take() {
                callback(committed);
            }
        }

        WriterReport {
            writer_id: self.id,
            committed,
            failed,
        }
    }

    /// Writes and clears the batch; returns rows inserted
    fn commit(&mut self, batch: &mut Vec<Page>) -> StorageResult<u64> {
        let inserted = self.storage.write_batch(batch)? as u64;
        if let Some(last) = batch.last() {
            tracing::info!(
                writer = self.id,
                "Committed {} pages. Most recent one: {}",
                batch.len(),
                last.title()
            );
        }
        batch.clear();
        Ok(inserted)
    }
}
