//! Concurrent batch fan-out and global chronological ordering.
//!
//! One worker per document, bounded by a semaphore; workers share nothing
//! mutable and report their event lists back through the join set. Results
//! are collected in completion order, then sorted once by the date sort
//! key, so inter-document scheduling never affects the final order.

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{info, warn};

use chronolex_core::Config;
use chronolex_core::date;
use chronolex_core::event::TimelineEvent;

use crate::document::DocumentPipeline;
use crate::input::DocumentSource;

/// Result of a batch run.
///
/// `files_processed` counts every document handed to a worker; documents
/// that yielded zero events (legitimately empty or degraded) are not
/// distinguished here.
pub struct BatchOutcome {
    pub events: Vec<TimelineEvent>,
    pub files_processed: usize,
}

/// Fans the document pipeline out across a file set.
pub struct BatchCoordinator {
    pipeline: Arc<DocumentPipeline>,
    source: Arc<DocumentSource>,
    max_workers: usize,
    sort_chronologically: bool,
    completed: Arc<AtomicUsize>,
}

impl BatchCoordinator {
    pub fn new(config: &Config, pipeline: Arc<DocumentPipeline>, source: Arc<DocumentSource>) -> Self {
        Self {
            pipeline,
            source,
            max_workers: config.processing.max_workers,
            sort_chronologically: config.output.sort_chronologically,
            completed: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Completed-document count; increases monotonically during a run.
    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::Relaxed)
    }

    /// Process every file concurrently and merge the results into a single
    /// chronologically sorted event list.
    ///
    /// Each document is failure-isolated: a worker that dies is logged and
    /// contributes zero events, and the batch always completes.
    pub async fn process(&self, files: Vec<PathBuf>) -> BatchOutcome {
        let files_processed = files.len();
        let semaphore = Arc::new(Semaphore::new(self.max_workers));
        let mut workers = JoinSet::new();

        for path in files {
            let semaphore = semaphore.clone();
            let pipeline = self.pipeline.clone();
            let source = self.source.clone();
            let completed = self.completed.clone();
            workers.spawn(async move {
                let Ok(_permit) = semaphore.acquire_owned().await else {
                    return Vec::new();
                };
                let events = pipeline.process_file(&source, &path).await;
                completed.fetch_add(1, Ordering::Relaxed);
                events
            });
        }

        let mut events = Vec::new();
        while let Some(joined) = workers.join_next().await {
            match joined {
                Ok(mut doc_events) => events.append(&mut doc_events),
                Err(error) => warn!(%error, "document worker failed"),
            }
        }

        if self.sort_chronologically {
            // Stable sort: unparseable dates share the sentinel key and
            // keep their relative order at the front.
            events.sort_by_key(|e| date::sort_key(&e.date));
        }

        info!(
            files = files_processed,
            events = events.len(),
            "batch complete"
        );
        BatchOutcome {
            events,
            files_processed,
        }
    }
}
