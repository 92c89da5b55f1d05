//! Drives the debouncer from a stream of file changes
//!
//! Deletions are applied to the index inline. Debounced batches are re-indexed
//! on their own task so the event loop keeps accepting changes (and
//! deletions) while a batch is being processed. At most one batch is in flight;
//! changes arriving meanwhile wait for it to finish, so an older read of a file
//! can never be committed after a newer one.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinSet;
use tokio::time::{sleep_until, Instant};
use tracing::{debug, error, info};

use crate::indexing::{IndexingEngine, ScanMode, ScanSummary};
use crate::metrics;
use crate::symbol::SymbolStore;

use super::debouncer::{DebounceAction, Debouncer, FileChange};

/// Totals for one watch session
#[derive(Debug, Default, Clone)]
pub struct WatchStats {
    /// Debounced batches handed to the engine
    pub flushes: usize,
    /// Files re-indexed across all batches
    pub files_reindexed: usize,
    /// Files removed on delete events
    pub files_deleted: usize,
    /// Files that failed to re-index
    pub errors: usize,
}

impl WatchStats {
    pub fn merge_flush(&mut self, summary: &ScanSummary) {
        self.flushes += 1;
        self.files_reindexed += summary.processed - summary.failed;
        self.errors += summary.failed;
    }
}

pub struct FileChangeCoordinator<S> {
    engine: Arc<IndexingEngine<S>>,
    debouncer: Debouncer,
    in_flight: JoinSet<ScanSummary>,
    stats: WatchStats,
}

impl<S> FileChangeCoordinator<S>
where
    S: SymbolStore + Send + 'static,
{
    pub fn new(engine: Arc<IndexingEngine<S>>, debounce: Duration) -> Self {
        Self {
            engine,
            debouncer: Debouncer::new(debounce),
            in_flight: JoinSet::new(),
            stats: WatchStats::default(),
        }
    }

    /// Process changes until shutdown is requested or the event channel
    /// closes. On close, whatever is still pending is flushed after the
    /// in-flight batch.
    pub async fn run(
        mut self,
        mut events: mpsc::Receiver<FileChange>,
        mut shutdown_rx: oneshot::Receiver<()>,
    ) -> WatchStats {
        info!("Debounce delay: {:?}", self.debouncer.delay());
        let mut flush_on_exit = false;

        loop {
            let deadline = self.debouncer.deadline();
            let wake_at = deadline.unwrap_or_else(|| Instant::now() + Duration::from_secs(3600));

            tokio::select! {
                _ = &mut shutdown_rx => {
                    info!("Shutdown signal received, stopping watcher");
                    if !self.debouncer.pending().is_empty() {
                        debug!("Dropping {} pending changes", self.debouncer.pending().len());
                    }
                    break;
                }

                maybe_change = events.recv() => match maybe_change {
                    Some(change) => self.handle(change),
                    None => {
                        debug!("Event channel closed");
                        flush_on_exit = true;
                        break;
                    }
                },

                _ = sleep_until(wake_at), if deadline.is_some() && self.in_flight.is_empty() => {
                    if let Some(batch) = self.debouncer.poll(Instant::now()) {
                        self.dispatch(batch);
                    }
                }

                Some(joined) = self.in_flight.join_next(), if !self.in_flight.is_empty() => {
                    self.complete(joined);
                }
            }
        }

        self.drain().await;
        if flush_on_exit {
            if let Some(batch) = self.debouncer.flush_now() {
                self.dispatch(batch);
                self.drain().await;
            }
        }

        self.stats
    }

    fn handle(&mut self, change: FileChange) {
        match self.debouncer.on_event(change, Instant::now()) {
            DebounceAction::Queued => {}
            DebounceAction::DeleteNow(path) => {
                self.engine.file_deleted(&path);
                self.stats.files_deleted += 1;
                info!("Removed deleted file from index: {:?}", path);
            }
        }
    }

    fn dispatch(&mut self, batch: Vec<std::path::PathBuf>) {
        info!("Re-indexing {} changed files", batch.len());
        metrics::INCREMENTAL_FLUSHES.inc();
        metrics::FLUSHED_FILES.observe(batch.len() as f64);

        let engine = Arc::clone(&self.engine);
        self.in_flight.spawn(async move {
            engine
                .process_files(batch, ScanMode::Incremental, false)
                .await
        });
        self.debouncer.finish_flush();
    }

    async fn drain(&mut self) {
        while let Some(joined) = self.in_flight.join_next().await {
            self.complete(joined);
        }
    }

    fn complete(&mut self, joined: Result<ScanSummary, tokio::task::JoinError>) {
        match joined {
            Ok(summary) => self.stats.merge_flush(&summary),
            Err(e) => {
                error!("Re-index task failed: {}", e);
                self.stats.errors += 1;
            }
        }
    }
}
