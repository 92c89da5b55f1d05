//! Chunked cooperative batch processing
//!
//! Files are processed `chunk_size` at a time. Between chunks the scheduler
//! yields to the runtime so other tasks (watch events, deletions) can run; a
//! long file list never monopolises the executor in one synchronous pass.

use std::path::Path;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

use super::errors::{FileError, IndexError};

/// Files processed between two yield points
pub const FIXED_CHUNK_SIZE: usize = 50;

/// What happened during one `run`
#[derive(Debug, Clone, Default)]
pub struct BatchOutcome {
    pub total: usize,
    pub succeeded: usize,
    pub errors: Vec<FileError>,
    /// Number of times control was yielded between chunks
    pub yields: usize,
    pub elapsed: Duration,
}

impl BatchOutcome {
    pub fn processed(&self) -> usize {
        self.succeeded + self.errors.len()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct BatchScheduler {
    chunk_size: usize,
}

impl Default for BatchScheduler {
    fn default() -> Self {
        Self::new(FIXED_CHUNK_SIZE)
    }
}

impl BatchScheduler {
    pub fn new(chunk_size: usize) -> Self {
        Self {
            chunk_size: chunk_size.max(1),
        }
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Process `files` in order.
    ///
    /// `on_progress(index, total)` runs before each file. A failing `on_file`
    /// is logged and recorded, and the batch moves on. `on_complete` runs
    /// exactly once after the last file, including for an empty list.
    pub async fn run<T, F, P, C>(
        &self,
        files: &[T],
        mut on_file: F,
        mut on_progress: P,
        on_complete: C,
    ) -> BatchOutcome
    where
        T: AsRef<Path>,
        F: FnMut(&Path) -> Result<(), IndexError>,
        P: FnMut(usize, usize),
        C: FnOnce(&BatchOutcome),
    {
        let start = Instant::now();
        let total = files.len();
        let mut outcome = BatchOutcome {
            total,
            ..Default::default()
        };

        for (chunk_idx, chunk) in files.chunks(self.chunk_size).enumerate() {
            if chunk_idx > 0 {
                tokio::task::yield_now().await;
                outcome.yields += 1;
            }

            for (offset, file) in chunk.iter().enumerate() {
                let index = chunk_idx * self.chunk_size + offset;
                let path = file.as_ref();
                on_progress(index, total);

                match on_file(path) {
                    Ok(()) => outcome.succeeded += 1,
                    Err(e) => {
                        warn!("Failed to load file {:?}: {}", path, e);
                        outcome.errors.push(FileError::new(path.to_path_buf(), &e));
                    }
                }
            }
        }

        outcome.elapsed = start.elapsed();
        debug!(
            "Batch of {} files done in {:?} ({} yields, {} errors)",
            total,
            outcome.elapsed,
            outcome.yields,
            outcome.errors.len()
        );

        on_complete(&outcome);
        outcome
    }
}
