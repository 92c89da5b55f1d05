//! File system watcher for incremental re-indexing
//!
//! `FileWatcher` turns raw notify events into `FileChange`s for files
//! matching the configured glob. `FileChangeCoordinator` consumes them.

pub mod coordinator;
pub mod debouncer;

use anyhow::{Context, Result};
use glob::Pattern;
use notify::event::{ModifyKind, RenameMode};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, info};

pub use coordinator::{FileChangeCoordinator, WatchStats};

use crate::indexing::IndexingEngine;
use crate::symbol::SymbolStore;

/// Capacity of the change channel between the OS watcher and the coordinator
pub const EVENT_CHANNEL_CAPACITY: usize = 1024;
pub use debouncer::{ChangeType, DebounceAction, DebounceState, Debouncer, FileChange};

/// Bridges notify events onto a channel of `FileChange`s
pub struct FileWatcher {
    root: PathBuf,
    include: Pattern,
}

impl FileWatcher {
    /// Watch `root` for files matching `files_to_scan`
    pub fn new(root: PathBuf, files_to_scan: &str) -> Result<Self> {
        let include = Pattern::new(files_to_scan)
            .with_context(|| format!("Invalid watch pattern: {}", files_to_scan))?;
        Ok(Self { root, include })
    }

    /// Start the OS watcher. Events are forwarded to `tx` until the returned
    /// watcher is dropped.
    pub fn start(self, tx: mpsc::Sender<FileChange>) -> Result<RecommendedWatcher> {
        let root = self.root.clone();
        let mut watcher = notify::recommended_watcher(
            move |result: std::result::Result<Event, notify::Error>| match result {
                Ok(event) => {
                    for change in self.convert_event(&event) {
                        if let Err(e) = tx.blocking_send(change) {
                            error!("Failed to send file change: {}", e);
                        }
                    }
                }
                Err(e) => error!("Watch error: {}", e),
            },
        )
        .with_context(|| "Failed to create file watcher")?;

        watcher
            .watch(&root, RecursiveMode::Recursive)
            .with_context(|| format!("Failed to watch directory: {:?}", root))?;

        info!("Watching directory: {:?}", root);
        Ok(watcher)
    }

    /// Convert a notify event to our FileChange type
    pub fn convert_event(&self, event: &Event) -> Vec<FileChange> {
        let changes: Vec<FileChange> = match event.kind {
            EventKind::Create(_) => self.changes(&event.paths, ChangeType::Created),
            EventKind::Remove(_) => self.changes(&event.paths, ChangeType::Deleted),
            EventKind::Modify(ModifyKind::Name(RenameMode::Both)) if event.paths.len() == 2 => {
                let mut changes = self.changes(&event.paths[..1], ChangeType::Deleted);
                changes.extend(self.changes(&event.paths[1..], ChangeType::Created));
                changes
            }
            EventKind::Modify(ModifyKind::Name(RenameMode::From)) => {
                self.changes(&event.paths, ChangeType::Deleted)
            }
            EventKind::Modify(ModifyKind::Name(RenameMode::To)) => {
                self.changes(&event.paths, ChangeType::Created)
            }
            EventKind::Modify(_) => self.changes(&event.paths, ChangeType::Modified),
            _ => Vec::new(),
        };

        for change in &changes {
            debug!("File change detected: {} -> {:?}", change.change_type, change.path);
        }
        changes
    }

    fn changes(&self, paths: &[PathBuf], change_type: ChangeType) -> Vec<FileChange> {
        paths
            .iter()
            .filter(|path| change_type == ChangeType::Deleted || !path.is_dir())
            .filter(|path| self.should_watch(path))
            .map(|path| FileChange::new(path.clone(), change_type))
            .collect()
    }

    /// Check if a path matches the watch glob
    fn should_watch(&self, path: &Path) -> bool {
        let rel = path
            .strip_prefix(&self.root)
            .unwrap_or(path)
            .to_string_lossy()
            .replace('\\', "/");
        self.include.matches(&rel)
    }
}

/// Handle to control a running coordinator task
pub struct WatcherHandle {
    shutdown_tx: Option<oneshot::Sender<()>>,
    task: Option<tokio::task::JoinHandle<WatchStats>>,
}

impl WatcherHandle {
    /// Spawn a coordinator for `engine`. Changes sent on the returned sender
    /// are applied from now on, including while a scan is still running.
    pub fn spawn<S>(engine: Arc<IndexingEngine<S>>, debounce: Duration) -> (mpsc::Sender<FileChange>, Self)
    where
        S: SymbolStore + Send + 'static,
    {
        let (tx, rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let task = tokio::spawn(FileChangeCoordinator::new(engine, debounce).run(rx, shutdown_rx));
        (tx, Self::new(shutdown_tx, task))
    }

    pub fn new(shutdown_tx: oneshot::Sender<()>, task: tokio::task::JoinHandle<WatchStats>) -> Self {
        Self {
            shutdown_tx: Some(shutdown_tx),
            task: Some(task),
        }
    }

    /// Request graceful shutdown
    pub fn shutdown(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }

    /// Wait for the coordinator to finish and get the final stats
    pub async fn wait(mut self) -> Result<WatchStats> {
        match self.task.take() {
            Some(task) => task.await.with_context(|| "Watcher task panicked"),
            None => Ok(WatchStats::default()),
        }
    }
}
