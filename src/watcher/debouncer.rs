//! Debounce state machine for file system changes
//!
//! Creates and modifications are queued and released as one batch once no new
//! event has arrived for the debounce delay. Deletions bypass the queue.
//!
//! ```text
//! Idle --change--> Pending --change--> Pending (deadline reset)
//!                  Pending --deadline--> Flushing --done--> Idle
//! ```
//!
//! Time is passed in explicitly so transitions can be tested without timers.

use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

/// Types of file system changes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeType {
    /// File was created
    Created,
    /// File was modified
    Modified,
    /// File was deleted
    Deleted,
}

impl std::fmt::Display for ChangeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChangeType::Created => write!(f, "created"),
            ChangeType::Modified => write!(f, "modified"),
            ChangeType::Deleted => write!(f, "deleted"),
        }
    }
}

/// A file change event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileChange {
    pub path: PathBuf,
    pub change_type: ChangeType,
}

impl FileChange {
    pub fn new(path: PathBuf, change_type: ChangeType) -> Self {
        Self { path, change_type }
    }

    pub fn created(path: PathBuf) -> Self {
        Self::new(path, ChangeType::Created)
    }

    pub fn modified(path: PathBuf) -> Self {
        Self::new(path, ChangeType::Modified)
    }

    pub fn deleted(path: PathBuf) -> Self {
        Self::new(path, ChangeType::Deleted)
    }

    /// Whether the change waits for the debounce window
    pub fn is_debounced(&self) -> bool {
        !matches!(self.change_type, ChangeType::Deleted)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebounceState {
    Idle,
    Pending { deadline: Instant },
    Flushing,
}

/// What the caller must do after feeding an event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DebounceAction {
    /// The change was queued; wait for the deadline
    Queued,
    /// Remove this path from the index now
    DeleteNow(PathBuf),
}

#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    pending: Vec<PathBuf>,
    /// Mirror of `pending` for constant-time membership
    queued: HashSet<PathBuf>,
    state: DebounceState,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: Vec::new(),
            queued: HashSet::new(),
            state: DebounceState::Idle,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn state(&self) -> DebounceState {
        self.state
    }

    /// Paths waiting for the next flush, in arrival order
    pub fn pending(&self) -> &[PathBuf] {
        &self.pending
    }

    /// When the pending batch becomes due, if any
    pub fn deadline(&self) -> Option<Instant> {
        match self.state {
            DebounceState::Pending { deadline } => Some(deadline),
            _ => None,
        }
    }

    /// Feed one event observed at `now`.
    ///
    /// Deletions never touch the queue or the deadline.
    pub fn on_event(&mut self, change: FileChange, now: Instant) -> DebounceAction {
        if !change.is_debounced() {
            return DebounceAction::DeleteNow(change.path);
        }

        if self.queued.insert(change.path.clone()) {
            self.pending.push(change.path);
        }
        self.state = DebounceState::Pending {
            deadline: now + self.delay,
        };
        debug!(
            "{} change queued, {} pending",
            change.change_type,
            self.pending.len()
        );
        DebounceAction::Queued
    }

    /// Take the pending batch if its deadline has passed at `now`
    pub fn poll(&mut self, now: Instant) -> Option<Vec<PathBuf>> {
        match self.state {
            DebounceState::Pending { deadline } if now >= deadline => Some(self.take_batch()),
            _ => None,
        }
    }

    /// Take whatever is pending regardless of the deadline
    pub fn flush_now(&mut self) -> Option<Vec<PathBuf>> {
        if self.pending.is_empty() {
            return None;
        }
        Some(self.take_batch())
    }

    /// A flushed batch has been handed off. Events that arrived meanwhile keep
    /// their own pending deadline.
    pub fn finish_flush(&mut self) {
        if self.state == DebounceState::Flushing {
            self.state = DebounceState::Idle;
        }
    }

    fn take_batch(&mut self) -> Vec<PathBuf> {
        self.state = DebounceState::Flushing;
        self.queued.clear();
        std::mem::take(&mut self.pending)
    }
}
