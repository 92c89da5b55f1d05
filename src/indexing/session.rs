//! Per-invocation scan state

use std::fmt;
use std::time::{Duration, Instant};

use super::errors::{ErrorReport, FileError};

/// How a scan treats entries already in the index
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanMode {
    /// Full scan into a fresh index; nothing is deleted first
    Fresh,
    /// Re-scan of changed files; prior entries for each path are removed first
    Incremental,
}

impl ScanMode {
    pub fn deletes_prior_entries(&self) -> bool {
        matches!(self, ScanMode::Incremental)
    }
}

impl fmt::Display for ScanMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScanMode::Fresh => write!(f, "full"),
            ScanMode::Incremental => write!(f, "incremental"),
        }
    }
}

/// State of one scan, created when it starts and consumed into a summary
#[derive(Debug)]
pub struct ScanSession {
    pub mode: ScanMode,
    pub started_at: Instant,
    pub ended_at: Option<Instant>,
    pub total_files: usize,
    pub processed_count: usize,
    pub symbols_added: usize,
    pub errors: Vec<FileError>,
}

impl ScanSession {
    pub fn start(mode: ScanMode) -> Self {
        Self {
            mode,
            started_at: Instant::now(),
            ended_at: None,
            total_files: 0,
            processed_count: 0,
            symbols_added: 0,
            errors: Vec::new(),
        }
    }

    pub fn record_success(&mut self, symbols: usize) {
        self.processed_count += 1;
        self.symbols_added += symbols;
    }

    pub fn record_failure(&mut self, error: FileError) {
        self.processed_count += 1;
        self.errors.push(error);
    }

    /// Elapsed time since the scan started, frozen once it has ended
    pub fn elapsed(&self) -> Duration {
        self.ended_at
            .unwrap_or_else(Instant::now)
            .duration_since(self.started_at)
    }

    pub fn end(&mut self) {
        if self.ended_at.is_none() {
            self.ended_at = Some(Instant::now());
        }
    }

    pub fn into_summary(mut self, symbol_count: usize, yields: usize) -> ScanSummary {
        self.end();
        let elapsed = self.elapsed();
        ScanSummary {
            mode: self.mode,
            total_files: self.total_files,
            processed: self.processed_count,
            failed: self.errors.len(),
            symbols_added: self.symbols_added,
            symbol_count,
            elapsed,
            yields,
            errors: self.errors,
        }
    }
}

/// Outcome of a finished scan
#[derive(Debug, Clone)]
pub struct ScanSummary {
    pub mode: ScanMode,
    pub total_files: usize,
    pub processed: usize,
    pub failed: usize,
    pub symbols_added: usize,
    /// Index size after the scan
    pub symbol_count: usize,
    pub elapsed: Duration,
    /// Times the scan gave control back between chunks
    pub yields: usize,
    pub errors: Vec<FileError>,
}

impl ScanSummary {
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn error_report(&self) -> ErrorReport {
        ErrorReport::from_errors(&self.errors)
    }

    pub fn summary(&self) -> String {
        if self.errors.is_empty() {
            format!(
                "Indexed {} files ({} scan), {} symbols added in {}ms",
                self.processed,
                self.mode,
                self.symbols_added,
                self.elapsed.as_millis()
            )
        } else {
            format!(
                "Indexed {} files ({} scan) with {} errors, {} symbols added in {}ms",
                self.processed,
                self.mode,
                self.failed,
                self.symbols_added,
                self.elapsed.as_millis()
            )
        }
    }
}
