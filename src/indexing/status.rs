//! Status side channel
//!
//! The engine reports progress (`processing i/total`), the symbol count
//! (`Symbols: N`) and an optional end-of-scan notification. Who renders them
//! is up to the sink.

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use tracing::{debug, info};

pub trait StatusSink: Send + Sync {
    /// Replace the current status text
    fn set_status(&self, text: &str);

    /// Show a one-off notification
    fn notify(&self, message: &str);
}

/// Status text for batch progress. `index` is zero-based.
pub fn progress_text(index: usize, total: usize) -> String {
    format!("processing {}/{}", index, total)
}

pub fn summary_text(symbol_count: usize) -> String {
    format!("Symbols: {}", symbol_count)
}

pub fn completion_text(elapsed: Duration) -> String {
    format!("cache creation complete - ({}ms)", elapsed.as_millis())
}

/// Routes status updates to the log
#[derive(Debug, Default, Clone, Copy)]
pub struct LogStatus;

impl StatusSink for LogStatus {
    fn set_status(&self, text: &str) {
        debug!("{}", text);
    }

    fn notify(&self, message: &str) {
        info!("{}", message);
    }
}

/// Draws status updates on a terminal spinner
pub struct ProgressStatus {
    bar: ProgressBar,
}

impl ProgressStatus {
    pub fn new() -> Self {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} [{elapsed_precise}] {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.enable_steady_tick(Duration::from_millis(100));
        Self { bar }
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl Default for ProgressStatus {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusSink for ProgressStatus {
    fn set_status(&self, text: &str) {
        self.bar.set_message(text.to_string());
    }

    fn notify(&self, message: &str) {
        self.bar.println(message);
    }
}
