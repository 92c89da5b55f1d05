//! Watch command implementation
//!
//! Runs a full scan, then keeps the index current as files change.

use anyhow::Result;
use std::env;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tracing::info;

use crate::indexing::LogStatus;
use crate::watcher::{FileWatcher, WatcherHandle};
use crate::Config;

use super::open_engine;

/// Run the watch command
///
/// # Arguments
/// * `debounce_ms` - Overrides the configured debounce delay
pub async fn run(debounce_ms: Option<u64>) -> Result<()> {
    let root = env::current_dir()?;
    let config = Config::load(&root)?;
    let debounce_ms = debounce_ms.unwrap_or(config.watcher.debounce_ms);

    println!("Starting watch mode...");
    println!("Watching directory: {:?}", root);
    println!("Files: {}", config.indexer.files_to_scan);
    println!("Debounce delay: {}ms", debounce_ms);
    println!();

    let engine = Arc::new(open_engine(&root, &config, Arc::new(LogStatus)));

    // Watch before scanning so changes made during the scan are not lost
    let (tx, mut handle) = WatcherHandle::spawn(Arc::clone(&engine), Duration::from_millis(debounce_ms));
    let _watcher = FileWatcher::new(root.clone(), &config.indexer.files_to_scan)?.start(tx)?;

    let summary = engine.scan_all(true).await?;
    println!("{}", summary.summary());
    println!();
    println!("Press Ctrl+C to stop.");
    println!();

    signal::ctrl_c().await?;

    println!();
    println!("Shutting down...");
    handle.shutdown();
    let stats = handle.wait().await?;

    println!();
    println!("Watch session complete!");
    println!("----------------------------------------");
    println!("  Batches flushed: {}", stats.flushes);
    println!("  Files re-indexed: {}", stats.files_reindexed);
    println!("  Files deleted:   {}", stats.files_deleted);
    println!("  Symbols:         {}", engine.symbol_count());
    if stats.errors > 0 {
        println!("  Errors:          {}", stats.errors);
    }
    println!("----------------------------------------");

    info!("Watch session ended");

    Ok(())
}
