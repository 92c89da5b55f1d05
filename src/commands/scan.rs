//! Scan command implementation
//!
//! Runs one full scan of the project and prints the summary.

use anyhow::Result;
use std::env;
use std::sync::Arc;

use crate::indexing::ProgressStatus;
use crate::Config;

use super::open_engine;

pub async fn run(notify: bool) -> Result<()> {
    let root = env::current_dir()?;
    let config = Config::load(&root)?;

    let status = Arc::new(ProgressStatus::new());
    let engine = open_engine(&root, &config, status.clone());
    let summary = engine.scan_all(notify).await?;
    status.finish();

    println!("Aliases:  {}", engine.aliases().len());
    println!("Files:    {}", summary.total_files);
    println!("Symbols:  {}", summary.symbol_count);
    println!("Elapsed:  {}ms", summary.elapsed.as_millis());

    let report = summary.error_report();
    if report.has_errors() {
        println!();
        report.print_summary();
    }

    Ok(())
}
