//! Stats command for displaying index statistics and metrics

use anyhow::Result;
use std::env;
use std::sync::Arc;

use crate::indexing::LogStatus;
use crate::metrics::{gather_metrics, MetricSnapshot};
use crate::symbol::SymbolKind;
use crate::Config;

use super::open_engine;

/// Scan the project, then print statistics.
///
/// # Arguments
/// * `prometheus` - If true, output in Prometheus text format
pub async fn run(prometheus: bool) -> Result<()> {
    let root = env::current_dir()?;
    let config = Config::load(&root)?;

    let engine = open_engine(&root, &config, Arc::new(LogStatus));
    let summary = engine.scan_all(false).await?;

    if prometheus {
        print!("{}", gather_metrics());
        return Ok(());
    }

    let (files, kinds) = {
        let index = engine.index().lock().unwrap_or_else(|e| e.into_inner());
        (index.list_files().len(), index.kind_counts())
    };
    let snapshot = MetricSnapshot::capture();

    println!("symdex Index Statistics");
    println!("=======================\n");

    println!("Index Contents:");
    println!("  Files with exports: {}", files);
    println!("  Total symbols:      {}", summary.symbol_count);
    println!("  Path aliases:       {}", engine.aliases().len());
    println!();

    println!("By Kind:");
    for kind in SymbolKind::ALL {
        if let Some(count) = kinds.get(&Some(kind)) {
            println!("  {:<10} {}", kind.as_str(), count);
        }
    }
    if let Some(count) = kinds.get(&None) {
        println!("  {:<10} {}", "imported", count);
    }
    println!();

    println!("Scan:");
    println!("  Files scanned:  {}", summary.total_files);
    println!("  Errors:         {:.0}", snapshot.file_errors_total);
    println!("  Duration:       {:.3}s", snapshot.scan_duration_avg);

    Ok(())
}
