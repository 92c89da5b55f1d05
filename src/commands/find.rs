//! Find command: scan, then look symbols up by name

use anyhow::Result;
use std::env;
use std::sync::Arc;

use crate::indexing::LogStatus;
use crate::symbol::SymbolRecord;
use crate::Config;

use super::open_engine;

pub async fn run(query: &str, prefix: bool, limit: usize) -> Result<()> {
    let root = env::current_dir()?;
    let config = Config::load(&root)?;

    let engine = open_engine(&root, &config, Arc::new(LogStatus));
    engine.scan_all(false).await?;

    let results = {
        let index = engine.index().lock().unwrap_or_else(|e| e.into_inner());
        if prefix {
            index.find_by_prefix(query)
        } else {
            index.find_by_name(query)
        }
    };

    if results.is_empty() {
        println!("No symbols found for '{}'", query);
        return Ok(());
    }

    for record in results.iter().take(limit) {
        println!("{}", format_record(record));
    }
    if results.len() > limit {
        println!("... and {} more", results.len() - limit);
    }

    Ok(())
}

/// One line per record: name, kind, import module, declaring file
fn format_record(record: &SymbolRecord) -> String {
    let kind = record.kind.map(|k| k.as_str()).unwrap_or("import");
    let module = record.module.as_deref().unwrap_or("-");
    match &record.file_path {
        Some(path) => format!("{:<30} {:<10} {:<40} {}", record.name, kind, module, path.display()),
        None => format!("{:<30} {:<10} {}", record.name, kind, module),
    }
}
