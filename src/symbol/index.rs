//! Symbol store contract and an in-memory implementation

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::record::{SymbolKind, SymbolRecord};

/// Durable symbol store the indexing engine writes into.
///
/// The engine never reads entries back; it only adds, removes by file and
/// reports the count.
pub trait SymbolStore {
    fn add_symbol(
        &mut self,
        name: &str,
        module: Option<&str>,
        file_path: Option<&Path>,
        kind: Option<SymbolKind>,
    );

    fn delete_by_path(&mut self, file_path: &Path);

    fn symbol_count(&self) -> usize;

    /// Convenience wrapper over `add_symbol`
    fn add_record(&mut self, record: &SymbolRecord) {
        self.add_symbol(
            &record.name,
            record.module.as_deref(),
            record.file_path.as_deref(),
            record.kind,
        );
    }
}

/// In-memory index for symbol lookups
///
/// Entries are kept as added: no deduplication and no ranking.
#[derive(Debug, Default)]
pub struct SymbolIndex {
    /// Index by symbol name
    by_name: HashMap<String, Vec<SymbolRecord>>,
    /// Names contributed by each file, for deletion
    by_file: HashMap<PathBuf, Vec<String>>,
    symbol_count: usize,
}

impl SymbolIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Find symbols by exact name
    pub fn find_by_name(&self, name: &str) -> Vec<SymbolRecord> {
        self.by_name.get(name).cloned().unwrap_or_default()
    }

    /// Find symbols by case-insensitive name prefix, sorted by name
    pub fn find_by_prefix(&self, prefix: &str) -> Vec<SymbolRecord> {
        let prefix_lower = prefix.to_lowercase();
        let mut results: Vec<SymbolRecord> = self
            .by_name
            .iter()
            .filter(|(name, _)| name.to_lowercase().starts_with(&prefix_lower))
            .flat_map(|(_, records)| records.iter().cloned())
            .collect();

        results.sort_by(|a, b| a.name.cmp(&b.name));
        results
    }

    /// Get all symbols declared in a file
    pub fn get_by_file(&self, file_path: &Path) -> Vec<SymbolRecord> {
        let Some(names) = self.by_file.get(file_path) else {
            return Vec::new();
        };

        let mut seen = Vec::new();
        for name in names {
            if seen.contains(name) {
                continue;
            }
            seen.push(name.clone());
        }

        seen.iter()
            .flat_map(|name| self.by_name.get(name).into_iter().flatten())
            .filter(|record| record.file_path.as_deref() == Some(file_path))
            .cloned()
            .collect()
    }

    /// List all files with symbols
    pub fn list_files(&self) -> Vec<PathBuf> {
        self.by_file.keys().cloned().collect()
    }

    /// Count declarations per kind; imported names are counted under `None`
    pub fn kind_counts(&self) -> HashMap<Option<SymbolKind>, usize> {
        let mut counts = HashMap::new();
        for record in self.by_name.values().flatten() {
            *counts.entry(record.kind).or_insert(0) += 1;
        }
        counts
    }
}

impl SymbolStore for SymbolIndex {
    fn add_symbol(
        &mut self,
        name: &str,
        module: Option<&str>,
        file_path: Option<&Path>,
        kind: Option<SymbolKind>,
    ) {
        let record = SymbolRecord {
            name: name.to_string(),
            module: module.map(str::to_string),
            file_path: file_path.map(Path::to_path_buf),
            kind,
        };

        if let Some(path) = file_path {
            self.by_file
                .entry(path.to_path_buf())
                .or_default()
                .push(name.to_string());
        }

        self.by_name.entry(name.to_string()).or_default().push(record);
        self.symbol_count += 1;
    }

    fn delete_by_path(&mut self, file_path: &Path) {
        let Some(names) = self.by_file.remove(file_path) else {
            return;
        };

        let mut removed = 0;
        for name in names {
            if let Some(records) = self.by_name.get_mut(&name) {
                let before = records.len();
                records.retain(|r| r.file_path.as_deref() != Some(file_path));
                removed += before - records.len();

                if records.is_empty() {
                    self.by_name.remove(&name);
                }
            }
        }

        self.symbol_count -= removed;
        debug!("Removed {} symbols for {:?}", removed, file_path);
    }

    fn symbol_count(&self) -> usize {
        self.symbol_count
    }
}
