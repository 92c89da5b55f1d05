//! CLI subcommand implementations

pub mod find;
pub mod init;
pub mod scan;
pub mod stats;
pub mod watch;

use std::path::Path;
use std::sync::{Arc, Mutex};

use crate::indexer::FsWorkspace;
use crate::indexing::{IndexingEngine, StatusSink};
use crate::symbol::SymbolIndex;
use crate::Config;

/// Engine over the local filesystem with a fresh in-memory index
pub(crate) fn open_engine(
    root: &Path,
    config: &Config,
    status: Arc<dyn StatusSink>,
) -> IndexingEngine<SymbolIndex> {
    IndexingEngine::new(
        config.indexer.clone(),
        Arc::new(FsWorkspace::new(root.to_path_buf())),
        Arc::new(Mutex::new(SymbolIndex::new())),
        status,
    )
}
