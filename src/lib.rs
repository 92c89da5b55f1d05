pub mod cli;
pub mod commands;
pub mod config;
pub mod indexer;
pub mod indexing;
pub mod logging;
pub mod metrics;
pub mod symbol;
pub mod watcher;

pub use config::Config;
pub use indexing::{IndexingEngine, ScanMode, ScanSummary};
pub use symbol::{SymbolIndex, SymbolKind, SymbolRecord, SymbolStore};
