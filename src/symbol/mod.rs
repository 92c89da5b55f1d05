//! Symbol records and the symbol store
//!
//! Extraction produces transient `SymbolRecord`s which are immediately handed
//! to a `SymbolStore`. `SymbolIndex` is the in-memory store used by the CLI.

pub mod index;
pub mod record;

pub use index::{SymbolIndex, SymbolStore};
pub use record::{SymbolKind, SymbolRecord};
