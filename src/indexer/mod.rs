pub mod alias;
pub mod extractor;
pub mod module_map;
pub mod walker;

pub use alias::AliasTable;
pub use extractor::{DeclarationMatcher, Extraction, ImportMatcher, SymbolExtractor, SymbolMatcher};
pub use module_map::module_id;
pub use walker::{FsWorkspace, Workspace};
