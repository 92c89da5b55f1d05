//! Symbol records produced by extraction

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Kind of a locally declared export
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SymbolKind {
    Class,
    Type,
    Interface,
    Function,
    Let,
    Var,
    Const,
    Enum,
}

impl SymbolKind {
    pub const ALL: [SymbolKind; 8] = [
        SymbolKind::Class,
        SymbolKind::Type,
        SymbolKind::Interface,
        SymbolKind::Function,
        SymbolKind::Let,
        SymbolKind::Var,
        SymbolKind::Const,
        SymbolKind::Enum,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SymbolKind::Class => "class",
            SymbolKind::Type => "type",
            SymbolKind::Interface => "interface",
            SymbolKind::Function => "function",
            SymbolKind::Let => "let",
            SymbolKind::Var => "var",
            SymbolKind::Const => "const",
            SymbolKind::Enum => "enum",
        }
    }
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SymbolKind {
    type Err = String;

    /// Parses a declaration keyword. `abstract class` (with any whitespace run
    /// between the words) maps to `Class`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let keyword = s.split_whitespace().last().unwrap_or("");
        SymbolKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == keyword)
            .ok_or_else(|| format!("unknown symbol kind: {}", s))
    }
}

/// A single symbol fact handed to the index
///
/// Declarations carry `kind` and `file_path`; symbols learned from imports of
/// external modules carry only `module`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolRecord {
    pub name: String,
    pub module: Option<String>,
    pub file_path: Option<PathBuf>,
    pub kind: Option<SymbolKind>,
}

impl SymbolRecord {
    /// A locally declared export. `module` is filled in by the caller.
    pub fn declaration(name: impl Into<String>, kind: SymbolKind) -> Self {
        Self {
            name: name.into(),
            module: None,
            file_path: None,
            kind: Some(kind),
        }
    }

    /// A name known to exist in an external module
    pub fn imported(name: impl Into<String>, module: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            module: Some(module.into()),
            file_path: None,
            kind: None,
        }
    }

    pub fn is_declaration(&self) -> bool {
        self.kind.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_round_trips_through_str() {
        for kind in SymbolKind::ALL {
            assert_eq!(kind.as_str().parse::<SymbolKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_abstract_class_parses_as_class() {
        assert_eq!("abstract class".parse::<SymbolKind>().unwrap(), SymbolKind::Class);
        assert_eq!("abstract   class".parse::<SymbolKind>().unwrap(), SymbolKind::Class);
        assert!("struct".parse::<SymbolKind>().is_err());
    }

    #[test]
    fn test_record_constructors() {
        let decl = SymbolRecord::declaration("Foo", SymbolKind::Class);
        assert!(decl.is_declaration());
        assert!(decl.module.is_none());

        let import = SymbolRecord::imported("Observable", "rxjs");
        assert!(!import.is_declaration());
        assert_eq!(import.module.as_deref(), Some("rxjs"));
        assert!(import.file_path.is_none());
    }
}
