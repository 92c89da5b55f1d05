//! Path-alias resolution from the project manifest
//!
//! Only the wildcard entry `compilerOptions.paths["*"]` of a `tsconfig.json`
//! style manifest is consumed. Each declared pattern becomes an absolute,
//! forward-slash directory prefix ending in `/`, so prefix matching never
//! confuses `src/` with a sibling such as `src2/`.

use serde_json::Value;
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::indexing::errors::IndexError;

/// Ordered list of module-root prefixes. Order is declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AliasTable {
    prefixes: Vec<String>,
}

impl AliasTable {
    /// The "no aliasing configured" state
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a table directly from already-normalized prefixes
    pub fn from_prefixes<I, S>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            prefixes: prefixes.into_iter().map(Into::into).collect(),
        }
    }

    /// Load `<root>/<manifest_name>`.
    ///
    /// A missing or malformed manifest is not an error; it yields an empty table.
    pub fn load(root: &Path, manifest_name: &str) -> Self {
        let manifest_path = root.join(manifest_name);

        match read_manifest(&manifest_path) {
            Ok(manifest) => {
                let table = Self::from_manifest(root, Some(&manifest));
                info!(
                    "Loaded {} path alias(es) from {:?}",
                    table.len(),
                    manifest_path
                );
                table
            }
            Err(IndexError::ManifestRead { .. }) => {
                debug!("No manifest at {:?}, path aliasing disabled", manifest_path);
                Self::empty()
            }
            Err(e) => {
                warn!("{}, path aliasing disabled", e);
                Self::empty()
            }
        }
    }

    /// Parse manifest text. Invalid JSON degrades to an empty table.
    pub fn from_manifest_str(root: &Path, text: &str) -> Self {
        match serde_json::from_str::<Value>(text) {
            Ok(manifest) => Self::from_manifest(root, Some(&manifest)),
            Err(e) => {
                warn!("Ignoring malformed manifest: {}", e);
                Self::empty()
            }
        }
    }

    /// Extract the wildcard alias list from a parsed manifest
    pub fn from_manifest(root: &Path, manifest: Option<&Value>) -> Self {
        let patterns = manifest
            .and_then(|m| m.get("compilerOptions"))
            .and_then(|c| c.get("paths"))
            .and_then(|p| p.get("*"))
            .and_then(Value::as_array);

        let Some(patterns) = patterns else {
            return Self::empty();
        };

        let prefixes = patterns
            .iter()
            .filter_map(Value::as_str)
            .map(|pattern| resolve_prefix(root, pattern))
            .collect();

        Self { prefixes }
    }

    pub fn prefixes(&self) -> &[String] {
        &self.prefixes
    }

    pub fn len(&self) -> usize {
        self.prefixes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prefixes.is_empty()
    }
}

fn read_manifest(path: &Path) -> Result<Value, IndexError> {
    let text = fs::read_to_string(path).map_err(|source| IndexError::ManifestRead {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_str(&text).map_err(|source| IndexError::ManifestParse {
        path: path.to_path_buf(),
        source,
    })
}

/// Resolve `pattern` against `root`, drop its final segment and return the
/// directory prefix with forward slashes and a trailing `/`.
///
/// Resolution is lexical: `.` and `..` are folded without touching the disk.
pub fn resolve_prefix(root: &Path, pattern: &str) -> String {
    let pattern = pattern.replace('\\', "/");
    let joined = if is_absolute(&pattern) {
        pattern
    } else {
        format!("{}/{}", root.to_string_lossy().replace('\\', "/"), pattern)
    };

    let mut segments: Vec<&str> = Vec::new();
    for (i, segment) in joined.split('/').enumerate() {
        match segment {
            "" if i == 0 => segments.push(segment),
            "" | "." => {}
            ".." => {
                if segments.len() > 1 {
                    segments.pop();
                }
            }
            _ => segments.push(segment),
        }
    }

    // Replace the trailing segment (usually the `*` wildcard) with nothing
    if segments.len() > 1 {
        segments.pop();
    }

    let mut prefix = segments.join("/");
    if !prefix.ends_with('/') {
        prefix.push('/');
    }
    prefix
}

fn is_absolute(path: &str) -> bool {
    if path.starts_with('/') {
        return true;
    }
    let bytes = path.as_bytes();
    bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}
