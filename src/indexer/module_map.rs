//! Mapping of file paths to import module ids

use std::path::Path;

use super::alias::AliasTable;

/// Normalize a path to forward slashes
pub fn normalize_separators(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Drop everything from the first `.` of the final path segment, so
/// `types.d.ts` and `circle.spec.ts` both lose their whole suffix.
///
/// Only a `.` after the last `/` counts, so dotted directory names such as
/// `/proj/v1.2/readme` are left alone.
pub fn strip_extension(path: &str) -> &str {
    let name_start = path.rfind('/').map(|i| i + 1).unwrap_or(0);
    match path[name_start..].find('.') {
        Some(dot) if name_start + dot > 0 => &path[..name_start + dot],
        _ => path,
    }
}

/// Compute the module id importers should use for `file_path`.
///
/// Aliases are tried in declaration order and the first literal prefix match
/// wins, even when a later alias is longer. `None` means the file is only
/// reachable by its filesystem path.
pub fn module_id(file_path: &Path, aliases: &AliasTable) -> Option<String> {
    let normalized = normalize_separators(file_path);
    let stem = strip_extension(&normalized);

    aliases
        .prefixes()
        .iter()
        .find_map(|prefix| stem.strip_prefix(prefix.as_str()))
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(prefixes: &[&str]) -> AliasTable {
        AliasTable::from_prefixes(prefixes.iter().copied())
    }

    #[test]
    fn test_suffix_after_prefix() {
        let aliases = table(&["/proj/src/"]);
        assert_eq!(
            module_id(Path::new("/proj/src/app/models/user.ts"), &aliases).as_deref(),
            Some("app/models/user")
        );
    }

    #[test]
    fn test_first_declared_alias_wins() {
        let aliases = table(&["/proj/", "/proj/src/"]);
        assert_eq!(
            module_id(Path::new("/proj/src/foo.ts"), &aliases).as_deref(),
            Some("src/foo")
        );

        let reversed = table(&["/proj/src/", "/proj/"]);
        assert_eq!(
            module_id(Path::new("/proj/src/foo.ts"), &reversed).as_deref(),
            Some("foo")
        );
    }

    #[test]
    fn test_no_match_is_none() {
        let aliases = table(&["/proj/src/"]);
        assert!(module_id(Path::new("/proj/src2/foo.ts"), &aliases).is_none());
        assert!(module_id(Path::new("/proj/src/foo.ts"), &AliasTable::empty()).is_none());
    }

    #[test]
    fn test_dotted_directory_not_truncated() {
        assert_eq!(strip_extension("/proj/v1.2/readme"), "/proj/v1.2/readme");
        assert_eq!(strip_extension("/proj/v1.2/index.ts"), "/proj/v1.2/index");

        let aliases = table(&["/proj/"]);
        assert_eq!(
            module_id(Path::new("/proj/lib.d/core"), &aliases).as_deref(),
            Some("lib.d/core")
        );
    }

    #[test]
    fn test_whole_suffix_dropped_from_first_dot() {
        assert_eq!(strip_extension("/proj/types.d.ts"), "/proj/types");
        assert_eq!(strip_extension("relative.ts"), "relative");

        let aliases = table(&["/proj/src/"]);
        assert_eq!(
            module_id(Path::new("/proj/src/lib/types.d.ts"), &aliases).as_deref(),
            Some("lib/types")
        );
        assert_eq!(
            module_id(Path::new("/proj/src/shapes/circle.spec.ts"), &aliases).as_deref(),
            Some("shapes/circle")
        );
    }

    #[test]
    fn test_backslash_paths_normalized() {
        let aliases = table(&["C:/proj/src/"]);
        assert_eq!(
            module_id(Path::new("C:\\proj\\src\\util\\math.ts"), &aliases).as_deref(),
            Some("util/math")
        );
    }
}
