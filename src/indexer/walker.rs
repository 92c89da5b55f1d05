use anyhow::{Context, Result};
use glob::Pattern;
use ignore::WalkBuilder;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::indexing::errors::IndexError;

/// Host facilities the indexing engine needs: file enumeration and reads
pub trait Workspace: Send + Sync {
    /// Root directory that relative globs are evaluated against
    fn root(&self) -> &Path;

    /// Enumerate files matching `include` but not `exclude`, at most `max`
    fn find_files(&self, include: &str, exclude: &str, max: usize) -> Result<Vec<PathBuf>>;

    /// Read a file as UTF-8 text
    fn read_text(&self, path: &Path) -> Result<String, IndexError>;
}

/// Workspace backed by the local filesystem
#[derive(Debug, Clone)]
pub struct FsWorkspace {
    root: PathBuf,
}

impl FsWorkspace {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Path relative to the root with forward slashes, for glob matching
    fn relative(&self, path: &Path) -> String {
        path.strip_prefix(&self.root)
            .unwrap_or(path)
            .to_string_lossy()
            .replace('\\', "/")
    }
}

impl Workspace for FsWorkspace {
    fn root(&self) -> &Path {
        &self.root
    }

    fn find_files(&self, include: &str, exclude: &str, max: usize) -> Result<Vec<PathBuf>> {
        let include = Pattern::new(include)
            .with_context(|| format!("Invalid include pattern: {}", include))?;
        let exclude = Pattern::new(exclude)
            .with_context(|| format!("Invalid exclude pattern: {}", exclude))?;

        let mut builder = WalkBuilder::new(&self.root);

        // Enumeration is glob-driven, not VCS-driven
        builder.git_ignore(false);
        builder.git_global(false);
        builder.git_exclude(false);
        builder.ignore(false);
        builder.hidden(false);
        builder.sort_by_file_name(|a, b| a.cmp(b));

        let root = self.root.clone();
        let dir_exclude = exclude.clone();
        builder.filter_entry(move |entry| {
            let is_dir = entry.file_type().map(|ft| ft.is_dir()).unwrap_or(false);
            if !is_dir || entry.path() == root {
                return true;
            }
            let rel = entry
                .path()
                .strip_prefix(&root)
                .unwrap_or(entry.path())
                .to_string_lossy()
                .replace('\\', "/");
            !dir_exclude.matches(&format!("{}/", rel))
        });

        let files: Vec<PathBuf> = builder
            .build()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().map(|ft| ft.is_file()).unwrap_or(false))
            .filter(|entry| {
                let rel = self.relative(entry.path());
                include.matches(&rel) && !exclude.matches(&rel)
            })
            .take(max)
            .map(|entry| entry.into_path())
            .collect();

        debug!("Enumerated {} files under {:?}", files.len(), self.root);
        Ok(files)
    }

    fn read_text(&self, path: &Path) -> Result<String, IndexError> {
        fs::read_to_string(path).map_err(|source| IndexError::FileRead {
            path: path.to_path_buf(),
            source,
        })
    }
}
