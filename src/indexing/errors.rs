//! Error taxonomy and per-scan error reporting

use std::collections::HashMap;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Recoverable failures inside the indexing core.
///
/// None of these abort a scan: manifest errors degrade to an empty alias
/// table and per-file errors skip the file.
#[derive(Debug, Error)]
pub enum IndexError {
    #[error("failed to read manifest {path:?}: {source}")]
    ManifestRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse manifest {path:?}: {source}")]
    ManifestParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to read {path:?}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("symbol store unavailable while indexing {path:?}")]
    StoreUnavailable { path: PathBuf },
}

impl IndexError {
    /// Stage a per-file error belongs to
    pub fn stage(&self) -> ProcessingStage {
        match self {
            IndexError::StoreUnavailable { .. } => ProcessingStage::Storage,
            _ => ProcessingStage::FileRead,
        }
    }
}

/// Stage where an error occurred during processing
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq)]
pub enum ProcessingStage {
    FileRead,
    Storage,
}

impl std::fmt::Display for ProcessingStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProcessingStage::FileRead => write!(f, "File Read"),
            ProcessingStage::Storage => write!(f, "Storage"),
        }
    }
}

/// Error that occurred while processing a file
#[derive(Debug, Clone)]
pub struct FileError {
    pub path: PathBuf,
    pub error: String,
    pub stage: ProcessingStage,
}

impl FileError {
    pub fn new(path: PathBuf, error: &IndexError) -> Self {
        Self {
            path,
            error: error.to_string(),
            stage: error.stage(),
        }
    }
}

/// Errors of one scan grouped by stage
pub struct ErrorReport {
    pub total_errors: usize,
    pub by_stage: HashMap<ProcessingStage, Vec<FileError>>,
    pub summary: String,
}

impl ErrorReport {
    /// Create a report from a list of errors
    pub fn from_errors(errors: &[FileError]) -> Self {
        let mut by_stage: HashMap<ProcessingStage, Vec<FileError>> = HashMap::new();

        for error in errors {
            by_stage.entry(error.stage).or_default().push(error.clone());
        }

        let summary = if errors.is_empty() {
            "No errors occurred during indexing".to_string()
        } else {
            format!("Indexing completed with {} errors", errors.len())
        };

        Self {
            total_errors: errors.len(),
            by_stage,
            summary,
        }
    }

    /// Print a summary of the errors to stdout
    pub fn print_summary(&self) {
        if self.total_errors == 0 {
            println!("✅ {}", self.summary);
            return;
        }

        println!("⚠️  {}", self.summary);
        println!();

        for (stage, errors) in &self.by_stage {
            println!("  {}: {} errors", stage, errors.len());

            // Show up to 5 examples per stage
            for error in errors.iter().take(5) {
                println!("    - {}: {}", error.path.display(), error.error);
            }

            if errors.len() > 5 {
                println!("    ... and {} more", errors.len() - 5);
            }
        }
    }

    pub fn has_errors(&self) -> bool {
        self.total_errors > 0
    }
}
