use anyhow::Result;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use symdex::indexer::FsWorkspace;
use symdex::indexing::LogStatus;
use symdex::{Config, IndexingEngine, SymbolIndex};
use tempfile::TempDir;

pub struct TestHarness {
    pub temp_dir: TempDir,
    pub config: Config,
}

impl TestHarness {
    pub fn new() -> Result<Self> {
        Ok(Self {
            temp_dir: TempDir::new()?,
            config: Config::default(),
        })
    }

    /// Harness with a tsconfig.json mapping `*` to `src/*`
    pub fn with_src_alias() -> Result<Self> {
        let harness = Self::new()?;
        harness.create_test_file(
            "tsconfig.json",
            r#"{ "compilerOptions": { "baseUrl": ".", "paths": { "*": ["src/*"] } } }"#,
        )?;
        Ok(harness)
    }

    pub fn create_test_file(&self, path: &str, content: &str) -> Result<PathBuf> {
        let file_path = self.temp_dir.path().join(path);
        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&file_path, content)?;
        Ok(file_path)
    }

    pub fn remove_test_file(&self, path: &str) -> Result<PathBuf> {
        let file_path = self.temp_dir.path().join(path);
        std::fs::remove_file(&file_path)?;
        Ok(file_path)
    }

    /// A fresh engine over the harness directory
    pub fn engine(&self) -> Arc<IndexingEngine<SymbolIndex>> {
        Arc::new(IndexingEngine::new(
            self.config.indexer.clone(),
            Arc::new(FsWorkspace::new(self.path().to_path_buf())),
            Arc::new(Mutex::new(SymbolIndex::new())),
            Arc::new(LogStatus),
        ))
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }
}
