//! The indexing orchestrator
//!
//! Ties enumeration, extraction, module mapping and the batch scheduler
//! together and pushes every produced record into the symbol store.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, info};

use crate::config::IndexerConfig;
use crate::indexer::{AliasTable, SymbolExtractor, Workspace};
use crate::metrics;
use crate::symbol::SymbolStore;

use super::errors::IndexError;
use super::scheduler::BatchScheduler;
use super::session::{ScanMode, ScanSession, ScanSummary};
use super::status::{completion_text, progress_text, summary_text, StatusSink};

pub struct IndexingEngine<S> {
    config: IndexerConfig,
    workspace: Arc<dyn Workspace>,
    aliases: AliasTable,
    extractor: SymbolExtractor,
    scheduler: BatchScheduler,
    index: Arc<Mutex<S>>,
    status: Arc<dyn StatusSink>,
}

impl<S: SymbolStore> IndexingEngine<S> {
    /// Create an engine, loading path aliases from the workspace manifest
    pub fn new(
        config: IndexerConfig,
        workspace: Arc<dyn Workspace>,
        index: Arc<Mutex<S>>,
        status: Arc<dyn StatusSink>,
    ) -> Self {
        let aliases = AliasTable::load(workspace.root(), &config.manifest);
        Self::with_aliases(config, workspace, aliases, index, status)
    }

    pub fn with_aliases(
        config: IndexerConfig,
        workspace: Arc<dyn Workspace>,
        aliases: AliasTable,
        index: Arc<Mutex<S>>,
        status: Arc<dyn StatusSink>,
    ) -> Self {
        let scheduler = BatchScheduler::new(config.chunk_size);
        Self {
            config,
            workspace,
            aliases,
            extractor: SymbolExtractor::new(),
            scheduler,
            index,
            status,
        }
    }

    pub fn index(&self) -> &Arc<Mutex<S>> {
        &self.index
    }

    pub fn aliases(&self) -> &AliasTable {
        &self.aliases
    }

    pub fn config(&self) -> &IndexerConfig {
        &self.config
    }

    /// Enumerate every file matching the configured glob and index it into a
    /// fresh index.
    ///
    /// Fails only if enumeration itself fails (e.g. an invalid glob).
    pub async fn scan_all(&self, show_notification: bool) -> Result<ScanSummary> {
        let session = ScanSession::start(ScanMode::Fresh);

        let files = self
            .workspace
            .find_files(
                &self.config.files_to_scan,
                &self.config.exclude,
                self.config.max_files,
            )
            .with_context(|| format!("Failed to enumerate {}", self.config.files_to_scan))?;

        info!("Full scan: {} files found", files.len());
        Ok(self.run_session(session, files, show_notification).await)
    }

    /// Index an explicit file set
    pub async fn process_files(
        &self,
        files: Vec<PathBuf>,
        mode: ScanMode,
        show_notification: bool,
    ) -> ScanSummary {
        self.run_session(ScanSession::start(mode), files, show_notification)
            .await
    }

    async fn run_session(
        &self,
        mut session: ScanSession,
        files: Vec<PathBuf>,
        show_notification: bool,
    ) -> ScanSummary {
        let files: Vec<PathBuf> = files.into_iter().filter(|f| self.is_indexable(f)).collect();
        session.total_files = files.len();
        let mode = session.mode;
        let mut symbols_added = Vec::with_capacity(files.len());

        let outcome = self
            .scheduler
            .run(
                &files,
                |path| {
                    symbols_added.push(self.process_file(path, mode)?);
                    Ok(())
                },
                |i, total| self.status.set_status(&progress_text(i, total)),
                |_| {
                    session.end();
                    self.print_summary();
                    if show_notification {
                        self.status.notify(&completion_text(session.elapsed()));
                    }
                },
            )
            .await;

        for added in symbols_added {
            session.record_success(added);
        }
        for error in &outcome.errors {
            session.record_failure(error.clone());
            metrics::FILE_ERRORS.inc();
        }

        let summary = session.into_summary(self.symbol_count(), outcome.yields);
        metrics::SCAN_DURATION.observe(summary.elapsed.as_secs_f64());
        info!("{}", summary.summary());
        summary
    }

    /// Read, extract and store one file. Returns the number of records added.
    pub fn process_file(&self, path: &Path, mode: ScanMode) -> Result<usize, IndexError> {
        let text = self.workspace.read_text(path)?;
        self.index_text(path, &text, mode)
    }

    /// Extract and store already-read file text
    pub fn index_text(&self, path: &Path, text: &str, mode: ScanMode) -> Result<usize, IndexError> {
        let extraction = self.extractor.extract_file(path, text, &self.aliases);

        let mut index = self.index.lock().map_err(|_| IndexError::StoreUnavailable {
            path: path.to_path_buf(),
        })?;

        if mode.deletes_prior_entries() {
            index.delete_by_path(path);
        }
        for record in extraction.records() {
            index.add_record(record);
        }
        drop(index);

        metrics::FILES_INDEXED.inc();
        debug!(
            "{:?}: {} declarations, {} imports",
            path,
            extraction.declarations.len(),
            extraction.imports.len()
        );
        Ok(extraction.len())
    }

    /// Remove a deleted file's entries right away and refresh the summary
    pub fn file_deleted(&self, path: &Path) {
        self.store().delete_by_path(path);
        metrics::FILES_DELETED.inc();
        debug!("Removed deleted file from index: {:?}", path);
        self.print_summary();
    }

    /// Publish `Symbols: N` and return N
    pub fn print_summary(&self) -> usize {
        let count = self.symbol_count();
        metrics::SYMBOLS.set(count as f64);
        self.status.set_status(&summary_text(count));
        count
    }

    pub fn symbol_count(&self) -> usize {
        self.store().symbol_count()
    }

    /// Whether a path survives the ignored-segment filter
    pub fn is_indexable(&self, path: &Path) -> bool {
        let path_str = path.to_string_lossy();
        !self
            .config
            .ignored_segments
            .iter()
            .any(|segment| path_str.contains(segment.as_str()))
    }

    /// Lock the store. A poisoned lock still holds a consistent store because
    /// every mutation is a single call on the store.
    fn store(&self) -> std::sync::MutexGuard<'_, S> {
        self.index.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
