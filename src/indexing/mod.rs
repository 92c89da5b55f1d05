//! Scan orchestration: chunked scheduling, scan sessions and the engine

pub mod engine;
pub mod errors;
pub mod scheduler;
pub mod session;
pub mod status;

pub use engine::IndexingEngine;
pub use errors::{ErrorReport, FileError, IndexError, ProcessingStage};
pub use scheduler::{BatchOutcome, BatchScheduler, FIXED_CHUNK_SIZE};
pub use session::{ScanMode, ScanSession, ScanSummary};
pub use status::{LogStatus, ProgressStatus, StatusSink};
