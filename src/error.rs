//! Error taxonomy for an analysis run.
//!
//! Only fatal conditions live here. Malformed lines are recovered inside the
//! parser and never surface as an `AnalysisError`.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalysisError {
    /// The source file could not be opened or inspected.
    #[error("cannot open '{}': {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Reading the source failed part-way through.
    #[error("read failed at byte offset {offset}: {source}")]
    Read {
        offset: u64,
        #[source]
        source: std::io::Error,
    },

    /// A worker panicked while parsing a chunk.
    #[error("worker {worker_id} failed while parsing chunk {chunk_id}: {reason}")]
    WorkerFailed {
        worker_id: usize,
        chunk_id: u64,
        reason: String,
    },

    /// A worker thread died outside of chunk processing.
    #[error("worker {worker_id} terminated unexpectedly: {reason}")]
    WorkerLost { worker_id: usize, reason: String },

    /// A chunk was dispatched but no result came back for it.
    #[error("chunk {chunk_id} was dispatched but produced no result")]
    MissingResult { chunk_id: u64 },

    #[error("failed to spawn worker thread: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("invalid extraction pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl AnalysisError {
    /// True for failures caused by the input file rather than by the analyzer.
    pub fn is_io(&self) -> bool {
        matches!(self, AnalysisError::Open { .. } | AnalysisError::Read { .. })
    }
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
