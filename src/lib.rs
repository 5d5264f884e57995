// Core library for the logtally access-log analyzer

pub mod aggregate;
pub mod analysis;
pub mod chunker;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod frequency;
pub mod generator;
pub mod input;
pub mod parallel;
pub mod parser;
pub mod report;
pub mod stats;

pub use aggregate::{aggregate, Aggregator};
pub use analysis::{AnalysisResult, AnalysisRun};
pub use chunker::{Chunk, ChunkSplitter, DEFAULT_CHUNK_BYTES};
pub use config::AnalyzerConfig;
pub use diagnostics::{DiagnosticSink, LogFacade, MemorySink};
pub use error::{AnalysisError, Result};
pub use frequency::FrequencyTable;
pub use parallel::{PoolConfig, WorkerPool};
pub use parser::{LineOutcome, LineParser};
pub use stats::ScanStats;
