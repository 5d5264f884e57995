//! Parallel chunk processing for logtally
//!
//! This module fans chunks out to a fixed set of worker threads and gathers
//! one result per chunk back, in chunk order.
//!
//! # Module Structure
//!
//! - `types`: Pool configuration and worker messages
//! - `worker`: Worker thread loop with per-chunk panic containment
//! - `sink`: Result collection and completeness checks
//! - `processor`: Main WorkerPool orchestration

mod processor;
mod sink;
mod types;
mod worker;

// Re-export public types
pub use processor::WorkerPool;
pub use types::{default_worker_count, PoolConfig};
