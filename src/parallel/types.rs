//! Type definitions for parallel processing
//!
//! Contains pool configuration and the messages workers send back.

/// Default worker count: one less than the available cores, leaving room for
/// the thread that reads the file, but never fewer than one.
pub fn default_worker_count() -> usize {
    num_cpus::get().saturating_sub(1).max(1)
}

/// Configuration for the worker pool
#[derive(Debug, Clone)]
pub struct PoolConfig {
    pub num_workers: usize,
    /// Chunks allowed to wait in the work queue. `None` means two per worker.
    pub queue_depth: Option<usize>,
}

impl PoolConfig {
    pub fn with_workers(num_workers: usize) -> Self {
        Self {
            num_workers,
            ..Default::default()
        }
    }

    pub fn effective_queue_depth(&self) -> usize {
        self.queue_depth
            .unwrap_or(self.num_workers * 2)
            .max(1)
    }
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            num_workers: default_worker_count(),
            queue_depth: None,
        }
    }
}

/// Message a worker sends back for each chunk it received
#[derive(Debug)]
pub(crate) enum WorkerMessage<T> {
    Done {
        chunk_id: u64,
        output: T,
    },
    Failed {
        worker_id: usize,
        chunk_id: u64,
        reason: String,
    },
}
