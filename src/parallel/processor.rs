//! Main worker pool
//!
//! Contains the WorkerPool that fans chunks out to scoped worker threads and
//! collects exactly one result per chunk.

use crossbeam_channel::{bounded, unbounded, Sender};
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use crate::chunker::Chunk;
use crate::error::{AnalysisError, Result};

use super::sink::{collect_results, ordered_outputs};
use super::types::PoolConfig;
use super::worker::{panic_message, worker_thread};

/// Bounded-concurrency parallel map over chunks
#[derive(Debug, Clone)]
pub struct WorkerPool {
    config: PoolConfig,
}

impl WorkerPool {
    pub fn new(config: PoolConfig) -> Result<Self> {
        if config.num_workers == 0 {
            return Err(AnalysisError::InvalidConfig(
                "worker count must be at least 1".to_string(),
            ));
        }
        Ok(Self { config })
    }

    pub fn with_workers(num_workers: usize) -> Result<Self> {
        Self::new(PoolConfig::with_workers(num_workers))
    }

    /// Run `task` on every chunk and return the outputs ordered by chunk id.
    ///
    /// `chunks` is pulled lazily on the calling thread, so a splitter can feed
    /// the pool directly. The first `Err` it yields stops dispatch and is
    /// returned once the workers have wound down. A panicking task fails the
    /// whole map with [`AnalysisError::WorkerFailed`]; no chunk is ever
    /// dropped silently. Workers are spawned per call and always joined
    /// before this returns.
    pub fn map<I, F, T>(&self, chunks: I, task: F) -> Result<Vec<T>>
    where
        I: IntoIterator<Item = Result<Chunk>>,
        F: Fn(&Chunk) -> T + Sync,
        T: Send,
    {
        let mut chunks = chunks.into_iter().peekable();
        if chunks.peek().is_none() {
            return Ok(Vec::new());
        }

        let abort = AtomicBool::new(false);
        let task = &task;
        let abort_flag = &abort;

        thread::scope(|scope| -> Result<Vec<T>> {
            let (work_sender, work_receiver) = bounded(self.config.effective_queue_depth());
            let (result_sender, result_receiver) = unbounded();

            let mut worker_handles = Vec::with_capacity(self.config.num_workers);
            for worker_id in 0..self.config.num_workers {
                let work_receiver = work_receiver.clone();
                let result_sender = result_sender.clone();

                let handle = thread::Builder::new()
                    .name(format!("logtally-worker-{}", worker_id))
                    .spawn_scoped(scope, move || {
                        worker_thread(worker_id, work_receiver, result_sender, task, abort_flag)
                    })
                    .map_err(AnalysisError::Spawn)?;
                worker_handles.push(handle);
            }

            // Drop our copies so channel closure tracks the workers alone
            drop(work_receiver);
            drop(result_sender);

            let (dispatched, dispatch_error) = dispatch(&mut chunks, &work_sender, abort_flag);
            drop(work_sender);

            let collected = collect_results(result_receiver);

            let mut lost_worker = None;
            for (worker_id, handle) in worker_handles.into_iter().enumerate() {
                if let Err(payload) = handle.join() {
                    lost_worker.get_or_insert(AnalysisError::WorkerLost {
                        worker_id,
                        reason: panic_message(payload.as_ref()),
                    });
                }
            }

            if let Some(err) = dispatch_error.or(collected.failure).or(lost_worker) {
                return Err(err);
            }

            ordered_outputs(collected.outputs, &dispatched)
        })
    }

    /// Convenience wrapper for chunks already held in memory.
    pub fn map_chunks<F, T>(&self, chunks: Vec<Chunk>, task: F) -> Result<Vec<T>>
    where
        F: Fn(&Chunk) -> T + Sync,
        T: Send,
    {
        self.map(chunks.into_iter().map(Ok), task)
    }
}

/// Feed chunks to the workers until the source is exhausted, fails, or a
/// worker raises the abort flag. Returns the ids that were handed out.
fn dispatch<I>(
    chunks: &mut I,
    work_sender: &Sender<Chunk>,
    abort: &AtomicBool,
) -> (Vec<u64>, Option<AnalysisError>)
where
    I: Iterator<Item = Result<Chunk>>,
{
    let mut dispatched = Vec::new();

    while !abort.load(Ordering::Relaxed) {
        let chunk = match chunks.next() {
            Some(Ok(chunk)) => chunk,
            Some(Err(err)) => return (dispatched, Some(err)),
            None => break,
        };

        let chunk_id = chunk.id();
        if work_sender.send(chunk).is_err() {
            // Every worker is gone; this chunk can never be processed.
            return (dispatched, Some(AnalysisError::MissingResult { chunk_id }));
        }
        dispatched.push(chunk_id);
    }

    (dispatched, None)
}
