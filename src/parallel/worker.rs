//! Worker thread for parallel processing
//!
//! Each worker pulls chunks off the shared queue, runs the task on them and
//! reports one message per chunk.

use crossbeam_channel::{Receiver, Sender};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};

use crate::chunker::Chunk;

use super::types::WorkerMessage;

/// Worker thread: processes chunks until the queue is closed
pub(crate) fn worker_thread<T, F>(
    worker_id: usize,
    work_receiver: Receiver<Chunk>,
    result_sender: Sender<WorkerMessage<T>>,
    task: &F,
    abort: &AtomicBool,
) where
    F: Fn(&Chunk) -> T + Sync,
{
    while let Ok(chunk) = work_receiver.recv() {
        // Keep draining after an abort so the dispatcher never blocks on a full queue.
        if abort.load(Ordering::Relaxed) {
            continue;
        }

        let chunk_id = chunk.id();
        let message = match panic::catch_unwind(AssertUnwindSafe(|| task(&chunk))) {
            Ok(output) => WorkerMessage::Done { chunk_id, output },
            Err(payload) => {
                abort.store(true, Ordering::Relaxed);
                WorkerMessage::Failed {
                    worker_id,
                    chunk_id,
                    reason: panic_message(payload.as_ref()),
                }
            }
        };

        if result_sender.send(message).is_err() {
            break;
        }
    }
}

pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
