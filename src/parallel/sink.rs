//! Result sink for parallel processing
//!
//! Gathers worker messages, keyed by chunk id so output order never depends
//! on which worker finished first.

use crossbeam_channel::Receiver;
use std::collections::BTreeMap;

use crate::error::AnalysisError;

use super::types::WorkerMessage;

/// Everything the workers reported
pub(crate) struct Collected<T> {
    pub outputs: BTreeMap<u64, T>,
    /// First worker failure, if any
    pub failure: Option<AnalysisError>,
}

/// Drain the result channel until every worker has hung up
pub(crate) fn collect_results<T>(result_receiver: Receiver<WorkerMessage<T>>) -> Collected<T> {
    let mut outputs = BTreeMap::new();
    let mut failure = None;

    for message in result_receiver.iter() {
        match message {
            WorkerMessage::Done { chunk_id, output } => {
                outputs.insert(chunk_id, output);
            }
            WorkerMessage::Failed {
                worker_id,
                chunk_id,
                reason,
            } => {
                if failure.is_none() {
                    failure = Some(AnalysisError::WorkerFailed {
                        worker_id,
                        chunk_id,
                        reason,
                    });
                }
            }
        }
    }

    Collected { outputs, failure }
}

/// Confirm every dispatched chunk came back, then hand outputs over in chunk order
pub(crate) fn ordered_outputs<T>(
    outputs: BTreeMap<u64, T>,
    dispatched: &[u64],
) -> Result<Vec<T>, AnalysisError> {
    if let Some(&chunk_id) = dispatched.iter().find(|id| !outputs.contains_key(*id)) {
        return Err(AnalysisError::MissingResult { chunk_id });
    }
    Ok(outputs.into_values().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::unbounded;

    #[test]
    fn test_collect_orders_by_chunk_id() {
        let (tx, rx) = unbounded();
        tx.send(WorkerMessage::Done {
            chunk_id: 2,
            output: "c",
        })
        .unwrap();
        tx.send(WorkerMessage::Done {
            chunk_id: 0,
            output: "a",
        })
        .unwrap();
        tx.send(WorkerMessage::Done {
            chunk_id: 1,
            output: "b",
        })
        .unwrap();
        drop(tx);

        let collected = collect_results(rx);
        assert!(collected.failure.is_none());
        let ordered = ordered_outputs(collected.outputs, &[0, 1, 2]).unwrap();
        assert_eq!(ordered, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_first_failure_wins() {
        let (tx, rx) = unbounded::<WorkerMessage<()>>();
        tx.send(WorkerMessage::Failed {
            worker_id: 1,
            chunk_id: 3,
            reason: "first".to_string(),
        })
        .unwrap();
        tx.send(WorkerMessage::Failed {
            worker_id: 0,
            chunk_id: 4,
            reason: "second".to_string(),
        })
        .unwrap();
        drop(tx);

        match collect_results(rx).failure {
            Some(AnalysisError::WorkerFailed { chunk_id, .. }) => assert_eq!(chunk_id, 3),
            other => panic!("expected worker failure, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_result_is_an_error() {
        let mut outputs = BTreeMap::new();
        outputs.insert(0u64, 10);
        outputs.insert(2u64, 30);

        match ordered_outputs(outputs, &[0, 1, 2]) {
            Err(AnalysisError::MissingResult { chunk_id }) => assert_eq!(chunk_id, 1),
            other => panic!("expected missing result, got {:?}", other),
        }
    }
}
