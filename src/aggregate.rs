//! Reduction of per-chunk partial results into run totals.

use crate::frequency::FrequencyTable;
use crate::parser::{AnomalyKind, ChunkTally};
use crate::stats::ScanStats;

/// Key-wise sum of `(addresses, statuses)` pairs.
///
/// Counts do not depend on the order of `results`. Key order of the returned
/// tables follows the order pairs were supplied in.
pub fn aggregate<I>(results: I) -> (FrequencyTable, FrequencyTable)
where
    I: IntoIterator<Item = (FrequencyTable, FrequencyTable)>,
{
    results.into_iter().fold(
        (FrequencyTable::new(), FrequencyTable::new()),
        |(mut addresses, mut statuses), (chunk_addresses, chunk_statuses)| {
            addresses.merge_owned(chunk_addresses);
            statuses.merge_owned(chunk_statuses);
            (addresses, statuses)
        },
    )
}

/// A malformed line located in the whole source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatedAnomaly {
    /// 1-based line number in the source.
    pub line_number: u64,
    pub kind: AnomalyKind,
    pub excerpt: String,
}

/// Stateful reducer fed with chunk tallies in chunk-id order.
#[derive(Debug, Default)]
pub struct Aggregator {
    addresses: FrequencyTable,
    statuses: FrequencyTable,
    stats: ScanStats,
    anomalies: Vec<LocatedAnomaly>,
    max_anomalies: usize,
    lines_before: u64,
}

/// Totals produced by [`Aggregator::finish`].
#[derive(Debug, Default)]
pub struct Totals {
    pub addresses: FrequencyTable,
    pub statuses: FrequencyTable,
    pub stats: ScanStats,
    pub anomalies: Vec<LocatedAnomaly>,
}

impl Aggregator {
    /// Keep at most `max_anomalies` located anomalies.
    pub fn new(max_anomalies: usize) -> Self {
        Self {
            max_anomalies,
            ..Default::default()
        }
    }

    /// Fold one chunk in. Chunks must arrive in id order for line numbers to be right.
    pub fn absorb(&mut self, tally: ChunkTally) {
        let ChunkTally {
            addresses,
            statuses,
            stats,
            anomalies,
            ..
        } = tally;

        for anomaly in anomalies {
            if self.anomalies.len() >= self.max_anomalies {
                break;
            }
            self.anomalies.push(LocatedAnomaly {
                line_number: self.lines_before + anomaly.line_in_chunk + 1,
                kind: anomaly.kind,
                excerpt: anomaly.excerpt,
            });
        }

        self.lines_before += stats.lines_read;
        self.addresses.merge_owned(addresses);
        self.statuses.merge_owned(statuses);
        self.stats.merge(&stats);
    }

    pub fn finish(self) -> Totals {
        Totals {
            addresses: self.addresses,
            statuses: self.statuses,
            stats: self.stats,
            anomalies: self.anomalies,
        }
    }
}
