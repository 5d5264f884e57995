//! Orchestration of one analysis run: open, split, parse in parallel,
//! aggregate, report.

use serde::Serialize;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::aggregate::{Aggregator, LocatedAnomaly, Totals};
use crate::chunker::ChunkSplitter;
use crate::config::AnalyzerConfig;
use crate::diagnostics::{DiagnosticSink, LogFacade};
use crate::error::Result;
use crate::frequency::FrequencyTable;
use crate::input::{open_source, Compression};
use crate::parallel::WorkerPool;
use crate::parser::LineParser;
use crate::stats::ScanStats;

/// Outcome of a completed run
#[derive(Debug, Clone, Default, Serialize)]
pub struct AnalysisResult {
    pub addresses: FrequencyTable,
    pub statuses: FrequencyTable,
    pub stats: ScanStats,
    #[serde(serialize_with = "serialize_millis", rename = "elapsed_ms")]
    pub elapsed: Duration,
}

impl AnalysisResult {
    fn from_totals(totals: Totals, elapsed: Duration) -> Self {
        Self {
            addresses: totals.addresses,
            statuses: totals.statuses,
            stats: totals.stats,
            elapsed,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.addresses.is_empty() && self.statuses.is_empty()
    }
}

fn serialize_millis<S: serde::Serializer>(
    elapsed: &Duration,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_u64(elapsed.as_millis() as u64)
}

/// One analysis over one source
pub struct AnalysisRun {
    config: AnalyzerConfig,
    sink: Arc<dyn DiagnosticSink>,
}

impl AnalysisRun {
    /// Reports through the `log` facade; see [`with_sink`](Self::with_sink).
    pub fn new(config: AnalyzerConfig) -> Self {
        Self {
            config,
            sink: Arc::new(LogFacade),
        }
    }

    pub fn with_sink(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Analyze the file at `path`. Either the whole file is counted or an
    /// error is returned; partial results are never handed back.
    pub fn run(&self, path: &Path) -> Result<AnalysisResult> {
        let started = Instant::now();
        self.sink.info(&format!(
            "analyzing {} with {} workers, {} byte chunks",
            path.display(),
            self.config.effective_workers(),
            self.config.chunk_bytes
        ));

        let outcome = self.config.validate().and_then(|()| -> Result<Totals> {
            let source = open_source(path)?;
            if let Some(size) = source.size_on_disk {
                self.sink
                    .debug(&format!("{} holds {} bytes on disk", path.display(), size));
            }
            if source.compression != Compression::None {
                self.sink
                    .debug(&format!("decompressing {:?} input", source.compression));
            }

            // Emptiness is judged by content; pipes and procfs files report length 0
            let totals = self.scan(source.reader)?;
            if totals.stats.bytes_scanned == 0 {
                self.sink.info(&format!("{} is empty", path.display()));
            }
            Ok(totals)
        });

        self.finish(&path.display().to_string(), started, outcome)
    }

    /// Analyze an already-open source. Compression is not sniffed here.
    pub fn run_reader<R: Read>(&self, reader: R) -> Result<AnalysisResult> {
        let started = Instant::now();
        self.sink.info(&format!(
            "analyzing stream with {} workers, {} byte chunks",
            self.config.effective_workers(),
            self.config.chunk_bytes
        ));

        let outcome = self.config.validate().and_then(|()| self.scan(reader));
        self.finish("stream", started, outcome)
    }

    fn scan<R: Read>(&self, reader: R) -> Result<Totals> {
        let parser = LineParser::new()?;
        let pool = WorkerPool::new(self.config.pool_config())?;
        let splitter = ChunkSplitter::new(reader, self.config.chunk_bytes)?;

        let tallies = pool.map(splitter, |chunk| parser.parse_chunk(chunk))?;

        let mut aggregator = Aggregator::new(self.config.max_reported_anomalies);
        for tally in tallies {
            aggregator.absorb(tally);
        }
        Ok(aggregator.finish())
    }

    fn finish(
        &self,
        label: &str,
        started: Instant,
        outcome: Result<Totals>,
    ) -> Result<AnalysisResult> {
        let totals = match outcome {
            Ok(totals) => totals,
            Err(err) => {
                self.sink.critical(&format!(
                    "analysis of {} failed after {:.2?}: {}",
                    label,
                    started.elapsed(),
                    err
                ));
                return Err(err);
            }
        };

        self.report_anomalies(&totals.anomalies, totals.stats.malformed_lines);
        if totals.stats.unmatched_lines > 0 {
            self.sink.debug(&format!(
                "{} lines matched neither pattern",
                totals.stats.unmatched_lines
            ));
        }
        if totals.stats.lossy_chunks > 0 {
            self.sink.warn(&format!(
                "invalid UTF-8 replaced in {} chunks of {}",
                totals.stats.lossy_chunks, label
            ));
        }

        let result = AnalysisResult::from_totals(totals, started.elapsed());
        self.sink.info(&format!(
            "finished {} in {:.2?}: {} lines, {} distinct addresses, {} distinct statuses",
            label,
            result.elapsed,
            result.stats.lines_read,
            result.addresses.len(),
            result.statuses.len()
        ));
        Ok(result)
    }

    fn report_anomalies(&self, anomalies: &[LocatedAnomaly], total: u64) {
        for anomaly in anomalies {
            self.sink.warn(&format!(
                "skipping line {}: {}: {}",
                anomaly.line_number, anomaly.kind, anomaly.excerpt
            ));
        }
        let reported = anomalies.len() as u64;
        if total > reported {
            self.sink.warn(&format!(
                "{} more malformed lines not shown",
                total - reported
            ));
        }
    }
}
