//! Field extraction from access-log lines.
//!
//! Two fields are pulled from each line independently: the first
//! dotted-quad-shaped token (the source address) and the three-digit status
//! that follows the `HTTP/x.y"` request marker.

use regex::Regex;

use crate::chunker::Chunk;
use crate::error::Result;
use crate::frequency::FrequencyTable;
use crate::stats::ScanStats;

/// Upper bound on anomalies kept per chunk; the rest are only counted.
pub const MAX_ANOMALIES_PER_CHUNK: usize = 32;

const EXCERPT_CHARS: usize = 80;

/// What a single line contributed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineOutcome<'a> {
    /// At least one of the two fields was found.
    Matched {
        address: Option<&'a str>,
        status: Option<&'a str>,
    },
    /// Neither field is present. Not an error.
    Unmatched,
    /// The line looks like a request record but is damaged. Its address,
    /// if any, still counts.
    Malformed {
        address: Option<&'a str>,
        kind: AnomalyKind,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnomalyKind {
    /// The `HTTP/x.y"` marker is present but no three-digit status follows it.
    MissingStatus,
}

impl std::fmt::Display for AnomalyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AnomalyKind::MissingStatus => write!(f, "request marker without a status code"),
        }
    }
}

/// A malformed line, located relative to its chunk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseAnomaly {
    pub chunk_id: u64,
    /// Zero-based line index within the chunk.
    pub line_in_chunk: u64,
    pub kind: AnomalyKind,
    pub excerpt: String,
}

/// Partial result for one chunk.
#[derive(Debug, Clone, Default)]
pub struct ChunkTally {
    pub chunk_id: u64,
    pub addresses: FrequencyTable,
    pub statuses: FrequencyTable,
    pub stats: ScanStats,
    /// First [`MAX_ANOMALIES_PER_CHUNK`] anomalies; `stats.malformed_lines` has the full count.
    pub anomalies: Vec<ParseAnomaly>,
}

impl ChunkTally {
    /// The two frequency tables, dropping the bookkeeping.
    pub fn into_tables(self) -> (FrequencyTable, FrequencyTable) {
        (self.addresses, self.statuses)
    }
}

/// Extracts addresses and status codes from access-log text.
///
/// Parsing holds no mutable state, so one parser can be shared by every worker.
#[derive(Debug, Clone)]
pub struct LineParser {
    address_regex: Regex,
    status_regex: Regex,
    marker_regex: Regex,
}

impl LineParser {
    pub fn new() -> Result<Self> {
        // Example: 192.168.1.1 - - [10/Oct/2023:12:00:00] "GET / HTTP/1.1" 200 1234
        let address_regex = Regex::new(r"\d+\.\d+\.\d+\.\d+")?;
        let status_regex = Regex::new(r#"HTTP/\d\.\d"\s(\d{3})"#)?;
        let marker_regex = Regex::new(r#"HTTP/\d\.\d""#)?;

        Ok(Self {
            address_regex,
            status_regex,
            marker_regex,
        })
    }

    pub fn parse_line<'a>(&self, line: &'a str) -> LineOutcome<'a> {
        let address = self.address_regex.find(line).map(|m| m.as_str());
        let status = self
            .status_regex
            .captures(line)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str());

        if status.is_none() && self.marker_regex.is_match(line) {
            return LineOutcome::Malformed {
                address,
                kind: AnomalyKind::MissingStatus,
            };
        }

        match (address, status) {
            (None, None) => LineOutcome::Unmatched,
            (address, status) => LineOutcome::Matched { address, status },
        }
    }

    /// Count both fields over every non-empty line of `chunk`.
    pub fn parse_chunk(&self, chunk: &Chunk) -> ChunkTally {
        let mut tally = ChunkTally {
            chunk_id: chunk.id(),
            ..Default::default()
        };
        tally.stats.chunks = 1;
        tally.stats.bytes_scanned = chunk.text().len() as u64;
        if chunk.is_lossy() {
            tally.stats.lossy_chunks = 1;
        }

        for (index, line) in chunk.text().lines().enumerate() {
            tally.stats.lines_read += 1;

            if line.trim().is_empty() {
                tally.stats.blank_lines += 1;
                continue;
            }

            match self.parse_line(line) {
                LineOutcome::Matched { address, status } => {
                    tally.stats.matched_lines += 1;
                    if let Some(address) = address {
                        tally.addresses.increment(address);
                        tally.stats.address_hits += 1;
                    }
                    if let Some(status) = status {
                        tally.statuses.increment(status);
                        tally.stats.status_hits += 1;
                    }
                }
                LineOutcome::Unmatched => tally.stats.unmatched_lines += 1,
                LineOutcome::Malformed { address, kind } => {
                    tally.stats.malformed_lines += 1;
                    if let Some(address) = address {
                        tally.addresses.increment(address);
                        tally.stats.address_hits += 1;
                    }
                    if tally.anomalies.len() < MAX_ANOMALIES_PER_CHUNK {
                        tally.anomalies.push(ParseAnomaly {
                            chunk_id: chunk.id(),
                            line_in_chunk: index as u64,
                            kind,
                            excerpt: excerpt(line),
                        });
                    }
                }
            }
        }

        tally
    }
}

fn excerpt(line: &str) -> String {
    let mut chars = line.chars();
    let mut out: String = chars.by_ref().take(EXCERPT_CHARS).collect();
    if chars.next().is_some() {
        out.push('…');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = concat!(
        "192.168.1.1 - - [10/Oct/2023:12:00:00] \"GET / HTTP/1.1\" 200 1234\n",
        "10.0.0.1 - - [10/Oct/2023:12:00:01] \"POST /api HTTP/1.1\" 404 5678\n",
        "192.168.1.1 - - [10/Oct/2023:12:00:02] \"GET /favicon.ico HTTP/1.1\" 200 8910\n",
    );

    fn parser() -> LineParser {
        LineParser::new().unwrap()
    }

    #[test]
    fn test_parse_line_extracts_both_fields() {
        let outcome = parser()
            .parse_line(r#"10.0.0.1 - - [10/Oct/2023:12:00:01] "POST /api HTTP/1.1" 404 5678"#);
        assert_eq!(
            outcome,
            LineOutcome::Matched {
                address: Some("10.0.0.1"),
                status: Some("404"),
            }
        );
    }

    #[test]
    fn test_parse_line_takes_first_address_only() {
        let outcome = parser().parse_line("1.2.3.4 forwarded-for 5.6.7.8");
        assert_eq!(
            outcome,
            LineOutcome::Matched {
                address: Some("1.2.3.4"),
                status: None,
            }
        );
    }

    #[test]
    fn test_fields_match_independently() {
        let outcome = parser().parse_line(r#"unknown-host "GET / HTTP/2.0" 503 0"#);
        assert_eq!(
            outcome,
            LineOutcome::Matched {
                address: None,
                status: Some("503"),
            }
        );
    }

    #[test]
    fn test_unrelated_line_is_unmatched() {
        assert_eq!(parser().parse_line("INVALID_LINE"), LineOutcome::Unmatched);
    }

    #[test]
    fn test_marker_without_status_is_malformed() {
        let outcome = parser().parse_line(r#"10.0.0.1 - - [x] "GET / HTTP/1.1" - 12"#);
        assert_eq!(
            outcome,
            LineOutcome::Malformed {
                address: Some("10.0.0.1"),
                kind: AnomalyKind::MissingStatus,
            }
        );

        let truncated = parser().parse_line(r#""GET / HTTP/1.1""#);
        assert_eq!(
            truncated,
            LineOutcome::Malformed {
                address: None,
                kind: AnomalyKind::MissingStatus,
            }
        );
    }

    #[test]
    fn test_malformed_request_still_counts_its_address() {
        let text = concat!(
            "10.0.0.1 - - [10/Oct/2023:12:00:00] \"GET / HTTP/1.1\" - 12\n",
            "10.0.0.2 - - [10/Oct/2023:12:00:01] \"GET / HTTP/1.1\"  200 5\n",
        );
        let tally = parser().parse_chunk(&Chunk::new(0, 0, text));

        assert_eq!(tally.addresses.get("10.0.0.1"), 1);
        assert_eq!(tally.addresses.get("10.0.0.2"), 1);
        assert_eq!(tally.stats.address_hits, 2);
        assert!(tally.statuses.is_empty());
        assert_eq!(tally.stats.malformed_lines, 2);
        assert_eq!(tally.anomalies.len(), 2);
    }

    #[test]
    fn test_parse_chunk_counts_sample() {
        let tally = parser().parse_chunk(&Chunk::new(0, 0, SAMPLE));

        assert_eq!(tally.addresses.get("192.168.1.1"), 2);
        assert_eq!(tally.addresses.get("10.0.0.1"), 1);
        assert_eq!(tally.addresses.len(), 2);
        assert_eq!(tally.statuses.get("200"), 2);
        assert_eq!(tally.statuses.get("404"), 1);
        assert_eq!(tally.stats.lines_read, 3);
        assert_eq!(tally.stats.matched_lines, 3);
        assert!(tally.anomalies.is_empty());
    }

    #[test]
    fn test_parse_chunk_skips_blank_lines_and_keeps_accounting() {
        let text = "\n  \nINVALID_LINE\r\n1.1.1.1 \"GET / HTTP/1.0\" 301 0\n\"HEAD / HTTP/1.1\" ???\n";
        let tally = parser().parse_chunk(&Chunk::new(7, 0, text));

        assert_eq!(tally.chunk_id, 7);
        assert_eq!(tally.stats.lines_read, 5);
        assert_eq!(tally.stats.blank_lines, 2);
        assert_eq!(tally.stats.unmatched_lines, 1);
        assert_eq!(tally.stats.matched_lines, 1);
        assert_eq!(tally.stats.malformed_lines, 1);
        assert_eq!(tally.stats.non_empty_lines(), 3);
        assert_eq!(tally.statuses.get("301"), 1);

        assert_eq!(tally.anomalies.len(), 1);
        assert_eq!(tally.anomalies[0].chunk_id, 7);
        assert_eq!(tally.anomalies[0].line_in_chunk, 4);
    }

    #[test]
    fn test_anomaly_list_is_capped_but_counted() {
        let text = "\"GET / HTTP/1.1\" x\n".repeat(MAX_ANOMALIES_PER_CHUNK + 10);
        let tally = parser().parse_chunk(&Chunk::new(0, 0, text));

        assert_eq!(tally.anomalies.len(), MAX_ANOMALIES_PER_CHUNK);
        assert_eq!(tally.stats.malformed_lines, MAX_ANOMALIES_PER_CHUNK as u64 + 10);
        assert!(tally.addresses.is_empty());
        assert!(tally.statuses.is_empty());
    }

    #[test]
    fn test_excerpt_truncates_long_lines() {
        let long = "a".repeat(200);
        let short = excerpt(&long);
        assert_eq!(short.chars().count(), EXCERPT_CHARS + 1);
        assert!(short.ends_with('…'));
        assert_eq!(excerpt("short"), "short");
    }
}
