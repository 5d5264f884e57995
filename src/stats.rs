use serde::Serialize;
use std::time::Duration;

/// Line accounting collected while scanning chunks
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanStats {
    pub lines_read: u64,
    pub blank_lines: u64,
    pub matched_lines: u64,
    pub unmatched_lines: u64,
    pub malformed_lines: u64,
    pub address_hits: u64,
    pub status_hits: u64,
    pub bytes_scanned: u64,
    pub chunks: u64,
    /// Chunks that contained bytes which were not valid UTF-8
    pub lossy_chunks: u64,
}

impl ScanStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lines that carried any content, whether or not they matched.
    pub fn non_empty_lines(&self) -> u64 {
        self.matched_lines + self.unmatched_lines + self.malformed_lines
    }

    pub fn merge(&mut self, other: &ScanStats) {
        self.lines_read += other.lines_read;
        self.blank_lines += other.blank_lines;
        self.matched_lines += other.matched_lines;
        self.unmatched_lines += other.unmatched_lines;
        self.malformed_lines += other.malformed_lines;
        self.address_hits += other.address_hits;
        self.status_hits += other.status_hits;
        self.bytes_scanned += other.bytes_scanned;
        self.chunks += other.chunks;
        self.lossy_chunks += other.lossy_chunks;
    }

    pub fn format_stats(&self, elapsed: Duration) -> String {
        let mut output = format!(
            "Lines processed: {} total, {} matched, {} unmatched",
            self.lines_read, self.matched_lines, self.unmatched_lines
        );

        if self.malformed_lines > 0 {
            output.push_str(&format!(", {} malformed", self.malformed_lines));
        }

        if self.blank_lines > 0 {
            output.push_str(&format!(", {} blank", self.blank_lines));
        }

        output.push_str(&format!(" in {} chunks", self.chunks));

        let processing_time_ms = elapsed.as_millis();
        output.push_str(&format!(" in {}ms", processing_time_ms));

        if processing_time_ms > 0 && self.lines_read > 0 {
            let lines_per_sec = (self.lines_read as f64 * 1000.0) / processing_time_ms as f64;
            output.push_str(&format!(" ({:.0} lines/s)", lines_per_sec));
        }

        if self.lossy_chunks > 0 {
            output.push_str(&format!(
                ", {} chunks with invalid UTF-8 replaced",
                self.lossy_chunks
            ));
        }

        output
    }
}
