use crate::chunker::DEFAULT_CHUNK_BYTES;
use crate::error::{AnalysisError, Result};
use crate::parallel::{default_worker_count, PoolConfig};

/// Warnings logged per run before the rest are summarized.
pub const DEFAULT_MAX_REPORTED_ANOMALIES: usize = 20;

/// Main configuration struct for an analysis run
#[derive(Debug, Clone)]
pub struct AnalyzerConfig {
    /// Worker threads; `None` picks one less than the available cores.
    pub workers: Option<usize>,
    /// Target chunk size in bytes.
    pub chunk_bytes: usize,
    /// Chunks allowed to queue up ahead of the workers; `None` means two per worker.
    pub queue_depth: Option<usize>,
    pub max_reported_anomalies: usize,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            workers: None,
            chunk_bytes: DEFAULT_CHUNK_BYTES,
            queue_depth: None,
            max_reported_anomalies: DEFAULT_MAX_REPORTED_ANOMALIES,
        }
    }
}

impl AnalyzerConfig {
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = Some(workers);
        self
    }

    pub fn with_chunk_bytes(mut self, chunk_bytes: usize) -> Self {
        self.chunk_bytes = chunk_bytes;
        self
    }

    /// Get effective worker count (0 or unset means auto-detect)
    pub fn effective_workers(&self) -> usize {
        match self.workers {
            Some(0) | None => default_worker_count(),
            Some(n) => n,
        }
    }

    pub fn pool_config(&self) -> PoolConfig {
        PoolConfig {
            num_workers: self.effective_workers(),
            queue_depth: self.queue_depth,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.chunk_bytes == 0 {
            return Err(AnalysisError::InvalidConfig(
                "chunk size must be at least 1 byte".to_string(),
            ));
        }
        Ok(())
    }
}

/// Parse a byte size such as `4096`, `64K`, `10M` or `1G` (binary multiples).
pub fn parse_byte_size(input: &str) -> std::result::Result<usize, String> {
    let trimmed = input.trim();
    let split_at = trimmed
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(trimmed.len());
    let (digits, suffix) = trimmed.split_at(split_at);

    if digits.is_empty() {
        return Err(format!("invalid size '{}': expected a number", input));
    }
    let value: usize = digits
        .parse()
        .map_err(|e| format!("invalid size '{}': {}", input, e))?;

    let multiplier: usize = match suffix.trim().to_ascii_uppercase().as_str() {
        "" | "B" => 1,
        "K" | "KB" | "KIB" => 1 << 10,
        "M" | "MB" | "MIB" => 1 << 20,
        "G" | "GB" | "GIB" => 1 << 30,
        other => return Err(format!("invalid size suffix '{}' in '{}'", other, input)),
    };

    let bytes = value
        .checked_mul(multiplier)
        .ok_or_else(|| format!("size '{}' is too large", input))?;
    if bytes == 0 {
        return Err("size must be at least 1 byte".to_string());
    }
    Ok(bytes)
}
