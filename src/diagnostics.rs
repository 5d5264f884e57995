//! Logging capability injected into an analysis run.
//!
//! The analyzer never touches global logger state itself; it reports through
//! a [`DiagnosticSink`]. Binaries install `env_logger` once and pass
//! [`LogFacade`], tests pass a [`MemorySink`] and inspect what was reported.

use log::Level;
use std::sync::Mutex;

pub const LOG_TARGET: &str = "logtally";

pub trait DiagnosticSink: Send + Sync {
    fn emit(&self, level: Level, message: &str);

    fn info(&self, message: &str) {
        self.emit(Level::Info, message);
    }

    fn warn(&self, message: &str) {
        self.emit(Level::Warn, message);
    }

    /// Fatal run failures. The `log` facade has no level above `Error`.
    fn critical(&self, message: &str) {
        self.emit(Level::Error, message);
    }

    fn debug(&self, message: &str) {
        self.emit(Level::Debug, message);
    }
}

/// Forwards to whatever logger the process installed through the `log` crate.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogFacade;

impl DiagnosticSink for LogFacade {
    fn emit(&self, level: Level, message: &str) {
        log::log!(target: LOG_TARGET, level, "{}", message);
    }
}

/// Keeps every record in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Mutex<Vec<(Level, String)>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<(Level, String)> {
        self.records
            .lock()
            .map(|records| records.clone())
            .unwrap_or_default()
    }

    /// Messages recorded at exactly `level`.
    pub fn messages_at(&self, level: Level) -> Vec<String> {
        self.records()
            .into_iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, message)| message)
            .collect()
    }
}

impl DiagnosticSink for MemorySink {
    fn emit(&self, level: Level, message: &str) {
        // A poisoned lock means a reporting thread panicked; dropping the record is acceptable.
        if let Ok(mut records) = self.records.lock() {
            records.push((level, message.to_string()));
        }
    }
}
