// Process-level concerns for the logtally binary: exit codes and the
// diagnostics logger.

use anyhow::{Context, Result};
use file_rotate::compression::Compression;
use file_rotate::suffix::AppendCount;
use file_rotate::{ContentLimit, FileRotate};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use std::process;

/// A log file is rotated once it reaches this size
pub const LOG_ROTATE_BYTES: usize = 10 * 1024 * 1024;
/// Rotated files kept next to the active one (`<file>.1` ... `<file>.3`)
pub const LOG_BACKUPS: usize = 3;

/// Exit codes following Unix conventions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    Success = 0,
    GeneralError = 1,
    InvalidUsage = 2,
}

impl ExitCode {
    pub fn exit(self) -> ! {
        process::exit(self as i32)
    }
}

/// Install the global logger. `RUST_LOG` overrides `level` when set.
pub fn init_logging(level: log::LevelFilter, log_file: Option<&Path>) -> Result<()> {
    let mut builder = env_logger::Builder::new();
    builder.filter_level(level);
    if let Ok(filters) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }

    builder.format(|buf, record| {
        writeln!(
            buf,
            "{} {:<5} {} {}",
            buf.timestamp_millis(),
            record.level(),
            record.target(),
            record.args()
        )
    });

    if let Some(path) = log_file {
        let writer = LogWriter::open(path, LOG_ROTATE_BYTES, LOG_BACKUPS, true)?;
        builder.target(env_logger::Target::Pipe(Box::new(writer)));
    }

    builder
        .try_init()
        .context("Logger was already initialized")?;
    Ok(())
}

/// Size-rotated log file, optionally mirrored to stderr
pub struct LogWriter {
    file: FileRotate<AppendCount>,
    echo_stderr: bool,
}

impl LogWriter {
    pub fn open(path: &Path, max_bytes: usize, backups: usize, echo_stderr: bool) -> Result<Self> {
        // Surface a bad path now; the rotating writer would only fail on first write
        OpenOptions::new()
            .append(true)
            .create(true)
            .open(path)
            .with_context(|| format!("Could not open log file {}", path.display()))?;

        let file = FileRotate::new(
            path,
            AppendCount::new(backups),
            ContentLimit::Bytes(max_bytes),
            Compression::None,
            #[cfg(unix)]
            None,
        );
        Ok(Self { file, echo_stderr })
    }
}

impl Write for LogWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.file.write_all(buf)?;
        if self.echo_stderr {
            std::io::stderr().write_all(buf)?;
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.file.flush()?;
        if self.echo_stderr {
            std::io::stderr().flush()?;
        }
        Ok(())
    }
}
