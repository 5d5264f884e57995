// Command-line interface definition for the logtally binary

use clap::Parser;
use std::path::PathBuf;

use logtally::config::parse_byte_size;
use logtally::report::{ReportFormat, DEFAULT_TOP_N};

#[derive(Parser, Debug)]
#[command(name = "logtally")]
#[command(about = "Count client addresses and HTTP status codes in large access logs, in parallel")]
#[command(
    long_about = "Count client addresses and HTTP status codes in large access logs, in parallel\n\nThe file is split into newline-aligned chunks that are parsed on a pool of worker\nthreads. Gzip and zstd input is decompressed transparently.\n\nEXAMPLES:\n  logtally --file access.log\n  logtally --file access.log.gz --workers 8 --chunk-size 4M --top 10\n  logtally --file access.log --format json --stats"
)]
#[command(version)]
pub struct Cli {
    /// Access log to analyze
    #[arg(short = 'f', long = "file", value_name = "PATH")]
    pub file: PathBuf,

    /// Worker threads (default: one less than the number of cores)
    #[arg(short = 'w', long = "workers", help_heading = "Performance Options")]
    pub workers: Option<usize>,

    /// Target chunk size, e.g. 65536, 512K, 10M
    #[arg(
        long = "chunk-size",
        value_parser = parse_byte_size,
        help_heading = "Performance Options"
    )]
    pub chunk_size: Option<usize>,

    /// Number of most frequent addresses to show
    #[arg(
        short = 'n',
        long = "top",
        default_value_t = DEFAULT_TOP_N,
        help_heading = "Output Options"
    )]
    pub top: usize,

    /// Report format
    #[arg(
        short = 'F',
        long = "format",
        value_enum,
        default_value_t = ReportFormat::Text,
        help_heading = "Output Options"
    )]
    pub format: ReportFormat,

    /// Append processing statistics to the report
    #[arg(short = 's', long = "stats", help_heading = "Output Options")]
    pub stats: bool,

    /// Append diagnostics to this file instead of stderr
    #[arg(long = "log-file", value_name = "PATH", help_heading = "Logging Options")]
    pub log_file: Option<PathBuf>,

    /// More diagnostics (-v info, -vv debug, -vvv trace)
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help_heading = "Logging Options"
    )]
    pub verbose: u8,

    /// Fewer diagnostics (-q errors only, -qq silent)
    #[arg(
        short = 'q',
        long = "quiet",
        action = clap::ArgAction::Count,
        conflicts_with = "verbose",
        help_heading = "Logging Options"
    )]
    pub quiet: u8,
}

impl Cli {
    /// Warnings are shown by default
    pub fn log_level(&self) -> log::LevelFilter {
        use log::LevelFilter;
        match (self.quiet, self.verbose) {
            (q, _) if q >= 2 => LevelFilter::Off,
            (1, _) => LevelFilter::Error,
            (_, 0) => LevelFilter::Warn,
            (_, 1) => LevelFilter::Info,
            (_, 2) => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}
