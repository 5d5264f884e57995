use anyhow::{Context, Result};
use clap::Parser;
use std::fs::File;
use std::io::Write;

use logtally::report::{write_report, ReportOptions};
use logtally::{AnalysisRun, AnalyzerConfig};

mod cli;
mod platform;

use cli::Cli;
use platform::{init_logging, ExitCode};

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            // --help and --version are not usage errors
            let code = if err.use_stderr() {
                ExitCode::InvalidUsage
            } else {
                ExitCode::Success
            };
            let _ = err.print();
            code.exit();
        }
    };

    if let Err(err) = init_logging(cli.log_level(), cli.log_file.as_deref()) {
        eprintln!("logtally: {:#}", err);
        ExitCode::InvalidUsage.exit();
    }

    // Missing or unreadable input is a usage problem, reported before any work starts
    if let Err(err) = check_readable(&cli) {
        eprintln!("logtally: {:#}", err);
        ExitCode::InvalidUsage.exit();
    }

    match run(&cli) {
        Ok(()) => ExitCode::Success.exit(),
        Err(err) => {
            eprintln!("logtally: {:#}", err);
            ExitCode::GeneralError.exit();
        }
    }
}

fn check_readable(cli: &Cli) -> Result<()> {
    let metadata = std::fs::metadata(&cli.file)
        .with_context(|| format!("cannot access {}", cli.file.display()))?;
    if metadata.is_dir() {
        anyhow::bail!("{} is a directory", cli.file.display());
    }
    File::open(&cli.file).with_context(|| format!("cannot read {}", cli.file.display()))?;
    Ok(())
}

fn build_config(cli: &Cli) -> AnalyzerConfig {
    let mut config = AnalyzerConfig::default();
    config.workers = cli.workers;
    if let Some(chunk_bytes) = cli.chunk_size {
        config.chunk_bytes = chunk_bytes;
    }
    config
}

fn run(cli: &Cli) -> Result<()> {
    let result = AnalysisRun::new(build_config(cli))
        .run(&cli.file)
        .with_context(|| format!("analysis of {} failed", cli.file.display()))?;

    let options = ReportOptions {
        top_n: cli.top,
        format: cli.format,
        include_stats: cli.stats,
    };

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match write_report(&mut out, &result, &options).and_then(|()| out.flush()) {
        Ok(()) => Ok(()),
        // Downstream closed the pipe early, e.g. `| head`
        Err(e) if e.kind() == std::io::ErrorKind::BrokenPipe => Ok(()),
        Err(e) => Err(e).context("Failed to write report"),
    }
}
