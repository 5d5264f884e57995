// Writes a synthetic access log for exercising logtally

use anyhow::{Context, Result};
use clap::Parser;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use logtally::generator::LogGenerator;

#[derive(Parser, Debug)]
#[command(name = "gen-access-log")]
#[command(about = "Generate a synthetic access log in common log format")]
#[command(version)]
struct Args {
    /// Number of lines to write
    #[arg(short = 'n', long = "lines", default_value_t = 1000)]
    lines: u64,

    /// Seed for the random generator (default: random)
    #[arg(short = 's', long = "seed")]
    seed: Option<u64>,

    /// Output file (stdout if not specified)
    #[arg(short = 'o', long = "output", value_name = "PATH")]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let seed = args.seed.unwrap_or_else(|| fastrand::u64(..));
    let mut generator = LogGenerator::new(seed);

    match &args.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            let mut out = BufWriter::new(file);
            generator
                .write_lines(&mut out, args.lines)
                .and_then(|()| out.flush())
                .with_context(|| format!("Failed to write {}", path.display()))?;
        }
        None => {
            let stdout = std::io::stdout();
            let mut out = BufWriter::new(stdout.lock());
            match generator.write_lines(&mut out, args.lines).and_then(|()| out.flush()) {
                Err(e) if e.kind() != std::io::ErrorKind::BrokenPipe => {
                    return Err(e).context("Failed to write to stdout");
                }
                _ => {}
            }
        }
    }
    Ok(())
}
