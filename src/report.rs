//! Rendering of an [`AnalysisResult`] for people or machines.

use serde::Serialize;
use std::io::Write;

use crate::analysis::AnalysisResult;
use crate::stats::ScanStats;

/// Number of addresses listed by default
pub const DEFAULT_TOP_N: usize = 5;

#[derive(clap::ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone)]
pub struct ReportOptions {
    pub top_n: usize,
    pub format: ReportFormat,
    pub include_stats: bool,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
            format: ReportFormat::Text,
            include_stats: false,
        }
    }
}

#[derive(Serialize)]
struct AddressCount<'a> {
    address: &'a str,
    count: u64,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    top_addresses: Vec<AddressCount<'a>>,
    distinct_addresses: usize,
    statuses: serde_json::Map<String, serde_json::Value>,
    elapsed_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    stats: Option<&'a ScanStats>,
}

pub fn write_report<W: Write>(
    output: &mut W,
    result: &AnalysisResult,
    options: &ReportOptions,
) -> std::io::Result<()> {
    match options.format {
        ReportFormat::Text => write_text(output, result, options),
        ReportFormat::Json => write_json(output, result, options),
    }
}

fn write_text<W: Write>(
    output: &mut W,
    result: &AnalysisResult,
    options: &ReportOptions,
) -> std::io::Result<()> {
    writeln!(
        output,
        "Top {} addresses ({} distinct):",
        options.top_n,
        result.addresses.len()
    )?;
    let top = result.addresses.most_common(options.top_n);
    if top.is_empty() {
        writeln!(output, "  (none)")?;
    }
    let width = top.iter().map(|(address, _)| address.len()).max().unwrap_or(0);
    for (address, count) in top {
        writeln!(output, "  {:<width$}  {}", address, count, width = width)?;
    }

    writeln!(output, "Status codes:")?;
    let statuses = result.statuses.sorted_by_count();
    if statuses.is_empty() {
        writeln!(output, "  (none)")?;
    }
    for (status, count) in statuses {
        writeln!(output, "  {}  {}", status, count)?;
    }

    if options.include_stats {
        writeln!(output, "{}", result.stats.format_stats(result.elapsed))?;
    }
    Ok(())
}

fn write_json<W: Write>(
    output: &mut W,
    result: &AnalysisResult,
    options: &ReportOptions,
) -> std::io::Result<()> {
    let statuses = result
        .statuses
        .sorted_by_count()
        .into_iter()
        .map(|(status, count)| (status.to_string(), serde_json::Value::from(count)))
        .collect();

    let report = JsonReport {
        top_addresses: result
            .addresses
            .most_common(options.top_n)
            .into_iter()
            .map(|(address, count)| AddressCount { address, count })
            .collect(),
        distinct_addresses: result.addresses.len(),
        statuses,
        elapsed_ms: result.elapsed.as_millis() as u64,
        stats: options.include_stats.then_some(&result.stats),
    };

    serde_json::to_writer_pretty(&mut *output, &report)?;
    writeln!(output)
}
