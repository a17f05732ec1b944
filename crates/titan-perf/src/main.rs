//! Titan Perf - latency log analysis.
//!
//! Reads RDTSC and TTT events from exchange and client logs and reports
//! per-tag and per-hop latency summaries.
//!
//! Example:
//!     titan-perf 'logs/exchange*.log' 'logs/*_1.log' --cpu-freq 2.60 --json latency.json

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use titan_metrics::{format_latency, Stopwatch};
use titan_perf::{analyze, ingest, logging, resolve_log_files, AnalysisConfig};
use titan_perflog::CpuFreqGhz;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "titan-perf", version, about = "Analyze Titan RDTSC and TTT latency logs")]
struct Cli {
    /// One or more log file patterns (e.g. "logs/exchange*.log")
    #[arg(required = true, value_name = "PATTERN")]
    patterns: Vec<String>,

    /// CPU frequency in GHz for RDTSC conversion [default: 2.60]
    #[arg(long, value_name = "GHZ")]
    cpu_freq: Option<CpuFreqGhz>,

    /// TOML config file (cpu_freq_ghz, [[hops]])
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Write the full report as JSON for the chart renderer
    #[arg(long, value_name = "FILE")]
    json: Option<PathBuf>,

    /// Emit logs as JSON
    #[arg(long)]
    log_json: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.log_json);

    let config = AnalysisConfig::load(cli.config.as_deref(), cli.cpu_freq)
        .context("invalid configuration")?;
    info!(
        cpu_freq = %config.cpu_freq,
        hops = config.topology.len(),
        "configuration loaded"
    );

    let files = resolve_log_files(&cli.patterns)?;

    let mut stopwatch = Stopwatch::start();
    let records = ingest(&config, &files)?;
    let ingest_nanos = stopwatch.lap();

    let report = analyze(&config, &records);
    let analyze_nanos = stopwatch.lap();
    if report.is_empty() {
        warn!(files = files.len(), "no RDTSC or TTT records found");
    }

    info!(
        ingest = %format_latency(ingest_nanos),
        analyze = %format_latency(analyze_nanos),
        "analysis finished"
    );

    let stdout = io::stdout();
    let mut out = stdout.lock();
    report.render_text(&mut out)?;
    out.flush()?;

    if let Some(path) = cli.json {
        let file = File::create(&path)
            .with_context(|| format!("failed to create {}", path.display()))?;
        let mut writer = BufWriter::new(file);
        report
            .write_json(&mut writer)
            .with_context(|| format!("failed to write {}", path.display()))?;
        writer.flush()?;
        info!(file = %path.display(), "json report written");
    }

    Ok(())
}
