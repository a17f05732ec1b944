//! Analysis results and their text and JSON renderings.
//!
//! The JSON form is the contract with the chart renderer: per series, the
//! trimmed raw points, the rolling mean (`null` before the first full
//! window), unit, mean and count.

use std::io::{self, Write};

use serde::Serialize;
use titan_hops::HopDefinition;
use titan_metrics::{format_latency, LatencySummary, SeriesOutcome};
use titan_perflog::IngestStats;

/// One RDTSC tag or one hop.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SeriesReport {
    /// Tag for RDTSC, `"<source> -> <destination>"` for hops.
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hop: Option<HopDefinition>,
    pub outcome: SeriesOutcome,
}

impl SeriesReport {
    pub fn tag(tag: &str, outcome: SeriesOutcome) -> Self {
        Self {
            name: tag.to_string(),
            hop: None,
            outcome,
        }
    }

    pub fn hop(hop: HopDefinition, outcome: SeriesOutcome) -> Self {
        Self {
            name: hop.name(),
            hop: Some(hop),
            outcome,
        }
    }
}

/// Full result of one run.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub cpu_freq_ghz: f64,
    /// Per-line counters, taken before deduplication.
    pub ingest: IngestStats,
    /// RDTSC records left after deduplication.
    pub rdtsc_records: usize,
    /// TTT records left after deduplication.
    pub ttt_records: usize,
    pub rdtsc: Vec<SeriesReport>,
    pub hops: Vec<SeriesReport>,
}

impl AnalysisReport {
    /// True if no RDTSC or TTT record survived ingestion.
    pub fn is_empty(&self) -> bool {
        self.rdtsc_records == 0 && self.ttt_records == 0
    }

    /// Serialize the renderer contract as JSON.
    pub fn write_json<W: Write>(&self, writer: W) -> serde_json::Result<()> {
        serde_json::to_writer_pretty(writer, self)
    }

    /// Human-readable summary.
    pub fn render_text<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "╔══════════════════════════════════════════════════════════════╗")?;
        writeln!(out, "║                   TITAN LATENCY ANALYSIS                     ║")?;
        writeln!(out, "╚══════════════════════════════════════════════════════════════╝")?;
        writeln!(
            out,
            "Lines: {}  Accepted RDTSC lines: {}  Accepted TTT lines: {}  Discarded: {}  CPU: {:.2} GHz",
            self.ingest.lines,
            self.ingest.rdtsc,
            self.ingest.ttt,
            self.ingest.discarded(),
            self.cpu_freq_ghz,
        )?;
        writeln!(
            out,
            "Records after dedup: RDTSC: {}  TTT: {}",
            self.rdtsc_records, self.ttt_records,
        )?;

        if self.rdtsc_records == 0 {
            writeln!(out, "\nNo RDTSC data to report.")?;
        }
        for series in &self.rdtsc {
            writeln!(out, "\nRDTSC {}", series.name)?;
            render_outcome(out, &series.outcome, "Mean Latency")?;
        }

        if self.ttt_records == 0 {
            writeln!(out, "\nNo TTT data to report.")?;
        } else if self.hops.is_empty() {
            writeln!(out, "\nNo hops configured.")?;
        }
        for series in &self.hops {
            writeln!(out, "\nHOP {}", series.name)?;
            render_outcome(out, &series.outcome, "Mean Hop Latency")?;
        }

        Ok(())
    }
}

fn render_outcome<W: Write>(out: &mut W, outcome: &SeriesOutcome, mean_label: &str) -> io::Result<()> {
    match outcome {
        SeriesOutcome::Summarized(summary) => render_summary(out, summary, mean_label),
        SeriesOutcome::InsufficientData { usable } => writeln!(
            out,
            "   Not enough data points to plot ({} usable).",
            usable
        ),
    }
}

fn render_summary<W: Write>(out: &mut W, summary: &LatencySummary, mean_label: &str) -> io::Result<()> {
    let d = &summary.distribution;
    writeln!(
        out,
        "   Observations: {}, {}: {:.2} ns ({})",
        summary.count,
        mean_label,
        summary.mean_ns,
        summary.unit.name(),
    )?;
    writeln!(
        out,
        "   P50: {}  P90: {}  P99: {}  P99.9: {}  Max: {}",
        format_latency(d.p50),
        format_latency(d.p90),
        format_latency(d.p99),
        format_latency(d.p999),
        format_latency(d.max),
    )
}
