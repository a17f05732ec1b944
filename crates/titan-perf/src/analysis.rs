//! Analysis pipeline: ingest, derive hops, summarize.

use std::path::PathBuf;

use titan_hops::HopSeries;
use titan_metrics::{summarize, SeriesKind, SeriesOutcome, SeriesPoint};
use titan_perflog::{IngestError, LineParser, RecordSet, RecordStore};
use tracing::info;

use crate::config::AnalysisConfig;
use crate::report::{AnalysisReport, SeriesReport};

/// Read every file into a frozen record set.
///
/// Files are read in order. The first unreadable file aborts the run.
pub fn ingest(config: &AnalysisConfig, files: &[PathBuf]) -> Result<RecordSet, IngestError> {
    let mut store = RecordStore::new(LineParser::new(config.cpu_freq));
    for path in files {
        store.ingest_file(path)?;
    }

    let stats = *store.stats();
    info!(
        files = files.len(),
        lines = stats.lines,
        rdtsc = stats.rdtsc,
        ttt = stats.ttt,
        discarded = stats.discarded(),
        "ingestion complete"
    );

    Ok(store.finish())
}

/// Summarize every RDTSC tag and every hop in the topology.
pub fn analyze(config: &AnalysisConfig, records: &RecordSet) -> AnalysisReport {
    AnalysisReport {
        cpu_freq_ghz: config.cpu_freq.as_ghz(),
        ingest: *records.stats(),
        rdtsc_records: records.rdtsc().len(),
        ttt_records: records.ttt().len(),
        rdtsc: analyze_rdtsc(records),
        hops: analyze_hops(config, records),
    }
}

fn analyze_rdtsc(records: &RecordSet) -> Vec<SeriesReport> {
    records
        .rdtsc_tags()
        .into_iter()
        .map(|tag| {
            let points = records
                .rdtsc_for(tag)
                .map(|r| SeriesPoint::new(r.timestamp, r.value))
                .collect();

            let outcome = summarize(SeriesKind::Point, points);
            log_outcome("rdtsc", tag, &outcome);
            SeriesReport::tag(tag, outcome)
        })
        .collect()
}

fn analyze_hops(config: &AnalysisConfig, records: &RecordSet) -> Vec<SeriesReport> {
    if records.ttt().is_empty() {
        return Vec::new();
    }

    HopSeries::derive_all(&config.topology, records.ttt())
        .into_iter()
        .map(|series| {
            let outcome = if series.is_sufficient() {
                let points = series
                    .samples
                    .iter()
                    .map(|s| SeriesPoint::new(s.timestamp, s.latency))
                    .collect();
                summarize(SeriesKind::Hop, points)
            } else {
                SeriesOutcome::InsufficientData {
                    usable: series.samples.len(),
                }
            };

            let name = series.hop.name();
            log_outcome("hop", &name, &outcome);
            SeriesReport::hop(series.hop.clone(), outcome)
        })
        .collect()
}

fn log_outcome(stream: &str, name: &str, outcome: &SeriesOutcome) {
    match outcome {
        SeriesOutcome::Summarized(summary) => info!(
            stream,
            name,
            count = summary.count,
            mean_ns = summary.mean_ns,
            unit = summary.unit.name(),
            "series summarized"
        ),
        SeriesOutcome::InsufficientData { usable } => {
            info!(stream, name, usable, "not enough data points, skipping")
        }
    }
}
