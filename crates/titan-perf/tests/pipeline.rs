//! End-to-end tests: log files on disk through to the rendered report.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::TempDir;
use titan_metrics::{LatencyUnit, SeriesOutcome};
use titan_perf::{analyze, ingest, resolve_log_files, AnalysisConfig};

fn write_log(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).expect("Failed to write log");
    path
}

fn timestamp(i: usize) -> String {
    format!("10:{:02}:{:02}.{:06}", i / 60_000_000 % 60, i / 1_000_000 % 60, i % 1_000_000)
}

/// Alternating T1/T2 events, hops of 400-449 ns and one slow outlier.
fn order_server_log(rounds: usize) -> String {
    let mut log = String::new();
    let mut counter = 1_000_000u64;
    for i in 0..rounds {
        let hop = if i == rounds / 2 { 90_000 } else { 400 + (i % 50) as u64 };
        log.push_str(&format!("{} TTT T1_OrderServer_TCP_read {}\n", timestamp(2 * i), counter));
        counter += hop;
        log.push_str(&format!("{} TTT T2_OrderServer_LFQueue_write {}\n", timestamp(2 * i + 1), counter));
        counter += 10_000;
    }
    log
}

#[test]
fn test_rdtsc_scenario_negative_value_dropped() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let log = write_log(
        dir.path(),
        "exchange_1.log",
        "10:00:00.000000 RDTSC T1_OrderServer_TCP_read 2600000\n\
         10:00:00.000010 RDTSC T1_OrderServer_TCP_read -5\n",
    );

    let config = AnalysisConfig::load(None, Some("2.60".parse().unwrap())).unwrap();
    let records = ingest(&config, &[log]).unwrap();
    assert_eq!(records.rdtsc().len(), 2);
    assert!((records.rdtsc()[0].value - 1_000_000.0).abs() < 1e-6);

    let report = analyze(&config, &records);
    assert_eq!(report.rdtsc.len(), 1);
    // The negative reading is dropped before trimming, leaving one sample.
    assert_eq!(report.rdtsc[0].outcome, SeriesOutcome::InsufficientData { usable: 1 });
}

#[test]
fn test_hop_pipeline_across_files() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let log = order_server_log(300);
    let split = log[..log.len() / 2].rfind('\n').unwrap() + 1;
    let (first, second) = log.split_at(split);

    // Second half written first: order must come from timestamps, and a
    // repeated file must not double-count.
    let b = write_log(dir.path(), "client_2.log", second);
    let a = write_log(dir.path(), "exchange_1.log", first);
    let config = AnalysisConfig::default();
    let records = ingest(&config, &[b.clone(), a, b]).unwrap();
    assert_eq!(records.ttt().len(), 600);

    let report = analyze(&config, &records);
    assert_eq!(report.hops.len(), 20);

    let hop = &report.hops[0];
    assert_eq!(hop.name, "T1_OrderServer_TCP_read -> T2_OrderServer_LFQueue_write");
    let summary = hop.outcome.summary().expect("hop should be summarized");
    assert_eq!(summary.unit, LatencyUnit::Nanoseconds);
    // Trimming drops the 400s, the 449s and the outlier.
    assert_eq!(summary.count, 288);
    assert!((summary.mean_ns - 424.5).abs() < 1e-9);
    assert_eq!(summary.window, 2);
    assert_eq!(summary.smoothed_series[0].value, None);

    // T2 -> T3 has no destination events at all.
    assert_eq!(report.hops[1].outcome, SeriesOutcome::InsufficientData { usable: 0 });

    // Line counters include the repeated file, record counts do not.
    assert_eq!(report.ingest.ttt, 900);
    assert_eq!(report.ttt_records, 600);
    let mut out = Vec::new();
    report.render_text(&mut out).unwrap();
    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("Accepted TTT lines: 900"));
    assert!(text.contains("Records after dedup: RDTSC: 0  TTT: 600"));
}

#[test]
fn test_empty_topology_with_ttt_data() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = write_log(dir.path(), "titan-perf.toml", "hops = []\n");
    let log = write_log(dir.path(), "exchange_1.log", &order_server_log(10));

    let config = AnalysisConfig::load(Some(&config_path), None).unwrap();
    let report = analyze(&config, &ingest(&config, &[log]).unwrap());
    assert!(report.hops.is_empty());
    assert_eq!(report.ttt_records, 20);

    let mut out = Vec::new();
    report.render_text(&mut out).unwrap();
    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("No hops configured."));
    assert!(!text.contains("No TTT data to report."));
}

#[test]
fn test_glob_resolution_and_missing_patterns() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    write_log(dir.path(), "exchange_1.log", "");
    write_log(dir.path(), "exchange_2.log", "");
    write_log(dir.path(), "notes.txt", "");

    let patterns = vec![
        dir.path().join("exchange*.log").display().to_string(),
        dir.path().join("missing*.log").display().to_string(),
    ];
    let files = resolve_log_files(&patterns).unwrap();
    let names: Vec<_> = files
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, ["exchange_1.log", "exchange_2.log"]);
}

#[test]
fn test_unreadable_file_is_fatal() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let config = AnalysisConfig::default();
    assert!(ingest(&config, &[dir.path().join("gone.log")]).is_err());
}

#[test]
fn test_config_file_overrides_topology() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = write_log(
        dir.path(),
        "titan-perf.toml",
        "cpu_freq_ghz = 2.0\n\n[[hops]]\nsource = \"T1_OrderServer_TCP_read\"\ndestination = \"T2_OrderServer_LFQueue_write\"\n",
    );
    let log = write_log(dir.path(), "exchange_1.log", &order_server_log(50));

    let config = AnalysisConfig::load(Some(&config_path), None).unwrap();
    assert_eq!(config.cpu_freq.as_ghz(), 2.0);

    let report = analyze(&config, &ingest(&config, &[log]).unwrap());
    assert_eq!(report.hops.len(), 1);
    assert!(report.hops[0].outcome.summary().is_some());
}

#[test]
fn test_cli_writes_json_report() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    write_log(dir.path(), "exchange_1.log", &order_server_log(120));
    let json_path = dir.path().join("report.json");

    let output = Command::new(env!("CARGO_BIN_EXE_titan-perf"))
        .arg(dir.path().join("*.log").display().to_string())
        .args(["--cpu-freq", "2.60", "--json"])
        .arg(&json_path)
        .output()
        .expect("Failed to run titan-perf");

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("HOP T1_OrderServer_TCP_read -> T2_OrderServer_LFQueue_write"));
    assert!(stdout.contains("No RDTSC data to report."));

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&json_path).unwrap()).unwrap();
    assert_eq!(json["cpu_freq_ghz"], 2.6);
    assert_eq!(json["hops"][0]["outcome"]["status"], "summarized");
    assert_eq!(json["ingest"]["ttt"], 240);
}

#[test]
fn test_cli_rejects_zero_frequency() {
    let output = Command::new(env!("CARGO_BIN_EXE_titan-perf"))
        .args(["/nonexistent/*.log", "--cpu-freq", "0"])
        .output()
        .expect("Failed to run titan-perf");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("greater than zero"), "stderr: {}", stderr);
}

#[test]
fn test_cli_rejects_non_numeric_frequency() {
    let output = Command::new(env!("CARGO_BIN_EXE_titan-perf"))
        .args(["/nonexistent/*.log", "--cpu-freq", "fast"])
        .output()
        .expect("Failed to run titan-perf");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("invalid cpu frequency 'fast'"), "stderr: {}", stderr);
}
