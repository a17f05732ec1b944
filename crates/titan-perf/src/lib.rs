//! # Titan Perf
//!
//! Offline latency analysis for Titan exchange and client logs.
//!
//! Reads RDTSC and TTT events, summarizes every RDTSC tag and every hop of
//! the pipeline topology, and hands the result to a text report or to a
//! JSON file consumed by the chart renderer.

pub mod config;
pub mod analysis;
pub mod report;
pub mod logging;

pub use config::{resolve_log_files, AnalysisConfig, ConfigError, ConfigFile};
pub use analysis::{analyze, ingest};
pub use report::{AnalysisReport, SeriesReport};
