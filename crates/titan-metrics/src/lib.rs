//! Latency summaries and metrics.
//!
//! Turns a noisy latency series into what gets plotted and printed:
//! trimmed raw series, robust mean, display unit, rolling-mean companion,
//! and an HdrHistogram percentile snapshot.

pub mod histogram;
pub mod unit;
pub mod summary;
pub mod stopwatch;

pub use histogram::{format_latency, Distribution, LatencyHistogram};
pub use unit::{LatencyUnit, SeriesKind};
pub use summary::{
    mean, quantile, rolling_mean, rolling_window, summarize, trim_tails, LatencySummary,
    SeriesOutcome, SeriesPoint, SmoothedPoint, MIN_SAMPLES,
};
pub use stopwatch::Stopwatch;
