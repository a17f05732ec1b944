//! Latency series summarizer.
//!
//! Pipeline for one series:
//! 1. drop non-positive (and non-finite) values
//! 2. two-sided trim: keep values strictly between the 1st and 99th
//!    percentiles
//! 3. mean of what is left, in nanoseconds
//! 4. pick one display unit from that mean and scale the whole series
//! 5. trailing rolling mean with about 100 windows across the series

use chrono::NaiveTime;
use serde::Serialize;

use crate::histogram::{Distribution, LatencyHistogram};
use crate::unit::{LatencyUnit, SeriesKind};

/// Series with fewer usable values than this are skipped.
pub const MIN_SAMPLES: usize = 2;

/// Lower trim quantile.
pub const TRIM_LOW: f64 = 0.01;

/// Upper trim quantile.
pub const TRIM_HIGH: f64 = 0.99;

/// Target number of smoothing windows across a series.
pub const SMOOTHING_WINDOWS: usize = 100;

/// A timestamped latency value.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub timestamp: NaiveTime,
    pub value: f64,
}

impl SeriesPoint {
    pub const fn new(timestamp: NaiveTime, value: f64) -> Self {
        Self { timestamp, value }
    }
}

/// Rolling-mean value, absent until the first full window.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct SmoothedPoint {
    pub timestamp: NaiveTime,
    pub value: Option<f64>,
}

/// Everything a renderer needs to plot one series.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LatencySummary {
    pub kind: SeriesKind,
    pub unit: LatencyUnit,
    /// Values remaining after trimming.
    pub count: usize,
    /// Mean of the trimmed series, before unit scaling.
    pub mean_ns: f64,
    /// Rolling-mean window length.
    pub window: usize,
    /// Percentiles of the trimmed series, in nanoseconds.
    pub distribution: Distribution,
    /// Trimmed series in `unit`.
    pub raw_series: Vec<SeriesPoint>,
    /// Rolling mean of `raw_series`, position-aligned.
    pub smoothed_series: Vec<SmoothedPoint>,
}

impl LatencySummary {
    /// Mean expressed in the display unit.
    #[inline]
    pub fn mean(&self) -> f64 {
        self.unit.scale(self.mean_ns)
    }
}

/// Result of summarizing one series.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SeriesOutcome {
    Summarized(LatencySummary),
    /// Not enough usable values. A normal outcome, not a failure.
    InsufficientData { usable: usize },
}

impl SeriesOutcome {
    pub fn summary(&self) -> Option<&LatencySummary> {
        match self {
            Self::Summarized(summary) => Some(summary),
            Self::InsufficientData { .. } => None,
        }
    }
}

/// Summarize one series of nanosecond latencies.
pub fn summarize(kind: SeriesKind, mut points: Vec<SeriesPoint>) -> SeriesOutcome {
    points.retain(|p| p.value > 0.0 && p.value.is_finite());
    if points.len() < MIN_SAMPLES {
        return SeriesOutcome::InsufficientData {
            usable: points.len(),
        };
    }

    let trimmed = trim_tails(points);
    let values: Vec<f64> = trimmed.iter().map(|p| p.value).collect();
    let Some(mean_ns) = mean(&values) else {
        return SeriesOutcome::InsufficientData { usable: 0 };
    };

    let mut histogram = LatencyHistogram::new();
    histogram.extend(&values);

    let unit = kind.select_unit(mean_ns);
    let scaled: Vec<f64> = values.iter().map(|&v| unit.scale(v)).collect();
    let window = rolling_window(scaled.len());
    let smoothed = rolling_mean(&scaled, window);

    let raw_series = trimmed
        .iter()
        .zip(&scaled)
        .map(|(p, &value)| SeriesPoint::new(p.timestamp, value))
        .collect();
    let smoothed_series = trimmed
        .iter()
        .zip(smoothed)
        .map(|(p, value)| SmoothedPoint {
            timestamp: p.timestamp,
            value,
        })
        .collect();

    SeriesOutcome::Summarized(LatencySummary {
        kind,
        unit,
        count: values.len(),
        mean_ns,
        window,
        distribution: histogram.distribution(),
        raw_series,
        smoothed_series,
    })
}

/// Quantile of sorted values, linear interpolation between closest ranks.
pub fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    let last = sorted.len().checked_sub(1)?;
    let pos = last as f64 * q.clamp(0.0, 1.0);
    let lo = pos.floor() as usize;
    let hi = (pos.ceil() as usize).min(last);
    let frac = pos - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

/// Keep points strictly between the 1st and 99th percentiles.
///
/// Extreme points are discarded, not clamped. If nothing would survive
/// (e.g. every value is identical, or only two values) the input is
/// returned unchanged.
pub fn trim_tails(points: Vec<SeriesPoint>) -> Vec<SeriesPoint> {
    let mut sorted: Vec<f64> = points.iter().map(|p| p.value).collect();
    sorted.sort_by(f64::total_cmp);

    let (Some(low), Some(high)) = (quantile(&sorted, TRIM_LOW), quantile(&sorted, TRIM_HIGH)) else {
        return points;
    };

    let kept: Vec<SeriesPoint> = points
        .iter()
        .copied()
        .filter(|p| p.value > low && p.value < high)
        .collect();

    if kept.is_empty() {
        points
    } else {
        kept
    }
}

/// Arithmetic mean, `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Rolling window for a series of `count` values: `max(1, count / 100)`.
#[inline]
pub fn rolling_window(count: usize) -> usize {
    (count / SMOOTHING_WINDOWS).max(1)
}

/// Trailing rolling mean.
///
/// Position `i` holds the mean of `values[i + 1 - window ..= i]`; the first
/// `window - 1` positions are `None`. Each window is summed on its own so a
/// huge value leaving the window cannot leave rounding error behind.
pub fn rolling_mean(values: &[f64], window: usize) -> Vec<Option<f64>> {
    let window = window.max(1);

    (0..values.len())
        .map(|i| {
            let start = (i + 1).checked_sub(window)?;
            let sum: f64 = values[start..=i].iter().sum();
            Some(sum / window as f64)
        })
        .collect()
}
