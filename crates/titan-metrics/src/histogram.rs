//! Latency distribution with HdrHistogram.
//!
//! Provides nanosecond-precision percentile snapshots.

use hdrhistogram::Histogram;
use serde::Serialize;

/// High-precision latency histogram.
pub struct LatencyHistogram {
    histogram: Histogram<u64>,
}

impl LatencyHistogram {
    /// Create a new histogram with 3 significant digits.
    pub fn new() -> Self {
        Self {
            histogram: Histogram::new(3).expect("3 significant digits is a valid precision"),
        }
    }

    /// Record a latency in nanoseconds.
    ///
    /// Fractional nanoseconds are rounded; negative and non-finite values
    /// are ignored.
    #[inline(always)]
    pub fn record(&mut self, nanos: f64) {
        if nanos.is_finite() && nanos >= 0.0 {
            let _ = self.histogram.record(nanos.round() as u64);
        }
    }

    /// Get value at percentile (0.0 - 100.0).
    pub fn value_at_percentile(&self, percentile: f64) -> u64 {
        self.histogram.value_at_quantile(percentile / 100.0)
    }

    /// Get total count of recorded values.
    pub fn count(&self) -> u64 {
        self.histogram.len()
    }

    /// Snapshot the usual percentiles.
    pub fn distribution(&self) -> Distribution {
        Distribution {
            min: self.histogram.min(),
            p50: self.value_at_percentile(50.0),
            p90: self.value_at_percentile(90.0),
            p99: self.value_at_percentile(99.0),
            p999: self.value_at_percentile(99.9),
            max: self.histogram.max(),
        }
    }
}

impl Default for LatencyHistogram {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> Extend<&'a f64> for LatencyHistogram {
    fn extend<I: IntoIterator<Item = &'a f64>>(&mut self, iter: I) {
        for &nanos in iter {
            self.record(nanos);
        }
    }
}

/// Percentile snapshot, all values in nanoseconds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Distribution {
    pub min: u64,
    pub p50: u64,
    pub p90: u64,
    pub p99: u64,
    pub p999: u64,
    pub max: u64,
}

/// Format a nanosecond latency with an appropriate unit.
pub fn format_latency(nanos: u64) -> String {
    if nanos < 1_000 {
        format!("{} ns", nanos)
    } else if nanos < 1_000_000 {
        format!("{:.2} μs", nanos as f64 / 1_000.0)
    } else if nanos < 1_000_000_000 {
        format!("{:.2} ms", nanos as f64 / 1_000_000.0)
    } else {
        format!("{:.2} s", nanos as f64 / 1_000_000_000.0)
    }
}
