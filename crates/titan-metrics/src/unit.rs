//! Display units for latency series.

use serde::Serialize;

/// Unit a series is scaled to for display.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LatencyUnit {
    Nanoseconds,
    Microseconds,
    Milliseconds,
}

impl LatencyUnit {
    /// Nanoseconds per unit.
    #[inline]
    pub const fn divisor(self) -> f64 {
        match self {
            Self::Nanoseconds => 1.0,
            Self::Microseconds => 1_000.0,
            Self::Milliseconds => 1_000_000.0,
        }
    }

    /// Convert a nanosecond value to this unit.
    #[inline]
    pub fn scale(self, nanos: f64) -> f64 {
        nanos / self.divisor()
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Nanoseconds => "nanoseconds",
            Self::Microseconds => "microseconds",
            Self::Milliseconds => "milliseconds",
        }
    }

    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Nanoseconds => "ns",
            Self::Microseconds => "μs",
            Self::Milliseconds => "ms",
        }
    }
}

/// What a series measures. Decides the unit ladder.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SeriesKind {
    /// RDTSC point duration: ns or μs.
    Point,
    /// TTT hop transit: ns, μs or ms.
    Hop,
}

impl SeriesKind {
    /// Pick the unit for a series from its mean in nanoseconds.
    ///
    /// Thresholds are inclusive: a mean of exactly 1000 ns is shown in μs.
    pub fn select_unit(self, mean_nanos: f64) -> LatencyUnit {
        match self {
            Self::Point if mean_nanos >= 1_000.0 => LatencyUnit::Microseconds,
            Self::Point => LatencyUnit::Nanoseconds,
            Self::Hop if mean_nanos >= 1_000_000.0 => LatencyUnit::Milliseconds,
            Self::Hop if mean_nanos >= 1_000.0 => LatencyUnit::Microseconds,
            Self::Hop => LatencyUnit::Nanoseconds,
        }
    }
}
