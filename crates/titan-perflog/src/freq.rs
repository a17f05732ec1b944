//! CPU clock frequency for RDTSC conversion.
//!
//! RDTSC readings are raw TSC cycle counts. Dividing by the invariant TSC
//! frequency in GHz yields nanoseconds.

use core::fmt;
use core::str::FromStr;

use crate::error::FrequencyError;

/// Validated CPU frequency in GHz.
///
/// Always finite and strictly positive, so conversion never divides by
/// zero or flips the sign of a duration.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
#[repr(transparent)]
pub struct CpuFreqGhz(f64);

impl CpuFreqGhz {
    /// Frequency assumed when none is configured.
    pub const DEFAULT: Self = Self(2.60);

    /// Create a frequency, rejecting zero, negative and non-finite values.
    pub fn new(ghz: f64) -> Result<Self, FrequencyError> {
        if !ghz.is_finite() {
            return Err(FrequencyError::NotFinite(ghz));
        }
        if ghz <= 0.0 {
            return Err(FrequencyError::NonPositive(ghz));
        }
        Ok(Self(ghz))
    }

    /// Frequency in GHz.
    #[inline(always)]
    pub const fn as_ghz(self) -> f64 {
        self.0
    }

    /// Convert a cycle count to nanoseconds (`cycles / ghz`, no rounding).
    #[inline(always)]
    pub fn cycles_to_nanos(self, cycles: f64) -> f64 {
        cycles / self.0
    }
}

impl Default for CpuFreqGhz {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for CpuFreqGhz {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2} GHz", self.0)
    }
}

impl FromStr for CpuFreqGhz {
    type Err = FrequencyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let ghz: f64 = s
            .trim()
            .parse()
            .map_err(|_| FrequencyError::Parse(s.to_string()))?;
        Self::new(ghz)
    }
}
