//! TSC-backed stopwatch for timing analysis phases.

use quanta::{Clock, Instant};

/// Elapsed-time measurement with `quanta`'s calibrated TSC clock.
pub struct Stopwatch {
    clock: Clock,
    start: Instant,
}

impl Stopwatch {
    /// Start a new stopwatch.
    pub fn start() -> Self {
        let clock = Clock::new();
        let start = clock.now();
        Self { clock, start }
    }

    /// Return nanoseconds since start (or the last lap) and restart.
    pub fn lap(&mut self) -> u64 {
        let now = self.clock.now();
        let nanos = now.duration_since(self.start).as_nanos();
        self.start = now;
        u64::try_from(nanos).unwrap_or(u64::MAX)
    }
}
