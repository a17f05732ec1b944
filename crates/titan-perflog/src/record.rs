//! Typed latency records.

use chrono::NaiveTime;
use serde::Serialize;

/// Kind of latency event, taken from the second field of a log line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum EventKind {
    /// Point duration measured with the cycle counter.
    Rdtsc,
    /// Counter reading at a named point on the critical path.
    Ttt,
}

impl EventKind {
    pub const RDTSC_LABEL: &'static str = "RDTSC";
    pub const TTT_LABEL: &'static str = "TTT";

    /// Map a log label to a kind. Labels are case-sensitive.
    #[inline]
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            Self::RDTSC_LABEL => Some(Self::Rdtsc),
            Self::TTT_LABEL => Some(Self::Ttt),
            _ => None,
        }
    }

    /// Label as written in the log.
    #[inline]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Rdtsc => Self::RDTSC_LABEL,
            Self::Ttt => Self::TTT_LABEL,
        }
    }
}

/// One accepted log line.
///
/// For [`EventKind::Rdtsc`] the value is already in nanoseconds. For
/// [`EventKind::Ttt`] it is the raw counter reading and only meaningful as
/// an operand for differencing.
#[derive(Clone, Debug, PartialEq)]
pub struct ParsedRecord {
    pub timestamp: NaiveTime,
    pub kind: EventKind,
    pub tag: String,
    pub value: f64,
}

/// A record inside one of the per-kind streams.
///
/// The kind is implied by the stream that owns it.
#[derive(Clone, Debug, PartialEq)]
pub struct LatencyRecord {
    pub timestamp: NaiveTime,
    pub tag: String,
    pub value: f64,
}

impl LatencyRecord {
    pub fn new(timestamp: NaiveTime, tag: impl Into<String>, value: f64) -> Self {
        Self {
            timestamp,
            tag: tag.into(),
            value,
        }
    }

    /// Identity used for duplicate suppression.
    ///
    /// `0.0` and `-0.0` compare equal, so they share a key.
    #[inline]
    pub(crate) fn dedup_key(&self) -> (NaiveTime, &str, u64) {
        let bits = if self.value == 0.0 {
            0.0f64.to_bits()
        } else {
            self.value.to_bits()
        };
        (self.timestamp, self.tag.as_str(), bits)
    }
}

impl From<ParsedRecord> for LatencyRecord {
    fn from(record: ParsedRecord) -> Self {
        Self {
            timestamp: record.timestamp,
            tag: record.tag,
            value: record.value,
        }
    }
}
