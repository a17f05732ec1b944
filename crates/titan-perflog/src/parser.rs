//! Line tokenizer and event classifier.
//!
//! A line is accepted only if it splits on single spaces into exactly four
//! fields: timestamp, kind label, tag and a numeric value. Anything else is
//! a [`Discard`], which callers count and move past.

use chrono::NaiveTime;

use crate::freq::CpuFreqGhz;
use crate::record::{EventKind, ParsedRecord};

/// Reason a line was skipped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Discard {
    /// Not exactly four space-separated fields.
    FieldCount,
    /// Fourth field is not a floating-point number.
    InvalidValue,
    /// Kind label is neither `RDTSC` nor `TTT`.
    UnknownKind,
    /// First field is not a `HH:MM:SS.fraction` time of day.
    InvalidTimestamp,
}

/// Borrowed fields of a well-shaped line.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LineTokens<'a> {
    pub timestamp: &'a str,
    pub kind_label: &'a str,
    pub tag: &'a str,
    pub value: f64,
}

/// Split a line into its four fields.
///
/// Surrounding whitespace (including the line terminator) is trimmed first.
/// Interior splitting is on single spaces, so a doubled space produces an
/// empty field and the line no longer has four fields.
pub fn tokenize(line: &str) -> Result<LineTokens<'_>, Discard> {
    let mut fields = line.trim().split(' ');
    let (Some(timestamp), Some(kind_label), Some(tag), Some(value), None) = (
        fields.next(),
        fields.next(),
        fields.next(),
        fields.next(),
        fields.next(),
    ) else {
        return Err(Discard::FieldCount);
    };

    let value = value.parse::<f64>().map_err(|_| Discard::InvalidValue)?;

    Ok(LineTokens {
        timestamp,
        kind_label,
        tag,
        value,
    })
}

/// Parse a time of day such as `10:00:00.000010`.
///
/// There is no date component, so ordering is only meaningful within a
/// single day. Runs that cross midnight sort incorrectly.
#[inline]
pub fn parse_timestamp(field: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(field, "%H:%M:%S%.f").ok()
}

/// Tokenizer plus classifier, bound to one run's configuration.
#[derive(Clone, Copy, Debug, Default)]
pub struct LineParser {
    cpu_freq: CpuFreqGhz,
}

impl LineParser {
    /// Create a parser that converts RDTSC cycles at `cpu_freq`.
    pub const fn new(cpu_freq: CpuFreqGhz) -> Self {
        Self { cpu_freq }
    }

    /// Parse one raw line into a record.
    pub fn parse_line(&self, line: &str) -> Result<ParsedRecord, Discard> {
        let tokens = tokenize(line)?;
        self.classify(tokens)
    }

    /// Route tokens to a kind and apply unit conversion.
    ///
    /// RDTSC values are divided by the CPU frequency. TTT values pass
    /// through untouched.
    pub fn classify(&self, tokens: LineTokens<'_>) -> Result<ParsedRecord, Discard> {
        let kind = EventKind::from_label(tokens.kind_label).ok_or(Discard::UnknownKind)?;
        let timestamp = parse_timestamp(tokens.timestamp).ok_or(Discard::InvalidTimestamp)?;

        let value = match kind {
            EventKind::Rdtsc => self.cpu_freq.cycles_to_nanos(tokens.value),
            EventKind::Ttt => tokens.value,
        };

        Ok(ParsedRecord {
            timestamp,
            kind,
            tag: tokens.tag.to_string(),
            value,
        })
    }
}
