//! Record store.
//!
//! Accumulates records from any number of sources, then freezes into a
//! [`RecordSet`] whose two streams are deduplicated and ordered by time of
//! day. The set is immutable once built.

use std::collections::HashSet;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use serde::Serialize;
use tracing::{debug, info};

use crate::error::IngestError;
use crate::parser::{Discard, LineParser};
use crate::record::{EventKind, LatencyRecord, ParsedRecord};

/// Line counters for one or more sources.
///
/// Purely diagnostic. Discards never change the outcome of a run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct IngestStats {
    pub lines: u64,
    pub rdtsc: u64,
    pub ttt: u64,
    pub bad_field_count: u64,
    pub bad_value: u64,
    pub bad_timestamp: u64,
    pub unknown_kind: u64,
}

impl IngestStats {
    #[inline]
    fn record_discard(&mut self, discard: Discard) {
        match discard {
            Discard::FieldCount => self.bad_field_count += 1,
            Discard::InvalidValue => self.bad_value += 1,
            Discard::InvalidTimestamp => self.bad_timestamp += 1,
            Discard::UnknownKind => self.unknown_kind += 1,
        }
    }

    /// Total lines skipped for any reason.
    pub fn discarded(&self) -> u64 {
        self.bad_field_count + self.bad_value + self.bad_timestamp + self.unknown_kind
    }

    /// Add another set of counters into this one.
    pub fn merge(&mut self, other: &IngestStats) {
        self.lines += other.lines;
        self.rdtsc += other.rdtsc;
        self.ttt += other.ttt;
        self.bad_field_count += other.bad_field_count;
        self.bad_value += other.bad_value;
        self.bad_timestamp += other.bad_timestamp;
        self.unknown_kind += other.unknown_kind;
    }
}

/// Mutable accumulator used during ingestion.
#[derive(Debug)]
pub struct RecordStore {
    parser: LineParser,
    rdtsc: Vec<LatencyRecord>,
    ttt: Vec<LatencyRecord>,
    stats: IngestStats,
}

impl RecordStore {
    /// Create an empty store that parses lines with `parser`.
    pub fn new(parser: LineParser) -> Self {
        Self {
            parser,
            rdtsc: Vec::new(),
            ttt: Vec::new(),
            stats: IngestStats::default(),
        }
    }

    /// Add an already-parsed record.
    pub fn push(&mut self, record: ParsedRecord) {
        match record.kind {
            EventKind::Rdtsc => {
                self.stats.rdtsc += 1;
                self.rdtsc.push(record.into());
            }
            EventKind::Ttt => {
                self.stats.ttt += 1;
                self.ttt.push(record.into());
            }
        }
    }

    /// Parse and add one raw line. Returns the discard reason, if any.
    pub fn ingest_line(&mut self, line: &str) -> Result<(), Discard> {
        self.stats.lines += 1;
        match self.parser.parse_line(line) {
            Ok(record) => {
                self.push(record);
                Ok(())
            }
            Err(discard) => {
                self.stats.record_discard(discard);
                Err(discard)
            }
        }
    }

    /// Ingest every line from a reader.
    ///
    /// Lines are split on `\n`. Invalid UTF-8 is replaced rather than
    /// treated as an I/O error, so a torn write costs one line only.
    /// Returns the counters for this reader alone.
    pub fn ingest_reader<R: BufRead>(&mut self, mut reader: R) -> io::Result<IngestStats> {
        let before = self.stats;
        let mut buf = Vec::with_capacity(256);

        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            let line = String::from_utf8_lossy(&buf);
            let _ = self.ingest_line(&line);
        }

        Ok(self.stats_since(&before))
    }

    /// Open and ingest one log file.
    pub fn ingest_file(&mut self, path: &Path) -> Result<IngestStats, IngestError> {
        info!(file = %path.display(), "processing file");

        let file = File::open(path).map_err(|e| IngestError::read(path, e))?;
        let stats = self
            .ingest_reader(BufReader::new(file))
            .map_err(|e| IngestError::read(path, e))?;

        debug!(
            file = %path.display(),
            lines = stats.lines,
            rdtsc = stats.rdtsc,
            ttt = stats.ttt,
            discarded = stats.discarded(),
            "file ingested"
        );
        Ok(stats)
    }

    /// Counters accumulated so far.
    pub fn stats(&self) -> &IngestStats {
        &self.stats
    }

    /// Deduplicate, sort and freeze.
    pub fn finish(self) -> RecordSet {
        RecordSet {
            rdtsc: normalize(self.rdtsc),
            ttt: normalize(self.ttt),
            stats: self.stats,
        }
    }

    fn stats_since(&self, before: &IngestStats) -> IngestStats {
        IngestStats {
            lines: self.stats.lines - before.lines,
            rdtsc: self.stats.rdtsc - before.rdtsc,
            ttt: self.stats.ttt - before.ttt,
            bad_field_count: self.stats.bad_field_count - before.bad_field_count,
            bad_value: self.stats.bad_value - before.bad_value,
            bad_timestamp: self.stats.bad_timestamp - before.bad_timestamp,
            unknown_kind: self.stats.unknown_kind - before.unknown_kind,
        }
    }
}

/// Drop exact duplicates (first occurrence wins), then stable-sort by time.
fn normalize(records: Vec<LatencyRecord>) -> Vec<LatencyRecord> {
    let keep: Vec<bool> = {
        let mut seen = HashSet::with_capacity(records.len());
        records.iter().map(|r| seen.insert(r.dedup_key())).collect()
    };

    let mut unique: Vec<LatencyRecord> = records
        .into_iter()
        .zip(keep)
        .filter_map(|(record, keep)| keep.then_some(record))
        .collect();

    unique.sort_by_key(|r| r.timestamp);
    unique
}

/// Frozen, ordered record streams for one analysis run.
#[derive(Clone, Debug, Default)]
pub struct RecordSet {
    rdtsc: Vec<LatencyRecord>,
    ttt: Vec<LatencyRecord>,
    stats: IngestStats,
}

impl RecordSet {
    /// RDTSC records, values in nanoseconds.
    pub fn rdtsc(&self) -> &[LatencyRecord] {
        &self.rdtsc
    }

    /// TTT records, values are raw counter readings.
    pub fn ttt(&self) -> &[LatencyRecord] {
        &self.ttt
    }

    /// Ingestion counters.
    pub fn stats(&self) -> &IngestStats {
        &self.stats
    }

    /// True if neither stream holds a record.
    pub fn is_empty(&self) -> bool {
        self.rdtsc.is_empty() && self.ttt.is_empty()
    }

    /// Distinct RDTSC tags, in order of first appearance.
    pub fn rdtsc_tags(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.rdtsc
            .iter()
            .map(|r| r.tag.as_str())
            .filter(|tag| seen.insert(*tag))
            .collect()
    }

    /// RDTSC records for one tag, in time order.
    pub fn rdtsc_for<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a LatencyRecord> + 'a {
        self.rdtsc.iter().filter(move |r| r.tag == tag)
    }
}
