//! # Titan Perflog
//!
//! Ingestion of the latency event logs written by the exchange and the
//! trading client.
//!
//! Every instrumented component appends lines of the form
//! `<HH:MM:SS.ffffff> <RDTSC|TTT> <tag> <value>`. This crate turns those
//! lines into typed records and collects them into two ordered,
//! deduplicated streams:
//! - RDTSC: point durations, converted from cycles to nanoseconds
//! - TTT: raw counter readings, differenced later into hop latencies
//!
//! Malformed lines are an expected steady-state condition (truncated
//! writes, interleaved output) and are skipped, never fatal.

pub mod error;
pub mod freq;
pub mod record;
pub mod parser;
pub mod store;

pub use error::{FrequencyError, IngestError};
pub use freq::CpuFreqGhz;
pub use record::{EventKind, LatencyRecord, ParsedRecord};
pub use parser::{Discard, LineParser, LineTokens, parse_timestamp, tokenize};
pub use store::{IngestStats, RecordSet, RecordStore};
