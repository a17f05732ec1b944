//! Error types for log ingestion.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Invalid CPU frequency configuration.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum FrequencyError {
    #[error("cpu frequency must be a finite number of GHz, got {0}")]
    NotFinite(f64),

    #[error("cpu frequency must be greater than zero, got {0} GHz")]
    NonPositive(f64),

    #[error("invalid cpu frequency '{0}': expected a number of GHz")]
    Parse(String),
}

/// Failure to read a log source.
///
/// Only I/O failures surface here. Bad lines inside a readable file are
/// counted in [`IngestStats`](crate::IngestStats) instead.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("failed to read log file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl IngestError {
    pub fn read(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }
}
