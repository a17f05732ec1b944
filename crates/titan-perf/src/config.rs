//! Run configuration.
//!
//! Precedence, lowest first: built-in defaults, the optional TOML file,
//! then command-line flags. Nothing here is global; the resolved
//! [`AnalysisConfig`] is passed explicitly to ingestion and analysis.
//!
//! ```toml
//! cpu_freq_ghz = 3.1
//!
//! [[hops]]
//! source = "Ticker_Received"
//! destination = "Order_Sent"
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use titan_hops::{HopDefinition, HopTopology};
use titan_perflog::{CpuFreqGhz, FrequencyError};
use tracing::warn;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse TOML in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("glob pattern error: {pattern}: {source}")]
    Glob {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    #[error("failed to list files for pattern {pattern}: {source}")]
    GlobEntry {
        pattern: String,
        #[source]
        source: glob::GlobError,
    },

    #[error(transparent)]
    CpuFrequency(#[from] FrequencyError),

    #[error("hop #{index} has an empty {field} tag")]
    EmptyHopTag { index: usize, field: &'static str },
}

/// On-disk configuration. Every key is optional.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub cpu_freq_ghz: Option<f64>,
    /// Replaces the default topology when present.
    pub hops: Option<Vec<HopDefinition>>,
}

impl ConfigFile {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Resolved configuration for one analysis run.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AnalysisConfig {
    pub cpu_freq: CpuFreqGhz,
    pub topology: HopTopology,
}

impl AnalysisConfig {
    /// Resolve defaults, an optional config file and a CPU frequency flag.
    pub fn load(path: Option<&Path>, cpu_freq: Option<CpuFreqGhz>) -> Result<Self, ConfigError> {
        let file = match path {
            Some(path) => ConfigFile::from_file(path)?,
            None => ConfigFile::default(),
        };

        let mut config = Self::from_file_config(file)?;
        if let Some(cpu_freq) = cpu_freq {
            config.cpu_freq = cpu_freq;
        }
        Ok(config)
    }

    /// Apply a parsed config file on top of the defaults.
    pub fn from_file_config(file: ConfigFile) -> Result<Self, ConfigError> {
        let cpu_freq = match file.cpu_freq_ghz {
            Some(ghz) => CpuFreqGhz::new(ghz)?,
            None => CpuFreqGhz::DEFAULT,
        };

        let topology = match file.hops {
            Some(hops) => {
                validate_hops(&hops)?;
                HopTopology::new(hops)
            }
            None => HopTopology::default_pipeline(),
        };

        Ok(Self { cpu_freq, topology })
    }
}

fn validate_hops(hops: &[HopDefinition]) -> Result<(), ConfigError> {
    for (index, hop) in hops.iter().enumerate() {
        if hop.source.is_empty() {
            return Err(ConfigError::EmptyHopTag { index, field: "source" });
        }
        if hop.destination.is_empty() {
            return Err(ConfigError::EmptyHopTag { index, field: "destination" });
        }
    }
    Ok(())
}

/// Expand glob patterns into a flat file list.
///
/// Patterns are expanded in the order given; matches within a pattern come
/// back sorted. A pattern that matches nothing only logs a warning.
pub fn resolve_log_files(patterns: &[String]) -> Result<Vec<PathBuf>, ConfigError> {
    let mut files = Vec::new();

    for pattern in patterns {
        let paths = glob::glob(pattern).map_err(|source| ConfigError::Glob {
            pattern: pattern.clone(),
            source,
        })?;

        let before = files.len();
        for entry in paths {
            let path = entry.map_err(|source| ConfigError::GlobEntry {
                pattern: pattern.clone(),
                source,
            })?;
            files.push(path);
        }

        if files.len() == before {
            warn!(pattern = %pattern, "pattern matched no files");
        }
    }

    Ok(files)
}
