//! # Concurrency Measurement-File Parser
//!
//! Each concurrency benchmark run writes one JSON summary:
//!
//! ```json
//! {
//!   "workload_type": "Read",
//!   "threads": 4,
//!   "duration_secs": 30,
//!   "total_operations": 120000,
//!   "successful_operations": 119990,
//!   "failed_operations": 10,
//!   "throughput_ops_per_sec": 4000.0,
//!   "latencies_ms": { "min": 0.1, "max": 9.2, "mean": 0.9, "p50": 0.8, "p95": 2.1, "p99": 4.0 }
//! }
//! ```
//!
//! Every field above is required. Extra fields such as `per_thread_ops` are
//! ignored. A file that fails to parse produces a `MeasurementError` naming
//! the file; callers are expected to log it and keep going with the rest of
//! the batch.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Latency summary of one run, in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatencySummary {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub p50: f64,
    pub p95: f64,
    pub p99: f64,
}

/// Summary of one concurrency workload run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConcurrencyRecord {
    pub workload_type: String,
    pub threads: u32,
    pub duration_secs: u64,
    pub total_operations: u64,
    pub successful_operations: u64,
    pub failed_operations: u64,
    pub throughput_ops_per_sec: f64,
    pub latencies_ms: LatencySummary,
}

impl ConcurrencyRecord {
    /// Grouping key: the workload label, case-folded
    pub fn workload_key(&self) -> String {
        self.workload_type.to_lowercase()
    }

    /// Whether successful and failed operations fit within the total.
    ///
    /// The parser does not enforce this; it is exposed so the loader can
    /// flag suspicious files.
    pub fn is_consistent(&self) -> bool {
        self.successful_operations
            .checked_add(self.failed_operations)
            .map_or(false, |sum| sum <= self.total_operations)
    }
}

/// Failure to turn one measurement file into a `ConcurrencyRecord`
#[derive(Debug, Error)]
pub enum MeasurementError {
    #[error("Failed to read measurement file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed measurement file {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid thread count in {path}: threads must be at least 1")]
    InvalidThreads { path: PathBuf },
}

impl MeasurementError {
    /// The file this error refers to
    pub fn path(&self) -> &Path {
        match self {
            MeasurementError::Io { path, .. }
            | MeasurementError::Json { path, .. }
            | MeasurementError::InvalidThreads { path } => path,
        }
    }
}

/// Parse measurement JSON already loaded into memory.
///
/// `path` is only used to label errors.
pub fn parse_measurement_str(
    contents: &str,
    path: &Path,
) -> Result<ConcurrencyRecord, MeasurementError> {
    let record: ConcurrencyRecord =
        serde_json::from_str(contents).map_err(|source| MeasurementError::Json {
            path: path.to_path_buf(),
            source,
        })?;

    if record.threads == 0 {
        return Err(MeasurementError::InvalidThreads {
            path: path.to_path_buf(),
        });
    }

    Ok(record)
}

/// Read and parse one measurement file
pub fn parse_measurement_file<P: AsRef<Path>>(
    path: P,
) -> Result<ConcurrencyRecord, MeasurementError> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path).map_err(|source| MeasurementError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    parse_measurement_str(&contents, path)
}
