//! # Input Discovery and Loading
//!
//! Finds timing reports (`*.txt`) and measurement files (`*.json`) in their
//! input directories and parses them into an `AnalysisInput`.
//!
//! ## Failure Policy
//!
//! Nothing in this module aborts a run:
//!
//! - A missing or unreadable input directory contributes no records
//! - A timing report that cannot be read contributes no records
//! - A malformed measurement file is reported and left out
//!
//! Every excluded file is recorded as an `InputFailure` so the caller can
//! report it. Directory entries are processed in file-name order, which
//! keeps the resulting report independent of filesystem iteration order.

use crate::measurement::parse_measurement_file;
use crate::report::AnalysisInput;
use crate::timing::parse_timing_file;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

/// A file that was left out of the analysis and why
#[derive(Debug, Clone, PartialEq)]
pub struct InputFailure {
    pub path: PathBuf,
    pub reason: String,
}

/// Everything loaded for one run, plus what could not be loaded
#[derive(Debug, Default)]
pub struct CollectedInputs {
    pub analysis: AnalysisInput,
    pub timing_files_scanned: usize,
    pub measurement_files_scanned: usize,
    pub failures: Vec<InputFailure>,
}

impl CollectedInputs {
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }
}

/// List files in `dir` with the given extension, sorted by file name
pub fn list_files(dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("Failed to read input directory {}", dir.display()))?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry
            .with_context(|| format!("Failed to list input directory {}", dir.display()))?
            .path();

        if path.is_file() && path.extension().map_or(false, |ext| ext == extension) {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}

/// File name used as the snapshot key for a timing report
fn source_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// List input files, treating an unusable directory as empty
fn discover(dir: &Path, extension: &str, kind: &str) -> Vec<PathBuf> {
    match list_files(dir, extension) {
        Ok(files) => {
            if files.is_empty() {
                warn!("No {} files (*.{}) found in {}", kind, extension, dir.display());
            }
            files
        }
        Err(e) => {
            warn!("Skipping {} input: {:#}", kind, e);
            Vec::new()
        }
    }
}

/// Parse every timing report in `dir` into `collected`
pub fn collect_timing_reports(dir: &Path, collected: &mut CollectedInputs) {
    for path in discover(dir, crate::defaults::TIMING_EXTENSION, "timing report") {
        collected.timing_files_scanned += 1;

        match parse_timing_file(&path) {
            Ok(records) if records.is_empty() => {
                debug!("No timing lines found in {}", path.display());
            }
            Ok(records) => {
                let name = source_name(&path);
                info!("Parsed {} benchmarks from {}", records.len(), name);
                collected.analysis.timing.insert(name, records);
            }
            Err(e) => {
                error!("Error parsing {}: {:#}", path.display(), e);
                collected.failures.push(InputFailure {
                    path,
                    reason: format!("{:#}", e),
                });
            }
        }
    }
}

/// Parse every measurement file in `dir` into `collected`
pub fn collect_measurements(dir: &Path, collected: &mut CollectedInputs) {
    for path in discover(dir, crate::defaults::MEASUREMENT_EXTENSION, "measurement") {
        collected.measurement_files_scanned += 1;

        match parse_measurement_file(&path) {
            Ok(record) => {
                if !record.is_consistent() {
                    warn!(
                        "{}: successful ({}) + failed ({}) operations exceed total ({})",
                        path.display(),
                        record.successful_operations,
                        record.failed_operations,
                        record.total_operations
                    );
                }
                info!("Parsed concurrent result from {}", source_name(&path));
                collected.analysis.concurrency.push(record);
            }
            Err(e) => {
                error!("Error parsing {}", e);
                collected.failures.push(InputFailure {
                    path,
                    reason: e.to_string(),
                });
            }
        }
    }
}

/// Load both input kinds; either directory may be absent
pub fn collect_inputs(timing_dir: Option<&Path>, measurement_dir: Option<&Path>) -> CollectedInputs {
    let mut collected = CollectedInputs::default();

    match timing_dir {
        Some(dir) => collect_timing_reports(dir, &mut collected),
        None => debug!("No timing report directory given"),
    }

    match measurement_dir {
        Some(dir) => collect_measurements(dir, &mut collected),
        None => debug!("No measurement directory given"),
    }

    collected
}
