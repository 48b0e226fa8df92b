//! # Analysis Pipeline
//!
//! Drives one complete analysis run:
//!
//! 1. **Collect**: load timing reports and measurement files, setting aside
//!    anything that fails to parse
//! 2. **Compose**: group, analyze and render the report and snapshot
//! 3. **Write**: persist both outputs to the output directory
//!
//! The run is single-threaded and batch-oriented. All inputs are read before
//! any output is produced, and only output failures stop the run.

use crate::cli::AnalysisConfig;
use crate::inputs::{collect_inputs, CollectedInputs};
use crate::report::{compose, ComposedReport, ReportWriter};
use anyhow::Result;
use chrono::{DateTime, Local};
use tracing::{info, warn};

/// Result of a completed run
#[derive(Debug)]
pub struct AnalysisOutcome {
    pub inputs: CollectedInputs,
    pub report: ComposedReport,
    pub writer: ReportWriter,
}

/// Runs the collect, compose and write stages for one configuration
pub struct AnalysisRunner {
    config: AnalysisConfig,
}

impl AnalysisRunner {
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Execute the run.
    ///
    /// `generated_at` is the single timestamp embedded in both outputs.
    pub fn run(&self, generated_at: DateTime<Local>) -> Result<AnalysisOutcome> {
        if !self.config.has_inputs() {
            warn!("No input directories given; the report will be empty");
        }

        let inputs = collect_inputs(
            self.config.timing_dir.as_deref(),
            self.config.concurrent_dir.as_deref(),
        );

        info!(
            "Loaded {} timing records from {} reports and {} concurrency runs",
            inputs.analysis.timing_count(),
            inputs.analysis.timing.len(),
            inputs.analysis.concurrency.len()
        );
        if inputs.has_failures() {
            warn!("{} input files were excluded", inputs.failures.len());
        }

        let report = compose(&inputs.analysis, generated_at);

        let writer = ReportWriter::new(&self.config.output_dir)
            .with_file_names(&self.config.report_name, &self.config.data_name);
        writer.write(&report)?;

        Ok(AnalysisOutcome {
            inputs,
            report,
            writer,
        })
    }
}
