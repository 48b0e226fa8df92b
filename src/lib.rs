//! # Bench Analyzer Library
//!
//! Turns raw benchmark output into a normalized, comparable performance
//! analysis. Two kinds of input are understood:
//!
//! - **Timing reports**: the text Criterion prints during `cargo bench`,
//!   typically captured to a file per benchmark suite
//! - **Measurement files**: one JSON summary per concurrency workload run,
//!   with thread count, throughput and a latency distribution
//!
//! ## Architecture Overview
//!
//! The library is organized into several key modules:
//!
//! - `units`: Time normalization to microseconds and display formatting
//! - `timing`: Lazy line scanner for Criterion timing reports
//! - `measurement`: Strict parser for concurrency measurement files
//! - `aggregate`: Grouping by category / workload and table rendering
//! - `scaling`: Baseline selection and scaling efficiency
//! - `report`: Markdown report and JSON snapshot composition and output
//! - `inputs`: Directory discovery with per-file failure isolation
//! - `pipeline`: The collect, compose and write run
//! - `cli`, `logging`: Command-line configuration and log setup
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use bench_analyzer::{AnalysisConfig, AnalysisRunner};
//! use std::path::PathBuf;
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = AnalysisConfig::for_directories(
//!         Some(PathBuf::from("benchmark_results/rust")),
//!         Some(PathBuf::from("benchmark_results/concurrent")),
//!         PathBuf::from("benchmark_results/analysis"),
//!     );
//!
//!     let outcome = AnalysisRunner::new(config).run(chrono::Local::now())?;
//!     println!("{}", outcome.report.markdown);
//!     Ok(())
//! }
//! ```

/// Record grouping and markdown table rendering
///
/// Groups timing records by the category prefix of their benchmark id and
/// concurrency runs by workload type, keeping group order deterministic.
pub mod aggregate;

/// Command-line interface and configuration
///
/// Provides argument parsing using clap and converts it into the
/// `AnalysisConfig` used by the pipeline.
pub mod cli;

/// Input discovery and loading
///
/// Lists input directories in file-name order and isolates per-file
/// failures so one bad file never voids the rest of the analysis.
pub mod inputs;

pub mod logging;

/// Concurrency measurement-file parsing
pub mod measurement;

/// End-to-end analysis run
pub mod pipeline;

/// Report composition and output
///
/// Produces the markdown report and the JSON snapshot from the same parsed
/// state and writes both to the output directory.
pub mod report;

/// Scaling efficiency analysis
pub mod scaling;

/// Criterion timing-report parsing
pub mod timing;

/// Time unit normalization and human-readable formatting
pub mod units;

pub use aggregate::{group_concurrency_by_workload, group_timing_by_category, GroupedTable};
pub use cli::{AnalysisConfig, Args};
pub use measurement::{ConcurrencyRecord, LatencySummary, MeasurementError};
pub use pipeline::{AnalysisOutcome, AnalysisRunner};
pub use report::{AnalysisInput, AnalysisSnapshot, ComposedReport, ReportWriter};
pub use scaling::{ScalingPoint, WorkloadScaling};
pub use timing::{TimingRecord, TimingScanner};

/// The current version of the analyzer
///
/// Recorded in every snapshot so results can be traced to the tool that
/// produced them.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default configuration values
pub mod defaults {
    /// Default output directory for the report and snapshot
    pub const OUTPUT_DIR: &str = "benchmark_results/analysis";

    /// Default markdown report file name
    pub const REPORT_FILE: &str = "analysis_report.md";

    /// Default JSON snapshot file name
    ///
    /// Chart generators look for this name in the output directory.
    pub const DATA_FILE: &str = "analysis_data.json";

    /// Extension of Criterion timing report files
    pub const TIMING_EXTENSION: &str = "txt";

    /// Extension of concurrency measurement files
    pub const MEASUREMENT_EXTENSION: &str = "json";
}
