use clap::{ArgAction, Parser};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Bench Analyzer - Summarize Criterion and concurrency benchmark results
#[derive(Parser, Debug, Clone, Default)]
#[clap(version, about, long_about = None)]
pub struct Args {
    /// Directory containing Criterion timing reports (*.txt)
    #[clap(short = 't', long, visible_alias = "rust", help_heading = "Input Options")]
    pub timing_dir: Option<PathBuf>,

    /// Directory containing concurrency measurement files (*.json)
    #[clap(short = 'c', long, visible_alias = "concurrent", help_heading = "Input Options")]
    pub concurrent_dir: Option<PathBuf>,

    /// Directory the report and snapshot are written to
    #[clap(short = 'o', long, default_value = crate::defaults::OUTPUT_DIR, help_heading = "Output Options")]
    pub output_dir: PathBuf,

    /// File name of the markdown report
    #[clap(long, default_value = crate::defaults::REPORT_FILE, help_heading = "Output Options")]
    pub report_name: String,

    /// File name of the JSON snapshot
    #[clap(long, default_value = crate::defaults::DATA_FILE, help_heading = "Output Options")]
    pub data_name: String,

    /// Do not print the full report to stdout after writing it
    #[clap(long, default_value_t = false, help_heading = "Output Options")]
    pub no_console_report: bool,

    /// Also write log output to this file
    #[clap(long)]
    pub log_file: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[clap(short = 'v', long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Only log warnings and errors
    #[clap(short = 'q', long, default_value_t = false, conflicts_with = "verbose")]
    pub quiet: bool,
}

/// Resolved settings for one analysis run
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AnalysisConfig {
    pub timing_dir: Option<PathBuf>,
    pub concurrent_dir: Option<PathBuf>,
    pub output_dir: PathBuf,
    pub report_name: String,
    pub data_name: String,
    pub echo_report: bool,
    pub log_file: Option<PathBuf>,
    pub log_directive: String,
}

impl AnalysisConfig {
    /// Config reading from the given directories with every other setting at its default
    pub fn for_directories(
        timing_dir: Option<PathBuf>,
        concurrent_dir: Option<PathBuf>,
        output_dir: PathBuf,
    ) -> Self {
        Self {
            timing_dir,
            concurrent_dir,
            output_dir,
            report_name: crate::defaults::REPORT_FILE.to_string(),
            data_name: crate::defaults::DATA_FILE.to_string(),
            echo_report: false,
            log_file: None,
            log_directive: "info".to_string(),
        }
    }

    pub fn has_inputs(&self) -> bool {
        self.timing_dir.is_some() || self.concurrent_dir.is_some()
    }
}

impl From<&Args> for AnalysisConfig {
    fn from(args: &Args) -> Self {
        Self {
            timing_dir: args.timing_dir.clone(),
            concurrent_dir: args.concurrent_dir.clone(),
            output_dir: args.output_dir.clone(),
            report_name: args.report_name.clone(),
            data_name: args.data_name.clone(),
            echo_report: !args.no_console_report,
            log_file: args.log_file.clone(),
            log_directive: crate::logging::level_directive(args.verbose, args.quiet).to_string(),
        }
    }
}
