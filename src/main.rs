//! # Bench Analyzer - Main Entry Point
//!
//! Reads Criterion timing reports and concurrency measurement files,
//! then writes a markdown analysis report and a JSON data snapshot.
//!
//! ## Flow
//!
//! 1. **Parse arguments**: Processes command-line configuration
//! 2. **Initialize logging**: Colored console output, optional log file
//! 3. **Run analysis**: Collect inputs, compose outputs, write them
//! 4. **Summarize**: Print file counts, excluded files and the report
//!
//! ## Error Handling
//!
//! Input problems never stop a run; they are logged and listed in the
//! summary. Failing to write the outputs is returned as an error and ends
//! the process with a non-zero status.

use anyhow::Result;
use bench_analyzer::{
    cli::{AnalysisConfig, Args},
    logging,
    pipeline::{AnalysisOutcome, AnalysisRunner},
};
use clap::Parser;
use colored::*;
use tracing::{debug, info};

fn main() -> Result<()> {
    let args = Args::parse();
    let config = AnalysisConfig::from(&args);

    // Held until exit so the log file is flushed.
    let _log_guard = logging::init_logging(&config.log_directive, config.log_file.as_deref())?;

    info!("Starting benchmark analysis");
    debug!("Configuration: {:?}", config);

    let echo_report = config.echo_report;
    let runner = AnalysisRunner::new(config);
    let outcome = runner.run(chrono::Local::now())?;

    print_summary(&outcome, echo_report);

    info!("Benchmark analysis completed");
    Ok(())
}

/// Print the end-of-run summary to stdout
fn print_summary(outcome: &AnalysisOutcome, echo_report: bool) {
    let rule = "=".repeat(60);
    let inputs = &outcome.inputs;

    println!();
    println!("{}", rule);
    println!("{}", "ANALYSIS SUMMARY".bold());
    println!("{}", rule);
    println!(
        "Timing reports:    {} scanned, {} with results, {} records",
        inputs.timing_files_scanned,
        inputs.analysis.timing.len(),
        inputs.analysis.timing_count()
    );
    println!(
        "Measurement files: {} scanned, {} parsed",
        inputs.measurement_files_scanned,
        inputs.analysis.concurrency.len()
    );
    println!("Report:            {}", outcome.writer.report_path().display());
    println!("Data:              {}", outcome.writer.data_path().display());

    if inputs.has_failures() {
        println!();
        println!(
            "{}",
            format!("Excluded {} input files:", inputs.failures.len()).yellow()
        );
        for failure in &inputs.failures {
            println!("  {} {}", "-".red(), failure.reason);
        }
    }

    if echo_report {
        println!("{}", rule);
        println!();
        println!("{}", outcome.report.markdown);
    }
}
