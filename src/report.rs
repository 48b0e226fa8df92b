//! # Report Composition and Output
//!
//! Builds the two outputs of an analysis run from the same parsed records:
//!
//! - a markdown report for people (`analysis_report.md` by default)
//! - a JSON snapshot of the underlying numbers for tooling such as chart
//!   generators (`analysis_data.json` by default)
//!
//! Both are pure functions of an `AnalysisInput` plus the generation
//! timestamp, which is captured once by the caller and passed in. Composing
//! twice from the same input and timestamp gives byte-identical output.

use crate::aggregate::{
    capitalize, group_concurrency_by_workload, group_timing_by_category, ConcurrencyTables,
    GroupedTable, TimingTables,
};
use crate::measurement::ConcurrencyRecord;
use crate::scaling::{analyze_scalability, ScalingPoint, ScalingTables, WorkloadScaling};
use crate::timing::TimingRecord;
use crate::units::{format_throughput, format_time};
use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Parsed records feeding one report
#[derive(Debug, Clone, Default)]
pub struct AnalysisInput {
    /// Timing records keyed by the report file they came from
    pub timing: BTreeMap<String, Vec<TimingRecord>>,
    /// One record per measurement file, in load order
    pub concurrency: Vec<ConcurrencyRecord>,
}

impl AnalysisInput {
    pub fn is_empty(&self) -> bool {
        self.timing.values().all(Vec::is_empty) && self.concurrency.is_empty()
    }

    /// All timing records across sources, in source order
    pub fn all_timing(&self) -> impl Iterator<Item = &TimingRecord> {
        self.timing.values().flatten()
    }

    pub fn timing_count(&self) -> usize {
        self.timing.values().map(Vec::len).sum()
    }
}

/// Grouped and derived view over an `AnalysisInput`
pub struct Analysis<'a> {
    pub timing_groups: GroupedTable<&'a TimingRecord>,
    pub workload_groups: GroupedTable<&'a ConcurrencyRecord>,
    pub scaling: Vec<WorkloadScaling>,
}

impl<'a> Analysis<'a> {
    pub fn new(input: &'a AnalysisInput) -> Self {
        let timing_groups = group_timing_by_category(input.all_timing());
        let workload_groups = group_concurrency_by_workload(&input.concurrency);
        let scaling = analyze_scalability(&workload_groups);

        Self {
            timing_groups,
            workload_groups,
            scaling,
        }
    }

    /// Highest-throughput run of a workload.
    ///
    /// Ties go to the lowest thread count since groups are sorted by threads.
    pub fn peak_run(&self, workload: &str) -> Option<&'a ConcurrencyRecord> {
        self.workload_groups
            .get(workload)?
            .iter()
            .copied()
            .reduce(|best, run| {
                if run.throughput_ops_per_sec > best.throughput_ops_per_sec {
                    run
                } else {
                    best
                }
            })
    }

    /// Timing record with the smallest median time; first one wins on ties
    pub fn fastest_operation(&self) -> Option<&'a TimingRecord> {
        self.timing_groups
            .iter()
            .flat_map(|group| group.records.iter().copied())
            .reduce(|best, record| {
                if record.time_mid < best.time_mid {
                    record
                } else {
                    best
                }
            })
    }
}

/// One timing entry in the snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimingEntry {
    pub name: String,
    pub time_mid_us: f64,
    pub time_low_us: f64,
    pub time_high_us: f64,
}

impl From<&TimingRecord> for TimingEntry {
    fn from(record: &TimingRecord) -> Self {
        Self {
            name: record.name.clone(),
            time_mid_us: record.time_mid,
            time_low_us: record.time_low,
            time_high_us: record.time_high,
        }
    }
}

/// One concurrency run in the snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConcurrencyEntry {
    pub workload: String,
    pub threads: u32,
    pub throughput: f64,
    pub latency_p50_ms: f64,
    pub latency_p99_ms: f64,
    pub total_ops: u64,
}

impl From<&ConcurrencyRecord> for ConcurrencyEntry {
    fn from(record: &ConcurrencyRecord) -> Self {
        Self {
            workload: record.workload_type.clone(),
            threads: record.threads,
            throughput: record.throughput_ops_per_sec,
            latency_p50_ms: record.latencies_ms.p50,
            latency_p99_ms: record.latencies_ms.p99,
            total_ops: record.total_operations,
        }
    }
}

/// Host and tool information recorded with each snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotMetadata {
    pub version: String,
    pub os: String,
    pub architecture: String,
    pub cpu_cores: usize,
}

impl Default for SnapshotMetadata {
    fn default() -> Self {
        Self {
            version: crate::VERSION.to_string(),
            os: std::env::consts::OS.to_string(),
            architecture: std::env::consts::ARCH.to_string(),
            cpu_cores: num_cpus::get(),
        }
    }
}

/// Machine-readable counterpart of the markdown report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisSnapshot {
    pub timestamp: DateTime<Local>,
    pub metadata: SnapshotMetadata,
    pub criterion_benchmarks: BTreeMap<String, Vec<TimingEntry>>,
    pub concurrent_benchmarks: Vec<ConcurrencyEntry>,
    pub scalability: BTreeMap<String, Vec<ScalingPoint>>,
}

/// Both outputs of one analysis run
#[derive(Debug, Clone)]
pub struct ComposedReport {
    pub markdown: String,
    pub snapshot: AnalysisSnapshot,
}

/// Compose the markdown report and snapshot for `input`
pub fn compose(input: &AnalysisInput, generated_at: DateTime<Local>) -> ComposedReport {
    let analysis = Analysis::new(input);

    ComposedReport {
        markdown: render_markdown(&analysis, &generated_at),
        snapshot: build_snapshot(input, &analysis, generated_at),
    }
}

/// Render the human-readable report
pub fn render_markdown(analysis: &Analysis<'_>, generated_at: &DateTime<Local>) -> String {
    let mut out = String::new();

    // Writing into a String cannot fail, so the fmt::Results are discarded.
    let _ = writeln!(out, "# Performance Analysis Report");
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "**Generated**: {}",
        generated_at.format("%Y-%m-%d %H:%M:%S")
    );
    let _ = writeln!(out);
    let _ = writeln!(out, "---");
    let _ = writeln!(out);

    write_executive_summary(&mut out, analysis);

    if !analysis.timing_groups.is_empty() {
        let _ = write!(out, "{}", TimingTables(&analysis.timing_groups));
    }

    if !analysis.workload_groups.is_empty() {
        let _ = write!(out, "{}", ConcurrencyTables(&analysis.workload_groups));
    }

    if !analysis.scaling.is_empty() {
        let _ = write!(out, "{}", ScalingTables(&analysis.scaling));
    }

    write_key_findings(&mut out, analysis);

    out
}

fn write_executive_summary(out: &mut String, analysis: &Analysis<'_>) {
    let _ = writeln!(out, "## Executive Summary");
    let _ = writeln!(out);

    let read = analysis.peak_run("read");
    let write_peak = analysis.peak_run("write");
    let fastest = analysis.fastest_operation();

    if let Some(run) = read {
        let _ = writeln!(
            out,
            "- **Peak Read Throughput**: {}",
            format_throughput(run.throughput_ops_per_sec)
        );
    }
    if let Some(run) = write_peak {
        let _ = writeln!(
            out,
            "- **Peak Write Throughput**: {}",
            format_throughput(run.throughput_ops_per_sec)
        );
    }
    if let Some(record) = fastest {
        let _ = writeln!(
            out,
            "- **Fastest Operation**: {} at {}",
            record.name,
            format_time(record.time_mid)
        );
    }
    if read.is_none() && write_peak.is_none() && fastest.is_none() {
        let _ = writeln!(out, "- No benchmark results were found");
    }
    let _ = writeln!(out);
}

fn write_key_findings(out: &mut String, analysis: &Analysis<'_>) {
    let _ = writeln!(out, "## Key Findings");
    let _ = writeln!(out);

    if let Some(record) = analysis.fastest_operation() {
        let _ = writeln!(
            out,
            "- **Fastest operation**: {} at {}",
            record.name,
            format_time(record.time_mid)
        );
    }

    for (workload, label) in [("read", "read"), ("write", "write")] {
        if let Some(run) = analysis.peak_run(workload) {
            let _ = writeln!(
                out,
                "- **Best concurrent {}**: {} with {} threads",
                label,
                format_throughput(run.throughput_ops_per_sec),
                run.threads
            );
        }
    }

    for scaling in &analysis.scaling {
        if let Some(last) = scaling.points.last() {
            let _ = writeln!(
                out,
                "- **{} scaling**: {:.1}% efficiency at {} threads",
                capitalize(&scaling.workload),
                last.efficiency,
                last.threads
            );
        }
    }
    let _ = writeln!(out);
}

/// Build the structured snapshot from the same state as the report
pub fn build_snapshot(
    input: &AnalysisInput,
    analysis: &Analysis<'_>,
    generated_at: DateTime<Local>,
) -> AnalysisSnapshot {
    let criterion_benchmarks = input
        .timing
        .iter()
        .map(|(source, records)| {
            (
                source.clone(),
                records.iter().map(TimingEntry::from).collect(),
            )
        })
        .collect();

    let concurrent_benchmarks = input
        .concurrency
        .iter()
        .map(ConcurrencyEntry::from)
        .collect();

    let scalability = analysis
        .scaling
        .iter()
        .map(|scaling| (scaling.workload.clone(), scaling.points.clone()))
        .collect();

    AnalysisSnapshot {
        timestamp: generated_at,
        metadata: SnapshotMetadata::default(),
        criterion_benchmarks,
        concurrent_benchmarks,
        scalability,
    }
}

/// Writes composed reports into an output directory
#[derive(Debug, Clone)]
pub struct ReportWriter {
    output_dir: PathBuf,
    report_name: String,
    data_name: String,
}

impl ReportWriter {
    /// Create a writer using the default file names
    pub fn new(output_dir: &Path) -> Self {
        Self {
            output_dir: output_dir.to_path_buf(),
            report_name: crate::defaults::REPORT_FILE.to_string(),
            data_name: crate::defaults::DATA_FILE.to_string(),
        }
    }

    pub fn with_file_names(mut self, report_name: &str, data_name: &str) -> Self {
        self.report_name = report_name.to_string();
        self.data_name = data_name.to_string();
        self
    }

    pub fn report_path(&self) -> PathBuf {
        self.output_dir.join(&self.report_name)
    }

    pub fn data_path(&self) -> PathBuf {
        self.output_dir.join(&self.data_name)
    }

    /// Write the markdown report and JSON snapshot.
    ///
    /// Any failure here is fatal to the run: producing these files is the
    /// only thing the analyzer is for.
    pub fn write(&self, report: &ComposedReport) -> Result<()> {
        std::fs::create_dir_all(&self.output_dir).with_context(|| {
            format!(
                "Failed to create output directory {}",
                self.output_dir.display()
            )
        })?;

        let report_path = self.report_path();
        std::fs::write(&report_path, &report.markdown)
            .with_context(|| format!("Failed to write report {}", report_path.display()))?;
        info!("Analysis report written to: {}", report_path.display());

        let data_path = self.data_path();
        let json = serde_json::to_string_pretty(&report.snapshot)
            .context("Failed to serialize analysis snapshot")?;
        std::fs::write(&data_path, json)
            .with_context(|| format!("Failed to write analysis data {}", data_path.display()))?;
        info!("Analysis data written to: {}", data_path.display());

        debug!(
            "Snapshot contains {} timing sources and {} concurrency runs",
            report.snapshot.criterion_benchmarks.len(),
            report.snapshot.concurrent_benchmarks.len()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::measurement::LatencySummary;
    use crate::timing::parse_timing_report;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn fixed_time() -> DateTime<Local> {
        Local.with_ymd_and_hms(2026, 3, 14, 15, 9, 26).single().unwrap()
    }

    fn run(workload: &str, threads: u32, throughput: f64) -> ConcurrencyRecord {
        ConcurrencyRecord {
            workload_type: workload.to_string(),
            threads,
            duration_secs: 10,
            total_operations: 50_000,
            successful_operations: 49_990,
            failed_operations: 10,
            throughput_ops_per_sec: throughput,
            latencies_ms: LatencySummary {
                min: 0.01,
                max: 20.0,
                mean: 0.5,
                p50: 0.4,
                p95: 1.2,
                p99: 2.5,
            },
        }
    }

    fn sample_input() -> AnalysisInput {
        let mut input = AnalysisInput::default();
        input.timing.insert(
            "graph_ops.txt".to_string(),
            parse_timing_report(
                "vertex_scan/100 time: [40.809 µs 40.979 µs 41.166 µs]\n\
                 vertex_scan/1000 time: [402.11 µs 405.37 µs 409.02 µs]\n\
                 edge_lookup time: [812.40 ns 815.02 ns 818.91 ns]",
            ),
        );
        input.timing.insert(
            "query_ops.txt".to_string(),
            parse_timing_report("query/match time: [1.2 ms 1.3 ms 1.4 ms]"),
        );
        input.concurrency = vec![
            run("Read", 4, 3_600_000.0),
            run("Read", 1, 1_000_000.0),
            run("Write", 1, 20_000.0),
            run("mixed", 2, 50_000.0),
        ];
        input
    }

    #[test]
    fn test_markdown_sections() {
        let input = sample_input();
        let report = compose(&input, fixed_time());
        let md = &report.markdown;

        assert!(md.starts_with("# Performance Analysis Report\n"));
        assert!(md.contains("**Generated**: 2026-03-14 15:09:26"));
        assert!(md.contains("- **Peak Read Throughput**: 3.60M ops/s"));
        assert!(md.contains("- **Peak Write Throughput**: 20.00K ops/s"));
        assert!(md.contains("- **Fastest Operation**: edge_lookup at 815.02 ns"));
        assert!(md.contains("### vertex_scan"));
        assert!(md.contains("### query"));
        assert!(md.contains("### Read Workload\n"));
        assert!(md.contains("### Read Workload Scaling"));
        assert!(md.contains("| 4 | 3.60M ops/s | 4.00M ops/s | 90.0% |"));
        assert!(md.contains("- **Best concurrent read**: 3.60M ops/s with 4 threads"));
        assert!(md.contains("- **Best concurrent write**: 20.00K ops/s with 1 threads"));

        // Single-run workloads get a table but no scaling section.
        assert!(md.contains("### Mixed Workload\n"));
        assert!(!md.contains("### Mixed Workload Scaling"));
        assert!(!md.contains("### Write Workload Scaling"));
    }

    #[test]
    fn test_section_order() {
        let report = compose(&sample_input(), fixed_time());
        let md = &report.markdown;

        let positions: Vec<usize> = [
            "## Executive Summary",
            "## Criterion Benchmark Results",
            "## Concurrent Benchmark Results",
            "## Scalability Analysis",
            "## Key Findings",
        ]
        .iter()
        .map(|heading| md.find(heading).unwrap())
        .collect();

        assert!(positions.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn test_empty_input_report() {
        let input = AnalysisInput::default();
        assert!(input.is_empty());

        let report = compose(&input, fixed_time());
        assert!(report.markdown.contains("## Executive Summary"));
        assert!(report.markdown.contains("No benchmark results were found"));
        assert!(!report.markdown.contains("## Criterion Benchmark Results"));
        assert!(!report.markdown.contains("## Concurrent Benchmark Results"));
        assert!(!report.markdown.contains("## Scalability Analysis"));
        assert!(report.snapshot.criterion_benchmarks.is_empty());
        assert!(report.snapshot.concurrent_benchmarks.is_empty());
    }

    #[test]
    fn test_composition_is_deterministic() {
        let input = sample_input();
        let first = compose(&input, fixed_time());
        let second = compose(&input, fixed_time());

        assert_eq!(first.markdown, second.markdown);
        assert_eq!(
            serde_json::to_string(&first.snapshot).unwrap(),
            serde_json::to_string(&second.snapshot).unwrap()
        );
    }

    #[test]
    fn test_snapshot_values() {
        let input = sample_input();
        let snapshot = compose(&input, fixed_time()).snapshot;

        assert_eq!(snapshot.timestamp, fixed_time());
        let graph = &snapshot.criterion_benchmarks["graph_ops.txt"];
        assert_eq!(graph.len(), 3);
        assert_eq!(graph[0].name, "vertex_scan/100");
        assert_eq!(graph[0].time_mid_us, 40.979);

        assert_eq!(snapshot.concurrent_benchmarks.len(), 4);
        assert_eq!(snapshot.concurrent_benchmarks[0].workload, "Read");
        assert_eq!(snapshot.concurrent_benchmarks[0].threads, 4);
        assert_eq!(snapshot.concurrent_benchmarks[0].latency_p99_ms, 2.5);
        assert_eq!(snapshot.concurrent_benchmarks[0].total_ops, 50_000);

        let read = &snapshot.scalability["read"];
        assert_eq!(read.len(), 2);
        assert!((read[1].efficiency - 90.0).abs() < 1e-9);
        assert!(!snapshot.scalability.contains_key("write"));
    }

    #[test]
    fn test_snapshot_json_keys() {
        let snapshot = compose(&sample_input(), fixed_time()).snapshot;
        let value = serde_json::to_value(&snapshot).unwrap();

        assert!(value["timestamp"].is_string());
        assert!(value["metadata"]["cpu_cores"].as_u64().unwrap() > 0);
        let entry = &value["criterion_benchmarks"]["query_ops.txt"][0];
        assert_eq!(entry["name"], "query/match");
        assert_eq!(entry["time_mid_us"], 1300.0);
        let run = &value["concurrent_benchmarks"][1];
        assert_eq!(run["workload"], "Read");
        assert_eq!(run["threads"], 1);
        assert_eq!(run["throughput"], 1_000_000.0);
        assert_eq!(run["latency_p50_ms"], 0.4);
    }

    #[test]
    fn test_peak_tie_prefers_fewer_threads() {
        let mut input = AnalysisInput::default();
        input.concurrency = vec![run("read", 8, 5000.0), run("read", 2, 5000.0)];
        let analysis = Analysis::new(&input);

        assert_eq!(analysis.peak_run("read").unwrap().threads, 2);
        assert!(analysis.peak_run("write").is_none());
    }

    #[test]
    fn test_writer_creates_files() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("nested").join("analysis");
        let writer = ReportWriter::new(&output);
        let report = compose(&sample_input(), fixed_time());

        writer.write(&report).unwrap();

        let md = std::fs::read_to_string(writer.report_path()).unwrap();
        assert_eq!(md, report.markdown);
        let json = std::fs::read_to_string(writer.data_path()).unwrap();
        let parsed: AnalysisSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.concurrent_benchmarks, report.snapshot.concurrent_benchmarks);
        assert_eq!(parsed.criterion_benchmarks, report.snapshot.criterion_benchmarks);
    }

    #[test]
    fn test_writer_custom_names() {
        let dir = TempDir::new().unwrap();
        let writer = ReportWriter::new(dir.path()).with_file_names("run.md", "run.json");

        assert_eq!(writer.report_path(), dir.path().join("run.md"));
        assert_eq!(writer.data_path(), dir.path().join("run.json"));
    }

    #[test]
    fn test_writer_failure_is_reported() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("not_a_dir");
        std::fs::write(&blocker, "file in the way").unwrap();

        let writer = ReportWriter::new(&blocker);
        let report = compose(&AnalysisInput::default(), fixed_time());
        assert!(writer.write(&report).is_err());
    }
}
