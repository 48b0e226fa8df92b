//! # Scalability Analysis
//!
//! Derives scaling efficiency for each workload from its runs at different
//! thread counts. Efficiency is measured against ideal linear scaling from a
//! baseline run:
//!
//! - The baseline is the single-thread run when one exists, otherwise the run
//!   with the lowest thread count.
//! - `expected = baseline_throughput / baseline_threads * threads`
//! - `efficiency = throughput / expected * 100`
//!
//! Values above 100% (super-linear scaling, usually cache effects) are
//! reported as-is. Workloads with a single run have no baseline to compare
//! against and are skipped.

use crate::aggregate::{capitalize, GroupedTable};
use crate::measurement::ConcurrencyRecord;
use crate::units::format_throughput;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Observed versus ideal throughput at one thread count
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScalingPoint {
    pub threads: u32,
    pub throughput: f64,
    pub expected_linear: f64,
    /// Percentage of the linear expectation actually achieved
    pub efficiency: f64,
}

/// Scaling points for one workload, ascending by thread count
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkloadScaling {
    pub workload: String,
    pub points: Vec<ScalingPoint>,
}

/// Pick the scaling baseline from runs sorted ascending by thread count
pub fn select_baseline<'a>(runs: &[&'a ConcurrencyRecord]) -> Option<&'a ConcurrencyRecord> {
    runs.iter()
        .find(|run| run.threads == 1)
        .or_else(|| runs.first())
        .copied()
}

/// Compute scaling points for one workload.
///
/// `runs` must already be sorted by thread count, as produced by
/// `group_concurrency_by_workload`. Returns `None` for fewer than two runs.
pub fn analyze_workload(runs: &[&ConcurrencyRecord]) -> Option<Vec<ScalingPoint>> {
    if runs.len() < 2 {
        return None;
    }

    let baseline = select_baseline(runs)?;
    let per_thread = baseline.throughput_ops_per_sec / f64::from(baseline.threads);

    let points = runs
        .iter()
        .map(|run| {
            let expected_linear = per_thread * f64::from(run.threads);
            let efficiency = if expected_linear > 0.0 {
                run.throughput_ops_per_sec / expected_linear * 100.0
            } else {
                0.0
            };

            ScalingPoint {
                threads: run.threads,
                throughput: run.throughput_ops_per_sec,
                expected_linear,
                efficiency,
            }
        })
        .collect();

    Some(points)
}

/// Scaling analysis for every workload with at least two runs
pub fn analyze_scalability(table: &GroupedTable<&ConcurrencyRecord>) -> Vec<WorkloadScaling> {
    table
        .iter()
        .filter_map(|group| {
            analyze_workload(&group.records).map(|points| WorkloadScaling {
                workload: group.key.clone(),
                points,
            })
        })
        .collect()
}

/// Markdown rendering of the scalability section
pub struct ScalingTables<'a>(pub &'a [WorkloadScaling]);

impl<'a> fmt::Display for ScalingTables<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "## Scalability Analysis")?;
        writeln!(f)?;

        for scaling in self.0 {
            writeln!(f, "### {} Workload Scaling", capitalize(&scaling.workload))?;
            writeln!(f)?;
            writeln!(f, "| Threads | Throughput | Expected (Linear) | Efficiency |")?;
            writeln!(f, "|---------|------------|-------------------|------------|")?;

            for point in &scaling.points {
                writeln!(
                    f,
                    "| {} | {} | {} | {:.1}% |",
                    point.threads,
                    format_throughput(point.throughput),
                    format_throughput(point.expected_linear),
                    point.efficiency
                )?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::group_concurrency_by_workload;
    use crate::measurement::LatencySummary;

    fn run(workload: &str, threads: u32, throughput: f64) -> ConcurrencyRecord {
        ConcurrencyRecord {
            workload_type: workload.to_string(),
            threads,
            duration_secs: 5,
            total_operations: 100,
            successful_operations: 100,
            failed_operations: 0,
            throughput_ops_per_sec: throughput,
            latencies_ms: LatencySummary {
                min: 0.1,
                max: 1.0,
                mean: 0.3,
                p50: 0.2,
                p95: 0.6,
                p99: 0.9,
            },
        }
    }

    fn efficiencies(runs: &[ConcurrencyRecord]) -> Vec<(u32, f64)> {
        let table = group_concurrency_by_workload(runs);
        let group = table.iter().next().unwrap();
        analyze_workload(&group.records)
            .unwrap()
            .into_iter()
            .map(|point| (point.threads, point.efficiency))
            .collect()
    }

    #[test]
    fn test_linear_scaling_is_full_efficiency() {
        let points = efficiencies(&[run("read", 1, 1000.0), run("read", 4, 4000.0)]);

        assert_eq!(points.len(), 2);
        assert!((points[0].1 - 100.0).abs() < 1e-9);
        assert!((points[1].1 - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_half_efficiency() {
        let points = efficiencies(&[run("read", 4, 2000.0), run("read", 1, 1000.0)]);

        assert_eq!(points[0], (1, 100.0));
        assert_eq!(points[1].0, 4);
        assert!((points[1].1 - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_baseline_falls_back_to_lowest_threads() {
        let runs = [run("write", 8, 6000.0), run("write", 2, 2000.0)];
        let table = group_concurrency_by_workload(&runs);
        let group = table.get("write").unwrap();

        assert_eq!(select_baseline(group).unwrap().threads, 2);

        let points = analyze_workload(group).unwrap();
        assert_eq!(points[0].expected_linear, 2000.0);
        assert_eq!(points[1].expected_linear, 8000.0);
        assert!((points[1].efficiency - 75.0).abs() < 1e-9);
    }

    #[test]
    fn test_super_linear_is_reported() {
        let points = efficiencies(&[run("mixed", 1, 1000.0), run("mixed", 2, 2600.0)]);
        assert!((points[1].1 - 130.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_baseline_throughput() {
        let points = efficiencies(&[run("read", 1, 0.0), run("read", 2, 500.0)]);
        assert_eq!(points, vec![(1, 0.0), (2, 0.0)]);
    }

    #[test]
    fn test_single_run_is_skipped() {
        let runs = [run("read", 1, 1000.0), run("write", 1, 800.0), run("write", 2, 1500.0)];
        let table = group_concurrency_by_workload(&runs);
        let analysis = analyze_scalability(&table);

        assert_eq!(analysis.len(), 1);
        assert_eq!(analysis[0].workload, "write");
        assert!(analyze_workload(table.get("read").unwrap()).is_none());
    }

    #[test]
    fn test_scaling_table_rendering() {
        let runs = [run("read", 1, 1000.0), run("read", 4, 2000.0)];
        let table = group_concurrency_by_workload(&runs);
        let analysis = analyze_scalability(&table);
        let rendered = ScalingTables(&analysis).to_string();

        assert!(rendered.contains("### Read Workload Scaling"));
        assert!(rendered.contains("| 1 | 1.00K ops/s | 1.00K ops/s | 100.0% |"));
        assert!(rendered.contains("| 4 | 2.00K ops/s | 4.00K ops/s | 50.0% |"));
    }
}
