//! # Record Grouping and Tabular Rendering
//!
//! Groups parsed records by their semantic key and renders each group as a
//! markdown table:
//!
//! - Timing records are grouped by **category**, the part of the benchmark id
//!   before the first `/` (`vertex_scan/100` belongs to `vertex_scan`). An id
//!   without a `/` forms its own category.
//! - Concurrency records are grouped by lower-cased **workload type** and
//!   sorted by thread count inside each group.
//!
//! Groups are kept in the order their key was first seen, so output built
//! from the same input is always identical.

use crate::measurement::ConcurrencyRecord;
use crate::timing::TimingRecord;
use crate::units::{format_count, format_throughput, format_time};
use std::collections::HashMap;
use std::fmt;

/// Records sharing one grouping key
#[derive(Debug, Clone, PartialEq)]
pub struct Group<T> {
    pub key: String,
    pub records: Vec<T>,
}

/// Ordered mapping from grouping key to the records under that key
#[derive(Debug, Clone)]
pub struct GroupedTable<T> {
    groups: Vec<Group<T>>,
    index: HashMap<String, usize>,
}

impl<T> GroupedTable<T> {
    pub fn new() -> Self {
        Self {
            groups: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Append a record to the group for `key`, creating the group if needed
    pub fn push(&mut self, key: &str, record: T) {
        match self.index.get(key) {
            Some(&position) => self.groups[position].records.push(record),
            None => {
                self.index.insert(key.to_string(), self.groups.len());
                self.groups.push(Group {
                    key: key.to_string(),
                    records: vec![record],
                });
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&[T]> {
        self.index
            .get(key)
            .map(|&position| self.groups[position].records.as_slice())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Group<T>> {
        self.groups.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|group| group.key.as_str())
    }

    /// Number of groups
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Number of records across all groups
    pub fn total_records(&self) -> usize {
        self.groups.iter().map(|group| group.records.len()).sum()
    }

    fn groups_mut(&mut self) -> std::slice::IterMut<'_, Group<T>> {
        self.groups.iter_mut()
    }
}

impl<T> Default for GroupedTable<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, T> IntoIterator for &'a GroupedTable<T> {
    type Item = &'a Group<T>;
    type IntoIter = std::slice::Iter<'a, Group<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Category of a benchmark id: everything before the first `/`
pub fn category_of(name: &str) -> &str {
    name.split('/').next().unwrap_or(name)
}

/// Group timing records by category, preserving input order within each group
pub fn group_timing_by_category<'a, I>(records: I) -> GroupedTable<&'a TimingRecord>
where
    I: IntoIterator<Item = &'a TimingRecord>,
{
    let mut table = GroupedTable::new();
    for record in records {
        table.push(category_of(&record.name), record);
    }
    table
}

/// Group concurrency records by lower-cased workload type
///
/// Each group is sorted ascending by thread count. The sort is stable, so
/// runs with equal thread counts keep their input order.
pub fn group_concurrency_by_workload<'a, I>(records: I) -> GroupedTable<&'a ConcurrencyRecord>
where
    I: IntoIterator<Item = &'a ConcurrencyRecord>,
{
    let mut table = GroupedTable::new();
    for record in records {
        table.push(&record.workload_key(), record);
    }

    for group in table.groups_mut() {
        group.records.sort_by_key(|record| record.threads);
    }

    table
}

/// Upper-case the first character of a workload key for headings
pub fn capitalize(key: &str) -> String {
    let mut chars = key.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Markdown rendering of timing records, one table per category
pub struct TimingTables<'a>(pub &'a GroupedTable<&'a TimingRecord>);

impl<'a> fmt::Display for TimingTables<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "## Criterion Benchmark Results")?;
        writeln!(f)?;

        for group in self.0 {
            writeln!(f, "### {}", group.key)?;
            writeln!(f)?;
            writeln!(f, "| Benchmark | Time (median) | Time Range |")?;
            writeln!(f, "|-----------|---------------|------------|")?;

            for record in &group.records {
                writeln!(
                    f,
                    "| {} | {} | [{} - {}] |",
                    record.display_name(&group.key),
                    format_time(record.time_mid),
                    format_time(record.time_low),
                    format_time(record.time_high)
                )?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}

/// Markdown rendering of concurrency runs, one table per workload
pub struct ConcurrencyTables<'a>(pub &'a GroupedTable<&'a ConcurrencyRecord>);

impl<'a> fmt::Display for ConcurrencyTables<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "## Concurrent Benchmark Results")?;
        writeln!(f)?;

        for group in self.0 {
            writeln!(f, "### {} Workload", capitalize(&group.key))?;
            writeln!(f)?;
            writeln!(
                f,
                "| Threads | Throughput | Latency p50 | Latency p99 | Total Ops |"
            )?;
            writeln!(
                f,
                "|---------|------------|-------------|-------------|-----------|"
            )?;

            for record in &group.records {
                writeln!(
                    f,
                    "| {} | {} | {:.3} ms | {:.3} ms | {} |",
                    record.threads,
                    format_throughput(record.throughput_ops_per_sec),
                    record.latencies_ms.p50,
                    record.latencies_ms.p99,
                    format_count(record.total_operations)
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
    use crate::measurement::LatencySummary;
    use crate::timing::parse_timing_report;

    fn run(workload: &str, threads: u32, throughput: f64) -> ConcurrencyRecord {
        ConcurrencyRecord {
            workload_type: workload.to_string(),
            threads,
            duration_secs: 10,
            total_operations: (throughput * 10.0) as u64,
            successful_operations: (throughput * 10.0) as u64,
            failed_operations: 0,
            throughput_ops_per_sec: throughput,
            latencies_ms: LatencySummary {
                min: 0.05,
                max: 12.0,
                mean: 0.4,
                p50: 0.25,
                p95: 1.5,
                p99: 3.125,
            },
        }
    }

    const REPORT: &str = "\
vertex_scan/100 time: [40.809 µs 40.979 µs 41.166 µs]
edge_lookup time: [812.40 ns 815.02 ns 818.91 ns]
vertex_scan/1000 time: [402.11 µs 405.37 µs 409.02 µs]
query/match/deep time: [1.2 ms 1.3 ms 1.4 ms]";

    #[test]
    fn test_category_of() {
        assert_eq!(category_of("vertex_scan/100"), "vertex_scan");
        assert_eq!(category_of("query/match/deep"), "query");
        assert_eq!(category_of("edge_lookup"), "edge_lookup");
    }

    #[test]
    fn test_group_timing_preserves_order() {
        let records = parse_timing_report(REPORT);
        let table = group_timing_by_category(&records);

        let keys: Vec<&str> = table.keys().collect();
        assert_eq!(keys, vec!["vertex_scan", "edge_lookup", "query"]);

        let scans = table.get("vertex_scan").unwrap();
        assert_eq!(scans.len(), 2);
        assert_eq!(scans[0].name, "vertex_scan/100");
        assert_eq!(scans[1].name, "vertex_scan/1000");
    }

    #[test]
    fn test_grouping_is_a_partition() {
        let records = parse_timing_report(REPORT);
        let table = group_timing_by_category(&records);

        assert_eq!(table.total_records(), records.len());
        for record in &records {
            let owners = table
                .iter()
                .filter(|group| group.records.iter().any(|r| std::ptr::eq(*r, record)))
                .count();
            assert_eq!(owners, 1, "{} must be in exactly one group", record.name);
        }
    }

    #[test]
    fn test_group_concurrency_case_insensitive_and_sorted() {
        let runs = vec![
            run("Read", 8, 7000.0),
            run("write", 2, 1500.0),
            run("READ", 1, 1000.0),
            run("read", 4, 3900.0),
        ];
        let table = group_concurrency_by_workload(&runs);

        assert_eq!(table.len(), 2);
        assert_eq!(table.total_records(), runs.len());

        let threads: Vec<u32> = table
            .get("read")
            .unwrap()
            .iter()
            .map(|r| r.threads)
            .collect();
        assert_eq!(threads, vec![1, 4, 8]);
        assert!(table.get("Read").is_none());
    }

    #[test]
    fn test_timing_table_strips_prefix() {
        let records = parse_timing_report(REPORT);
        let table = group_timing_by_category(&records);
        let rendered = TimingTables(&table).to_string();

        assert!(rendered.contains("### vertex_scan\n"));
        assert!(rendered.contains("| 100 | 40.98 µs | [40.81 µs - 41.17 µs] |"));
        assert!(rendered.contains("| edge_lookup | 815.02 ns |"));
        assert!(rendered.contains("| match/deep | 1.30 ms |"));
        assert!(!rendered.contains("| vertex_scan/100 |"));
    }

    #[test]
    fn test_concurrency_table_rows() {
        let runs = vec![run("read", 4, 4000.0), run("read", 1, 1000.0)];
        let table = group_concurrency_by_workload(&runs);
        let rendered = ConcurrencyTables(&table).to_string();

        assert!(rendered.contains("### Read Workload\n"));
        let one = rendered.find("| 1 | 1.00K ops/s | 0.250 ms | 3.125 ms | 10,000 |").unwrap();
        let four = rendered.find("| 4 | 4.00K ops/s |").unwrap();
        assert!(one < four);
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("read"), "Read");
        assert_eq!(capitalize("mixed"), "Mixed");
        assert_eq!(capitalize(""), "");
    }
}
