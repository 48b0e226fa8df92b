//! # Criterion Timing-Report Parser
//!
//! Extracts per-operation timing records from the text Criterion prints
//! while running `cargo bench`. The input is usually a captured terminal log,
//! so it is full of compiler output, progress lines and change reports that
//! must be skipped without complaint.
//!
//! ## Recognized Shape
//!
//! ```text
//! vertex_scan/100         time:   [40.809 µs 40.979 µs 41.166 µs]
//!                         thrpt:  [2.4292 Melem/s 2.4403 Melem/s 2.4504 Melem/s]
//! ```
//!
//! The first line yields a `TimingRecord`. The `thrpt:` line is attached to
//! the record as an opaque annotation when it immediately follows; any other
//! following line is left for the next match attempt.
//!
//! ## Streaming
//!
//! `TimingScanner` is a pull-based iterator over lines with a single line of
//! lookahead, so a report of any size is processed in constant memory.

use crate::units::{to_canonical_time, TimeUnit};
use anyhow::{Context, Result};
use lazy_static::lazy_static;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{debug, trace};

lazy_static! {
    /// `<name> time: [<low> <unit> <mid> <unit> <high> <unit>]`
    static ref TIMING_LINE: Regex = Regex::new(
        r"^(\S+)\s+time:\s+\[(\d+\.?\d*)\s+(ns|µs|μs|us|ms)\s+(\d+\.?\d*)\s+(ns|µs|μs|us|ms)\s+(\d+\.?\d*)\s+(ns|µs|μs|us|ms)\]"
    )
    .expect("timing line pattern is valid");
}

/// Marker that identifies a throughput annotation line
const THROUGHPUT_MARKER: &str = "thrpt:";

/// One Criterion measurement, normalized to microseconds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimingRecord {
    /// Benchmark id exactly as printed, including any `group/` prefix
    pub name: String,
    pub time_low: f64,
    pub time_mid: f64,
    pub time_high: f64,
    /// Raw `thrpt: [...]` line, trimmed
    pub throughput: Option<String>,
}

impl TimingRecord {
    /// Try to build a record from a single report line.
    ///
    /// Returns `None` for anything that is not a complete timing line,
    /// including lines whose units fall outside ns/µs/ms.
    pub fn from_line(line: &str) -> Option<Self> {
        let caps = TIMING_LINE.captures(line)?;

        Some(Self {
            name: caps[1].to_string(),
            time_low: capture_time(&caps, 2)?,
            time_mid: capture_time(&caps, 4)?,
            time_high: capture_time(&caps, 6)?,
            throughput: None,
        })
    }

    /// Name with its `category/` prefix removed, for rows inside a category table
    pub fn display_name(&self, category: &str) -> &str {
        self.name
            .strip_prefix(category)
            .and_then(|rest| rest.strip_prefix('/'))
            .unwrap_or(&self.name)
    }
}

/// Read the value at `index` and its unit at `index + 1` and normalize to µs
fn capture_time(caps: &Captures<'_>, index: usize) -> Option<f64> {
    let value: f64 = caps[index].parse().ok()?;
    let unit: TimeUnit = caps[index + 1].parse().ok()?;
    Some(to_canonical_time(value, unit))
}

/// Lazy scanner producing `TimingRecord`s from a stream of report lines
///
/// The scanner never fails: lines that do not match are skipped. A line read
/// as lookahead for a throughput annotation that turns out not to be one is
/// kept and offered to the main pattern on the next call to `next`.
pub struct TimingScanner<I> {
    lines: I,
    pending: Option<String>,
}

impl<I> TimingScanner<I>
where
    I: Iterator<Item = String>,
{
    pub fn new(lines: I) -> Self {
        Self {
            lines,
            pending: None,
        }
    }

    fn next_line(&mut self) -> Option<String> {
        self.pending.take().or_else(|| self.lines.next())
    }
}

impl<I> Iterator for TimingScanner<I>
where
    I: Iterator<Item = String>,
{
    type Item = TimingRecord;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = self.next_line()?;

            let Some(mut record) = TimingRecord::from_line(&line) else {
                trace!("Skipping non-timing line: {}", line);
                continue;
            };

            if let Some(following) = self.lines.next() {
                if following.contains(THROUGHPUT_MARKER) {
                    record.throughput = Some(following.trim().to_string());
                } else {
                    self.pending = Some(following);
                }
            }

            return Some(record);
        }
    }
}

/// Parse every timing record in an in-memory report
///
/// ## Examples
///
/// ```rust
/// # use bench_analyzer::timing::parse_timing_report;
/// let records = parse_timing_report("vertex_scan/100 time: [40.809 µs 40.979 µs 41.166 µs]");
/// assert_eq!(records.len(), 1);
/// assert_eq!(records[0].name, "vertex_scan/100");
/// assert_eq!(records[0].time_mid, 40.979);
/// ```
pub fn parse_timing_report(text: &str) -> Vec<TimingRecord> {
    TimingScanner::new(text.lines().map(str::to_string)).collect()
}

/// Parse a timing report file line by line
///
/// Bytes that are not valid UTF-8 are replaced rather than rejected, since
/// captured terminal logs routinely contain escape sequences and partial
/// writes. Only genuine I/O failures are reported as errors.
pub fn parse_timing_file<P: AsRef<Path>>(path: P) -> Result<Vec<TimingRecord>> {
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Failed to open timing report {}", path.display()))?;
    let reader = BufReader::new(file);

    let mut read_error = None;
    let lines = reader.split(b'\n').map_while(|chunk| match chunk {
        Ok(bytes) => {
            let line = String::from_utf8_lossy(&bytes);
            Some(line.trim_end_matches('\r').to_string())
        }
        Err(e) => {
            read_error = Some(e);
            None
        }
    });

    let records: Vec<TimingRecord> = TimingScanner::new(lines).collect();

    if let Some(e) = read_error {
        return Err(e).with_context(|| format!("Failed to read timing report {}", path.display()));
    }

    debug!("Parsed {} timing records from {}", records.len(), path.display());
    Ok(records)
}
