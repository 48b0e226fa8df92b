//! # Unit Normalization and Display Formatting
//!
//! Timing reports mix nanoseconds, microseconds and milliseconds within a
//! single file, sometimes within a single line. Everything the analyzer
//! stores is normalized to microseconds here, and everything it prints is
//! scaled back to a readable unit by the formatters in this module.
//!
//! ## Key Functionality
//!
//! - **Normalization**: `to_canonical_time` converts a value and its unit to µs
//! - **Time display**: `format_time` picks the coarsest unit keeping the value in [1, 1000)
//! - **Rate display**: `format_throughput` scales operations per second to K/M
//! - **Count display**: `format_count` inserts thousands separators
//!
//! ## Usage Examples
//!
//! ```rust
//! use bench_analyzer::units::*;
//!
//! assert_eq!(to_canonical_time(1500.0, TimeUnit::Nanoseconds), 1.5);
//! assert_eq!(format_time(1500.0), "1.50 ms");
//! assert_eq!(format_throughput(2_500_000.0), "2.50M ops/s");
//! assert_eq!(format_count(1234567), "1,234,567");
//! ```
//!
//! The formatters are lossy by design and are never parsed back.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Time units accepted in Criterion timing lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeUnit {
    Nanoseconds,
    Microseconds,
    Milliseconds,
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeUnit::Nanoseconds => write!(f, "ns"),
            TimeUnit::Microseconds => write!(f, "µs"),
            TimeUnit::Milliseconds => write!(f, "ms"),
        }
    }
}

impl FromStr for TimeUnit {
    type Err = String;

    /// Parse a unit literal as Criterion prints it.
    ///
    /// Criterion emits the micro sign (U+00B5), but reports that passed
    /// through other tools sometimes carry the Greek mu (U+03BC) or a plain
    /// ASCII `us`, so all three spellings are accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ns" => Ok(TimeUnit::Nanoseconds),
            "µs" | "μs" | "us" => Ok(TimeUnit::Microseconds),
            "ms" => Ok(TimeUnit::Milliseconds),
            other => Err(format!("Unsupported time unit: {}", other)),
        }
    }
}

/// Convert a time value in the given unit to microseconds
///
/// There is no error path: the unit has already been restricted to the
/// supported set by the time a `TimeUnit` exists.
///
/// ## Examples
///
/// ```rust
/// # use bench_analyzer::units::{to_canonical_time, TimeUnit};
/// assert_eq!(
///     to_canonical_time(1000.0, TimeUnit::Nanoseconds),
///     to_canonical_time(1.0, TimeUnit::Microseconds)
/// );
/// assert_eq!(to_canonical_time(2.5, TimeUnit::Milliseconds), 2500.0);
/// ```
pub fn to_canonical_time(value: f64, unit: TimeUnit) -> f64 {
    match unit {
        TimeUnit::Nanoseconds => value / 1000.0,
        TimeUnit::Microseconds => value,
        TimeUnit::Milliseconds => value * 1000.0,
    }
}

/// Format a microsecond value in the most readable unit
///
/// ## Unit Selection
///
/// - Below 1 µs: nanoseconds
/// - Below 1,000 µs: microseconds
/// - Below 1,000,000 µs: milliseconds
/// - Otherwise: seconds
///
/// Every branch uses two decimal places.
///
/// ## Examples
///
/// ```rust
/// # use bench_analyzer::units::format_time;
/// assert_eq!(format_time(0.5), "500.00 ns");
/// assert_eq!(format_time(40.979), "40.98 µs");
/// assert_eq!(format_time(2_500_000.0), "2.50 s");
/// ```
pub fn format_time(us: f64) -> String {
    if us < 1.0 {
        format!("{:.2} ns", us * 1000.0)
    } else if us < 1000.0 {
        format!("{:.2} µs", us)
    } else if us < 1_000_000.0 {
        format!("{:.2} ms", us / 1000.0)
    } else {
        format!("{:.2} s", us / 1_000_000.0)
    }
}

/// Format an operations-per-second rate with a K/M suffix
pub fn format_throughput(ops: f64) -> String {
    if ops >= 1_000_000.0 {
        format!("{:.2}M ops/s", ops / 1_000_000.0)
    } else if ops >= 1000.0 {
        format!("{:.2}K ops/s", ops / 1000.0)
    } else {
        format!("{:.2} ops/s", ops)
    }
}

/// Format an integer count with comma thousands separators
pub fn format_count(count: u64) -> String {
    let digits = count.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }

    out
}
