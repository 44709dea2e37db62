// uarch-bench - Free and Open Source Software Statement
//
// This project, uarch-bench, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/utils/format.rs
// Version: 1.0.0
// Developer: OIEIEIO <oieieio@protonmail.com>
//
// This file provides utility functions for formatting measurements in the
// harness, located in the utils subdirectory. It formats counter values,
// ratios and durations for consistent output in logs and reports.
//
// Tree Location:
// - src/utils/format.rs (formatting utilities)
// - Depends on: std

use std::time::Duration;

/// Placeholder printed for a value that could not be measured.
pub const UNAVAILABLE: &str = "unavailable";

/// Utility functions for formatting measurements
pub struct FormatUtils;

impl FormatUtils {
    /// Format a corrected counter value as a whole number
    pub fn format_count(value: Option<f64>) -> String {
        match value {
            Some(v) => format!("{:.0}", v),
            None => UNAVAILABLE.to_string(),
        }
    }

    /// Format a derived ratio (IPC, MPKI, miss ratio) with two decimals
    pub fn format_ratio(value: Option<f64>) -> String {
        match value {
            Some(v) if v.is_finite() => format!("{:.2}", v),
            _ => UNAVAILABLE.to_string(),
        }
    }

    /// Format a measurement window in the largest fitting unit (ns, us, ms, s)
    pub fn format_duration(duration: Duration) -> String {
        let nanos = duration.as_nanos();
        if nanos < 1_000 {
            format!("{} ns", nanos)
        } else if nanos < 1_000_000 {
            format!("{:.2} us", nanos as f64 / 1_000.0)
        } else if nanos < 1_000_000_000 {
            format!("{:.2} ms", nanos as f64 / 1_000_000.0)
        } else {
            format!("{:.2} s", duration.as_secs_f64())
        }
    }
}


// Changelog:
// - v1.0.0 (2026-10-17): Measurement formatting.
//   - format_count/format_ratio print "unavailable" for unmeasured values.
//   - format_duration picks ns/us/ms/s for short measurement windows.
