// uarch-bench - Free and Open Source Software Statement
//
// This project, uarch-bench, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/counters/metrics.rs
// Version: 1.0.0
// Developer: OIEIEIO <oieieio@protonmail.com>
//
// This file derives IPC, MPKI and L1D miss ratio from a stopped CounterSet
// and prints the per-counter summary block.
//
// Tree Location:
// - src/counters/metrics.rs (derived metrics and counter summary)
// - Depends on: counters/set, utils/format

use crate::counters::backend::CounterBackend;
use crate::counters::event::CounterCategory;
use crate::counters::set::CounterSet;
use crate::utils::format::FormatUtils;
use std::io::{self, Write};

const LABEL_WIDTH: usize = 15;

/// Ratios derived from one measurement window. `None` means the ratio is
/// undefined because an input counter is missing, unavailable or zero.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DerivedMetrics {
    pub ipc: Option<f64>,
    pub mpki: Option<f64>,
    pub miss_ratio: Option<f64>,
}

/// `numerator / denominator`, undefined for a missing or zero denominator.
fn ratio(numerator: Option<f64>, denominator: Option<f64>) -> Option<f64> {
    match (numerator, denominator) {
        (Some(n), Some(d)) if d != 0.0 => Some(n / d),
        _ => None,
    }
}

/// Instructions retired per cycle.
pub fn ipc(instructions: Option<f64>, cycles: Option<f64>) -> Option<f64> {
    ratio(instructions, cycles)
}

/// L1D misses per thousand instructions.
pub fn mpki(misses: Option<f64>, instructions: Option<f64>) -> Option<f64> {
    ratio(misses, instructions).map(|r| r * 1000.0)
}

/// L1D misses over all L1D accesses (reads + writes).
pub fn miss_ratio(misses: Option<f64>, reads: Option<f64>, writes: Option<f64>) -> Option<f64> {
    let accesses = match (reads, writes) {
        (Some(r), Some(w)) => Some(r + w),
        _ => None,
    };
    ratio(misses, accesses)
}

/// `name: value` with the label right-aligned, value rounded or `unavailable`.
pub fn write_counter_line(out: &mut dyn Write, name: &str, value: Option<f64>) -> io::Result<()> {
    writeln!(
        out,
        "{:>width$}: {}",
        name,
        FormatUtils::format_count(value),
        width = LABEL_WIDTH
    )
}

impl<B: CounterBackend> CounterSet<B> {
    pub fn ipc(&self) -> Option<f64> {
        ipc(
            self.read_category(CounterCategory::Instructions),
            self.read_category(CounterCategory::Cycles),
        )
    }

    pub fn mpki(&self) -> Option<f64> {
        mpki(
            self.read_category(CounterCategory::CacheL1DMiss),
            self.read_category(CounterCategory::Instructions),
        )
    }

    pub fn miss_ratio(&self) -> Option<f64> {
        miss_ratio(
            self.read_category(CounterCategory::CacheL1DMiss),
            self.read_category(CounterCategory::CacheL1DRead),
            self.read_category(CounterCategory::CacheL1DWrite),
        )
    }

    pub fn derived_metrics(&self) -> DerivedMetrics {
        DerivedMetrics {
            ipc: self.ipc(),
            mpki: self.mpki(),
            miss_ratio: self.miss_ratio(),
        }
    }

    /// One `name: value` line per counter followed by the derived ratios.
    pub fn write_summary(&self, out: &mut dyn Write) -> io::Result<()> {
        for handle in self.handles() {
            let value = handle.last_sample().and_then(|sample| sample.corrected());
            write_counter_line(out, &handle.descriptor().name, value)?;
        }
        self.derived_metrics().write_to(out)
    }
}

impl DerivedMetrics {
    pub fn write_to(&self, out: &mut dyn Write) -> io::Result<()> {
        writeln!(out, "{:>width$}: {}", "IPC", FormatUtils::format_ratio(self.ipc), width = LABEL_WIDTH)?;
        writeln!(out, "{:>width$}: {}", "MPKI", FormatUtils::format_ratio(self.mpki), width = LABEL_WIDTH)?;
        writeln!(
            out,
            "{:>width$}: {}",
            "Miss ratio",
            FormatUtils::format_ratio(self.miss_ratio),
            width = LABEL_WIDTH
        )
    }
}
