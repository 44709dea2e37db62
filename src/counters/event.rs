// uarch-bench - Free and Open Source Software Statement
//
// This project, uarch-bench, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/counters/event.rs
// Version: 1.0.0
// Developer: OIEIEIO <oieieio@protonmail.com>
//
// This file describes what a counter measures: its category, the (type,
// config) pair understood by the kernel counter facility, and the immutable
// descriptor stored in a CounterSet.
//
// Tree Location:
// - src/counters/event.rs (counter descriptors and event encodings)
// - Depends on: std

use std::fmt;

pub const PERF_TYPE_HARDWARE: u32 = 0;
pub const PERF_TYPE_HW_CACHE: u32 = 3;
pub const PERF_TYPE_RAW: u32 = 4;

pub const PERF_COUNT_HW_CPU_CYCLES: u64 = 0;
pub const PERF_COUNT_HW_INSTRUCTIONS: u64 = 1;
pub const PERF_COUNT_HW_BRANCH_INSTRUCTIONS: u64 = 4;
pub const PERF_COUNT_HW_BRANCH_MISSES: u64 = 5;

pub const PERF_COUNT_HW_CACHE_L1D: u64 = 0;
pub const PERF_COUNT_HW_CACHE_OP_READ: u64 = 0;
pub const PERF_COUNT_HW_CACHE_OP_WRITE: u64 = 1;
pub const PERF_COUNT_HW_CACHE_RESULT_ACCESS: u64 = 0;
pub const PERF_COUNT_HW_CACHE_RESULT_MISS: u64 = 1;

/// What a counter measures. Derived metrics locate their inputs by category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CounterCategory {
    Cycles,
    Instructions,
    CacheL1DRead,
    CacheL1DWrite,
    CacheL1DMiss,
    BranchInstructions,
    BranchMisses,
    /// Anything else, identified only by its raw encoding.
    Raw,
}

impl CounterCategory {
    /// Standard kernel encoding for this category, if it has one.
    pub fn default_encoding(self) -> Option<EventEncoding> {
        let encoding = match self {
            CounterCategory::Cycles => EventEncoding::hardware(PERF_COUNT_HW_CPU_CYCLES),
            CounterCategory::Instructions => EventEncoding::hardware(PERF_COUNT_HW_INSTRUCTIONS),
            CounterCategory::CacheL1DRead => EventEncoding::hw_cache(
                PERF_COUNT_HW_CACHE_L1D,
                PERF_COUNT_HW_CACHE_OP_READ,
                PERF_COUNT_HW_CACHE_RESULT_ACCESS,
            ),
            CounterCategory::CacheL1DWrite => EventEncoding::hw_cache(
                PERF_COUNT_HW_CACHE_L1D,
                PERF_COUNT_HW_CACHE_OP_WRITE,
                PERF_COUNT_HW_CACHE_RESULT_ACCESS,
            ),
            CounterCategory::CacheL1DMiss => EventEncoding::hw_cache(
                PERF_COUNT_HW_CACHE_L1D,
                PERF_COUNT_HW_CACHE_OP_READ,
                PERF_COUNT_HW_CACHE_RESULT_MISS,
            ),
            CounterCategory::BranchInstructions => {
                EventEncoding::hardware(PERF_COUNT_HW_BRANCH_INSTRUCTIONS)
            }
            CounterCategory::BranchMisses => EventEncoding::hardware(PERF_COUNT_HW_BRANCH_MISSES),
            CounterCategory::Raw => return None,
        };
        Some(encoding)
    }
}

impl fmt::Display for CounterCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CounterCategory::Cycles => "cycles",
            CounterCategory::Instructions => "instructions",
            CounterCategory::CacheL1DRead => "L1D-reads",
            CounterCategory::CacheL1DWrite => "L1D-writes",
            CounterCategory::CacheL1DMiss => "L1D-misses",
            CounterCategory::BranchInstructions => "branches",
            CounterCategory::BranchMisses => "branch-misses",
            CounterCategory::Raw => "raw",
        };
        f.write_str(name)
    }
}

/// The (type, config) pair the kernel uses to select an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EventEncoding {
    pub kind: u32,
    pub config: u64,
}

impl EventEncoding {
    pub const fn new(kind: u32, config: u64) -> Self {
        Self { kind, config }
    }

    pub const fn hardware(config: u64) -> Self {
        Self::new(PERF_TYPE_HARDWARE, config)
    }

    /// Cache events pack `id | op << 8 | result << 16` into `config`.
    pub const fn hw_cache(cache_id: u64, op: u64, result: u64) -> Self {
        Self::new(PERF_TYPE_HW_CACHE, cache_id | (op << 8) | (result << 16))
    }

    pub const fn raw(config: u64) -> Self {
        Self::new(PERF_TYPE_RAW, config)
    }
}

/// Immutable description of one registered counter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CounterDescriptor {
    pub name: String,
    pub category: CounterCategory,
    pub encoding: EventEncoding,
}

impl CounterDescriptor {
    pub fn new(name: impl Into<String>, category: CounterCategory, encoding: EventEncoding) -> Self {
        Self {
            name: name.into(),
            category,
            encoding,
        }
    }
}
