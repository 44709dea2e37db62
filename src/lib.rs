// uarch-bench - Free and Open Source Software Statement
//
// This project, uarch-bench, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/lib.rs
// Version: 1.0.0
// Developer: OIEIEIO <oieieio@protonmail.com>
//
// This file serves as the main library entry point for uarch-bench. It
// exports the harness, counter and workload modules and re-exports the types
// main.rs and the integration tests use most.
//
// Tree Location:
// - src/lib.rs (root library file)
// - Exports modules: benchmark, core, counters, help, utils, workloads

#[cfg(not(target_os = "linux"))]
compile_error!("uarch-bench reads hardware counters through perf_event_open and only builds on Linux");

pub mod benchmark;
pub mod core;
pub mod counters;
pub mod help;
pub mod utils;
pub mod workloads;

// Re-export commonly used types at the crate root for convenience
pub use crate::benchmark::{
    Harness, HarnessState, IterationResult, SessionSummary, StatsMarker, Workload,
    WorkloadRegistry,
};
pub use crate::core::{CounterError, HarnessConfig, HarnessError, WorkloadConfig};
pub use crate::counters::{CounterBackend, CounterSet, PerfBackend, Sample};

// Changelog:
// - v1.0.0 (2026-10-17): Library root for the benchmarking harness.
//   - Exports benchmark, core, counters, help, utils and workloads.
//   - Builds only on Linux, where the kernel counter facility lives.
