// uarch-bench - Free and Open Source Software Statement
//
// This project, uarch-bench, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/benchmark/mod.rs
// Version: 1.0.0
// Developer: OIEIEIO <oieieio@protonmail.com>
//
// This file declares the benchmark module: the workload contract, the
// registry of workload factories, the stats markers and the measurement
// harness that drives a session.
//
// Tree Location:
// - src/benchmark/mod.rs (benchmark module entry point)
// - Submodules: workload, registry, marker, runner

pub mod marker;
pub mod registry;
pub mod runner;
pub mod workload;

// Re-export key benchmark types
pub use marker::{LoggingMarker, NoopMarker, StatsMarker};
pub use registry::{WorkloadFactory, WorkloadRegistry};
pub use runner::{CounterReading, Harness, HarnessState, IterationResult, SessionSummary};
pub use workload::Workload;

// Changelog:
// - v1.0.0 (2026-10-17): Benchmark module for the measurement harness.
//   - Declares workload, registry, marker and runner submodules with
//     re-exports for main.rs and the integration tests.
