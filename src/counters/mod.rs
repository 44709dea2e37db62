// uarch-bench - Free and Open Source Software Statement
//
// This project, uarch-bench, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/counters/mod.rs
// Version: 1.0.0
// Developer: OIEIEIO <oieieio@protonmail.com>
//
// This file declares the hardware counter subsystem: descriptors, samples,
// the kernel backend, the grouped CounterSet, and derived metrics.
//
// Tree Location:
// - src/counters/mod.rs (counter subsystem entry point)
// - Submodules: event, sample, backend, set, metrics

pub mod backend;
pub mod event;
pub mod metrics;
pub mod sample;
pub mod set;

// Re-export key counter types
pub use backend::{CounterBackend, PerfBackend, PerfCounterFd};
pub use event::{CounterCategory, CounterDescriptor, EventEncoding};
pub use metrics::DerivedMetrics;
pub use sample::{SAMPLE_BYTES, Sample};
pub use set::{CounterHandle, CounterSet, CounterState, DEFAULT_COUNTERS};

// Changelog:
// - v1.0.0 (2026-10-17): Initial counter subsystem.
