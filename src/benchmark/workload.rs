// uarch-bench - Free and Open Source Software Statement
//
// This project, uarch-bench, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/benchmark/workload.rs
// Version: 1.0.0
// Developer: OIEIEIO <oieieio@protonmail.com>
//
// This file defines the contract every benchmark payload implements. The
// harness only ever talks to a workload through these calls.
//
// Tree Location:
// - src/benchmark/workload.rs (workload contract)
// - Depends on: core/types

use crate::core::types::WorkloadConfig;
use std::io::{self, Write};

/// A pluggable CPU workload driven by the harness.
///
/// Call order for a session: `init` once, then per repeat
/// `reset_for_iteration` followed by `run`, then `report` once.
pub trait Workload {
    /// Name the workload was registered under.
    fn name(&self) -> &str;

    /// Read options and allocate working data. Returning `false` aborts the
    /// session before any measurement.
    fn init(&mut self, config: &WorkloadConfig) -> bool;

    /// Restore the deterministic start state for the next repeat.
    fn reset_for_iteration(&mut self) {}

    /// The measured region.
    fn run(&mut self);

    /// Write human-readable `key: value` lines about the session.
    fn report(&self, out: &mut dyn Write) -> io::Result<()>;
}
