// uarch-bench - Free and Open Source Software Statement
//
// This project, uarch-bench, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/benchmark/marker.rs
// Version: 1.0.0
// Developer: OIEIEIO <oieieio@protonmail.com>
//
// This file defines the stats-marker collaborator that brackets each
// measured repeat for a simulator or profiler, plus the two markers shipped
// with the harness.
//
// Tree Location:
// - src/benchmark/marker.rs (stats begin/end collaborator)
// - Depends on: log

use log::debug;

const LOG_TARGET: &str = "uarch_bench::marker";

/// Region-of-interest signals around one repeat. Fire-and-forget: the
/// harness never inspects what a marker does.
pub trait StatsMarker {
    fn begin(&mut self, iteration: u32);
    fn end(&mut self, iteration: u32);
}

/// Marker used when stats markers are disabled.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopMarker;

impl StatsMarker for NoopMarker {
    fn begin(&mut self, _iteration: u32) {}
    fn end(&mut self, _iteration: u32) {}
}

/// Records markers through the logging facade and counts them.
#[derive(Debug, Default, Clone)]
pub struct LoggingMarker {
    begun: u32,
    ended: u32,
}

impl LoggingMarker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begun(&self) -> u32 {
        self.begun
    }

    pub fn ended(&self) -> u32 {
        self.ended
    }
}

impl StatsMarker for LoggingMarker {
    fn begin(&mut self, iteration: u32) {
        self.begun += 1;
        debug!(target: LOG_TARGET, "work begin {}", iteration);
    }

    fn end(&mut self, iteration: u32) {
        self.ended += 1;
        debug!(target: LOG_TARGET, "work end {}", iteration);
    }
}
