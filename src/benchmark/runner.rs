// uarch-bench - Free and Open Source Software Statement
//
// This project, uarch-bench, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/benchmark/runner.rs
// Version: 1.0.0
// Developer: OIEIEIO <oieieio@protonmail.com>
//
// This file implements the measurement harness. It selects a workload from
// the registry, initialises it, runs the configured number of repeats with
// each repeat bracketed by stats markers and a counter window, and finally
// lets the workload report.
//
// Tree Location:
// - src/benchmark/runner.rs (benchmark session driver)
// - Depends on: benchmark/registry, benchmark/marker, counters, log

use crate::benchmark::marker::{LoggingMarker, NoopMarker, StatsMarker};
use crate::benchmark::registry::WorkloadRegistry;
use crate::benchmark::workload::Workload;
use crate::core::error::{CounterError, HarnessError};
use crate::core::types::{HarnessConfig, WorkloadConfig};
use crate::counters::backend::{CounterBackend, PerfBackend};
use crate::counters::metrics::{DerivedMetrics, write_counter_line};
use crate::counters::set::{CounterSet, CounterState};
use crate::utils::format::FormatUtils;
use log::{debug, error, info, warn};
use std::fmt;
use std::io::{self, Write};
use std::sync::Arc;
use std::time::{Duration, Instant};

const LOG_TARGET: &str = "uarch_bench::runner";

/// Where a harness is in its session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HarnessState {
    Idle,
    Selected,
    Initialized,
    /// Inside or just after repeat `i` (zero based).
    Running(u32),
    Reported,
}

impl fmt::Display for HarnessState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HarnessState::Idle => f.write_str("idle"),
            HarnessState::Selected => f.write_str("selected"),
            HarnessState::Initialized => f.write_str("initialized"),
            HarnessState::Running(i) => write!(f, "running repeat {}", i),
            HarnessState::Reported => f.write_str("reported"),
        }
    }
}

/// Corrected value of one counter for one repeat.
#[derive(Debug, Clone, PartialEq)]
pub struct CounterReading {
    pub name: String,
    pub value: Option<f64>,
}

/// What one repeat measured.
#[derive(Debug, Clone, PartialEq)]
pub struct IterationResult {
    pub iteration: u32,
    /// Length of the measured region. With counters this is the counter
    /// window; without them it is timed around `run()`.
    pub wall_time: Duration,
    /// Window between counter start and stop, when counters are enabled.
    pub counter_window: Option<Duration>,
    pub readings: Vec<CounterReading>,
    pub metrics: DerivedMetrics,
    /// Counters whose sample could not be read this repeat.
    pub read_failures: Vec<String>,
}

impl IterationResult {
    pub fn reading(&self, name: &str) -> Option<f64> {
        self.readings
            .iter()
            .find(|reading| reading.name == name)
            .and_then(|reading| reading.value)
    }

    pub fn write_to(&self, out: &mut dyn Write, repeats: u32) -> io::Result<()> {
        writeln!(
            out,
            "---- Repeat {}/{} ({}) ----",
            self.iteration + 1,
            repeats,
            FormatUtils::format_duration(self.wall_time)
        )?;
        if self.readings.is_empty() {
            return Ok(());
        }
        for reading in &self.readings {
            write_counter_line(out, &reading.name, reading.value)?;
        }
        self.metrics.write_to(out)
    }
}

/// Everything a completed session produced besides the workload's report.
#[derive(Debug, Clone)]
pub struct SessionSummary {
    pub workload: String,
    pub iterations: Vec<IterationResult>,
    pub total_time: Duration,
}

/// Drives one workload through a measured session.
pub struct Harness<B: CounterBackend = PerfBackend> {
    registry: Arc<WorkloadRegistry>,
    counters: Option<CounterSet<B>>,
    marker: Box<dyn StatsMarker>,
    workload: Option<Box<dyn Workload>>,
    state: HarnessState,
}

impl Harness<PerfBackend> {
    /// A harness without counters or stats markers.
    pub fn new(registry: Arc<WorkloadRegistry>) -> Self {
        Self::build(registry, None)
    }

    /// Counters and markers as the session configuration asks for them:
    /// the default counter group on the kernel facility, and logging
    /// stats markers.
    pub fn from_config(registry: Arc<WorkloadRegistry>, config: &HarnessConfig) -> Self {
        let counters = config
            .enable_counters
            .then(|| CounterSet::with_default_counters(PerfBackend::new()));
        let mut harness = Self::build(registry, counters);
        if config.enable_stats_markers {
            harness.set_marker(Box::new(LoggingMarker::new()));
        }
        harness
    }
}

impl<B: CounterBackend> Harness<B> {
    /// A harness measuring every repeat with `counters`.
    pub fn with_counters(registry: Arc<WorkloadRegistry>, counters: CounterSet<B>) -> Self {
        Self::build(registry, Some(counters))
    }

    fn build(registry: Arc<WorkloadRegistry>, counters: Option<CounterSet<B>>) -> Self {
        Self {
            registry,
            counters,
            marker: Box::new(NoopMarker),
            workload: None,
            state: HarnessState::Idle,
        }
    }

    pub fn set_marker(&mut self, marker: Box<dyn StatsMarker>) {
        self.marker = marker;
    }

    pub fn state(&self) -> HarnessState {
        self.state
    }

    pub fn counters(&self) -> Option<&CounterSet<B>> {
        self.counters.as_ref()
    }

    pub fn workload(&self) -> Option<&dyn Workload> {
        self.workload.as_deref()
    }

    /// Create the named workload. On failure nothing changes.
    pub fn select(&mut self, name: &str) -> Result<(), HarnessError> {
        if !matches!(self.state, HarnessState::Idle | HarnessState::Reported) {
            return Err(self.invalid_state("idle"));
        }
        let workload = self.registry.create(name).inspect_err(|e| {
            error!(target: LOG_TARGET, "{}", e);
        })?;
        info!(target: LOG_TARGET, "Selected benchmark: {}", workload.name());
        self.workload = Some(workload);
        self.state = HarnessState::Selected;
        Ok(())
    }

    /// Initialise the selected workload, then open the counters.
    ///
    /// On failure the workload is dropped and the harness returns to idle.
    pub fn initialize(&mut self, config: &WorkloadConfig) -> Result<(), HarnessError> {
        if self.state != HarnessState::Selected {
            return Err(self.invalid_state("selected"));
        }
        let workload = self
            .workload
            .as_mut()
            .ok_or(HarnessError::InvalidState {
                expected: "selected",
                actual: "no workload".to_string(),
            })?;

        info!(target: LOG_TARGET, "Setup {}", workload.name());
        let initialized = workload.init(config);
        let name = workload.name().to_string();
        if !initialized {
            error!(target: LOG_TARGET, "Benchmark {} failed to initialize", name);
            return Err(self.abort(HarnessError::WorkloadInit { name }));
        }

        let opened = match self.counters.as_mut() {
            Some(counters) => counters.init(),
            None => Ok(()),
        };
        if let Err(e) = opened {
            return Err(self.abort(e.into()));
        }
        self.state = HarnessState::Initialized;
        Ok(())
    }

    /// Run `repeats` measured repeats of the initialised workload.
    ///
    /// Each repeat is: reset, stats begin, counter start, `run()`, counter
    /// stop, stats end. The harness does not aggregate across repeats.
    pub fn run_session(&mut self, repeats: u32) -> Result<Vec<IterationResult>, HarnessError> {
        if repeats == 0 {
            return Err(HarnessError::configuration("repeats must be at least 1"));
        }
        if self.state != HarnessState::Initialized {
            return Err(self.invalid_state("initialized"));
        }
        let Some(mut workload) = self.workload.take() else {
            return Err(HarnessError::InvalidState {
                expected: "initialized",
                actual: "no workload".to_string(),
            });
        };

        let mut results = Vec::with_capacity(repeats as usize);
        for iteration in 0..repeats {
            self.state = HarnessState::Running(iteration);
            workload.reset_for_iteration();

            self.marker.begin(iteration);
            let measured = self.measure(workload.as_mut());
            self.marker.end(iteration);

            let (wall_time, read_failures) = match measured {
                Ok(measured) => measured,
                Err(e) => {
                    error!(target: LOG_TARGET, "Repeat {}/{} failed: {}", iteration + 1, repeats, e);
                    return Err(self.abort(e));
                }
            };

            let result = match self.counters.as_ref() {
                Some(counters) => IterationResult {
                    iteration,
                    wall_time,
                    counter_window: counters.duration(),
                    readings: counters
                        .handles()
                        .iter()
                        .map(|handle| CounterReading {
                            name: handle.descriptor().name.clone(),
                            value: handle.last_sample().and_then(|sample| sample.corrected()),
                        })
                        .collect(),
                    metrics: counters.derived_metrics(),
                    read_failures: read_failures
                        .iter()
                        .map(|failure| failure.to_string())
                        .collect(),
                },
                None => IterationResult {
                    iteration,
                    wall_time,
                    counter_window: None,
                    readings: Vec::new(),
                    metrics: DerivedMetrics::default(),
                    read_failures: Vec::new(),
                },
            };
            debug!(target: LOG_TARGET,
                "Repeat {}/{} finished in {} (IPC {})",
                iteration + 1, repeats,
                FormatUtils::format_duration(result.wall_time),
                FormatUtils::format_ratio(result.metrics.ipc)
            );
            results.push(result);
        }
        self.workload = Some(workload);
        Ok(results)
    }

    /// One measured `run()`.
    ///
    /// With counters, nothing but `run()` sits between start and stop and
    /// the counter window is the wall time.
    fn measure(
        &mut self,
        workload: &mut dyn Workload,
    ) -> Result<(Duration, Vec<CounterError>), HarnessError> {
        match self.counters.as_mut() {
            Some(counters) => {
                counters.start()?;
                workload.run();
                let read_failures = counters.stop()?;
                Ok((counters.duration().unwrap_or_default(), read_failures))
            }
            None => {
                let started = Instant::now();
                workload.run();
                Ok((started.elapsed(), Vec::new()))
            }
        }
    }

    /// Let the workload report, exactly once per session.
    pub fn finalize(&mut self, out: &mut dyn Write) -> Result<(), HarnessError> {
        if !matches!(self.state, HarnessState::Running(_)) {
            return Err(self.invalid_state("running"));
        }
        let reported = match self.workload.as_ref() {
            Some(workload) => workload.report(out),
            None => Ok(()),
        };
        if let Err(e) = reported {
            return Err(self.abort(e.into()));
        }
        self.state = HarnessState::Reported;
        Ok(())
    }

    /// Validate `config`, then select, initialise, run and report.
    ///
    /// Per-repeat counter blocks are written to `out` ahead of the
    /// workload's own report.
    pub fn execute(
        &mut self,
        config: &HarnessConfig,
        out: &mut dyn Write,
    ) -> Result<SessionSummary, HarnessError> {
        config.validate()?;
        let session_start = Instant::now();

        self.select(&config.workload_name)?;
        self.initialize(&config.workload)?;
        let iterations = self.run_session(config.repeats)?;

        for iteration in &iterations {
            iteration.write_to(out, config.repeats)?;
        }
        self.finalize(out)?;

        let total_time = session_start.elapsed();
        info!(target: LOG_TARGET,
            "Benchmark {} complete: {} repeats in {}",
            config.workload_name, config.repeats, FormatUtils::format_duration(total_time)
        );
        Ok(SessionSummary {
            workload: config.workload_name.clone(),
            iterations,
            total_time,
        })
    }

    /// Abandon the current session after `error`: stop an active counter
    /// group, drop the workload and return to idle.
    fn abort(&mut self, error: HarnessError) -> HarnessError {
        if let Some(counters) = self.counters.as_mut() {
            if counters.state() == CounterState::Active {
                if let Err(e) = counters.stop() {
                    warn!(target: LOG_TARGET, "Counters left running after failure: {}", e);
                }
            }
        }
        self.workload = None;
        self.state = HarnessState::Idle;
        error
    }

    fn invalid_state(&self, expected: &'static str) -> HarnessError {
        HarnessError::InvalidState {
            expected,
            actual: self.state.to_string(),
        }
    }
}

// Changelog:
// - v1.0.0 (2026-10-17): Rewritten as a single-threaded measurement harness.
//   - Replaced the threaded hashing runner with select/initialize/run_session/
//     finalize over a registry-created workload.
//   - Each repeat is reset, marker begin, counter start, run, counter stop,
//     marker end; results are returned per repeat.
//   - Any failure after select drops the workload and returns to idle;
//     a begun stats marker is always ended.
//   - Only run() sits inside the counter window; wall time comes from the
//     counter timestamps when counters are enabled.
