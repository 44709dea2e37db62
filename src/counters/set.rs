// uarch-bench - Free and Open Source Software Statement
//
// This project, uarch-bench, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/counters/set.rs
// Version: 1.0.0
// Developer: OIEIEIO <oieieio@protonmail.com>
//
// This file implements the CounterSet: an ordered group of hardware counters
// opened under a single group leader, started and stopped atomically, and
// read back with multiplexing correction.
//
// Tree Location:
// - src/counters/set.rs (grouped counter lifecycle)
// - Depends on: counters/backend, counters/event, counters/sample, log

use crate::core::error::CounterError;
use crate::counters::backend::{CounterBackend, PerfBackend};
use crate::counters::event::{
    CounterCategory, CounterDescriptor, EventEncoding, PERF_COUNT_HW_CACHE_L1D,
    PERF_COUNT_HW_CACHE_OP_READ, PERF_COUNT_HW_CACHE_OP_WRITE, PERF_COUNT_HW_CACHE_RESULT_ACCESS,
    PERF_COUNT_HW_CACHE_RESULT_MISS, PERF_COUNT_HW_CPU_CYCLES, PERF_COUNT_HW_INSTRUCTIONS,
};
use crate::counters::sample::{SAMPLE_BYTES, Sample};
use log::{debug, error, warn};
use std::io;
use std::sync::atomic::{Ordering, compiler_fence, fence};
use std::time::{Duration, Instant};

const LOG_TARGET: &str = "uarch_bench::counters";

/// The counters registered by [`CounterSet::with_default_counters`], in group order.
pub const DEFAULT_COUNTERS: [(&str, CounterCategory, EventEncoding); 5] = [
    ("cycles", CounterCategory::Cycles, EventEncoding::hardware(PERF_COUNT_HW_CPU_CYCLES)),
    ("instructions", CounterCategory::Instructions, EventEncoding::hardware(PERF_COUNT_HW_INSTRUCTIONS)),
    (
        "L1D-misses",
        CounterCategory::CacheL1DMiss,
        EventEncoding::hw_cache(
            PERF_COUNT_HW_CACHE_L1D,
            PERF_COUNT_HW_CACHE_OP_READ,
            PERF_COUNT_HW_CACHE_RESULT_MISS,
        ),
    ),
    (
        "L1D-reads",
        CounterCategory::CacheL1DRead,
        EventEncoding::hw_cache(
            PERF_COUNT_HW_CACHE_L1D,
            PERF_COUNT_HW_CACHE_OP_READ,
            PERF_COUNT_HW_CACHE_RESULT_ACCESS,
        ),
    ),
    (
        "L1D-writes",
        CounterCategory::CacheL1DWrite,
        EventEncoding::hw_cache(
            PERF_COUNT_HW_CACHE_L1D,
            PERF_COUNT_HW_CACHE_OP_WRITE,
            PERF_COUNT_HW_CACHE_RESULT_ACCESS,
        ),
    ),
];

/// Lifecycle of a CounterSet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterState {
    /// Counters may be registered; nothing is open.
    Created,
    /// All counters are open and the group is disabled.
    Ready,
    /// The group is counting.
    Active,
}

/// One registered counter and, once initialised, its open resource.
#[derive(Debug)]
pub struct CounterHandle<R> {
    descriptor: CounterDescriptor,
    resource: Option<R>,
    last_sample: Option<Sample>,
}

impl<R> CounterHandle<R> {
    fn new(descriptor: CounterDescriptor) -> Self {
        Self {
            descriptor,
            resource: None,
            last_sample: None,
        }
    }

    pub fn descriptor(&self) -> &CounterDescriptor {
        &self.descriptor
    }

    pub fn last_sample(&self) -> Option<Sample> {
        self.last_sample
    }

    pub fn is_open(&self) -> bool {
        self.resource.is_some()
    }
}

/// Full compiler and CPU barrier around the measured window.
#[inline(always)]
fn full_barrier() {
    compiler_fence(Ordering::SeqCst);
    fence(Ordering::SeqCst);
    compiler_fence(Ordering::SeqCst);
}

/// An ordered group of counters sharing one group leader (index 0).
pub struct CounterSet<B: CounterBackend = PerfBackend> {
    backend: B,
    handles: Vec<CounterHandle<B::Resource>>,
    state: CounterState,
    start_time: Option<Instant>,
    stop_time: Option<Instant>,
}

impl CounterSet<PerfBackend> {
    /// An empty set backed by the kernel counter facility.
    pub fn new() -> Self {
        Self::with_backend(PerfBackend::new())
    }
}

impl Default for CounterSet<PerfBackend> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: CounterBackend> CounterSet<B> {
    pub fn with_backend(backend: B) -> Self {
        Self {
            backend,
            handles: Vec::new(),
            state: CounterState::Created,
            start_time: None,
            stop_time: None,
        }
    }

    /// cycles, instructions and the three L1D events, cycles as leader.
    pub fn with_default_counters(backend: B) -> Self {
        let mut set = Self::with_backend(backend);
        set.handles = DEFAULT_COUNTERS
            .iter()
            .map(|(name, category, encoding)| {
                CounterHandle::new(CounterDescriptor::new(*name, *category, *encoding))
            })
            .collect();
        set
    }

    /// Append a counter. Only valid before [`init`](Self::init).
    pub fn register_counter(
        &mut self,
        name: &str,
        category: CounterCategory,
        encoding: EventEncoding,
    ) -> Result<(), CounterError> {
        if self.state != CounterState::Created {
            return Err(CounterError::AlreadyInitialized {
                name: name.to_string(),
            });
        }
        if self.position(name).is_some() {
            return Err(CounterError::DuplicateCounterName {
                name: name.to_string(),
            });
        }
        self.handles
            .push(CounterHandle::new(CounterDescriptor::new(name, category, encoding)));
        Ok(())
    }

    /// Open every registered counter, the first as group leader and the rest
    /// as its siblings.
    ///
    /// On failure every counter opened by this call is released again and
    /// the set stays in `Created`.
    pub fn init(&mut self) -> Result<(), CounterError> {
        if self.state != CounterState::Created {
            debug!(target: LOG_TARGET, "Counters already initialized");
            return Ok(());
        }
        if self.handles.is_empty() {
            error!(target: LOG_TARGET, "No counters configured");
            return Err(CounterError::NoCounters);
        }

        let mut opened: Vec<B::Resource> = Vec::with_capacity(self.handles.len());
        for handle in &self.handles {
            match self.backend.open(&handle.descriptor, opened.first()) {
                Ok(resource) => opened.push(resource),
                Err(source) => {
                    error!(target: LOG_TARGET,
                        "Error setting counter: {} ({})", handle.descriptor.name, source
                    );
                    // `opened` drops here, closing everything from this attempt
                    return Err(CounterError::Open {
                        name: handle.descriptor.name.clone(),
                        source,
                    });
                }
            }
        }

        for (handle, resource) in self.handles.iter_mut().zip(opened) {
            handle.resource = Some(resource);
            handle.last_sample = None;
        }
        self.state = CounterState::Ready;
        debug!(target: LOG_TARGET,
            "Opened {} counters, leader {}", self.handles.len(), self.handles[0].descriptor.name
        );
        Ok(())
    }

    /// Zero and enable the whole group.
    ///
    /// Starting an already active set restarts it from zero.
    pub fn start(&mut self) -> Result<(), CounterError> {
        let leader = match self.leader() {
            Ok(leader) => leader,
            Err(e) => {
                warn!(target: LOG_TARGET, "Cannot start: {}", e);
                return Err(e);
            }
        };

        full_barrier();
        self.backend
            .reset_group(leader)
            .map_err(|source| self.control_error("reset", source))?;
        self.backend
            .enable_group(leader)
            .map_err(|source| self.control_error("enable", source))?;
        full_barrier();

        self.start_time = Some(Instant::now());
        self.state = CounterState::Active;
        Ok(())
    }

    /// Disable the group and read a sample from every counter.
    ///
    /// Per-counter read failures do not abort the stop; they are returned
    /// so the caller can report them, and the affected counters read as
    /// unavailable until the next successful stop.
    pub fn stop(&mut self) -> Result<Vec<CounterError>, CounterError> {
        let stop_time = Instant::now();
        full_barrier();

        let leader = match self.leader() {
            Ok(leader) => leader,
            Err(e) => {
                warn!(target: LOG_TARGET, "Cannot stop: {}", e);
                return Err(e);
            }
        };
        self.backend
            .disable_group(leader)
            .map_err(|source| self.control_error("disable", source))?;

        self.stop_time = Some(stop_time);
        self.state = CounterState::Ready;

        let backend = &self.backend;
        let mut failures = Vec::new();
        for handle in self.handles.iter_mut() {
            handle.last_sample = None;
            let Some(resource) = handle.resource.as_ref() else {
                continue;
            };
            let mut sample = Sample::default();
            let failure = match backend.read_sample(resource, &mut sample) {
                Ok(n) if n == SAMPLE_BYTES => {
                    handle.last_sample = Some(sample);
                    continue;
                }
                Ok(got) => CounterError::ShortRead {
                    name: handle.descriptor.name.clone(),
                    got,
                    expected: SAMPLE_BYTES,
                },
                Err(source) => CounterError::Read {
                    name: handle.descriptor.name.clone(),
                    source,
                },
            };
            warn!(target: LOG_TARGET, "{}", failure);
            failures.push(failure);
        }
        Ok(failures)
    }

    /// Corrected value of a counter from the last stop.
    ///
    /// `Ok(None)` means unavailable: never sampled, the read failed, or the
    /// counter never ran (time running was zero).
    pub fn read(&self, name: &str) -> Result<Option<f64>, CounterError> {
        Ok(self.sample(name)?.and_then(|sample| sample.corrected()))
    }

    /// Uncorrected sample of a counter from the last stop.
    pub fn sample(&self, name: &str) -> Result<Option<Sample>, CounterError> {
        let index = self.position(name).ok_or_else(|| CounterError::NotFound {
            name: name.to_string(),
        })?;
        if self.state == CounterState::Created {
            return Err(CounterError::NotInitialized);
        }
        Ok(self.handles[index].last_sample)
    }

    /// Corrected value of the first counter of the given category.
    pub fn read_category(&self, category: CounterCategory) -> Option<f64> {
        self.handles
            .iter()
            .find(|handle| handle.descriptor.category == category)
            .and_then(|handle| handle.last_sample)
            .and_then(|sample| sample.corrected())
    }

    /// Wall-clock length of the last start/stop window.
    pub fn duration(&self) -> Option<Duration> {
        match (self.start_time, self.stop_time) {
            (Some(start), Some(stop)) => stop.checked_duration_since(start),
            _ => None,
        }
    }

    /// Release every open counter, siblings before the leader.
    pub fn close(&mut self) {
        if self.state == CounterState::Created {
            return;
        }
        for handle in self.handles.iter_mut().rev() {
            handle.resource.take();
            handle.last_sample = None;
        }
        self.state = CounterState::Created;
        debug!(target: LOG_TARGET, "Closed {} counters", self.handles.len());
    }

    pub fn state(&self) -> CounterState {
        self.state
    }

    pub fn is_initialized(&self) -> bool {
        self.state != CounterState::Created
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    pub fn handles(&self) -> &[CounterHandle<B::Resource>] {
        &self.handles
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.handles.iter().map(|handle| handle.descriptor.name.as_str())
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.handles
            .iter()
            .position(|handle| handle.descriptor.name == name)
    }

    fn leader(&self) -> Result<&B::Resource, CounterError> {
        if self.state == CounterState::Created {
            return Err(CounterError::NotInitialized);
        }
        self.handles
            .first()
            .and_then(|handle| handle.resource.as_ref())
            .ok_or(CounterError::NotInitialized)
    }

    fn control_error(&self, operation: &'static str, source: io::Error) -> CounterError {
        let leader = self
            .handles
            .first()
            .map(|handle| handle.descriptor.name.clone())
            .unwrap_or_default();
        error!(target: LOG_TARGET, "Group {} failed on {}: {}", operation, leader, source);
        CounterError::Control {
            operation,
            leader,
            source,
        }
    }
}

impl<B: CounterBackend> Drop for CounterSet<B> {
    fn drop(&mut self) {
        self.close();
    }
}

// Changelog:
// - v1.0.0 (2026-10-17): Initial grouped counter set.
//   - Leader/sibling opening with rollback on partial failure.
//   - Barrier-bracketed group reset+enable and disable, timestamps taken
//     inside the barriers.
//   - Degraded per-counter reads and corrected lookups by name or category.
