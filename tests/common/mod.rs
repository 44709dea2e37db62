// uarch-bench - Free and Open Source Software Statement
//
// This project, uarch-bench, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: tests/common/mod.rs
// Version: 1.0.0
// Developer: Test Implementation
//
// Shared test helpers: a scripted in-memory counter backend that records
// every open, close and group operation, and a workload that records the
// calls the harness makes on it.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::io::{self, Write};
use std::rc::Rc;
use std::sync::{Arc, Mutex};
use uarch_bench::counters::{CounterBackend, CounterDescriptor, SAMPLE_BYTES, Sample};
use uarch_bench::{Workload, WorkloadConfig};

/// What the scripted backend returns and what it has seen.
#[derive(Debug, Default)]
pub struct Script {
    /// Sample returned for each counter name on every read.
    pub samples: HashMap<String, Sample>,
    /// Opening this counter fails.
    pub fail_open: Option<String>,
    /// Group enable fails (the call is still recorded).
    pub fail_enable: bool,
    /// Group disable fails (the call is still recorded).
    pub fail_disable: bool,
    /// Reads of these counters return fewer bytes than a full sample.
    pub short_reads: HashSet<String>,
    /// Names currently open, in open order.
    pub open: Vec<String>,
    /// Names in the order they were closed.
    pub closed: Vec<String>,
    /// Leader each counter was opened against (`None` for the leader).
    pub groups: Vec<(String, Option<String>)>,
    /// Group operations in order: "reset", "enable", "disable".
    pub group_calls: Vec<&'static str>,
}

#[derive(Debug, Clone, Default)]
pub struct ScriptedBackend {
    script: Rc<RefCell<Script>>,
}

impl ScriptedBackend {
    pub fn new() -> (Self, Rc<RefCell<Script>>) {
        let backend = Self::default();
        let script = Rc::clone(&backend.script);
        (backend, script)
    }
}

#[derive(Debug)]
pub struct ScriptedCounter {
    name: String,
    script: Rc<RefCell<Script>>,
}

impl Drop for ScriptedCounter {
    fn drop(&mut self) {
        let mut script = self.script.borrow_mut();
        script.open.retain(|name| name != &self.name);
        script.closed.push(self.name.clone());
    }
}

impl CounterBackend for ScriptedBackend {
    type Resource = ScriptedCounter;

    fn open(
        &self,
        descriptor: &CounterDescriptor,
        leader: Option<&ScriptedCounter>,
    ) -> io::Result<ScriptedCounter> {
        let mut script = self.script.borrow_mut();
        if script.fail_open.as_deref() == Some(descriptor.name.as_str()) {
            // ENOENT, as for an event the CPU does not support
            return Err(io::Error::from_raw_os_error(2));
        }
        script.open.push(descriptor.name.clone());
        script
            .groups
            .push((descriptor.name.clone(), leader.map(|l| l.name.clone())));
        Ok(ScriptedCounter {
            name: descriptor.name.clone(),
            script: Rc::clone(&self.script),
        })
    }

    fn reset_group(&self, _leader: &ScriptedCounter) -> io::Result<()> {
        self.script.borrow_mut().group_calls.push("reset");
        Ok(())
    }

    fn enable_group(&self, _leader: &ScriptedCounter) -> io::Result<()> {
        let mut script = self.script.borrow_mut();
        script.group_calls.push("enable");
        if script.fail_enable {
            // EACCES, as when counter access is restricted
            return Err(io::Error::from_raw_os_error(13));
        }
        Ok(())
    }

    fn disable_group(&self, _leader: &ScriptedCounter) -> io::Result<()> {
        let mut script = self.script.borrow_mut();
        script.group_calls.push("disable");
        if script.fail_disable {
            return Err(io::Error::from_raw_os_error(13));
        }
        Ok(())
    }

    fn read_sample(&self, resource: &ScriptedCounter, sample: &mut Sample) -> io::Result<usize> {
        let script = self.script.borrow();
        if script.short_reads.contains(&resource.name) {
            return Ok(SAMPLE_BYTES / 3);
        }
        match script.samples.get(&resource.name) {
            Some(scripted) => {
                *sample = *scripted;
                Ok(SAMPLE_BYTES)
            }
            None => Err(io::Error::other("no sample scripted")),
        }
    }
}

/// Workload that records every harness call into a shared log.
pub struct RecordingWorkload {
    pub name: String,
    pub init_result: bool,
    pub runs: u32,
    pub calls: Arc<Mutex<Vec<String>>>,
}

impl RecordingWorkload {
    pub fn new(name: &str, calls: Arc<Mutex<Vec<String>>>) -> Self {
        Self {
            name: name.to_string(),
            init_result: true,
            runs: 0,
            calls,
        }
    }

    fn record(&self, call: &str) {
        self.calls.lock().unwrap().push(call.to_string());
    }
}

impl Workload for RecordingWorkload {
    fn name(&self) -> &str {
        &self.name
    }

    fn init(&mut self, _config: &WorkloadConfig) -> bool {
        self.record("init");
        self.init_result
    }

    fn reset_for_iteration(&mut self) {
        self.record("reset");
    }

    fn run(&mut self) {
        self.runs += 1;
        self.record("run");
    }

    fn report(&self, out: &mut dyn Write) -> io::Result<()> {
        self.record("report");
        writeln!(out, "Runs: {}", self.runs)
    }
}
