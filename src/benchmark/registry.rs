// uarch-bench - Free and Open Source Software Statement
//
// This project, uarch-bench, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/benchmark/registry.rs
// Version: 1.0.0
// Developer: OIEIEIO <oieieio@protonmail.com>
//
// This file implements the workload registry: a name -> factory table built
// once at startup and shared read-only with the harness afterwards.
//
// Tree Location:
// - src/benchmark/registry.rs (workload registry)
// - Depends on: benchmark/workload, core/error, log

use crate::benchmark::workload::Workload;
use crate::core::error::HarnessError;
use log::{debug, error};
use std::fmt;

const LOG_TARGET: &str = "uarch_bench::registry";

/// Zero-argument constructor producing a fresh workload.
pub type WorkloadFactory = Box<dyn Fn() -> Box<dyn Workload> + Send + Sync>;

struct RegistryEntry {
    name: String,
    factory: WorkloadFactory,
}

/// Workload factories in registration order.
#[derive(Default)]
pub struct WorkloadRegistry {
    entries: Vec<RegistryEntry>,
}

impl WorkloadRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding every built-in workload.
    pub fn with_builtins() -> Result<Self, HarnessError> {
        let mut registry = Self::new();
        crate::workloads::register_builtin_workloads(&mut registry)?;
        Ok(registry)
    }

    /// Add a factory under `name`.
    ///
    /// A name can only be registered once; a second registration is a
    /// startup defect and is reported, never silently overwritten.
    pub fn register<F>(&mut self, name: &str, factory: F) -> Result<(), HarnessError>
    where
        F: Fn() -> Box<dyn Workload> + Send + Sync + 'static,
    {
        if self.contains(name) {
            error!(target: LOG_TARGET, "Duplicate benchmark registration: {}", name);
            return Err(HarnessError::DuplicateWorkload {
                name: name.to_string(),
            });
        }
        debug!(target: LOG_TARGET, "Registering benchmark: {}", name);
        self.entries.push(RegistryEntry {
            name: name.to_string(),
            factory: Box::new(factory),
        });
        Ok(())
    }

    /// Build a new, independently owned instance of `name`.
    pub fn create(&self, name: &str) -> Result<Box<dyn Workload>, HarnessError> {
        self.entries
            .iter()
            .find(|entry| entry.name == name)
            .map(|entry| (entry.factory)())
            .ok_or_else(|| HarnessError::WorkloadNotFound {
                name: name.to_string(),
            })
    }

    /// Registered names in registration order.
    pub fn list(&self) -> Vec<&str> {
        self.entries.iter().map(|entry| entry.name.as_str()).collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|entry| entry.name == name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for WorkloadRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkloadRegistry")
            .field("workloads", &self.list())
            .finish()
    }
}
