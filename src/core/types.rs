// uarch-bench - Free and Open Source Software Statement
//
// This project, uarch-bench, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/core/types.rs
// Version: 1.0.0
// Developer: OIEIEIO <oieieio@protonmail.com>
//
// This file defines core data structures for the benchmarking harness,
// located in the core subdirectory. It includes the command-line arguments,
// the session configuration, and the opaque per-workload configuration map.
//
// Tree Location:
// - src/core/types.rs (core data structures)
// - Depends on: clap, serde, serde_yaml

use crate::core::error::{ConfigFileError, HarnessError};
use clap::Parser;
use serde::Serialize;
use serde_yaml::{Mapping, Value};
use std::fs;
use std::path::{Path, PathBuf};

/// Config file key naming the workload when `--benchmark` is absent.
pub const CONFIG_KEY_BENCHMARK: &str = "benchmark";
/// Config file key giving the repeat count when `--repeats` is absent.
pub const CONFIG_KEY_REPEATS: &str = "repeats";

/// Command-line arguments for the harness
#[derive(Parser, Debug)]
#[command(
    name = "uarch-bench",
    version = "1.0.0",
    about = "Microarchitecture benchmarking harness with hardware performance counters",
    long_about = "uarch-bench runs small CPU workloads under repeatable conditions while\n\
                  capturing grouped hardware counters (cycles, instructions, L1D events).\n\n\
                  Examples:\n\
                    List workloads: uarch-bench --list\n\
                    Run with counters: uarch-bench -b simple-loop -r 5 --perf\n\
                    From a config file: uarch-bench -c stride.yaml --perf\n\
                    Simulator run: uarch-bench -b random-branch --m5ops"
)]
pub struct Args {
    /// Name of the workload to run (see --list)
    #[arg(
        short = 'b',
        long = "benchmark",
        alias = "bmname",
        value_name = "NAME",
        help = "Workload to run"
    )]
    pub benchmark: Option<String>,

    /// YAML file with workload options; may also carry `benchmark` and `repeats`
    #[arg(
        short = 'c',
        long = "config",
        value_name = "FILE",
        help = "YAML config file for the workload"
    )]
    pub config: Option<PathBuf>,

    /// Number of measured repeats. Each repeat resets the workload first.
    #[arg(
        short = 'r',
        long = "repeats",
        value_name = "COUNT",
        help = "Number of times the workload is repeated [default: 1]"
    )]
    pub repeats: Option<u32>,

    /// Bracket every repeat with stats begin/end markers
    #[arg(
        short = 'm',
        long = "m5ops",
        default_value = "false",
        help = "Enable stats markers around each repeat"
    )]
    pub m5ops: bool,

    /// Capture hardware performance counters around each repeat
    #[arg(
        short = 'z',
        long = "perf",
        default_value = "false",
        help = "Enable hardware performance counters"
    )]
    pub perf: bool,

    #[arg(
        short = 'l',
        long = "list",
        default_value = "false",
        help = "List all available workloads"
    )]
    pub list: bool,

    #[arg(
        short = 'v',
        long = "verbose",
        default_value = "false",
        help = "Enable debug logging"
    )]
    pub verbose: bool,
}

impl Args {
    /// Merge the command line with the optional config file and validate.
    ///
    /// Command-line values win over the file's `benchmark` and `repeats`
    /// keys. The file mapping is handed to the workload unmodified.
    pub fn into_config(self) -> Result<HarnessConfig, HarnessError> {
        let workload = match &self.config {
            Some(path) => WorkloadConfig::from_yaml_file(path)?,
            None => WorkloadConfig::new(),
        };

        let workload_name = match self.benchmark {
            Some(name) => name,
            None => match workload.get(CONFIG_KEY_BENCHMARK) {
                Some(value) => value
                    .as_str()
                    .map(str::to_string)
                    .ok_or_else(|| {
                        HarnessError::configuration("config key `benchmark` must be a string")
                    })?,
                None => String::new(),
            },
        };

        let repeats = match self.repeats {
            Some(repeats) => repeats,
            None => match workload.get(CONFIG_KEY_REPEATS) {
                Some(value) => value
                    .as_u64()
                    .and_then(|n| u32::try_from(n).ok())
                    .ok_or_else(|| {
                        HarnessError::configuration(
                            "config key `repeats` must be a non-negative 32-bit integer",
                        )
                    })?,
                None => 1,
            },
        };

        let config = HarnessConfig {
            workload_name,
            repeats,
            enable_counters: self.perf,
            enable_stats_markers: self.m5ops,
            workload,
        };
        config.validate()?;
        Ok(config)
    }
}

/// Everything one benchmarking session needs, already parsed.
#[derive(Debug, Clone, Serialize)]
pub struct HarnessConfig {
    pub workload_name: String,
    pub repeats: u32,
    pub enable_counters: bool,
    pub enable_stats_markers: bool,
    pub workload: WorkloadConfig,
}

impl HarnessConfig {
    pub fn new(workload_name: impl Into<String>) -> Self {
        Self {
            workload_name: workload_name.into(),
            repeats: 1,
            enable_counters: false,
            enable_stats_markers: false,
            workload: WorkloadConfig::new(),
        }
    }

    pub fn with_repeats(mut self, repeats: u32) -> Self {
        self.repeats = repeats;
        self
    }

    pub fn with_counters(mut self, enabled: bool) -> Self {
        self.enable_counters = enabled;
        self
    }

    pub fn with_stats_markers(mut self, enabled: bool) -> Self {
        self.enable_stats_markers = enabled;
        self
    }

    pub fn with_workload_config(mut self, workload: WorkloadConfig) -> Self {
        self.workload = workload;
        self
    }

    /// Reject configurations that must abort before any measurement.
    pub fn validate(&self) -> Result<(), HarnessError> {
        if self.workload_name.trim().is_empty() {
            return Err(HarnessError::configuration(
                "Either a config file or benchmark name must be specified",
            ));
        }
        if self.repeats == 0 {
            return Err(HarnessError::configuration("repeats must be at least 1"));
        }
        Ok(())
    }
}

/// Opaque key/value options for a single workload.
///
/// The harness never interprets these beyond the two fallback keys used by
/// [`Args::into_config`]; workloads read what they understand and ignore the
/// rest.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct WorkloadConfig {
    values: Mapping,
}

impl WorkloadConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_mapping(values: Mapping) -> Self {
        Self { values }
    }

    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigFileError> {
        match serde_yaml::from_str::<Value>(text)? {
            Value::Mapping(values) => Ok(Self { values }),
            Value::Null => Ok(Self::new()),
            _ => Err(ConfigFileError::NotAMapping),
        }
    }

    pub fn from_yaml_file(path: &Path) -> Result<Self, HarnessError> {
        let load = || -> Result<Self, ConfigFileError> {
            let text = fs::read_to_string(path)?;
            Self::from_yaml_str(&text)
        };
        load().map_err(|source| HarnessError::ConfigFile {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Insert or replace a key. Mostly useful when building configs in code.
    pub fn insert(&mut self, key: &str, value: impl Into<Value>) -> &mut Self {
        self.values.insert(Value::from(key), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn get_u64(&self, key: &str) -> Option<u64> {
        self.get(key).and_then(Value::as_u64)
    }

    pub fn get_usize(&self, key: &str) -> Option<usize> {
        self.get_u64(key).and_then(|n| usize::try_from(n).ok())
    }

    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(Value::as_i64)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn mapping(&self) -> &Mapping {
        &self.values
    }
}


// Changelog:
// - v1.0.0 (2026-10-17): Initial harness types.
//   - Args mirrors the benchmark tool's short flags (-b, -c, -r, -m, -z, -l).
//   - HarnessConfig carries the validated session settings; WorkloadConfig
//     wraps the YAML mapping passed through to workloads untouched.
