// uarch-bench - Free and Open Source Software Statement
//
// This project, uarch-bench, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/core/error.rs
// Version: 1.0.0
// Developer: OIEIEIO <oieieio@protonmail.com>
//
// This file defines the error taxonomy shared by the counter subsystem and
// the measurement harness.
//
// Tree Location:
// - src/core/error.rs (error types)
// - Depends on: thiserror, serde_yaml

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failures raised by a `CounterSet` and its kernel backend.
#[derive(Error, Debug)]
pub enum CounterError {
    #[error("Counter {name} cannot be registered after init")]
    AlreadyInitialized { name: String },

    #[error("Counter {name} is already registered in this set")]
    DuplicateCounterName { name: String },

    #[error("No counters configured")]
    NoCounters,

    #[error("Error setting counter: {name}")]
    Open {
        name: String,
        #[source]
        source: io::Error,
    },

    #[error("Error reading counter {name}: got {got} of {expected} bytes")]
    ShortRead {
        name: String,
        got: usize,
        expected: usize,
    },

    #[error("Error reading counter {name}")]
    Read {
        name: String,
        #[source]
        source: io::Error,
    },

    #[error("Group {operation} failed on leader {leader}")]
    Control {
        operation: &'static str,
        leader: String,
        #[source]
        source: io::Error,
    },

    #[error("Counters not initialized")]
    NotInitialized,

    #[error("Unknown counter: {name}")]
    NotFound { name: String },
}

/// Failures raised while configuring or driving a benchmarking session.
#[derive(Error, Debug)]
pub enum HarnessError {
    #[error("Invalid configuration: {message}")]
    Configuration { message: String },

    #[error("Unknown benchmark: {name}")]
    WorkloadNotFound { name: String },

    #[error("Benchmark {name} is registered twice")]
    DuplicateWorkload { name: String },

    #[error("Benchmark {name} failed to initialize")]
    WorkloadInit { name: String },

    #[error("Harness is {actual}, expected {expected}")]
    InvalidState {
        expected: &'static str,
        actual: String,
    },

    #[error(transparent)]
    Counter(#[from] CounterError),

    #[error("Failed to write report")]
    Io(#[from] io::Error),

    #[error("Failed to load config file {path:?}")]
    ConfigFile {
        path: PathBuf,
        #[source]
        source: ConfigFileError,
    },
}

/// Reasons a YAML configuration file could not be turned into a config.
#[derive(Error, Debug)]
pub enum ConfigFileError {
    #[error("IO operation failed")]
    Io(#[from] io::Error),

    #[error("Malformed YAML")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Top level of the config file must be a mapping")]
    NotAMapping,
}

impl HarnessError {
    pub fn configuration(message: impl Into<String>) -> Self {
        HarnessError::Configuration {
            message: message.into(),
        }
    }
}

// Changelog:
// - v1.0.0 (2026-10-17): Initial error taxonomy.
//   - CounterError covers registration, open, read, group control and lookup
//     failures; HarnessError wraps it for session-level reporting.
