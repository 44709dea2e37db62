// uarch-bench - Free and Open Source Software Statement
//
// This project, uarch-bench, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/core/mod.rs
// Version: 1.0.0
// Developer: OIEIEIO <oieieio@protonmail.com>
//
// This file is the module declaration for the core types of the harness,
// located in the core subdirectory. It declares submodules and re-exports
// key types for use throughout the project.

pub mod error;
pub mod types;

// Re-export the most commonly used items
pub use error::{ConfigFileError, CounterError, HarnessError};
pub use types::{Args, HarnessConfig, WorkloadConfig};

// Changelog:
// - v1.0.0 (2026-10-17): Initial core module.
//   - Declares error and types submodules with re-exports.
