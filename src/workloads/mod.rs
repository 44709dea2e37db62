// uarch-bench - Free and Open Source Software Statement
//
// This project, uarch-bench, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/workloads/mod.rs
// Version: 1.0.0
// Developer: OIEIEIO <oieieio@protonmail.com>
//
// This file declares the built-in workloads and the startup routine that
// registers them with a WorkloadRegistry.
//
// Tree Location:
// - src/workloads/mod.rs (built-in workload entry point)
// - Submodules: simple_loop, value_stride, random_branch, binary_search

pub mod binary_search;
pub mod random_branch;
pub mod simple_loop;
pub mod value_stride;

pub use binary_search::BinarySearch;
pub use random_branch::RandomBranch;
pub use simple_loop::SimpleLoop;
pub use value_stride::ValueStride;

use crate::benchmark::registry::WorkloadRegistry;
use crate::core::error::HarnessError;
use crate::core::types::WorkloadConfig;
use log::warn;

const LOG_TARGET: &str = "uarch_bench::workloads";

/// Register every built-in workload, in listing order.
pub fn register_builtin_workloads(registry: &mut WorkloadRegistry) -> Result<(), HarnessError> {
    registry.register(simple_loop::NAME, || Box::new(SimpleLoop::new()))?;
    registry.register(value_stride::NAME, || Box::new(ValueStride::new()))?;
    registry.register(random_branch::NAME, || Box::new(RandomBranch::new()))?;
    registry.register(binary_search::NAME, || Box::new(BinarySearch::new()))?;
    Ok(())
}

/// Non-negative integer option with a default.
///
/// `None` when the key is present but not a non-negative integer, so the
/// workload can refuse to initialise instead of silently using the default.
pub(crate) fn count_option(config: &WorkloadConfig, key: &str, default: usize) -> Option<usize> {
    if config.get(key).is_none() {
        return Some(default);
    }
    let value = config.get_usize(key);
    if value.is_none() {
        warn!(target: LOG_TARGET, "Option {} must be a non-negative integer", key);
    }
    value
}

/// Unsigned 64-bit option (seeds and the like); `None` when present but invalid.
pub(crate) fn u64_option(config: &WorkloadConfig, key: &str, default: u64) -> Option<u64> {
    if config.get(key).is_none() {
        return Some(default);
    }
    let value = config.get_u64(key);
    if value.is_none() {
        warn!(target: LOG_TARGET, "Option {} must be a non-negative integer", key);
    }
    value
}

/// Signed integer option with a default; `None` when present but invalid.
pub(crate) fn int_option(config: &WorkloadConfig, key: &str, default: i64) -> Option<i64> {
    if config.get(key).is_none() {
        return Some(default);
    }
    let value = config.get_i64(key);
    if value.is_none() {
        warn!(target: LOG_TARGET, "Option {} must be an integer", key);
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtins_register_in_order() {
        let mut registry = WorkloadRegistry::new();
        register_builtin_workloads(&mut registry).unwrap();
        assert_eq!(
            registry.list(),
            vec!["simple-loop", "value-stride", "random-branch", "binary-search"]
        );
    }

    #[test]
    fn test_count_option_distinguishes_missing_from_invalid() {
        let mut config = WorkloadConfig::new();
        assert_eq!(count_option(&config, "loop_count", 7), Some(7));
        config.insert("loop_count", 12u64);
        assert_eq!(count_option(&config, "loop_count", 7), Some(12));
        config.insert("loop_count", "many");
        assert_eq!(count_option(&config, "loop_count", 7), None);
        config.insert("loop_count", -1i64);
        assert_eq!(count_option(&config, "loop_count", 7), None);
    }

    #[test]
    fn test_u64_option_rejects_wrong_type() {
        let mut config = WorkloadConfig::new();
        assert_eq!(u64_option(&config, "seed", 9), Some(9));
        config.insert("seed", u64::MAX);
        assert_eq!(u64_option(&config, "seed", 9), Some(u64::MAX));
        config.insert("seed", "abc");
        assert_eq!(u64_option(&config, "seed", 9), None);
    }
}

// Changelog:
// - v1.0.0 (2026-10-17): Built-in workloads.
//   - Registration is an explicit startup call rather than static
//     self-registration, so the registry is complete before the harness
//     sees it.
//   - u64_option validates seed-style keys instead of silently defaulting.
