// uarch-bench - Free and Open Source Software Statement
//
// This project, uarch-bench, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/help/mod.rs
// Version: 1.0.0
// Developer: OIEIEIO <oieieio@protonmail.com>
//
// This file provides the CLI's informational output: the workload listing,
// and the configuration echo printed before a session.
//
// Tree Location:
// - src/help/mod.rs (listing and config echo)
// - Depends on: benchmark/registry, core/types

use crate::benchmark::registry::WorkloadRegistry;
use crate::core::types::HarnessConfig;
use std::io::{self, Write};

/// Print the registered workloads in registration order.
pub fn display_workload_list(registry: &WorkloadRegistry, out: &mut dyn Write) -> io::Result<()> {
    writeln!(out, "Available benchmarks:")?;
    for name in registry.list() {
        writeln!(out, "  - {}", name)?;
    }
    Ok(())
}

/// Echo the whole session configuration, workload options included, as YAML.
pub fn display_config(config: &HarnessConfig, out: &mut dyn Write) -> io::Result<()> {
    let yaml = serde_yaml::to_string(config)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    writeln!(out, "Base Configuration:")?;
    for line in yaml.lines() {
        writeln!(out, "  {}", line)?;
    }
    Ok(())
}


// Changelog:
// - v1.0.0 (2026-10-17): Help output for the benchmarking harness.
//   - Workload listing and base configuration echo, both written to a
//     caller-supplied sink.
//   - Configuration echo serializes the whole HarnessConfig through serde_yaml;
//     unused usage-example and version helpers removed.
