// uarch-bench - Free and Open Source Software Statement
//
// This project, uarch-bench, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/main.rs
// Version: 1.0.0
// Developer: OIEIEIO <oieieio@protonmail.com>
//
// This file is the command-line front end. It parses arguments, installs the
// console logger, builds the workload registry and runs one measured session
// with the report written to stdout.
//
// Tree Location:
// - src/main.rs (binary entry point)
// - Depends on: uarch_bench library, clap, log4rs, anyhow

use anyhow::{Context, Result};
use clap::Parser;
use log::{LevelFilter, error, info};
use log4rs::append::console::{ConsoleAppender, Target};
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;
use std::io::{self, Write};
use std::process::ExitCode;
use std::sync::Arc;
use uarch_bench::{
    Harness, WorkloadRegistry,
    core::types::Args,
    help::{display_config, display_workload_list},
};

const LOG_TARGET: &str = "uarch_bench::main";

fn init_logging(verbose: bool) -> Result<()> {
    let level = if verbose { LevelFilter::Debug } else { LevelFilter::Info };
    // Logs go to stderr so stdout carries only the report
    let console = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new(
            "{d(%H:%M:%S%.3f)} {h({l:<5})} {t} - {m}{n}",
        )))
        .build();
    let config = Config::builder()
        .appender(Appender::builder().build("console", Box::new(console)))
        .build(Root::builder().appender("console").build(level))
        .context("Failed to build logger configuration")?;
    log4rs::init_config(config).context("Failed to install logger")?;
    Ok(())
}

fn run(args: Args) -> Result<()> {
    let registry = Arc::new(
        WorkloadRegistry::with_builtins().context("Failed to register built-in benchmarks")?,
    );
    let stdout = io::stdout();
    let mut out = stdout.lock();

    if args.list {
        display_workload_list(&registry, &mut out)?;
        return Ok(());
    }

    let config = args.into_config().context("Invalid configuration")?;
    display_config(&config, &mut out)?;
    out.flush()?;

    let mut harness = Harness::from_config(Arc::clone(&registry), &config);
    let summary = harness
        .execute(&config, &mut out)
        .with_context(|| format!("Benchmark {} failed", config.workload_name))?;
    out.flush()?;

    let failures: usize = summary
        .iterations
        .iter()
        .map(|iteration| iteration.read_failures.len())
        .sum();
    if failures > 0 {
        info!(target: LOG_TARGET, "{} counter reads were unavailable during the session", failures);
    }
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    if let Err(e) = init_logging(args.verbose) {
        eprintln!("Error: {:#}", e);
        return ExitCode::FAILURE;
    }

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(target: LOG_TARGET, "{:#}", e);
            ExitCode::FAILURE
        }
    }
}

// Changelog:
// - v1.0.0 (2026-10-17): Command-line front end for the benchmarking harness.
//   - Replaced the feature-gated mining entry points with a single
//     list-or-run flow over the workload registry.
//   - Console logging through log4rs on stderr; --verbose selects debug.
