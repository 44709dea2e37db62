// uarch-bench - Free and Open Source Software Statement
//
// This project, uarch-bench, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/workloads/simple_loop.rs
// Version: 1.0.0
// Developer: OIEIEIO <oieieio@protonmail.com>
//
// This file implements the simplest workload: a counting loop. It doubles
// as the template for writing new workloads.
//
// Tree Location:
// - src/workloads/simple_loop.rs (counting loop workload)
// - Depends on: benchmark/workload

use super::count_option;
use crate::benchmark::workload::Workload;
use crate::core::types::WorkloadConfig;
use std::hint::black_box;
use std::io::{self, Write};

pub const NAME: &str = "simple-loop";
const DEFAULT_LOOP_COUNT: usize = 1_000_000;

/// Increments a counter `loop_count` times per repeat.
///
/// `sum` is not reset between repeats, so after `n` repeats the report
/// shows `n * loop_count`.
#[derive(Debug)]
pub struct SimpleLoop {
    loop_count: usize,
    sum: u64,
}

impl SimpleLoop {
    pub fn new() -> Self {
        Self {
            loop_count: DEFAULT_LOOP_COUNT,
            sum: 0,
        }
    }

    pub fn sum(&self) -> u64 {
        self.sum
    }
}

impl Default for SimpleLoop {
    fn default() -> Self {
        Self::new()
    }
}

impl Workload for SimpleLoop {
    fn name(&self) -> &str {
        NAME
    }

    fn init(&mut self, config: &WorkloadConfig) -> bool {
        let Some(loop_count) = count_option(config, "loop_count", DEFAULT_LOOP_COUNT) else {
            return false;
        };
        self.loop_count = loop_count;
        self.sum = 0;
        true
    }

    fn run(&mut self) {
        for _ in 0..self.loop_count {
            self.sum = black_box(self.sum + 1);
        }
    }

    fn report(&self, out: &mut dyn Write) -> io::Result<()> {
        writeln!(out, "Loop count: {}", self.loop_count)?;
        writeln!(out, "Sum: {}", self.sum)
    }
}
