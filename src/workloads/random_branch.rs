// uarch-bench - Free and Open Source Software Statement
//
// This project, uarch-bench, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/workloads/random_branch.rs
// Version: 1.0.0
// Developer: OIEIEIO <oieieio@protonmail.com>
//
// This file implements a data-dependent branch driven by a linear feedback
// shift register, giving a branch outcome stream the predictor cannot learn
// but that is identical on every repeat.
//
// Tree Location:
// - src/workloads/random_branch.rs (unpredictable branch workload)
// - Depends on: benchmark/workload

use super::count_option;
use crate::benchmark::workload::Workload;
use crate::core::types::WorkloadConfig;
use std::hint::black_box;
use std::io::{self, Write};

pub const NAME: &str = "random-branch";

const DEFAULT_LOOP_COUNT: usize = 100;
pub const LFSR_SEED: u32 = 0xA01;
// x^32 + x^22 + x^2 + x + 1
const LFSR_TAPS: u32 = 0x8020_0003;

/// 32-bit Galois LFSR.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lfsr32 {
    seed: u32,
    state: u32,
}

impl Lfsr32 {
    /// A zero seed would lock the register at zero, so it is replaced by 1.
    pub fn new(seed: u32) -> Self {
        let seed = if seed == 0 { 1 } else { seed };
        Self { seed, state: seed }
    }

    pub fn next_value(&mut self) -> u32 {
        let lsb = self.state & 1;
        self.state >>= 1;
        if lsb != 0 {
            self.state ^= LFSR_TAPS;
        }
        self.state
    }

    pub fn reset(&mut self) {
        self.state = self.seed;
    }
}

#[derive(Debug)]
pub struct RandomBranch {
    loop_count: usize,
    executed: u64,
    taken: u64,
    lfsr: Lfsr32,
}

impl RandomBranch {
    pub fn new() -> Self {
        Self {
            loop_count: DEFAULT_LOOP_COUNT,
            executed: 0,
            taken: 0,
            lfsr: Lfsr32::new(LFSR_SEED),
        }
    }

    pub fn executed(&self) -> u64 {
        self.executed
    }

    pub fn taken(&self) -> u64 {
        self.taken
    }
}

impl Default for RandomBranch {
    fn default() -> Self {
        Self::new()
    }
}

impl Workload for RandomBranch {
    fn name(&self) -> &str {
        NAME
    }

    fn init(&mut self, config: &WorkloadConfig) -> bool {
        let Some(loop_count) = count_option(config, "loop_count", DEFAULT_LOOP_COUNT) else {
            return false;
        };
        self.loop_count = loop_count;
        self.executed = 0;
        self.taken = 0;
        self.lfsr.reset();
        true
    }

    fn reset_for_iteration(&mut self) {
        self.executed = 0;
        self.taken = 0;
        self.lfsr.reset();
    }

    fn run(&mut self) {
        for _ in 0..self.loop_count {
            let value = black_box(self.lfsr.next_value());
            if (value >> 3) % 2 == 0 {
                self.taken += 1;
            }
            self.executed += 1;
        }
    }

    fn report(&self, out: &mut dyn Write) -> io::Result<()> {
        writeln!(out, "Loop count: {}", self.loop_count)?;
        writeln!(out, "Branch executed: {}", self.executed)?;
        writeln!(out, "Branch taken: {}", self.taken)?;
        writeln!(out, "Branch not taken: {}", self.executed - self.taken)
    }
}
