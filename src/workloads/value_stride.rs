// uarch-bench - Free and Open Source Software Statement
//
// This project, uarch-bench, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/workloads/value_stride.rs
// Version: 1.0.0
// Developer: OIEIEIO <oieieio@protonmail.com>
//
// This file implements a strided array walk. Loaded values grow by a fixed
// stride, which makes the workload a target for value prediction, and the
// step between touched elements controls the cache footprint.
//
// Tree Location:
// - src/workloads/value_stride.rs (strided load workload)
// - Depends on: benchmark/workload

use super::{count_option, int_option};
use crate::benchmark::workload::Workload;
use crate::core::types::WorkloadConfig;
use std::hint::black_box;
use std::io::{self, Write};

pub const NAME: &str = "value-stride";

const DEFAULT_LOOP_COUNT: usize = 100;
const DEFAULT_ARRAY_SIZE: usize = 100;
const DEFAULT_ARRAY_STEP: usize = 1;
const DEFAULT_STRIDE: i64 = 0;

#[derive(Debug)]
pub struct ValueStride {
    loop_count: usize,
    array_size: usize,
    array_step: usize,
    stride: i64,
    array: Vec<i64>,
    result: i64,
}

impl ValueStride {
    pub fn new() -> Self {
        Self {
            loop_count: DEFAULT_LOOP_COUNT,
            array_size: DEFAULT_ARRAY_SIZE,
            array_step: DEFAULT_ARRAY_STEP,
            stride: DEFAULT_STRIDE,
            array: Vec::new(),
            result: 0,
        }
    }

    /// Sum of the loaded values in the current repeat.
    pub fn result(&self) -> i64 {
        self.result
    }
}

impl Default for ValueStride {
    fn default() -> Self {
        Self::new()
    }
}

impl Workload for ValueStride {
    fn name(&self) -> &str {
        NAME
    }

    fn init(&mut self, config: &WorkloadConfig) -> bool {
        let (Some(loop_count), Some(array_size), Some(array_step), Some(stride)) = (
            count_option(config, "loop_count", DEFAULT_LOOP_COUNT),
            count_option(config, "array_size", DEFAULT_ARRAY_SIZE),
            count_option(config, "array_step", DEFAULT_ARRAY_STEP),
            int_option(config, "stride", DEFAULT_STRIDE),
        ) else {
            return false;
        };
        if array_size == 0 || array_step == 0 {
            return false;
        }

        self.loop_count = loop_count;
        self.array_size = array_size;
        self.array_step = array_step;
        self.stride = stride;

        // Touched slots hold 0, stride, 2*stride, ...; the rest stay zero.
        self.array = vec![0; array_size];
        let mut value = 0i64;
        for slot in self.array.iter_mut().step_by(array_step) {
            *slot = value;
            value = value.wrapping_add(stride);
        }
        self.result = 0;
        true
    }

    fn reset_for_iteration(&mut self) {
        self.result = 0;
    }

    fn run(&mut self) {
        let mut result = self.result;
        for _ in 0..self.loop_count {
            for value in self.array.iter().step_by(self.array_step) {
                result = result.wrapping_add(black_box(*value));
            }
        }
        self.result = result;
    }

    fn report(&self, out: &mut dyn Write) -> io::Result<()> {
        writeln!(out, "Array size: {}", self.array_size)?;
        writeln!(out, "Array step: {}", self.array_step)?;
        writeln!(out, "Result: {}", self.result)
    }
}
