// uarch-bench - Free and Open Source Software Statement
//
// This project, uarch-bench, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/workloads/binary_search.rs
// Version: 1.0.0
// Developer: OIEIEIO <oieieio@protonmail.com>
//
// This file implements repeated binary searches for random keys in a sorted
// array of small random values. The comparison branches inside the search
// are hard to predict.
//
// Tree Location:
// - src/workloads/binary_search.rs (branchy search workload)
// - Depends on: benchmark/workload, rand

use super::{count_option, u64_option};
use crate::benchmark::workload::Workload;
use crate::core::types::WorkloadConfig;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::hint::black_box;
use std::io::{self, Write};

pub const NAME: &str = "binary-search";

const DEFAULT_NUM_KEYS: usize = 100;
const DEFAULT_ARRAY_SIZE: usize = 100;
const DEFAULT_SEED: u64 = 0x5EED;
/// Values and keys are drawn from `0..VALUE_RANGE`.
const VALUE_RANGE: u32 = 256;

#[derive(Debug)]
pub struct BinarySearch {
    num_keys: usize,
    array_size: usize,
    seed: u64,
    array: Vec<u32>,
    keys: Vec<u32>,
    found: u64,
}

impl BinarySearch {
    pub fn new() -> Self {
        Self {
            num_keys: DEFAULT_NUM_KEYS,
            array_size: DEFAULT_ARRAY_SIZE,
            seed: DEFAULT_SEED,
            array: Vec::new(),
            keys: Vec::new(),
            found: 0,
        }
    }

    pub fn found(&self) -> u64 {
        self.found
    }
}

impl Default for BinarySearch {
    fn default() -> Self {
        Self::new()
    }
}

/// Index of `target` in the sorted `values`, if present.
#[inline(never)]
pub fn search(values: &[u32], target: u32) -> Option<usize> {
    let mut low = 0usize;
    let mut high = values.len();
    while low < high {
        let mid = low + (high - low) / 2;
        let value = values[mid];
        if value == target {
            return Some(mid);
        } else if value > target {
            high = mid;
        } else {
            low = mid + 1;
        }
    }
    None
}

impl Workload for BinarySearch {
    fn name(&self) -> &str {
        NAME
    }

    fn init(&mut self, config: &WorkloadConfig) -> bool {
        let (Some(num_keys), Some(array_size), Some(seed)) = (
            count_option(config, "num_keys", DEFAULT_NUM_KEYS),
            count_option(config, "array_size", DEFAULT_ARRAY_SIZE),
            u64_option(config, "seed", DEFAULT_SEED),
        ) else {
            return false;
        };
        if num_keys == 0 || array_size == 0 {
            return false;
        }
        self.seed = seed;
        self.num_keys = num_keys;
        self.array_size = array_size;

        let mut rng = StdRng::seed_from_u64(self.seed);
        self.array = (0..array_size).map(|_| rng.gen_range(0..VALUE_RANGE)).collect();
        self.array.sort_unstable();
        self.keys = (0..num_keys).map(|_| rng.gen_range(0..VALUE_RANGE)).collect();
        self.found = 0;
        true
    }

    fn reset_for_iteration(&mut self) {
        self.found = 0;
    }

    fn run(&mut self) {
        for &key in &self.keys {
            if search(black_box(&self.array), key).is_some() {
                self.found += 1;
            }
        }
    }

    fn report(&self, out: &mut dyn Write) -> io::Result<()> {
        writeln!(out, "Array size: {}", self.array_size)?;
        writeln!(out, "Number of keys: {}", self.num_keys)?;
        writeln!(out, "Found keys: {}", self.found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_finds_present_and_rejects_missing() {
        let values = [1, 3, 3, 7, 9, 200];
        assert_eq!(search(&values, 7), Some(3));
        assert_eq!(search(&values, 1), Some(0));
        assert_eq!(search(&values, 200), Some(5));
        assert!(search(&values, 3).is_some());
        assert_eq!(search(&values, 4), None);
        assert_eq!(search(&[], 4), None);
    }
}
