// uarch-bench - Free and Open Source Software Statement
//
// This project, uarch-bench, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/counters/sample.rs
// Version: 1.0.0
// Developer: OIEIEIO <oieieio@protonmail.com>
//
// This file holds the three-word sample read back from a counter and the
// multiplexing correction applied to it.
//
// Tree Location:
// - src/counters/sample.rs (raw samples and multiplexing correction)
// - Depends on: std

/// Bytes the kernel returns for a `TOTAL_TIME_ENABLED | TOTAL_TIME_RUNNING` read.
pub const SAMPLE_BYTES: usize = 3 * std::mem::size_of::<u64>();

/// Raw counter value plus the enabled/running times used for scaling.
///
/// `time_running <= time_enabled` always holds for kernel-produced samples.
/// The two differ only when the counter was multiplexed off the PMU for
/// part of the window.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Sample {
    pub raw_value: u64,
    pub time_enabled: u64,
    pub time_running: u64,
}

impl Sample {
    pub const fn new(raw_value: u64, time_enabled: u64, time_running: u64) -> Self {
        Self {
            raw_value,
            time_enabled,
            time_running,
        }
    }

    /// Estimate the count over the whole enabled window.
    ///
    /// Returns `None` when the counter never ran, since the scale factor
    /// `time_enabled / time_running` is undefined.
    pub fn corrected(&self) -> Option<f64> {
        if self.time_running == 0 {
            return None;
        }
        let correction = self.time_enabled as f64 / self.time_running as f64;
        Some(self.raw_value as f64 * correction)
    }

    /// True when the kernel rotated this counter off the PMU for part of the window.
    pub fn is_multiplexed(&self) -> bool {
        self.time_running < self.time_enabled
    }

    pub fn from_words(words: [u64; 3]) -> Self {
        Self::new(words[0], words[1], words[2])
    }
}
