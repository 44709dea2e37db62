// uarch-bench - Free and Open Source Software Statement
//
// This project, uarch-bench, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: tests/workloads_test.rs
// Version: 1.0.0
// Developer: Test Implementation
//
// This file tests the built-in workloads: option handling, deterministic
// per-repeat state and report contents.

#[cfg(test)]
mod tests {
    use uarch_bench::Workload;
    use uarch_bench::WorkloadConfig;
    use uarch_bench::workloads::{BinarySearch, RandomBranch, SimpleLoop, ValueStride};

    fn config(pairs: &[(&str, i64)]) -> WorkloadConfig {
        let mut config = WorkloadConfig::new();
        for (key, value) in pairs {
            config.insert(key, *value);
        }
        config
    }

    fn report_of(workload: &dyn Workload) -> String {
        let mut out = Vec::new();
        workload.report(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_simple_loop_accumulates_across_repeats() {
        let mut workload = SimpleLoop::new();
        assert!(workload.init(&config(&[("loop_count", 250)])));
        for _ in 0..3 {
            workload.reset_for_iteration();
            workload.run();
        }
        assert_eq!(workload.sum(), 750);
        assert!(report_of(&workload).contains("Loop count: 250"));
    }

    #[test]
    fn test_invalid_option_fails_init() {
        let mut workload = SimpleLoop::new();
        let mut bad = WorkloadConfig::new();
        bad.insert("loop_count", "lots");
        assert!(!workload.init(&bad));

        let mut stride = ValueStride::new();
        assert!(!stride.init(&config(&[("array_step", 0)])));
        assert!(!stride.init(&config(&[("array_size", -4)])));
    }

    #[test]
    fn test_value_stride_sums_touched_slots() {
        let mut workload = ValueStride::new();
        // slots 0, 2, 4, 6 hold 0, 3, 6, 9
        assert!(workload.init(&config(&[
            ("array_size", 8),
            ("array_step", 2),
            ("stride", 3),
            ("loop_count", 2),
        ])));
        workload.reset_for_iteration();
        workload.run();
        assert_eq!(workload.result(), 36);

        workload.reset_for_iteration();
        workload.run();
        assert_eq!(workload.result(), 36);
        assert!(report_of(&workload).contains("Result: 36"));
    }

    #[test]
    fn test_random_branch_repeats_are_identical() {
        let mut workload = RandomBranch::new();
        assert!(workload.init(&config(&[("loop_count", 1_000)])));

        workload.reset_for_iteration();
        workload.run();
        let first = workload.taken();

        workload.reset_for_iteration();
        workload.run();
        assert_eq!(workload.taken(), first);
        assert_eq!(workload.executed(), 1_000);
        assert!(first > 0 && first < 1_000);

        let report = report_of(&workload);
        assert!(report.contains("Branch executed: 1000"));
        assert!(report.contains(&format!("Branch not taken: {}", 1_000 - first)));
    }

    #[test]
    fn test_binary_search_is_deterministic_per_seed() {
        let options = config(&[("num_keys", 500), ("array_size", 64), ("seed", 7)]);

        let mut first = BinarySearch::new();
        assert!(first.init(&options));
        first.run();

        let mut second = BinarySearch::new();
        assert!(second.init(&options));
        second.run();

        assert_eq!(first.found(), second.found());
        assert!(first.found() <= 500);

        let found = first.found();
        first.reset_for_iteration();
        first.run();
        assert_eq!(first.found(), found);
        assert!(report_of(&first).contains("Number of keys: 500"));
    }

    #[test]
    fn test_binary_search_rejects_empty_inputs() {
        let mut workload = BinarySearch::new();
        assert!(!workload.init(&config(&[("num_keys", 0)])));
    }

    #[test]
    fn test_binary_search_rejects_malformed_seed() {
        let mut options = config(&[("num_keys", 10)]);
        options.insert("seed", "not-a-number");
        let mut workload = BinarySearch::new();
        assert!(!workload.init(&options));

        assert!(!workload.init(&config(&[("seed", -1)])));
        assert!(workload.init(&config(&[("seed", 42)])));
    }
}
