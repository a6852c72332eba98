//! Pipeline orchestration for comparison jobs.
//!
//! This module provides the shared load → compare → report workflow used by
//! the CLI command handlers.

mod compare_stage;
mod load;
mod output;
mod report_stage;

pub use compare_stage::{build_comparator, compare_pair, compare_roots_of_class, PairComparison};
pub use load::{load_snapshot_with_context, LoadedSnapshot};
pub use output::{auto_detect_format, should_use_color, write_output, OutputTarget};
pub use report_stage::{output_batch_report, output_pair_report};

/// Exit codes for scripted use
pub mod exit_codes {
    /// Success - no differences (or `--fail-on-diff` not given)
    pub const SUCCESS: i32 = 0;
    /// Differences were found
    pub const DIFFERENCES_FOUND: i32 = 1;
    /// An error occurred
    pub const ERROR: i32 = 3;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_values() {
        assert_eq!(exit_codes::SUCCESS, 0);
        assert_eq!(exit_codes::DIFFERENCES_FOUND, 1);
        assert_eq!(exit_codes::ERROR, 3);
    }
}
