//! Compare command handler.
//!
//! Implements the `compare` subcommand for comparing one root pair.

use crate::config::AppConfig;
use crate::model::DbId;
use crate::pipeline::{compare_pair, exit_codes, load_snapshot_with_context, output_pair_report};
use anyhow::Result;
use std::path::PathBuf;

/// What to compare
#[derive(Debug, Clone)]
pub struct PairRequest {
    /// Left snapshot file
    pub left: PathBuf,
    /// Right snapshot file
    pub right: PathBuf,
    /// Root instance in the left snapshot
    pub left_id: DbId,
    /// Root instance in the right snapshot
    pub right_id: DbId,
}

/// Run the compare command, returning the desired exit code.
///
/// The caller is responsible for calling `std::process::exit()` with the
/// returned code when it is non-zero.
#[allow(clippy::needless_pass_by_value)]
pub fn run_compare(config: AppConfig, request: &PairRequest) -> Result<i32> {
    super::ensure_valid(&config)?;
    let quiet = config.behavior.quiet;

    let left = load_snapshot_with_context(&request.left, quiet)?;
    let right = load_snapshot_with_context(&request.right, quiet)?;

    if !quiet && left.snapshot.fingerprint == right.snapshot.fingerprint {
        tracing::info!("Both snapshots have identical content");
    }

    let comparison = compare_pair(
        &config,
        left.store(),
        right.store(),
        request.left_id,
        request.right_id,
    )?;

    output_pair_report(&config, &comparison, &left, &right)?;

    Ok(determine_exit_code(&config, comparison.result.is_identical()))
}

/// Exit code for a finished comparison.
pub(crate) const fn determine_exit_code(config: &AppConfig, identical: bool) -> i32 {
    if config.behavior.fail_on_diff && !identical {
        exit_codes::DIFFERENCES_FOUND
    } else {
        exit_codes::SUCCESS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_determine_exit_code() {
        let lenient = AppConfig::default();
        assert_eq!(determine_exit_code(&lenient, false), exit_codes::SUCCESS);

        let strict = AppConfig::builder().fail_on_diff(true).build();
        assert_eq!(determine_exit_code(&strict, true), exit_codes::SUCCESS);
        assert_eq!(
            determine_exit_code(&strict, false),
            exit_codes::DIFFERENCES_FOUND
        );
    }
}
