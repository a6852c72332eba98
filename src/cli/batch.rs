//! Compare-class command handler.
//!
//! Implements the `compare-class` subcommand: every root of one class is
//! compared with the instance of the same id in the other snapshot.

use super::compare::determine_exit_code;
use crate::config::AppConfig;
use crate::pipeline::{compare_roots_of_class, load_snapshot_with_context, output_batch_report};
use anyhow::Result;
use std::path::PathBuf;

/// Which class to compare across two snapshots
#[derive(Debug, Clone)]
pub struct ClassRequest {
    /// Left snapshot file
    pub left: PathBuf,
    /// Right snapshot file
    pub right: PathBuf,
    /// Root class; subclasses are included
    pub class: String,
}

/// Run the compare-class command, returning the desired exit code.
///
/// Roots missing from either side count as differences for the exit code.
#[allow(clippy::needless_pass_by_value)]
pub fn run_compare_class(config: AppConfig, request: &ClassRequest) -> Result<i32> {
    super::ensure_valid(&config)?;
    let quiet = config.behavior.quiet;

    let (left, right) = rayon::join(
        || load_snapshot_with_context(&request.left, quiet),
        || load_snapshot_with_context(&request.right, quiet),
    );
    let (left, right) = (left?, right?);

    let batch = compare_roots_of_class(&config, left.store(), right.store(), &request.class)?;

    output_batch_report(&config, &batch, &left, &right)?;

    Ok(determine_exit_code(&config, batch.is_identical()))
}
