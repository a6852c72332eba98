//! Report output stage.
//!
//! Resolves the output format, fills report metadata from the loaded
//! snapshots and writes the rendered report.

use crate::compare::BatchResult;
use crate::config::AppConfig;
use crate::error::{ErrorContext, Result};
use crate::reports::{create_reporter_with_options, ReportConfig, ReportMetadata};

use super::{
    auto_detect_format, should_use_color, write_output, LoadedSnapshot, OutputTarget,
    PairComparison,
};

/// Report settings for a comparison between `left` and `right`.
fn report_config(
    config: &AppConfig,
    left: &LoadedSnapshot,
    right: &LoadedSnapshot,
) -> ReportConfig {
    ReportConfig {
        metadata: ReportMetadata {
            left_path: Some(left.display_path()),
            right_path: Some(right.display_path()),
            left_fingerprint: Some(left.fingerprint()),
            right_fingerprint: Some(right.fingerprint()),
            ..ReportMetadata::new()
        },
        ..config.report_config()
    }
}

/// Render and write the report for one root pair.
pub fn output_pair_report(
    config: &AppConfig,
    comparison: &PairComparison,
    left: &LoadedSnapshot,
    right: &LoadedSnapshot,
) -> Result<()> {
    let target = OutputTarget::from_option(config.output.file.clone());
    let format = auto_detect_format(config.output.format, &target);
    let reporter = create_reporter_with_options(format, should_use_color(config.output.no_color));

    let report = reporter
        .generate_pair_report(
            &comparison.result,
            &comparison.left,
            &comparison.right,
            &report_config(config, left, right),
        )
        .with_context(|| format!("{format} report"))?;

    write_output(&report, &target, config.behavior.quiet)
}

/// Render and write the report for a whole-class comparison.
pub fn output_batch_report(
    config: &AppConfig,
    batch: &BatchResult,
    left: &LoadedSnapshot,
    right: &LoadedSnapshot,
) -> Result<()> {
    let target = OutputTarget::from_option(config.output.file.clone());
    let format = auto_detect_format(config.output.format, &target);
    let reporter = create_reporter_with_options(format, should_use_color(config.output.no_color));

    let report = reporter
        .generate_batch_report(batch, &report_config(config, left, right))
        .with_context(|| format!("{format} report"))?;

    write_output(&report, &target, config.behavior.quiet)
}
