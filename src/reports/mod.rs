//! Report generation for comparison results.
//!
//! Three output formats are available:
//! - Text: the indented difference lines, one per mismatch
//! - Summary: compact shell-friendly counts
//! - JSON: structured data for programmatic integration

mod json;
mod summary;
mod text;
mod types;

pub use json::JsonReporter;
pub use summary::SummaryReporter;
pub use text::TextReporter;
pub use types::{ReportConfig, ReportFormat, ReportMetadata};

use crate::compare::{BatchResult, ComparisonResult};
use crate::model::Instance;
use thiserror::Error;

/// Errors that can occur during report generation
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Format error: {0}")]
    FormatError(#[from] std::fmt::Error),
}

/// Trait for report generators
pub trait ReportGenerator {
    /// Generate a report for one compared root pair
    fn generate_pair_report(
        &self,
        result: &ComparisonResult,
        left: &Instance,
        right: &Instance,
        config: &ReportConfig,
    ) -> Result<String, ReportError>;

    /// Generate a report for a whole-class batch
    fn generate_batch_report(
        &self,
        batch: &BatchResult,
        config: &ReportConfig,
    ) -> Result<String, ReportError>;

    /// Get the format this generator produces
    fn format(&self) -> ReportFormat;
}

/// Create a report generator for the given format
#[must_use]
pub fn create_reporter(format: ReportFormat) -> Box<dyn ReportGenerator> {
    create_reporter_with_options(format, true)
}

/// Create a report generator with color control.
///
/// `Auto` should be resolved by the caller; it falls back to the summary.
#[must_use]
pub fn create_reporter_with_options(
    format: ReportFormat,
    use_color: bool,
) -> Box<dyn ReportGenerator> {
    match format {
        ReportFormat::Auto | ReportFormat::Summary => {
            if use_color {
                Box::new(SummaryReporter::new())
            } else {
                Box::new(SummaryReporter::new().no_color())
            }
        }
        ReportFormat::Text => Box::new(TextReporter::new()),
        ReportFormat::Json => Box::new(JsonReporter::new()),
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::compare::{
        AccessWarning, BatchResult, ComparisonResult, Difference, DifferenceKind, PairOutcome,
    };
    use crate::model::{DbId, Instance};

    pub fn instances() -> (Instance, Instance) {
        (
            Instance::new(1, "Widget").named("root"),
            Instance::new(1, "Widget").named("root"),
        )
    }

    pub fn result() -> ComparisonResult {
        let mut result = ComparisonResult::new();
        result.differences.push(Difference {
            depth: 0,
            path: "name".into(),
            left: "\"root\" [Widget:1]".into(),
            right: "\"root\" [Widget:1]".into(),
            kind: DifferenceKind::ValueMismatch {
                attribute: "name".into(),
                left: "A".into(),
                right: "B".into(),
            },
        });
        result.differences.push(Difference {
            depth: 1,
            path: "children".into(),
            left: "[Widget:2]".into(),
            right: "[Widget:2]".into(),
            kind: DifferenceKind::CountMismatch {
                attribute: "children".into(),
                left_count: 2,
                right_count: 3,
            },
        });
        result.warnings.push(AccessWarning {
            depth: 1,
            path: "children[0]".into(),
            instance: "[Widget:2]".into(),
            message: "No instance with DB_ID 99".into(),
        });
        result.pairs_compared = 3;
        result.max_depth_reached = 1;
        result
    }

    pub fn batch() -> BatchResult {
        BatchResult {
            class: "Widget".into(),
            pairs: vec![
                PairOutcome {
                    db_id: DbId(1),
                    label: "\"root\" [Widget:1]".into(),
                    result: result(),
                },
                PairOutcome {
                    db_id: DbId(2),
                    label: "[Widget:2]".into(),
                    result: ComparisonResult::new(),
                },
            ],
            missing_in_right: vec![DbId(7)],
            missing_in_left: Vec::new(),
        }
    }
}
