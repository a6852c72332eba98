//! Plain text report: the difference lines themselves.

use super::{ReportConfig, ReportError, ReportFormat, ReportGenerator};
use crate::compare::{BatchResult, ComparisonResult};
use crate::model::Instance;
use std::fmt::Write as _;

/// Text reporter writing one indented line per difference
#[derive(Debug, Clone, Copy, Default)]
pub struct TextReporter;

impl TextReporter {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn write_result(
        out: &mut String,
        result: &ComparisonResult,
        indent: &str,
        config: &ReportConfig,
    ) -> Result<(), ReportError> {
        let lines = result.report_lines();
        let shown = config.limit(lines.len());
        for line in &lines[..shown] {
            writeln!(out, "{indent}{line}")?;
        }
        if shown < lines.len() {
            writeln!(out, "{indent}... {} more", lines.len() - shown)?;
        }

        if config.include_warnings {
            for warning in &result.warnings {
                writeln!(
                    out,
                    "{indent}warning: {} at {}: {}",
                    warning.instance, warning.path, warning.message
                )?;
            }
            for note in &result.asymmetric_empty {
                writeln!(
                    out,
                    "{indent}note: \"{}\" has {} value(s) left, {} right; not counted",
                    note.path, note.left_count, note.right_count
                )?;
            }
        }
        Ok(())
    }
}

impl ReportGenerator for TextReporter {
    fn generate_pair_report(
        &self,
        result: &ComparisonResult,
        _left: &Instance,
        _right: &Instance,
        config: &ReportConfig,
    ) -> Result<String, ReportError> {
        let mut out = String::new();
        if let Some(title) = &config.title {
            writeln!(out, "{title}")?;
        }
        Self::write_result(&mut out, result, "", config)?;
        Ok(out)
    }

    fn generate_batch_report(
        &self,
        batch: &BatchResult,
        config: &ReportConfig,
    ) -> Result<String, ReportError> {
        let mut out = String::new();
        if let Some(title) = &config.title {
            writeln!(out, "{title}")?;
        }
        for pair in &batch.pairs {
            let count = pair.result.difference_count();
            if count == 0 && !config.include_identical {
                continue;
            }
            writeln!(out, "{} ({count} differences)", pair.label)?;
            Self::write_result(&mut out, &pair.result, "  ", config)?;
        }
        for id in &batch.missing_in_right {
            writeln!(out, "[{}:{id}] missing from right", batch.class)?;
        }
        for id in &batch.missing_in_left {
            writeln!(out, "[{}:{id}] missing from left", batch.class)?;
        }
        Ok(out)
    }

    fn format(&self) -> ReportFormat {
        ReportFormat::Text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reports::fixtures;

    #[test]
    fn test_pair_report_lines() {
        let (left, right) = fixtures::instances();
        let report = TextReporter::new()
            .generate_pair_report(&fixtures::result(), &left, &right, &ReportConfig::default())
            .unwrap();
        let lines: Vec<&str> = report.lines().collect();
        assert!(lines[0].starts_with("Mismatch on attribute \"name\""));
        assert!(lines[1].starts_with("  Count mismatch"));
        assert!(lines[2].starts_with("warning:"));
    }

    #[test]
    fn test_max_items_truncates() {
        let (left, right) = fixtures::instances();
        let config = ReportConfig {
            max_items: Some(1),
            include_warnings: false,
            ..ReportConfig::default()
        };
        let report = TextReporter::new()
            .generate_pair_report(&fixtures::result(), &left, &right, &config)
            .unwrap();
        assert_eq!(report.lines().count(), 2);
        assert!(report.contains("... 1 more"));
    }

    #[test]
    fn test_batch_report_skips_identical_pairs() {
        let report = TextReporter::new()
            .generate_batch_report(&fixtures::batch(), &ReportConfig::default())
            .unwrap();
        assert!(report.contains("\"root\" [Widget:1] (2 differences)"));
        assert!(!report.contains("[Widget:2] (0 differences)"));
        assert!(report.contains("[Widget:7] missing from right"));
    }
}
