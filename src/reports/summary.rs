//! Summary report generator for shell output.
//!
//! Provides a compact, human-readable summary for terminal usage.

use super::{ReportConfig, ReportError, ReportFormat, ReportGenerator};
use crate::compare::{BatchResult, ComparisonResult, DifferenceKind};
use crate::model::Instance;

/// Apply ANSI color formatting if colored output is enabled.
fn ansi_color(text: &str, color: &str, colored: bool) -> String {
    if colored {
        match color {
            "red" => format!("\x1b[31m{text}\x1b[0m"),
            "green" => format!("\x1b[32m{text}\x1b[0m"),
            "yellow" => format!("\x1b[33m{text}\x1b[0m"),
            "cyan" => format!("\x1b[36m{text}\x1b[0m"),
            "bold" => format!("\x1b[1m{text}\x1b[0m"),
            "dim" => format!("\x1b[2m{text}\x1b[0m"),
            _ => text.to_string(),
        }
    } else {
        text.to_string()
    }
}

const fn plural(n: usize, one: &'static str, many: &'static str) -> &'static str {
    if n == 1 { one } else { many }
}

/// Difference counts by kind
#[derive(Debug, Default)]
struct KindCounts {
    class: usize,
    count: usize,
    value: usize,
    referrer: usize,
}

impl KindCounts {
    fn of(result: &ComparisonResult) -> Self {
        let mut counts = Self::default();
        for d in &result.differences {
            match d.kind {
                DifferenceKind::ClassMismatch { .. } => counts.class += 1,
                DifferenceKind::CountMismatch { .. } => counts.count += 1,
                DifferenceKind::ValueMismatch { .. } => counts.value += 1,
                DifferenceKind::ReferrerCountMismatch { .. } => counts.referrer += 1,
            }
        }
        counts
    }
}

/// Summary reporter for shell output
pub struct SummaryReporter {
    /// Use colored output
    colored: bool,
}

impl SummaryReporter {
    /// Create a new summary reporter
    #[must_use]
    pub const fn new() -> Self {
        Self { colored: true }
    }

    /// Disable colored output
    #[must_use]
    pub const fn no_color(mut self) -> Self {
        self.colored = false;
        self
    }

    fn color(&self, text: &str, color: &str) -> String {
        ansi_color(text, color, self.colored)
    }

    fn push_kinds(&self, lines: &mut Vec<String>, result: &ComparisonResult) {
        let counts = KindCounts::of(result);
        for (n, what) in [
            (counts.class, "class mismatch"),
            (counts.count, "count mismatch"),
            (counts.value, "value mismatch"),
            (counts.referrer, "referrer mismatch"),
        ] {
            if n > 0 {
                lines.push(format!("  {} {what}", self.color(&format!("~{n}"), "yellow")));
            }
        }
    }
}

impl Default for SummaryReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportGenerator for SummaryReporter {
    fn generate_pair_report(
        &self,
        result: &ComparisonResult,
        left: &Instance,
        right: &Instance,
        config: &ReportConfig,
    ) -> Result<String, ReportError> {
        let mut lines = Vec::new();

        let title = config.title.as_deref().unwrap_or("Instance Comparison Summary");
        lines.push(self.color(title, "bold"));
        lines.push(self.color("─".repeat(40).as_str(), "dim"));
        lines.push(format!(
            "{}  {} ↔ {}",
            self.color("Roots:", "cyan"),
            left.label(),
            right.label()
        ));
        lines.push(format!(
            "{}  {} {} compared, depth {}",
            self.color("Visited:", "cyan"),
            result.pairs_compared,
            plural(result.pairs_compared, "pair", "pairs"),
            result.max_depth_reached
        ));
        lines.push(String::new());

        let total = result.difference_count();
        if total == 0 {
            lines.push(self.color("Identical", "green"));
        } else {
            lines.push(format!(
                "{} {}",
                self.color(&total.to_string(), "red"),
                plural(total, "difference", "differences")
            ));
            self.push_kinds(&mut lines, result);
        }

        if config.include_warnings && !result.warnings.is_empty() {
            lines.push(self.color(
                &format!(
                    "{} unreadable {}",
                    result.warnings.len(),
                    plural(result.warnings.len(), "value", "values")
                ),
                "dim",
            ));
        }

        Ok(lines.join("\n") + "\n")
    }

    fn generate_batch_report(
        &self,
        batch: &BatchResult,
        config: &ReportConfig,
    ) -> Result<String, ReportError> {
        let mut lines = Vec::new();

        let title = config.title.as_deref().unwrap_or("Class Comparison Summary");
        lines.push(self.color(title, "bold"));
        lines.push(self.color("─".repeat(40).as_str(), "dim"));
        lines.push(format!("{}  {}", self.color("Class:", "cyan"), batch.class));
        lines.push(format!(
            "{}  {} {} compared",
            self.color("Roots:", "cyan"),
            batch.pairs.len(),
            plural(batch.pairs.len(), "pair", "pairs")
        ));
        lines.push(String::new());

        let differing = batch.pairs_with_differences().count();
        let total = batch.total_differences();
        if differing == 0 {
            lines.push(self.color("All pairs identical", "green"));
        } else {
            lines.push(format!(
                "{} {} with {} {}",
                self.color(&differing.to_string(), "red"),
                plural(differing, "pair", "pairs"),
                total,
                plural(total, "difference", "differences")
            ));
        }
        if !batch.missing_in_right.is_empty() {
            lines.push(format!(
                "  {} missing from right",
                self.color(&format!("-{}", batch.missing_in_right.len()), "red")
            ));
        }
        if !batch.missing_in_left.is_empty() {
            lines.push(format!(
                "  {} missing from left",
                self.color(&format!("+{}", batch.missing_in_left.len()), "green")
            ));
        }

        Ok(lines.join("\n") + "\n")
    }

    fn format(&self) -> ReportFormat {
        ReportFormat::Summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reports::fixtures;

    #[test]
    fn test_pair_summary_counts_kinds() {
        let (left, right) = fixtures::instances();
        let report = SummaryReporter::new()
            .no_color()
            .generate_pair_report(&fixtures::result(), &left, &right, &ReportConfig::default())
            .unwrap();
        assert!(report.contains("2 differences"));
        assert!(report.contains("~1 count mismatch"));
        assert!(report.contains("~1 value mismatch"));
        assert!(report.contains("1 unreadable value"));
        assert!(!report.contains("\x1b["));
    }

    #[test]
    fn test_identical_pair() {
        let (left, right) = fixtures::instances();
        let report = SummaryReporter::new()
            .no_color()
            .generate_pair_report(&ComparisonResult::new(), &left, &right, &ReportConfig::default())
            .unwrap();
        assert!(report.contains("Identical"));
    }

    #[test]
    fn test_batch_summary() {
        let report = SummaryReporter::new()
            .generate_batch_report(&fixtures::batch(), &ReportConfig::default())
            .unwrap();
        assert!(report.contains("\x1b[31m1\x1b[0m pair with 2 differences"));
        assert!(report.contains("missing from right"));
    }
}
