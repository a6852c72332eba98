//! JSON report generator.

use super::{ReportConfig, ReportError, ReportFormat, ReportGenerator};
use crate::compare::{AccessWarning, AsymmetricEmpty, BatchResult, ComparisonResult, Difference};
use crate::model::{DbId, Instance};
use chrono::Utc;
use serde::Serialize;

/// JSON report generator
pub struct JsonReporter {
    /// Pretty print output
    pretty: bool,
}

impl JsonReporter {
    /// Create a new JSON reporter
    #[must_use]
    pub const fn new() -> Self {
        Self { pretty: true }
    }

    /// Set pretty printing
    #[must_use]
    pub const fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    fn render<T: Serialize>(&self, value: &T) -> Result<String, ReportError> {
        let rendered = if self.pretty {
            serde_json::to_string_pretty(value)
        } else {
            serde_json::to_string(value)
        };
        rendered.map_err(|e| ReportError::SerializationError(e.to_string()))
    }
}

impl Default for JsonReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportGenerator for JsonReporter {
    fn generate_pair_report(
        &self,
        result: &ComparisonResult,
        left: &Instance,
        right: &Instance,
        config: &ReportConfig,
    ) -> Result<String, ReportError> {
        let shown = config.limit(result.differences.len());
        let report = JsonPairReport {
            metadata: JsonReportMetadata::from_config(config),
            left: InstanceInfo::from(left),
            right: InstanceInfo::from(right),
            summary: PairSummary::from(result),
            differences: &result.differences[..shown],
            warnings: config.include_warnings.then_some(result.warnings.as_slice()),
            asymmetric_empty: config
                .include_warnings
                .then_some(result.asymmetric_empty.as_slice()),
        };
        self.render(&report)
    }

    fn generate_batch_report(
        &self,
        batch: &BatchResult,
        config: &ReportConfig,
    ) -> Result<String, ReportError> {
        let pairs = batch
            .pairs
            .iter()
            .filter(|p| config.include_identical || !p.result.is_identical())
            .map(|p| {
                let shown = config.limit(p.result.differences.len());
                JsonBatchPair {
                    db_id: p.db_id,
                    label: &p.label,
                    summary: PairSummary::from(&p.result),
                    differences: &p.result.differences[..shown],
                }
            })
            .collect();

        let report = JsonBatchReport {
            metadata: JsonReportMetadata::from_config(config),
            summary: BatchSummary {
                class: &batch.class,
                pairs_compared: batch.pairs.len(),
                pairs_with_differences: batch.pairs_with_differences().count(),
                total_differences: batch.total_differences(),
            },
            missing_in_right: &batch.missing_in_right,
            missing_in_left: &batch.missing_in_left,
            pairs,
        };
        self.render(&report)
    }

    fn format(&self) -> ReportFormat {
        ReportFormat::Json
    }
}

// JSON structure types

#[derive(Serialize)]
struct JsonPairReport<'a> {
    metadata: JsonReportMetadata,
    left: InstanceInfo<'a>,
    right: InstanceInfo<'a>,
    summary: PairSummary,
    differences: &'a [Difference],
    #[serde(skip_serializing_if = "Option::is_none")]
    warnings: Option<&'a [AccessWarning]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    asymmetric_empty: Option<&'a [AsymmetricEmpty]>,
}

#[derive(Serialize)]
struct JsonBatchReport<'a> {
    metadata: JsonReportMetadata,
    summary: BatchSummary<'a>,
    missing_in_right: &'a [DbId],
    missing_in_left: &'a [DbId],
    pairs: Vec<JsonBatchPair<'a>>,
}

#[derive(Serialize)]
struct JsonReportMetadata {
    tool: ToolInfo,
    generated_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<String>,
    left: SnapshotInfo,
    right: SnapshotInfo,
}

impl JsonReportMetadata {
    fn from_config(config: &ReportConfig) -> Self {
        Self {
            tool: ToolInfo {
                name: "instance-diff".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            generated_at: Utc::now().to_rfc3339(),
            title: config.title.clone(),
            left: SnapshotInfo {
                file_path: config.metadata.left_path.clone(),
                fingerprint: config.metadata.left_fingerprint.clone(),
            },
            right: SnapshotInfo {
                file_path: config.metadata.right_path.clone(),
                fingerprint: config.metadata.right_fingerprint.clone(),
            },
        }
    }
}

#[derive(Serialize)]
struct ToolInfo {
    name: String,
    version: String,
}

#[derive(Serialize)]
struct SnapshotInfo {
    file_path: Option<String>,
    fingerprint: Option<String>,
}

#[derive(Serialize)]
struct InstanceInfo<'a> {
    db_id: DbId,
    class: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    display_name: Option<&'a str>,
}

impl<'a> From<&'a Instance> for InstanceInfo<'a> {
    fn from(instance: &'a Instance) -> Self {
        Self {
            db_id: instance.db_id,
            class: &instance.schema_class,
            display_name: instance.display_name.as_deref(),
        }
    }
}

#[derive(Serialize)]
struct PairSummary {
    differences: usize,
    identical: bool,
    pairs_compared: usize,
    max_depth_reached: usize,
    warnings: usize,
}

impl From<&ComparisonResult> for PairSummary {
    fn from(result: &ComparisonResult) -> Self {
        Self {
            differences: result.difference_count(),
            identical: result.is_identical(),
            pairs_compared: result.pairs_compared,
            max_depth_reached: result.max_depth_reached,
            warnings: result.warnings.len(),
        }
    }
}

#[derive(Serialize)]
struct BatchSummary<'a> {
    class: &'a str,
    pairs_compared: usize,
    pairs_with_differences: usize,
    total_differences: usize,
}

#[derive(Serialize)]
struct JsonBatchPair<'a> {
    db_id: DbId,
    label: &'a str,
    summary: PairSummary,
    differences: &'a [Difference],
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reports::fixtures;

    #[test]
    fn test_pair_report_structure() {
        let (left, right) = fixtures::instances();
        let mut config = ReportConfig::default();
        config.metadata.left_path = Some("left.json".into());
        let report = JsonReporter::new()
            .generate_pair_report(&fixtures::result(), &left, &right, &config)
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&report).unwrap();

        assert_eq!(value["metadata"]["tool"]["name"], "instance-diff");
        assert_eq!(value["metadata"]["left"]["file_path"], "left.json");
        assert_eq!(value["summary"]["differences"], 2);
        assert_eq!(value["differences"][0]["kind"]["type"], "value_mismatch");
        assert_eq!(value["left"]["display_name"], "root");
        assert_eq!(value["warnings"].as_array().map(Vec::len), Some(1));
    }

    #[test]
    fn test_warnings_omitted_when_disabled() {
        let (left, right) = fixtures::instances();
        let config = ReportConfig {
            include_warnings: false,
            ..ReportConfig::default()
        };
        let report = JsonReporter::new()
            .pretty(false)
            .generate_pair_report(&fixtures::result(), &left, &right, &config)
            .unwrap();
        assert!(!report.contains("\"warnings\":["));
        assert!(!report.contains('\n'));
    }

    #[test]
    fn test_batch_report() {
        let report = JsonReporter::new()
            .generate_batch_report(&fixtures::batch(), &ReportConfig::default())
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&report).unwrap();
        assert_eq!(value["summary"]["pairs_compared"], 2);
        assert_eq!(value["summary"]["pairs_with_differences"], 1);
        assert_eq!(value["missing_in_right"][0], 7);
        assert_eq!(value["pairs"].as_array().map(Vec::len), Some(1));
    }
}
