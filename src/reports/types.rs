//! Report type definitions.

use clap::ValueEnum;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Output format for reports
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// Auto-detect: text if TTY, summary otherwise
    #[default]
    Auto,
    /// Indented difference lines
    Text,
    /// Brief summary output
    Summary,
    /// Structured JSON output
    Json,
}

impl std::fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Auto => write!(f, "auto"),
            Self::Text => write!(f, "text"),
            Self::Summary => write!(f, "summary"),
            Self::Json => write!(f, "json"),
        }
    }
}

/// Configuration for report generation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Title for the report
    pub title: Option<String>,
    /// Maximum difference lines per pair
    pub max_items: Option<usize>,
    /// Include attribute access warnings and asymmetric-empty notes
    pub include_warnings: bool,
    /// Include pairs without differences in batch reports
    pub include_identical: bool,
    /// Additional metadata to include
    pub metadata: ReportMetadata,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            title: None,
            max_items: None,
            include_warnings: true,
            include_identical: false,
            metadata: ReportMetadata::new(),
        }
    }
}

impl ReportConfig {
    /// Lines to show out of `total`, honoring `max_items`
    #[must_use]
    pub fn limit(&self, total: usize) -> usize {
        self.max_items.map_or(total, |max| total.min(max))
    }
}

/// Metadata included in reports
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// Left snapshot file path
    pub left_path: Option<String>,
    /// Right snapshot file path
    pub right_path: Option<String>,
    /// Content fingerprint of the left snapshot
    pub left_fingerprint: Option<String>,
    /// Content fingerprint of the right snapshot
    pub right_fingerprint: Option<String>,
    /// Tool version
    pub tool_version: String,
    /// Custom properties
    pub custom: std::collections::HashMap<String, String>,
}

impl ReportMetadata {
    pub fn new() -> Self {
        Self {
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
            ..Default::default()
        }
    }
}
