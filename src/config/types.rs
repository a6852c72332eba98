//! Configuration types for instance-diff operations.
//!
//! Provides structured configuration for single-pair and whole-class
//! comparisons.

use crate::compare::{
    AttributeNameFilter, ClassFilter, ComparisonOptions, AUDIT_CLASS, DEFAULT_EXCLUDED_ATTRIBUTES,
    DEFAULT_MAX_DEPTH,
};
use crate::reports::{ReportConfig, ReportFormat};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

// ============================================================================
// Unified Application Configuration
// ============================================================================

/// Unified application configuration that can be loaded from CLI args or config files.
///
/// CLI arguments are layered over file settings with [`AppConfig::merge`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AppConfig {
    /// What is compared and how deep
    pub comparison: ComparisonConfig,
    /// Output configuration (format, file, colors)
    pub output: OutputConfig,
    /// Behavior flags
    pub behavior: BehaviorConfig,
    /// Whole-class comparison settings
    pub batch: BatchConfig,
}

impl AppConfig {
    /// Create a new `AppConfig` with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an `AppConfig` builder.
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }

    /// Report settings derived from the output section
    #[must_use]
    pub fn report_config(&self) -> ReportConfig {
        ReportConfig {
            max_items: self.output.max_items,
            include_warnings: self.output.include_warnings,
            include_identical: self.batch.include_identical,
            ..ReportConfig::default()
        }
    }
}

// ============================================================================
// Builder for AppConfig
// ============================================================================

/// Builder for constructing `AppConfig` with fluent API.
#[derive(Debug, Default)]
#[must_use]
pub struct AppConfigBuilder {
    config: AppConfig,
}

impl AppConfigBuilder {
    /// Set the recursion bound.
    pub const fn max_depth(mut self, depth: usize) -> Self {
        self.config.comparison.max_depth = depth;
        self
    }

    /// Restrict comparison to these attributes.
    pub fn only_attributes<S: Into<String>>(mut self, names: impl IntoIterator<Item = S>) -> Self {
        self.config.comparison.only_attributes = Some(names.into_iter().map(Into::into).collect());
        self
    }

    /// Exclude one more attribute.
    pub fn exclude_attribute(mut self, name: impl Into<String>) -> Self {
        self.config.comparison.excluded_attributes.push(name.into());
        self
    }

    /// Exclude an attribute on one class and its subclasses.
    pub fn exclude_on_class(
        mut self,
        class: impl Into<String>,
        attribute: impl Into<String>,
    ) -> Self {
        self.config.comparison.class_exclusions.push(ClassAttribute {
            class: class.into(),
            attribute: attribute.into(),
        });
        self
    }

    /// Compare referrer counts of the root pair.
    pub const fn check_referrers(mut self, enabled: bool) -> Self {
        self.config.comparison.check_referrers = enabled;
        self
    }

    /// Set the output format.
    pub const fn output_format(mut self, format: ReportFormat) -> Self {
        self.config.output.format = format;
        self
    }

    /// Set the output file.
    pub fn output_file(mut self, file: Option<PathBuf>) -> Self {
        self.config.output.file = file;
        self
    }

    /// Disable colored output.
    pub const fn no_color(mut self, no_color: bool) -> Self {
        self.config.output.no_color = no_color;
        self
    }

    /// Exit non-zero when differences are found.
    pub const fn fail_on_diff(mut self, fail: bool) -> Self {
        self.config.behavior.fail_on_diff = fail;
        self
    }

    /// Enable quiet mode.
    pub const fn quiet(mut self, quiet: bool) -> Self {
        self.config.behavior.quiet = quiet;
        self
    }

    /// Compare batch roots in parallel.
    pub const fn parallel(mut self, parallel: bool) -> Self {
        self.config.batch.parallel = parallel;
        self
    }

    /// Build the configuration.
    pub fn build(self) -> AppConfig {
        self.config
    }
}

// ============================================================================
// Comparison Configuration
// ============================================================================

/// An attribute excluded on one class (and its subclasses)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ClassAttribute {
    pub class: String,
    pub attribute: String,
}

/// Comparison settings: depth bound, skipped classes and attribute filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ComparisonConfig {
    /// Maximum reference hops followed from the root pair
    pub max_depth: usize,
    /// Classes never compared (subclasses included)
    pub skipped_classes: Vec<String>,
    /// Attributes never compared
    pub excluded_attributes: Vec<String>,
    /// When set, only these attributes are compared
    #[serde(skip_serializing_if = "Option::is_none")]
    pub only_attributes: Option<Vec<String>>,
    /// Attributes excluded on specific classes
    pub class_exclusions: Vec<ClassAttribute>,
    /// Regexes; matching attribute names are never compared
    pub exclude_patterns: Vec<String>,
    /// Compare referrer counts of the root pair
    pub check_referrers: bool,
}

impl Default for ComparisonConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            skipped_classes: vec![AUDIT_CLASS.to_string()],
            excluded_attributes: DEFAULT_EXCLUDED_ATTRIBUTES
                .iter()
                .map(ToString::to_string)
                .collect(),
            only_attributes: None,
            class_exclusions: Vec::new(),
            exclude_patterns: Vec::new(),
            check_referrers: false,
        }
    }
}

impl ComparisonConfig {
    /// Comparator options for these settings
    #[must_use]
    pub fn to_options(&self) -> ComparisonOptions {
        ComparisonOptions {
            max_depth: self.max_depth,
            skipped_classes: self.skipped_classes.clone(),
            check_referrers: self.check_referrers,
        }
    }

    /// Attribute filter for these settings.
    ///
    /// Fails on the first invalid exclusion pattern.
    pub fn to_filter(&self) -> Result<AttributeNameFilter, regex::Error> {
        let mut filter =
            AttributeNameFilter::new().exclude_all(self.excluded_attributes.iter().cloned());
        if let Some(only) = &self.only_attributes {
            filter = filter.only(only.iter().cloned());
        }
        for exclusion in &self.class_exclusions {
            filter = filter.exclude_on_class(&exclusion.class, &exclusion.attribute);
        }
        for pattern in &self.exclude_patterns {
            filter = filter.exclude_matching(pattern)?;
        }
        Ok(filter)
    }
}

// ============================================================================
// Output Configuration
// ============================================================================

/// Output-related configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct OutputConfig {
    /// Output format
    pub format: ReportFormat,
    /// Output file path (None for stdout)
    pub file: Option<PathBuf>,
    /// Disable colored output
    pub no_color: bool,
    /// Maximum difference lines shown per pair
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_items: Option<usize>,
    /// Show unreadable attributes and one-sided empty values
    pub include_warnings: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: ReportFormat::Auto,
            file: None,
            no_color: false,
            max_items: None,
            include_warnings: true,
        }
    }
}

// ============================================================================
// Behavior Configuration
// ============================================================================

/// Behavior flags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct BehaviorConfig {
    /// Exit with code 1 if any difference is found
    pub fail_on_diff: bool,
    /// Suppress non-essential output
    pub quiet: bool,
}

// ============================================================================
// Batch Configuration
// ============================================================================

/// Whole-class comparison settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct BatchConfig {
    /// Compare root pairs on a thread pool
    pub parallel: bool,
    /// Only roots of these classes (is-a aware); empty means all
    pub include_classes: Vec<String>,
    /// Never roots of these classes (is-a aware)
    pub exclude_classes: Vec<String>,
    /// List identical pairs in batch reports
    pub include_identical: bool,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            parallel: true,
            include_classes: Vec::new(),
            exclude_classes: Vec::new(),
            include_identical: false,
        }
    }
}

impl BatchConfig {
    /// Root class filter for these settings
    #[must_use]
    pub fn to_class_filter(&self) -> ClassFilter {
        let filter = self
            .include_classes
            .iter()
            .fold(ClassFilter::all(), |f, c| f.include(c));
        self.exclude_classes.iter().fold(filter, |f, c| f.exclude(c))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compare::AttributeFilter;
    use crate::model::{AttributeDescriptor, Multiplicity, ScalarKind, Schema, SchemaClass};

    #[test]
    fn test_defaults_match_comparator_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.comparison.to_options(), ComparisonOptions::default());
        assert!(config.batch.parallel);
        assert_eq!(config.output.format, ReportFormat::Auto);
    }

    #[test]
    fn test_builder() {
        let config = AppConfig::builder()
            .max_depth(2)
            .only_attributes(["name", "identifier"])
            .exclude_on_class("Complex", "hasComponent")
            .fail_on_diff(true)
            .build();
        assert_eq!(config.comparison.max_depth, 2);
        assert_eq!(config.comparison.class_exclusions.len(), 1);
        assert!(config.behavior.fail_on_diff);
    }

    #[test]
    fn test_to_filter() {
        let schema = Schema::build([SchemaClass::new("Complex")]).unwrap();
        let attr = |name: &str| {
            AttributeDescriptor::scalar("Complex", name, ScalarKind::Text, Multiplicity::Single)
        };

        let mut config = ComparisonConfig::default();
        config.exclude_patterns.push("^_".into());
        let filter = config.to_filter().unwrap();
        assert!(!filter.includes(&schema, "Complex", &attr("modified")));
        assert!(!filter.includes(&schema, "Complex", &attr("_timestamp")));
        assert!(filter.includes(&schema, "Complex", &attr("name")));

        config.exclude_patterns.push("[".into());
        assert!(config.to_filter().is_err());
    }

    #[test]
    fn test_class_filter_from_batch_config() {
        let schema = Schema::build([
            SchemaClass::new("Event"),
            SchemaClass::new("Reaction").extends("Event"),
        ])
        .unwrap();
        let batch = BatchConfig {
            exclude_classes: vec!["Reaction".into()],
            ..BatchConfig::default()
        };
        let filter = batch.to_class_filter();
        assert!(filter.accepts(&schema, "Event"));
        assert!(!filter.accepts(&schema, "Reaction"));
    }

    #[test]
    fn test_yaml_roundtrip_keeps_defaults() {
        let yaml = "comparison:\n  max_depth: 3\n";
        let config: AppConfig = serde_yaml_ng::from_str(yaml).unwrap();
        assert_eq!(config.comparison.max_depth, 3);
        assert_eq!(config.comparison.skipped_classes, vec!["InstanceEdit".to_string()]);
        assert!(config.output.include_warnings);
    }
}
