//! Configuration validation for instance-diff.
//!
//! Provides validation traits and implementations for all configuration types.

use super::defaults::MAX_ALLOWED_DEPTH;
use super::types::{AppConfig, BatchConfig, ComparisonConfig, OutputConfig};

// ============================================================================
// Configuration Error
// ============================================================================

/// Error type for configuration validation.
#[derive(Debug, Clone)]
pub struct ConfigError {
    /// The field that failed validation
    pub field: String,
    /// Description of the validation error
    pub message: String,
}

impl ConfigError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Validation Trait
// ============================================================================

/// Trait for validatable configuration types.
pub trait Validatable {
    /// Validate the configuration, returning any errors found.
    fn validate(&self) -> Vec<ConfigError>;

    /// Check if the configuration is valid.
    fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }
}

// ============================================================================
// Validation Implementations
// ============================================================================

impl Validatable for AppConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        errors.extend(self.comparison.validate());
        errors.extend(self.output.validate());
        errors.extend(self.batch.validate());
        errors
    }
}

impl Validatable for ComparisonConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if self.max_depth > MAX_ALLOWED_DEPTH {
            errors.push(ConfigError::new(
                "comparison.max_depth",
                format!(
                    "Depth must be at most {MAX_ALLOWED_DEPTH}, got {}",
                    self.max_depth
                ),
            ));
        }

        if self.skipped_classes.iter().any(|c| c.trim().is_empty()) {
            errors.push(ConfigError::new(
                "comparison.skipped_classes",
                "Class names must not be empty",
            ));
        }

        if self.excluded_attributes.iter().any(|a| a.trim().is_empty()) {
            errors.push(ConfigError::new(
                "comparison.excluded_attributes",
                "Attribute names must not be empty",
            ));
        }

        if let Some(only) = &self.only_attributes
            && only.is_empty()
        {
            errors.push(ConfigError::new(
                "comparison.only_attributes",
                "An empty attribute list compares nothing; omit it to compare all attributes",
            ));
        }

        for (i, exclusion) in self.class_exclusions.iter().enumerate() {
            if exclusion.class.trim().is_empty() || exclusion.attribute.trim().is_empty() {
                errors.push(ConfigError::new(
                    format!("comparison.class_exclusions[{i}]"),
                    "Both class and attribute are required",
                ));
            }
        }

        for (i, pattern) in self.exclude_patterns.iter().enumerate() {
            if let Err(e) = regex::Regex::new(pattern) {
                errors.push(ConfigError::new(
                    format!("comparison.exclude_patterns[{i}]"),
                    format!("Invalid regex '{pattern}': {e}"),
                ));
            }
        }

        errors
    }
}

impl Validatable for OutputConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if let Some(file_path) = &self.file
            && let Some(parent) = file_path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            errors.push(ConfigError::new(
                "output.file",
                format!("Parent directory does not exist: {}", parent.display()),
            ));
        }

        if self.max_items == Some(0) {
            errors.push(ConfigError::new(
                "output.max_items",
                "Must be at least 1; omit it to show every line",
            ));
        }

        errors
    }
}

impl Validatable for BatchConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        if self
            .include_classes
            .iter()
            .chain(&self.exclude_classes)
            .any(|c| c.trim().is_empty())
        {
            errors.push(ConfigError::new("batch", "Class names must not be empty"));
        }
        errors
    }
}
