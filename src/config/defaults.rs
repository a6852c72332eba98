//! Default configurations and presets for instance-diff.
//!
//! Provides named presets for common comparison jobs.

use super::types::{AppConfig, BehaviorConfig, ComparisonConfig};
use crate::compare::AUDIT_CLASS;

/// Upper bound accepted for `comparison.max_depth`
pub const MAX_ALLOWED_DEPTH: usize = 64;

// ============================================================================
// Configuration Presets
// ============================================================================

/// Named configuration presets for common use cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigPreset {
    /// Default settings: depth 5, volatile attributes and audit records ignored
    Default,
    /// Strict: deep traversal, only the identifier ignored, referrers checked
    Strict,
    /// Shallow: root pair only, no references followed
    Shallow,
    /// Audit: provenance records compared too
    Audit,
}

impl ConfigPreset {
    /// Get the preset name as a string.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Strict => "strict",
            Self::Shallow => "shallow",
            Self::Audit => "audit",
        }
    }

    /// Parse a preset from a string name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "default" | "balanced" => Some(Self::Default),
            "strict" | "deep" => Some(Self::Strict),
            "shallow" | "root" => Some(Self::Shallow),
            "audit" | "provenance" => Some(Self::Audit),
            _ => None,
        }
    }

    /// Get a description of this preset.
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::Default => "Depth 5, volatile attributes and InstanceEdit records ignored",
            Self::Strict => "Depth 10, only DB_ID ignored, referrer counts compared",
            Self::Shallow => "Root pair attributes only, references never followed",
            Self::Audit => "Compares InstanceEdit provenance records as ordinary instances",
        }
    }

    /// Get all available presets.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Default, Self::Strict, Self::Shallow, Self::Audit]
    }
}

impl std::fmt::Display for ConfigPreset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

// ============================================================================
// Preset Implementations
// ============================================================================

impl AppConfig {
    /// Create an `AppConfig` from a named preset.
    #[must_use]
    pub fn from_preset(preset: ConfigPreset) -> Self {
        match preset {
            ConfigPreset::Default => Self::default(),
            ConfigPreset::Strict => Self::strict_preset(),
            ConfigPreset::Shallow => Self::shallow_preset(),
            ConfigPreset::Audit => Self::audit_preset(),
        }
    }

    /// Strict preset.
    ///
    /// - Follows references ten levels deep
    /// - Only the identifier is ignored
    /// - Referrer counts of the roots are compared
    /// - Fails on any difference
    #[must_use]
    pub fn strict_preset() -> Self {
        Self {
            comparison: ComparisonConfig {
                max_depth: 10,
                skipped_classes: vec![AUDIT_CLASS.to_string()],
                excluded_attributes: vec!["DB_ID".to_string()],
                check_referrers: true,
                ..ComparisonConfig::default()
            },
            behavior: BehaviorConfig {
                fail_on_diff: true,
                quiet: false,
            },
            ..Self::default()
        }
    }

    /// Shallow preset: only the root pair's own values.
    #[must_use]
    pub fn shallow_preset() -> Self {
        Self {
            comparison: ComparisonConfig {
                max_depth: 0,
                ..ComparisonConfig::default()
            },
            ..Self::default()
        }
    }

    /// Audit preset: provenance records are compared like any other instance.
    #[must_use]
    pub fn audit_preset() -> Self {
        Self {
            comparison: ComparisonConfig {
                max_depth: 2,
                skipped_classes: Vec::new(),
                excluded_attributes: vec!["DB_ID".to_string()],
                ..ComparisonConfig::default()
            },
            ..Self::default()
        }
    }
}
