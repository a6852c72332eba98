//! Configuration types for the comparator.

use crate::model::Schema;

/// Default recursion bound
pub const DEFAULT_MAX_DEPTH: usize = 5;

/// Class of audit/provenance instances, never compared
pub const AUDIT_CLASS: &str = "InstanceEdit";

/// Options controlling one comparison run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComparisonOptions {
    /// Maximum reference hops followed from the root pair
    pub max_depth: usize,
    /// Classes whose instances contribute no differences (subclasses included)
    pub skipped_classes: Vec<String>,
    /// Also compare the referrer counts of the root pair
    pub check_referrers: bool,
}

impl Default for ComparisonOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            skipped_classes: vec![AUDIT_CLASS.to_string()],
            check_referrers: false,
        }
    }
}

impl ComparisonOptions {
    /// Default options with a custom depth bound
    #[must_use]
    pub fn with_max_depth(max_depth: usize) -> Self {
        Self {
            max_depth,
            ..Self::default()
        }
    }

    /// Compare only the root pair's own scalar attributes
    #[must_use]
    pub fn shallow() -> Self {
        Self::with_max_depth(0)
    }

    #[must_use]
    pub fn skip_class(mut self, class: impl Into<String>) -> Self {
        let class = class.into();
        if !self.skipped_classes.contains(&class) {
            self.skipped_classes.push(class);
        }
        self
    }

    #[must_use]
    pub const fn check_referrers(mut self, enabled: bool) -> Self {
        self.check_referrers = enabled;
        self
    }

    /// Whether instances of `class` are skipped
    #[must_use]
    pub fn is_skipped(&self, schema: &Schema, class: &str) -> bool {
        self.skipped_classes
            .iter()
            .any(|skipped| schema.is_a(class, skipped))
    }
}
