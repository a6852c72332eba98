//! Comparison result structures.

use serde::{Deserialize, Serialize};

/// What kind of mismatch was found
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DifferenceKind {
    /// The two instances have different schema classes
    ClassMismatch {
        left_class: String,
        right_class: String,
    },
    /// A multi-valued attribute holds a different number of elements
    CountMismatch {
        attribute: String,
        left_count: usize,
        right_count: usize,
    },
    /// Two scalar values at the same position differ
    ValueMismatch {
        attribute: String,
        left: String,
        right: String,
    },
    /// Different number of referrers through the same referring attribute
    ReferrerCountMismatch {
        referrer: String,
        left_count: usize,
        right_count: usize,
    },
}

/// A single mismatch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Difference {
    /// Reference hops from the comparison root
    pub depth: usize,
    /// Attribute path from the root, e.g. `hasEvent[0].name`
    pub path: String,
    /// Label of the left instance
    pub left: String,
    /// Label of the right instance
    pub right: String,
    pub kind: DifferenceKind,
}

impl Difference {
    /// Human-readable description, without indentation
    #[must_use]
    pub fn describe(&self) -> String {
        let line = match &self.kind {
            DifferenceKind::ClassMismatch {
                left_class,
                right_class,
            } => format!(
                "Schema classes don't match, so instances can't be compared! \
                 Instance 1 {} is a {left_class}; Instance 2 {} is a {right_class}",
                self.left, self.right
            ),
            DifferenceKind::CountMismatch {
                attribute,
                left_count,
                right_count,
            } => format!(
                "Count mismatch for multi-valued attribute \"{attribute}\": \
                 Instance 1 {} has {left_count} elements but Instance 2 {} has {right_count}",
                self.left, self.right
            ),
            DifferenceKind::ValueMismatch {
                attribute,
                left,
                right,
            } => format!(
                "Mismatch on attribute \"{attribute}\": Instance 1 {} has \"{left}\"; \
                 Instance 2 {} has \"{right}\"",
                self.left, self.right
            ),
            DifferenceKind::ReferrerCountMismatch {
                referrer,
                left_count,
                right_count,
            } => format!(
                "Count mismatch for referrers via \"{referrer}\": \
                 Instance 1 {} has {left_count} referrers but Instance 2 {} has {right_count}",
                self.left, self.right
            ),
        };
        if self.depth > 0 && !self.path.is_empty() {
            format!("{line} (at {})", self.path)
        } else {
            line
        }
    }
}

/// An attribute that could not be read and was treated as empty
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessWarning {
    pub depth: usize,
    pub path: String,
    pub instance: String,
    pub message: String,
}

/// One side of an attribute was empty while the other was not.
///
/// These never count as differences; they are kept so callers can see
/// where a populated and an unpopulated relationship were considered equal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AsymmetricEmpty {
    pub depth: usize,
    pub path: String,
    pub left_count: usize,
    pub right_count: usize,
}

/// Accumulated outcome of one top-level comparison
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[must_use]
pub struct ComparisonResult {
    /// Every mismatch, in traversal order
    pub differences: Vec<Difference>,
    /// Attribute reads that failed and were skipped
    #[serde(default)]
    pub warnings: Vec<AccessWarning>,
    /// Attributes populated on one side only
    #[serde(default)]
    pub asymmetric_empty: Vec<AsymmetricEmpty>,
    /// Instance pairs visited, including the root pair
    pub pairs_compared: usize,
    /// Deepest recursion level visited
    pub max_depth_reached: usize,
}

impl ComparisonResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of differences
    #[must_use]
    pub fn difference_count(&self) -> usize {
        self.differences.len()
    }

    /// No differences were found
    #[must_use]
    pub fn is_identical(&self) -> bool {
        self.differences.is_empty()
    }

    pub(crate) fn record(&mut self, difference: Difference) {
        tracing::debug!(
            depth = difference.depth,
            path = %difference.path,
            "difference found"
        );
        self.differences.push(difference);
    }

    /// Report lines, indented two spaces per recursion level
    #[must_use]
    pub fn report_lines(&self) -> Vec<String> {
        self.differences
            .iter()
            .map(|d| format!("{}{}", "  ".repeat(d.depth), d.describe()))
            .collect()
    }

    /// The full report as one newline-separated string
    #[must_use]
    pub fn report(&self) -> String {
        self.report_lines().join("\n")
    }
}
