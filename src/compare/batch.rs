//! Batch comparison of every root instance of a class.

use super::comparator::InstanceGraphComparator;
use super::result::ComparisonResult;
use crate::model::{DbId, Instance, Schema};
use crate::store::{StoreError, StoreResult};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Root counts at or below this are compared sequentially
const PARALLEL_THRESHOLD: usize = 16;

/// Selects which classes of root instances are compared.
///
/// Both lists are is-a aware: including `Event` includes `Pathway`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassFilter {
    include: Vec<String>,
    exclude: Vec<String>,
}

impl ClassFilter {
    /// Accept every class
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn include(mut self, class: impl Into<String>) -> Self {
        self.include.push(class.into());
        self
    }

    #[must_use]
    pub fn exclude(mut self, class: impl Into<String>) -> Self {
        self.exclude.push(class.into());
        self
    }

    /// Whether instances of `class` pass this filter
    #[must_use]
    pub fn accepts(&self, schema: &Schema, class: &str) -> bool {
        let included =
            self.include.is_empty() || self.include.iter().any(|c| schema.is_a(class, c));
        included && !self.exclude.iter().any(|c| schema.is_a(class, c))
    }
}

/// Comparison of one root pair
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PairOutcome {
    pub db_id: DbId,
    /// Label of the left root
    pub label: String,
    pub result: ComparisonResult,
}

/// Outcome of comparing every root of one class
#[derive(Debug, Clone, Serialize, Deserialize)]
#[must_use]
pub struct BatchResult {
    pub class: String,
    /// Compared pairs, in `DbId` order
    pub pairs: Vec<PairOutcome>,
    /// Left roots with no counterpart in the right store
    pub missing_in_right: Vec<DbId>,
    /// Right roots with no counterpart in the left store
    pub missing_in_left: Vec<DbId>,
}

impl BatchResult {
    /// Sum of differences over all pairs
    #[must_use]
    pub fn total_differences(&self) -> usize {
        self.pairs.iter().map(|p| p.result.difference_count()).sum()
    }

    /// Pairs with at least one difference
    pub fn pairs_with_differences(&self) -> impl Iterator<Item = &PairOutcome> {
        self.pairs.iter().filter(|p| !p.result.is_identical())
    }

    /// No differences and no unmatched roots
    #[must_use]
    pub fn is_identical(&self) -> bool {
        self.total_differences() == 0
            && self.missing_in_right.is_empty()
            && self.missing_in_left.is_empty()
    }
}

enum RootOutcome {
    Compared(PairOutcome),
    Missing(DbId),
}

/// Compare every instance of `class` in the left store against the instance
/// with the same `DbId` in the right store.
///
/// A store fault on any pair aborts the whole batch.
pub fn compare_class(
    comparator: &InstanceGraphComparator<'_>,
    class: &str,
    class_filter: &ClassFilter,
    parallel: bool,
) -> Result<BatchResult, StoreError> {
    let left = comparator.left_store();
    let right = comparator.right_store();

    let roots: Vec<Arc<Instance>> = left
        .fetch_instances_by_class(class, true)?
        .into_iter()
        .filter(|i| class_filter.accepts(left.schema(), &i.schema_class))
        .collect();
    tracing::info!(class, roots = roots.len(), parallel, "comparing class");

    let compare_root = |root: &Arc<Instance>| -> StoreResult<RootOutcome> {
        match right.fetch_instance(root.db_id) {
            Ok(counterpart) => {
                let result = comparator.compare(root, &counterpart)?;
                Ok(RootOutcome::Compared(PairOutcome {
                    db_id: root.db_id,
                    label: root.label(),
                    result,
                }))
            }
            Err(StoreError::NotFound(id)) => Ok(RootOutcome::Missing(id)),
            Err(err) => Err(err),
        }
    };

    let outcomes: Vec<RootOutcome> = if parallel && roots.len() > PARALLEL_THRESHOLD {
        use rayon::prelude::*;
        roots.par_iter().map(compare_root).collect::<StoreResult<_>>()?
    } else {
        roots.iter().map(compare_root).collect::<StoreResult<_>>()?
    };

    let mut pairs = Vec::with_capacity(outcomes.len());
    let mut missing_in_right = Vec::new();
    for outcome in outcomes {
        match outcome {
            RootOutcome::Compared(pair) => pairs.push(pair),
            RootOutcome::Missing(id) => missing_in_right.push(id),
        }
    }

    let missing_in_left = match right.fetch_instances_by_class(class, true) {
        Ok(instances) => instances
            .into_iter()
            .filter(|i| class_filter.accepts(right.schema(), &i.schema_class))
            .filter(|i| matches!(left.fetch_instance(i.db_id), Err(StoreError::NotFound(_))))
            .map(|i| i.db_id)
            .collect(),
        Err(StoreError::UnknownClass(_)) => Vec::new(),
        Err(err) => return Err(err),
    };

    let batch = BatchResult {
        class: class.to_string(),
        pairs,
        missing_in_right,
        missing_in_left,
    };
    tracing::info!(
        class,
        pairs = batch.pairs.len(),
        differing = batch.pairs_with_differences().count(),
        differences = batch.total_differences(),
        "class comparison finished"
    );
    Ok(batch)
}
