//! Comparison stage.
//!
//! Builds the comparator from configuration, resolves the root pair and runs
//! either a single-pair or a whole-class comparison.

use crate::compare::{compare_class, BatchResult, ComparisonResult, InstanceGraphComparator};
use crate::config::{AppConfig, ComparisonConfig};
use crate::error::{ErrorContext, InstanceDiffError, Result};
use crate::model::{DbId, Instance};
use crate::store::ObjectStore;
use std::sync::Arc;

/// Result of comparing one root pair
#[derive(Debug)]
pub struct PairComparison {
    /// Left root instance
    pub left: Arc<Instance>,
    /// Right root instance
    pub right: Arc<Instance>,
    /// Differences found under the pair
    pub result: ComparisonResult,
}

/// Build a comparator over two stores from the comparison settings.
pub fn build_comparator<'a>(
    config: &ComparisonConfig,
    left: &'a dyn ObjectStore,
    right: &'a dyn ObjectStore,
) -> Result<InstanceGraphComparator<'a>> {
    let filter = config
        .to_filter()
        .map_err(|e| InstanceDiffError::config(format!("invalid exclude pattern: {e}")))?;

    Ok(InstanceGraphComparator::new(left, right)
        .with_options(config.to_options())
        .with_filter(filter))
}

/// Compare the instance `left_id` of the left store with `right_id` of the
/// right store.
pub fn compare_pair(
    config: &AppConfig,
    left_store: &dyn ObjectStore,
    right_store: &dyn ObjectStore,
    left_id: DbId,
    right_id: DbId,
) -> Result<PairComparison> {
    let quiet = config.behavior.quiet;

    let left = left_store
        .fetch_instance(left_id)
        .with_context(|| format!("root instance {left_id} in left snapshot"))?;
    let right = right_store
        .fetch_instance(right_id)
        .with_context(|| format!("root instance {right_id} in right snapshot"))?;

    if !quiet {
        tracing::info!(
            "Comparing {} with {} (max depth {})",
            left.label(),
            right.label(),
            config.comparison.max_depth
        );
    }

    let comparator = build_comparator(&config.comparison, left_store, right_store)?;
    let result = comparator.compare(&left, &right).map_err(|e| {
        InstanceDiffError::compare(format!("{} vs {}", left.label(), right.label()), e)
    })?;

    if !quiet {
        tracing::info!(
            "Comparison complete: {} differences, {} pairs visited, deepest level {}",
            result.difference_count(),
            result.pairs_compared,
            result.max_depth_reached
        );
    }

    Ok(PairComparison {
        left,
        right,
        result,
    })
}

/// Compare every root of `class` present in the left store with its
/// counterpart in the right store.
pub fn compare_roots_of_class(
    config: &AppConfig,
    left_store: &dyn ObjectStore,
    right_store: &dyn ObjectStore,
    class: &str,
) -> Result<BatchResult> {
    let comparator = build_comparator(&config.comparison, left_store, right_store)?;
    let class_filter = config.batch.to_class_filter();

    let batch = compare_class(&comparator, class, &class_filter, config.batch.parallel)
        .map_err(|e| InstanceDiffError::compare(format!("class {class}"), e))?;

    if !config.behavior.quiet {
        tracing::info!(
            class,
            roots = batch.pairs.len(),
            differing = batch.pairs_with_differences().count(),
            differences = batch.total_differences(),
            missing_in_right = batch.missing_in_right.len(),
            missing_in_left = batch.missing_in_left.len(),
            "compared class roots"
        );
    }

    Ok(batch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Multiplicity, ScalarKind, Schema, SchemaClass};
    use crate::store::{InMemoryStore, StoreError};

    fn schema() -> Schema {
        Schema::build([
            SchemaClass::new("Thing")
                .scalar("name", ScalarKind::Text, Multiplicity::Single)
                .scalar("modified", ScalarKind::Text, Multiplicity::Single),
        ])
        .unwrap()
    }

    fn store(name: &str, modified: &str) -> InMemoryStore {
        InMemoryStore::new(
            schema(),
            [
                Instance::new(1, "Thing")
                    .with_scalar("name", name)
                    .with_scalar("modified", modified),
                Instance::new(2, "Thing").with_scalar("name", "other"),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_compare_pair_uses_configured_filter() {
        let left = store("a", "2024-01-01");
        let right = store("b", "2025-01-01");
        let config = AppConfig::builder().quiet(true).build();

        let pair = compare_pair(&config, &left, &right, DbId(1), DbId(1)).unwrap();
        // `modified` is excluded by default
        assert_eq!(pair.result.difference_count(), 1);
        assert_eq!(pair.result.differences[0].path, "name");
    }

    #[test]
    fn test_compare_pair_missing_root() {
        let left = store("a", "x");
        let right = store("a", "x");
        let config = AppConfig::builder().quiet(true).build();

        let err = compare_pair(&config, &left, &right, DbId(1), DbId(99)).unwrap_err();
        match err {
            InstanceDiffError::Store { context, source } => {
                assert!(context.contains("99"));
                assert!(matches!(source, StoreError::NotFound(DbId(99))));
            }
            other => panic!("Expected Store error, got {other:?}"),
        }
    }

    #[test]
    fn test_invalid_pattern_is_config_error() {
        let left = store("a", "x");
        let mut config = AppConfig::default();
        config.comparison.exclude_patterns.push("(".into());
        assert!(matches!(
            build_comparator(&config.comparison, &left, &left),
            Err(InstanceDiffError::Config(_))
        ));
    }

    #[test]
    fn test_compare_roots_of_class() {
        let left = store("a", "x");
        let right = store("b", "x");
        let config = AppConfig::builder().quiet(true).parallel(false).build();

        let batch = compare_roots_of_class(&config, &left, &right, "Thing").unwrap();
        assert_eq!(batch.pairs.len(), 2);
        assert_eq!(batch.total_differences(), 1);
    }
}
