//! Recursive, depth-bounded instance graph comparison.

use super::filter::{AttributeFilter, DefaultAttributeFilter};
use super::options::ComparisonOptions;
use super::result::{AccessWarning, AsymmetricEmpty, ComparisonResult, Difference, DifferenceKind};
use crate::model::{AttributeDescriptor, DbId, Instance, ValueItem};
use crate::store::{ObjectStore, StoreError, StoreResult};
use indexmap::IndexSet;
use std::sync::Arc;

/// Compares two instance graphs read from two object stores.
///
/// The left store supplies the schema used to enumerate attributes. Both
/// stores are only read.
pub struct InstanceGraphComparator<'a> {
    left: &'a dyn ObjectStore,
    right: &'a dyn ObjectStore,
    options: ComparisonOptions,
    filter: Box<dyn AttributeFilter + 'a>,
}

/// Which side of the comparison a read is for
#[derive(Debug, Clone, Copy)]
enum Side {
    Left,
    Right,
}

/// Position of one instance pair in the traversal
struct Frame<'p> {
    depth: usize,
    path: &'p str,
    left: &'p Instance,
    right: &'p Instance,
}

impl Frame<'_> {
    fn attribute_path(&self, attribute: &str) -> String {
        join_path(self.path, attribute)
    }

    fn difference(&self, path: String, kind: DifferenceKind) -> Difference {
        Difference {
            depth: self.depth,
            path,
            left: self.left.label(),
            right: self.right.label(),
            kind,
        }
    }
}

impl<'a> InstanceGraphComparator<'a> {
    /// Create a comparator with default options and the default filter
    pub fn new(left: &'a dyn ObjectStore, right: &'a dyn ObjectStore) -> Self {
        Self {
            left,
            right,
            options: ComparisonOptions::default(),
            filter: Box::new(DefaultAttributeFilter),
        }
    }

    /// Set comparison options
    #[must_use]
    pub fn with_options(mut self, options: ComparisonOptions) -> Self {
        self.options = options;
        self
    }

    /// Set the recursion bound
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.options.max_depth = max_depth;
        self
    }

    /// Replace the attribute filter
    #[must_use]
    pub fn with_filter(mut self, filter: impl AttributeFilter + 'a) -> Self {
        self.filter = Box::new(filter);
        self
    }

    pub fn options(&self) -> &ComparisonOptions {
        &self.options
    }

    pub fn left_store(&self) -> &'a dyn ObjectStore {
        self.left
    }

    pub fn right_store(&self) -> &'a dyn ObjectStore {
        self.right
    }

    /// Compare two instances and everything reachable from them within the
    /// depth bound.
    ///
    /// Unreadable attributes and dangling references are logged, recorded as
    /// warnings and treated as empty. Only [`StoreError::Fault`] and other
    /// unrecoverable store errors are returned.
    pub fn compare(
        &self,
        left: &Instance,
        right: &Instance,
    ) -> Result<ComparisonResult, StoreError> {
        let mut result = ComparisonResult::new();
        let root = Frame {
            depth: 0,
            path: "",
            left,
            right,
        };
        self.compare_pair(&root, self.options.check_referrers, &mut result)?;
        tracing::debug!(
            left = %left.db_id,
            right = %right.db_id,
            differences = result.difference_count(),
            pairs = result.pairs_compared,
            "comparison finished"
        );
        Ok(result)
    }

    /// Fetch both instances by id and compare them
    pub fn compare_ids(&self, left: DbId, right: DbId) -> Result<ComparisonResult, StoreError> {
        let left = self.left.fetch_instance(left)?;
        let right = self.right.fetch_instance(right)?;
        self.compare(&left, &right)
    }

    fn compare_pair(
        &self,
        frame: &Frame<'_>,
        check_referrers: bool,
        result: &mut ComparisonResult,
    ) -> StoreResult<()> {
        result.pairs_compared += 1;
        result.max_depth_reached = result.max_depth_reached.max(frame.depth);

        let (left, right) = (frame.left, frame.right);
        if self.options.is_skipped(self.left.schema(), &left.schema_class)
            || self.options.is_skipped(self.right.schema(), &right.schema_class)
        {
            tracing::trace!(left = %left.db_id, right = %right.db_id, "skipping audit pair");
            return Ok(());
        }

        if left.schema_class != right.schema_class {
            result.record(frame.difference(
                frame.path.to_string(),
                DifferenceKind::ClassMismatch {
                    left_class: left.schema_class.clone(),
                    right_class: right.schema_class.clone(),
                },
            ));
            return Ok(());
        }

        let schema = self.left.schema();
        for descriptor in schema.attributes(&left.schema_class) {
            if !self.filter.includes(schema, &left.schema_class, descriptor) {
                continue;
            }
            self.compare_attribute(frame, descriptor, result)?;
        }

        if check_referrers {
            self.compare_referrers(frame, result)?;
        }
        Ok(())
    }

    fn compare_attribute(
        &self,
        frame: &Frame<'_>,
        descriptor: &AttributeDescriptor,
        result: &mut ComparisonResult,
    ) -> StoreResult<()> {
        let name = descriptor.name.as_str();
        let path = frame.attribute_path(name);
        let values1 = self.read_values(Side::Left, frame, name, result)?;
        let values2 = self.read_values(Side::Right, frame, name, result)?;

        if values1.is_empty() && values2.is_empty() {
            return Ok(());
        }
        if values1.is_empty() || values2.is_empty() {
            result.asymmetric_empty.push(AsymmetricEmpty {
                depth: frame.depth,
                path,
                left_count: values1.len(),
                right_count: values2.len(),
            });
            return Ok(());
        }
        if values1.len() != values2.len() {
            result.record(frame.difference(
                path,
                DifferenceKind::CountMismatch {
                    attribute: name.to_string(),
                    left_count: values1.len(),
                    right_count: values2.len(),
                },
            ));
            return Ok(());
        }

        let recurse = descriptor.is_reference() && frame.depth < self.options.max_depth;
        for (i, (v1, v2)) in values1.iter().zip(&values2).enumerate() {
            match (v1, v2) {
                (ValueItem::Reference(id1), ValueItem::Reference(id2)) => {
                    if recurse {
                        let child_path = indexed_path(&path, i, descriptor.is_multi_valued());
                        self.compare_references(frame, &child_path, *id1, *id2, false, result)?;
                    }
                }
                _ if v1 != v2 => {
                    result.record(frame.difference(
                        indexed_path(&path, i, descriptor.is_multi_valued()),
                        DifferenceKind::ValueMismatch {
                            attribute: name.to_string(),
                            left: v1.to_string(),
                            right: v2.to_string(),
                        },
                    ));
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Resolve two referenced ids and compare them one level deeper
    fn compare_references(
        &self,
        frame: &Frame<'_>,
        path: &str,
        id1: DbId,
        id2: DbId,
        check_referrers: bool,
        result: &mut ComparisonResult,
    ) -> StoreResult<()> {
        let Some(child1) = self.resolve(Side::Left, frame, path, id1, result)? else {
            return Ok(());
        };
        let Some(child2) = self.resolve(Side::Right, frame, path, id2, result)? else {
            return Ok(());
        };
        let child = Frame {
            depth: frame.depth + 1,
            path,
            left: &child1,
            right: &child2,
        };
        self.compare_pair(&child, check_referrers, result)
    }

    /// Compare how many instances refer to each side, per referring attribute.
    fn compare_referrers(
        &self,
        frame: &Frame<'_>,
        result: &mut ComparisonResult,
    ) -> StoreResult<()> {
        let referrers1 = self.read_referrers(Side::Left, frame, result)?;
        let referrers2 = self.read_referrers(Side::Right, frame, result)?;

        let keys: IndexSet<&String> = referrers1.keys().chain(referrers2.keys()).collect();
        let schema = self.left.schema();
        let empty = Vec::new();
        for key in keys {
            if let Some((class, attribute)) = key.split_once('.')
                && let Some(descriptor) = schema.attribute(class, attribute)
                && !self.filter.includes(schema, class, descriptor)
            {
                continue;
            }

            let ids1 = referrers1.get(key).unwrap_or(&empty);
            let ids2 = referrers2.get(key).unwrap_or(&empty);
            let path = join_path(frame.path, &format!("<-{key}"));

            if ids1.is_empty() || ids2.is_empty() {
                if ids1.len() != ids2.len() {
                    result.asymmetric_empty.push(AsymmetricEmpty {
                        depth: frame.depth,
                        path,
                        left_count: ids1.len(),
                        right_count: ids2.len(),
                    });
                }
                continue;
            }
            if ids1.len() != ids2.len() {
                result.record(frame.difference(
                    path,
                    DifferenceKind::ReferrerCountMismatch {
                        referrer: key.clone(),
                        left_count: ids1.len(),
                        right_count: ids2.len(),
                    },
                ));
                continue;
            }
            if frame.depth >= self.options.max_depth {
                continue;
            }

            let mut sorted1 = ids1.clone();
            let mut sorted2 = ids2.clone();
            sorted1.sort_unstable();
            sorted2.sort_unstable();
            for (i, (id1, id2)) in sorted1.into_iter().zip(sorted2).enumerate() {
                let child_path = format!("{path}[{i}]");
                self.compare_references(frame, &child_path, id1, id2, false, result)?;
            }
        }
        Ok(())
    }

    fn store(&self, side: Side) -> &'a dyn ObjectStore {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    fn read_values(
        &self,
        side: Side,
        frame: &Frame<'_>,
        attribute: &str,
        result: &mut ComparisonResult,
    ) -> StoreResult<Vec<ValueItem>> {
        let instance = match side {
            Side::Left => frame.left,
            Side::Right => frame.right,
        };
        let read = self.store(side).attribute_values(instance, attribute);
        recover(read, instance, frame.depth, frame.attribute_path(attribute), result)
    }

    fn read_referrers(
        &self,
        side: Side,
        frame: &Frame<'_>,
        result: &mut ComparisonResult,
    ) -> StoreResult<indexmap::IndexMap<String, Vec<DbId>>> {
        let instance = match side {
            Side::Left => frame.left,
            Side::Right => frame.right,
        };
        let read = self.store(side).referrers(instance.db_id);
        recover(read, instance, frame.depth, join_path(frame.path, "<-"), result)
    }

    fn resolve(
        &self,
        side: Side,
        frame: &Frame<'_>,
        path: &str,
        id: DbId,
        result: &mut ComparisonResult,
    ) -> StoreResult<Option<Arc<Instance>>> {
        let owner = match side {
            Side::Left => frame.left,
            Side::Right => frame.right,
        };
        match self.store(side).fetch_instance(id) {
            Ok(instance) => Ok(Some(instance)),
            Err(err) if err.is_recoverable() => {
                warn_access(&err, owner, frame.depth, path.to_string(), result);
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }
}

impl std::fmt::Debug for InstanceGraphComparator<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InstanceGraphComparator")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

/// Swallow recoverable read errors as a warning plus an empty value.
fn recover<T: Default>(
    read: StoreResult<T>,
    instance: &Instance,
    depth: usize,
    path: String,
    result: &mut ComparisonResult,
) -> StoreResult<T> {
    match read {
        Ok(value) => Ok(value),
        Err(err) if err.is_recoverable() => {
            warn_access(&err, instance, depth, path, result);
            Ok(T::default())
        }
        Err(err) => Err(err),
    }
}

fn warn_access(
    err: &StoreError,
    instance: &Instance,
    depth: usize,
    path: String,
    result: &mut ComparisonResult,
) {
    tracing::warn!(instance = %instance.label(), path = %path, "{err}");
    result.warnings.push(AccessWarning {
        depth,
        path,
        instance: instance.label(),
        message: err.to_string(),
    });
}

fn join_path(parent: &str, segment: &str) -> String {
    if parent.is_empty() {
        segment.to_string()
    } else {
        format!("{parent}.{segment}")
    }
}

/// Single-valued attributes keep a bare path
fn indexed_path(path: &str, index: usize, multi_valued: bool) -> String {
    if multi_valued {
        format!("{path}[{index}]")
    } else {
        path.to_string()
    }
}

/// Compare two instances with the given depth bound and filter.
///
/// Without a filter the default exclusions apply. `left_store` and
/// `right_store` resolve the references of `instance1` and `instance2`.
pub fn compare(
    left_store: &dyn ObjectStore,
    instance1: &Instance,
    right_store: &dyn ObjectStore,
    instance2: &Instance,
    max_recursion_depth: usize,
    filter: Option<&dyn AttributeFilter>,
) -> Result<ComparisonResult, StoreError> {
    InstanceGraphComparator::new(left_store, right_store)
        .with_max_depth(max_recursion_depth)
        .with_filter(filter)
        .compare(instance1, instance2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compare::AttributeNameFilter;
    use crate::model::{Multiplicity, ScalarKind, ScalarValue, Schema, SchemaClass};
    use crate::store::{InMemoryStore, QueryOperator};

    fn schema() -> Schema {
        Schema::build([
            SchemaClass::new("DatabaseObject")
                .scalar("DB_ID", ScalarKind::Integer, Multiplicity::Single)
                .reference("created", "InstanceEdit", Multiplicity::Single),
            SchemaClass::new("InstanceEdit")
                .extends("DatabaseObject")
                .scalar("dateTime", ScalarKind::Date, Multiplicity::Single)
                .scalar("note", ScalarKind::Text, Multiplicity::Single),
            SchemaClass::new("Widget")
                .extends("DatabaseObject")
                .scalar("name", ScalarKind::Text, Multiplicity::Single)
                .scalar("tags", ScalarKind::Text, Multiplicity::Many)
                .reference("children", "Widget", Multiplicity::Many)
                .reference("parent", "Widget", Multiplicity::Single),
            SchemaClass::new("Gadget")
                .extends("DatabaseObject")
                .scalar("name", ScalarKind::Text, Multiplicity::Single),
        ])
        .unwrap()
    }

    fn store(instances: Vec<Instance>) -> InMemoryStore {
        InMemoryStore::new(schema(), instances).unwrap()
    }

    fn widget(id: i64, name: &str) -> Instance {
        Instance::new(id, "Widget").with_scalar("name", name)
    }

    fn run(left: &InMemoryStore, right: &InMemoryStore, id: i64, depth: usize) -> ComparisonResult {
        InstanceGraphComparator::new(left, right)
            .with_max_depth(depth)
            .compare_ids(DbId(id), DbId(id))
            .unwrap()
    }

    #[test]
    fn test_scalar_mismatch() {
        let left = store(vec![widget(1, "A")]);
        let right = store(vec![widget(1, "B")]);
        let result = run(&left, &right, 1, 1);
        assert_eq!(result.difference_count(), 1);
        let line = &result.report_lines()[0];
        assert!(line.contains("name") && line.contains("\"A\"") && line.contains("\"B\""));
    }

    #[test]
    fn test_class_mismatch_short_circuits() {
        let left = store(vec![widget(1, "A").with_scalars("tags", ["x"])]);
        let right = store(vec![Instance::new(1, "Gadget").with_scalar("name", "B")]);
        let result = run(&left, &right, 1, 5);
        assert_eq!(result.difference_count(), 1);
        assert!(matches!(
            result.differences[0].kind,
            DifferenceKind::ClassMismatch { .. }
        ));
        assert!(result.report_lines()[0].contains("Schema classes don't match"));
    }

    #[test]
    fn test_count_mismatch_skips_elements() {
        let left = store(vec![
            widget(1, "root").with_refs("children", [2, 3]),
            widget(2, "a"),
            widget(3, "b"),
            widget(4, "c"),
        ]);
        let right = store(vec![
            widget(1, "root").with_refs("children", [2, 3, 4]),
            widget(2, "changed"),
            widget(3, "changed"),
            widget(4, "changed"),
        ]);
        let result = run(&left, &right, 1, 5);
        assert_eq!(result.difference_count(), 1);
        assert_eq!(result.pairs_compared, 1);
    }

    #[test]
    fn test_depth_bound() {
        let instances = |leaf: &str, deep: &str| {
            vec![
                widget(1, "root").with_refs("children", [2, 3]),
                widget(2, leaf).with_refs("children", [4]),
                widget(3, "same"),
                widget(4, deep),
            ]
        };
        let left = store(instances("x", "deep-x"));
        let right = store(instances("y", "deep-y"));

        let result = run(&left, &right, 1, 1);
        assert_eq!(result.difference_count(), 1);
        assert_eq!(result.differences[0].depth, 1);
        assert_eq!(result.differences[0].path, "children[0].name");
        assert_eq!(result.max_depth_reached, 1);

        assert_eq!(run(&left, &right, 1, 0).difference_count(), 0);
        assert_eq!(run(&left, &right, 1, 2).difference_count(), 2);
    }

    #[test]
    fn test_reflexive_on_cycles() {
        let left = store(vec![
            widget(1, "a").with_refs("children", [2]).with_ref("parent", 2),
            widget(2, "b").with_refs("children", [1]).with_ref("parent", 1),
        ]);
        let result = run(&left, &left, 1, 6);
        assert!(result.is_identical());
        assert_eq!(result.max_depth_reached, 6);
    }

    #[test]
    fn test_default_filter_and_audit_skip() {
        let left = store(vec![
            widget(1, "a").with_ref("created", 10),
            Instance::new(10, "InstanceEdit").with_scalar("note", "first"),
        ]);
        let right = store(vec![
            widget(1, "a").with_ref("created", 11),
            Instance::new(11, "InstanceEdit").with_scalar("note", "second"),
        ]);
        // `created` is excluded by default
        assert!(run(&left, &right, 1, 5).is_identical());

        // Even when followed, audit instances contribute nothing
        let result = InstanceGraphComparator::new(&left, &right)
            .with_filter(AttributeNameFilter::new())
            .compare_ids(DbId(1), DbId(1))
            .unwrap();
        assert!(result.is_identical());
        assert_eq!(result.pairs_compared, 2);
    }

    #[test]
    fn test_custom_filter_restricts_attributes() {
        let left = store(vec![widget(1, "a").with_scalars("tags", ["x"])]);
        let right = store(vec![widget(1, "a").with_scalars("tags", ["y"])]);
        let only_name = AttributeNameFilter::new().only(["name"]);
        let result = InstanceGraphComparator::new(&left, &right)
            .with_filter(only_name)
            .compare_ids(DbId(1), DbId(1))
            .unwrap();
        assert!(result.is_identical());
        assert_eq!(run(&left, &right, 1, 1).difference_count(), 1);
    }

    #[test]
    fn test_asymmetric_empty_is_noted_not_counted() {
        let left = store(vec![widget(1, "a").with_scalars("tags", ["x"])]);
        let right = store(vec![widget(1, "a")]);
        let result = run(&left, &right, 1, 1);
        assert!(result.is_identical());
        assert_eq!(result.asymmetric_empty.len(), 1);
        assert_eq!(result.asymmetric_empty[0].path, "tags");
    }

    #[test]
    fn test_dangling_reference_is_a_warning() {
        let left = store(vec![widget(1, "a").with_refs("children", [99])]);
        let right = store(vec![widget(1, "a").with_refs("children", [2]), widget(2, "b")]);
        let result = run(&left, &right, 1, 3);
        assert!(result.is_identical());
        assert_eq!(result.warnings.len(), 1);
        assert!(result.warnings[0].message.contains("99"));
    }

    #[test]
    fn test_free_function_uses_default_filter() {
        let left = store(vec![widget(1, "a").with_scalar("DB_ID", 1)]);
        let right = store(vec![widget(1, "a").with_scalar("DB_ID", 2)]);
        let l = left.fetch_instance(DbId(1)).unwrap();
        let r = right.fetch_instance(DbId(1)).unwrap();
        assert!(compare(&left, &l, &right, &r, 5, None).unwrap().is_identical());

        let everything = AttributeNameFilter::new();
        let result = compare(&left, &l, &right, &r, 5, Some(&everything)).unwrap();
        assert_eq!(result.difference_count(), 1);
    }

    #[test]
    fn test_referrer_count_mismatch() {
        let left = store(vec![
            widget(1, "target"),
            widget(2, "p").with_ref("parent", 1),
            widget(3, "q").with_ref("parent", 1),
        ]);
        let right = store(vec![widget(1, "target"), widget(2, "p").with_ref("parent", 1)]);

        assert!(run(&left, &right, 1, 2).is_identical());

        let result = InstanceGraphComparator::new(&left, &right)
            .with_options(ComparisonOptions::default().check_referrers(true))
            .compare_ids(DbId(1), DbId(1))
            .unwrap();
        assert_eq!(result.difference_count(), 1);
        assert!(matches!(
            &result.differences[0].kind,
            DifferenceKind::ReferrerCountMismatch { referrer, left_count: 2, right_count: 1 }
                if referrer == "Widget.parent"
        ));
    }

    #[test]
    fn test_unreadable_attribute_is_skipped() {
        // The right schema lacks `extra`, so reading it there fails
        let thing = |extra: bool| {
            let class =
                SchemaClass::new("Thing").scalar("name", ScalarKind::Text, Multiplicity::Single);
            let class = if extra {
                class.scalar("extra", ScalarKind::Text, Multiplicity::Single)
            } else {
                class
            };
            Schema::build([class]).unwrap()
        };
        let left = InMemoryStore::new(
            thing(true),
            [Instance::new(1, "Thing").with_scalar("name", "A").with_scalar("extra", "e")],
        )
        .unwrap();
        let right =
            InMemoryStore::new(thing(false), [Instance::new(1, "Thing").with_scalar("name", "B")])
                .unwrap();

        let result = run(&left, &right, 1, 3);
        assert_eq!(result.difference_count(), 1);
        assert_eq!(result.differences[0].path, "name");
        assert_eq!(result.warnings.len(), 1);
        assert_eq!(result.warnings[0].path, "extra");
        assert_eq!(result.asymmetric_empty.len(), 1);
        assert_eq!(result.asymmetric_empty[0].path, "extra");
        assert_eq!(result.asymmetric_empty[0].right_count, 0);
    }

    #[test]
    fn test_repeated_comparison_is_stable() {
        let left = store(vec![
            widget(1, "root").with_refs("children", [2, 3]).with_scalars("tags", ["x", "y"]),
            widget(2, "a").with_ref("parent", 1),
            widget(3, "b").with_refs("children", [99]),
        ]);
        let right = store(vec![
            widget(1, "root").with_refs("children", [2, 3]).with_scalars("tags", ["x", "z"]),
            widget(2, "changed").with_ref("parent", 1),
            widget(3, "b").with_refs("children", [4]),
            widget(4, "d"),
        ]);
        let comparator = InstanceGraphComparator::new(&left, &right)
            .with_options(ComparisonOptions::default().check_referrers(true));
        let first = comparator.compare_ids(DbId(1), DbId(1)).unwrap();
        let second = comparator.compare_ids(DbId(1), DbId(1)).unwrap();
        assert!(!first.is_identical());
        assert!(!first.warnings.is_empty());
        assert_eq!(first, second);
    }

    struct FaultyStore(InMemoryStore);

    impl ObjectStore for FaultyStore {
        fn schema(&self) -> &Schema {
            self.0.schema()
        }
        fn fetch_instance(&self, id: DbId) -> StoreResult<Arc<Instance>> {
            if id == DbId(2) {
                return Err(StoreError::Fault("connection reset".into()));
            }
            self.0.fetch_instance(id)
        }
        fn fetch_instances_by_class(
            &self,
            class: &str,
            sub: bool,
        ) -> StoreResult<Vec<Arc<Instance>>> {
            self.0.fetch_instances_by_class(class, sub)
        }
        fn fetch_instances_by_attribute(
            &self,
            class: &str,
            attribute: &str,
            operator: QueryOperator,
            value: &ScalarValue,
        ) -> StoreResult<Vec<Arc<Instance>>> {
            self.0.fetch_instances_by_attribute(class, attribute, operator, value)
        }
        fn referrers(&self, id: DbId) -> StoreResult<indexmap::IndexMap<String, Vec<DbId>>> {
            self.0.referrers(id)
        }
    }

    #[test]
    fn test_store_fault_propagates() {
        let instances = vec![widget(1, "a").with_refs("children", [2]), widget(2, "b")];
        let left = FaultyStore(store(instances.clone()));
        let right = store(instances);
        let err = InstanceGraphComparator::new(&left, &right)
            .compare_ids(DbId(1), DbId(1))
            .unwrap_err();
        assert_eq!(err, StoreError::Fault("connection reset".into()));
    }
}
