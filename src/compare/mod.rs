//! Instance graph comparison.
//!
//! [`InstanceGraphComparator`] walks two object graphs in lockstep from a
//! pair of root instances and counts every mismatch it finds: one per class
//! mismatch, one per multi-valued attribute whose lengths differ, and one per
//! differing scalar. Reference attributes are followed up to a depth bound,
//! which is also the only protection against reference cycles.
//!
//! ## Usage
//!
//! ```
//! use instance_diff::compare::{AttributeNameFilter, InstanceGraphComparator};
//! use instance_diff::model::{DbId, Instance, Multiplicity, ScalarKind, Schema, SchemaClass};
//! use instance_diff::store::InMemoryStore;
//!
//! let schema = Schema::build([
//!     SchemaClass::new("Widget").scalar("name", ScalarKind::Text, Multiplicity::Single),
//! ])
//! .unwrap();
//! let widget = |name: &str| Instance::new(1, "Widget").with_scalar("name", name);
//! let left = InMemoryStore::new(schema.clone(), [widget("A")]).unwrap();
//! let right = InMemoryStore::new(schema, [widget("B")]).unwrap();
//!
//! let result = InstanceGraphComparator::new(&left, &right)
//!     .with_filter(AttributeNameFilter::with_default_exclusions())
//!     .compare_ids(DbId(1), DbId(1))
//!     .unwrap();
//! assert_eq!(result.difference_count(), 1);
//! ```

mod batch;
mod comparator;
mod filter;
mod options;
mod result;

pub use batch::{compare_class, BatchResult, ClassFilter, PairOutcome};
pub use comparator::{compare, InstanceGraphComparator};
pub use filter::{
    filter_fn, AttributeFilter, AttributeNameFilter, DefaultAttributeFilter, FnFilter,
    DEFAULT_EXCLUDED_ATTRIBUTES,
};
pub use options::{ComparisonOptions, AUDIT_CLASS, DEFAULT_MAX_DEPTH};
pub use result::{AccessWarning, AsymmetricEmpty, ComparisonResult, Difference, DifferenceKind};
