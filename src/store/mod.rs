//! Read-only object store interface.
//!
//! The comparator never talks to a database directly; it reads instances,
//! attribute values and schema information through [`ObjectStore`]. The
//! crate ships an [`InMemoryStore`] built from snapshot files, but any backing
//! store that implements the trait can be compared.

mod memory;

pub use memory::{InMemoryStore, InstanceValidationError};

use crate::model::{DbId, Instance, ScalarValue, Schema, ValueItem};
use indexmap::IndexMap;
use std::sync::Arc;
use thiserror::Error;

/// Errors raised by an object store
#[derive(Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum StoreError {
    #[error("No instance with DB_ID {0}")]
    NotFound(DbId),

    #[error("Cannot read attribute '{attribute}' on class '{class}': {reason}")]
    AttributeAccess {
        class: String,
        attribute: String,
        reason: String,
    },

    #[error("Unknown schema class: {0}")]
    UnknownClass(String),

    #[error("Object store fault: {0}")]
    Fault(String),
}

impl StoreError {
    /// Create an attribute access error
    pub fn attribute_access(
        class: impl Into<String>,
        attribute: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::AttributeAccess {
            class: class.into(),
            attribute: attribute.into(),
            reason: reason.into(),
        }
    }

    /// Whether a comparison may continue past this error.
    ///
    /// Missing instances and unreadable attributes only affect the values
    /// being read; faults mean the store itself is unusable.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::NotFound(_) | Self::AttributeAccess { .. })
    }
}

/// Result type for store operations
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Operators for attribute queries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryOperator {
    Equals,
    NotEquals,
    /// SQL-style pattern: `%` matches any run, `_` a single character
    Like,
    IsNull,
    IsNotNull,
}

impl QueryOperator {
    /// Parse an operator from its SQL spelling
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "=" | "==" => Some(Self::Equals),
            "!=" | "<>" => Some(Self::NotEquals),
            "LIKE" => Some(Self::Like),
            "IS NULL" => Some(Self::IsNull),
            "IS NOT NULL" => Some(Self::IsNotNull),
            _ => None,
        }
    }
}

/// Read access to a schema-described object store.
pub trait ObjectStore: Send + Sync {
    /// The schema describing every stored instance
    fn schema(&self) -> &Schema;

    /// Fetch one instance by id
    fn fetch_instance(&self, id: DbId) -> StoreResult<Arc<Instance>>;

    /// All instances of `class` (and its subclasses when requested), in id order
    fn fetch_instances_by_class(
        &self,
        class: &str,
        include_subclasses: bool,
    ) -> StoreResult<Vec<Arc<Instance>>>;

    /// Instances of `class` whose `attribute` satisfies `operator` against `value`
    fn fetch_instances_by_attribute(
        &self,
        class: &str,
        attribute: &str,
        operator: QueryOperator,
        value: &ScalarValue,
    ) -> StoreResult<Vec<Arc<Instance>>>;

    /// Instances referring to `id`, keyed by `"<Class>.<attribute>"`
    fn referrers(&self, id: DbId) -> StoreResult<IndexMap<String, Vec<DbId>>>;

    /// Ordered values of `attribute` on `instance`.
    ///
    /// Unset attributes yield an empty list. Attributes that are not valid
    /// for the instance's class are an [`StoreError::AttributeAccess`] error.
    fn attribute_values(
        &self,
        instance: &Instance,
        attribute: &str,
    ) -> StoreResult<Vec<ValueItem>> {
        if self.schema().attribute(&instance.schema_class, attribute).is_none() {
            return Err(StoreError::attribute_access(
                &instance.schema_class,
                attribute,
                "not an attribute of this class",
            ));
        }
        Ok(instance
            .attribute(attribute)
            .map(|v| v.items())
            .unwrap_or_default())
    }
}

impl<S: ObjectStore + ?Sized> ObjectStore for &S {
    fn schema(&self) -> &Schema {
        (**self).schema()
    }

    fn fetch_instance(&self, id: DbId) -> StoreResult<Arc<Instance>> {
        (**self).fetch_instance(id)
    }

    fn fetch_instances_by_class(
        &self,
        class: &str,
        include_subclasses: bool,
    ) -> StoreResult<Vec<Arc<Instance>>> {
        (**self).fetch_instances_by_class(class, include_subclasses)
    }

    fn fetch_instances_by_attribute(
        &self,
        class: &str,
        attribute: &str,
        operator: QueryOperator,
        value: &ScalarValue,
    ) -> StoreResult<Vec<Arc<Instance>>> {
        (**self).fetch_instances_by_attribute(class, attribute, operator, value)
    }

    fn referrers(&self, id: DbId) -> StoreResult<IndexMap<String, Vec<DbId>>> {
        (**self).referrers(id)
    }

    fn attribute_values(
        &self,
        instance: &Instance,
        attribute: &str,
    ) -> StoreResult<Vec<ValueItem>> {
        (**self).attribute_values(instance, attribute)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recoverable_errors() {
        assert!(StoreError::NotFound(DbId(1)).is_recoverable());
        assert!(StoreError::attribute_access("A", "b", "bad").is_recoverable());
        assert!(!StoreError::Fault("connection reset".into()).is_recoverable());
        assert!(!StoreError::UnknownClass("X".into()).is_recoverable());
    }

    #[test]
    fn test_parse_operator() {
        assert_eq!(QueryOperator::parse("="), Some(QueryOperator::Equals));
        assert_eq!(QueryOperator::parse("like"), Some(QueryOperator::Like));
        assert_eq!(QueryOperator::parse("is not null"), Some(QueryOperator::IsNotNull));
        assert_eq!(QueryOperator::parse(">="), None);
    }
}
