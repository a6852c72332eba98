//! In-memory object store.

use super::{ObjectStore, QueryOperator, StoreError, StoreResult};
use crate::model::{
    AttributeValue, DbId, Instance, Multiplicity, ScalarValue, Schema, ValueItem, ValueType,
};
use indexmap::IndexMap;
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;

/// An instance that does not conform to the schema
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InstanceValidationError {
    #[error("Duplicate DB_ID {0}")]
    DuplicateId(DbId),

    #[error("Instance {db_id} has unknown class '{class}'")]
    UnknownClass { db_id: DbId, class: String },

    #[error("Instance {db_id}: '{attribute}' is not an attribute of '{class}'")]
    UnknownAttribute {
        db_id: DbId,
        class: String,
        attribute: String,
    },

    #[error("Instance {db_id}: attribute '{attribute}' {message}")]
    InvalidValue {
        db_id: DbId,
        attribute: String,
        message: String,
    },
}

/// Object store holding every instance in memory.
///
/// Class and reverse-reference indexes are built once at construction.
#[derive(Debug, Clone)]
pub struct InMemoryStore {
    name: Option<String>,
    schema: Schema,
    instances: IndexMap<DbId, Arc<Instance>>,
    by_class: IndexMap<String, Vec<DbId>>,
    referrers: IndexMap<DbId, IndexMap<String, Vec<DbId>>>,
}

impl InMemoryStore {
    /// Build a store, validating each instance against the schema.
    pub fn new(
        schema: Schema,
        instances: impl IntoIterator<Item = Instance>,
    ) -> Result<Self, InstanceValidationError> {
        let mut sorted: BTreeMap<DbId, Arc<Instance>> = BTreeMap::new();
        for instance in instances {
            validate_instance(&schema, &instance)?;
            let id = instance.db_id;
            if sorted.insert(id, Arc::new(instance)).is_some() {
                return Err(InstanceValidationError::DuplicateId(id));
            }
        }

        let mut by_class: IndexMap<String, Vec<DbId>> = IndexMap::new();
        let mut referrers: IndexMap<DbId, IndexMap<String, Vec<DbId>>> = IndexMap::new();
        for (id, instance) in &sorted {
            by_class
                .entry(instance.schema_class.clone())
                .or_default()
                .push(*id);
            for (attr, value) in &instance.attributes {
                let key = format!("{}.{attr}", instance.schema_class);
                for target in value.references() {
                    referrers
                        .entry(target)
                        .or_default()
                        .entry(key.clone())
                        .or_default()
                        .push(*id);
                }
            }
        }

        tracing::debug!(
            instances = sorted.len(),
            classes = by_class.len(),
            "built in-memory store"
        );

        Ok(Self {
            name: None,
            schema,
            instances: sorted.into_iter().collect(),
            by_class,
            referrers,
        })
    }

    /// Attach a human-readable label (usually the snapshot name)
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    #[must_use]
    pub fn instance_count(&self) -> usize {
        self.instances.len()
    }

    /// All instances, in id order
    pub fn instances(&self) -> impl Iterator<Item = &Arc<Instance>> {
        self.instances.values()
    }

    /// References pointing at ids that are not in the store
    #[must_use]
    pub fn dangling_references(&self) -> Vec<(DbId, DbId)> {
        self.instances
            .values()
            .flat_map(|inst| {
                inst.attributes
                    .values()
                    .flat_map(AttributeValue::references)
                    .filter(move |target| !self.instances.contains_key(target))
                    .map(move |target| (inst.db_id, target))
            })
            .collect()
    }

    fn ensure_class(&self, class: &str) -> StoreResult<()> {
        if self.schema.has_class(class) {
            Ok(())
        } else {
            Err(StoreError::UnknownClass(class.to_string()))
        }
    }
}

impl ObjectStore for InMemoryStore {
    fn schema(&self) -> &Schema {
        &self.schema
    }

    fn fetch_instance(&self, id: DbId) -> StoreResult<Arc<Instance>> {
        self.instances
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound(id))
    }

    fn fetch_instances_by_class(
        &self,
        class: &str,
        include_subclasses: bool,
    ) -> StoreResult<Vec<Arc<Instance>>> {
        self.ensure_class(class)?;

        let classes = if include_subclasses {
            self.schema.subclasses(class)
        } else {
            vec![class]
        };

        let mut ids: Vec<DbId> = classes
            .iter()
            .filter_map(|c| self.by_class.get(*c))
            .flatten()
            .copied()
            .collect();
        ids.sort_unstable();

        Ok(ids
            .into_iter()
            .filter_map(|id| self.instances.get(&id).cloned())
            .collect())
    }

    fn fetch_instances_by_attribute(
        &self,
        class: &str,
        attribute: &str,
        operator: QueryOperator,
        value: &ScalarValue,
    ) -> StoreResult<Vec<Arc<Instance>>> {
        self.ensure_class(class)?;
        if self.schema.attribute(class, attribute).is_none() {
            return Err(StoreError::attribute_access(
                class,
                attribute,
                "not an attribute of this class",
            ));
        }

        let pattern = match operator {
            QueryOperator::Like => Some(like_to_regex(&value.to_string())?),
            _ => None,
        };

        let candidates = self.fetch_instances_by_class(class, true)?;
        Ok(candidates
            .into_iter()
            .filter(|inst| {
                let items = inst
                    .attribute(attribute)
                    .map(AttributeValue::items)
                    .unwrap_or_default();
                match operator {
                    QueryOperator::Equals => items.iter().any(|item| item_matches(item, value)),
                    QueryOperator::NotEquals => !items.iter().any(|item| item_matches(item, value)),
                    QueryOperator::Like => pattern.as_ref().is_some_and(|re| {
                        items.iter().any(|item| re.is_match(&item_text(item)))
                    }),
                    QueryOperator::IsNull => items.is_empty(),
                    QueryOperator::IsNotNull => !items.is_empty(),
                }
            })
            .collect())
    }

    fn referrers(&self, id: DbId) -> StoreResult<IndexMap<String, Vec<DbId>>> {
        Ok(self.referrers.get(&id).cloned().unwrap_or_default())
    }
}

fn item_matches(item: &ValueItem, value: &ScalarValue) -> bool {
    match (item, value) {
        (ValueItem::Scalar(s), v) => s == v,
        (ValueItem::Reference(id), ScalarValue::Integer(v)) => id.value() == *v,
        (ValueItem::Reference(_), _) => false,
    }
}

fn item_text(item: &ValueItem) -> String {
    match item {
        ValueItem::Scalar(s) => s.to_string(),
        ValueItem::Reference(id) => id.to_string(),
    }
}

fn like_to_regex(pattern: &str) -> StoreResult<Regex> {
    let mut re = String::with_capacity(pattern.len() + 8);
    re.push('^');
    for ch in pattern.chars() {
        match ch {
            '%' => re.push_str(".*"),
            '_' => re.push('.'),
            other => re.push_str(&regex::escape(&other.to_string())),
        }
    }
    re.push('$');
    Regex::new(&re).map_err(|e| StoreError::Fault(format!("invalid LIKE pattern '{pattern}': {e}")))
}

fn validate_instance(schema: &Schema, instance: &Instance) -> Result<(), InstanceValidationError> {
    if !schema.has_class(&instance.schema_class) {
        return Err(InstanceValidationError::UnknownClass {
            db_id: instance.db_id,
            class: instance.schema_class.clone(),
        });
    }

    for (name, value) in &instance.attributes {
        let Some(descriptor) = schema.attribute(&instance.schema_class, name) else {
            return Err(InstanceValidationError::UnknownAttribute {
                db_id: instance.db_id,
                class: instance.schema_class.clone(),
                attribute: name.clone(),
            });
        };

        let invalid = |message: String| InstanceValidationError::InvalidValue {
            db_id: instance.db_id,
            attribute: name.clone(),
            message,
        };

        if descriptor.multiplicity == Multiplicity::Single && value.len() > 1 {
            return Err(invalid(format!(
                "is single-valued but holds {} values",
                value.len()
            )));
        }

        match (&descriptor.value_type, value) {
            (
                ValueType::Reference { .. },
                AttributeValue::Reference(_) | AttributeValue::ReferenceList(_),
            ) => {}
            (ValueType::Reference { target_class }, _) => {
                return Err(invalid(format!(
                    "must reference {target_class} instances, found scalar values"
                )));
            }
            (ValueType::Scalar(kind), AttributeValue::Scalar(v)) => {
                if !kind.accepts(v.kind()) {
                    return Err(invalid(format!("expects {kind}, found {}", v.kind())));
                }
            }
            (ValueType::Scalar(kind), AttributeValue::ScalarList(vs)) => {
                if let Some(bad) = vs.iter().find(|v| !kind.accepts(v.kind())) {
                    return Err(invalid(format!("expects {kind}, found {}", bad.kind())));
                }
            }
            (ValueType::Scalar(kind), _) => {
                return Err(invalid(format!("expects {kind} values, found references")));
            }
        }
    }

    Ok(())
}
