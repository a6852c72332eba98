//! Serialized snapshot documents and their conversion into a store.

use super::traits::ParseError;
use crate::model::{
    AttributeValue, DbId, Instance, Multiplicity, ScalarKind, ScalarValue, Schema, SchemaClass,
};
use crate::store::InMemoryStore;
use indexmap::IndexMap;
use serde::Deserialize;

/// Top-level snapshot document
#[derive(Debug, Clone, Deserialize)]
pub struct SnapshotDocument {
    #[serde(default)]
    pub name: Option<String>,
    pub schema: SchemaDocument,
    #[serde(default)]
    pub instances: Vec<InstanceDocument>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SchemaDocument {
    pub classes: Vec<ClassDocument>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClassDocument {
    pub name: String,
    #[serde(default)]
    pub super_class: Option<String>,
    #[serde(default)]
    pub attributes: Vec<AttributeDocument>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AttributeDocument {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: AttributeKind,
    /// Target class of reference attributes
    #[serde(default)]
    pub target: Option<String>,
    #[serde(default)]
    pub multiple: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttributeKind {
    Text,
    Integer,
    Float,
    Boolean,
    Date,
    Reference,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InstanceDocument {
    pub db_id: DbId,
    pub class: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub attributes: IndexMap<String, RawValue>,
}

/// An attribute value as written: a bare item or a list of items
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    List(Vec<RawItem>),
    Item(RawItem),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawItem {
    Reference {
        #[serde(rename = "ref")]
        reference: DbId,
    },
    Scalar(ScalarValue),
}

impl SnapshotDocument {
    /// Build the schema and an in-memory store from this document.
    pub fn into_store(self) -> Result<InMemoryStore, ParseError> {
        let schema = build_schema(&self.schema)?;

        let mut instances = Vec::with_capacity(self.instances.len());
        for doc in self.instances {
            instances.push(build_instance(&schema, doc)?);
        }

        let store = InMemoryStore::new(schema, instances)?;
        Ok(match self.name {
            Some(name) => store.with_name(name),
            None => store,
        })
    }
}

fn build_schema(doc: &SchemaDocument) -> Result<Schema, ParseError> {
    let classes = doc.classes.iter().map(|class| {
        let mut built = SchemaClass::new(&class.name);
        built.super_class.clone_from(&class.super_class);
        for attr in &class.attributes {
            let multiplicity = if attr.multiple {
                Multiplicity::Many
            } else {
                Multiplicity::Single
            };
            built = match (attr.kind, &attr.target) {
                (AttributeKind::Reference, Some(target)) => {
                    built.reference(&attr.name, target, multiplicity)
                }
                // References without a target may point anywhere under the root
                (AttributeKind::Reference, None) => {
                    let root = root_class(doc, &class.name);
                    built.reference(&attr.name, &root, multiplicity)
                }
                (AttributeKind::Text, _) => {
                    built.scalar(&attr.name, ScalarKind::Text, multiplicity)
                }
                (AttributeKind::Integer, _) => {
                    built.scalar(&attr.name, ScalarKind::Integer, multiplicity)
                }
                (AttributeKind::Float, _) => {
                    built.scalar(&attr.name, ScalarKind::Float, multiplicity)
                }
                (AttributeKind::Boolean, _) => {
                    built.scalar(&attr.name, ScalarKind::Boolean, multiplicity)
                }
                (AttributeKind::Date, _) => {
                    built.scalar(&attr.name, ScalarKind::Date, multiplicity)
                }
            };
        }
        built
    });
    Ok(Schema::build(classes.collect::<Vec<_>>())?)
}

/// Root of `class`'s hierarchy, stopping at unknown parents or loops
fn root_class(doc: &SchemaDocument, class: &str) -> String {
    let mut current = class.to_string();
    for _ in 0..doc.classes.len() {
        let parent = doc
            .classes
            .iter()
            .find(|c| c.name == current)
            .and_then(|c| c.super_class.clone());
        match parent {
            Some(p) if doc.classes.iter().any(|c| c.name == p) => current = p,
            _ => break,
        }
    }
    current
}

fn build_instance(schema: &Schema, doc: InstanceDocument) -> Result<Instance, ParseError> {
    let mut instance = Instance::new(doc.db_id, doc.class);
    instance.display_name = doc.display_name;

    for (name, raw) in doc.attributes {
        let items = match raw {
            RawValue::List(items) => items,
            RawValue::Item(item) => vec![item],
        };
        let descriptor = schema.attribute(&instance.schema_class, &name);
        let single = descriptor.is_some_and(|d| d.multiplicity == Multiplicity::Single);

        let value = if items.is_empty() {
            if single {
                continue;
            }
            if descriptor.is_some_and(|d| d.is_reference()) {
                AttributeValue::ReferenceList(Vec::new())
            } else {
                AttributeValue::ScalarList(Vec::new())
            }
        } else if items.iter().all(|i| matches!(i, RawItem::Reference { .. })) {
            let mut ids: Vec<DbId> = items
                .into_iter()
                .filter_map(|i| match i {
                    RawItem::Reference { reference } => Some(reference),
                    RawItem::Scalar(_) => None,
                })
                .collect();
            match (single, ids.len()) {
                (true, 1) => AttributeValue::Reference(ids.remove(0)),
                _ => AttributeValue::ReferenceList(ids),
            }
        } else if items.iter().all(|i| matches!(i, RawItem::Scalar(_))) {
            let mut values: Vec<ScalarValue> = items
                .into_iter()
                .filter_map(|i| match i {
                    RawItem::Scalar(v) => Some(v),
                    RawItem::Reference { .. } => None,
                })
                .collect();
            match (single, values.len()) {
                (true, 1) => AttributeValue::Scalar(values.remove(0)),
                _ => AttributeValue::ScalarList(values),
            }
        } else {
            return Err(ParseError::MixedValues {
                db_id: instance.db_id,
                attribute: name,
            });
        };

        instance.attributes.insert(name, value);
    }

    Ok(instance)
}
