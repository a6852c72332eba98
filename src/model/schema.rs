//! Schema classes and attribute descriptors.
//!
//! A [`Schema`] is built once from class definitions. Building resolves the
//! class hierarchy into a per-class attribute table so that attribute lookup
//! during comparison is a map access instead of a walk up the hierarchy.

use super::value::ScalarKind;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

/// Errors raised while building a schema
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("Duplicate schema class: {0}")]
    DuplicateClass(String),

    #[error("Class '{class}' extends unknown class '{super_class}'")]
    UnknownSuperClass { class: String, super_class: String },

    #[error("Inheritance cycle involving class '{0}'")]
    InheritanceCycle(String),

    #[error("Attribute '{attribute}' declared more than once on '{class}'")]
    DuplicateAttribute { class: String, attribute: String },

    #[error("Reference attribute '{class}.{attribute}' targets unknown class '{target}'")]
    UnknownTargetClass {
        class: String,
        attribute: String,
        target: String,
    },
}

/// Whether an attribute holds one value or an ordered list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Multiplicity {
    Single,
    Many,
}

/// The value type of an attribute
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValueType {
    /// Primitive values compared by equality
    Scalar(ScalarKind),
    /// References to other instances, compared recursively
    Reference {
        /// Class (or super class) of the referenced instances
        target_class: String,
    },
}

impl ValueType {
    #[must_use]
    pub const fn is_reference(&self) -> bool {
        matches!(self, Self::Reference { .. })
    }
}

/// Describes one attribute of a schema class
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeDescriptor {
    pub name: String,
    pub value_type: ValueType,
    pub multiplicity: Multiplicity,
    /// Class that declares the attribute (may be an ancestor)
    pub declaring_class: String,
}

impl AttributeDescriptor {
    /// Create a scalar attribute descriptor
    pub fn scalar(
        declaring_class: impl Into<String>,
        name: impl Into<String>,
        kind: ScalarKind,
        multiplicity: Multiplicity,
    ) -> Self {
        Self {
            name: name.into(),
            value_type: ValueType::Scalar(kind),
            multiplicity,
            declaring_class: declaring_class.into(),
        }
    }

    /// Create a reference attribute descriptor
    pub fn reference(
        declaring_class: impl Into<String>,
        name: impl Into<String>,
        target_class: impl Into<String>,
        multiplicity: Multiplicity,
    ) -> Self {
        Self {
            name: name.into(),
            value_type: ValueType::Reference {
                target_class: target_class.into(),
            },
            multiplicity,
            declaring_class: declaring_class.into(),
        }
    }

    #[must_use]
    pub const fn is_reference(&self) -> bool {
        self.value_type.is_reference()
    }

    #[must_use]
    pub fn is_multi_valued(&self) -> bool {
        self.multiplicity == Multiplicity::Many
    }
}

/// A class definition: name, optional super class, declared attributes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaClass {
    pub name: String,
    pub super_class: Option<String>,
    /// Attributes declared directly on this class
    pub attributes: Vec<AttributeDescriptor>,
}

impl SchemaClass {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            super_class: None,
            attributes: Vec::new(),
        }
    }

    /// Set the super class
    #[must_use]
    pub fn extends(mut self, super_class: impl Into<String>) -> Self {
        self.super_class = Some(super_class.into());
        self
    }

    /// Declare a scalar attribute
    #[must_use]
    pub fn scalar(mut self, name: &str, kind: ScalarKind, multiplicity: Multiplicity) -> Self {
        let descriptor = AttributeDescriptor::scalar(&self.name, name, kind, multiplicity);
        self.attributes.push(descriptor);
        self
    }

    /// Declare a reference attribute
    #[must_use]
    pub fn reference(mut self, name: &str, target: &str, multiplicity: Multiplicity) -> Self {
        let descriptor = AttributeDescriptor::reference(&self.name, name, target, multiplicity);
        self.attributes.push(descriptor);
        self
    }
}

#[derive(Debug, Clone)]
struct ResolvedClass {
    class: SchemaClass,
    /// Ancestors from nearest to root
    ancestors: Vec<String>,
    /// Inherited attributes first, then declared ones
    attributes: Vec<AttributeDescriptor>,
    by_name: IndexMap<String, usize>,
}

/// Schema with resolved per-class attribute tables
#[derive(Debug, Clone, Default)]
pub struct Schema {
    classes: IndexMap<String, ResolvedClass>,
}

impl Schema {
    /// Build a schema from class definitions.
    pub fn build(classes: impl IntoIterator<Item = SchemaClass>) -> Result<Self, SchemaError> {
        let mut defined: IndexMap<String, SchemaClass> = IndexMap::new();
        for class in classes {
            if defined.contains_key(&class.name) {
                return Err(SchemaError::DuplicateClass(class.name));
            }
            defined.insert(class.name.clone(), class);
        }

        for class in defined.values() {
            if let Some(parent) = &class.super_class
                && !defined.contains_key(parent)
            {
                return Err(SchemaError::UnknownSuperClass {
                    class: class.name.clone(),
                    super_class: parent.clone(),
                });
            }
            for attr in &class.attributes {
                if let ValueType::Reference { target_class } = &attr.value_type
                    && !defined.contains_key(target_class)
                {
                    return Err(SchemaError::UnknownTargetClass {
                        class: class.name.clone(),
                        attribute: attr.name.clone(),
                        target: target_class.clone(),
                    });
                }
            }
        }

        let mut resolved = IndexMap::with_capacity(defined.len());
        for name in defined.keys() {
            let ancestors = ancestors_of(name, &defined)?;

            let mut attributes = Vec::new();
            let mut by_name = IndexMap::new();
            // Root first so inherited attributes come before declared ones
            for owner in ancestors.iter().rev().chain(std::iter::once(name)) {
                for attr in &defined[owner].attributes {
                    if by_name.contains_key(&attr.name) {
                        return Err(SchemaError::DuplicateAttribute {
                            class: owner.clone(),
                            attribute: attr.name.clone(),
                        });
                    }
                    by_name.insert(attr.name.clone(), attributes.len());
                    attributes.push(attr.clone());
                }
            }

            resolved.insert(
                name.clone(),
                ResolvedClass {
                    class: defined[name].clone(),
                    ancestors,
                    attributes,
                    by_name,
                },
            );
        }

        Ok(Self { classes: resolved })
    }

    /// Look up a class definition
    #[must_use]
    pub fn class(&self, name: &str) -> Option<&SchemaClass> {
        self.classes.get(name).map(|c| &c.class)
    }

    /// Check whether a class exists
    #[must_use]
    pub fn has_class(&self, name: &str) -> bool {
        self.classes.contains_key(name)
    }

    /// All attributes valid on `class`, inherited ones first.
    ///
    /// Unknown classes have no attributes.
    #[must_use]
    pub fn attributes(&self, class: &str) -> &[AttributeDescriptor] {
        self.classes
            .get(class)
            .map_or(&[], |c| c.attributes.as_slice())
    }

    /// Look up one attribute of a class
    #[must_use]
    pub fn attribute(&self, class: &str, name: &str) -> Option<&AttributeDescriptor> {
        let resolved = self.classes.get(class)?;
        resolved
            .by_name
            .get(name)
            .map(|&idx| &resolved.attributes[idx])
    }

    /// Whether `class` is `ancestor` or one of its subclasses
    #[must_use]
    pub fn is_a(&self, class: &str, ancestor: &str) -> bool {
        if class == ancestor {
            return true;
        }
        self.classes
            .get(class)
            .is_some_and(|c| c.ancestors.iter().any(|a| a == ancestor))
    }

    /// `class` and all of its descendants, in definition order
    #[must_use]
    pub fn subclasses(&self, class: &str) -> Vec<&str> {
        self.classes
            .keys()
            .filter(|name| self.is_a(name, class))
            .map(String::as_str)
            .collect()
    }

    /// All class names, in definition order
    pub fn class_names(&self) -> impl Iterator<Item = &str> {
        self.classes.keys().map(String::as_str)
    }

    #[must_use]
    pub fn class_count(&self) -> usize {
        self.classes.len()
    }
}

fn ancestors_of(
    name: &str,
    defined: &IndexMap<String, SchemaClass>,
) -> Result<Vec<String>, SchemaError> {
    let mut ancestors = Vec::new();
    let mut seen = HashSet::new();
    seen.insert(name.to_string());

    let mut current = defined[name].super_class.as_ref();
    while let Some(parent) = current {
        if !seen.insert(parent.clone()) {
            return Err(SchemaError::InheritanceCycle(name.to_string()));
        }
        ancestors.push(parent.clone());
        current = defined[parent].super_class.as_ref();
    }
    Ok(ancestors)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Schema {
        Schema::build([
            SchemaClass::new("DatabaseObject")
                .scalar("DB_ID", ScalarKind::Integer, Multiplicity::Single)
                .scalar("displayName", ScalarKind::Text, Multiplicity::Single),
            SchemaClass::new("Event")
                .extends("DatabaseObject")
                .scalar("name", ScalarKind::Text, Multiplicity::Many),
            SchemaClass::new("Pathway")
                .extends("Event")
                .reference("hasEvent", "Event", Multiplicity::Many),
            SchemaClass::new("Reaction").extends("Event"),
        ])
        .expect("schema should build")
    }

    #[test]
    fn test_inherited_attributes_come_first() {
        let schema = sample();
        let names: Vec<_> = schema
            .attributes("Pathway")
            .iter()
            .map(|a| a.name.as_str())
            .collect();
        assert_eq!(names, vec!["DB_ID", "displayName", "name", "hasEvent"]);
        assert_eq!(
            schema.attribute("Pathway", "name").map(|a| a.declaring_class.as_str()),
            Some("Event")
        );
    }

    #[test]
    fn test_is_a() {
        let schema = sample();
        assert!(schema.is_a("Pathway", "Event"));
        assert!(schema.is_a("Pathway", "DatabaseObject"));
        assert!(schema.is_a("Event", "Event"));
        assert!(!schema.is_a("Event", "Pathway"));
        assert!(!schema.is_a("Unknown", "Event"));
    }

    #[test]
    fn test_class_names_in_definition_order() {
        let schema = sample();
        let names: Vec<&str> = schema.class_names().collect();
        assert_eq!(names, ["DatabaseObject", "Event", "Pathway", "Reaction"]);
        assert_eq!(schema.class_count(), 4);
    }

    #[test]
    fn test_subclasses() {
        let schema = sample();
        assert_eq!(schema.subclasses("Event"), vec!["Event", "Pathway", "Reaction"]);
    }

    #[test]
    fn test_unknown_super_class_rejected() {
        let err = Schema::build([SchemaClass::new("A").extends("B")]).unwrap_err();
        assert!(matches!(err, SchemaError::UnknownSuperClass { .. }));
    }

    #[test]
    fn test_cycle_rejected() {
        let err = Schema::build([
            SchemaClass::new("A").extends("B"),
            SchemaClass::new("B").extends("A"),
        ])
        .unwrap_err();
        assert!(matches!(err, SchemaError::InheritanceCycle(_)));
    }

    #[test]
    fn test_redeclared_attribute_rejected() {
        let err = Schema::build([
            SchemaClass::new("A").scalar("name", ScalarKind::Text, Multiplicity::Single),
            SchemaClass::new("B")
                .extends("A")
                .scalar("name", ScalarKind::Text, Multiplicity::Single),
        ])
        .unwrap_err();
        assert!(matches!(err, SchemaError::DuplicateAttribute { .. }));
    }

    #[test]
    fn test_unknown_reference_target_rejected() {
        let err = Schema::build([SchemaClass::new("A").reference(
            "next",
            "Missing",
            Multiplicity::Single,
        )])
        .unwrap_err();
        assert!(matches!(err, SchemaError::UnknownTargetClass { .. }));
    }
}
