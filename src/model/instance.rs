//! Instances: the nodes of a compared object graph.

use super::value::{AttributeValue, DbId, ScalarValue};
use indexmap::IndexMap;

/// A database object: identity, schema class and attribute values.
///
/// Attributes that are unset are simply absent from the map.
#[derive(Debug, Clone, PartialEq)]
pub struct Instance {
    pub db_id: DbId,
    pub schema_class: String,
    pub display_name: Option<String>,
    pub attributes: IndexMap<String, AttributeValue>,
}

impl Instance {
    /// Create an instance with no attributes set
    pub fn new(db_id: impl Into<DbId>, schema_class: impl Into<String>) -> Self {
        Self {
            db_id: db_id.into(),
            schema_class: schema_class.into(),
            display_name: None,
            attributes: IndexMap::new(),
        }
    }

    /// Set the display name
    #[must_use]
    pub fn named(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    /// Set an attribute value
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: AttributeValue) -> Self {
        self.attributes.insert(name.into(), value);
        self
    }

    /// Set a single scalar attribute
    #[must_use]
    pub fn with_scalar(self, name: impl Into<String>, value: impl Into<ScalarValue>) -> Self {
        self.with(name, AttributeValue::Scalar(value.into()))
    }

    /// Set a multi-valued scalar attribute
    #[must_use]
    pub fn with_scalars<V: Into<ScalarValue>>(
        self,
        name: impl Into<String>,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        let values = values.into_iter().map(Into::into).collect();
        self.with(name, AttributeValue::ScalarList(values))
    }

    /// Set a single reference attribute
    #[must_use]
    pub fn with_ref(self, name: impl Into<String>, target: impl Into<DbId>) -> Self {
        self.with(name, AttributeValue::Reference(target.into()))
    }

    /// Set a multi-valued reference attribute
    #[must_use]
    pub fn with_refs<I: Into<DbId>>(
        self,
        name: impl Into<String>,
        targets: impl IntoIterator<Item = I>,
    ) -> Self {
        let targets = targets.into_iter().map(Into::into).collect();
        self.with(name, AttributeValue::ReferenceList(targets))
    }

    /// Get an attribute value, if set
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&AttributeValue> {
        self.attributes.get(name)
    }

    /// Label used in report lines: `"name" [Class:id]`
    #[must_use]
    pub fn label(&self) -> String {
        match &self.display_name {
            Some(name) => format!("\"{name}\" [{}:{}]", self.schema_class, self.db_id),
            None => format!("[{}:{}]", self.schema_class, self.db_id),
        }
    }
}
