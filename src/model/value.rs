//! Attribute values held by instances.
//!
//! Values are a tagged variant rather than a dynamically typed bag: every
//! attribute is either scalar or a reference, and either single or
//! multi-valued. Comparison flattens all four shapes into an ordered list of
//! [`ValueItem`]s so single and multi-valued attributes are handled uniformly.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable database identifier of an instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DbId(pub i64);

impl DbId {
    /// Get the raw identifier value
    #[must_use]
    pub const fn value(self) -> i64 {
        self.0
    }
}

impl fmt::Display for DbId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for DbId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<i32> for DbId {
    fn from(value: i32) -> Self {
        Self(i64::from(value))
    }
}

/// A primitive attribute value.
///
/// Equality is variant-sensitive: `Integer(1)` is not equal to `Text("1")`.
/// Dates are carried as text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScalarValue {
    Boolean(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl ScalarValue {
    /// Create a text value
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// Kind of this value, used when validating against a schema
    #[must_use]
    pub const fn kind(&self) -> ScalarKind {
        match self {
            Self::Boolean(_) => ScalarKind::Boolean,
            Self::Integer(_) => ScalarKind::Integer,
            Self::Float(_) => ScalarKind::Float,
            Self::Text(_) => ScalarKind::Text,
        }
    }
}

impl fmt::Display for ScalarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Boolean(b) => write!(f, "{b}"),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for ScalarValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for ScalarValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for ScalarValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for ScalarValue {
    fn from(value: i32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<bool> for ScalarValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

/// Primitive kinds a scalar attribute may declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScalarKind {
    Text,
    Integer,
    Float,
    Boolean,
    /// Dates are stored as text
    Date,
}

impl ScalarKind {
    /// Whether a value of `kind` may be stored in an attribute of this kind.
    ///
    /// Integers are accepted for float attributes.
    #[must_use]
    pub const fn accepts(self, kind: ScalarKind) -> bool {
        matches!(
            (self, kind),
            (Self::Text | Self::Date, ScalarKind::Text)
                | (Self::Integer, ScalarKind::Integer)
                | (Self::Float, ScalarKind::Float | ScalarKind::Integer)
                | (Self::Boolean, ScalarKind::Boolean)
        )
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Text => "text",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Boolean => "boolean",
            Self::Date => "date",
        };
        f.write_str(s)
    }
}

/// One element of an attribute's value list.
#[derive(Debug, Clone, PartialEq)]
pub enum ValueItem {
    Scalar(ScalarValue),
    Reference(DbId),
}

impl fmt::Display for ValueItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(v) => write!(f, "{v}"),
            Self::Reference(id) => write!(f, "[{id}]"),
        }
    }
}

/// The value of a single attribute on an instance.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    Scalar(ScalarValue),
    ScalarList(Vec<ScalarValue>),
    Reference(DbId),
    ReferenceList(Vec<DbId>),
}

impl AttributeValue {
    /// Flatten into an ordered list of items.
    #[must_use]
    pub fn items(&self) -> Vec<ValueItem> {
        match self {
            Self::Scalar(v) => vec![ValueItem::Scalar(v.clone())],
            Self::ScalarList(vs) => vs.iter().cloned().map(ValueItem::Scalar).collect(),
            Self::Reference(id) => vec![ValueItem::Reference(*id)],
            Self::ReferenceList(ids) => ids.iter().copied().map(ValueItem::Reference).collect(),
        }
    }

    /// Number of elements held
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Scalar(_) | Self::Reference(_) => 1,
            Self::ScalarList(vs) => vs.len(),
            Self::ReferenceList(ids) => ids.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether this value holds references
    #[must_use]
    pub const fn is_reference(&self) -> bool {
        matches!(self, Self::Reference(_) | Self::ReferenceList(_))
    }

    /// All referenced ids, in order
    #[must_use]
    pub fn references(&self) -> Vec<DbId> {
        match self {
            Self::Reference(id) => vec![*id],
            Self::ReferenceList(ids) => ids.clone(),
            _ => Vec::new(),
        }
    }
}
