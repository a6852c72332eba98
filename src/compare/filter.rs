//! Attribute filters deciding which attributes take part in a comparison.

use crate::model::{AttributeDescriptor, Schema};
use regex::Regex;
use std::collections::HashSet;

/// Attributes that differ trivially between independently created graphs:
/// the identifier, timestamps and the provenance links.
pub const DEFAULT_EXCLUDED_ATTRIBUTES: &[&str] =
    &["DB_ID", "dateTime", "_timestamp", "created", "modified"];

/// Predicate over attribute descriptors.
pub trait AttributeFilter: Send + Sync {
    /// Whether `attribute`, read from an instance of `class`, is compared.
    fn includes(&self, schema: &Schema, class: &str, attribute: &AttributeDescriptor) -> bool;
}

/// Filter backed by a closure over the class name and descriptor.
#[derive(Clone, Copy)]
pub struct FnFilter<F>(F);

/// Wrap a closure as an [`AttributeFilter`].
pub const fn filter_fn<F>(f: F) -> FnFilter<F>
where
    F: Fn(&str, &AttributeDescriptor) -> bool + Send + Sync,
{
    FnFilter(f)
}

impl<F> AttributeFilter for FnFilter<F>
where
    F: Fn(&str, &AttributeDescriptor) -> bool + Send + Sync,
{
    fn includes(&self, _schema: &Schema, class: &str, attribute: &AttributeDescriptor) -> bool {
        (self.0)(class, attribute)
    }
}

/// Excludes [`DEFAULT_EXCLUDED_ATTRIBUTES`] and nothing else.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultAttributeFilter;

impl AttributeFilter for DefaultAttributeFilter {
    fn includes(&self, _schema: &Schema, _class: &str, attribute: &AttributeDescriptor) -> bool {
        !DEFAULT_EXCLUDED_ATTRIBUTES.contains(&attribute.name.as_str())
    }
}

/// Name-based filter with an optional allow-list, a deny-list, per-class
/// exclusions and regex exclusions.
///
/// ```
/// use instance_diff::compare::AttributeNameFilter;
///
/// // Compare only naming and identity attributes, and never follow
/// // Complex.hasComponent (it can cycle through the entity graph).
/// let filter = AttributeNameFilter::new()
///     .only(["name", "displayName", "referenceEntity", "formula", "identifier"])
///     .exclude_on_class("Complex", "hasComponent");
/// ```
#[derive(Debug, Clone, Default)]
pub struct AttributeNameFilter {
    only: Option<HashSet<String>>,
    excluded: HashSet<String>,
    class_exclusions: Vec<(String, String)>,
    patterns: Vec<Regex>,
}

impl AttributeNameFilter {
    /// A filter that includes every attribute
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A filter starting from the default exclusions
    #[must_use]
    pub fn with_default_exclusions() -> Self {
        Self::new().exclude_all(DEFAULT_EXCLUDED_ATTRIBUTES.iter().copied())
    }

    /// Restrict comparison to the named attributes
    #[must_use]
    pub fn only<S: Into<String>>(mut self, names: impl IntoIterator<Item = S>) -> Self {
        self.only
            .get_or_insert_with(HashSet::new)
            .extend(names.into_iter().map(Into::into));
        self
    }

    /// Never compare this attribute
    #[must_use]
    pub fn exclude(mut self, name: impl Into<String>) -> Self {
        self.excluded.insert(name.into());
        self
    }

    /// Never compare any of these attributes
    #[must_use]
    pub fn exclude_all<S: Into<String>>(mut self, names: impl IntoIterator<Item = S>) -> Self {
        self.excluded.extend(names.into_iter().map(Into::into));
        self
    }

    /// Never compare `name` on instances of `class` or its subclasses
    #[must_use]
    pub fn exclude_on_class(mut self, class: impl Into<String>, name: impl Into<String>) -> Self {
        self.class_exclusions.push((class.into(), name.into()));
        self
    }

    /// Never compare attributes whose name matches `pattern`
    pub fn exclude_matching(mut self, pattern: &str) -> Result<Self, regex::Error> {
        self.patterns.push(Regex::new(pattern)?);
        Ok(self)
    }

    /// Whether an allow-list is active
    #[must_use]
    pub const fn is_restricted(&self) -> bool {
        self.only.is_some()
    }
}

impl AttributeFilter for AttributeNameFilter {
    fn includes(&self, schema: &Schema, class: &str, attribute: &AttributeDescriptor) -> bool {
        let name = attribute.name.as_str();
        if let Some(only) = &self.only
            && !only.contains(name)
        {
            return false;
        }
        if self.excluded.contains(name) {
            return false;
        }
        if self
            .class_exclusions
            .iter()
            .any(|(c, a)| a == name && schema.is_a(class, c))
        {
            return false;
        }
        !self.patterns.iter().any(|re| re.is_match(name))
    }
}

impl<T: AttributeFilter + ?Sized> AttributeFilter for &T {
    fn includes(&self, schema: &Schema, class: &str, attribute: &AttributeDescriptor) -> bool {
        (**self).includes(schema, class, attribute)
    }
}

impl<T: AttributeFilter + ?Sized> AttributeFilter for Box<T> {
    fn includes(&self, schema: &Schema, class: &str, attribute: &AttributeDescriptor) -> bool {
        (**self).includes(schema, class, attribute)
    }
}

/// `None` falls back to [`DefaultAttributeFilter`].
impl<T: AttributeFilter> AttributeFilter for Option<T> {
    fn includes(&self, schema: &Schema, class: &str, attribute: &AttributeDescriptor) -> bool {
        match self {
            Some(filter) => filter.includes(schema, class, attribute),
            None => DefaultAttributeFilter.includes(schema, class, attribute),
        }
    }
}
