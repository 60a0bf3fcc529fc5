//! Documents and their identifiers.

mod id;

pub use id::DocumentId;

use propdb_codec::Value;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A schema-less document: a set of named property values.
///
/// Property order is irrelevant; two documents are equal when they hold the
/// same property/value pairs. Any [`Value`] may be stored, but composite
/// values (`Array`, `Map`) can only live on properties excluded from the
/// property index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    props: BTreeMap<String, Value>,
}

impl Document {
    /// Creates an empty document.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a property, returning the previous value if one was present.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.props.insert(name.into(), value.into())
    }

    /// Builder-style property assignment.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(name, value);
        self
    }

    /// Gets a property value.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.props.get(name)
    }

    /// Removes a property, returning its value if it was present.
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.props.remove(name)
    }

    /// Checks whether a property is present.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.props.contains_key(name)
    }

    /// Number of properties.
    #[must_use]
    pub fn len(&self) -> usize {
        self.props.len()
    }

    /// Returns true if the document has no properties.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.props.is_empty()
    }

    /// Iterates over property name/value pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.props.iter()
    }
}

impl From<BTreeMap<String, Value>> for Document {
    fn from(props: BTreeMap<String, Value>) -> Self {
        Self { props }
    }
}

impl FromIterator<(String, Value)> for Document {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            props: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Document {
    type Item = (&'a String, &'a Value);
    type IntoIter = std::collections::btree_map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.props.iter()
    }
}
