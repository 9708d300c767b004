use super::Value;
use crate::schema::ModelId;

use indexmap::IndexMap;

/// A dynamically typed record: the runtime model plus its named attributes.
///
/// The runtime model may be a subtype of the model a serializer was bound to.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    model: ModelId,
    values: IndexMap<String, Value>,
}

impl Record {
    pub fn new(model: ModelId) -> Self {
        Self {
            model,
            values: IndexMap::new(),
        }
    }

    /// The record's runtime model.
    pub fn model(&self) -> ModelId {
        self.model
    }

    /// Returns the attribute, or `None` if the record has no such attribute.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(name.into(), value.into());
    }

    /// Builder-style [`set`](Self::set).
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(name, value);
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(name, value)| (name.as_str(), value))
    }
}
