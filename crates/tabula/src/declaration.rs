use crate::{CodecTable, Field};
use indexmap::IndexMap;

/// A reusable bundle of declared fields and serializer options.
#[derive(Debug, Clone, Default)]
pub struct Declaration {
    pub(crate) fields: IndexMap<String, Field>,
    pub(crate) nest_foreign_keys: bool,
    pub(crate) codecs: Option<CodecTable>,
}

impl Declaration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a field. Declared fields come first in dump output, in
    /// declaration order.
    pub fn field(mut self, name: impl Into<String>, field: Field) -> Self {
        self.fields.insert(name.into(), field);
        self
    }

    /// Replaces foreign-key columns with nested fields for their relations.
    pub fn nest_foreign_keys(mut self, nest: bool) -> Self {
        self.nest_foreign_keys = nest;
        self
    }

    pub fn codecs(mut self, codecs: CodecTable) -> Self {
        self.codecs = Some(codecs);
        self
    }

    /// Returns `self` with `other` layered on top. Fields of `other` replace
    /// fields of the same name; its options win when set.
    pub fn merge(&self, other: &Declaration) -> Declaration {
        let mut merged = self.clone();

        for (name, field) in &other.fields {
            merged.fields.insert(name.clone(), field.clone());
        }

        merged.nest_foreign_keys |= other.nest_foreign_keys;

        if other.codecs.is_some() {
            merged.codecs = other.codecs.clone();
        }

        merged
    }
}
