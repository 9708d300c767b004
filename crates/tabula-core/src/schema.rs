mod builder;
pub use builder::{Builder, ModelBuilder};

mod constructor;
pub use constructor::Constructor;

mod field;
pub use field::{
    BelongsTo, Field, FieldId, FieldName, FieldPrimitive, FieldTy, ForeignKey, HasMany, HasOne,
};

mod model;
pub use model::{Model, ModelId, PrimaryKey};

mod property;
pub use property::Property;

use crate::{value::Record, Error, Result, Value};
use indexmap::IndexMap;

/// The application schema: every model, its fields, relations and place in an
/// inheritance hierarchy. Built once, then shared read-only.
#[derive(Debug, Default)]
pub struct Schema {
    pub models: IndexMap<ModelId, Model>,
}

impl Schema {
    pub fn builder() -> Builder {
        Builder::default()
    }

    /// Get a model by ID
    pub fn model(&self, id: impl Into<ModelId>) -> &Model {
        self.models.get(&id.into()).expect("invalid model ID")
    }

    pub fn model_by_name(&self, name: &str) -> Option<&Model> {
        self.models.values().find(|model| model.name == name)
    }

    /// Like [`model_by_name`](Self::model_by_name), failing on an unknown name.
    pub fn resolve(&self, name: &str) -> Result<&Model> {
        self.model_by_name(name)
            .ok_or_else(|| Error::invalid_schema(format!("unknown model `{name}`")))
    }

    pub fn models(&self) -> impl Iterator<Item = &Model> {
        self.models.values()
    }

    /// Get a field by ID
    pub fn field(&self, id: FieldId) -> &Field {
        self.model(id.model)
            .fields
            .get(id.index)
            .expect("invalid field ID")
    }

    /// Models that directly extend `id`.
    pub fn children(&self, id: impl Into<ModelId>) -> impl Iterator<Item = &Model> {
        let id = id.into();
        self.models().filter(move |model| model.parent == Some(id))
    }

    /// Every model extending `id`, directly or not, in pre-order.
    pub fn descendants(&self, id: impl Into<ModelId>) -> Vec<ModelId> {
        let mut out = vec![];
        self.collect_descendants(id.into(), &mut out);
        out
    }

    fn collect_descendants(&self, id: ModelId, out: &mut Vec<ModelId>) {
        for child in self.children(id) {
            out.push(child.id);
            self.collect_descendants(child.id, out);
        }
    }

    /// Returns `true` if `model` is `ancestor` or one of its descendants.
    pub fn is_a(&self, model: impl Into<ModelId>, ancestor: impl Into<ModelId>) -> bool {
        let ancestor = ancestor.into();
        let mut curr = Some(model.into());

        while let Some(id) = curr {
            if id == ancestor {
                return true;
            }
            curr = self.model(id).parent;
        }

        false
    }

    pub fn discriminator_field(&self, id: impl Into<ModelId>) -> Option<&Field> {
        let model = self.model(id);
        model.discriminator.map(|field| model.field(field))
    }

    /// Reads an attribute from a record, falling back to the computed
    /// properties of the record's runtime model.
    pub fn read(&self, record: &Record, name: &str) -> Option<Value> {
        if let Some(value) = record.get(name) {
            return Some(value.clone());
        }

        self.model(record.model())
            .property(name)
            .map(|property| property.compute(record))
    }
}
