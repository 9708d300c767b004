use super::{Constructor, Field, FieldId, Property};
use crate::{value::Record, Error, Result, Value};
use std::fmt;

#[derive(Debug, Clone)]
pub struct Model {
    /// Uniquely identifies the model within the schema
    pub id: ModelId,

    /// Name of the model
    pub name: String,

    /// Fields contained by the model, inherited fields first
    pub fields: Vec<Field>,

    pub primary_key: PrimaryKey,

    /// Computed, read-only attributes
    pub properties: Vec<Property>,

    /// The model this one extends, if any
    pub parent: Option<ModelId>,

    /// Field carrying the subtype tag. Set on every model of a polymorphic
    /// hierarchy.
    pub discriminator: Option<FieldId>,

    /// The discriminator value identifying this model within its hierarchy
    pub identity: Option<Value>,

    /// Custom constructor used when a load creates a new record
    pub constructor: Option<Constructor>,
}

#[derive(Debug, Clone, Default)]
pub struct PrimaryKey {
    /// Fields composing the primary key
    pub fields: Vec<FieldId>,
}

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct ModelId(pub usize);

impl Model {
    pub fn field(&self, field: impl Into<FieldId>) -> &Field {
        let field_id = field.into();
        assert_eq!(self.id, field_id.model);
        &self.fields[field_id.index]
    }

    pub fn field_by_name(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|field| field.name.app_name == name)
    }

    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|property| property.name == name)
    }

    /// Iterate over the fields used for the model's primary key.
    pub fn primary_key_fields(&self) -> impl ExactSizeIterator<Item = &'_ Field> {
        self.primary_key
            .fields
            .iter()
            .map(|pk_field| &self.fields[pk_field.index])
    }

    /// Returns the single primary-key field. Composite keys are rejected.
    pub fn primary_key_field(&self) -> Result<&Field> {
        match &self.primary_key.fields[..] {
            [pk_field] => Ok(&self.fields[pk_field.index]),
            [] => Err(Error::invalid_schema(format!(
                "`{}` has no primary key",
                self.name
            ))),
            _ => Err(Error::invalid_schema(format!(
                "`{}` has a composite primary key; multiple primary keys are not supported",
                self.name
            ))),
        }
    }

    pub fn is_polymorphic(&self) -> bool {
        self.discriminator.is_some()
    }

    /// The declared identity with enum identity stripped. The wire format only
    /// ever carries the underlying value.
    pub fn polymorphic_identity(&self) -> Option<Value> {
        self.identity.clone().map(Value::into_primitive)
    }

    /// Creates a record of this model with every field set to its default.
    pub fn instantiate(&self) -> Record {
        let mut record = Record::new(self.id);

        for field in &self.fields {
            let value = match &field.default {
                Some(default) => default.clone(),
                None if field.ty.is_has_many() => Value::List(vec![]),
                None => Value::Null,
            };
            record.set(field.name.app_name.clone(), value);
        }

        record
    }
}

impl ModelId {
    /// Create a `FieldId` representing the current model's field at index
    /// `index`.
    pub const fn field(self, index: usize) -> FieldId {
        FieldId { model: self, index }
    }

    pub(crate) const fn placeholder() -> Self {
        Self(usize::MAX)
    }
}

impl From<&Self> for ModelId {
    fn from(src: &Self) -> Self {
        *src
    }
}

impl From<&Model> for ModelId {
    fn from(value: &Model) -> Self {
        value.id
    }
}

impl From<&Record> for ModelId {
    fn from(value: &Record) -> Self {
        value.model()
    }
}

impl fmt::Debug for ModelId {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "ModelId({})", self.0)
    }
}
