mod nested;
pub use nested::NestedField;

mod nested_list;
pub use nested_list::NestedListField;

mod primary_key;
pub use primary_key::PrimaryKeyField;

mod projection;
pub use projection::ProjectionField;

use crate::{
    codec::{Codec, CodecTable, DefaultCodec, EnumKeyCodec},
    Cx, Error, Json, ModelSerializer, RecordSerializer, Result, Schema, Type, Value,
};
use tabula_core::schema::Model;

use std::sync::Arc;

/// Declares how one attribute is dumped and loaded.
///
/// A plain field uses a codec chosen from the column type. The other kinds
/// reach into related records.
#[derive(Debug, Clone, Default)]
pub struct Field {
    dump_only: bool,
    load_only: bool,
    creation_only: bool,
    kind: Kind,
}

#[derive(Debug, Clone)]
enum Kind {
    Plain(CodecChoice),
    PrimaryKey {
        target: String,
    },
    Nested {
        target: String,
        serializer: Option<Arc<dyn RecordSerializer>>,
    },
    NestedList {
        target: String,
        serializer: Option<Arc<dyn RecordSerializer>>,
    },
    Projection {
        attributes: Vec<String>,
    },
}

#[derive(Debug, Clone, Default)]
enum CodecChoice {
    /// Resolved from the column type through the serializer's codec table
    #[default]
    Auto,
    Custom(Arc<dyn Codec>),
    EnumKey,
}

impl Default for Kind {
    fn default() -> Self {
        Self::Plain(CodecChoice::Auto)
    }
}

impl Field {
    /// A plain field with a codec chosen from the column type.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_codec(codec: Arc<dyn Codec>) -> Self {
        Self::with_kind(Kind::Plain(CodecChoice::Custom(codec)))
    }

    /// An enum column written by member name instead of value.
    pub fn enum_key() -> Self {
        Self::with_kind(Kind::Plain(CodecChoice::EnumKey))
    }

    /// A relation written as the primary key(s) of the related record(s).
    pub fn primary_key(target: impl Into<String>) -> Self {
        Self::with_kind(Kind::PrimaryKey {
            target: target.into(),
        })
    }

    /// A to-one relation written inline as a nested mapping.
    pub fn nested(target: impl Into<String>) -> Self {
        Self::with_kind(Kind::Nested {
            target: target.into(),
            serializer: None,
        })
    }

    /// A to-many relation written inline as a list of nested mappings.
    pub fn nested_list(target: impl Into<String>) -> Self {
        Self::with_kind(Kind::NestedList {
            target: target.into(),
            serializer: None,
        })
    }

    /// A read-only field writing the named attributes of the related
    /// record(s).
    pub fn projection<I, S>(attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut field = Self::with_kind(Kind::Projection {
            attributes: attributes.into_iter().map(Into::into).collect(),
        });
        field.dump_only = true;
        field
    }

    /// Excluded from load.
    pub fn dump_only(mut self) -> Self {
        self.dump_only = true;
        self
    }

    /// Excluded from dump.
    pub fn load_only(mut self) -> Self {
        self.load_only = true;
        self
    }

    /// Loaded only when the load creates a record. Has no effect on a
    /// dump-only field.
    pub fn creation_only(mut self) -> Self {
        self.creation_only = true;
        self
    }

    /// Serializer used for the records of a nested field, in place of a
    /// plain [`ModelSerializer`] for the target.
    pub fn serializer(mut self, serializer: Arc<dyn RecordSerializer>) -> Self {
        match &mut self.kind {
            Kind::Nested { serializer: slot, .. } | Kind::NestedList { serializer: slot, .. } => {
                *slot = Some(serializer);
            }
            _ => {
                tracing::warn!("serializer override ignored on a field that is not nested");
            }
        }
        self
    }

    pub fn is_dump_only(&self) -> bool {
        self.dump_only
    }

    pub fn is_load_only(&self) -> bool {
        self.load_only
    }

    pub fn is_creation_only(&self) -> bool {
        self.creation_only
    }

    fn with_kind(kind: Kind) -> Self {
        Self {
            kind,
            ..Self::default()
        }
    }

    /// Resolves the field against the model it is declared on.
    pub(crate) fn bind(
        &self,
        schema: &Arc<Schema>,
        model: &Model,
        name: &str,
        codecs: &CodecTable,
    ) -> Result<BoundField> {
        let kind = match &self.kind {
            Kind::Plain(choice) => Bound::Codec(bind_codec(choice, model, name, codecs)?),
            Kind::PrimaryKey { target } => {
                Bound::PrimaryKey(PrimaryKeyField::new(schema.clone(), schema.resolve(target)?)?)
            }
            Kind::Nested { target, serializer } => {
                let serializer = nested_serializer(schema, target, serializer)?;
                Bound::Nested(NestedField::new(serializer)?)
            }
            Kind::NestedList { target, serializer } => {
                let serializer = nested_serializer(schema, target, serializer)?;
                Bound::NestedList(NestedListField::new(serializer)?)
            }
            Kind::Projection { attributes } => {
                Bound::Projection(ProjectionField::new(schema.clone(), attributes.clone()))
            }
        };

        Ok(BoundField {
            name: name.to_string(),
            dump_only: self.dump_only,
            load_only: self.load_only,
            creation_only: self.creation_only,
            kind,
        })
    }
}

/// The declared type of an attribute: a column type, or a property type.
fn attribute_ty<'a>(model: &'a Model, name: &str) -> Option<&'a Type> {
    match model.field_by_name(name) {
        Some(field) => field.column_ty(),
        None => model.property(name).map(|property| &property.ty),
    }
}

fn bind_codec(
    choice: &CodecChoice,
    model: &Model,
    name: &str,
    codecs: &CodecTable,
) -> Result<Arc<dyn Codec>> {
    let ty = attribute_ty(model, name);

    Ok(match choice {
        CodecChoice::Custom(codec) => codec.clone(),
        CodecChoice::Auto => match ty {
            Some(ty) => codecs.resolve(ty),
            None => Arc::new(DefaultCodec::untyped()),
        },
        CodecChoice::EnumKey => match ty.and_then(Type::as_enum) {
            Some(ty_enum) => Arc::new(EnumKeyCodec::new(ty_enum.clone())),
            None => {
                return Err(Error::invalid_schema(format!(
                    "`{}.{name}` is not an enum column",
                    model.name
                )))
            }
        },
    })
}

fn nested_serializer(
    schema: &Arc<Schema>,
    target: &str,
    serializer: &Option<Arc<dyn RecordSerializer>>,
) -> Result<Arc<dyn RecordSerializer>> {
    match serializer {
        Some(serializer) => Ok(serializer.clone()),
        None => Ok(Arc::new(ModelSerializer::builder(schema, target).build()?)),
    }
}

/// A field resolved against its model, ready to dump and load.
#[derive(Debug)]
pub struct BoundField {
    name: String,
    dump_only: bool,
    load_only: bool,
    creation_only: bool,
    kind: Bound,
}

#[derive(Debug)]
enum Bound {
    Codec(Arc<dyn Codec>),
    PrimaryKey(PrimaryKeyField),
    Nested(NestedField),
    NestedList(NestedListField),
    Projection(ProjectionField),
}

impl BoundField {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_dump_only(&self) -> bool {
        self.dump_only
    }

    pub fn is_load_only(&self) -> bool {
        self.load_only
    }

    pub fn is_creation_only(&self) -> bool {
        self.creation_only
    }

    /// Dumps one attribute value. `null` short-circuits before any codec
    /// runs; an absent nested list dumps as `[]`.
    pub fn dump(&self, value: &Value, cx: &mut Cx<'_>) -> Result<Json> {
        if value.is_null() {
            return Ok(match self.kind {
                Bound::NestedList(_) => Json::Array(vec![]),
                _ => Json::Null,
            });
        }

        match &self.kind {
            Bound::Codec(codec) => codec.dump(value),
            Bound::PrimaryKey(field) => field.dump(value),
            Bound::Nested(field) => field.dump(value, cx),
            Bound::NestedList(field) => field.dump(value, cx),
            Bound::Projection(field) => field.dump(value, cx),
        }
    }

    /// Loads one attribute value. `null` short-circuits; a nested field also
    /// treats `{}` as `null` and a nested list treats `null` as `[]`.
    pub fn load(&self, json: &Json, cx: &mut Cx<'_>) -> Result<Value> {
        match &self.kind {
            Bound::Projection(_) => Err(Error::unsupported_operation(format!(
                "load through projection field `{}`",
                self.name
            ))),
            Bound::NestedList(_) if is_empty(json) => Ok(Value::List(vec![])),
            Bound::Nested(_) if is_empty(json) => Ok(Value::Null),
            _ if json.is_null() => Ok(Value::Null),
            Bound::Codec(codec) => codec.load(json, cx),
            Bound::PrimaryKey(field) => field.load(json, cx),
            Bound::Nested(field) => field.load(json, cx),
            Bound::NestedList(field) => field.load(json, cx),
        }
    }
}

fn is_empty(json: &Json) -> bool {
    match json {
        Json::Null => true,
        Json::Array(items) => items.is_empty(),
        Json::Object(map) => map.is_empty(),
        _ => false,
    }
}
