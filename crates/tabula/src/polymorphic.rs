use crate::{
    CodecTable, Cx, Declaration, Error, Field, Json, Map, ModelSerializer, Record,
    RecordSerializer, Result, Schema, Value,
};
use tabula_core::schema::{Model, ModelId};

use indexmap::IndexMap;
use std::{fmt, sync::Arc};

/// Serializer for a model hierarchy, dispatching each call to the serializer
/// of the record's concrete subtype.
///
/// A model with a discriminator and identified descendants is polymorphic:
/// every descendant with an identity, grandchildren included, gets its own
/// serializer keyed by that identity. `dump` dispatches on the record's runtime model, `load` on the
/// discriminator attribute of the input. Both fall back to the serializer of
/// the bound model.
#[derive(Debug)]
pub struct PolymorphicSerializer {
    base: ModelSerializer,

    /// Attribute name of the discriminator, when polymorphic
    discriminator: Option<String>,

    subtypes: IndexMap<Identity, Arc<PolymorphicSerializer>>,
}

/// The normalized form of a discriminator value. Enum identities are
/// reduced to their underlying value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Identity {
    Bool(bool),
    Int(i64),
    String(String),
}

/// Configures a [`PolymorphicSerializer`].
#[derive(Debug)]
pub struct Builder {
    schema: Arc<Schema>,
    model: String,
    declaration: Declaration,
    subtypes: IndexMap<String, Declaration>,
}

impl PolymorphicSerializer {
    pub fn builder(schema: &Arc<Schema>, model: impl Into<String>) -> Builder {
        Builder {
            schema: schema.clone(),
            model: model.into(),
            declaration: Declaration::default(),
            subtypes: IndexMap::new(),
        }
    }

    pub fn new(schema: &Arc<Schema>, model: &str) -> Result<Self> {
        Self::builder(schema, model).build()
    }

    fn build_for(
        schema: &Arc<Schema>,
        model: &Model,
        declaration: &Declaration,
        root: &Declaration,
        overrides: &IndexMap<ModelId, Declaration>,
    ) -> Result<Self> {
        let base = ModelSerializer::from_declaration(schema, model, declaration)?;

        let Some(discriminator) = schema.discriminator_field(model) else {
            return Ok(Self {
                base,
                discriminator: None,
                subtypes: IndexMap::new(),
            });
        };

        let mut subtypes = IndexMap::new();

        for id in schema.descendants(model) {
            let descendant = schema.model(id);

            let Some(identity) = descendant.polymorphic_identity() else {
                tracing::trace!(model = %descendant.name, "descendant without identity skipped");
                continue;
            };

            let identity = Identity::from_value(&identity).ok_or_else(|| {
                Error::invalid_schema(format!(
                    "unsupported polymorphic identity {identity:?} on `{}`",
                    descendant.name
                ))
            })?;

            // A subtype override is layered over the root declaration;
            // otherwise the subtype inherits this level's declaration.
            let sub_declaration = match overrides.get(&id) {
                Some(declaration) => root.merge(declaration),
                None => declaration.clone(),
            };

            let serializer = Self::build_for(schema, descendant, &sub_declaration, root, overrides)?;
            subtypes.insert(identity, Arc::new(serializer));
        }

        tracing::debug!(
            model = %model.name,
            subtypes = subtypes.len(),
            "polymorphic registry built"
        );

        Ok(Self {
            base,
            discriminator: Some(discriminator.name().to_string()),
            subtypes,
        })
    }

    /// `true` when the model has identified subtypes to dispatch to. A leaf
    /// of a hierarchy is not polymorphic even though it has a discriminator.
    pub fn is_polymorphic(&self) -> bool {
        self.discriminator.is_some() && !self.subtypes.is_empty()
    }

    /// Attribute name carrying the subtype tag.
    pub fn discriminator(&self) -> Option<&str> {
        self.discriminator.as_deref()
    }

    pub fn model_name(&self) -> &str {
        self.base.model_name()
    }

    pub fn subtype(&self, identity: &Identity) -> Option<&Arc<PolymorphicSerializer>> {
        self.subtypes.get(identity)
    }

    pub fn subtypes(&self) -> impl Iterator<Item = (&Identity, &Arc<PolymorphicSerializer>)> {
        self.subtypes.iter()
    }

    fn dispatch_dump(&self, record: &Record) -> Option<&PolymorphicSerializer> {
        self.discriminator.as_ref()?;

        let runtime = self.base.schema().model(record.model());
        let identity = Identity::from_value(&runtime.polymorphic_identity()?)?;
        let serializer = self.subtypes.get(&identity)?;

        tracing::trace!(from = %self.model_name(), to = %serializer.model_name(), %identity, "dump dispatched");
        Some(serializer)
    }

    fn dispatch_load(&self, data: &Map) -> Option<&PolymorphicSerializer> {
        let discriminator = self.discriminator.as_ref()?;
        let identity = Identity::from_json(data.get(discriminator)?)?;
        let serializer = self.subtypes.get(&identity)?;

        tracing::trace!(from = %self.model_name(), to = %serializer.model_name(), %identity, "load dispatched");
        Some(serializer)
    }
}

impl RecordSerializer for PolymorphicSerializer {
    fn schema(&self) -> &Arc<Schema> {
        self.base.schema()
    }

    fn model(&self) -> ModelId {
        self.base.model()
    }

    fn dump_with(&self, record: &Record, cx: &mut Cx<'_>) -> Result<Map> {
        match self.dispatch_dump(record) {
            Some(serializer) => serializer.dump_with(record, cx),
            None => self.base.dump_with(record, cx),
        }
    }

    fn load_with(&self, data: &Map, existing: Option<Record>, cx: &mut Cx<'_>) -> Result<Record> {
        match self.dispatch_load(data) {
            Some(serializer) => serializer.load_with(data, existing, cx),
            None => self.base.load_with(data, existing, cx),
        }
    }
}

impl Identity {
    /// Normalizes a discriminator value. Returns `None` for values that
    /// cannot identify a subtype.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(v) => Some(Self::Bool(*v)),
            Value::I64(v) => Some(Self::Int(*v)),
            Value::String(v) => Some(Self::String(v.clone())),
            Value::Enum(member) => Self::from_value(&member.value),
            _ => None,
        }
    }

    pub fn from_json(json: &Json) -> Option<Self> {
        match json {
            Json::Bool(v) => Some(Self::Bool(*v)),
            Json::Number(v) => v.as_i64().map(Self::Int),
            Json::String(v) => Some(Self::String(v.clone())),
            _ => None,
        }
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(v) => v.fmt(f),
            Self::Int(v) => v.fmt(f),
            Self::String(v) => v.fmt(f),
        }
    }
}

impl From<&str> for Identity {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<i64> for Identity {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl Builder {
    pub fn field(mut self, name: impl Into<String>, field: Field) -> Self {
        self.declaration = self.declaration.field(name, field);
        self
    }

    pub fn nest_foreign_keys(mut self, nest: bool) -> Self {
        self.declaration = self.declaration.nest_foreign_keys(nest);
        self
    }

    pub fn codecs(mut self, codecs: CodecTable) -> Self {
        self.declaration = self.declaration.codecs(codecs);
        self
    }

    pub fn declaration(mut self, declaration: &Declaration) -> Self {
        self.declaration = self.declaration.merge(declaration);
        self
    }

    /// Registers a declaration for one descendant model. It is layered over
    /// the base declaration when that descendant's serializer is built.
    pub fn subtype(mut self, model: impl Into<String>, declaration: Declaration) -> Self {
        self.subtypes.insert(model.into(), declaration);
        self
    }

    pub fn build(self) -> Result<PolymorphicSerializer> {
        let model = self.schema.resolve(&self.model)?;

        let mut overrides = IndexMap::new();
        for (name, declaration) in self.subtypes {
            let subtype = self.schema.resolve(&name)?;

            if !self.schema.is_a(subtype, model) || subtype.id == model.id {
                return Err(Error::invalid_schema(format!(
                    "`{name}` is not a subtype of `{}`",
                    model.name
                )));
            }

            overrides.insert(subtype.id, declaration);
        }

        PolymorphicSerializer::build_for(
            &self.schema,
            model,
            &self.declaration,
            &self.declaration,
            &overrides,
        )
    }
}
