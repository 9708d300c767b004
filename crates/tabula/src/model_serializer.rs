use crate::{
    BoundField, CodecTable, Cx, Declaration, Error, Field, Map, Record, RecordSerializer, Result,
    Schema, Value, Warning,
};
use tabula_core::schema::{Model, ModelId};

use indexmap::IndexMap;
use std::sync::Arc;

/// Dumps and loads records of one model.
///
/// Fields are the declared ones first, then one field per remaining column
/// in schema order. Columns whose name starts with `_` are protected and
/// only serialized when declared. Every codec is resolved when the
/// serializer is built; afterwards it is immutable.
#[derive(Debug)]
pub struct ModelSerializer {
    schema: Arc<Schema>,
    model: ModelId,
    fields: IndexMap<String, BoundField>,
}

/// Configures a [`ModelSerializer`].
#[derive(Debug)]
pub struct Builder {
    schema: Arc<Schema>,
    model: String,
    declaration: Declaration,
}

impl ModelSerializer {
    pub fn builder(schema: &Arc<Schema>, model: impl Into<String>) -> Builder {
        Builder {
            schema: schema.clone(),
            model: model.into(),
            declaration: Declaration::default(),
        }
    }

    /// A serializer with only derived fields.
    pub fn new(schema: &Arc<Schema>, model: &str) -> Result<Self> {
        Self::builder(schema, model).build()
    }

    pub(crate) fn from_declaration(
        schema: &Arc<Schema>,
        model: &Model,
        declaration: &Declaration,
    ) -> Result<Self> {
        let default_codecs;
        let codecs = match &declaration.codecs {
            Some(codecs) => codecs,
            None => {
                default_codecs = CodecTable::standard();
                &default_codecs
            }
        };

        let mut fields = IndexMap::new();

        for (name, field) in &declaration.fields {
            fields.insert(name.clone(), field.bind(schema, model, name, codecs)?);
        }

        for column in &model.fields {
            let name = column.name();

            if !column.is_column() || name.starts_with('_') || fields.contains_key(name) {
                continue;
            }

            if declaration.nest_foreign_keys {
                if let Some(foreign_key) = column.foreign_key() {
                    let Some(relation) = foreign_key.relation else {
                        return Err(Error::invalid_schema(format!(
                            "foreign key `{}.{name}` has no relation to nest",
                            model.name
                        )));
                    };

                    let relation = model.field(relation).name();
                    if !fields.contains_key(relation) {
                        let target = &schema.model(foreign_key.target).name;
                        let field = Field::nested(target.as_str());
                        fields.insert(
                            relation.to_string(),
                            field.bind(schema, model, relation, codecs)?,
                        );
                    }
                    continue;
                }
            }

            fields.insert(
                name.to_string(),
                Field::new().bind(schema, model, name, codecs)?,
            );
        }

        tracing::debug!(model = %model.name, fields = fields.len(), "serializer built");

        Ok(Self {
            schema: schema.clone(),
            model: model.id,
            fields,
        })
    }

    pub fn model_name(&self) -> &str {
        &self.schema.model(self.model).name
    }

    pub fn fields(&self) -> impl Iterator<Item = &BoundField> {
        self.fields.values()
    }

    pub fn field(&self, name: &str) -> Option<&BoundField> {
        self.fields.get(name)
    }

    /// Creates a record from staged values, through the model's constructor
    /// when it has one.
    fn create(&self, staged: IndexMap<String, Value>) -> Result<Record> {
        let model = self.schema.model(self.model);

        let Some(constructor) = &model.constructor else {
            let mut record = model.instantiate();
            assign(&mut record, staged);
            return Ok(record);
        };

        let (args, rest): (IndexMap<_, _>, IndexMap<_, _>) = staged
            .into_iter()
            .partition(|(name, _)| constructor.accepts(name));

        let mut record = constructor
            .construct(model, args)
            .map_err(|err| err.context(Error::construction(model.name.as_str())))?;

        assign(&mut record, rest);
        Ok(record)
    }
}

fn assign(record: &mut Record, values: IndexMap<String, Value>) {
    for (name, value) in values {
        record.set(name, value);
    }
}

impl RecordSerializer for ModelSerializer {
    fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    fn model(&self) -> ModelId {
        self.model
    }

    fn dump_with(&self, record: &Record, cx: &mut Cx<'_>) -> Result<Map> {
        let mut out = Map::new();

        for (name, field) in &self.fields {
            if field.is_load_only() {
                continue;
            }

            let value = match self.schema.read(record, name) {
                Some(value) => value,
                None => {
                    cx.warn(Warning::MissingAttribute {
                        model: self.schema.model(record.model()).name.clone(),
                        field: name.clone(),
                    });
                    Value::Null
                }
            };

            out.insert(name.clone(), field.dump(&value, cx)?);
        }

        Ok(out)
    }

    fn load_with(&self, data: &Map, existing: Option<Record>, cx: &mut Cx<'_>) -> Result<Record> {
        let updating = existing.is_some();
        let mut staged = IndexMap::new();

        for (name, json) in data {
            let Some(field) = self.fields.get(name) else {
                cx.warn(Warning::UnknownField {
                    model: self.model_name().to_string(),
                    field: name.clone(),
                });
                continue;
            };

            if field.is_dump_only() || (updating && field.is_creation_only()) {
                continue;
            }

            staged.insert(name.clone(), field.load(json, cx)?);
        }

        match existing {
            Some(mut record) => {
                assign(&mut record, staged);
                Ok(record)
            }
            None => self.create(staged),
        }
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

    /// Layers a declaration over what was configured so far.
    pub fn declaration(mut self, declaration: &Declaration) -> Self {
        self.declaration = self.declaration.merge(declaration);
        self
    }

    pub fn build(self) -> Result<ModelSerializer> {
        let model = self.schema.resolve(&self.model)?;
        ModelSerializer::from_declaration(&self.schema, model, &self.declaration)
    }
}
