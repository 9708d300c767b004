use crate::{Cx, Error, Json, Map, Record, Result, Schema, Value, Warning};

use std::sync::Arc;

/// Read-only field writing a fixed subset of the related record's
/// attributes.
#[derive(Debug)]
pub struct ProjectionField {
    schema: Arc<Schema>,
    attributes: Vec<String>,
}

impl ProjectionField {
    pub(crate) fn new(schema: Arc<Schema>, attributes: Vec<String>) -> Self {
        Self { schema, attributes }
    }

    /// A single record dumps as a mapping, a list of records as a list of
    /// mappings.
    pub(crate) fn dump(&self, value: &Value, cx: &mut Cx<'_>) -> Result<Json> {
        match value {
            Value::Record(record) => Ok(Json::Object(self.dump_item(record, cx))),
            Value::List(items) => items
                .iter()
                .map(|item| match item {
                    Value::Record(record) => Ok(Json::Object(self.dump_item(record, cx))),
                    _ => Err(Error::invalid_value(format!(
                        "expected a record, got {item:?}"
                    ))),
                })
                .collect::<Result<Vec<_>>>()
                .map(Json::Array),
            _ => Err(Error::invalid_value(format!(
                "expected a record or a list of records, got {value:?}"
            ))),
        }
    }

    fn dump_item(&self, record: &Record, cx: &mut Cx<'_>) -> Map {
        let mut out = Map::new();

        for name in &self.attributes {
            let value = match self.schema.read(record, name) {
                Some(value) => value.to_json(),
                None => {
                    cx.warn(Warning::MissingAttribute {
                        model: self.schema.model(record.model()).name.clone(),
                        field: name.clone(),
                    });
                    Json::Null
                }
            };
            out.insert(name.clone(), value);
        }

        out
    }
}
