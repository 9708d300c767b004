use crate::{Cx, Error, Json, Result, Schema, Value, Warning};
use tabula_core::schema::{Model, ModelId};

use std::sync::Arc;

/// Writes a relation as the primary key of each related record.
#[derive(Debug)]
pub struct PrimaryKeyField {
    schema: Arc<Schema>,
    target: ModelId,

    /// The target's key attribute
    key: String,
}

impl PrimaryKeyField {
    pub(crate) fn new(schema: Arc<Schema>, target: &Model) -> Result<Self> {
        let key = target.primary_key_field()?.name().to_string();

        Ok(Self {
            target: target.id,
            schema,
            key,
        })
    }

    /// A to-one relation dumps as one key, a to-many relation as a list of
    /// keys in relation order.
    pub(crate) fn dump(&self, value: &Value) -> Result<Json> {
        match value {
            Value::List(items) => items
                .iter()
                .map(|item| self.dump_key(item))
                .collect::<Result<Vec<_>>>()
                .map(Json::Array),
            value => self.dump_key(value),
        }
    }

    fn dump_key(&self, value: &Value) -> Result<Json> {
        match value {
            Value::Record(record) => Ok(self
                .schema
                .read(record, &self.key)
                .unwrap_or_default()
                .to_json()),
            Value::Null => Ok(Json::Null),
            _ => Err(Error::invalid_value(format!(
                "expected a `{}` record, got {value:?}",
                self.schema.model(self.target).name
            ))),
        }
    }

    /// A list of keys resolves through `Store::get_many`, a single key
    /// through `Store::get`. Missing records raise
    /// [`Warning::UnresolvedKeys`].
    pub(crate) fn load(&self, json: &Json, cx: &mut Cx<'_>) -> Result<Value> {
        let model = self.schema.model(self.target);
        let store = cx.require_store(&model.name)?;
        let key_ty = model.primary_key_field()?.column_ty();

        match json {
            Json::Array(items) => {
                let keys = items
                    .iter()
                    .map(|item| Value::from_json(item, key_ty))
                    .collect::<Result<Vec<_>>>()?;

                let records = store.get_many(model, &keys)?;

                if records.len() != keys.len() {
                    cx.warn(self.unresolved(model, keys.len(), records.len()));
                }

                Ok(Value::List(records.into_iter().map(Value::from).collect()))
            }
            json => {
                let key = Value::from_json(json, key_ty)?;

                match store.get(model, &key)? {
                    Some(record) => Ok(Value::from(record)),
                    None => {
                        cx.warn(self.unresolved(model, 1, 0));
                        Ok(Value::Null)
                    }
                }
            }
        }
    }

    fn unresolved(&self, model: &Model, requested: usize, found: usize) -> Warning {
        Warning::UnresolvedKeys {
            model: model.name.clone(),
            field: self.key.clone(),
            requested,
            found,
        }
    }
}
