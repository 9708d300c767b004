use crate::{Cx, Error, Json, Map, RecordSerializer, Result, Value};
use tabula_core::schema::Model;

use std::sync::Arc;

/// Writes a to-one relation inline through a nested serializer.
///
/// Loading input that carries the target's key updates the stored record
/// with that key; other input creates a new record.
#[derive(Debug)]
pub struct NestedField {
    serializer: Arc<dyn RecordSerializer>,

    /// Key attribute of the nested serializer's own model. In an inheritance
    /// chain this may differ from any ancestor's key.
    key: String,
}

impl NestedField {
    pub(crate) fn new(serializer: Arc<dyn RecordSerializer>) -> Result<Self> {
        let model = serializer.schema().model(serializer.model());
        let key = model.primary_key_field()?.name().to_string();

        Ok(Self { serializer, key })
    }

    pub(crate) fn dump(&self, value: &Value, cx: &mut Cx<'_>) -> Result<Json> {
        match value {
            Value::Record(record) => Ok(Json::Object(self.serializer.dump_with(record, cx)?)),
            _ => Err(Error::invalid_value(format!(
                "expected a `{}` record, got {value:?}",
                self.model().name
            ))),
        }
    }

    pub(crate) fn load(&self, json: &Json, cx: &mut Cx<'_>) -> Result<Value> {
        match json {
            Json::Object(data) => self.load_item(data, cx).map(Value::from),
            _ => Err(Error::type_conversion(json, "Record")),
        }
    }

    pub(crate) fn load_item(&self, data: &Map, cx: &mut Cx<'_>) -> Result<crate::Record> {
        let existing = match data.get(&self.key) {
            Some(key) if !key.is_null() => {
                let model = self.model();
                let store = cx.require_store(&model.name)?;
                let key_ty = model.primary_key_field()?.column_ty();
                let key = Value::from_json(key, key_ty)?;

                let existing = store.get(model, &key)?;

                tracing::trace!(
                    model = %model.name,
                    found = existing.is_some(),
                    "nested record looked up by key"
                );

                existing
            }
            _ => None,
        };

        self.serializer.load_with(data, existing, cx)
    }

    fn model(&self) -> &Model {
        self.serializer.schema().model(self.serializer.model())
    }
}
