use super::NestedField;
use crate::{Cx, Error, Json, RecordSerializer, Result, Value};

use std::sync::Arc;

/// Writes a to-many relation inline, one nested mapping per record.
///
/// Each item follows the [`NestedField`] create-or-update rule.
#[derive(Debug)]
pub struct NestedListField {
    item: NestedField,
}

impl NestedListField {
    pub(crate) fn new(serializer: Arc<dyn RecordSerializer>) -> Result<Self> {
        Ok(Self {
            item: NestedField::new(serializer)?,
        })
    }

    pub(crate) fn dump(&self, value: &Value, cx: &mut Cx<'_>) -> Result<Json> {
        match value {
            Value::List(items) => items
                .iter()
                .map(|item| self.item.dump(item, cx))
                .collect::<Result<Vec<_>>>()
                .map(Json::Array),
            _ => Err(Error::invalid_value(format!(
                "expected a list of records, got {value:?}"
            ))),
        }
    }

    pub(crate) fn load(&self, json: &Json, cx: &mut Cx<'_>) -> Result<Value> {
        let Json::Array(items) = json else {
            return Err(Error::type_conversion(json, "List"));
        };

        let mut records = Vec::with_capacity(items.len());

        for item in items {
            let Json::Object(data) = item else {
                return Err(Error::type_conversion(item, "Record"));
            };
            records.push(Value::from(self.item.load_item(data, cx)?));
        }

        Ok(Value::List(records))
    }
}
