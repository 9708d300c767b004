use crate::{Map, ModelSerializer, Record, RecordSerializer, Result, Schema};

use std::sync::Arc;

/// Dumps a record with a throw-away serializer for its runtime model.
///
/// With `nest_foreign_keys`, foreign-key columns are written as nested
/// mappings of the related records.
pub fn dump(schema: &Arc<Schema>, record: &Record, nest_foreign_keys: bool) -> Result<Map> {
    let model = &schema.model(record.model()).name;

    ModelSerializer::builder(schema, model.as_str())
        .nest_foreign_keys(nest_foreign_keys)
        .build()?
        .dump(record)
}

/// Loads a new record of `model` with a throw-away serializer.
///
/// No store is available, so nested input carrying a key fails with a
/// missing-store error.
pub fn load(
    schema: &Arc<Schema>,
    data: &Map,
    model: &str,
    nest_foreign_keys: bool,
) -> Result<Record> {
    ModelSerializer::builder(schema, model)
        .nest_foreign_keys(nest_foreign_keys)
        .build()?
        .load(data, None, None)
}
