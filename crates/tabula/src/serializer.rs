use crate::{Cx, Map, Record, Result, Schema, Store};
use tabula_core::schema::ModelId;

use std::{fmt, sync::Arc};

/// Dumps records of one model to mappings and loads them back.
///
/// Implemented by [`ModelSerializer`](crate::ModelSerializer) and
/// [`PolymorphicSerializer`](crate::PolymorphicSerializer). Nested fields
/// hold an `Arc<dyn RecordSerializer>`, so a nested relation may itself be
/// polymorphic.
pub trait RecordSerializer: fmt::Debug + Send + Sync {
    fn schema(&self) -> &Arc<Schema>;

    /// The model the serializer is bound to.
    fn model(&self) -> ModelId;

    fn dump_with(&self, record: &Record, cx: &mut Cx<'_>) -> Result<Map>;

    /// Loads `data` onto `existing`, or into a new record when `existing` is
    /// `None`.
    fn load_with(&self, data: &Map, existing: Option<Record>, cx: &mut Cx<'_>) -> Result<Record>;

    fn dump(&self, record: &Record) -> Result<Map> {
        self.dump_with(record, &mut Cx::default())
    }

    fn load(
        &self,
        data: &Map,
        existing: Option<Record>,
        store: Option<&dyn Store>,
    ) -> Result<Record> {
        self.load_with(data, existing, &mut Cx::new(store))
    }
}
