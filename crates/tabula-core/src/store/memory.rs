use super::Store;
use crate::{
    schema::{Model, ModelId},
    value::Record,
    Result, Schema, Value,
};

use indexmap::IndexMap;
use std::sync::Arc;

/// An in-memory [`Store`], grouping records by runtime model.
#[derive(Debug)]
pub struct Memory {
    schema: Arc<Schema>,
    records: IndexMap<ModelId, Vec<Record>>,
}

impl Memory {
    pub fn new(schema: Arc<Schema>) -> Self {
        Self {
            schema,
            records: IndexMap::new(),
        }
    }

    /// Adds a record, replacing any record of the same model with the same
    /// key.
    pub fn insert(&mut self, record: Record) -> Result<()> {
        let pk = self.schema.model(record.model()).primary_key_field()?;
        let key = record.get(pk.name()).cloned().unwrap_or_default();
        let records = self.records.entry(record.model()).or_default();

        match records
            .iter_mut()
            .find(|existing| existing.get(pk.name()) == Some(&key))
        {
            Some(existing) => *existing = record,
            None => records.push(record),
        }

        Ok(())
    }

    pub fn len(&self) -> usize {
        self.records.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Records of `model` and its subtypes.
    fn matching<'a>(&'a self, model: &'a Model) -> impl Iterator<Item = &'a Record> + 'a {
        self.records
            .iter()
            .filter(move |(id, _)| self.schema.is_a(**id, model.id))
            .flat_map(|(_, records)| records.iter())
    }
}

impl Store for Memory {
    fn get(&self, model: &Model, key: &Value) -> Result<Option<Record>> {
        let pk = model.primary_key_field()?;

        Ok(self
            .matching(model)
            .find(|record| record.get(pk.name()) == Some(key))
            .cloned())
    }

    fn get_many(&self, model: &Model, keys: &[Value]) -> Result<Vec<Record>> {
        let pk = model.primary_key_field()?;

        Ok(self
            .matching(model)
            .filter(|record| {
                record
                    .get(pk.name())
                    .is_some_and(|value| keys.contains(value))
            })
            .cloned()
            .collect())
    }
}
