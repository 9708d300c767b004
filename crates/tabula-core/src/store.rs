mod memory;
pub use memory::Memory;

use crate::{schema::Model, value::Record, Result, Value};
use std::fmt::Debug;

/// Resolves records by primary key.
///
/// Lookups against a base model also match records of its subtypes.
pub trait Store: Debug {
    /// Returns the record of `model` whose key equals `key`, if any.
    fn get(&self, model: &Model, key: &Value) -> Result<Option<Record>>;

    /// Returns every record of `model` whose key is in `keys`. Keys without a
    /// record are skipped, so the result may be shorter than `keys`.
    fn get_many(&self, model: &Model, keys: &[Value]) -> Result<Vec<Record>>;
}
