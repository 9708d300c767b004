use super::Model;
use crate::value::{Record, Value};
use crate::Result;

use indexmap::IndexMap;
use std::{fmt, sync::Arc};

type BuildFn = dyn Fn(&Model, IndexMap<String, Value>) -> Result<Record> + Send + Sync;

/// A model constructor taking named arguments.
///
/// When a load creates a record, staged values whose names appear in
/// `params` are passed as arguments; the remaining ones are assigned to the
/// returned record afterwards.
#[derive(Clone)]
pub struct Constructor {
    pub params: Vec<String>,
    build: Arc<BuildFn>,
}

impl Constructor {
    pub fn new<I, S>(
        params: I,
        build: impl Fn(&Model, IndexMap<String, Value>) -> Result<Record> + Send + Sync + 'static,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            params: params.into_iter().map(Into::into).collect(),
            build: Arc::new(build),
        }
    }

    pub fn accepts(&self, name: &str) -> bool {
        self.params.iter().any(|param| param == name)
    }

    pub fn construct(&self, model: &Model, args: IndexMap<String, Value>) -> Result<Record> {
        (self.build)(model, args)
    }
}

impl fmt::Debug for Constructor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Constructor")
            .field("params", &self.params)
            .finish()
    }
}
