use crate::{Error, Result, Store, Warning};

/// State threaded through a single dump or load call.
///
/// Holds the record store used to resolve references, and collects the
/// non-fatal warnings raised along the way.
#[derive(Debug, Default)]
pub struct Cx<'a> {
    store: Option<&'a dyn Store>,
    warnings: Vec<Warning>,
}

impl<'a> Cx<'a> {
    pub fn new(store: Option<&'a dyn Store>) -> Self {
        Self {
            store,
            warnings: vec![],
        }
    }

    pub fn with_store(store: &'a dyn Store) -> Self {
        Self::new(Some(store))
    }

    /// Returns the store, failing when the call was made without one.
    /// `model` names the record that needed it.
    pub fn require_store(&self, model: &str) -> Result<&'a dyn Store> {
        self.store.ok_or_else(|| Error::missing_store(model))
    }

    /// Logs the warning and keeps it for the caller.
    pub fn warn(&mut self, warning: Warning) {
        warning.log();
        self.warnings.push(warning);
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    pub fn into_warnings(self) -> Vec<Warning> {
        self.warnings
    }
}
