use super::Error;

/// Error when a nested or primary-key field must reach the record store but
/// the load was started without one.
#[derive(Debug, Clone)]
pub(super) struct MissingStore {
    model: Box<str>,
}

impl std::error::Error for MissingStore {}

impl core::fmt::Display for MissingStore {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "a record store is required to load nested `{}`",
            self.model
        )
    }
}

impl Error {
    /// Creates a missing store error naming the model that needed a lookup.
    pub fn missing_store(model: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::MissingStore(MissingStore {
            model: model.into().into(),
        }))
    }

    /// Returns `true` if this error is a missing store error.
    pub fn is_missing_store(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::MissingStore(_))
    }
}
