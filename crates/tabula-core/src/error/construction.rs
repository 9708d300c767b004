use super::Error;

/// Error when a model's constructor rejects the values assembled by a load.
///
/// The constructor's own error is kept as the cause, so the displayed message
/// reads `failed to construct `Model`: <cause>`.
#[derive(Debug, Clone)]
pub(super) struct ConstructionError {
    model: Box<str>,
}

impl std::error::Error for ConstructionError {}

impl core::fmt::Display for ConstructionError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "failed to construct `{}`", self.model)
    }
}

impl Error {
    /// Creates a construction error for the named model.
    ///
    /// Usually attached as context: `cause.context(Error::construction(name))`.
    pub fn construction(model: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::Construction(ConstructionError {
            model: model.into().into(),
        }))
    }

    /// Returns `true` if this error is a construction error.
    pub fn is_construction(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::Construction(_))
    }
}
