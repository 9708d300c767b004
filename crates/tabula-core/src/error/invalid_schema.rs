use super::Error;

/// Error when a schema or serializer declaration is invalid.
///
/// This occurs when:
/// - A model is declared twice, or references an unknown parent or target
/// - A model has no primary key, or a nested field targets a composite key
/// - A discriminator column cannot be found among the model's fields
/// - A foreign key must be nested but has no relation to nest through
///
/// These errors are caught while building the schema or a serializer, never
/// during a dump or load.
#[derive(Debug, Clone)]
pub(super) struct InvalidSchema {
    message: Box<str>,
}

impl std::error::Error for InvalidSchema {}

impl core::fmt::Display for InvalidSchema {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "invalid schema: {}", self.message)
    }
}

impl Error {
    /// Creates an invalid schema error.
    pub fn invalid_schema(message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::InvalidSchema(InvalidSchema {
            message: message.into().into(),
        }))
    }

    /// Returns `true` if this error is an invalid schema error.
    pub fn is_invalid_schema(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::InvalidSchema(_))
    }
}
