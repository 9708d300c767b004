use super::Error;

/// Error when a value is well-formed but outside the declared set, such as an
/// enum value or name that matches no variant.
#[derive(Debug, Clone)]
pub(super) struct InvalidValue {
    message: Box<str>,
}

impl std::error::Error for InvalidValue {}

impl core::fmt::Display for InvalidValue {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.write_str(&self.message)
    }
}

impl Error {
    /// Creates an invalid value error.
    pub fn invalid_value(message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::InvalidValue(InvalidValue {
            message: message.into().into(),
        }))
    }

    /// Returns `true` if this error is an invalid value error.
    pub fn is_invalid_value(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::InvalidValue(_))
    }
}
