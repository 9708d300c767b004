use super::Error;

/// Error when a transport string does not match the expected grammar.
#[derive(Debug, Clone)]
pub(super) struct ParseError {
    what: &'static str,
    input: Box<str>,
}

impl std::error::Error for ParseError {}

impl core::fmt::Display for ParseError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "could not parse {}: '{}'", self.what, self.input)
    }
}

impl Error {
    /// Creates a parse error. `what` names the expected grammar, e.g. `DateTime`.
    pub fn parse(what: &'static str, input: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::Parse(ParseError {
            what,
            input: input.into().into(),
        }))
    }

    /// Returns `true` if this error is a parse error.
    pub fn is_parse(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::Parse(_))
    }
}
