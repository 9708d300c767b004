mod adhoc;
mod construction;
mod invalid_schema;
mod invalid_value;
mod missing_store;
mod parse;
mod type_conversion;
mod unsupported_operation;

use adhoc::AdhocError;
use construction::ConstructionError;
use invalid_schema::InvalidSchema;
use invalid_value::InvalidValue;
use missing_store::MissingStore;
use parse::ParseError;
use std::sync::Arc;
use type_conversion::TypeConversionError;
use unsupported_operation::UnsupportedOperation;

/// Returns early with an ad hoc [`Error`] built from a format string.
#[macro_export]
macro_rules! bail {
    ($($arg:tt)*) => {
        return Err($crate::Error::from_args(format_args!($($arg)*)))
    };
}

/// Builds an ad hoc [`Error`] from a format string.
#[macro_export]
macro_rules! err {
    ($($arg:tt)*) => {
        $crate::Error::from_args(format_args!($($arg)*))
    };
}

/// An error that can occur while dumping or loading records.
#[derive(Clone)]
pub struct Error {
    inner: Option<Arc<ErrorInner>>,
}

#[derive(Debug)]
struct ErrorInner {
    kind: ErrorKind,
    cause: Option<Error>,
}

impl Error {
    /// Adds context to this error.
    ///
    /// Context is displayed in reverse order: the most recently added context is shown first,
    /// followed by earlier context, ending with the root cause.
    #[inline(always)]
    pub fn context(self, consequent: impl IntoError) -> Error {
        self.context_impl(consequent.into_error())
    }

    #[inline(never)]
    #[cold]
    fn context_impl(self, consequent: Error) -> Error {
        let mut err = consequent;

        if let Some(inner) = err.inner.as_mut().and_then(Arc::get_mut) {
            if inner.cause.is_none() {
                inner.cause = Some(self);
                return err;
            }
        }

        // A shared or already-caused consequent is re-created as a fresh node
        // of the same kind so the chain stays linear.
        Error {
            inner: Some(Arc::new(ErrorInner {
                kind: err.kind().duplicate(),
                cause: Some(self),
            })),
        }
    }

    /// Returns the error at the end of the cause chain.
    pub fn root(&self) -> &Error {
        self.chain().last().unwrap_or(self)
    }

    /// Returns the error this one wraps, if any.
    pub fn cause(&self) -> Option<&Error> {
        self.inner.as_ref().and_then(|inner| inner.cause.as_ref())
    }

    fn chain(&self) -> impl Iterator<Item = &Error> {
        let mut err = self;
        core::iter::once(err).chain(core::iter::from_fn(move || {
            err = err.inner.as_ref().and_then(|inner| inner.cause.as_ref())?;
            Some(err)
        }))
    }

    fn kind(&self) -> &ErrorKind {
        self.inner
            .as_ref()
            .map(|inner| &inner.kind)
            .unwrap_or(&ErrorKind::Unknown)
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self.kind() {
            ErrorKind::Anyhow(err) => Some(err.as_ref()),
            _ => self.cause().map(|cause| cause as _),
        }
    }
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        let mut it = self.chain().peekable();
        while let Some(err) = it.next() {
            core::fmt::Display::fmt(err.kind(), f)?;
            if it.peek().is_some() {
                f.write_str(": ")?;
            }
        }
        Ok(())
    }
}

impl core::fmt::Debug for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        if !f.alternate() {
            core::fmt::Display::fmt(self, f)
        } else {
            let Some(ref inner) = self.inner else {
                return f.debug_struct("Error").field("kind", &"None").finish();
            };
            f.debug_struct("Error")
                .field("kind", &inner.kind)
                .field("cause", &inner.cause)
                .finish()
        }
    }
}

#[derive(Debug)]
enum ErrorKind {
    Anyhow(anyhow::Error),
    Adhoc(AdhocError),
    Construction(ConstructionError),
    InvalidSchema(InvalidSchema),
    InvalidValue(InvalidValue),
    MissingStore(MissingStore),
    Parse(ParseError),
    TypeConversion(TypeConversionError),
    UnsupportedOperation(UnsupportedOperation),
    Unknown,
}

impl ErrorKind {
    /// Copies the kind. An `anyhow` error cannot be cloned and keeps only its
    /// message.
    fn duplicate(&self) -> ErrorKind {
        use self::ErrorKind::*;

        match self {
            Anyhow(err) => Adhoc(AdhocError::new(err.to_string())),
            Adhoc(err) => Adhoc(err.clone()),
            Construction(err) => Construction(err.clone()),
            InvalidSchema(err) => InvalidSchema(err.clone()),
            InvalidValue(err) => InvalidValue(err.clone()),
            MissingStore(err) => MissingStore(err.clone()),
            Parse(err) => Parse(err.clone()),
            TypeConversion(err) => TypeConversion(err.clone()),
            UnsupportedOperation(err) => UnsupportedOperation(err.clone()),
            Unknown => Unknown,
        }
    }
}

impl core::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        use self::ErrorKind::*;

        match self {
            Anyhow(err) => core::fmt::Display::fmt(err, f),
            Adhoc(err) => core::fmt::Display::fmt(err, f),
            Construction(err) => core::fmt::Display::fmt(err, f),
            InvalidSchema(err) => core::fmt::Display::fmt(err, f),
            InvalidValue(err) => core::fmt::Display::fmt(err, f),
            MissingStore(err) => core::fmt::Display::fmt(err, f),
            Parse(err) => core::fmt::Display::fmt(err, f),
            TypeConversion(err) => core::fmt::Display::fmt(err, f),
            UnsupportedOperation(err) => core::fmt::Display::fmt(err, f),
            Unknown => f.write_str("unknown tabula error"),
        }
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Error {
        Error {
            inner: Some(Arc::new(ErrorInner { kind, cause: None })),
        }
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Error {
        Error::from(ErrorKind::Anyhow(err))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Error {
        Error::from(anyhow::Error::from(err))
    }
}

/// Trait for types that can be converted into an Error.
pub trait IntoError {
    /// Converts this type into an Error.
    fn into_error(self) -> Error;
}

impl IntoError for Error {
    #[inline(always)]
    fn into_error(self) -> Error {
        self
    }
}
