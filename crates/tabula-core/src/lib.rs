mod error;
pub use error::{Error, IntoError};

pub mod schema;
pub use schema::Schema;

pub mod store;
pub use store::Store;

pub mod value;
pub use value::{Record, Type, Value};

/// A Result type alias that uses Tabula's [`Error`] type.
pub type Result<T> = core::result::Result<T, Error>;
