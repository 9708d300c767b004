pub mod codec;
pub use codec::{Codec, CodecTable};

mod cx;
pub use cx::Cx;

mod declaration;
pub use declaration::Declaration;

pub mod field;
pub use field::{BoundField, Field};

mod func;
pub use func::{dump, load};

pub mod model_serializer;
pub use model_serializer::ModelSerializer;

pub mod polymorphic;
pub use polymorphic::{Identity, PolymorphicSerializer};

mod serializer;
pub use serializer::RecordSerializer;

mod warning;
pub use warning::Warning;

pub use tabula_core::{
    bail, err,
    schema::{self, Model, ModelId},
    store::{self, Store},
    value::{self, Record, Type, Value},
    Error, Result, Schema,
};

/// A transport value.
pub type Json = serde_json::Value;

/// The wire payload: one flat mapping per record.
pub type Map = serde_json::Map<String, Json>;
