mod date;
pub use date::DateCodec;

mod datetime;
pub use datetime::{parse_datetime, DateTimeCodec};

mod default;
pub use default::DefaultCodec;

mod enum_key;
pub use enum_key::EnumKeyCodec;

mod enum_value;
pub use enum_value::EnumCodec;

mod table;
pub use table::CodecTable;

use crate::{Cx, Json, Result, Value};
use std::fmt;

/// Converts one native value to its transport form and back.
///
/// Codecs are never called with `null`; the owning field short-circuits it.
pub trait Codec: fmt::Debug + Send + Sync {
    fn dump(&self, value: &Value) -> Result<Json>;

    fn load(&self, json: &Json, cx: &mut Cx<'_>) -> Result<Value>;
}
