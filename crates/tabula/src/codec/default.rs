use super::Codec;
use crate::{Cx, Json, Result, Type, Value};

/// Pass-through codec.
///
/// Dumps basic values as-is, unwrapping enum members to their value. Loads
/// with type coercion when the column type is known.
#[derive(Debug, Default, Clone)]
pub struct DefaultCodec {
    ty: Option<Type>,
}

impl DefaultCodec {
    pub fn new(ty: Type) -> Self {
        Self { ty: Some(ty) }
    }

    /// A codec for an attribute with no declared type.
    pub fn untyped() -> Self {
        Self { ty: None }
    }
}

impl Codec for DefaultCodec {
    fn dump(&self, value: &Value) -> Result<Json> {
        Ok(value.to_json())
    }

    fn load(&self, json: &Json, _cx: &mut Cx<'_>) -> Result<Value> {
        Value::from_json(json, self.ty.as_ref())
    }
}
