use super::Codec;
use crate::{
    value::{TypeEnum, ValueEnum},
    Cx, Error, Json, Result, Value,
};

/// Writes an enum member as its underlying value.
#[derive(Debug, Clone)]
pub struct EnumCodec {
    ty: TypeEnum,
}

impl EnumCodec {
    pub fn new(ty: TypeEnum) -> Self {
        Self { ty }
    }
}

impl Codec for EnumCodec {
    fn dump(&self, value: &Value) -> Result<Json> {
        match value {
            Value::Enum(ValueEnum { value, .. }) => Ok(value.to_json()),
            // Already the raw persisted value
            value if self.ty.by_value(value).is_some() => Ok(value.to_json()),
            _ => Err(Error::invalid_value(format!(
                "{value:?} is not a member of {}",
                self.ty.name
            ))),
        }
    }

    fn load(&self, json: &Json, _cx: &mut Cx<'_>) -> Result<Value> {
        let raw = Value::from_json(json, None)?;

        self.ty
            .variants
            .iter()
            .find(|variant| loosely_equal(&variant.value, &raw))
            .map(|variant| variant.to_value())
            .ok_or_else(|| {
                Error::invalid_value(format!("{json} is not a valid {}", self.ty.name))
            })
    }
}

/// Equality that lets an integer match a float of the same value.
fn loosely_equal(lhs: &Value, rhs: &Value) -> bool {
    match (lhs, rhs) {
        (Value::I64(lhs), Value::F64(rhs)) | (Value::F64(rhs), Value::I64(lhs)) => {
            *lhs as f64 == *rhs
        }
        _ => lhs == rhs,
    }
}
