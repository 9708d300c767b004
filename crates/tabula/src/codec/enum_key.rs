use super::Codec;
use crate::{value::TypeEnum, Cx, Error, Json, Result, Value};

/// Writes an enum member as its symbolic name rather than its value.
#[derive(Debug, Clone)]
pub struct EnumKeyCodec {
    ty: TypeEnum,
}

impl EnumKeyCodec {
    pub fn new(ty: TypeEnum) -> Self {
        Self { ty }
    }
}

impl Codec for EnumKeyCodec {
    fn dump(&self, value: &Value) -> Result<Json> {
        let name = match value {
            Value::Enum(member) => &member.variant,
            value => match self.ty.by_value(value) {
                Some(variant) => &variant.name,
                None => {
                    return Err(Error::invalid_value(format!(
                        "{value:?} is not a member of {}",
                        self.ty.name
                    )))
                }
            },
        };

        Ok(Json::String(name.clone()))
    }

    fn load(&self, json: &Json, _cx: &mut Cx<'_>) -> Result<Value> {
        let Json::String(name) = json else {
            return Err(Error::type_conversion(json, "String"));
        };

        self.ty.value(name).ok_or_else(|| {
            Error::invalid_value(format!("'{name}' is not a member name of {}", self.ty.name))
        })
    }
}
