use super::{Type, Value, ValueEnum};

#[derive(Debug, Default, Clone, PartialEq)]
pub struct TypeEnum {
    /// Name of the enumerated type, used in error messages
    pub name: String,

    pub variants: Vec<EnumVariant>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumVariant {
    /// Symbolic name, e.g. `MARRIED`
    pub name: String,

    /// Persisted value, e.g. `"Married"`
    pub value: Value,
}

impl TypeEnum {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            variants: vec![],
        }
    }

    pub fn variant(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.variants.push(EnumVariant {
            name: name.into(),
            value: value.into(),
        });
        self
    }

    pub fn by_name(&self, name: &str) -> Option<&EnumVariant> {
        self.variants.iter().find(|variant| variant.name == name)
    }

    pub fn by_value(&self, value: &Value) -> Option<&EnumVariant> {
        self.variants.iter().find(|variant| variant.value == *value)
    }

    /// Returns the member named `name`, or `None` if no variant has that name.
    pub fn value(&self, name: &str) -> Option<Value> {
        self.by_name(name).map(EnumVariant::to_value)
    }
}

impl EnumVariant {
    pub fn to_value(&self) -> Value {
        Value::Enum(ValueEnum::new(self.name.clone(), self.value.clone()))
    }
}

impl From<TypeEnum> for Type {
    fn from(value: TypeEnum) -> Self {
        Self::Enum(value)
    }
}
