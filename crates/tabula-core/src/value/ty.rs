use super::TypeEnum;
use crate::schema::ModelId;

/// The basic type of a column, as reported by the schema.
#[derive(Debug, Clone, PartialEq)]
pub enum Type {
    Bool,

    /// Calendar date
    Date,

    /// Date and time, with or without a zone
    DateTime,

    /// Enumerated type
    Enum(TypeEnum),

    F64,

    I64,

    /// Opaque JSON document
    Json,

    /// List of values of the given type
    List(Box<Type>),

    /// A record of the given model
    Model(ModelId),

    String,
}

impl Type {
    pub fn list(ty: impl Into<Self>) -> Self {
        Self::List(Box::new(ty.into()))
    }

    pub fn is_date_time(&self) -> bool {
        matches!(self, Self::DateTime)
    }

    pub fn is_date(&self) -> bool {
        matches!(self, Self::Date)
    }

    pub fn is_enum(&self) -> bool {
        matches!(self, Self::Enum(_))
    }

    pub fn as_enum(&self) -> Option<&TypeEnum> {
        match self {
            Self::Enum(ty) => Some(ty),
            _ => None,
        }
    }

    /// Short name used in conversion errors.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Bool => "Bool",
            Self::Date => "Date",
            Self::DateTime => "DateTime",
            Self::Enum(_) => "Enum",
            Self::F64 => "F64",
            Self::I64 => "I64",
            Self::Json => "Json",
            Self::List(_) => "List",
            Self::Model(_) => "Model",
            Self::String => "String",
        }
    }
}
