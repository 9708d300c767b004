mod json;

mod record;
pub use record::Record;

mod ty;
pub use ty::Type;

mod ty_enum;
pub use ty_enum::{EnumVariant, TypeEnum};

mod value_enum;
pub use value_enum::ValueEnum;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};

#[derive(Debug, Default, Clone, PartialEq)]
pub enum Value {
    /// Boolean value
    Bool(bool),

    /// Calendar date without time of day
    Date(NaiveDate),

    /// Date and time carrying a fixed UTC offset
    DateTime(DateTime<FixedOffset>),

    /// Member of an enumerated type
    Enum(ValueEnum),

    /// 64-bit float
    F64(f64),

    /// Signed 64-bit integer
    I64(i64),

    /// Opaque JSON document, stored as-is
    Json(serde_json::Value),

    /// A list of values, also used for to-many relations
    List(Vec<Value>),

    /// Date and time without a zone
    NaiveDateTime(NaiveDateTime),

    /// Null value
    #[default]
    Null,

    /// A related record
    Record(Box<Record>),

    /// String value
    String(String),
}

impl Value {
    pub const fn null() -> Self {
        Self::Null
    }

    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::I64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Self::Record(record) => Some(record),
            _ => None,
        }
    }

    #[track_caller]
    pub fn expect_record(&self) -> &Record {
        match self {
            Self::Record(record) => record,
            _ => panic!("expected record, but was {self:?}"),
        }
    }

    #[track_caller]
    pub fn expect_list(&self) -> &[Value] {
        match self {
            Self::List(items) => items,
            _ => panic!("expected list, but was {self:?}"),
        }
    }

    /// Strips enum identity, returning the member's underlying value. Other
    /// values are returned unchanged.
    pub fn into_primitive(self) -> Value {
        match self {
            Self::Enum(value_enum) => *value_enum.value,
            value => value,
        }
    }
}

impl From<bool> for Value {
    fn from(src: bool) -> Self {
        Self::Bool(src)
    }
}

impl From<i32> for Value {
    fn from(src: i32) -> Self {
        Self::I64(src.into())
    }
}

impl From<i64> for Value {
    fn from(src: i64) -> Self {
        Self::I64(src)
    }
}

impl From<f64> for Value {
    fn from(src: f64) -> Self {
        Self::F64(src)
    }
}

impl From<String> for Value {
    fn from(src: String) -> Self {
        Self::String(src)
    }
}

impl From<&String> for Value {
    fn from(src: &String) -> Self {
        Self::String(src.clone())
    }
}

impl From<&str> for Value {
    fn from(src: &str) -> Self {
        Self::String(src.to_string())
    }
}

impl From<NaiveDate> for Value {
    fn from(src: NaiveDate) -> Self {
        Self::Date(src)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(src: NaiveDateTime) -> Self {
        Self::NaiveDateTime(src)
    }
}

impl From<DateTime<FixedOffset>> for Value {
    fn from(src: DateTime<FixedOffset>) -> Self {
        Self::DateTime(src)
    }
}

impl From<ValueEnum> for Value {
    fn from(src: ValueEnum) -> Self {
        Self::Enum(src)
    }
}

impl From<Record> for Value {
    fn from(src: Record) -> Self {
        Self::Record(Box::new(src))
    }
}

impl From<Vec<Value>> for Value {
    fn from(src: Vec<Value>) -> Self {
        Self::List(src)
    }
}

impl<T> From<Option<T>> for Value
where
    Self: From<T>,
{
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => Self::from(value),
            None => Self::Null,
        }
    }
}
