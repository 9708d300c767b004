use super::{Type, Value};
use crate::{Error, Result};

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Timelike};
use serde_json::{Map, Number, Value as Json};

impl Value {
    /// Converts a basic value into its transport form.
    ///
    /// Enum members unwrap to their underlying value, dates and times become
    /// ISO-8601 strings and records become nested mappings of their attributes.
    pub fn to_json(&self) -> Json {
        match self {
            Self::Null => Json::Null,
            Self::Bool(v) => Json::Bool(*v),
            Self::I64(v) => Json::Number((*v).into()),
            Self::F64(v) => Number::from_f64(*v).map(Json::Number).unwrap_or(Json::Null),
            Self::String(v) => Json::String(v.clone()),
            Self::Date(v) => Json::String(date_isoformat(v)),
            Self::DateTime(v) => Json::String(datetime_isoformat(v)),
            Self::NaiveDateTime(v) => Json::String(naive_isoformat(v)),
            Self::Enum(v) => v.value.to_json(),
            Self::Json(v) => v.clone(),
            Self::List(items) => Json::Array(items.iter().map(Value::to_json).collect()),
            Self::Record(record) => Json::Object(
                record
                    .iter()
                    .map(|(name, value)| (name.to_string(), value.to_json()))
                    .collect::<Map<_, _>>(),
            ),
        }
    }

    /// Coerces a transport value into a native one.
    ///
    /// With a declared type the JSON must be compatible with it, otherwise a
    /// type conversion error is returned. Without one the conversion is
    /// structural. Objects always become [`Value::Json`].
    pub fn from_json(json: &Json, ty: Option<&Type>) -> Result<Value> {
        Ok(match (json, ty) {
            (Json::Null, _) => Value::Null,
            (json, Some(Type::Json)) => Value::Json(json.clone()),
            (Json::Bool(v), None | Some(Type::Bool)) => Value::Bool(*v),
            (Json::Number(n), Some(Type::I64)) => match n.as_i64() {
                Some(v) => Value::I64(v),
                None => match n.as_f64() {
                    Some(v) if v.fract() == 0.0 && v.abs() < i64::MAX as f64 => {
                        Value::I64(v as i64)
                    }
                    _ => return Err(Error::type_conversion(json, "I64")),
                },
            },
            (Json::Number(n), Some(Type::F64)) => match n.as_f64() {
                Some(v) => Value::F64(v),
                None => return Err(Error::type_conversion(json, "F64")),
            },
            (Json::Number(n), None | Some(Type::Model(_))) => match n.as_i64() {
                Some(v) => Value::I64(v),
                None => n.as_f64().map(Value::F64).unwrap_or(Value::Null),
            },
            (Json::String(v), None | Some(Type::String | Type::Model(_))) => {
                Value::String(v.clone())
            }
            (Json::String(v), Some(Type::Date | Type::DateTime)) => Value::String(v.clone()),
            (json, Some(Type::Enum(ty_enum))) => {
                let raw = Value::from_json(json, None)?;
                match ty_enum.by_value(&raw) {
                    Some(variant) => variant.to_value(),
                    None => {
                        return Err(Error::invalid_value(format!(
                            "{} is not a valid {}",
                            json, ty_enum.name
                        )))
                    }
                }
            }
            (Json::Array(items), Some(Type::List(item_ty))) => Value::List(
                items
                    .iter()
                    .map(|item| Value::from_json(item, Some(item_ty)))
                    .collect::<Result<_>>()?,
            ),
            (Json::Array(items), None | Some(Type::Model(_))) => Value::List(
                items
                    .iter()
                    .map(|item| Value::from_json(item, None))
                    .collect::<Result<_>>()?,
            ),
            (Json::Object(_), None | Some(Type::Model(_))) => Value::Json(json.clone()),
            (json, Some(ty)) => return Err(Error::type_conversion(json, ty.name())),
        })
    }
}

fn date_isoformat(date: &NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn naive_isoformat(value: &NaiveDateTime) -> String {
    let mut out = value.format("%Y-%m-%dT%H:%M:%S").to_string();
    push_micros(&mut out, value.nanosecond());
    out
}

fn datetime_isoformat(value: &DateTime<FixedOffset>) -> String {
    let mut out = naive_isoformat(&value.naive_local());

    let offset = value.offset().local_minus_utc();
    let sign = if offset < 0 { '-' } else { '+' };
    let minutes = offset.abs() / 60;
    out.push_str(&format!("{sign}{:02}:{:02}", minutes / 60, minutes % 60));

    out
}

// Sub-second precision is written as microseconds, and only when non-zero.
fn push_micros(out: &mut String, nanos: u32) {
    let micros = (nanos % 1_000_000_000) / 1_000;
    if micros != 0 {
        out.push_str(&format!(".{micros:06}"));
    }
}
