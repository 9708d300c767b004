use super::{datetime::Parsed, Codec};
use crate::{Cx, Error, Json, Result, Value, Warning};

use chrono::{NaiveTime, Timelike};

/// ISO-8601 date codec.
///
/// Loads with the [`DateTimeCodec`](super::DateTimeCodec) grammar and keeps
/// the date part. A non-zero time of day raises
/// [`Warning::TimeDiscarded`] but does not fail the load.
#[derive(Debug, Default, Clone, Copy)]
pub struct DateCodec;

impl Codec for DateCodec {
    fn dump(&self, value: &Value) -> Result<Json> {
        let date = match value {
            Value::Date(date) => *date,
            Value::NaiveDateTime(value) => value.date(),
            Value::DateTime(value) => value.date_naive(),
            _ => {
                return Err(Error::invalid_value(format!(
                    "expected a date, got {value:?}"
                )))
            }
        };

        Ok(Value::Date(date).to_json())
    }

    fn load(&self, json: &Json, cx: &mut Cx<'_>) -> Result<Value> {
        let Json::String(input) = json else {
            return Err(Error::type_conversion(json, "Date"));
        };

        let parsed = Parsed::parse(input).ok_or_else(|| Error::parse("Date", input.as_str()))?;

        if has_time_of_day(parsed.time) {
            cx.warn(Warning::TimeDiscarded {
                input: input.clone(),
            });
        }

        Ok(Value::Date(parsed.date))
    }
}

// Sub-second digits alone do not count
fn has_time_of_day(time: NaiveTime) -> bool {
    time.hour() != 0 || time.minute() != 0 || time.second() != 0
}
