use super::Codec;
use crate::{Cx, Error, Json, Result, Value};

use chrono::{FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};

/// ISO-8601 date-time codec.
///
/// Loading accepts a permissive grammar:
///
/// ```text
/// YY{YY}-MM-DD[(T| )HH:MM[:SS][.F+][Z|z|±HH[:]MM]]
/// ```
///
/// The longest matching prefix is used and any trailing input is ignored.
/// Input with a zone loads as [`Value::DateTime`], input without one as
/// [`Value::NaiveDateTime`].
#[derive(Debug, Default, Clone, Copy)]
pub struct DateTimeCodec;

impl Codec for DateTimeCodec {
    fn dump(&self, value: &Value) -> Result<Json> {
        match value {
            Value::DateTime(_) | Value::NaiveDateTime(_) | Value::Date(_) => {
                Ok(value.to_json())
            }
            _ => Err(Error::invalid_value(format!(
                "expected a date-time, got {value:?}"
            ))),
        }
    }

    fn load(&self, json: &Json, _cx: &mut Cx<'_>) -> Result<Value> {
        match json {
            Json::String(input) => parse_datetime(input),
            _ => Err(Error::type_conversion(json, "DateTime")),
        }
    }
}

/// Parses a date-time string. See [`DateTimeCodec`] for the grammar.
pub fn parse_datetime(input: &str) -> Result<Value> {
    let parsed = Parsed::parse(input).ok_or_else(|| Error::parse("DateTime", input))?;
    let naive = NaiveDateTime::new(parsed.date, parsed.time);

    match parsed.offset {
        Some(offset) => naive
            .and_local_timezone(offset)
            .single()
            .map(Value::DateTime)
            .ok_or_else(|| Error::parse("DateTime", input)),
        None => Ok(Value::NaiveDateTime(naive)),
    }
}

pub(super) struct Parsed {
    pub(super) date: NaiveDate,
    pub(super) time: NaiveTime,
    pub(super) offset: Option<FixedOffset>,
}

impl Parsed {
    pub(super) fn parse(input: &str) -> Option<Self> {
        let mut scan = Scanner::new(input);

        let year = scan.digits(2, 4)?;
        scan.expect(b'-')?;
        let month = scan.digits(2, 2)?;
        scan.expect(b'-')?;
        let day = scan.digits(2, 2)?;

        let date = NaiveDate::from_ymd_opt(year as i32, month, day)?;

        if scan.is_done() {
            return Some(Self {
                date,
                time: NaiveTime::MIN,
                offset: None,
            });
        }

        scan.one_of(b"T ")?;

        let hour = scan.digits(2, 2)?;
        scan.expect(b':')?;
        let minute = scan.digits(2, 2)?;

        let second = scan
            .optional(|scan| {
                scan.expect(b':')?;
                scan.digits(2, 2)
            })
            .unwrap_or(0);

        let nanos = scan
            .optional(|scan| {
                scan.expect(b'.')?;
                scan.fraction()
            })
            .unwrap_or(0);

        let time = NaiveTime::from_hms_nano_opt(hour, minute, second, nanos)?;
        let offset = scan.optional(Scanner::offset);

        // Anything after the longest matching prefix is ignored
        Some(Self { date, time, offset })
    }
}

struct Scanner<'a> {
    input: &'a [u8],
    pos: usize,
}

impl<'a> Scanner<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input: input.as_bytes(),
            pos: 0,
        }
    }

    fn is_done(&self) -> bool {
        self.pos == self.input.len()
    }

    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn eat(&mut self, byte: u8) -> bool {
        if self.peek() == Some(byte) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, byte: u8) -> Option<()> {
        self.eat(byte).then_some(())
    }

    fn one_of(&mut self, set: &[u8]) -> Option<u8> {
        let byte = self.peek().filter(|byte| set.contains(byte))?;
        self.pos += 1;
        Some(byte)
    }

    /// Reads between `min` and `max` ASCII digits.
    fn digits(&mut self, min: usize, max: usize) -> Option<u32> {
        let start = self.pos;
        let mut value = 0;

        while self.pos - start < max {
            match self.peek() {
                Some(byte @ b'0'..=b'9') => {
                    value = value * 10 + u32::from(byte - b'0');
                    self.pos += 1;
                }
                _ => break,
            }
        }

        (self.pos - start >= min).then_some(value)
    }

    /// Reads one or more digits as a decimal fraction of a second, in
    /// nanoseconds. Digits past the ninth are truncated.
    ///
    /// `.302` is 302 milliseconds, not 302 microseconds.
    fn fraction(&mut self) -> Option<u32> {
        let start = self.pos;
        let mut nanos = 0;

        while let Some(byte @ b'0'..=b'9') = self.peek() {
            if self.pos - start < 9 {
                nanos = nanos * 10 + u32::from(byte - b'0');
            }
            self.pos += 1;
        }

        let width = self.pos - start;
        if width == 0 {
            return None;
        }

        Some(nanos * 10u32.pow(9usize.saturating_sub(width) as u32))
    }

    /// Reads a `Z`, `z` or `±HH[:]MM` suffix. The sign applies to the whole
    /// span.
    fn offset(&mut self) -> Option<FixedOffset> {
        let sign = match self.peek()? {
            b'Z' | b'z' => {
                self.pos += 1;
                return FixedOffset::east_opt(0);
            }
            b'+' => 1,
            b'-' => -1,
            _ => return None,
        };
        self.pos += 1;

        let hours = self.digits(2, 2)? as i32;
        self.eat(b':');
        let minutes = self.digits(2, 2)? as i32;

        if minutes >= 60 {
            return None;
        }

        FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
    }

    /// Runs `f`, rewinding to where it started when it does not match.
    fn optional<T>(&mut self, f: impl FnOnce(&mut Self) -> Option<T>) -> Option<T> {
        let start = self.pos;
        let out = f(self);
        if out.is_none() {
            self.pos = start;
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, TimeZone, Timelike};

    fn load(input: &str) -> Result<Value> {
        DateTimeCodec.load(&Json::from(input), &mut Cx::default())
    }

    #[test]
    fn naive_without_seconds() {
        let value = load("1994-07-17T20:53").unwrap();
        let expected = NaiveDate::from_ymd_opt(1994, 7, 17)
            .unwrap()
            .and_hms_opt(20, 53, 0)
            .unwrap();
        assert_eq!(value, Value::NaiveDateTime(expected));
    }

    #[test]
    fn zulu_dumps_as_utc_offset() {
        let value = load("1994-07-17T20:53:12Z").unwrap();
        let utc = FixedOffset::east_opt(0).unwrap();
        assert_eq!(
            value,
            Value::DateTime(utc.with_ymd_and_hms(1994, 7, 17, 20, 53, 12).unwrap())
        );
        assert_eq!(
            DateTimeCodec.dump(&value).unwrap(),
            Json::from("1994-07-17T20:53:12+00:00")
        );
    }

    #[test]
    fn negative_offset_spans_hours_and_minutes() {
        let Value::DateTime(value) = load("1994-07-17T20:53:12.0320-0230").unwrap() else {
            panic!("expected zoned date-time");
        };
        assert_eq!(value.offset().local_minus_utc(), -(2 * 3600 + 30 * 60));
        assert_eq!(value.nanosecond(), 32_000_000);
        assert_eq!(value.second(), 12);
    }

    #[test]
    fn negative_offset_under_an_hour() {
        let Value::DateTime(minus) = load("1994-07-17T20:53:12-00:30").unwrap() else {
            panic!("expected zoned date-time");
        };
        let Value::DateTime(plus) = load("1994-07-17T20:53:12+0030").unwrap() else {
            panic!("expected zoned date-time");
        };
        assert_eq!(minus.offset().local_minus_utc(), -30 * 60);
        assert_eq!(plus.offset().local_minus_utc(), 30 * 60);
    }

    #[test]
    fn space_separator_and_long_fraction() {
        let Value::NaiveDateTime(value) = load("2000-01-02 03:04:05.123456789123").unwrap() else {
            panic!("expected naive date-time");
        };
        assert_eq!(value.nanosecond(), 123_456_789);
        assert_eq!(value.hour(), 3);
    }

    #[test]
    fn date_only() {
        let Value::NaiveDateTime(value) = load("2152-01-02").unwrap() else {
            panic!("expected naive date-time");
        };
        assert_eq!((value.year(), value.month(), value.day()), (2152, 1, 2));
        assert_eq!(value.time(), NaiveTime::MIN);
    }

    #[test]
    fn rejects_malformed_input() {
        for input in [
            "yesterday",
            "1994-7-17T20:53",
            "1994-07-17T20",
            "1994-07-17 junk",
            "1994-07-17junk",
            "1994-13-17T20:53",
        ] {
            let err = load(input).unwrap_err();
            assert!(err.is_parse(), "{input}");
        }
    }

    #[test]
    fn trailing_input_is_ignored() {
        let utc = FixedOffset::east_opt(0).unwrap();
        assert_eq!(
            load("1994-07-17T20:53:12+0000 ").unwrap(),
            Value::DateTime(utc.with_ymd_and_hms(1994, 7, 17, 20, 53, 12).unwrap())
        );
        assert_eq!(
            load("1994-07-17T20:53:12Zjunk").unwrap(),
            Value::DateTime(utc.with_ymd_and_hms(1994, 7, 17, 20, 53, 12).unwrap())
        );

        let naive = Value::NaiveDateTime(
            NaiveDate::from_ymd_opt(1994, 7, 17)
                .unwrap()
                .and_hms_opt(20, 53, 12)
                .unwrap(),
        );

        // An incomplete offset or fraction is not part of the match
        assert_eq!(load("1994-07-17T20:53:12+2").unwrap(), naive);
        assert_eq!(load("1994-07-17T20:53:12.").unwrap(), naive);
        assert_eq!(load("1994-07-17T20:53:12 UTC").unwrap(), naive);
    }

    #[test]
    fn fraction_is_decimal() {
        let Value::NaiveDateTime(value) = load("1994-07-17T20:53:12.302").unwrap() else {
            panic!("expected naive date-time");
        };
        assert_eq!(value.nanosecond(), 302_000_000);
    }

    #[test]
    fn parse_error_message() {
        let err = load("yesterday").unwrap_err();
        assert_eq!(err.to_string(), "could not parse DateTime: 'yesterday'");
    }

    #[test]
    fn rejects_non_strings() {
        let err = DateTimeCodec
            .load(&Json::from(5), &mut Cx::default())
            .unwrap_err();
        assert!(err.is_type_conversion());
    }
}
