//! Native values produced by the decoder and consumed by the encoder.

use std::fmt;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat, Utc};
use serde::{Serialize, Serializer};

/// A decoded column value, or a scalar to bind as a parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum NativeValue {
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Text(String),
    Temporal(Temporal),
}

/// The temporal kinds the decoder materializes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Temporal {
    /// UTC midnight of a calendar day.
    Date(DateTime<Utc>),
    /// Time of day.
    Time(NaiveTime),
    /// Timestamp without a zone.
    TimestampNtz(NaiveDateTime),
    /// Timestamp expressed in the session zone.
    TimestampLtz(DateTime<FixedOffset>),
    /// Timestamp carrying its own offset.
    TimestampTz(DateTime<FixedOffset>),
}

impl NativeValue {
    /// Short name of the value's kind, used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            NativeValue::Null => "null",
            NativeValue::Bool(_) => "boolean",
            NativeValue::Int(_) => "integer",
            NativeValue::UInt(_) => "unsigned",
            NativeValue::Float(_) => "float",
            NativeValue::Text(_) => "text",
            NativeValue::Temporal(t) => t.kind(),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, NativeValue::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            NativeValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Signed view of an integer value, if it fits.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            NativeValue::Int(n) => Some(*n),
            NativeValue::UInt(n) => i64::try_from(*n).ok(),
            _ => None,
        }
    }

    /// Unsigned view of an integer value, if it fits.
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            NativeValue::Int(n) => u64::try_from(*n).ok(),
            NativeValue::UInt(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            NativeValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            NativeValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_temporal(&self) -> Option<&Temporal> {
        match self {
            NativeValue::Temporal(t) => Some(t),
            _ => None,
        }
    }
}

impl Temporal {
    pub fn kind(&self) -> &'static str {
        match self {
            Temporal::Date(_) => "date",
            Temporal::Time(_) => "time",
            Temporal::TimestampNtz(_) => "timestamp_ntz",
            Temporal::TimestampLtz(_) => "timestamp_ltz",
            Temporal::TimestampTz(_) => "timestamp_tz",
        }
    }

    /// Text form used for display and for the generic binding path.
    pub fn to_rfc3339(&self) -> String {
        match self {
            Temporal::Date(dt) => dt.to_rfc3339_opts(SecondsFormat::AutoSi, true),
            Temporal::Time(t) => t.format("%H:%M:%S%.f").to_string(),
            Temporal::TimestampNtz(dt) => dt.format("%Y-%m-%dT%H:%M:%S%.f").to_string(),
            Temporal::TimestampLtz(dt) | Temporal::TimestampTz(dt) => {
                dt.to_rfc3339_opts(SecondsFormat::AutoSi, false)
            }
        }
    }
}

impl fmt::Display for Temporal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_rfc3339())
    }
}

impl fmt::Display for NativeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NativeValue::Null => write!(f, "NULL"),
            NativeValue::Bool(b) => write!(f, "{}", b),
            NativeValue::Int(n) => write!(f, "{}", n),
            NativeValue::UInt(n) => write!(f, "{}", n),
            NativeValue::Float(x) => write!(f, "{}", x),
            NativeValue::Text(s) => write!(f, "{}", s),
            NativeValue::Temporal(t) => write!(f, "{}", t),
        }
    }
}

impl Serialize for NativeValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            NativeValue::Null => serializer.serialize_unit(),
            NativeValue::Bool(b) => serializer.serialize_bool(*b),
            NativeValue::Int(n) => serializer.serialize_i64(*n),
            NativeValue::UInt(n) => serializer.serialize_u64(*n),
            NativeValue::Float(x) => serializer.serialize_f64(*x),
            NativeValue::Text(s) => serializer.serialize_str(s),
            NativeValue::Temporal(t) => serializer.serialize_str(&t.to_rfc3339()),
        }
    }
}

macro_rules! native_from {
    ($variant:ident: $($ty:ty),+) => {
        $(
            impl From<$ty> for NativeValue {
                fn from(v: $ty) -> Self {
                    NativeValue::$variant(v.into())
                }
            }
        )+
    };
}

native_from!(Int: i8, i16, i32, i64);
native_from!(UInt: u8, u16, u32, u64);
native_from!(Float: f32, f64);
native_from!(Text: &str, String, char);

impl From<bool> for NativeValue {
    fn from(v: bool) -> Self {
        NativeValue::Bool(v)
    }
}

impl From<isize> for NativeValue {
    fn from(v: isize) -> Self {
        NativeValue::Int(v as i64)
    }
}

impl From<usize> for NativeValue {
    fn from(v: usize) -> Self {
        NativeValue::UInt(v as u64)
    }
}

impl From<Temporal> for NativeValue {
    fn from(v: Temporal) -> Self {
        NativeValue::Temporal(v)
    }
}

impl From<NaiveDate> for NativeValue {
    fn from(v: NaiveDate) -> Self {
        NativeValue::Temporal(Temporal::Date(v.and_time(NaiveTime::MIN).and_utc()))
    }
}

impl From<NaiveTime> for NativeValue {
    fn from(v: NaiveTime) -> Self {
        NativeValue::Temporal(Temporal::Time(v))
    }
}

impl From<NaiveDateTime> for NativeValue {
    fn from(v: NaiveDateTime) -> Self {
        NativeValue::Temporal(Temporal::TimestampNtz(v))
    }
}

impl From<DateTime<Utc>> for NativeValue {
    fn from(v: DateTime<Utc>) -> Self {
        NativeValue::Temporal(Temporal::TimestampTz(v.fixed_offset()))
    }
}

impl From<DateTime<FixedOffset>> for NativeValue {
    fn from(v: DateTime<FixedOffset>) -> Self {
        NativeValue::Temporal(Temporal::TimestampTz(v))
    }
}

impl<T: Into<NativeValue>> From<Option<T>> for NativeValue {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(NativeValue::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_native_value_from() {
        assert_eq!(NativeValue::from(true), NativeValue::Bool(true));
        assert_eq!(NativeValue::from(-7i8), NativeValue::Int(-7));
        assert_eq!(NativeValue::from(7u16), NativeValue::UInt(7));
        assert_eq!(NativeValue::from(1.5f32), NativeValue::Float(1.5));
        assert_eq!(NativeValue::from("hi"), NativeValue::Text("hi".into()));
        assert_eq!(NativeValue::from(None::<i32>), NativeValue::Null);
        assert_eq!(NativeValue::from(Some(3i32)), NativeValue::Int(3));
    }

    #[test]
    fn test_integer_views() {
        assert_eq!(NativeValue::UInt(5).as_i64(), Some(5));
        assert_eq!(NativeValue::UInt(u64::MAX).as_i64(), None);
        assert_eq!(NativeValue::Int(-1).as_u64(), None);
        assert_eq!(NativeValue::Text("5".into()).as_i64(), None);
    }

    #[test]
    fn test_temporal_rendering() {
        let day = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        let date = NativeValue::from(day);
        assert_eq!(date.to_string(), "2024-02-29T00:00:00Z");
        assert_eq!(date.kind(), "date");

        let t = NaiveTime::from_hms_milli_opt(13, 5, 9, 250).unwrap();
        assert_eq!(NativeValue::from(t).to_string(), "13:05:09.250");

        let offset = FixedOffset::west_opt(3600).unwrap();
        let tz = DateTime::from_timestamp(0, 0).unwrap().with_timezone(&offset);
        assert_eq!(
            NativeValue::from(tz).to_string(),
            "1969-12-31T23:00:00-01:00"
        );
    }

    #[test]
    fn test_serialize_to_json() {
        let json = serde_json::to_string(&vec![
            NativeValue::Null,
            NativeValue::Int(-3),
            NativeValue::UInt(u64::MAX),
            NativeValue::Text("a".into()),
        ])
        .unwrap();
        assert_eq!(json, "[null,-3,18446744073709551615,\"a\"]");

        let day = NativeValue::from(NaiveDate::from_ymd_opt(2024, 1, 31).unwrap());
        assert_eq!(
            serde_json::to_string(&day).unwrap(),
            "\"2024-01-31T00:00:00Z\""
        );
    }
}
