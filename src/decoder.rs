//! Decoding of wire strings into native values.
//!
//! Each result column carries a [`WireTypeTag`] in its metadata. The
//! decoder maps one encoded field plus that tag to a [`NativeValue`]:
//!
//! | Tag             | Payload                          | Result                  |
//! |-----------------|----------------------------------|-------------------------|
//! | `TEXT`          | any                              | text                    |
//! | `FIXED`         | `-42`, `12.50`                   | integer, else text      |
//! | `BOOLEAN`       | `true`, `0`                      | boolean, else text      |
//! | `REAL`          | `1.5e3`                          | float, else text        |
//! | `DATE`          | days since epoch                 | UTC midnight            |
//! | `TIME`          | seconds since midnight           | time of day             |
//! | `TIMESTAMP_NTZ` | epoch seconds                    | naive timestamp         |
//! | `TIMESTAMP_LTZ` | epoch seconds                    | session zone timestamp  |
//! | `TIMESTAMP_TZ`  | epoch seconds, biased offset     | fixed offset timestamp  |
//! | other           | any                              | text                    |

use chrono::{FixedOffset, NaiveTime, TimeDelta};

use crate::error::{ConvertError, ConvertResult};
use crate::tag::WireTypeTag;
use crate::timestamp::{decompose_epoch, parse_instant, to_elapsed, to_utc};
use crate::value::{NativeValue, Temporal};
use crate::zone::SessionZone;

const SECONDS_PER_DAY: i64 = 86_400;

/// TIMESTAMP_TZ offsets are sent as `minutes + 1440` to stay non-negative.
pub const TZ_OFFSET_BIAS: i64 = 1440;

/// Stateless decoder bound to a session zone.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Decoder {
    zone: SessionZone,
}

impl Decoder {
    pub fn new(zone: SessionZone) -> Self {
        Self { zone }
    }

    pub fn zone(&self) -> SessionZone {
        self.zone
    }

    /// Decode one field. `None` is SQL null and decodes to
    /// [`NativeValue::Null`] whatever the tag.
    pub fn decode(&self, field: Option<&str>, tag: &WireTypeTag) -> ConvertResult<NativeValue> {
        let Some(raw) = field else {
            return Ok(NativeValue::Null);
        };
        tracing::trace!("decode {} {:?}", tag, raw);

        let value = match tag {
            WireTypeTag::Text => NativeValue::Text(raw.to_string()),
            WireTypeTag::Fixed => decode_fixed(raw),
            WireTypeTag::Boolean => decode_boolean(raw),
            WireTypeTag::Real => decode_real(raw),
            WireTypeTag::Date => decode_date(raw)?,
            WireTypeTag::Time => decode_time(raw)?,
            WireTypeTag::TimestampNtz => {
                let dt = parse_instant(raw)?;
                NativeValue::Temporal(Temporal::TimestampNtz(dt.naive_utc()))
            }
            WireTypeTag::TimestampLtz => self.decode_ltz(raw)?,
            WireTypeTag::TimestampTz => decode_tz(raw)?,
            WireTypeTag::Other(label) => {
                tracing::trace!("no decoder for tag '{}', passing through as text", label);
                NativeValue::Text(raw.to_string())
            }
        };
        Ok(value)
    }

    /// Read the epoch as UTC, then shift it back by the session zone's
    /// offset at that instant so the wall clock in the zone shows the
    /// reading the server sent.
    fn decode_ltz(&self, raw: &str) -> ConvertResult<NativeValue> {
        let candidate = parse_instant(raw)?;
        let offset = self.zone.offset_at(&candidate.naive_utc());
        tracing::trace!("local offset at {}: {}", candidate, offset);

        let shifted = candidate
            .checked_sub_signed(TimeDelta::seconds(offset.local_minus_utc() as i64))
            .ok_or_else(|| ConvertError::OutOfRange(raw.to_string()))?;
        let zone_offset = self.zone.offset_at(&shifted.naive_utc());
        Ok(NativeValue::Temporal(Temporal::TimestampLtz(
            shifted.with_timezone(&zone_offset),
        )))
    }
}

/// Decode with the process-local session zone.
pub fn decode(field: Option<&str>, tag: &WireTypeTag) -> ConvertResult<NativeValue> {
    Decoder::default().decode(field, tag)
}

fn decode_fixed(raw: &str) -> NativeValue {
    if let Ok(n) = raw.parse::<i64>() {
        NativeValue::Int(n)
    } else if let Ok(n) = raw.parse::<u64>() {
        NativeValue::UInt(n)
    } else {
        NativeValue::Text(raw.to_string())
    }
}

fn decode_boolean(raw: &str) -> NativeValue {
    match raw.to_ascii_lowercase().as_str() {
        "true" | "1" => NativeValue::Bool(true),
        "false" | "0" => NativeValue::Bool(false),
        _ => NativeValue::Text(raw.to_string()),
    }
}

fn decode_real(raw: &str) -> NativeValue {
    raw.parse::<f64>()
        .map(NativeValue::Float)
        .unwrap_or_else(|_| NativeValue::Text(raw.to_string()))
}

fn decode_date(raw: &str) -> ConvertResult<NativeValue> {
    let days = raw
        .parse::<i64>()
        .map_err(|e| ConvertError::parse(raw, e))?;
    let secs = days
        .checked_mul(SECONDS_PER_DAY)
        .ok_or_else(|| ConvertError::OutOfRange(raw.to_string()))?;
    let dt = to_utc(raw, secs, 0)?;
    Ok(NativeValue::Temporal(Temporal::Date(dt)))
}

fn decode_time(raw: &str) -> ConvertResult<NativeValue> {
    let (sec, nsec) = decompose_epoch(raw)?;
    let elapsed = to_elapsed(raw, sec, nsec)?;
    let (time, _) = NaiveTime::MIN.overflowing_add_signed(elapsed);
    Ok(NativeValue::Temporal(Temporal::Time(time)))
}

fn decode_tz(raw: &str) -> ConvertResult<NativeValue> {
    let fields: Vec<&str> = raw.split(' ').collect();
    let [epoch, offset] = fields.as_slice() else {
        return Err(ConvertError::invalid_tz(raw));
    };

    let instant = parse_instant(epoch)?;
    let stored = offset
        .parse::<i64>()
        .map_err(|_| ConvertError::invalid_tz(raw))?;
    let minutes = stored
        .checked_sub(TZ_OFFSET_BIAS)
        .ok_or_else(|| ConvertError::invalid_tz(raw))?;
    let zone = minutes
        .checked_mul(60)
        .and_then(|secs| i32::try_from(secs).ok())
        .and_then(FixedOffset::east_opt)
        .ok_or_else(|| ConvertError::invalid_tz(raw))?;
    tracing::trace!("tz {:?}: offset {} minutes", raw, minutes);

    Ok(NativeValue::Temporal(Temporal::TimestampTz(
        instant.with_timezone(&zone),
    )))
}
