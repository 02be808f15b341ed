//! Epoch decomposition for temporal wire values.
//!
//! The warehouse sends temporal values as seconds since the Unix epoch with
//! an optional decimal fraction, e.g. `"1700000000.123456789"`. The
//! fraction is scaled to nanoseconds by right-padding it to nine digits.

use chrono::{DateTime, TimeDelta, Utc};

use crate::error::{ConvertError, ConvertResult};

const NANOS_PER_SEC: i64 = 1_000_000_000;
const FRACTION_DIGITS: usize = 9;

/// Split an epoch string into `(seconds, nanoseconds)`.
///
/// A fraction longer than nine digits is parsed as-is, so the returned
/// nanosecond count may exceed one second. [`to_utc`] carries the excess
/// into the seconds.
pub fn decompose_epoch(raw: &str) -> ConvertResult<(i64, i64)> {
    let (sec, nsec) = match raw.split_once('.') {
        None => (parse_segment(raw)?, 0),
        Some((whole, fraction)) => {
            let sec = parse_segment(whole)?;
            let nsec = if fraction.len() < FRACTION_DIGITS {
                parse_segment(&format!("{:0<width$}", fraction, width = FRACTION_DIGITS))?
            } else {
                parse_segment(fraction)?
            };
            (sec, nsec)
        }
    };
    tracing::trace!("epoch {:?}: sec={}, nsec={}", raw, sec, nsec);
    Ok((sec, nsec))
}

/// Materialize decomposed parts as a UTC instant.
///
/// Nanoseconds outside `0..1_000_000_000` are normalized into the seconds,
/// so `(-1, 500_000_000)` is half a second before the epoch.
pub fn to_utc(raw: &str, sec: i64, nsec: i64) -> ConvertResult<DateTime<Utc>> {
    let sec = sec
        .checked_add(nsec.div_euclid(NANOS_PER_SEC))
        .ok_or_else(|| ConvertError::OutOfRange(raw.to_string()))?;
    let nsec = nsec.rem_euclid(NANOS_PER_SEC) as u32;
    DateTime::from_timestamp(sec, nsec).ok_or_else(|| ConvertError::OutOfRange(raw.to_string()))
}

/// Elapsed time represented by decomposed parts.
pub fn to_elapsed(raw: &str, sec: i64, nsec: i64) -> ConvertResult<TimeDelta> {
    TimeDelta::try_seconds(sec)
        .and_then(|d| d.checked_add(&TimeDelta::nanoseconds(nsec)))
        .ok_or_else(|| ConvertError::OutOfRange(raw.to_string()))
}

/// Decode an epoch string straight to a UTC instant.
pub fn parse_instant(raw: &str) -> ConvertResult<DateTime<Utc>> {
    let (sec, nsec) = decompose_epoch(raw)?;
    to_utc(raw, sec, nsec)
}

fn parse_segment(segment: &str) -> ConvertResult<i64> {
    segment
        .parse::<i64>()
        .map_err(|e| ConvertError::parse(segment, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whole_seconds() {
        assert_eq!(decompose_epoch("1000").unwrap(), (1000, 0));
        assert_eq!(decompose_epoch("-86400").unwrap(), (-86400, 0));
    }

    #[test]
    fn test_fraction_is_padded() {
        assert_eq!(decompose_epoch("1000.123").unwrap(), (1000, 123_000_000));
        assert_eq!(decompose_epoch("1000.5").unwrap(), (1000, 500_000_000));
        assert_eq!(decompose_epoch("1000.123456789").unwrap(), (1000, 123_456_789));
        assert_eq!(decompose_epoch("0.000000001").unwrap(), (0, 1));
    }

    #[test]
    fn test_long_fraction_not_truncated() {
        assert_eq!(
            decompose_epoch("1.1234567891").unwrap(),
            (1, 1_234_567_891)
        );
        let dt = parse_instant("1.1234567891").unwrap();
        assert_eq!(dt.timestamp(), 2);
        assert_eq!(dt.timestamp_subsec_nanos(), 234_567_891);
    }

    #[test]
    fn test_malformed_segments() {
        assert!(matches!(
            decompose_epoch("12a"),
            Err(ConvertError::Parse { ref input, .. }) if input == "12a"
        ));
        assert!(matches!(
            decompose_epoch("x.5"),
            Err(ConvertError::Parse { ref input, .. }) if input == "x"
        ));
        assert!(matches!(
            decompose_epoch("5.x"),
            Err(ConvertError::Parse { ref input, .. }) if input == "x00000000"
        ));
        assert!(decompose_epoch("").is_err());
        assert!(decompose_epoch("1.2.3").is_err());
    }

    #[test]
    fn test_negative_seconds_with_fraction() {
        let dt = parse_instant("-1.5").unwrap();
        assert_eq!(dt.timestamp(), -1);
        assert_eq!(dt.timestamp_subsec_nanos(), 500_000_000);
    }

    #[test]
    fn test_out_of_range_instant() {
        assert!(matches!(
            parse_instant("9223372036854775807"),
            Err(ConvertError::OutOfRange(_))
        ));
    }

    #[test]
    fn test_elapsed() {
        let d = to_elapsed("3661.25", 3661, 250_000_000).unwrap();
        assert_eq!(d.num_milliseconds(), 3_661_250);
    }
}
