//! Session timezone used to resolve TIMESTAMP_LTZ values.

use std::fmt;
use std::str::FromStr;

use chrono::{FixedOffset, Local, NaiveDateTime, Offset, TimeZone, Utc};
use chrono_tz::Tz;
use nom::{
    IResult,
    bytes::complete::take_while_m_n,
    character::complete::{char, one_of},
    combinator::{map_res, opt},
    sequence::{preceded, tuple},
};

use crate::error::ConvertError;

/// Zone whose rules apply to local-time timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionZone {
    /// The zone configured for the process (`TZ`, `/etc/localtime`).
    #[default]
    Local,
    /// A fixed offset, e.g. from configuration.
    Fixed(FixedOffset),
    /// An IANA zone such as `America/New_York`, with its DST rules.
    Named(Tz),
}

impl SessionZone {
    pub fn utc() -> Self {
        SessionZone::Fixed(Utc.fix())
    }

    /// Offset from UTC in effect at the given UTC instant.
    pub fn offset_at(&self, utc: &NaiveDateTime) -> FixedOffset {
        match self {
            SessionZone::Local => Local.offset_from_utc_datetime(utc),
            SessionZone::Fixed(offset) => *offset,
            SessionZone::Named(tz) => tz.offset_from_utc_datetime(utc).fix(),
        }
    }
}

impl fmt::Display for SessionZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionZone::Local => write!(f, "local"),
            SessionZone::Fixed(offset) => write!(f, "{}", offset),
            SessionZone::Named(tz) => write!(f, "{}", tz.name()),
        }
    }
}

impl FromStr for SessionZone {
    type Err = ConvertError;

    /// Accepts `local`, `utc` / `z`, an offset like `+05:30`, `-0800`, `+09`,
    /// or an IANA name like `Europe/Paris`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s.to_ascii_lowercase().as_str() {
            "local" => return Ok(SessionZone::Local),
            "utc" | "z" => return Ok(SessionZone::utc()),
            _ => {}
        }

        let invalid = || ConvertError::Config(format!("Invalid timezone: '{}'", s));
        match parse_offset(s) {
            Ok(("", seconds)) => FixedOffset::east_opt(seconds)
                .map(SessionZone::Fixed)
                .ok_or_else(invalid),
            _ => s.parse::<Tz>().map(SessionZone::Named).map_err(|_| invalid()),
        }
    }
}

/// Parse `±HH[[:]MM]` into seconds east of UTC.
fn parse_offset(input: &str) -> IResult<&str, i32> {
    let (input, (sign, hours, minutes)) = tuple((
        one_of("+-"),
        two_digits,
        opt(preceded(opt(char(':')), two_digits)),
    ))(input)?;
    let seconds = (hours * 60 + minutes.unwrap_or(0)) * 60;
    Ok((input, if sign == '-' { -seconds } else { seconds }))
}

fn two_digits(input: &str) -> IResult<&str, i32> {
    map_res(take_while_m_n(2, 2, |c: char| c.is_ascii_digit()), |s: &str| {
        s.parse::<i32>()
    })(input)
}
