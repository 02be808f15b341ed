//! Value literal parser using nom.
//!
//! Turns command-line text into [`BindValue`]s.
//!
//! # Syntax Overview
//!
//! ```text
//! null  true  false         keywords (any case)
//! -42   42u                 signed / unsigned integers
//! 1.5   -2e-3               floats
//! 'it'  "it"                quoted text
//! @2024-01-31               date
//! @12:30:00.5               time of day
//! @2024-01-31T12:30:00      timestamp without zone
//! @2024-01-31T12:30:00+02:00  timestamp with offset
//! [1, 'a', null]            sequence
//! {id: 7, "full name": 'x'} map
//! ```
//!
//! Anything else at the top level is taken as bare text.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use nom::{
    IResult,
    branch::alt,
    bytes::complete::{tag_no_case, take_while, take_while1},
    character::complete::{char, digit1, multispace0, one_of, satisfy},
    combinator::{map, map_res, not, opt, recognize, value},
    error::{Error, ErrorKind},
    multi::separated_list0,
    sequence::{delimited, pair, preceded, separated_pair, terminated, tuple},
};

use crate::bind::BindValue;
use crate::error::{ConvertError, ConvertResult};
use crate::value::{NativeValue, Temporal};

/// Parse one literal. Unquoted text that is not a literal becomes text.
pub fn parse_literal(input: &str) -> ConvertResult<BindValue> {
    let input = input.trim();

    match terminated(literal, multispace0)(input) {
        Ok(("", v)) => Ok(v),
        Ok((remaining, _)) if !is_structured(input) => {
            tracing::trace!("'{}' is not a literal ({:?} left), using text", input, remaining);
            Ok(BindValue::from(input))
        }
        Ok((remaining, _)) => Err(ConvertError::literal(
            input.len() - remaining.len(),
            format!("Unexpected trailing content: '{}'", remaining),
        )),
        Err(_) if !is_structured(input) => Ok(BindValue::from(input)),
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => Err(ConvertError::literal(
            input.len() - e.input.len(),
            format!("Parse failed: {:?}", e.code),
        )),
        Err(e) => Err(ConvertError::literal(0, format!("Parse failed: {:?}", e))),
    }
}

/// Input that must parse as a literal rather than falling back to text.
fn is_structured(input: &str) -> bool {
    input.starts_with(['[', '{', '\'', '"', '@'])
}

fn literal(input: &str) -> IResult<&str, BindValue> {
    alt((
        map(sequence, BindValue::Seq),
        map(mapping, |entries| BindValue::Map(entries.into_iter().collect())),
        map(quoted, BindValue::from),
        map(temporal, BindValue::from),
        number,
        keyword,
    ))(input)
}

/// Element of a composite: a literal or a bare word.
fn element(input: &str) -> IResult<&str, BindValue> {
    alt((literal, map(bare_word, BindValue::from)))(input)
}

fn word_end(input: &str) -> IResult<&str, ()> {
    not(satisfy(|c: char| c.is_alphanumeric() || c == '_' || c == '.'))(input)
}

fn keyword(input: &str) -> IResult<&str, BindValue> {
    terminated(
        alt((
            value(BindValue::NULL, tag_no_case("null")),
            value(BindValue::from(true), tag_no_case("true")),
            value(BindValue::from(false), tag_no_case("false")),
        )),
        word_end,
    )(input)
}

fn number(input: &str) -> IResult<&str, BindValue> {
    let (rest, text) = recognize(tuple((
        opt(char('-')),
        digit1,
        opt(pair(char('.'), digit1)),
        opt(tuple((one_of("eE"), opt(one_of("+-")), digit1))),
    )))(input)?;
    let (rest, unsigned) = opt(char('u'))(rest)?;
    let (rest, _) = word_end(rest)?;

    let is_float = text.contains(['.', 'e', 'E']);
    let parsed = match (is_float, unsigned.is_some()) {
        (true, false) => text.parse::<f64>().ok().map(NativeValue::Float),
        (false, true) => text.parse::<u64>().ok().map(NativeValue::UInt),
        (false, false) => text
            .parse::<i64>()
            .ok()
            .map(NativeValue::Int)
            .or_else(|| text.parse::<u64>().ok().map(NativeValue::UInt)),
        (true, true) => None,
    };
    match parsed {
        Some(v) => Ok((rest, BindValue::Scalar(v))),
        None => Err(nom::Err::Error(Error::new(input, ErrorKind::Digit))),
    }
}

fn quoted(input: &str) -> IResult<&str, &str> {
    alt((
        delimited(char('\''), take_while(|c| c != '\''), char('\'')),
        delimited(char('"'), take_while(|c| c != '"'), char('"')),
    ))(input)
}

fn bare_word(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_alphanumeric() || matches!(c, '_' | '-' | '.'))(input)
}

fn temporal(input: &str) -> IResult<&str, Temporal> {
    map_res(
        preceded(
            char('@'),
            take_while1(|c: char| !c.is_whitespace() && !matches!(c, ',' | ']' | '}')),
        ),
        parse_temporal,
    )(input)
}

fn parse_temporal(text: &str) -> Result<Temporal, chrono::ParseError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Ok(Temporal::TimestampTz(dt));
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(Temporal::TimestampNtz(dt));
    }
    if let Ok(d) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Ok(Temporal::Date(d.and_time(NaiveTime::MIN).and_utc()));
    }
    NaiveTime::parse_from_str(text, "%H:%M:%S%.f").map(Temporal::Time)
}

fn comma(input: &str) -> IResult<&str, char> {
    delimited(multispace0, char(','), multispace0)(input)
}

fn sequence(input: &str) -> IResult<&str, Vec<BindValue>> {
    delimited(
        pair(char('['), multispace0),
        separated_list0(comma, element),
        pair(multispace0, char(']')),
    )(input)
}

fn mapping(input: &str) -> IResult<&str, Vec<(String, BindValue)>> {
    let key = map(alt((quoted, bare_word)), str::to_string);
    let entry = separated_pair(key, delimited(multispace0, char(':'), multispace0), element);
    delimited(
        pair(char('{'), multispace0),
        separated_list0(comma, entry),
        pair(multispace0, char('}')),
    )(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::BTreeMap;

    fn lit(s: &str) -> BindValue {
        parse_literal(s).unwrap()
    }

    #[test]
    fn test_keywords() {
        assert_eq!(lit("null"), BindValue::NULL);
        assert_eq!(lit("TRUE"), BindValue::from(true));
        assert_eq!(lit(" false "), BindValue::from(false));
        assert_eq!(lit("nullable"), BindValue::from("nullable"));
    }

    #[test]
    fn test_numbers() {
        assert_eq!(lit("-42"), BindValue::from(-42i64));
        assert_eq!(lit("42u"), BindValue::from(42u64));
        assert_eq!(lit("18446744073709551615"), BindValue::from(u64::MAX));
        assert_eq!(lit("1.5"), BindValue::from(1.5));
        assert_eq!(lit("-2e-3"), BindValue::from(-0.002));
        assert_eq!(lit("12abc"), BindValue::from("12abc"));
        assert_eq!(lit("1.5u"), BindValue::from("1.5u"));
    }

    #[test]
    fn test_text() {
        assert_eq!(lit("'hello world'"), BindValue::from("hello world"));
        assert_eq!(lit("\"it's\""), BindValue::from("it's"));
        assert_eq!(lit("plain words here"), BindValue::from("plain words here"));
    }

    #[test]
    fn test_temporal() {
        let v = lit("@2024-01-31");
        assert_eq!(v.kind(), "date");
        let v = lit("@12:30:00.5");
        assert_eq!(
            v,
            BindValue::from(NaiveTime::from_hms_milli_opt(12, 30, 0, 500).unwrap())
        );
        assert_eq!(lit("@2024-01-31T12:30:00").kind(), "timestamp_ntz");
        assert_eq!(lit("@2024-01-31T12:30:00+02:00").kind(), "timestamp_tz");
    }

    #[test]
    fn test_composites() {
        assert_eq!(
            lit("[1, 'a', null, word]"),
            BindValue::Seq(vec![
                BindValue::from(1i64),
                BindValue::from("a"),
                BindValue::NULL,
                BindValue::from("word"),
            ])
        );
        assert_eq!(lit("[]"), BindValue::Seq(vec![]));

        let mut expected = BTreeMap::new();
        expected.insert("id".to_string(), BindValue::from(7i64));
        expected.insert("full name".to_string(), BindValue::from("x"));
        expected.insert("tags".to_string(), BindValue::from(vec![true]));
        assert_eq!(
            lit("{id: 7, \"full name\": 'x', tags: [true]}"),
            BindValue::Map(expected)
        );
    }

    #[test]
    fn test_malformed_structures_are_errors() {
        for bad in ["[1, 2", "{a 1}", "'open", "@yesterday", "[1] tail"] {
            assert!(
                matches!(parse_literal(bad), Err(ConvertError::Literal { .. })),
                "{bad} should fail"
            );
        }
        match parse_literal("[1] tail") {
            Err(ConvertError::Literal { position, .. }) => assert_eq!(position, 4),
            other => panic!("unexpected {:?}", other),
        }
    }
}
