//! Encoding of parameter values into wire strings.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::bind::BindValue;
use crate::error::{ConvertError, ConvertResult};
use crate::inference::infer_tag;
use crate::tag::WireTypeTag;
use crate::value::NativeValue;

/// One bound parameter as sent to the server.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BindParameter {
    #[serde(rename = "type")]
    pub tag: WireTypeTag,
    pub value: Option<String>,
}

/// Encode a value for binding. `None` is SQL null.
///
/// Composites have no defined wire form: empty ones bind as null, others as
/// their JSON text.
pub fn encode(value: &BindValue) -> ConvertResult<Option<String>> {
    let encoded = match value {
        BindValue::Scalar(v) => encode_native(v),
        composite if composite.is_empty_composite() => None,
        composite => Some(
            serde_json::to_string(composite)
                .map_err(|e| ConvertError::unsupported(format!("{}: {}", composite.kind(), e)))?,
        ),
    };
    tracing::trace!("encode {} -> {:?}", value.kind(), encoded);
    Ok(encoded)
}

/// Encode a scalar.
pub fn encode_native(value: &NativeValue) -> Option<String> {
    match value {
        NativeValue::Null => None,
        NativeValue::Bool(b) => Some(b.to_string()),
        NativeValue::Int(n) => Some(n.to_string()),
        NativeValue::UInt(n) => Some(n.to_string()),
        NativeValue::Float(x) => Some(format_float32(*x)),
        NativeValue::Text(s) => Some(s.clone()),
        NativeValue::Temporal(t) => Some(t.to_rfc3339()),
    }
}

/// Convert and encode any serializable value.
pub fn encode_serialize<T: Serialize + ?Sized>(value: &T) -> ConvertResult<Option<String>> {
    encode(&BindValue::from_serialize(value)?)
}

/// Infer and encode a positional parameter list, keyed `"1"`, `"2"`, ...
pub fn bind_parameters(values: &[BindValue]) -> ConvertResult<BTreeMap<String, BindParameter>> {
    values
        .iter()
        .enumerate()
        .map(|(i, v)| {
            let param = BindParameter {
                tag: infer_tag(v),
                value: encode(v)?,
            };
            Ok(((i + 1).to_string(), param))
        })
        .collect()
}

/// Shortest text of `x` narrowed to `f32`, in `%g` layout: exponent form
/// when the decimal exponent is below -4 or at least 6.
///
/// ```
/// use flakecast::encoder::format_float32;
///
/// assert_eq!(format_float32(0.1), "0.1");
/// assert_eq!(format_float32(1e6), "1e+06");
/// assert_eq!(format_float32(3.141592653589793), "3.1415927");
/// ```
pub fn format_float32(x: f64) -> String {
    let x = x as f32;
    if x.is_nan() {
        return "NaN".to_string();
    }
    if x.is_infinite() {
        return if x > 0.0 { "+Inf" } else { "-Inf" }.to_string();
    }

    let sign = if x.is_sign_negative() { "-" } else { "" };
    // `{:e}` yields the shortest round-trip digits, e.g. "1.2345e6"
    let sci = format!("{:e}", x.abs());
    let (mantissa, exp) = sci.split_once('e').unwrap_or((sci.as_str(), "0"));
    let exp: i32 = exp.parse().unwrap_or(0);
    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();

    let body = if !(-4..6).contains(&exp) {
        let (first, rest) = digits.split_at(1);
        let frac = if rest.is_empty() {
            String::new()
        } else {
            format!(".{}", rest)
        };
        let exp_sign = if exp < 0 { '-' } else { '+' };
        format!("{}{}e{}{:02}", first, frac, exp_sign, exp.unsigned_abs())
    } else if exp < 0 {
        format!("0.{}{}", "0".repeat((-exp - 1) as usize), digits)
    } else {
        let int_len = exp as usize + 1;
        if digits.len() <= int_len {
            format!("{}{}", digits, "0".repeat(int_len - digits.len()))
        } else {
            format!("{}.{}", &digits[..int_len], &digits[int_len..])
        }
    };
    format!("{}{}", sign, body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn enc(v: impl Into<BindValue>) -> Option<String> {
        encode(&v.into()).unwrap()
    }

    #[test]
    fn test_scalars() {
        assert_eq!(enc(BindValue::NULL), None);
        assert_eq!(enc(true), Some("true".into()));
        assert_eq!(enc(false), Some("false".into()));
        assert_eq!(enc(i64::MIN), Some("-9223372036854775808".into()));
        assert_eq!(enc(u64::MAX), Some("18446744073709551615".into()));
        assert_eq!(enc("as is "), Some("as is ".into()));
    }

    #[test]
    fn test_float_rounds_to_single_precision() {
        assert_eq!(format_float32(1.0), "1");
        assert_eq!(format_float32(0.1), "0.1");
        assert_eq!(format_float32(-2.5), "-2.5");
        assert_eq!(format_float32(123456.0), "123456");
        assert_eq!(format_float32(1234567.0), "1.234567e+06");
        assert_eq!(format_float32(16777217.0), "1.6777216e+07");
        assert_eq!(format_float32(0.0001), "0.0001");
        assert_eq!(format_float32(0.00001), "1e-05");
        assert_eq!(format_float32(1.5e-7), "1.5e-07");
        assert_eq!(format_float32(0.1 + 0.2), "0.3");
        assert_eq!(format_float32(3.4028235e38), "3.4028235e+38");
    }

    #[test]
    fn test_float_specials() {
        assert_eq!(format_float32(0.0), "0");
        assert_eq!(format_float32(-0.0), "-0");
        assert_eq!(format_float32(f64::NAN), "NaN");
        assert_eq!(format_float32(1e300), "+Inf");
        assert_eq!(format_float32(f64::NEG_INFINITY), "-Inf");
    }

    #[test]
    fn test_temporal_uses_text_form() {
        let day = NaiveDate::from_ymd_opt(2020, 1, 2).unwrap();
        assert_eq!(enc(day), Some("2020-01-02T00:00:00Z".into()));
    }

    #[test]
    fn test_composites() {
        assert_eq!(enc(Vec::<i32>::new()), None);
        assert_eq!(enc(BindValue::Map(BTreeMap::new())), None);
        assert_eq!(enc(vec![1, 2]), Some("[1,2]".into()));
        let mut m = BTreeMap::new();
        m.insert("k".to_string(), "v");
        assert_eq!(enc(m), Some("{\"k\":\"v\"}".into()));
    }

    #[test]
    fn test_encode_serialize_reports_unsupported() {
        assert_eq!(encode_serialize(&Some(5u8)).unwrap(), Some("5".into()));
        assert!(matches!(
            encode_serialize(&u128::MAX),
            Err(ConvertError::UnsupportedType { .. })
        ));
    }

    #[test]
    fn test_bind_parameters() {
        let params = bind_parameters(&[
            BindValue::from(42),
            BindValue::from("x"),
            BindValue::NULL,
        ])
        .unwrap();
        assert_eq!(params.len(), 3);
        assert_eq!(params["1"].tag, WireTypeTag::Fixed);
        assert_eq!(params["1"].value.as_deref(), Some("42"));
        assert_eq!(params["2"].tag, WireTypeTag::Text);
        assert_eq!(params["3"].value, None);

        let json = serde_json::to_string(&params["1"]).unwrap();
        assert_eq!(json, "{\"type\":\"fixed\",\"value\":\"42\"}");
    }
}
