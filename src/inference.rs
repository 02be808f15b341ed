//! Wire type inference for bound parameters.

use crate::bind::BindValue;
use crate::tag::WireTypeTag;
use crate::value::NativeValue;

/// Tag announced to the server for a parameter.
///
/// Temporal values of every kind are announced as `DATE`, so the server
/// drops any time-of-day component.
pub fn infer_tag(value: &BindValue) -> WireTypeTag {
    match value {
        BindValue::Scalar(v) => infer_native_tag(v),
        BindValue::Seq(_) | BindValue::Map(_) => WireTypeTag::Text,
    }
}

pub fn infer_native_tag(value: &NativeValue) -> WireTypeTag {
    match value {
        NativeValue::Int(_) | NativeValue::UInt(_) => WireTypeTag::Fixed,
        NativeValue::Bool(_) => WireTypeTag::Boolean,
        NativeValue::Float(_) => WireTypeTag::Real,
        NativeValue::Temporal(_) => WireTypeTag::Date,
        NativeValue::Text(_) | NativeValue::Null => WireTypeTag::Text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, NaiveTime};

    #[test]
    fn test_infer_scalars() {
        assert_eq!(infer_tag(&BindValue::from(-1i8)), WireTypeTag::Fixed);
        assert_eq!(infer_tag(&BindValue::from(u64::MAX)), WireTypeTag::Fixed);
        assert_eq!(infer_tag(&BindValue::from(false)), WireTypeTag::Boolean);
        assert_eq!(infer_tag(&BindValue::from(2.5f32)), WireTypeTag::Real);
        assert_eq!(infer_tag(&BindValue::from("s")), WireTypeTag::Text);
    }

    #[test]
    fn test_temporal_is_always_date() {
        let ts = DateTime::from_timestamp(1_700_000_000, 5).unwrap();
        assert_eq!(infer_tag(&BindValue::from(ts)), WireTypeTag::Date);
        assert_eq!(
            infer_tag(&BindValue::from(NaiveTime::from_hms_opt(9, 30, 0).unwrap())),
            WireTypeTag::Date
        );
    }

    #[test]
    fn test_fallback_is_text() {
        assert_eq!(infer_tag(&BindValue::NULL), WireTypeTag::Text);
        assert_eq!(infer_tag(&BindValue::from(vec![1, 2])), WireTypeTag::Text);
    }
}
