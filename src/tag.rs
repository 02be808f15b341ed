//! Logical column types reported by the warehouse.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::mem;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Logical type label accompanying every encoded field.
///
/// Parsing never fails: labels the driver does not know are kept in
/// [`WireTypeTag::Other`] and decoded with text semantics.
#[derive(Debug, Clone)]
pub enum WireTypeTag {
    Fixed,
    Boolean,
    Real,
    Text,
    Date,
    Time,
    TimestampNtz,
    TimestampLtz,
    TimestampTz,
    /// Unrecognized label as received. Compares case-insensitively.
    Other(String),
}

impl WireTypeTag {
    /// Every tag the decoder dispatches on.
    pub const KNOWN: [WireTypeTag; 9] = [
        WireTypeTag::Fixed,
        WireTypeTag::Boolean,
        WireTypeTag::Real,
        WireTypeTag::Text,
        WireTypeTag::Date,
        WireTypeTag::Time,
        WireTypeTag::TimestampNtz,
        WireTypeTag::TimestampLtz,
        WireTypeTag::TimestampTz,
    ];

    /// Parse a label as sent in column metadata (case-insensitive).
    pub fn parse(label: &str) -> Self {
        match label.to_ascii_lowercase().as_str() {
            "fixed" => WireTypeTag::Fixed,
            "boolean" => WireTypeTag::Boolean,
            "real" => WireTypeTag::Real,
            "text" => WireTypeTag::Text,
            "date" => WireTypeTag::Date,
            "time" => WireTypeTag::Time,
            "timestamp_ntz" => WireTypeTag::TimestampNtz,
            "timestamp_ltz" => WireTypeTag::TimestampLtz,
            "timestamp_tz" => WireTypeTag::TimestampTz,
            _ => WireTypeTag::Other(label.to_string()),
        }
    }

    /// Wire label: lower-case for known tags, as received otherwise.
    pub fn as_str(&self) -> &str {
        match self {
            WireTypeTag::Fixed => "fixed",
            WireTypeTag::Boolean => "boolean",
            WireTypeTag::Real => "real",
            WireTypeTag::Text => "text",
            WireTypeTag::Date => "date",
            WireTypeTag::Time => "time",
            WireTypeTag::TimestampNtz => "timestamp_ntz",
            WireTypeTag::TimestampLtz => "timestamp_ltz",
            WireTypeTag::TimestampTz => "timestamp_tz",
            WireTypeTag::Other(label) => label,
        }
    }

    /// Whether the decoder treats this tag as temporal.
    pub fn is_temporal(&self) -> bool {
        matches!(
            self,
            WireTypeTag::Date
                | WireTypeTag::Time
                | WireTypeTag::TimestampNtz
                | WireTypeTag::TimestampLtz
                | WireTypeTag::TimestampTz
        )
    }
}

impl PartialEq for WireTypeTag {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (WireTypeTag::Other(a), WireTypeTag::Other(b)) => a.eq_ignore_ascii_case(b),
            _ => mem::discriminant(self) == mem::discriminant(other),
        }
    }
}

impl Eq for WireTypeTag {}

impl Hash for WireTypeTag {
    fn hash<H: Hasher>(&self, state: &mut H) {
        mem::discriminant(self).hash(state);
        if let WireTypeTag::Other(label) = self {
            label.to_ascii_lowercase().hash(state);
        }
    }
}

impl FromStr for WireTypeTag {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(WireTypeTag::parse(s))
    }
}

impl From<&str> for WireTypeTag {
    fn from(label: &str) -> Self {
        WireTypeTag::parse(label)
    }
}

impl fmt::Display for WireTypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_str().to_ascii_uppercase())
    }
}

impl Serialize for WireTypeTag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for WireTypeTag {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        Ok(WireTypeTag::parse(&label))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_labels() {
        for tag in WireTypeTag::KNOWN {
            assert_eq!(WireTypeTag::parse(tag.as_str()), tag);
        }
        assert_eq!(WireTypeTag::parse("TIMESTAMP_TZ"), WireTypeTag::TimestampTz);
    }

    #[test]
    fn test_unknown_label_is_kept() {
        let tag: WireTypeTag = "Variant".parse().unwrap();
        assert_eq!(tag.as_str(), "Variant");
        assert_eq!(tag, WireTypeTag::Other("variant".to_string()));
        assert_ne!(tag, WireTypeTag::Other("object".to_string()));
        assert_eq!(tag.to_string(), "VARIANT");
        assert!(!tag.is_temporal());
    }

    #[test]
    fn test_display_is_upper_case() {
        assert_eq!(WireTypeTag::TimestampLtz.to_string(), "TIMESTAMP_LTZ");
        assert_eq!(WireTypeTag::Fixed.to_string(), "FIXED");
    }

    #[test]
    fn test_serde_uses_wire_label() {
        let json = serde_json::to_string(&WireTypeTag::TimestampNtz).unwrap();
        assert_eq!(json, "\"timestamp_ntz\"");
        let back: WireTypeTag = serde_json::from_str("\"DATE\"").unwrap();
        assert_eq!(back, WireTypeTag::Date);
    }

    #[test]
    fn test_unknown_labels_hash_case_insensitively() {
        use std::collections::HashSet;

        let tags: HashSet<WireTypeTag> = ["Geography", "GEOGRAPHY", "geography", "text"]
            .into_iter()
            .map(WireTypeTag::parse)
            .collect();
        assert_eq!(tags.len(), 2);
        assert!(tags.contains(&WireTypeTag::Text));
    }
}
