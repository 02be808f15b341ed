//! Error types for flakecast.

use std::num::ParseIntError;

use thiserror::Error;

/// The main error type for value conversion.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// The value's kind has no wire representation.
    #[error("Unsupported type for binding: {kind}")]
    UnsupportedType { kind: String },

    /// A numeric segment of an epoch or day-count string is not base-10.
    #[error("Invalid number '{input}': {source}")]
    Parse {
        input: String,
        #[source]
        source: ParseIntError,
    },

    /// Malformed TIMESTAMP_TZ payload.
    #[error("Invalid TIMESTAMP_TZ data: {0}")]
    InvalidTimestampTz(String),

    /// The decoded instant does not fit the calendar range.
    #[error("Timestamp out of range: {0}")]
    OutOfRange(String),

    /// Failed to parse a value literal.
    #[error("Literal error at position {position}: {message}")]
    Literal { position: usize, message: String },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ConvertError {
    /// Create an unsupported type error for the given kind name.
    pub fn unsupported(kind: impl Into<String>) -> Self {
        Self::UnsupportedType { kind: kind.into() }
    }

    /// Create a parse error for a numeric segment.
    pub fn parse(input: impl Into<String>, source: ParseIntError) -> Self {
        Self::Parse {
            input: input.into(),
            source,
        }
    }

    /// Create a literal error at the given position.
    pub fn literal(position: usize, message: impl Into<String>) -> Self {
        Self::Literal {
            position,
            message: message.into(),
        }
    }

    /// Create a TIMESTAMP_TZ error carrying the full raw payload.
    pub fn invalid_tz(raw: impl Into<String>) -> Self {
        Self::InvalidTimestampTz(raw.into())
    }
}

/// Result type alias for conversions.
pub type ConvertResult<T> = Result<T, ConvertError>;
