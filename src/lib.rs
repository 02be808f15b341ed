//! # flakecast — wire value marshaling
//!
//! Warehouse result sets arrive as strings tagged with a logical column
//! type. flakecast turns one such field into a native value, and turns
//! native parameter values back into wire strings with an inferred tag.
//!
//! ## Quick Example
//!
//! ```
//! use flakecast::prelude::*;
//!
//! // Result path: string + tag -> native value
//! let value = flakecast::decode(Some("1000.5 1440"), &WireTypeTag::TimestampTz)?;
//! assert_eq!(value.to_string(), "1970-01-01T00:16:40.500+00:00");
//!
//! // Binding path: native value -> tag + string
//! let param = BindValue::from(42);
//! assert_eq!(flakecast::infer_tag(&param), WireTypeTag::Fixed);
//! assert_eq!(flakecast::encode(&param)?, Some("42".to_string()));
//! # Ok::<(), ConvertError>(())
//! ```
//!
//! ## Wire tags
//!
//! | Tag             | Wire payload                         |
//! |-----------------|--------------------------------------|
//! | `FIXED`         | decimal integer                      |
//! | `BOOLEAN`       | `true` / `false`                     |
//! | `REAL`          | decimal float                        |
//! | `TEXT`          | the text itself                      |
//! | `DATE`          | days since 1970-01-01                |
//! | `TIME`          | seconds since midnight, fraction     |
//! | `TIMESTAMP_NTZ` | epoch seconds, fraction              |
//! | `TIMESTAMP_LTZ` | epoch seconds, fraction              |
//! | `TIMESTAMP_TZ`  | epoch seconds, space, offset + 1440  |

pub mod bind;
pub mod config;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod inference;
pub mod literal;
pub mod tag;
pub mod timestamp;
pub mod value;
pub mod zone;

pub use bind::BindValue;
pub use decoder::{Decoder, decode};
pub use encoder::{BindParameter, bind_parameters, encode, encode_serialize};
pub use error::{ConvertError, ConvertResult};
pub use inference::infer_tag;
pub use tag::WireTypeTag;
pub use timestamp::decompose_epoch;
pub use value::{NativeValue, Temporal};
pub use zone::SessionZone;

pub mod prelude {
    pub use crate::bind::BindValue;
    pub use crate::config::{Config, OutputFormat};
    pub use crate::decoder::Decoder;
    pub use crate::error::*;
    pub use crate::literal::parse_literal;
    pub use crate::tag::WireTypeTag;
    pub use crate::value::{NativeValue, Temporal};
    pub use crate::zone::SessionZone;
}
