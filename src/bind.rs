//! Parameter values accepted by the encoder.
//!
//! [`BindValue`] is the only place composites live. Arbitrary caller data
//! enters through [`BindValue::from_serialize`], which is also the only
//! place an unsupported kind can be reported.

use std::collections::BTreeMap;
use std::fmt::Display;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::ser::{self, Impossible, Serialize, SerializeMap as _, Serializer};

use crate::error::{ConvertError, ConvertResult};
use crate::value::{NativeValue, Temporal};

/// A value to bind as a query parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum BindValue {
    Scalar(NativeValue),
    Seq(Vec<BindValue>),
    Map(BTreeMap<String, BindValue>),
}

impl BindValue {
    pub const NULL: BindValue = BindValue::Scalar(NativeValue::Null);

    /// Convert any serializable value.
    ///
    /// # Example
    ///
    /// ```
    /// use flakecast::{BindValue, NativeValue};
    ///
    /// let v = BindValue::from_serialize(&Some(7u8)).unwrap();
    /// assert_eq!(v, BindValue::Scalar(NativeValue::UInt(7)));
    /// assert!(BindValue::from_serialize(&1u128).is_ok());
    /// assert!(BindValue::from_serialize(&u128::MAX).is_err());
    /// ```
    pub fn from_serialize<T: Serialize + ?Sized>(value: &T) -> ConvertResult<BindValue> {
        value.serialize(BindSerializer)
    }

    pub fn as_native(&self) -> Option<&NativeValue> {
        match self {
            BindValue::Scalar(v) => Some(v),
            _ => None,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            BindValue::Scalar(v) => v.kind(),
            BindValue::Seq(_) => "sequence",
            BindValue::Map(_) => "map",
        }
    }

    /// Composite with no elements.
    pub fn is_empty_composite(&self) -> bool {
        match self {
            BindValue::Seq(items) => items.is_empty(),
            BindValue::Map(entries) => entries.is_empty(),
            BindValue::Scalar(_) => false,
        }
    }
}

impl Serialize for BindValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            BindValue::Scalar(v) => v.serialize(serializer),
            BindValue::Seq(items) => serializer.collect_seq(items),
            BindValue::Map(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (k, v) in entries {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            }
        }
    }
}

impl From<NativeValue> for BindValue {
    fn from(v: NativeValue) -> Self {
        BindValue::Scalar(v)
    }
}

macro_rules! bind_from_scalar {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl From<$ty> for BindValue {
                fn from(v: $ty) -> Self {
                    BindValue::Scalar(NativeValue::from(v))
                }
            }
        )+
    };
}

bind_from_scalar!(
    bool, i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64, char, &str, String,
    Temporal, NaiveDate, NaiveTime, NaiveDateTime, DateTime<Utc>, DateTime<FixedOffset>,
);

impl<T: Into<BindValue>> From<Vec<T>> for BindValue {
    fn from(items: Vec<T>) -> Self {
        BindValue::Seq(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<BindValue>> From<BTreeMap<String, T>> for BindValue {
    fn from(entries: BTreeMap<String, T>) -> Self {
        BindValue::Map(entries.into_iter().map(|(k, v)| (k, v.into())).collect())
    }
}

impl<T: Into<BindValue>> From<Option<T>> for BindValue {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(BindValue::NULL)
    }
}

impl ser::Error for ConvertError {
    fn custom<T: Display>(msg: T) -> Self {
        ConvertError::unsupported(msg.to_string())
    }
}

/// Serializer producing [`BindValue`]s.
struct BindSerializer;

fn scalar(v: impl Into<NativeValue>) -> ConvertResult<BindValue> {
    Ok(BindValue::Scalar(v.into()))
}

impl Serializer for BindSerializer {
    type Ok = BindValue;
    type Error = ConvertError;
    type SerializeSeq = SeqBuilder;
    type SerializeTuple = SeqBuilder;
    type SerializeTupleStruct = SeqBuilder;
    type SerializeTupleVariant = Impossible<BindValue, ConvertError>;
    type SerializeMap = MapBuilder;
    type SerializeStruct = MapBuilder;
    type SerializeStructVariant = Impossible<BindValue, ConvertError>;

    fn serialize_bool(self, v: bool) -> ConvertResult<BindValue> {
        scalar(v)
    }

    fn serialize_i8(self, v: i8) -> ConvertResult<BindValue> {
        scalar(v)
    }

    fn serialize_i16(self, v: i16) -> ConvertResult<BindValue> {
        scalar(v)
    }

    fn serialize_i32(self, v: i32) -> ConvertResult<BindValue> {
        scalar(v)
    }

    fn serialize_i64(self, v: i64) -> ConvertResult<BindValue> {
        scalar(v)
    }

    fn serialize_i128(self, v: i128) -> ConvertResult<BindValue> {
        if let Ok(n) = i64::try_from(v) {
            scalar(n)
        } else if let Ok(n) = u64::try_from(v) {
            scalar(n)
        } else {
            Err(ConvertError::unsupported("i128"))
        }
    }

    fn serialize_u8(self, v: u8) -> ConvertResult<BindValue> {
        scalar(v)
    }

    fn serialize_u16(self, v: u16) -> ConvertResult<BindValue> {
        scalar(v)
    }

    fn serialize_u32(self, v: u32) -> ConvertResult<BindValue> {
        scalar(v)
    }

    fn serialize_u64(self, v: u64) -> ConvertResult<BindValue> {
        scalar(v)
    }

    fn serialize_u128(self, v: u128) -> ConvertResult<BindValue> {
        u64::try_from(v)
            .map(NativeValue::UInt)
            .map(BindValue::Scalar)
            .map_err(|_| ConvertError::unsupported("u128"))
    }

    fn serialize_f32(self, v: f32) -> ConvertResult<BindValue> {
        scalar(v)
    }

    fn serialize_f64(self, v: f64) -> ConvertResult<BindValue> {
        scalar(v)
    }

    fn serialize_char(self, v: char) -> ConvertResult<BindValue> {
        scalar(v)
    }

    fn serialize_str(self, v: &str) -> ConvertResult<BindValue> {
        scalar(v)
    }

    fn serialize_bytes(self, _v: &[u8]) -> ConvertResult<BindValue> {
        Err(ConvertError::unsupported("bytes"))
    }

    fn serialize_none(self) -> ConvertResult<BindValue> {
        Ok(BindValue::NULL)
    }

    fn serialize_some<T: ?Sized + Serialize>(self, value: &T) -> ConvertResult<BindValue> {
        value.serialize(self)
    }

    fn serialize_unit(self) -> ConvertResult<BindValue> {
        Ok(BindValue::NULL)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> ConvertResult<BindValue> {
        Ok(BindValue::NULL)
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _index: u32,
        variant: &'static str,
    ) -> ConvertResult<BindValue> {
        scalar(variant)
    }

    fn serialize_newtype_struct<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        value: &T,
    ) -> ConvertResult<BindValue> {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: ?Sized + Serialize>(
        self,
        name: &'static str,
        _index: u32,
        variant: &'static str,
        _value: &T,
    ) -> ConvertResult<BindValue> {
        Err(variant_error(name, variant))
    }

    fn serialize_seq(self, len: Option<usize>) -> ConvertResult<SeqBuilder> {
        Ok(SeqBuilder {
            items: Vec::with_capacity(len.unwrap_or(0)),
        })
    }

    fn serialize_tuple(self, len: usize) -> ConvertResult<SeqBuilder> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_struct(self, _name: &'static str, len: usize) -> ConvertResult<SeqBuilder> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_variant(
        self,
        name: &'static str,
        _index: u32,
        variant: &'static str,
        _len: usize,
    ) -> ConvertResult<Self::SerializeTupleVariant> {
        Err(variant_error(name, variant))
    }

    fn serialize_map(self, _len: Option<usize>) -> ConvertResult<MapBuilder> {
        Ok(MapBuilder::default())
    }

    fn serialize_struct(self, _name: &'static str, _len: usize) -> ConvertResult<MapBuilder> {
        Ok(MapBuilder::default())
    }

    fn serialize_struct_variant(
        self,
        name: &'static str,
        _index: u32,
        variant: &'static str,
        _len: usize,
    ) -> ConvertResult<Self::SerializeStructVariant> {
        Err(variant_error(name, variant))
    }
}

fn variant_error(name: &str, variant: &str) -> ConvertError {
    ConvertError::unsupported(format!("enum variant {}::{}", name, variant))
}

struct SeqBuilder {
    items: Vec<BindValue>,
}

impl SeqBuilder {
    fn push<T: ?Sized + Serialize>(&mut self, value: &T) -> ConvertResult<()> {
        self.items.push(value.serialize(BindSerializer)?);
        Ok(())
    }
}

impl ser::SerializeSeq for SeqBuilder {
    type Ok = BindValue;
    type Error = ConvertError;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> ConvertResult<()> {
        self.push(value)
    }

    fn end(self) -> ConvertResult<BindValue> {
        Ok(BindValue::Seq(self.items))
    }
}

impl ser::SerializeTuple for SeqBuilder {
    type Ok = BindValue;
    type Error = ConvertError;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> ConvertResult<()> {
        self.push(value)
    }

    fn end(self) -> ConvertResult<BindValue> {
        Ok(BindValue::Seq(self.items))
    }
}

impl ser::SerializeTupleStruct for SeqBuilder {
    type Ok = BindValue;
    type Error = ConvertError;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> ConvertResult<()> {
        self.push(value)
    }

    fn end(self) -> ConvertResult<BindValue> {
        Ok(BindValue::Seq(self.items))
    }
}

#[derive(Default)]
struct MapBuilder {
    entries: BTreeMap<String, BindValue>,
    next_key: Option<String>,
}

/// Map keys must be scalars with a text form.
fn map_key(key: BindValue) -> ConvertResult<String> {
    match key {
        BindValue::Scalar(NativeValue::Text(s)) => Ok(s),
        BindValue::Scalar(v @ (NativeValue::Bool(_) | NativeValue::Int(_) | NativeValue::UInt(_))) => {
            Ok(v.to_string())
        }
        other => Err(ConvertError::unsupported(format!(
            "map key of kind {}",
            other.kind()
        ))),
    }
}

impl ser::SerializeMap for MapBuilder {
    type Ok = BindValue;
    type Error = ConvertError;

    fn serialize_key<T: ?Sized + Serialize>(&mut self, key: &T) -> ConvertResult<()> {
        self.next_key = Some(map_key(key.serialize(BindSerializer)?)?);
        Ok(())
    }

    fn serialize_value<T: ?Sized + Serialize>(&mut self, value: &T) -> ConvertResult<()> {
        let key = self
            .next_key
            .take()
            .ok_or_else(|| ConvertError::unsupported("map value without key"))?;
        self.entries.insert(key, value.serialize(BindSerializer)?);
        Ok(())
    }

    fn end(self) -> ConvertResult<BindValue> {
        Ok(BindValue::Map(self.entries))
    }
}

impl ser::SerializeStruct for MapBuilder {
    type Ok = BindValue;
    type Error = ConvertError;

    fn serialize_field<T: ?Sized + Serialize>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> ConvertResult<()> {
        self.entries
            .insert(key.to_string(), value.serialize(BindSerializer)?);
        Ok(())
    }

    fn end(self) -> ConvertResult<BindValue> {
        Ok(BindValue::Map(self.entries))
    }
}
