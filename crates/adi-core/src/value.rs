// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Dynamically typed values and their static Rust counterparts.
//!
//! [`Variant`] is the value stored in variable nodes and passed to methods.
//! [`VariantValue`] maps Rust types onto variants so typed accessors can cast
//! in both directions.
//!
//! # Examples
//!
//! ```
//! use adi_core::types::{DataType, ValueRank};
//! use adi_core::value::{Variant, VariantValue};
//!
//! let value = Variant::from(42u32);
//! assert_eq!(value.data_type(), DataType::UInt32);
//! assert!(value.is_compatible(DataType::UInt32, ValueRank::SCALAR));
//! assert!(!value.is_compatible(DataType::String, ValueRank::SCALAR));
//!
//! assert_eq!(i64::from_variant(&value), Some(42));
//! assert_eq!(u8::from_variant(&Variant::from(300u32)), None);
//! ```

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{NodeError, NodeResult};
use crate::types::{DataType, NodeId, QualifiedName, ValueRank};

// =============================================================================
// Variant
// =============================================================================

/// A value of any built-in data type, or an array of them.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum Variant {
    /// No value.
    #[default]
    Empty,
    /// Boolean value.
    Boolean(bool),
    /// Signed 8-bit integer.
    SByte(i8),
    /// Unsigned 8-bit integer.
    Byte(u8),
    /// Signed 16-bit integer.
    Int16(i16),
    /// Unsigned 16-bit integer.
    UInt16(u16),
    /// Signed 32-bit integer.
    Int32(i32),
    /// Unsigned 32-bit integer.
    UInt32(u32),
    /// Signed 64-bit integer.
    Int64(i64),
    /// Unsigned 64-bit integer.
    UInt64(u64),
    /// 32-bit float.
    Float(f32),
    /// 64-bit float.
    Double(f64),
    /// UTF-8 string.
    String(String),
    /// UTC timestamp.
    DateTime(DateTime<Utc>),
    /// GUID.
    Guid(Uuid),
    /// Raw bytes.
    ByteString(Vec<u8>),
    /// Node identifier.
    NodeId(NodeId),
    /// Status code.
    StatusCode(u32),
    /// Qualified name.
    QualifiedName(QualifiedName),
    /// Localized text (invariant locale).
    LocalizedText(String),
    /// Homogeneous array.
    Array(Array),
}

impl Variant {
    /// Returns `true` if this is the empty value.
    #[inline]
    pub fn is_empty(&self) -> bool {
        matches!(self, Variant::Empty)
    }

    /// Returns the concrete data type of this value.
    ///
    /// Arrays report their element type. The empty value reports
    /// `BaseDataType`.
    pub fn data_type(&self) -> DataType {
        match self {
            Variant::Empty => DataType::BaseDataType,
            Variant::Boolean(_) => DataType::Boolean,
            Variant::SByte(_) => DataType::SByte,
            Variant::Byte(_) => DataType::Byte,
            Variant::Int16(_) => DataType::Int16,
            Variant::UInt16(_) => DataType::UInt16,
            Variant::Int32(_) => DataType::Int32,
            Variant::UInt32(_) => DataType::UInt32,
            Variant::Int64(_) => DataType::Int64,
            Variant::UInt64(_) => DataType::UInt64,
            Variant::Float(_) => DataType::Float,
            Variant::Double(_) => DataType::Double,
            Variant::String(_) => DataType::String,
            Variant::DateTime(_) => DataType::DateTime,
            Variant::Guid(_) => DataType::Guid,
            Variant::ByteString(_) => DataType::ByteString,
            Variant::NodeId(_) => DataType::NodeId,
            Variant::StatusCode(_) => DataType::StatusCode,
            Variant::QualifiedName(_) => DataType::QualifiedName,
            Variant::LocalizedText(_) => DataType::LocalizedText,
            Variant::Array(array) => array.element_type(),
        }
    }

    /// Returns the concrete rank: -1 for scalars, the dimension count for
    /// arrays.
    pub fn value_rank(&self) -> i32 {
        match self {
            Variant::Array(array) => array.rank(),
            _ => -1,
        }
    }

    /// Returns `true` if this value may be stored where `data_type` and
    /// `value_rank` are declared.
    ///
    /// The empty value is only compatible with `BaseDataType`; variables
    /// additionally accept it as "no value".
    pub fn is_compatible(&self, data_type: DataType, value_rank: ValueRank) -> bool {
        if self.is_empty() {
            return data_type == DataType::BaseDataType;
        }
        data_type.accepts(self.data_type()) && value_rank.accepts(self.value_rank())
    }

    /// Returns a short type description for error messages (`UInt32`,
    /// `Double[]`, `Empty`).
    pub fn type_description(&self) -> String {
        match self {
            Variant::Empty => "Empty".to_string(),
            Variant::Array(array) => {
                let dims = array.rank().max(1) as usize;
                format!("{}{}", array.element_type(), "[]".repeat(dims))
            }
            other => other.data_type().to_string(),
        }
    }

    /// Returns the default value for a declaration.
    ///
    /// Array ranks produce an empty array; abstract scalar types produce the
    /// widest concrete member, `BaseDataType` produces `Empty`.
    ///
    /// # Examples
    ///
    /// ```
    /// use adi_core::types::{DataType, ValueRank};
    /// use adi_core::value::Variant;
    ///
    /// assert_eq!(Variant::default_for(DataType::UInt32, ValueRank::SCALAR), Variant::UInt32(0));
    /// assert_eq!(Variant::default_for(DataType::BaseDataType, ValueRank::SCALAR), Variant::Empty);
    /// ```
    pub fn default_for(data_type: DataType, value_rank: ValueRank) -> Variant {
        if value_rank.0 >= 0 {
            let dimensions = if value_rank.0 > 1 {
                Some(vec![0; value_rank.0 as usize])
            } else {
                None
            };
            return Variant::Array(Array {
                element_type: data_type,
                values: Vec::new(),
                dimensions,
            });
        }
        match data_type {
            DataType::BaseDataType => Variant::Empty,
            DataType::Boolean => Variant::Boolean(false),
            DataType::SByte => Variant::SByte(0),
            DataType::Byte => Variant::Byte(0),
            DataType::Int16 => Variant::Int16(0),
            DataType::UInt16 => Variant::UInt16(0),
            DataType::Int32 | DataType::Enumeration => Variant::Int32(0),
            DataType::UInt32 => Variant::UInt32(0),
            DataType::Int64 | DataType::Integer => Variant::Int64(0),
            DataType::UInt64 | DataType::UInteger => Variant::UInt64(0),
            DataType::Float => Variant::Float(0.0),
            DataType::Double | DataType::Number => Variant::Double(0.0),
            DataType::String => Variant::String(String::new()),
            DataType::DateTime => Variant::DateTime(DateTime::<Utc>::default()),
            DataType::Guid => Variant::Guid(Uuid::nil()),
            DataType::ByteString => Variant::ByteString(Vec::new()),
            DataType::NodeId => Variant::NodeId(NodeId::null()),
            DataType::StatusCode => Variant::StatusCode(0),
            DataType::QualifiedName => Variant::QualifiedName(QualifiedName::standard("")),
            DataType::LocalizedText => Variant::LocalizedText(String::new()),
        }
    }

    /// Returns the string slice for `String` and `LocalizedText` values.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Variant::String(v) | Variant::LocalizedText(v) => Some(v),
            _ => None,
        }
    }

    /// Returns the array if this is an array value.
    pub fn as_array(&self) -> Option<&Array> {
        match self {
            Variant::Array(array) => Some(array),
            _ => None,
        }
    }

    /// Converts any integer value to i64.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Variant::SByte(v) => Some(i64::from(*v)),
            Variant::Byte(v) => Some(i64::from(*v)),
            Variant::Int16(v) => Some(i64::from(*v)),
            Variant::UInt16(v) => Some(i64::from(*v)),
            Variant::Int32(v) => Some(i64::from(*v)),
            Variant::UInt32(v) => Some(i64::from(*v)),
            Variant::Int64(v) => Some(*v),
            Variant::UInt64(v) => i64::try_from(*v).ok(),
            _ => None,
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Variant::Empty => write!(f, "(empty)"),
            Variant::Boolean(v) => write!(f, "{}", v),
            Variant::SByte(v) => write!(f, "{}", v),
            Variant::Byte(v) => write!(f, "{}", v),
            Variant::Int16(v) => write!(f, "{}", v),
            Variant::UInt16(v) => write!(f, "{}", v),
            Variant::Int32(v) => write!(f, "{}", v),
            Variant::UInt32(v) => write!(f, "{}", v),
            Variant::Int64(v) => write!(f, "{}", v),
            Variant::UInt64(v) => write!(f, "{}", v),
            Variant::Float(v) => write!(f, "{}", v),
            Variant::Double(v) => write!(f, "{}", v),
            Variant::String(v) | Variant::LocalizedText(v) => write!(f, "{}", v),
            Variant::DateTime(v) => write!(f, "{}", v.to_rfc3339()),
            Variant::Guid(v) => write!(f, "{}", v),
            Variant::ByteString(v) => write!(f, "<{} bytes>", v.len()),
            Variant::NodeId(v) => write!(f, "{}", v),
            Variant::StatusCode(v) => write!(f, "0x{:08X}", v),
            Variant::QualifiedName(v) => write!(f, "{}", v),
            Variant::Array(array) => {
                write!(f, "[")?;
                for (i, value) in array.values().iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", value)?;
                }
                write!(f, "]")
            }
        }
    }
}

macro_rules! impl_variant_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Variant {
                fn from(value: $ty) -> Self {
                    Variant::$variant(value)
                }
            }
        )*
    };
}

impl_variant_from! {
    bool => Boolean,
    i8 => SByte,
    u8 => Byte,
    i16 => Int16,
    u16 => UInt16,
    i32 => Int32,
    u32 => UInt32,
    i64 => Int64,
    u64 => UInt64,
    f32 => Float,
    f64 => Double,
    String => String,
    DateTime<Utc> => DateTime,
    Uuid => Guid,
    NodeId => NodeId,
    QualifiedName => QualifiedName,
    Array => Array,
}

impl From<&str> for Variant {
    fn from(value: &str) -> Self {
        Variant::String(value.to_string())
    }
}

// =============================================================================
// Array
// =============================================================================

/// A homogeneous array value.
///
/// Deserialized arrays go through the same element and dimension checks as
/// [`Array::new`] and [`Array::with_dimensions`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawArray")]
pub struct Array {
    element_type: DataType,
    values: Vec<Variant>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    dimensions: Option<Vec<u32>>,
}

#[derive(Deserialize)]
struct RawArray {
    element_type: DataType,
    values: Vec<Variant>,
    #[serde(default)]
    dimensions: Option<Vec<u32>>,
}

impl TryFrom<RawArray> for Array {
    type Error = NodeError;

    fn try_from(raw: RawArray) -> NodeResult<Self> {
        match raw.dimensions {
            Some(dimensions) => Self::with_dimensions(raw.element_type, raw.values, dimensions),
            None => Self::new(raw.element_type, raw.values),
        }
    }
}

impl Array {
    /// Creates a one-dimensional array.
    ///
    /// # Errors
    ///
    /// Returns `TypeMismatch` if any element is an array, empty, or not
    /// accepted by `element_type`.
    pub fn new(element_type: DataType, values: Vec<Variant>) -> NodeResult<Self> {
        for value in &values {
            if value.is_empty()
                || matches!(value, Variant::Array(_))
                || !element_type.accepts(value.data_type())
            {
                return Err(NodeError::type_mismatch(
                    "array element",
                    element_type.to_string(),
                    value.type_description(),
                ));
            }
        }
        Ok(Self {
            element_type,
            values,
            dimensions: None,
        })
    }

    /// Creates a multi-dimensional array stored in row-major order.
    ///
    /// # Errors
    ///
    /// Returns `TypeMismatch` if the elements are invalid or the dimension
    /// product does not equal the element count.
    pub fn with_dimensions(
        element_type: DataType,
        values: Vec<Variant>,
        dimensions: Vec<u32>,
    ) -> NodeResult<Self> {
        let expected = dimensions
            .iter()
            .try_fold(1usize, |acc, d| acc.checked_mul(*d as usize));
        if dimensions.is_empty() || expected != Some(values.len()) {
            return Err(NodeError::type_mismatch(
                "array dimensions",
                format!("{:?}", dimensions),
                format!("{} elements", values.len()),
            ));
        }
        let mut array = Self::new(element_type, values)?;
        if dimensions.len() > 1 {
            array.dimensions = Some(dimensions);
        }
        Ok(array)
    }

    /// Returns the declared element type.
    pub fn element_type(&self) -> DataType {
        self.element_type
    }

    /// Returns the elements.
    pub fn values(&self) -> &[Variant] {
        &self.values
    }

    /// Returns the dimensions of multi-dimensional arrays.
    pub fn dimensions(&self) -> Option<&[u32]> {
        self.dimensions.as_deref()
    }

    /// Returns the number of dimensions.
    pub fn rank(&self) -> i32 {
        self.dimensions.as_ref().map_or(1, |d| d.len() as i32)
    }

    /// Returns the element count.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if the array has no elements.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

// =============================================================================
// VariantValue
// =============================================================================

/// Conversion between a static Rust type and [`Variant`].
///
/// `from_variant` narrows integers when the stored value fits the target
/// type and returns `None` otherwise.
pub trait VariantValue: Sized {
    /// Data type this Rust type maps to.
    fn data_type() -> DataType;

    /// Value rank this Rust type maps to.
    fn value_rank() -> ValueRank {
        ValueRank::SCALAR
    }

    /// Casts a stored value to this type.
    fn from_variant(value: &Variant) -> Option<Self>;

    /// Wraps this value in a variant.
    fn into_variant(self) -> Variant;
}

macro_rules! impl_integer_value {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl VariantValue for $ty {
                fn data_type() -> DataType {
                    DataType::$variant
                }

                fn from_variant(value: &Variant) -> Option<Self> {
                    match value {
                        Variant::SByte(v) => <$ty>::try_from(*v).ok(),
                        Variant::Byte(v) => <$ty>::try_from(*v).ok(),
                        Variant::Int16(v) => <$ty>::try_from(*v).ok(),
                        Variant::UInt16(v) => <$ty>::try_from(*v).ok(),
                        Variant::Int32(v) => <$ty>::try_from(*v).ok(),
                        Variant::UInt32(v) => <$ty>::try_from(*v).ok(),
                        Variant::Int64(v) => <$ty>::try_from(*v).ok(),
                        Variant::UInt64(v) => <$ty>::try_from(*v).ok(),
                        _ => None,
                    }
                }

                fn into_variant(self) -> Variant {
                    Variant::$variant(self)
                }
            }
        )*
    };
}

impl_integer_value! {
    i8 => SByte,
    u8 => Byte,
    i16 => Int16,
    u16 => UInt16,
    i32 => Int32,
    u32 => UInt32,
    i64 => Int64,
    u64 => UInt64,
}

impl VariantValue for bool {
    fn data_type() -> DataType {
        DataType::Boolean
    }

    fn from_variant(value: &Variant) -> Option<Self> {
        match value {
            Variant::Boolean(v) => Some(*v),
            _ => None,
        }
    }

    fn into_variant(self) -> Variant {
        Variant::Boolean(self)
    }
}

impl VariantValue for f32 {
    fn data_type() -> DataType {
        DataType::Float
    }

    fn from_variant(value: &Variant) -> Option<Self> {
        match value {
            Variant::Float(v) => Some(*v),
            _ => None,
        }
    }

    fn into_variant(self) -> Variant {
        Variant::Float(self)
    }
}

impl VariantValue for f64 {
    fn data_type() -> DataType {
        DataType::Double
    }

    fn from_variant(value: &Variant) -> Option<Self> {
        match value {
            Variant::Double(v) => Some(*v),
            Variant::Float(v) => Some(f64::from(*v)),
            _ => None,
        }
    }

    fn into_variant(self) -> Variant {
        Variant::Double(self)
    }
}

impl VariantValue for String {
    fn data_type() -> DataType {
        DataType::String
    }

    fn from_variant(value: &Variant) -> Option<Self> {
        match value {
            Variant::String(v) => Some(v.clone()),
            _ => None,
        }
    }

    fn into_variant(self) -> Variant {
        Variant::String(self)
    }
}

impl VariantValue for DateTime<Utc> {
    fn data_type() -> DataType {
        DataType::DateTime
    }

    fn from_variant(value: &Variant) -> Option<Self> {
        match value {
            Variant::DateTime(v) => Some(*v),
            _ => None,
        }
    }

    fn into_variant(self) -> Variant {
        Variant::DateTime(self)
    }
}

impl VariantValue for Uuid {
    fn data_type() -> DataType {
        DataType::Guid
    }

    fn from_variant(value: &Variant) -> Option<Self> {
        match value {
            Variant::Guid(v) => Some(*v),
            _ => None,
        }
    }

    fn into_variant(self) -> Variant {
        Variant::Guid(self)
    }
}

impl VariantValue for NodeId {
    fn data_type() -> DataType {
        DataType::NodeId
    }

    fn from_variant(value: &Variant) -> Option<Self> {
        match value {
            Variant::NodeId(v) => Some(v.clone()),
            _ => None,
        }
    }

    fn into_variant(self) -> Variant {
        Variant::NodeId(self)
    }
}

impl VariantValue for QualifiedName {
    fn data_type() -> DataType {
        DataType::QualifiedName
    }

    fn from_variant(value: &Variant) -> Option<Self> {
        match value {
            Variant::QualifiedName(v) => Some(v.clone()),
            _ => None,
        }
    }

    fn into_variant(self) -> Variant {
        Variant::QualifiedName(self)
    }
}

impl<T: VariantValue> VariantValue for Vec<T> {
    fn data_type() -> DataType {
        T::data_type()
    }

    fn value_rank() -> ValueRank {
        ValueRank::ONE_DIMENSION
    }

    fn from_variant(value: &Variant) -> Option<Self> {
        let array = value.as_array()?;
        if array.rank() != 1 {
            return None;
        }
        array.values().iter().map(T::from_variant).collect()
    }

    fn into_variant(self) -> Variant {
        Variant::Array(Array {
            element_type: T::data_type(),
            values: self.into_iter().map(VariantValue::into_variant).collect(),
            dimensions: None,
        })
    }
}

// =============================================================================
// Newtypes
// =============================================================================

/// Raw bytes carried as a `ByteString` rather than a `Byte[]` array.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ByteString(pub Vec<u8>);

impl VariantValue for ByteString {
    fn data_type() -> DataType {
        DataType::ByteString
    }

    fn from_variant(value: &Variant) -> Option<Self> {
        match value {
            Variant::ByteString(v) => Some(Self(v.clone())),
            _ => None,
        }
    }

    fn into_variant(self) -> Variant {
        Variant::ByteString(self.0)
    }
}

/// Text carried as `LocalizedText`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LocalizedText(pub String);

impl LocalizedText {
    /// Creates a localized text value.
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }
}

impl fmt::Display for LocalizedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl VariantValue for LocalizedText {
    fn data_type() -> DataType {
        DataType::LocalizedText
    }

    fn from_variant(value: &Variant) -> Option<Self> {
        match value {
            Variant::LocalizedText(v) => Some(Self(v.clone())),
            _ => None,
        }
    }

    fn into_variant(self) -> Variant {
        Variant::LocalizedText(self.0)
    }
}

/// A status code value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StatusCode(pub u32);

impl StatusCode {
    /// Returns `true` if the severity bits report Good.
    pub fn is_good(&self) -> bool {
        self.0 & 0xC000_0000 == 0
    }
}

impl VariantValue for StatusCode {
    fn data_type() -> DataType {
        DataType::StatusCode
    }

    fn from_variant(value: &Variant) -> Option<Self> {
        match value {
            Variant::StatusCode(v) => Some(Self(*v)),
            _ => None,
        }
    }

    fn into_variant(self) -> Variant {
        Variant::StatusCode(self.0)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_compatibility() {
        let value = Variant::from("Channel1");
        assert!(value.is_compatible(DataType::String, ValueRank::SCALAR));
        assert!(value.is_compatible(DataType::BaseDataType, ValueRank::ANY));
        assert!(!value.is_compatible(DataType::String, ValueRank::ONE_DIMENSION));
        assert!(!value.is_compatible(DataType::LocalizedText, ValueRank::SCALAR));
    }

    #[test]
    fn test_empty_compatibility() {
        assert!(Variant::Empty.is_compatible(DataType::BaseDataType, ValueRank::SCALAR));
        assert!(!Variant::Empty.is_compatible(DataType::Int32, ValueRank::SCALAR));
        assert_eq!(Variant::Empty.type_description(), "Empty");
    }

    #[test]
    fn test_array_compatibility() {
        let spectrum = vec![1.0f64, 2.5, 3.75].into_variant();
        assert_eq!(spectrum.value_rank(), 1);
        assert_eq!(spectrum.type_description(), "Double[]");
        assert!(spectrum.is_compatible(DataType::Double, ValueRank::ONE_DIMENSION));
        assert!(spectrum.is_compatible(DataType::Number, ValueRank::SCALAR_OR_ONE_DIMENSION));
        assert!(!spectrum.is_compatible(DataType::Double, ValueRank::SCALAR));
    }

    #[test]
    fn test_array_validation() {
        assert!(Array::new(DataType::Int32, vec![Variant::Int32(1), Variant::Int32(2)]).is_ok());
        assert!(Array::new(DataType::Int32, vec![Variant::from("x")]).is_err());

        let matrix = Array::with_dimensions(
            DataType::Byte,
            vec![Variant::Byte(1), Variant::Byte(2), Variant::Byte(3), Variant::Byte(4)],
            vec![2, 2],
        )
        .unwrap();
        assert_eq!(matrix.rank(), 2);
        assert_eq!(Variant::Array(matrix).type_description(), "Byte[][]");

        assert!(Array::with_dimensions(DataType::Byte, vec![Variant::Byte(1)], vec![2, 2]).is_err());
        assert!(Array::with_dimensions(DataType::Byte, vec![], vec![]).is_err());
    }

    #[test]
    fn test_array_dimension_overflow() {
        let err = Array::with_dimensions(DataType::Double, vec![], vec![u32::MAX; 3]).unwrap_err();
        assert!(matches!(err, NodeError::TypeMismatch { .. }));

        let err = Array::with_dimensions(DataType::Double, vec![], vec![u32::MAX, 0, u32::MAX]);
        assert!(err.is_err());
    }

    #[test]
    fn test_array_deserialize_validates() {
        let spectrum = Array::new(DataType::Double, vec![Variant::Double(1.5)]).unwrap();
        let json = serde_json::to_value(&spectrum).unwrap();
        assert_eq!(serde_json::from_value::<Array>(json.clone()).unwrap(), spectrum);

        let mut mixed = json.clone();
        mixed["values"] = serde_json::to_value(vec![Variant::from("x")]).unwrap();
        assert!(serde_json::from_value::<Array>(mixed).is_err());

        let mut shaped = json;
        shaped["dimensions"] = serde_json::json!([2, 2]);
        assert!(serde_json::from_value::<Array>(shaped).is_err());
    }

    #[test]
    fn test_integer_narrowing() {
        assert_eq!(u16::from_variant(&Variant::Int64(500)), Some(500));
        assert_eq!(u16::from_variant(&Variant::Int64(-1)), None);
        assert_eq!(i8::from_variant(&Variant::UInt32(200)), None);
        assert_eq!(i64::from_variant(&Variant::UInt64(7)), Some(7));
        assert_eq!(u32::from_variant(&Variant::from("7")), None);
    }

    #[test]
    fn test_vec_cast() {
        let value = vec![3u32, 4, 5].into_variant();
        assert_eq!(Vec::<u64>::from_variant(&value), Some(vec![3, 4, 5]));
        assert_eq!(Vec::<String>::from_variant(&value), None);
        assert_eq!(Vec::<u32>::from_variant(&Variant::UInt32(3)), None);
    }

    #[test]
    fn test_newtypes() {
        let text = LocalizedText::new("Operating").into_variant();
        assert_eq!(text.data_type(), DataType::LocalizedText);
        assert_eq!(String::from_variant(&text), None);
        assert_eq!(LocalizedText::from_variant(&text), Some(LocalizedText::new("Operating")));

        let bytes = ByteString(vec![1, 2, 3]).into_variant();
        assert_eq!(bytes.data_type(), DataType::ByteString);
        assert_eq!(bytes.value_rank(), -1);

        assert!(StatusCode(0).is_good());
        assert!(!StatusCode(0x8074_0000).is_good());
    }

    #[test]
    fn test_default_for() {
        assert_eq!(
            Variant::default_for(DataType::LocalizedText, ValueRank::SCALAR),
            Variant::LocalizedText(String::new())
        );
        assert_eq!(
            Variant::default_for(DataType::Enumeration, ValueRank::SCALAR),
            Variant::Int32(0)
        );
        let array = Variant::default_for(DataType::Double, ValueRank::ONE_DIMENSION);
        assert!(array.is_compatible(DataType::Double, ValueRank::ONE_DIMENSION));
        assert_eq!(array.as_array().map(Array::len), Some(0));

        let matrix = Variant::default_for(DataType::Float, ValueRank(2));
        assert_eq!(matrix.value_rank(), 2);
    }

    #[test]
    fn test_display() {
        assert_eq!(Variant::UInt32(5).to_string(), "5");
        assert_eq!(vec![1i32, 2].into_variant().to_string(), "[1, 2]");
        assert_eq!(Variant::StatusCode(0x8074_0000).to_string(), "0x80740000");
        assert_eq!(Variant::Empty.to_string(), "(empty)");
    }
}
