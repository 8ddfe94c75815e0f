// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Identifier and descriptor types shared by every node.
//!
//! - **NodeId**: the four OPC UA identifier kinds with parsing and formatting
//! - **QualifiedName**: namespace-qualified browse names
//! - **NodeClass**: object, variable or method
//! - **DataType**: built-in and abstract data types with an `accepts` relation
//! - **ValueRank**: scalar/array shape constraints
//!
//! # Examples
//!
//! ```
//! use adi_core::types::{DataType, NodeId, ValueRank};
//!
//! let node: NodeId = "ns=2;s=Analyser.ChannelId".parse().unwrap();
//! assert_eq!(node.namespace_index, 2);
//!
//! assert!(DataType::Number.accepts(DataType::UInt32));
//! assert!(ValueRank::SCALAR_OR_ONE_DIMENSION.accepts(1));
//! ```

use std::fmt;
use std::str::FromStr;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::NodeError;

// =============================================================================
// NodeId
// =============================================================================

/// OPC UA Node Identifier.
///
/// A NodeId consists of a namespace index and an identifier which can be
/// numeric, string, GUID, or opaque (byte string).
///
/// # Examples
///
/// ```
/// use adi_core::types::NodeId;
///
/// let numeric = NodeId::numeric(2, 1001);
/// let string = NodeId::string(2, "Spectrometer.Channel1");
/// let parsed: NodeId = "ns=2;s=Spectrometer.Channel1".parse().unwrap();
/// assert_eq!(parsed, string);
/// assert_ne!(numeric, string);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId {
    /// Namespace index (0 = OPC UA standard namespace).
    pub namespace_index: u16,

    /// The node identifier.
    pub identifier: NodeIdentifier,
}

impl NodeId {
    // =========================================================================
    // Constructors
    // =========================================================================

    /// Creates a numeric node ID.
    #[inline]
    pub fn numeric(namespace_index: u16, value: u32) -> Self {
        Self {
            namespace_index,
            identifier: NodeIdentifier::Numeric(value),
        }
    }

    /// Creates a string node ID.
    #[inline]
    pub fn string(namespace_index: u16, value: impl Into<String>) -> Self {
        Self {
            namespace_index,
            identifier: NodeIdentifier::String(value.into()),
        }
    }

    /// Creates a GUID node ID.
    #[inline]
    pub fn guid(namespace_index: u16, value: Uuid) -> Self {
        Self {
            namespace_index,
            identifier: NodeIdentifier::Guid(value),
        }
    }

    /// Creates an opaque (byte string) node ID.
    #[inline]
    pub fn opaque(namespace_index: u16, value: Vec<u8>) -> Self {
        Self {
            namespace_index,
            identifier: NodeIdentifier::Opaque(value),
        }
    }

    // =========================================================================
    // Standard Node IDs
    // =========================================================================

    /// Root folder node (ns=0, i=84).
    pub const ROOT_FOLDER: NodeId = NodeId {
        namespace_index: 0,
        identifier: NodeIdentifier::Numeric(84),
    };

    /// Objects folder node (ns=0, i=85).
    pub const OBJECTS_FOLDER: NodeId = NodeId {
        namespace_index: 0,
        identifier: NodeIdentifier::Numeric(85),
    };

    /// BaseObjectType (ns=0, i=58).
    pub const BASE_OBJECT_TYPE: NodeId = NodeId {
        namespace_index: 0,
        identifier: NodeIdentifier::Numeric(58),
    };

    /// FolderType (ns=0, i=61).
    pub const FOLDER_TYPE: NodeId = NodeId {
        namespace_index: 0,
        identifier: NodeIdentifier::Numeric(61),
    };

    /// BaseDataVariableType (ns=0, i=63).
    pub const BASE_DATA_VARIABLE_TYPE: NodeId = NodeId {
        namespace_index: 0,
        identifier: NodeIdentifier::Numeric(63),
    };

    /// PropertyType (ns=0, i=68).
    pub const PROPERTY_TYPE: NodeId = NodeId {
        namespace_index: 0,
        identifier: NodeIdentifier::Numeric(68),
    };

    /// FiniteStateMachineType (ns=0, i=2771).
    pub const FINITE_STATE_MACHINE_TYPE: NodeId = NodeId {
        namespace_index: 0,
        identifier: NodeIdentifier::Numeric(2771),
    };

    // =========================================================================
    // Properties
    // =========================================================================

    /// Returns `true` if this is a numeric identifier.
    #[inline]
    pub const fn is_numeric(&self) -> bool {
        matches!(self.identifier, NodeIdentifier::Numeric(_))
    }

    /// Returns `true` if this is a string identifier.
    #[inline]
    pub const fn is_string(&self) -> bool {
        matches!(self.identifier, NodeIdentifier::String(_))
    }

    /// Returns `true` if this is a null node ID (ns=0, i=0).
    #[inline]
    pub fn is_null(&self) -> bool {
        self.namespace_index == 0 && matches!(self.identifier, NodeIdentifier::Numeric(0))
    }

    /// Returns the null node ID (ns=0, i=0).
    #[inline]
    pub const fn null() -> Self {
        Self {
            namespace_index: 0,
            identifier: NodeIdentifier::Numeric(0),
        }
    }

    /// Returns the numeric value if this is a numeric identifier.
    #[inline]
    pub fn as_numeric(&self) -> Option<u32> {
        match &self.identifier {
            NodeIdentifier::Numeric(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the string value if this is a string identifier.
    #[inline]
    pub fn as_string(&self) -> Option<&str> {
        match &self.identifier {
            NodeIdentifier::String(v) => Some(v),
            _ => None,
        }
    }

    // =========================================================================
    // Conversion
    // =========================================================================

    /// Converts to the OPC UA string format.
    ///
    /// Format: `ns=<namespace>;{i|s|g|b}=<identifier>`, with the namespace
    /// omitted for namespace 0.
    ///
    /// # Examples
    ///
    /// ```
    /// use adi_core::types::NodeId;
    ///
    /// assert_eq!(NodeId::numeric(2, 1001).to_opc_string(), "ns=2;i=1001");
    /// assert_eq!(NodeId::OBJECTS_FOLDER.to_opc_string(), "i=85");
    /// ```
    pub fn to_opc_string(&self) -> String {
        if self.namespace_index == 0 {
            self.identifier.to_string()
        } else {
            format!("ns={};{}", self.namespace_index, self.identifier)
        }
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::null()
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_opc_string())
    }
}

impl FromStr for NodeId {
    type Err = NodeError;

    /// Parses a NodeId from OPC UA string format.
    ///
    /// Supported formats:
    /// - `ns=2;i=1001` (numeric)
    /// - `ns=2;s=MyNode` (string)
    /// - `ns=2;g=550e8400-e29b-41d4-a716-446655440000` (GUID)
    /// - `ns=2;b=SGVsbG8=` (opaque, base64 encoded)
    /// - `i=1001` / `s=MyNode` (namespace 0)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();

        let (namespace_index, identifier_part) = match s.strip_prefix("ns=") {
            Some(rest) => {
                let (ns_str, id) = rest
                    .split_once(';')
                    .ok_or_else(|| NodeError::invalid_node_id(s, "Missing identifier after namespace"))?;
                let ns: u16 = ns_str
                    .parse()
                    .map_err(|_| NodeError::invalid_node_id(s, "Invalid namespace index"))?;
                (ns, id)
            }
            None => (0, s),
        };

        let identifier = if let Some(id) = identifier_part.strip_prefix("i=") {
            let value: u32 = id
                .parse()
                .map_err(|_| NodeError::invalid_node_id(s, "Invalid numeric identifier"))?;
            NodeIdentifier::Numeric(value)
        } else if let Some(id) = identifier_part.strip_prefix("s=") {
            NodeIdentifier::String(id.to_string())
        } else if let Some(id) = identifier_part.strip_prefix("g=") {
            let uuid = Uuid::parse_str(id)
                .map_err(|e| NodeError::invalid_node_id(s, format!("Invalid GUID: {}", e)))?;
            NodeIdentifier::Guid(uuid)
        } else if let Some(id) = identifier_part.strip_prefix("b=") {
            let bytes = BASE64
                .decode(id)
                .map_err(|e| NodeError::invalid_node_id(s, format!("Invalid base64: {}", e)))?;
            NodeIdentifier::Opaque(bytes)
        } else {
            return Err(NodeError::invalid_node_id(
                s,
                "Unknown identifier type. Expected i=, s=, g=, or b=",
            ));
        };

        Ok(Self {
            namespace_index,
            identifier,
        })
    }
}

// =============================================================================
// NodeIdentifier
// =============================================================================

/// OPC UA node identifier kinds.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum NodeIdentifier {
    /// Numeric identifier.
    Numeric(u32),
    /// String identifier.
    String(String),
    /// GUID identifier.
    Guid(Uuid),
    /// Opaque identifier.
    Opaque(Vec<u8>),
}

impl fmt::Display for NodeIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numeric(v) => write!(f, "i={}", v),
            Self::String(v) => write!(f, "s={}", v),
            Self::Guid(v) => write!(f, "g={}", v),
            Self::Opaque(v) => write!(f, "b={}", BASE64.encode(v)),
        }
    }
}

// =============================================================================
// QualifiedName
// =============================================================================

/// OPC UA qualified name (namespace index + name).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QualifiedName {
    /// Namespace index.
    pub namespace_index: u16,

    /// The name string.
    pub name: String,
}

impl QualifiedName {
    /// Creates a new qualified name.
    pub fn new(namespace_index: u16, name: impl Into<String>) -> Self {
        Self {
            namespace_index,
            name: name.into(),
        }
    }

    /// Creates a qualified name in namespace 0.
    pub fn standard(name: impl Into<String>) -> Self {
        Self::new(0, name)
    }

    /// Returns the string representation.
    pub fn to_string_with_ns(&self) -> String {
        if self.namespace_index == 0 {
            self.name.clone()
        } else {
            format!("{}:{}", self.namespace_index, self.name)
        }
    }

    /// Returns `true` if `key` names this browse name.
    ///
    /// A bare key compares the name only; a `ns:name` key must also match the
    /// namespace index.
    pub fn matches(&self, key: &str) -> bool {
        if let Some((ns, name)) = key.split_once(':') {
            if let Ok(ns_idx) = ns.parse::<u16>() {
                return self.namespace_index == ns_idx && self.name == name;
            }
        }
        self.name == key
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_string_with_ns())
    }
}

impl From<&str> for QualifiedName {
    fn from(s: &str) -> Self {
        if let Some((ns, name)) = s.split_once(':') {
            if let Ok(ns_idx) = ns.parse::<u16>() {
                return Self::new(ns_idx, name);
            }
        }
        Self::standard(s)
    }
}

// =============================================================================
// NodeClass
// =============================================================================

/// Node class of an instance node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeClass {
    /// Object node.
    Object,
    /// Variable node.
    Variable,
    /// Method node.
    Method,
}

impl NodeClass {
    /// Returns the OPC UA bit mask value.
    pub const fn value(&self) -> u32 {
        match self {
            Self::Object => 1,
            Self::Variable => 2,
            Self::Method => 4,
        }
    }

    /// Creates from OPC UA value.
    pub fn from_value(value: u32) -> Option<Self> {
        match value {
            1 => Some(Self::Object),
            2 => Some(Self::Variable),
            4 => Some(Self::Method),
            _ => None,
        }
    }

    /// Returns `true` if this node class can have a value.
    pub const fn has_value(&self) -> bool {
        matches!(self, Self::Variable)
    }
}

impl fmt::Display for NodeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Object => write!(f, "Object"),
            Self::Variable => write!(f, "Variable"),
            Self::Method => write!(f, "Method"),
        }
    }
}

// =============================================================================
// DataType
// =============================================================================

/// Data type descriptor for variables and method arguments.
///
/// Concrete built-in types carry values directly. The abstract types
/// (`BaseDataType`, `Number`, `Integer`, `UInteger`, `Enumeration`) only
/// constrain which concrete values are accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataType {
    /// Any value.
    #[serde(alias = "Variant")]
    BaseDataType,
    /// Boolean value.
    Boolean,
    /// Signed 8-bit integer.
    SByte,
    /// Unsigned 8-bit integer.
    Byte,
    /// Signed 16-bit integer.
    Int16,
    /// Unsigned 16-bit integer.
    UInt16,
    /// Signed 32-bit integer.
    Int32,
    /// Unsigned 32-bit integer.
    UInt32,
    /// Signed 64-bit integer.
    Int64,
    /// Unsigned 64-bit integer.
    UInt64,
    /// 32-bit IEEE 754 float.
    Float,
    /// 64-bit IEEE 754 double.
    Double,
    /// UTF-8 string.
    String,
    /// UTC timestamp.
    DateTime,
    /// GUID.
    Guid,
    /// Raw bytes.
    ByteString,
    /// Node identifier.
    NodeId,
    /// OPC UA status code.
    StatusCode,
    /// Qualified name.
    QualifiedName,
    /// Localized text.
    LocalizedText,
    /// Any numeric type.
    Number,
    /// Any signed integer type.
    Integer,
    /// Any unsigned integer type.
    UInteger,
    /// Enumeration, carried as Int32.
    Enumeration,
}

impl DataType {
    /// Every data type, in namespace-0 id order.
    pub const ALL: [DataType; 24] = [
        Self::Boolean,
        Self::SByte,
        Self::Byte,
        Self::Int16,
        Self::UInt16,
        Self::Int32,
        Self::UInt32,
        Self::Int64,
        Self::UInt64,
        Self::Float,
        Self::Double,
        Self::String,
        Self::DateTime,
        Self::Guid,
        Self::ByteString,
        Self::NodeId,
        Self::StatusCode,
        Self::QualifiedName,
        Self::LocalizedText,
        Self::BaseDataType,
        Self::Number,
        Self::Integer,
        Self::UInteger,
        Self::Enumeration,
    ];

    /// Returns the namespace-0 data type node id number.
    pub const fn type_id(&self) -> u32 {
        match self {
            Self::Boolean => 1,
            Self::SByte => 2,
            Self::Byte => 3,
            Self::Int16 => 4,
            Self::UInt16 => 5,
            Self::Int32 => 6,
            Self::UInt32 => 7,
            Self::Int64 => 8,
            Self::UInt64 => 9,
            Self::Float => 10,
            Self::Double => 11,
            Self::String => 12,
            Self::DateTime => 13,
            Self::Guid => 14,
            Self::ByteString => 15,
            Self::NodeId => 17,
            Self::StatusCode => 19,
            Self::QualifiedName => 20,
            Self::LocalizedText => 21,
            Self::BaseDataType => 24,
            Self::Number => 26,
            Self::Integer => 27,
            Self::UInteger => 28,
            Self::Enumeration => 29,
        }
    }

    /// Returns the data type node id.
    pub fn node_id(&self) -> NodeId {
        NodeId::numeric(0, self.type_id())
    }

    /// Returns the OPC UA browse name of the data type.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::BaseDataType => "BaseDataType",
            Self::Boolean => "Boolean",
            Self::SByte => "SByte",
            Self::Byte => "Byte",
            Self::Int16 => "Int16",
            Self::UInt16 => "UInt16",
            Self::Int32 => "Int32",
            Self::UInt32 => "UInt32",
            Self::Int64 => "Int64",
            Self::UInt64 => "UInt64",
            Self::Float => "Float",
            Self::Double => "Double",
            Self::String => "String",
            Self::DateTime => "DateTime",
            Self::Guid => "Guid",
            Self::ByteString => "ByteString",
            Self::NodeId => "NodeId",
            Self::StatusCode => "StatusCode",
            Self::QualifiedName => "QualifiedName",
            Self::LocalizedText => "LocalizedText",
            Self::Number => "Number",
            Self::Integer => "Integer",
            Self::UInteger => "UInteger",
            Self::Enumeration => "Enumeration",
        }
    }

    /// Returns `true` for types that cannot hold a value of their own.
    pub const fn is_abstract(&self) -> bool {
        matches!(
            self,
            Self::BaseDataType | Self::Number | Self::Integer | Self::UInteger | Self::Enumeration
        )
    }

    /// Returns `true` for signed integer types.
    pub const fn is_signed_integer(&self) -> bool {
        matches!(
            self,
            Self::SByte | Self::Int16 | Self::Int32 | Self::Int64 | Self::Integer
        )
    }

    /// Returns `true` for unsigned integer types.
    pub const fn is_unsigned_integer(&self) -> bool {
        matches!(
            self,
            Self::Byte | Self::UInt16 | Self::UInt32 | Self::UInt64 | Self::UInteger
        )
    }

    /// Returns `true` for numeric types.
    pub const fn is_numeric(&self) -> bool {
        self.is_signed_integer()
            || self.is_unsigned_integer()
            || matches!(self, Self::Float | Self::Double | Self::Number)
    }

    /// Returns `true` if a value (or declaration) of type `other` may be
    /// stored where `self` is declared.
    ///
    /// # Examples
    ///
    /// ```
    /// use adi_core::types::DataType;
    ///
    /// assert!(DataType::UInt32.accepts(DataType::UInt32));
    /// assert!(!DataType::UInt32.accepts(DataType::Int32));
    /// assert!(DataType::Enumeration.accepts(DataType::Int32));
    /// assert!(DataType::BaseDataType.accepts(DataType::String));
    /// ```
    pub fn accepts(&self, other: DataType) -> bool {
        if *self == other {
            return true;
        }
        match self {
            Self::BaseDataType => true,
            Self::Number => other.is_numeric(),
            Self::Integer => other.is_signed_integer(),
            Self::UInteger => other.is_unsigned_integer(),
            Self::Enumeration => other == Self::Int32,
            _ => false,
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for DataType {
    type Err = NodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("variant") {
            return Ok(Self::BaseDataType);
        }
        Self::ALL
            .iter()
            .copied()
            .find(|dt| dt.name().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| NodeError::unknown_type(s))
    }
}

// =============================================================================
// ValueRank
// =============================================================================

/// OPC UA value rank.
///
/// Negative values are shape classes, positive values an exact number of
/// array dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValueRank(pub i32);

impl ValueRank {
    /// A scalar or a one-dimensional array.
    pub const SCALAR_OR_ONE_DIMENSION: ValueRank = ValueRank(-3);
    /// Any shape.
    pub const ANY: ValueRank = ValueRank(-2);
    /// A scalar.
    pub const SCALAR: ValueRank = ValueRank(-1);
    /// An array with one or more dimensions.
    pub const ONE_OR_MORE_DIMENSIONS: ValueRank = ValueRank(0);
    /// A one-dimensional array.
    pub const ONE_DIMENSION: ValueRank = ValueRank(1);

    /// Highest dimension count a declaration may use.
    pub const MAX_DIMENSIONS: i32 = 32;

    /// Returns `true` if this rank can appear in a declaration.
    pub const fn is_valid(&self) -> bool {
        self.0 >= -3 && self.0 <= Self::MAX_DIMENSIONS
    }

    /// Returns `true` if this is the scalar rank.
    pub const fn is_scalar(&self) -> bool {
        self.0 == -1
    }

    /// Returns `true` if a concrete value of rank `actual` (-1 for scalars,
    /// the dimension count for arrays) satisfies this rank.
    pub fn accepts(&self, actual: i32) -> bool {
        match self.0 {
            -3 => actual == -1 || actual == 1,
            -2 => true,
            -1 => actual == -1,
            0 => actual >= 1,
            n => actual == n,
        }
    }

    /// Returns `true` if a declaration of rank `other` fits within this rank.
    pub fn accepts_declared(&self, other: ValueRank) -> bool {
        match self.0 {
            -3 => matches!(other.0, -3 | -1 | 1),
            -2 => true,
            -1 => other.0 == -1,
            0 => other.0 >= 0,
            n => other.0 == n,
        }
    }
}

impl Default for ValueRank {
    fn default() -> Self {
        Self::SCALAR
    }
}

impl fmt::Display for ValueRank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            -3 => write!(f, "ScalarOrOneDimension"),
            -2 => write!(f, "Any"),
            -1 => write!(f, "Scalar"),
            0 => write!(f, "OneOrMoreDimensions"),
            n => write!(f, "{}D", n),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_id_parse_formats() {
        let numeric: NodeId = "ns=2;i=1001".parse().unwrap();
        assert_eq!(numeric, NodeId::numeric(2, 1001));

        let string: NodeId = "s=Device".parse().unwrap();
        assert_eq!(string, NodeId::string(0, "Device"));

        let guid: NodeId = "ns=3;g=550e8400-e29b-41d4-a716-446655440000".parse().unwrap();
        assert_eq!(guid.namespace_index, 3);
        assert!(matches!(guid.identifier, NodeIdentifier::Guid(_)));

        let opaque: NodeId = "ns=1;b=SGVsbG8=".parse().unwrap();
        assert_eq!(opaque, NodeId::opaque(1, b"Hello".to_vec()));
    }

    #[test]
    fn test_node_id_parse_errors() {
        assert!(matches!(
            "ns=x;i=1".parse::<NodeId>(),
            Err(NodeError::InvalidNodeId { .. })
        ));
        assert!("ns=2".parse::<NodeId>().is_err());
        assert!("ns=2;q=1".parse::<NodeId>().is_err());
        assert!("i=abc".parse::<NodeId>().is_err());
    }

    #[test]
    fn test_node_id_display_roundtrip() {
        let node = NodeId::string(2, "Analyser.Channel1");
        assert_eq!(node.to_string(), "ns=2;s=Analyser.Channel1");
        assert_eq!(node.to_string().parse::<NodeId>().unwrap(), node);
        assert_eq!(NodeId::OBJECTS_FOLDER.to_string(), "i=85");
        assert!(NodeId::null().is_null());
    }

    #[test]
    fn test_qualified_name_matches() {
        let name = QualifiedName::new(2, "ChannelId");
        assert!(name.matches("ChannelId"));
        assert!(name.matches("2:ChannelId"));
        assert!(!name.matches("3:ChannelId"));
        assert!(!name.matches("channelid"));
        assert_eq!(QualifiedName::from("2:Stream1"), QualifiedName::new(2, "Stream1"));
        assert_eq!(name.to_string(), "2:ChannelId");
    }

    #[test]
    fn test_data_type_accepts() {
        assert!(DataType::Integer.accepts(DataType::Int16));
        assert!(!DataType::Integer.accepts(DataType::UInt16));
        assert!(DataType::UInteger.accepts(DataType::UInt64));
        assert!(DataType::Number.accepts(DataType::Double));
        assert!(DataType::Number.accepts(DataType::Integer));
        assert!(!DataType::Number.accepts(DataType::String));
        assert!(!DataType::String.accepts(DataType::BaseDataType));
    }

    #[test]
    fn test_data_type_from_str() {
        assert_eq!("uint32".parse::<DataType>().unwrap(), DataType::UInt32);
        assert_eq!("Variant".parse::<DataType>().unwrap(), DataType::BaseDataType);
        assert_eq!("LocalizedText".parse::<DataType>().unwrap(), DataType::LocalizedText);
        assert!("Quaternion".parse::<DataType>().is_err());
    }

    #[test]
    fn test_data_type_serde_names() {
        let json = serde_json::to_string(&DataType::ByteString).unwrap();
        assert_eq!(json, "\"ByteString\"");
        let dt: DataType = serde_json::from_str("\"Variant\"").unwrap();
        assert_eq!(dt, DataType::BaseDataType);
    }

    #[test]
    fn test_value_rank() {
        assert!(ValueRank::SCALAR.accepts(-1));
        assert!(!ValueRank::SCALAR.accepts(1));
        assert!(ValueRank::ONE_DIMENSION.accepts(1));
        assert!(!ValueRank::ONE_DIMENSION.accepts(2));
        assert!(ValueRank::ONE_OR_MORE_DIMENSIONS.accepts(3));
        assert!(!ValueRank::ONE_OR_MORE_DIMENSIONS.accepts(-1));
        assert!(ValueRank::ANY.accepts(-1));
        assert!(ValueRank::SCALAR_OR_ONE_DIMENSION.accepts(-1));
        assert!(!ValueRank::SCALAR_OR_ONE_DIMENSION.accepts(2));

        assert!(ValueRank::ANY.accepts_declared(ValueRank::ONE_DIMENSION));
        assert!(!ValueRank::SCALAR.accepts_declared(ValueRank::ANY));
        assert_eq!(ValueRank::default(), ValueRank::SCALAR);
    }
}
