// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Node model error types.
//!
//! Every failure in the node model is local, synchronous and recoverable:
//! the operation reports the first violated contract and leaves the tree
//! unmodified. The hosting runtime translates these errors into protocol
//! level service faults using [`NodeError::status_code`].
//!
//! # Error Categories
//!
//! ```text
//! NodeError
//! ├── Value      - TypeMismatch, Cast
//! ├── Method     - ArgumentCountMismatch, ArgumentTypeMismatch, NotImplemented, MethodFailed
//! ├── State      - InvalidState
//! ├── Structure  - NotFound, NodeClassMismatch, DuplicateBrowseName,
//! │                DuplicateNodeId, AlreadyParented
//! └── Schema     - UnknownType, AbstractType, InvalidSchema, InvalidNodeId
//! ```
//!
//! # Examples
//!
//! ```
//! use adi_core::error::{NodeError, ErrorSeverity};
//!
//! let error = NodeError::argument_count_mismatch("StartSingleAcquisition", 3, 2);
//! assert_eq!(error.category(), "method");
//! assert_eq!(error.severity(), ErrorSeverity::Warning);
//! assert!(error.to_string().contains("expected 3"));
//! ```

use std::fmt;

use thiserror::Error;
use tracing::Level;

use crate::types::NodeClass;

// =============================================================================
// ArgumentDirection
// =============================================================================

/// Direction of a method argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArgumentDirection {
    /// Input argument supplied by the caller.
    Input,
    /// Output argument populated by the handler.
    Output,
}

impl fmt::Display for ArgumentDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Input => write!(f, "input"),
            Self::Output => write!(f, "output"),
        }
    }
}

// =============================================================================
// NodeError
// =============================================================================

/// The error type for all node model operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NodeError {
    /// A value or replacement node is incompatible with the declared type.
    #[error("Type mismatch on '{node}': expected {expected}, got {actual}")]
    TypeMismatch {
        /// The node (or slot) being assigned.
        node: String,
        /// The declared type.
        expected: String,
        /// The offered type.
        actual: String,
    },

    /// A stored value cannot be narrowed to the requested static type.
    #[error("Cannot cast value of '{node}' to {target}: stored value is {actual}")]
    Cast {
        /// The variable node.
        node: String,
        /// The requested static type.
        target: String,
        /// The stored value's type.
        actual: String,
    },

    /// A method was invoked with the wrong number of arguments.
    #[error("Method '{method}' expected {expected} input argument(s), got {actual}")]
    ArgumentCountMismatch {
        /// The method browse name.
        method: String,
        /// Declared argument count.
        expected: usize,
        /// Supplied argument count.
        actual: usize,
    },

    /// A method argument has the wrong type.
    #[error(
        "Method '{method}' {direction} argument #{index} '{name}': expected {expected}, got {actual}"
    )]
    ArgumentTypeMismatch {
        /// The method browse name.
        method: String,
        /// Whether an input or output argument failed.
        direction: ArgumentDirection,
        /// Zero-based argument position.
        index: usize,
        /// Declared argument name.
        name: String,
        /// Declared type.
        expected: String,
        /// Supplied type.
        actual: String,
    },

    /// A state machine was set to a state outside its declared set.
    #[error("State '{state}' is not declared for state machine '{machine}'")]
    InvalidState {
        /// The state machine node.
        machine: String,
        /// The rejected state.
        state: String,
    },

    /// A method was invoked with no handler registered.
    #[error("Method '{method}' has no call handler")]
    NotImplemented {
        /// The method browse name.
        method: String,
    },

    /// A handler reported a domain failure.
    #[error("Method '{method}' failed: {message}")]
    MethodFailed {
        /// The method browse name.
        method: String,
        /// Failure description.
        message: String,
    },

    /// A child lookup failed.
    #[error("Child '{name}' not found under '{parent}'")]
    NotFound {
        /// The parent node.
        parent: String,
        /// The requested child name.
        name: String,
    },

    /// An operation was applied to a node of the wrong class.
    #[error("Node '{node}' is a {actual:?} node, expected {expected:?}")]
    NodeClassMismatch {
        /// The node.
        node: String,
        /// The required node class.
        expected: NodeClass,
        /// The actual node class.
        actual: NodeClass,
    },

    /// Two children of one parent would share a browse name.
    #[error("Browse name '{name}' already used under '{parent}'")]
    DuplicateBrowseName {
        /// The parent node.
        parent: String,
        /// The duplicated browse name.
        name: String,
    },

    /// Two live nodes would share a node id.
    #[error("Node id '{node_id}' is already in use")]
    DuplicateNodeId {
        /// The duplicated node id.
        node_id: String,
    },

    /// A node that already has a parent was attached elsewhere.
    #[error("Node '{node}' is already a child of '{parent}'")]
    AlreadyParented {
        /// The node being attached.
        node: String,
        /// Its current parent.
        parent: String,
    },

    /// A type name is not registered.
    #[error("Unknown node type '{name}'")]
    UnknownType {
        /// The type name.
        name: String,
    },

    /// An abstract type was instantiated.
    #[error("Type '{name}' is abstract and cannot be instantiated")]
    AbstractType {
        /// The type name.
        name: String,
    },

    /// A schema declaration is inconsistent.
    #[error("Invalid schema for '{type_name}': {message}")]
    InvalidSchema {
        /// The offending type.
        type_name: String,
        /// What is wrong.
        message: String,
    },

    /// A node id string could not be parsed.
    #[error("Invalid node id '{value}': {reason}")]
    InvalidNodeId {
        /// The rejected input.
        value: String,
        /// Why parsing failed.
        reason: String,
    },
}

impl NodeError {
    // =========================================================================
    // Factory Methods
    // =========================================================================

    /// Creates a type mismatch error.
    pub fn type_mismatch(
        node: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self::TypeMismatch {
            node: node.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Creates a cast error.
    pub fn cast(node: impl Into<String>, target: impl Into<String>, actual: impl Into<String>) -> Self {
        Self::Cast {
            node: node.into(),
            target: target.into(),
            actual: actual.into(),
        }
    }

    /// Creates an argument count mismatch error.
    pub fn argument_count_mismatch(method: impl Into<String>, expected: usize, actual: usize) -> Self {
        Self::ArgumentCountMismatch {
            method: method.into(),
            expected,
            actual,
        }
    }

    /// Creates an argument type mismatch error.
    pub fn argument_type_mismatch(
        method: impl Into<String>,
        direction: ArgumentDirection,
        index: usize,
        name: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self::ArgumentTypeMismatch {
            method: method.into(),
            direction,
            index,
            name: name.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Creates an invalid state error.
    pub fn invalid_state(machine: impl Into<String>, state: impl Into<String>) -> Self {
        Self::InvalidState {
            machine: machine.into(),
            state: state.into(),
        }
    }

    /// Creates a not implemented error.
    pub fn not_implemented(method: impl Into<String>) -> Self {
        Self::NotImplemented { method: method.into() }
    }

    /// Creates a method failure for handlers to return.
    pub fn method_failed(method: impl Into<String>, message: impl Into<String>) -> Self {
        Self::MethodFailed {
            method: method.into(),
            message: message.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(parent: impl Into<String>, name: impl Into<String>) -> Self {
        Self::NotFound {
            parent: parent.into(),
            name: name.into(),
        }
    }

    /// Creates a node class mismatch error.
    pub fn node_class_mismatch(node: impl Into<String>, expected: NodeClass, actual: NodeClass) -> Self {
        Self::NodeClassMismatch {
            node: node.into(),
            expected,
            actual,
        }
    }

    /// Creates a duplicate browse name error.
    pub fn duplicate_browse_name(parent: impl Into<String>, name: impl Into<String>) -> Self {
        Self::DuplicateBrowseName {
            parent: parent.into(),
            name: name.into(),
        }
    }

    /// Creates a duplicate node id error.
    pub fn duplicate_node_id(node_id: impl Into<String>) -> Self {
        Self::DuplicateNodeId { node_id: node_id.into() }
    }

    /// Creates an already parented error.
    pub fn already_parented(node: impl Into<String>, parent: impl Into<String>) -> Self {
        Self::AlreadyParented {
            node: node.into(),
            parent: parent.into(),
        }
    }

    /// Creates an unknown type error.
    pub fn unknown_type(name: impl Into<String>) -> Self {
        Self::UnknownType { name: name.into() }
    }

    /// Creates an abstract type error.
    pub fn abstract_type(name: impl Into<String>) -> Self {
        Self::AbstractType { name: name.into() }
    }

    /// Creates an invalid schema error.
    pub fn invalid_schema(type_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidSchema {
            type_name: type_name.into(),
            message: message.into(),
        }
    }

    /// Creates an invalid node id error.
    pub fn invalid_node_id(value: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidNodeId {
            value: value.into(),
            reason: reason.into(),
        }
    }

    // =========================================================================
    // Error Properties
    // =========================================================================

    /// Returns the error category for logging and metrics.
    pub fn category(&self) -> &'static str {
        match self {
            Self::TypeMismatch { .. } | Self::Cast { .. } => "value",
            Self::ArgumentCountMismatch { .. }
            | Self::ArgumentTypeMismatch { .. }
            | Self::NotImplemented { .. }
            | Self::MethodFailed { .. } => "method",
            Self::InvalidState { .. } => "state",
            Self::NotFound { .. }
            | Self::NodeClassMismatch { .. }
            | Self::DuplicateBrowseName { .. }
            | Self::DuplicateNodeId { .. }
            | Self::AlreadyParented { .. } => "structure",
            Self::UnknownType { .. }
            | Self::AbstractType { .. }
            | Self::InvalidSchema { .. }
            | Self::InvalidNodeId { .. } => "schema",
        }
    }

    /// Returns a unique error code for this error.
    pub fn error_code(&self) -> ErrorCode {
        match self {
            Self::TypeMismatch { .. } => ErrorCode::new(1, 1),
            Self::Cast { .. } => ErrorCode::new(1, 2),
            Self::ArgumentCountMismatch { .. } => ErrorCode::new(2, 1),
            Self::ArgumentTypeMismatch { .. } => ErrorCode::new(2, 2),
            Self::NotImplemented { .. } => ErrorCode::new(2, 3),
            Self::MethodFailed { .. } => ErrorCode::new(2, 4),
            Self::InvalidState { .. } => ErrorCode::new(3, 1),
            Self::NotFound { .. } => ErrorCode::new(4, 1),
            Self::NodeClassMismatch { .. } => ErrorCode::new(4, 2),
            Self::DuplicateBrowseName { .. } => ErrorCode::new(4, 3),
            Self::DuplicateNodeId { .. } => ErrorCode::new(4, 4),
            Self::AlreadyParented { .. } => ErrorCode::new(4, 5),
            Self::UnknownType { .. } => ErrorCode::new(5, 1),
            Self::AbstractType { .. } => ErrorCode::new(5, 2),
            Self::InvalidSchema { .. } => ErrorCode::new(5, 3),
            Self::InvalidNodeId { .. } => ErrorCode::new(5, 4),
        }
    }

    /// Returns the OPC UA status code a hosting runtime should report.
    pub fn status_code(&self) -> u32 {
        match self {
            Self::TypeMismatch { .. } | Self::Cast { .. } => status_codes::BAD_TYPE_MISMATCH,
            Self::ArgumentCountMismatch { expected, actual, .. } => {
                if actual < expected {
                    status_codes::BAD_ARGUMENTS_MISSING
                } else {
                    status_codes::BAD_TOO_MANY_ARGUMENTS
                }
            }
            Self::ArgumentTypeMismatch { .. } => status_codes::BAD_INVALID_ARGUMENT,
            Self::NotImplemented { .. } => status_codes::BAD_NOT_IMPLEMENTED,
            Self::MethodFailed { .. } => status_codes::BAD_UNEXPECTED_ERROR,
            Self::InvalidState { .. } => status_codes::BAD_INVALID_STATE,
            Self::NotFound { .. } => status_codes::BAD_NOT_FOUND,
            Self::NodeClassMismatch { .. } => status_codes::BAD_NODE_CLASS_INVALID,
            Self::DuplicateBrowseName { .. } => status_codes::BAD_BROWSE_NAME_DUPLICATED,
            Self::DuplicateNodeId { .. } => status_codes::BAD_NODE_ID_EXISTS,
            Self::AlreadyParented { .. } => status_codes::BAD_PARENT_NODE_ID_INVALID,
            Self::UnknownType { .. } | Self::AbstractType { .. } => {
                status_codes::BAD_TYPE_DEFINITION_INVALID
            }
            Self::InvalidSchema { .. } => status_codes::BAD_CONFIGURATION_ERROR,
            Self::InvalidNodeId { .. } => status_codes::BAD_NODE_ID_INVALID,
        }
    }

    /// Returns the severity level of this error.
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::NotFound { .. } => ErrorSeverity::Info,
            Self::InvalidSchema { .. } | Self::UnknownType { .. } => ErrorSeverity::Critical,
            Self::MethodFailed { .. } | Self::DuplicateNodeId { .. } => ErrorSeverity::Error,
            _ => ErrorSeverity::Warning,
        }
    }

    /// Returns a user-friendly error message.
    pub fn user_message(&self) -> String {
        match self {
            Self::TypeMismatch { node, expected, .. } => {
                format!("값 형식 불일치 ({}): {} 형식이 필요함", node, expected)
            }
            Self::Cast { node, target, .. } => {
                format!("값 변환 실패 ({}): {}", node, target)
            }
            Self::ArgumentCountMismatch { method, expected, actual } => {
                format!("메서드 인자 개수 불일치 ({}): {}/{}", method, actual, expected)
            }
            Self::ArgumentTypeMismatch { method, name, .. } => {
                format!("메서드 인자 형식 불일치 ({}): {}", method, name)
            }
            Self::InvalidState { machine, state } => {
                format!("허용되지 않은 상태 ({}): {}", machine, state)
            }
            Self::NotImplemented { method } => format!("구현되지 않은 메서드: {}", method),
            Self::MethodFailed { method, message } => {
                format!("메서드 실행 실패 ({}): {}", method, message)
            }
            Self::NotFound { parent, name } => {
                format!("하위 노드를 찾을 수 없음 ({}): {}", parent, name)
            }
            Self::NodeClassMismatch { node, .. } => format!("잘못된 노드 종류: {}", node),
            Self::DuplicateBrowseName { parent, name } => {
                format!("중복된 이름 ({}): {}", parent, name)
            }
            Self::DuplicateNodeId { node_id } => format!("중복된 노드 ID: {}", node_id),
            Self::AlreadyParented { node, .. } => format!("이미 다른 부모에 연결된 노드: {}", node),
            Self::UnknownType { name } => format!("알 수 없는 노드 형식: {}", name),
            Self::AbstractType { name } => format!("추상 형식은 생성할 수 없음: {}", name),
            Self::InvalidSchema { type_name, message } => {
                format!("스키마 오류 ({}): {}", type_name, message)
            }
            Self::InvalidNodeId { value, .. } => format!("잘못된 노드 ID 형식: {}", value),
        }
    }

    /// Returns the tracing level for this error.
    pub fn tracing_level(&self) -> Level {
        self.severity().to_tracing_level()
    }

    /// Logs this error with appropriate level and context.
    pub fn log(&self, context: &str) {
        let code = self.error_code();
        match self.tracing_level() {
            Level::ERROR => tracing::error!(
                error_code = %code,
                category = self.category(),
                context = context,
                "{self}"
            ),
            Level::WARN => tracing::warn!(
                error_code = %code,
                category = self.category(),
                context = context,
                "{self}"
            ),
            _ => tracing::debug!(
                error_code = %code,
                category = self.category(),
                context = context,
                "{self}"
            ),
        }
    }
}

/// A Result type with NodeError.
pub type NodeResult<T> = Result<T, NodeError>;

// =============================================================================
// OPC UA Status Codes
// =============================================================================

/// OPC UA status codes used for service-fault translation.
pub mod status_codes {
    /// Good.
    pub const GOOD: u32 = 0x0000_0000;
    /// BadUnexpectedError.
    pub const BAD_UNEXPECTED_ERROR: u32 = 0x8001_0000;
    /// BadNodeIdInvalid.
    pub const BAD_NODE_ID_INVALID: u32 = 0x8033_0000;
    /// BadNodeIdUnknown.
    pub const BAD_NODE_ID_UNKNOWN: u32 = 0x8034_0000;
    /// BadNotFound.
    pub const BAD_NOT_FOUND: u32 = 0x803E_0000;
    /// BadNotImplemented.
    pub const BAD_NOT_IMPLEMENTED: u32 = 0x8040_0000;
    /// BadParentNodeIdInvalid.
    pub const BAD_PARENT_NODE_ID_INVALID: u32 = 0x805B_0000;
    /// BadNodeClassInvalid.
    pub const BAD_NODE_CLASS_INVALID: u32 = 0x805F_0000;
    /// BadBrowseNameDuplicated.
    pub const BAD_BROWSE_NAME_DUPLICATED: u32 = 0x8061_0000;
    /// BadNodeIdExists.
    pub const BAD_NODE_ID_EXISTS: u32 = 0x805E_0000;
    /// BadTypeDefinitionInvalid.
    pub const BAD_TYPE_DEFINITION_INVALID: u32 = 0x8063_0000;
    /// BadTypeMismatch.
    pub const BAD_TYPE_MISMATCH: u32 = 0x8074_0000;
    /// BadArgumentsMissing.
    pub const BAD_ARGUMENTS_MISSING: u32 = 0x8076_0000;
    /// BadConfigurationError.
    pub const BAD_CONFIGURATION_ERROR: u32 = 0x8089_0000;
    /// BadInvalidArgument.
    pub const BAD_INVALID_ARGUMENT: u32 = 0x80AB_0000;
    /// BadInvalidState.
    pub const BAD_INVALID_STATE: u32 = 0x80AF_0000;
    /// BadTooManyArguments.
    pub const BAD_TOO_MANY_ARGUMENTS: u32 = 0x80E5_0000;
}

// =============================================================================
// ErrorSeverity
// =============================================================================

/// Error severity levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ErrorSeverity {
    /// Informational - no action required.
    Info,
    /// Warning - the caller sent something the model rejected.
    Warning,
    /// Error - action required, but recoverable.
    Error,
    /// Critical - the model definition itself is broken.
    Critical,
}

impl ErrorSeverity {
    /// Converts to tracing level.
    pub fn to_tracing_level(self) -> Level {
        match self {
            Self::Info => Level::INFO,
            Self::Warning => Level::WARN,
            Self::Error | Self::Critical => Level::ERROR,
        }
    }

    /// Returns the string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
            Self::Critical => "critical",
        }
    }
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// =============================================================================
// ErrorCode
// =============================================================================

/// Structured error code for categorization.
///
/// Format: `ND-XXYY` where XX is category and YY is specific error.
///
/// Categories:
/// - 1: Value
/// - 2: Method
/// - 3: State
/// - 4: Structure
/// - 5: Schema
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ErrorCode {
    /// Category (1-5).
    pub category: u8,
    /// Specific error within category.
    pub code: u8,
}

impl ErrorCode {
    /// Creates a new error code.
    pub const fn new(category: u8, code: u8) -> Self {
        Self { category, code }
    }

    /// Returns the full error code as a u16.
    pub fn as_u16(&self) -> u16 {
        ((self.category as u16) << 8) | (self.code as u16)
    }

    /// Creates from a u16.
    pub fn from_u16(value: u16) -> Self {
        Self {
            category: (value >> 8) as u8,
            code: (value & 0xFF) as u8,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ND-{:02X}{:02X}", self.category, self.code)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_categories() {
        assert_eq!(NodeError::type_mismatch("n", "Int32", "String").category(), "value");
        assert_eq!(NodeError::not_implemented("Start").category(), "method");
        assert_eq!(NodeError::invalid_state("sm", "Bogus").category(), "state");
        assert_eq!(NodeError::not_found("p", "c").category(), "structure");
        assert_eq!(NodeError::unknown_type("X").category(), "schema");
    }

    #[test]
    fn test_argument_count_status_code() {
        let missing = NodeError::argument_count_mismatch("M", 2, 1);
        assert_eq!(missing.status_code(), status_codes::BAD_ARGUMENTS_MISSING);

        let too_many = NodeError::argument_count_mismatch("M", 1, 2);
        assert_eq!(too_many.status_code(), status_codes::BAD_TOO_MANY_ARGUMENTS);
    }

    #[test]
    fn test_argument_type_message() {
        let error = NodeError::argument_type_mismatch(
            "SetConfiguration",
            ArgumentDirection::Input,
            0,
            "ConfigData",
            "ByteString",
            "String",
        );
        let text = error.to_string();
        assert!(text.contains("input argument #0"));
        assert!(text.contains("ConfigData"));
        assert_eq!(error.status_code(), status_codes::BAD_INVALID_ARGUMENT);
    }

    #[test]
    fn test_error_code() {
        let code = ErrorCode::new(2, 3);
        assert_eq!(code.to_string(), "ND-0203");
        assert_eq!(code.as_u16(), 0x0203);

        let parsed = ErrorCode::from_u16(0x0401);
        assert_eq!(parsed.category, 4);
        assert_eq!(parsed.code, 1);
        assert_eq!(NodeError::not_found("a", "b").error_code(), parsed);
    }

    #[test]
    fn test_severity() {
        assert_eq!(NodeError::not_found("a", "b").severity(), ErrorSeverity::Info);
        assert_eq!(
            NodeError::invalid_schema("T", "bad").severity(),
            ErrorSeverity::Critical
        );
        assert_eq!(ErrorSeverity::Critical.to_tracing_level(), Level::ERROR);
        assert!(ErrorSeverity::Warning < ErrorSeverity::Error);
    }

    #[test]
    fn test_user_message() {
        let message = NodeError::invalid_state("ChannelStateMachine", "Bogus").user_message();
        assert!(message.contains("Bogus"));
    }
}
