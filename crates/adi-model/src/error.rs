// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Error type for the ADI model layer.
//!
//! ```text
//! ModelError
//! ├── Node        - node model contract violations (adi-core)
//! ├── Config      - configuration loading and validation (adi-config)
//! ├── Schema      - the embedded ADI schema failed to parse
//! └── WrongType   - a node or configured type is not of the expected ADI type
//! ```

use adi_config::ConfigError;
use adi_core::NodeError;
use thiserror::Error;

/// Errors raised while building or wrapping an ADI model.
#[derive(Debug, Error)]
pub enum ModelError {
    /// Node model error.
    #[error("Node error: {0}")]
    Node(#[from] NodeError),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The embedded schema could not be parsed.
    #[error("Invalid model schema: {message}")]
    Schema {
        /// Parser message.
        message: String,
    },

    /// A node or type name is not the expected ADI type.
    #[error("'{name}' is of type '{actual}', expected '{expected}' or a subtype")]
    WrongType {
        /// Node path or configured name.
        name: String,
        /// Required base type.
        expected: String,
        /// Actual type.
        actual: String,
    },
}

impl ModelError {
    /// Creates a schema error.
    pub fn schema(message: impl Into<String>) -> Self {
        Self::Schema {
            message: message.into(),
        }
    }

    /// Creates a wrong-type error.
    pub fn wrong_type(
        name: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self::WrongType {
            name: name.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Returns the wrapped node error, if any.
    pub fn as_node_error(&self) -> Option<&NodeError> {
        match self {
            ModelError::Node(e) => Some(e),
            _ => None,
        }
    }

    /// Returns a user-friendly error message in Korean.
    pub fn user_message(&self) -> String {
        match self {
            ModelError::Node(e) => format!("모델 오류: {}", e.user_message()),
            ModelError::Config(e) => format!("설정 오류: {}", e.user_message()),
            ModelError::Schema { message } => format!("모델 스키마 오류: {}", message),
            ModelError::WrongType { name, expected, .. } => {
                format!("잘못된 타입 ({}): {} 타입이 필요합니다", name, expected)
            }
        }
    }

    /// Returns the error type as a string for logging.
    pub fn error_type(&self) -> &'static str {
        match self {
            ModelError::Node(_) => "node",
            ModelError::Config(_) => "config",
            ModelError::Schema { .. } => "schema",
            ModelError::WrongType { .. } => "wrong_type",
        }
    }
}

/// A Result type with ModelError.
pub type ModelResult<T> = Result<T, ModelError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_node_error() {
        let error: ModelError = NodeError::invalid_state("ChannelStateMachine", "Bogus").into();
        assert_eq!(error.error_type(), "node");
        assert!(matches!(
            error.as_node_error(),
            Some(NodeError::InvalidState { .. })
        ));
        assert!(error.user_message().starts_with("모델 오류"));
    }

    #[test]
    fn test_wrong_type_message() {
        let error = ModelError::wrong_type("Analyser1", "AnalyserDeviceType", "FolderType");
        assert_eq!(
            error.to_string(),
            "'Analyser1' is of type 'FolderType', expected 'AnalyserDeviceType' or a subtype"
        );
        assert!(error.as_node_error().is_none());
    }
}
