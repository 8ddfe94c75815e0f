// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Method nodes.
//!
//! A method declares ordered input and output arguments and dispatches to a
//! pluggable [`MethodHandler`]. [`Node::invoke`] validates the argument
//! count and every input type before the handler runs, hands the handler
//! empty output slots, and validates the outputs it wrote. An output the
//! handler leaves empty fails the call.
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//! use adi_core::prelude::*;
//!
//! let context = ModelContext::builder(Arc::new(TypeRegistry::builtin())).build();
//! let decl = MethodDecl::new()
//!     .with_input(Argument::new("Count", DataType::UInt32))
//!     .with_output(Argument::new("Echo", DataType::String));
//! let method = Node::new_method(&context, "Echo", decl).unwrap();
//!
//! method.register_handler(|_ctx, _object, inputs, outputs| {
//!     outputs[0] = Variant::String(format!("got {}", inputs[0]));
//!     Ok(())
//! }).unwrap();
//!
//! let outputs = method
//!     .invoke(&CallContext::new(), &NodeId::OBJECTS_FOLDER, &[Variant::UInt32(3)])
//!     .unwrap();
//! assert_eq!(outputs, vec![Variant::String("got 3".into())]);
//! ```

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::error::{ArgumentDirection, NodeError, NodeResult};
use crate::node::{Node, NodeKind};
use crate::schema::ArgumentSchema;
use crate::types::{DataType, NodeClass, NodeId, ValueRank};
use crate::value::Variant;

// =============================================================================
// Argument
// =============================================================================

/// A declared method argument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Argument {
    /// Argument name.
    pub name: String,
    /// Argument data type.
    pub data_type: DataType,
    /// Argument value rank.
    pub value_rank: ValueRank,
    /// Description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Argument {
    /// Creates a scalar argument.
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
            value_rank: ValueRank::SCALAR,
            description: None,
        }
    }

    /// Sets the value rank.
    pub fn with_rank(mut self, value_rank: ValueRank) -> Self {
        self.value_rank = value_rank;
        self
    }

    /// Returns `true` if `value` may be passed for this argument.
    pub fn accepts(&self, value: &Variant) -> bool {
        value.is_compatible(self.data_type, self.value_rank)
    }

    /// Returns the declared type, `UInt32` or `Double[]`.
    pub fn type_description(&self) -> String {
        if self.value_rank.is_scalar() {
            self.data_type.to_string()
        } else {
            format!("{}[]", self.data_type)
        }
    }
}

impl From<&ArgumentSchema> for Argument {
    fn from(schema: &ArgumentSchema) -> Self {
        Self {
            name: schema.name.clone(),
            data_type: schema.data_type,
            value_rank: schema.value_rank,
            description: schema.description.clone(),
        }
    }
}

impl fmt::Display for Argument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.type_description())
    }
}

// =============================================================================
// MethodDecl
// =============================================================================

/// A method signature.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MethodDecl {
    /// Input arguments in call order.
    #[serde(default)]
    pub inputs: Vec<Argument>,
    /// Output arguments in result order.
    #[serde(default)]
    pub outputs: Vec<Argument>,
}

impl MethodDecl {
    /// Creates a signature with no arguments.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an input argument.
    pub fn with_input(mut self, argument: Argument) -> Self {
        self.inputs.push(argument);
        self
    }

    /// Adds an output argument.
    pub fn with_output(mut self, argument: Argument) -> Self {
        self.outputs.push(argument);
        self
    }
}

impl fmt::Display for MethodDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let join = |args: &[Argument]| {
            args.iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        };
        write!(f, "({})", join(&self.inputs))?;
        if !self.outputs.is_empty() {
            write!(f, " -> ({})", join(&self.outputs))?;
        }
        Ok(())
    }
}

// =============================================================================
// CallContext
// =============================================================================

/// Caller information passed to handlers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallContext {
    /// Session the call arrived on.
    pub session_id: Option<String>,
    /// Authenticated user.
    pub user: Option<String>,
    /// When the call was received.
    pub timestamp: DateTime<Utc>,
}

impl CallContext {
    /// Creates an anonymous context stamped now.
    pub fn new() -> Self {
        Self {
            session_id: None,
            user: None,
            timestamp: Utc::now(),
        }
    }

    /// Sets the session id.
    pub fn with_session(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    /// Sets the user identity.
    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }
}

impl Default for CallContext {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// MethodHandler
// =============================================================================

/// Implements a method.
///
/// `inputs` has exactly the declared inputs, already type checked.
/// `outputs` has one slot per declared output, pre-filled with the declared
/// type's default; the handler overwrites them in place.
pub trait MethodHandler: Send + Sync {
    /// Executes the method on the object `object_id`.
    fn call(
        &self,
        context: &CallContext,
        object_id: &NodeId,
        inputs: &[Variant],
        outputs: &mut [Variant],
    ) -> NodeResult<()>;
}

impl<F> MethodHandler for F
where
    F: Fn(&CallContext, &NodeId, &[Variant], &mut [Variant]) -> NodeResult<()> + Send + Sync,
{
    fn call(
        &self,
        context: &CallContext,
        object_id: &NodeId,
        inputs: &[Variant],
        outputs: &mut [Variant],
    ) -> NodeResult<()> {
        self(context, object_id, inputs, outputs)
    }
}

// =============================================================================
// MethodState
// =============================================================================

pub(crate) struct MethodState {
    pub(crate) decl: Arc<MethodDecl>,
    handler: RwLock<Option<Arc<dyn MethodHandler>>>,
}

impl MethodState {
    pub(crate) fn new(decl: Arc<MethodDecl>) -> Self {
        Self {
            decl,
            handler: RwLock::new(None),
        }
    }
}

// =============================================================================
// Method operations on Node
// =============================================================================

impl Node {
    pub(crate) fn as_method(&self) -> NodeResult<&MethodState> {
        match self.kind() {
            NodeKind::Method(state) => Ok(state),
            _ => Err(NodeError::node_class_mismatch(
                self.path(),
                NodeClass::Method,
                self.node_class(),
            )),
        }
    }

    /// Returns the method signature, `None` for other node classes.
    pub fn method_decl(&self) -> Option<Arc<MethodDecl>> {
        match self.kind() {
            NodeKind::Method(state) => Some(state.decl.clone()),
            _ => None,
        }
    }

    /// Registers a closure as the call handler, replacing any previous one.
    pub fn register_handler<F>(&self, handler: F) -> NodeResult<()>
    where
        F: Fn(&CallContext, &NodeId, &[Variant], &mut [Variant]) -> NodeResult<()> + Send + Sync + 'static,
    {
        self.set_handler(Arc::new(handler))
    }

    /// Sets the call handler, replacing any previous one. Last write wins.
    pub fn set_handler(&self, handler: Arc<dyn MethodHandler>) -> NodeResult<()> {
        let state = self.as_method()?;
        *state.handler.write() = Some(handler);
        tracing::debug!(method = %self.node_id(), "Method handler registered");
        Ok(())
    }

    /// Removes the call handler.
    pub fn clear_handler(&self) -> NodeResult<()> {
        let state = self.as_method()?;
        *state.handler.write() = None;
        Ok(())
    }

    /// Returns `true` if a handler is registered.
    pub fn has_handler(&self) -> bool {
        match self.kind() {
            NodeKind::Method(state) => state.handler.read().is_some(),
            _ => false,
        }
    }

    /// Invokes the method.
    ///
    /// The handler runs without any node lock held.
    ///
    /// # Errors
    ///
    /// - `ArgumentCountMismatch` if `inputs` has the wrong length
    /// - `ArgumentTypeMismatch` if an input, or an output written by the
    ///   handler, does not fit its declaration, or an output is left unset
    /// - `NotImplemented` if no handler is registered
    /// - any error returned by the handler
    pub fn invoke(
        &self,
        context: &CallContext,
        object_id: &NodeId,
        inputs: &[Variant],
    ) -> NodeResult<Vec<Variant>> {
        let state = self.as_method()?;
        let decl = &state.decl;
        let method = self.browse_name().name.as_str();

        if inputs.len() != decl.inputs.len() {
            return Err(NodeError::argument_count_mismatch(
                method,
                decl.inputs.len(),
                inputs.len(),
            ));
        }
        for (index, (argument, value)) in decl.inputs.iter().zip(inputs).enumerate() {
            if !argument.accepts(value) {
                return Err(NodeError::argument_type_mismatch(
                    method,
                    ArgumentDirection::Input,
                    index,
                    &argument.name,
                    argument.type_description(),
                    value.type_description(),
                ));
            }
        }

        let handler = state
            .handler
            .read()
            .clone()
            .ok_or_else(|| NodeError::not_implemented(method))?;

        let mut outputs = vec![Variant::Empty; decl.outputs.len()];

        tracing::debug!(
            method = %self.node_id(),
            object = %object_id,
            session = ?context.session_id,
            inputs = inputs.len(),
            "Invoking method"
        );

        if let Err(error) = handler.call(context, object_id, inputs, &mut outputs) {
            error.log("method handler");
            return Err(error);
        }

        for (index, (argument, value)) in decl.outputs.iter().zip(&outputs).enumerate() {
            if !argument.accepts(value) {
                let error = NodeError::argument_type_mismatch(
                    method,
                    ArgumentDirection::Output,
                    index,
                    &argument.name,
                    argument.type_description(),
                    value.type_description(),
                );
                error.log("method handler");
                return Err(error);
            }
        }

        Ok(outputs)
    }
}

// =============================================================================
// Tests
// =============================================================================
