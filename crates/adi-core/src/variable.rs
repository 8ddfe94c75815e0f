// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Variable nodes.
//!
//! A variable carries a [`Variant`] constrained by a declared data type and
//! value rank. Writes that violate the declaration fail with `TypeMismatch`
//! and keep the previous value. [`TypedVariable`] is a statically typed view
//! over a variable node.

use std::fmt;
use std::marker::PhantomData;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::change::ChangeMask;
use crate::context::ChangeDetection;
use crate::error::{NodeError, NodeResult};
use crate::node::{Node, NodeKind, NodeRef};
use crate::registry::CURRENT_STATE;
use crate::types::{DataType, NodeClass, ValueRank};
use crate::value::{Variant, VariantValue};

// =============================================================================
// VariableDecl
// =============================================================================

/// Declared type of a variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VariableDecl {
    /// Declared data type.
    pub data_type: DataType,
    /// Declared value rank.
    pub value_rank: ValueRank,
    /// Whether the variable is a property rather than a data variable.
    #[serde(default)]
    pub is_property: bool,
}

impl VariableDecl {
    /// Declares a scalar data variable.
    pub fn variable(data_type: DataType) -> Self {
        Self {
            data_type,
            value_rank: ValueRank::SCALAR,
            is_property: false,
        }
    }

    /// Declares a scalar property.
    pub fn property(data_type: DataType) -> Self {
        Self {
            data_type,
            value_rank: ValueRank::SCALAR,
            is_property: true,
        }
    }

    /// Sets the value rank.
    pub fn with_rank(mut self, value_rank: ValueRank) -> Self {
        self.value_rank = value_rank;
        self
    }

    /// Returns `true` if `value` may be stored. The empty value always may.
    pub fn accepts(&self, value: &Variant) -> bool {
        value.is_empty() || value.is_compatible(self.data_type, self.value_rank)
    }

    /// Returns `true` if a variable declared as `other` fits this declaration.
    pub fn accepts_decl(&self, other: &VariableDecl) -> bool {
        self.data_type.accepts(other.data_type) && self.value_rank.accepts_declared(other.value_rank)
    }

    /// Returns the initial value for a new variable.
    pub fn default_value(&self) -> Variant {
        Variant::default_for(self.data_type, self.value_rank)
    }
}

impl fmt::Display for VariableDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.value_rank.is_scalar() {
            write!(f, "{}", self.data_type)
        } else {
            write!(f, "{} ({})", self.data_type, self.value_rank)
        }
    }
}

// =============================================================================
// VariableState
// =============================================================================

pub(crate) struct VariableState {
    pub(crate) decl: VariableDecl,
    value: RwLock<StoredValue>,
}

struct StoredValue {
    value: Variant,
    updated_at: Option<DateTime<Utc>>,
}

impl VariableState {
    pub(crate) fn new(decl: VariableDecl) -> Self {
        Self {
            decl,
            value: RwLock::new(StoredValue {
                value: decl.default_value(),
                updated_at: None,
            }),
        }
    }
}

// =============================================================================
// Variable operations on Node
// =============================================================================

impl Node {
    pub(crate) fn as_variable(&self) -> NodeResult<&VariableState> {
        match self.kind() {
            NodeKind::Variable(state) => Ok(state),
            _ => Err(NodeError::node_class_mismatch(
                self.path(),
                NodeClass::Variable,
                self.node_class(),
            )),
        }
    }

    /// Returns the variable declaration, `None` for other node classes.
    pub fn variable_decl(&self) -> Option<VariableDecl> {
        match self.kind() {
            NodeKind::Variable(state) => Some(state.decl),
            _ => None,
        }
    }

    /// Returns the declared data type of a variable.
    pub fn data_type(&self) -> Option<DataType> {
        self.variable_decl().map(|decl| decl.data_type)
    }

    /// Returns the declared value rank of a variable.
    pub fn value_rank(&self) -> Option<ValueRank> {
        self.variable_decl().map(|decl| decl.value_rank)
    }

    /// Returns the current value.
    ///
    /// # Errors
    ///
    /// Returns `NodeClassMismatch` if this is not a variable.
    pub fn value(&self) -> NodeResult<Variant> {
        Ok(self.as_variable()?.value.read().value.clone())
    }

    /// Returns when the value was last written, `None` if never.
    pub fn value_timestamp(&self) -> NodeResult<Option<DateTime<Utc>>> {
        Ok(self.as_variable()?.value.read().updated_at)
    }

    /// Writes the value.
    ///
    /// Under [`ChangeDetection::Identity`] every successful write marks
    /// `VALUE`; under [`ChangeDetection::Equality`] only writes that change
    /// the value do.
    ///
    /// # Errors
    ///
    /// - `TypeMismatch` if `value` does not fit the declaration; the previous
    ///   value is kept
    /// - `InvalidState` if this is the `CurrentState` of a state machine and
    ///   `value` names an undeclared state
    /// - `NodeClassMismatch` if this is not a variable
    pub fn set_value(&self, value: impl Into<Variant>) -> NodeResult<()> {
        let value = value.into();
        let state = self.as_variable()?;
        if !state.decl.accepts(&value) {
            let error = NodeError::type_mismatch(
                self.path(),
                state.decl.to_string(),
                value.type_description(),
            );
            error.log("set_value");
            return Err(error);
        }
        self.check_declared_state(&value)?;

        let changed = {
            let mut stored = state.value.write();
            let changed = match self.context().change_detection() {
                ChangeDetection::Identity => true,
                ChangeDetection::Equality => stored.value != value,
            };
            stored.value = value;
            stored.updated_at = Some(Utc::now());
            changed
        };

        if changed {
            self.mark_changed(ChangeMask::VALUE);
        }
        tracing::trace!(node = %self.node_id(), changed, "Value written");
        Ok(())
    }

    /// Rejects undeclared state names written to a state machine's
    /// `CurrentState`. Empty text clears the state.
    fn check_declared_state(&self, value: &Variant) -> NodeResult<()> {
        let Variant::LocalizedText(name) = value else {
            return Ok(());
        };
        if name.is_empty() || self.browse_name().name != CURRENT_STATE {
            return Ok(());
        }
        let Some(parent) = self.parent() else {
            return Ok(());
        };
        let Some(decl) = parent.object_type().and_then(|t| t.state_machine()) else {
            return Ok(());
        };
        if decl.contains(name) {
            return Ok(());
        }
        let error = NodeError::invalid_state(parent.path(), name.as_str());
        error.log("set_value");
        Err(error)
    }

    /// Stores a value without marking the node, for construction.
    pub(crate) fn init_value(&self, value: Variant) -> NodeResult<()> {
        let state = self.as_variable()?;
        if !state.decl.accepts(&value) {
            return Err(NodeError::type_mismatch(
                self.path(),
                state.decl.to_string(),
                value.type_description(),
            ));
        }
        state.value.write().value = value;
        Ok(())
    }
}

// =============================================================================
// TypedVariable
// =============================================================================

/// A variable node viewed through a static Rust type.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use adi_core::prelude::*;
///
/// let context = ModelContext::builder(Arc::new(TypeRegistry::builtin())).build();
/// let node = Node::new_variable(&context, "AcquisitionCounter", VariableDecl::variable(DataType::UInt32)).unwrap();
///
/// let counter = TypedVariable::<u32>::new(node).unwrap();
/// counter.set(3).unwrap();
/// assert_eq!(counter.value().unwrap(), 3);
/// ```
pub struct TypedVariable<T> {
    node: NodeRef,
    _marker: PhantomData<fn() -> T>,
}

impl<T: VariantValue> TypedVariable<T> {
    /// Wraps a variable node.
    ///
    /// # Errors
    ///
    /// - `NodeClassMismatch` if the node is not a variable
    /// - `TypeMismatch` if values of `T` cannot be stored in the node
    pub fn new(node: NodeRef) -> NodeResult<Self> {
        let decl = node.as_variable()?.decl;
        let wanted = VariableDecl {
            data_type: T::data_type(),
            value_rank: T::value_rank(),
            is_property: decl.is_property,
        };
        if !decl.accepts_decl(&wanted) {
            return Err(NodeError::type_mismatch(
                node.path(),
                decl.to_string(),
                wanted.to_string(),
            ));
        }
        Ok(Self {
            node,
            _marker: PhantomData,
        })
    }

    /// Returns the value cast to `T`.
    ///
    /// # Errors
    ///
    /// Returns `Cast` if the stored value is empty or cannot be narrowed.
    pub fn value(&self) -> NodeResult<T> {
        let value = self.node.value()?;
        T::from_variant(&value).ok_or_else(|| {
            NodeError::cast(self.node.path(), T::data_type().to_string(), value.type_description())
        })
    }

    /// Returns the value cast to `T`, `None` if the variable is empty.
    pub fn value_opt(&self) -> NodeResult<Option<T>> {
        let value = self.node.value()?;
        if value.is_empty() {
            return Ok(None);
        }
        T::from_variant(&value).map(Some).ok_or_else(|| {
            NodeError::cast(self.node.path(), T::data_type().to_string(), value.type_description())
        })
    }

    /// Writes the value.
    pub fn set(&self, value: T) -> NodeResult<()> {
        self.node.set_value(value.into_variant())
    }

    /// Returns the underlying node.
    pub fn node(&self) -> &NodeRef {
        &self.node
    }
}

impl<T> Clone for TypedVariable<T> {
    fn clone(&self) -> Self {
        Self {
            node: self.node.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T> fmt::Debug for TypedVariable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypedVariable")
            .field("node", &self.node.node_id())
            .field("type", &std::any::type_name::<T>())
            .finish()
    }
}

// =============================================================================
// Tests
// =============================================================================
