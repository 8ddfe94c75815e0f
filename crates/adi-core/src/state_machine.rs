// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! State-machine nodes.
//!
//! A state machine is an object whose type declares a finite state set. Its
//! `CurrentState` variable holds the current state name and only accepts
//! declared states. Sub-machines are ordinary object slots; a state lists
//! the sub-machines that are active while it is current.
//!
//! The node is a passive holder. Which transitions are allowed, and what
//! they do, is decided by the method handlers that drive the machine.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{NodeError, NodeResult};
use crate::node::NodeRef;
use crate::registry::CURRENT_STATE;
use crate::types::NodeClass;
use crate::value::{LocalizedText, Variant};
use crate::variable::TypedVariable;

// =============================================================================
// Declarations
// =============================================================================

/// One declared state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateDecl {
    /// State name.
    pub name: String,
    /// State number.
    pub number: u32,
    /// Sub-machine slots active in this state.
    pub sub_machines: Vec<String>,
}

/// The resolved state set of a state-machine type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateMachineDecl {
    pub(crate) states: Vec<StateDecl>,
    pub(crate) initial: Option<String>,
}

impl StateMachineDecl {
    /// Returns the declared states in declaration order.
    pub fn states(&self) -> &[StateDecl] {
        &self.states
    }

    /// Returns the initial state name.
    pub fn initial(&self) -> Option<&str> {
        self.initial.as_deref()
    }

    /// Returns a state by name.
    pub fn state(&self, name: &str) -> Option<&StateDecl> {
        self.states.iter().find(|s| s.name == name)
    }

    /// Returns a state by number.
    pub fn state_by_number(&self, number: u32) -> Option<&StateDecl> {
        self.states.iter().find(|s| s.number == number)
    }

    /// Returns `true` if `name` is a declared state.
    pub fn contains(&self, name: &str) -> bool {
        self.state(name).is_some()
    }
}

impl fmt::Display for StateMachineDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.states.iter().map(|s| s.name.as_str()).collect();
        write!(f, "{{{}}}", names.join(", "))
    }
}

// =============================================================================
// StateMachine
// =============================================================================

/// A state-machine object node viewed through its declared state set.
#[derive(Clone)]
pub struct StateMachine {
    node: NodeRef,
    decl: Arc<StateMachineDecl>,
}

impl StateMachine {
    /// Wraps an object whose type declares a state set.
    ///
    /// # Errors
    ///
    /// - `NodeClassMismatch` if the node is not an object
    /// - `TypeMismatch` if its type declares no state set
    pub fn new(node: NodeRef) -> NodeResult<Self> {
        let object_type = node.object_type().ok_or_else(|| {
            NodeError::node_class_mismatch(node.path(), NodeClass::Object, node.node_class())
        })?;
        let decl = object_type.state_machine().cloned().ok_or_else(|| {
            NodeError::type_mismatch(node.path(), "state machine", object_type.name())
        })?;
        Ok(Self { node, decl })
    }

    /// Returns the underlying node.
    pub fn node(&self) -> &NodeRef {
        &self.node
    }

    /// Returns the declared state set.
    pub fn decl(&self) -> &Arc<StateMachineDecl> {
        &self.decl
    }

    /// Returns the declared states.
    pub fn states(&self) -> &[StateDecl] {
        self.decl.states()
    }

    /// Returns the initial state.
    pub fn initial_state(&self) -> Option<&str> {
        self.decl.initial()
    }

    fn current_state_variable(&self) -> NodeResult<TypedVariable<LocalizedText>> {
        let node = self.node.child(CURRENT_STATE)?;
        TypedVariable::new(node)
    }

    /// Returns the current state, `None` before any state is set.
    pub fn current_state(&self) -> NodeResult<Option<String>> {
        let text = self.current_state_variable()?.value_opt()?;
        Ok(text.map(|t| t.0).filter(|name| !name.is_empty()))
    }

    /// Returns the number of the current state.
    pub fn current_state_number(&self) -> NodeResult<Option<u32>> {
        Ok(self
            .current_state()?
            .and_then(|name| self.decl.state(&name).map(|s| s.number)))
    }

    /// Sets the current state.
    ///
    /// # Errors
    ///
    /// Returns `InvalidState` if `state` is not declared; the current state
    /// is unchanged.
    pub fn set_current_state(&self, state: &str) -> NodeResult<()> {
        if !self.decl.contains(state) {
            let error = NodeError::invalid_state(self.node.path(), state);
            error.log("set_current_state");
            return Err(error);
        }
        let variable = self.current_state_variable()?;
        let previous = variable.value_opt()?;
        variable.set(LocalizedText::new(state))?;
        tracing::debug!(
            machine = %self.node.node_id(),
            from = previous.as_ref().map(|t| t.0.as_str()).unwrap_or(""),
            to = state,
            "State changed"
        );
        Ok(())
    }

    /// Sets the current state by number.
    pub fn set_current_state_number(&self, number: u32) -> NodeResult<()> {
        let name = self
            .decl
            .state_by_number(number)
            .map(|s| s.name.clone())
            .ok_or_else(|| NodeError::invalid_state(self.node.path(), number.to_string()))?;
        self.set_current_state(&name)
    }

    /// Returns `true` if the current state is `state`.
    pub fn is_in(&self, state: &str) -> NodeResult<bool> {
        Ok(self.current_state()?.as_deref() == Some(state))
    }

    /// Returns a sub-machine by slot name, materializing it if needed.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the name is not a sub-machine of any state.
    pub fn sub_machine(&self, name: &str) -> NodeResult<StateMachine> {
        let declared = self
            .decl
            .states()
            .iter()
            .any(|s| s.sub_machines.iter().any(|sub| sub == name));
        if !declared {
            return Err(NodeError::not_found(self.node.path(), name));
        }
        let node = self
            .node
            .find_child(name, true, None)?
            .ok_or_else(|| NodeError::not_found(self.node.path(), name))?;
        StateMachine::new(node)
    }

    /// Returns the sub-machines active in the current state.
    pub fn active_sub_machines(&self) -> NodeResult<Vec<StateMachine>> {
        let Some(current) = self.current_state()? else {
            return Ok(Vec::new());
        };
        let Some(state) = self.decl.state(&current) else {
            return Ok(Vec::new());
        };
        state
            .sub_machines
            .iter()
            .map(|name| self.sub_machine(name))
            .collect()
    }

    /// Resets the machine to its initial state, or clears it when the type
    /// declares none.
    pub fn reset(&self) -> NodeResult<()> {
        match self.decl.initial() {
            Some(initial) => {
                let initial = initial.to_string();
                self.set_current_state(&initial)
            }
            None => self.node.child(CURRENT_STATE)?.set_value(Variant::Empty),
        }
    }
}

impl fmt::Debug for StateMachine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateMachine")
            .field("node", self.node.node_id())
            .field("states", &self.decl.to_string())
            .finish()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address_space::{AddressSpace, AddressSpaceOptions};
    use crate::registry::{TypeRegistry, FINITE_STATE_MACHINE_TYPE};
    use crate::schema::{ModelSchema, ObjectTypeSchema, SlotSchema, StateMachineSchema, StateSchema};

    fn space() -> AddressSpace {
        let schema = ModelSchema::new("urn:test:sm")
            .with_type(
                ObjectTypeSchema::new("ExecuteStateMachineType")
                    .with_base(FINITE_STATE_MACHINE_TYPE)
                    .with_state_machine(
                        StateMachineSchema::from_names(["WaitForTrigger", "Acquire", "Cleanup"])
                            .with_initial("WaitForTrigger"),
                    ),
            )
            .with_type(
                ObjectTypeSchema::new("ChannelStateMachineType")
                    .with_base(FINITE_STATE_MACHINE_TYPE)
                    .with_slot(
                        SlotSchema::object("ExecuteSubStateMachine", "ExecuteStateMachineType").optional(),
                    )
                    .with_state_machine(
                        StateMachineSchema::default()
                            .with_state(StateSchema::new("Idle"))
                            .with_state(StateSchema::new("Starting"))
                            .with_state(
                                StateSchema::new("Operating")
                                    .with_number(10)
                                    .with_sub_machine("ExecuteSubStateMachine"),
                            ),
                    ),
            );
        let registry = TypeRegistry::from_schema(&schema).unwrap();
        AddressSpace::new(Arc::new(registry), AddressSpaceOptions::default()).unwrap()
    }

    #[test]
    fn test_valid_and_invalid_states() {
        let space = space();
        let node = space.instantiate("ChannelStateMachineType", "StateMachine", None).unwrap();
        let machine = StateMachine::new(node).unwrap();
        assert_eq!(machine.current_state().unwrap(), None);
        assert_eq!(machine.initial_state(), None);

        machine.set_current_state("Operating").unwrap();
        assert_eq!(machine.current_state().unwrap().as_deref(), Some("Operating"));
        assert_eq!(machine.current_state_number().unwrap(), Some(10));

        let err = machine.set_current_state("Bogus").unwrap_err();
        assert!(matches!(err, NodeError::InvalidState { .. }));
        assert_eq!(machine.current_state().unwrap().as_deref(), Some("Operating"));

        assert!(machine.set_current_state_number(99).is_err());
        machine.set_current_state_number(2).unwrap();
        assert!(machine.is_in("Starting").unwrap());
    }

    #[test]
    fn test_initial_state_and_reset() {
        let space = space();
        let node = space.instantiate("ExecuteStateMachineType", "Execute", None).unwrap();
        let machine = StateMachine::new(node.clone()).unwrap();
        assert_eq!(machine.current_state().unwrap().as_deref(), Some("WaitForTrigger"));

        let current = node.child(CURRENT_STATE).unwrap();
        assert!(current.change_mask().is_empty());

        machine.set_current_state("Acquire").unwrap();
        machine.reset().unwrap();
        assert!(machine.is_in("WaitForTrigger").unwrap());
    }

    #[test]
    fn test_sub_machines() {
        let space = space();
        let node = space.instantiate("ChannelStateMachineType", "StateMachine", None).unwrap();
        let machine = StateMachine::new(node.clone()).unwrap();
        assert!(machine.active_sub_machines().unwrap().is_empty());
        assert!(node.find_child("ExecuteSubStateMachine", false, None).unwrap().is_none());

        machine.set_current_state("Operating").unwrap();
        let active = machine.active_sub_machines().unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].current_state().unwrap().as_deref(), Some("WaitForTrigger"));

        let again = machine.sub_machine("ExecuteSubStateMachine").unwrap();
        assert!(again.node().is_same(active[0].node()));
        assert!(matches!(
            machine.sub_machine("CurrentState"),
            Err(NodeError::NotFound { .. })
        ));
    }

    #[test]
    fn test_non_machine_rejected() {
        let space = space();
        let folder = space.objects_folder().clone();
        assert!(matches!(
            StateMachine::new(folder),
            Err(NodeError::TypeMismatch { .. })
        ));
    }
}
