// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Declarative node-type schema.
//!
//! A [`ModelSchema`] lists object types, each with an optional base type,
//! its named slots and, for state machines, the declared state set. Schemas
//! deserialize from any serde format and are resolved once into a
//! [`TypeRegistry`](crate::registry::TypeRegistry).
//!
//! ```yaml
//! namespace_uri: "http://opcfoundation.org/UA/ADI/"
//! object_types:
//!   - name: AnalyserChannelType
//!     base: TopologyElementType
//!     slots:
//!       - { name: ChannelId, class: property, data_type: String, modelling_rule: optional }
//!       - { name: Configuration, class: object, type: FunctionalGroupType }
//!       - name: GotoOperating
//!         class: method
//! ```

use serde::{Deserialize, Serialize};

use crate::types::{DataType, ValueRank};

// =============================================================================
// ModelSchema
// =============================================================================

/// A complete model: namespace plus object types.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ModelSchema {
    /// Namespace URI the model's types and instances belong to.
    pub namespace_uri: String,

    /// Object types, in any order.
    #[serde(default)]
    pub object_types: Vec<ObjectTypeSchema>,
}

impl ModelSchema {
    /// Creates an empty schema.
    pub fn new(namespace_uri: impl Into<String>) -> Self {
        Self {
            namespace_uri: namespace_uri.into(),
            object_types: Vec::new(),
        }
    }

    /// Adds an object type.
    pub fn with_type(mut self, object_type: ObjectTypeSchema) -> Self {
        self.object_types.push(object_type);
        self
    }

    /// Appends the types of another schema. The namespace is kept.
    pub fn extend(&mut self, other: ModelSchema) {
        self.object_types.extend(other.object_types);
    }

    /// Returns a type declaration by name.
    pub fn object_type(&self, name: &str) -> Option<&ObjectTypeSchema> {
        self.object_types.iter().find(|t| t.name == name)
    }
}

// =============================================================================
// ObjectTypeSchema
// =============================================================================

/// Declaration of one object type.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ObjectTypeSchema {
    /// Type name.
    pub name: String,

    /// Numeric type-definition id in the model namespace. The name is used
    /// as a string id when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u32>,

    /// Base type name. Defaults to `BaseObjectType`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base: Option<String>,

    /// Whether the type can be instantiated.
    #[serde(default, rename = "abstract")]
    pub is_abstract: bool,

    /// Description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Named slots declared by this type, in browse order.
    #[serde(default)]
    pub slots: Vec<SlotSchema>,

    /// State set, for state-machine types.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_machine: Option<StateMachineSchema>,
}

impl ObjectTypeSchema {
    /// Creates a concrete type deriving from `BaseObjectType`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Sets the base type.
    pub fn with_base(mut self, base: impl Into<String>) -> Self {
        self.base = Some(base.into());
        self
    }

    /// Sets the numeric type id.
    pub fn with_id(mut self, id: u32) -> Self {
        self.id = Some(id);
        self
    }

    /// Marks the type abstract.
    pub fn abstract_type(mut self) -> Self {
        self.is_abstract = true;
        self
    }

    /// Adds a slot.
    pub fn with_slot(mut self, slot: SlotSchema) -> Self {
        self.slots.push(slot);
        self
    }

    /// Sets the state set.
    pub fn with_state_machine(mut self, state_machine: StateMachineSchema) -> Self {
        self.state_machine = Some(state_machine);
        self
    }
}

// =============================================================================
// SlotSchema
// =============================================================================

/// Node class of a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotClass {
    /// Object of a named object type.
    Object,
    /// Data variable.
    Variable,
    /// Property variable.
    Property,
    /// Method.
    Method,
}

/// Whether a slot is created with its owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModellingRule {
    /// Materialized when the owning object is instantiated.
    #[default]
    Mandatory,
    /// Materialized on first `find_child(name, true)`.
    Optional,
}

/// Declaration of one named slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotSchema {
    /// Slot browse name.
    pub name: String,

    /// Slot node class.
    pub class: SlotClass,

    /// Object type name, for object slots.
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,

    /// Data type, for variable and property slots.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_type: Option<DataType>,

    /// Value rank, for variable and property slots. Defaults to scalar.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_rank: Option<ValueRank>,

    /// Input arguments, for method slots.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub inputs: Vec<ArgumentSchema>,

    /// Output arguments, for method slots.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub outputs: Vec<ArgumentSchema>,

    /// Modelling rule.
    #[serde(default)]
    pub modelling_rule: ModellingRule,

    /// Description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl SlotSchema {
    fn with_class(name: impl Into<String>, class: SlotClass) -> Self {
        Self {
            name: name.into(),
            class,
            type_name: None,
            data_type: None,
            value_rank: None,
            inputs: Vec::new(),
            outputs: Vec::new(),
            modelling_rule: ModellingRule::Mandatory,
            description: None,
        }
    }

    /// Creates an object slot.
    pub fn object(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        let mut slot = Self::with_class(name, SlotClass::Object);
        slot.type_name = Some(type_name.into());
        slot
    }

    /// Creates a data-variable slot.
    pub fn variable(name: impl Into<String>, data_type: DataType) -> Self {
        let mut slot = Self::with_class(name, SlotClass::Variable);
        slot.data_type = Some(data_type);
        slot
    }

    /// Creates a property slot.
    pub fn property(name: impl Into<String>, data_type: DataType) -> Self {
        let mut slot = Self::with_class(name, SlotClass::Property);
        slot.data_type = Some(data_type);
        slot
    }

    /// Creates a method slot with no arguments.
    pub fn method(name: impl Into<String>) -> Self {
        Self::with_class(name, SlotClass::Method)
    }

    /// Sets the value rank.
    pub fn with_rank(mut self, value_rank: ValueRank) -> Self {
        self.value_rank = Some(value_rank);
        self
    }

    /// Adds an input argument.
    pub fn with_input(mut self, argument: ArgumentSchema) -> Self {
        self.inputs.push(argument);
        self
    }

    /// Adds an output argument.
    pub fn with_output(mut self, argument: ArgumentSchema) -> Self {
        self.outputs.push(argument);
        self
    }

    /// Marks the slot optional.
    pub fn optional(mut self) -> Self {
        self.modelling_rule = ModellingRule::Optional;
        self
    }
}

/// Declaration of one method argument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArgumentSchema {
    /// Argument name.
    pub name: String,

    /// Argument data type.
    pub data_type: DataType,

    /// Argument value rank. Defaults to scalar.
    #[serde(default)]
    pub value_rank: ValueRank,

    /// Description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ArgumentSchema {
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
}

// =============================================================================
// StateMachineSchema
// =============================================================================

/// The finite state set of a state-machine type.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StateMachineSchema {
    /// Declared states.
    pub states: Vec<StateSchema>,

    /// State assigned on instantiation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial: Option<String>,
}

impl StateMachineSchema {
    /// Creates a state set from names, numbered from 1 in order.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            states: names.into_iter().map(StateSchema::new).collect(),
            initial: None,
        }
    }

    /// Sets the initial state.
    pub fn with_initial(mut self, initial: impl Into<String>) -> Self {
        self.initial = Some(initial.into());
        self
    }

    /// Adds a state.
    pub fn with_state(mut self, state: StateSchema) -> Self {
        self.states.push(state);
        self
    }
}

/// One declared state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateSchema {
    /// State name.
    pub name: String,

    /// State number. Defaults to the 1-based declaration position.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<u32>,

    /// Sub-machine slots active while this state is current.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sub_machines: Vec<String>,
}

impl StateSchema {
    /// Creates a state with a positional number.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            number: None,
            sub_machines: Vec::new(),
        }
    }

    /// Sets the state number.
    pub fn with_number(mut self, number: u32) -> Self {
        self.number = Some(number);
        self
    }

    /// Adds an active sub-machine slot.
    pub fn with_sub_machine(mut self, slot: impl Into<String>) -> Self {
        self.sub_machines.push(slot.into());
        self
    }
}

// =============================================================================
// Tests
// =============================================================================
