// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Resolved object types.
//!
//! [`TypeRegistry::from_schema`] validates a [`ModelSchema`] and resolves
//! every type exactly once. Each [`ObjectType`] carries a flattened slot
//! table: the type's own declarations first, then each base type's, with
//! redeclared names taking the derived position. Slot lookup by name is a
//! single map access, and falling through from derived to base is implicit
//! in the flattened order.
//!
//! # Built-in types
//!
//! | Name | Id | Slots |
//! |------|----|-------|
//! | `BaseObjectType` | i=58 | |
//! | `FolderType` | i=61 | |
//! | `FiniteStateMachineType` | i=2771 | `CurrentState: LocalizedText` |

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::error::{NodeError, NodeResult};
use crate::method::{Argument, MethodDecl};
use crate::schema::{ModelSchema, ModellingRule, ObjectTypeSchema, SlotClass, SlotSchema};
use crate::state_machine::{StateDecl, StateMachineDecl};
use crate::types::{DataType, NodeId, NodeIdentifier, ValueRank};
use crate::variable::VariableDecl;

/// Name of the root object type.
pub const BASE_OBJECT_TYPE: &str = "BaseObjectType";
/// Name of the folder type.
pub const FOLDER_TYPE: &str = "FolderType";
/// Name of the state-machine root type.
pub const FINITE_STATE_MACHINE_TYPE: &str = "FiniteStateMachineType";
/// Browse name of the current-state variable of every state machine.
pub const CURRENT_STATE: &str = "CurrentState";

// =============================================================================
// SlotDecl
// =============================================================================

/// What a slot holds.
#[derive(Debug, Clone)]
pub enum SlotKind {
    /// An object of the given type (or a subtype).
    Object(Arc<ObjectType>),
    /// A variable or property.
    Variable(VariableDecl),
    /// A method with the given signature.
    Method(Arc<MethodDecl>),
}

impl SlotKind {
    /// Returns a short description for messages and listings.
    pub fn describe(&self) -> String {
        match self {
            SlotKind::Object(object_type) => object_type.name().to_string(),
            SlotKind::Variable(decl) => {
                let class = if decl.is_property { "Property" } else { "Variable" };
                if decl.value_rank.is_scalar() {
                    format!("{}<{}>", class, decl.data_type)
                } else {
                    format!("{}<{}; {}>", class, decl.data_type, decl.value_rank)
                }
            }
            SlotKind::Method(decl) => format!("Method{}", decl),
        }
    }
}

/// A resolved named slot.
#[derive(Debug, Clone)]
pub struct SlotDecl {
    name: String,
    kind: SlotKind,
    modelling_rule: ModellingRule,
    description: Option<String>,
    declared_by: String,
}

impl SlotDecl {
    /// Returns the slot browse name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns what the slot holds.
    pub fn kind(&self) -> &SlotKind {
        &self.kind
    }

    /// Returns the modelling rule.
    pub fn modelling_rule(&self) -> ModellingRule {
        self.modelling_rule
    }

    /// Returns `true` for mandatory slots.
    pub fn is_mandatory(&self) -> bool {
        self.modelling_rule == ModellingRule::Mandatory
    }

    /// Returns the description.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the name of the type that declared this slot.
    pub fn declared_by(&self) -> &str {
        &self.declared_by
    }

    /// Returns the object type for object slots.
    pub fn object_type(&self) -> Option<&Arc<ObjectType>> {
        match &self.kind {
            SlotKind::Object(object_type) => Some(object_type),
            _ => None,
        }
    }
}

// =============================================================================
// ObjectType
// =============================================================================

/// A resolved object type.
pub struct ObjectType {
    name: String,
    id: NodeIdentifier,
    builtin: bool,
    base: Option<Arc<ObjectType>>,
    is_abstract: bool,
    description: Option<String>,
    slots: IndexMap<String, SlotDecl>,
    state_machine: Option<Arc<StateMachineDecl>>,
}

impl ObjectType {
    /// Returns the type name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the type identifier within its namespace.
    pub fn id(&self) -> &NodeIdentifier {
        &self.id
    }

    /// Returns `true` for the built-in namespace-0 types.
    pub fn is_builtin(&self) -> bool {
        self.builtin
    }

    /// Returns the type-definition node id, placing model types in
    /// `model_namespace`.
    pub fn type_definition_id(&self, model_namespace: u16) -> NodeId {
        let namespace_index = if self.builtin { 0 } else { model_namespace };
        NodeId {
            namespace_index,
            identifier: self.id.clone(),
        }
    }

    /// Returns the base type.
    pub fn base(&self) -> Option<&Arc<ObjectType>> {
        self.base.as_ref()
    }

    /// Returns `true` if the type cannot be instantiated.
    pub fn is_abstract(&self) -> bool {
        self.is_abstract
    }

    /// Returns the description.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns all slots, derived declarations first.
    pub fn slots(&self) -> impl Iterator<Item = &SlotDecl> {
        self.slots.values()
    }

    /// Returns the slot with the given browse name.
    pub fn slot(&self, name: &str) -> Option<&SlotDecl> {
        self.slots.get(name)
    }

    /// Returns the number of slots, inherited ones included.
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Returns the state set, declared or inherited.
    pub fn state_machine(&self) -> Option<&Arc<StateMachineDecl>> {
        self.state_machine.as_ref()
    }

    /// Returns `true` if this type is `name` or derives from it.
    pub fn is_subtype_of(&self, name: &str) -> bool {
        self.ancestry().any(|t| t.name == name)
    }

    /// Iterates this type and its base types, most derived first.
    pub fn ancestry(&self) -> impl Iterator<Item = &ObjectType> {
        std::iter::successors(Some(self), |t| t.base.as_deref())
    }

    fn builtin(name: &str, id: u32, base: Option<Arc<ObjectType>>, is_abstract: bool) -> Self {
        let mut slots = IndexMap::new();
        if let Some(base) = &base {
            slots.extend(base.slots.iter().map(|(k, v)| (k.clone(), v.clone())));
        }
        Self {
            name: name.to_string(),
            id: NodeIdentifier::Numeric(id),
            builtin: true,
            base,
            is_abstract,
            description: None,
            slots,
            state_machine: None,
        }
    }
}

impl fmt::Debug for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectType")
            .field("name", &self.name)
            .field("id", &self.id)
            .field("base", &self.base.as_ref().map(|b| b.name.as_str()))
            .field("is_abstract", &self.is_abstract)
            .field("slots", &self.slots.keys().collect::<Vec<_>>())
            .field("state_machine", &self.state_machine.is_some())
            .finish()
    }
}

// =============================================================================
// TypeRegistry
// =============================================================================

/// Immutable set of resolved object types.
#[derive(Debug, Clone)]
pub struct TypeRegistry {
    namespace_uri: String,
    types: IndexMap<String, Arc<ObjectType>>,
}

impl TypeRegistry {
    /// Creates a registry holding only the built-in types.
    pub fn builtin() -> Self {
        let base = Arc::new(ObjectType::builtin(BASE_OBJECT_TYPE, 58, None, false));
        let folder = Arc::new(ObjectType::builtin(FOLDER_TYPE, 61, Some(base.clone()), false));

        let mut fsm = ObjectType::builtin(FINITE_STATE_MACHINE_TYPE, 2771, Some(base.clone()), true);
        fsm.slots.insert(
            CURRENT_STATE.to_string(),
            SlotDecl {
                name: CURRENT_STATE.to_string(),
                kind: SlotKind::Variable(VariableDecl::variable(DataType::LocalizedText)),
                modelling_rule: ModellingRule::Mandatory,
                description: Some("Current state of the state machine".to_string()),
                declared_by: FINITE_STATE_MACHINE_TYPE.to_string(),
            },
        );

        let mut types = IndexMap::new();
        for object_type in [base, folder, Arc::new(fsm)] {
            types.insert(object_type.name.clone(), object_type);
        }
        Self {
            namespace_uri: String::new(),
            types,
        }
    }

    /// Validates and resolves a schema.
    ///
    /// # Errors
    ///
    /// - `InvalidSchema` for duplicate names, dependency cycles, incomplete
    ///   slot declarations, incompatible slot overrides and invalid state sets
    /// - `UnknownType` for base or slot types that are not declared
    pub fn from_schema(schema: &ModelSchema) -> NodeResult<Self> {
        let mut registry = Self::builtin();
        registry.namespace_uri = schema.namespace_uri.clone();

        let mut declared: IndexMap<&str, &ObjectTypeSchema> = IndexMap::new();
        for object_type in &schema.object_types {
            validate_name(&object_type.name, &object_type.name)?;
            if registry.types.contains_key(&object_type.name)
                || declared.insert(object_type.name.as_str(), object_type).is_some()
            {
                return Err(NodeError::invalid_schema(
                    &object_type.name,
                    "duplicate type name",
                ));
            }
        }

        let mut resolver = Resolver {
            declared: &declared,
            resolved: registry.types.clone(),
            visiting: HashSet::new(),
        };
        for name in declared.keys() {
            resolver.resolve(name)?;
        }

        for name in declared.keys() {
            if let Some(object_type) = resolver.resolved.get(*name) {
                registry.types.insert(name.to_string(), object_type.clone());
            }
        }

        tracing::debug!(
            namespace_uri = %registry.namespace_uri,
            types = registry.types.len(),
            "Type registry resolved"
        );
        Ok(registry)
    }

    /// Returns the model namespace URI.
    pub fn namespace_uri(&self) -> &str {
        &self.namespace_uri
    }

    /// Returns a type by name.
    pub fn get(&self, name: &str) -> Option<Arc<ObjectType>> {
        self.types.get(name).cloned()
    }

    /// Returns a type by name or `UnknownType`.
    pub fn require(&self, name: &str) -> NodeResult<Arc<ObjectType>> {
        self.get(name).ok_or_else(|| NodeError::unknown_type(name))
    }

    /// Returns `true` if the type is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    /// Returns `true` if `derived` is `base` or one of its subtypes.
    pub fn is_subtype(&self, derived: &str, base: &str) -> bool {
        self.types
            .get(derived)
            .map(|t| t.is_subtype_of(base))
            .unwrap_or(false)
    }

    /// Iterates all types, built-ins first, then in declaration order.
    pub fn types(&self) -> impl Iterator<Item = &Arc<ObjectType>> {
        self.types.values()
    }

    /// Returns all types deriving from `base`, `base` itself excluded.
    pub fn subtypes_of(&self, base: &str) -> Vec<Arc<ObjectType>> {
        self.types
            .values()
            .filter(|t| t.name != base && t.is_subtype_of(base))
            .cloned()
            .collect()
    }

    /// Returns the number of types.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Returns `true` if no types are registered.
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

// =============================================================================
// Resolver
// =============================================================================

struct Resolver<'a> {
    declared: &'a IndexMap<&'a str, &'a ObjectTypeSchema>,
    resolved: IndexMap<String, Arc<ObjectType>>,
    visiting: HashSet<String>,
}

impl Resolver<'_> {
    fn resolve(&mut self, name: &str) -> NodeResult<Arc<ObjectType>> {
        if let Some(object_type) = self.resolved.get(name) {
            return Ok(object_type.clone());
        }
        let declared = self.declared;
        let schema = *declared
            .get(name)
            .ok_or_else(|| NodeError::unknown_type(name))?;
        if !self.visiting.insert(name.to_string()) {
            return Err(NodeError::invalid_schema(name, "cyclic type dependency"));
        }

        let base_name = schema.base.as_deref().unwrap_or(BASE_OBJECT_TYPE);
        let base = self.resolve(base_name)?;

        let mut own: IndexMap<String, SlotDecl> = IndexMap::new();
        for slot in &schema.slots {
            let decl = self.resolve_slot(schema, slot)?;
            if own.insert(slot.name.clone(), decl).is_some() {
                return Err(NodeError::invalid_schema(
                    &schema.name,
                    format!("duplicate slot '{}'", slot.name),
                ));
            }
        }

        let mut slots = IndexMap::with_capacity(own.len() + base.slots.len());
        for (slot_name, decl) in own {
            if let Some(inherited) = base.slots.get(&slot_name) {
                check_override(&schema.name, inherited, &decl)?;
            }
            slots.insert(slot_name, decl);
        }
        for (slot_name, decl) in &base.slots {
            if !slots.contains_key(slot_name) {
                slots.insert(slot_name.clone(), decl.clone());
            }
        }

        let state_machine = match &schema.state_machine {
            Some(sm) => Some(Arc::new(build_state_machine(schema, sm, &slots)?)),
            None => base.state_machine.clone(),
        };

        let object_type = Arc::new(ObjectType {
            name: schema.name.clone(),
            id: schema
                .id
                .map(NodeIdentifier::Numeric)
                .unwrap_or_else(|| NodeIdentifier::String(schema.name.clone())),
            builtin: false,
            base: Some(base),
            is_abstract: schema.is_abstract,
            description: schema.description.clone(),
            slots,
            state_machine,
        });

        tracing::trace!(
            type_name = %object_type.name,
            slots = object_type.slots.len(),
            "Object type resolved"
        );
        self.visiting.remove(name);
        self.resolved.insert(name.to_string(), object_type.clone());
        Ok(object_type)
    }

    fn resolve_slot(&mut self, owner: &ObjectTypeSchema, slot: &SlotSchema) -> NodeResult<SlotDecl> {
        validate_name(&owner.name, &slot.name)?;

        let kind = match slot.class {
            SlotClass::Object => {
                let type_name = slot.type_name.as_deref().ok_or_else(|| {
                    NodeError::invalid_schema(
                        &owner.name,
                        format!("object slot '{}' has no type", slot.name),
                    )
                })?;
                let object_type = self.resolve(type_name)?;
                if object_type.is_abstract && slot.modelling_rule == ModellingRule::Mandatory {
                    return Err(NodeError::invalid_schema(
                        &owner.name,
                        format!(
                            "mandatory slot '{}' has abstract type '{}'",
                            slot.name, type_name
                        ),
                    ));
                }
                SlotKind::Object(object_type)
            }
            SlotClass::Variable | SlotClass::Property => {
                let data_type = slot.data_type.ok_or_else(|| {
                    NodeError::invalid_schema(
                        &owner.name,
                        format!("variable slot '{}' has no data type", slot.name),
                    )
                })?;
                let value_rank = slot.value_rank.unwrap_or(ValueRank::SCALAR);
                check_value_rank(&owner.name, &slot.name, value_rank)?;
                SlotKind::Variable(VariableDecl {
                    data_type,
                    value_rank,
                    is_property: slot.class == SlotClass::Property,
                })
            }
            SlotClass::Method => {
                let decl = MethodDecl {
                    inputs: slot.inputs.iter().map(Argument::from).collect(),
                    outputs: slot.outputs.iter().map(Argument::from).collect(),
                };
                let mut names = HashSet::new();
                for argument in decl.inputs.iter().chain(&decl.outputs) {
                    let qualified = format!("{}.{}", slot.name, argument.name);
                    check_value_rank(&owner.name, &qualified, argument.value_rank)?;
                    if !names.insert(argument.name.as_str()) {
                        return Err(NodeError::invalid_schema(
                            &owner.name,
                            format!(
                                "method '{}' declares argument '{}' twice",
                                slot.name, argument.name
                            ),
                        ));
                    }
                }
                SlotKind::Method(Arc::new(decl))
            }
        };

        Ok(SlotDecl {
            name: slot.name.clone(),
            kind,
            modelling_rule: slot.modelling_rule,
            description: slot.description.clone(),
            declared_by: owner.name.clone(),
        })
    }
}

fn validate_name(type_name: &str, name: &str) -> NodeResult<()> {
    if name.trim().is_empty() {
        return Err(NodeError::invalid_schema(type_name, "empty name"));
    }
    if name.contains('/') {
        return Err(NodeError::invalid_schema(
            type_name,
            format!("name '{}' contains '/'", name),
        ));
    }
    Ok(())
}

fn check_value_rank(type_name: &str, name: &str, value_rank: ValueRank) -> NodeResult<()> {
    if value_rank.is_valid() {
        return Ok(());
    }
    Err(NodeError::invalid_schema(
        type_name,
        format!(
            "'{}' has value rank {}, expected -3..={}",
            name,
            value_rank.0,
            ValueRank::MAX_DIMENSIONS
        ),
    ))
}

fn check_override(type_name: &str, inherited: &SlotDecl, decl: &SlotDecl) -> NodeResult<()> {
    let compatible = match (&inherited.kind, &decl.kind) {
        (SlotKind::Object(base), SlotKind::Object(derived)) => derived.is_subtype_of(base.name()),
        (SlotKind::Variable(base), SlotKind::Variable(derived)) => base.accepts_decl(derived),
        (SlotKind::Method(_), SlotKind::Method(_)) => true,
        _ => false,
    };
    if compatible {
        Ok(())
    } else {
        Err(NodeError::invalid_schema(
            type_name,
            format!(
                "slot '{}' overrides {} from '{}' with incompatible {}",
                decl.name,
                inherited.kind.describe(),
                inherited.declared_by,
                decl.kind.describe()
            ),
        ))
    }
}

fn build_state_machine(
    schema: &ObjectTypeSchema,
    sm: &crate::schema::StateMachineSchema,
    slots: &IndexMap<String, SlotDecl>,
) -> NodeResult<StateMachineDecl> {
    let current_state_ok = matches!(
        slots.get(CURRENT_STATE).map(SlotDecl::kind),
        Some(SlotKind::Variable(decl)) if decl.data_type.accepts(DataType::LocalizedText)
    );
    if !current_state_ok {
        return Err(NodeError::invalid_schema(
            &schema.name,
            format!(
                "state machine has no '{}' slot; derive from {}",
                CURRENT_STATE, FINITE_STATE_MACHINE_TYPE
            ),
        ));
    }
    if sm.states.is_empty() {
        return Err(NodeError::invalid_schema(&schema.name, "state set is empty"));
    }

    let mut names = HashSet::new();
    let mut numbers = HashMap::new();
    let mut states = Vec::with_capacity(sm.states.len());
    for (position, state) in sm.states.iter().enumerate() {
        validate_name(&schema.name, &state.name)?;
        if !names.insert(state.name.as_str()) {
            return Err(NodeError::invalid_schema(
                &schema.name,
                format!("duplicate state '{}'", state.name),
            ));
        }
        let number = state.number.unwrap_or(position as u32 + 1);
        if let Some(other) = numbers.insert(number, state.name.as_str()) {
            return Err(NodeError::invalid_schema(
                &schema.name,
                format!("states '{}' and '{}' share number {}", other, state.name, number),
            ));
        }
        for sub in &state.sub_machines {
            let is_machine = slots
                .get(sub)
                .and_then(SlotDecl::object_type)
                .map(|t| t.state_machine.is_some())
                .unwrap_or(false);
            if !is_machine {
                return Err(NodeError::invalid_schema(
                    &schema.name,
                    format!(
                        "state '{}' names sub-machine '{}' which is not a state-machine slot",
                        state.name, sub
                    ),
                ));
            }
        }
        states.push(StateDecl {
            name: state.name.clone(),
            number,
            sub_machines: state.sub_machines.clone(),
        });
    }

    if let Some(initial) = &sm.initial {
        if !names.contains(initial.as_str()) {
            return Err(NodeError::invalid_schema(
                &schema.name,
                format!("initial state '{}' is not declared", initial),
            ));
        }
    }

    Ok(StateMachineDecl {
        states,
        initial: sm.initial.clone(),
    })
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ArgumentSchema, StateMachineSchema, StateSchema};

    fn device_schema() -> ModelSchema {
        ModelSchema::new("urn:test")
            .with_type(
                ObjectTypeSchema::new("TopologyElementType")
                    .abstract_type()
                    .with_slot(SlotSchema::object("ParameterSet", "BaseObjectType").optional()),
            )
            .with_type(
                ObjectTypeSchema::new("DeviceType")
                    .with_id(1002)
                    .with_base("TopologyElementType")
                    .with_slot(SlotSchema::property("SerialNumber", DataType::String))
                    .with_slot(SlotSchema::property("Manufacturer", DataType::LocalizedText)),
            )
            .with_type(
                ObjectTypeSchema::new("SpectrometerType")
                    .with_base("DeviceType")
                    .with_slot(SlotSchema::variable("Spectrum", DataType::Double).with_rank(ValueRank::ONE_DIMENSION))
                    .with_slot(
                        SlotSchema::method("Start")
                            .with_input(ArgumentSchema::new("Cycle", DataType::UInt32)),
                    ),
            )
    }

    #[test]
    fn test_builtins() {
        let registry = TypeRegistry::builtin();
        assert_eq!(registry.len(), 3);
        let fsm = registry.require(FINITE_STATE_MACHINE_TYPE).unwrap();
        assert!(fsm.is_abstract());
        assert!(fsm.slot(CURRENT_STATE).is_some());
        assert_eq!(fsm.type_definition_id(2), NodeId::FINITE_STATE_MACHINE_TYPE);
        assert!(registry.is_subtype(FOLDER_TYPE, BASE_OBJECT_TYPE));
    }

    #[test]
    fn test_flattened_slot_order() {
        let registry = TypeRegistry::from_schema(&device_schema()).unwrap();
        let spectrometer = registry.require("SpectrometerType").unwrap();
        let names: Vec<_> = spectrometer.slots().map(SlotDecl::name).collect();
        assert_eq!(
            names,
            vec!["Spectrum", "Start", "SerialNumber", "Manufacturer", "ParameterSet"]
        );
        assert_eq!(spectrometer.slot("SerialNumber").unwrap().declared_by(), "DeviceType");
        assert!(spectrometer.is_subtype_of("TopologyElementType"));
        assert!(!spectrometer.is_subtype_of("FolderType"));
    }

    #[test]
    fn test_type_ids() {
        let registry = TypeRegistry::from_schema(&device_schema()).unwrap();
        assert_eq!(
            registry.require("DeviceType").unwrap().type_definition_id(3),
            NodeId::numeric(3, 1002)
        );
        assert_eq!(
            registry.require("SpectrometerType").unwrap().type_definition_id(3),
            NodeId::string(3, "SpectrometerType")
        );
        assert_eq!(registry.subtypes_of("DeviceType").len(), 1);
    }

    #[test]
    fn test_unknown_and_duplicate_types() {
        let unknown = ModelSchema::new("urn:test")
            .with_type(ObjectTypeSchema::new("A").with_base("Missing"));
        assert!(matches!(
            TypeRegistry::from_schema(&unknown),
            Err(NodeError::UnknownType { .. })
        ));

        let duplicate = ModelSchema::new("urn:test")
            .with_type(ObjectTypeSchema::new("A"))
            .with_type(ObjectTypeSchema::new("A"));
        assert!(matches!(
            TypeRegistry::from_schema(&duplicate),
            Err(NodeError::InvalidSchema { .. })
        ));

        let shadows_builtin = ModelSchema::new("urn:test").with_type(ObjectTypeSchema::new("FolderType"));
        assert!(TypeRegistry::from_schema(&shadows_builtin).is_err());
    }

    #[test]
    fn test_cycles_rejected() {
        let base_cycle = ModelSchema::new("urn:test")
            .with_type(ObjectTypeSchema::new("A").with_base("B"))
            .with_type(ObjectTypeSchema::new("B").with_base("A"));
        let err = TypeRegistry::from_schema(&base_cycle).unwrap_err();
        assert!(err.to_string().contains("cyclic"));

        let self_slot = ModelSchema::new("urn:test").with_type(
            ObjectTypeSchema::new("Node").with_slot(SlotSchema::object("Next", "Node").optional()),
        );
        assert!(TypeRegistry::from_schema(&self_slot).is_err());
    }

    #[test]
    fn test_invalid_slots() {
        let duplicate = ModelSchema::new("urn:test").with_type(
            ObjectTypeSchema::new("A")
                .with_slot(SlotSchema::property("X", DataType::Int32))
                .with_slot(SlotSchema::property("X", DataType::Int32)),
        );
        assert!(TypeRegistry::from_schema(&duplicate).is_err());

        let mut untyped = SlotSchema::object("Child", "BaseObjectType");
        untyped.type_name = None;
        let untyped = ModelSchema::new("urn:test").with_type(ObjectTypeSchema::new("A").with_slot(untyped));
        assert!(TypeRegistry::from_schema(&untyped).is_err());

        let slashed = ModelSchema::new("urn:test")
            .with_type(ObjectTypeSchema::new("A").with_slot(SlotSchema::property("a/b", DataType::Int32)));
        assert!(TypeRegistry::from_schema(&slashed).is_err());

        let abstract_mandatory = ModelSchema::new("urn:test")
            .with_type(ObjectTypeSchema::new("Abs").abstract_type())
            .with_type(ObjectTypeSchema::new("A").with_slot(SlotSchema::object("Child", "Abs")));
        assert!(TypeRegistry::from_schema(&abstract_mandatory).is_err());
    }

    #[test]
    fn test_value_rank_bounds() {
        let rank = |rank: i32| {
            ModelSchema::new("urn:test").with_type(
                ObjectTypeSchema::new("A")
                    .with_slot(SlotSchema::variable("Data", DataType::Double).with_rank(ValueRank(rank))),
            )
        };
        assert!(TypeRegistry::from_schema(&rank(-3)).is_ok());
        assert!(TypeRegistry::from_schema(&rank(3)).is_ok());
        assert!(matches!(
            TypeRegistry::from_schema(&rank(-4)),
            Err(NodeError::InvalidSchema { .. })
        ));
        assert!(matches!(
            TypeRegistry::from_schema(&rank(i32::MAX)),
            Err(NodeError::InvalidSchema { .. })
        ));

        let argument = ModelSchema::new("urn:test").with_type(
            ObjectTypeSchema::new("A").with_slot(
                SlotSchema::method("Load")
                    .with_input(ArgumentSchema::new("Data", DataType::Byte).with_rank(ValueRank(1_000_000))),
            ),
        );
        let err = TypeRegistry::from_schema(&argument).unwrap_err();
        assert!(err.to_string().contains("Load.Data"));
    }

    #[test]
    fn test_slot_override() {
        let narrowing = ModelSchema::new("urn:test")
            .with_type(ObjectTypeSchema::new("A").with_slot(SlotSchema::variable("Value", DataType::Number)))
            .with_type(
                ObjectTypeSchema::new("B")
                    .with_base("A")
                    .with_slot(SlotSchema::variable("Value", DataType::Double)),
            );
        let registry = TypeRegistry::from_schema(&narrowing).unwrap();
        let b = registry.require("B").unwrap();
        assert_eq!(b.slot_count(), 1);
        assert_eq!(b.slot("Value").unwrap().declared_by(), "B");

        let widening = ModelSchema::new("urn:test")
            .with_type(ObjectTypeSchema::new("A").with_slot(SlotSchema::variable("Value", DataType::Double)))
            .with_type(
                ObjectTypeSchema::new("B")
                    .with_base("A")
                    .with_slot(SlotSchema::variable("Value", DataType::String)),
            );
        assert!(TypeRegistry::from_schema(&widening).is_err());
    }

    #[test]
    fn test_state_machine_validation() {
        let valid = ModelSchema::new("urn:test").with_type(
            ObjectTypeSchema::new("ChannelStateMachine")
                .with_base(FINITE_STATE_MACHINE_TYPE)
                .with_state_machine(StateMachineSchema::from_names(["Idle", "Starting", "Operating"]).with_initial("Idle")),
        );
        let registry = TypeRegistry::from_schema(&valid).unwrap();
        let decl = registry.require("ChannelStateMachine").unwrap().state_machine().cloned().unwrap();
        assert_eq!(decl.state("Operating").map(|s| s.number), Some(3));

        let no_current_state = ModelSchema::new("urn:test").with_type(
            ObjectTypeSchema::new("Bad").with_state_machine(StateMachineSchema::from_names(["A"])),
        );
        assert!(TypeRegistry::from_schema(&no_current_state).is_err());

        let bad_initial = ModelSchema::new("urn:test").with_type(
            ObjectTypeSchema::new("Bad")
                .with_base(FINITE_STATE_MACHINE_TYPE)
                .with_state_machine(StateMachineSchema::from_names(["A"]).with_initial("B")),
        );
        assert!(TypeRegistry::from_schema(&bad_initial).is_err());

        let duplicate_number = ModelSchema::new("urn:test").with_type(
            ObjectTypeSchema::new("Bad").with_base(FINITE_STATE_MACHINE_TYPE).with_state_machine(
                StateMachineSchema::default()
                    .with_state(StateSchema::new("A").with_number(2))
                    .with_state(StateSchema::new("B")),
            ),
        );
        assert!(TypeRegistry::from_schema(&duplicate_number).is_err());

        let bad_sub = ModelSchema::new("urn:test").with_type(
            ObjectTypeSchema::new("Bad")
                .with_base(FINITE_STATE_MACHINE_TYPE)
                .with_slot(SlotSchema::object("Folder", FOLDER_TYPE))
                .with_state_machine(
                    StateMachineSchema::default().with_state(StateSchema::new("A").with_sub_machine("Folder")),
                ),
        );
        assert!(TypeRegistry::from_schema(&bad_sub).is_err());
    }

    #[test]
    fn test_state_machine_inherited() {
        let schema = ModelSchema::new("urn:test")
            .with_type(
                ObjectTypeSchema::new("Base")
                    .with_base(FINITE_STATE_MACHINE_TYPE)
                    .with_state_machine(StateMachineSchema::from_names(["On", "Off"])),
            )
            .with_type(ObjectTypeSchema::new("Derived").with_base("Base"));
        let registry = TypeRegistry::from_schema(&schema).unwrap();
        let derived = registry.require("Derived").unwrap();
        assert_eq!(derived.state_machine().map(|sm| sm.states().len()), Some(2));
    }
}
