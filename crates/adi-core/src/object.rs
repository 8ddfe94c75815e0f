// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Object nodes and composition.
//!
//! An object owns two child tables: declared slots, keyed by slot name and
//! typed by the object's [`ObjectType`], and generic children attached at
//! runtime. Mandatory slots are filled when the object is instantiated;
//! optional slots are materialized on first `find_child(name, true, ..)`.
//!
//! Children enumerate in a stable order: materialized slots in the type's
//! flattened declaration order (derived declarations before base ones),
//! then generic children in insertion order.

use std::collections::HashMap;
use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::RwLock;

use crate::change::ChangeMask;
use crate::context::ModelContext;
use crate::error::{NodeError, NodeResult};
use crate::method::MethodState;
use crate::node::{Node, NodeKind, NodeRef};
use crate::registry::{ObjectType, SlotDecl, SlotKind, CURRENT_STATE};
use crate::types::{NodeClass, NodeId, QualifiedName};
use crate::value::Variant;
use crate::variable::VariableState;

// =============================================================================
// ObjectState
// =============================================================================

pub(crate) struct ObjectState {
    pub(crate) object_type: Arc<ObjectType>,
    children: RwLock<ChildTable>,
}

#[derive(Default)]
struct ChildTable {
    slots: HashMap<String, NodeRef>,
    generic: IndexMap<String, NodeRef>,
}

impl ObjectState {
    fn new(object_type: Arc<ObjectType>) -> Self {
        Self {
            object_type,
            children: RwLock::new(ChildTable::default()),
        }
    }
}

// =============================================================================
// Construction
// =============================================================================

/// Instantiates an object with its mandatory slots. The new subtree starts
/// with clean change masks.
pub(crate) fn instantiate(
    context: &Arc<ModelContext>,
    parent_id: Option<&NodeId>,
    browse_name: QualifiedName,
    object_type: &Arc<ObjectType>,
) -> NodeResult<NodeRef> {
    if object_type.is_abstract() {
        return Err(NodeError::abstract_type(object_type.name()));
    }
    let node_id = context.allocate_id(parent_id, &browse_name);
    instantiate_with_id(context, node_id, browse_name, object_type)
}

/// Instantiates an object under a fixed node id.
pub(crate) fn instantiate_with_id(
    context: &Arc<ModelContext>,
    node_id: NodeId,
    browse_name: QualifiedName,
    object_type: &Arc<ObjectType>,
) -> NodeResult<NodeRef> {
    if object_type.is_abstract() {
        return Err(NodeError::abstract_type(object_type.name()));
    }
    let node = Node::create(
        context,
        node_id,
        browse_name,
        NodeKind::Object(ObjectState::new(object_type.clone())),
    )?;

    for slot in object_type.slots().filter(|slot| slot.is_mandatory()) {
        let child = node.produce_slot_node(object_type, slot, None)?;
        node.attach_slot(slot.name(), &child)?;
    }

    if let Some(initial) = object_type.state_machine().and_then(|sm| sm.initial()) {
        let current = node.child(CURRENT_STATE)?;
        current.init_value(Variant::LocalizedText(initial.to_string()))?;
    }

    node.reset_change_masks();
    tracing::debug!(
        node_id = %node.node_id(),
        type_name = object_type.name(),
        "Object instantiated"
    );
    Ok(node)
}

/// Creates the node a slot holds by default: an instance of the declared
/// object type, a variable holding the declared type's default value, or a
/// method without a handler.
///
/// Slot factories may call this and customize the result.
///
/// # Errors
///
/// Returns `AbstractType` for object slots of an abstract type.
pub fn default_slot_node(parent: &NodeRef, slot: &SlotDecl) -> NodeResult<NodeRef> {
    let context = parent.context();
    let browse_name = context.browse_name(slot.name());
    match slot.kind() {
        SlotKind::Object(object_type) => {
            instantiate(context, Some(parent.node_id()), browse_name, object_type)
        }
        SlotKind::Variable(decl) => {
            let node_id = context.allocate_id(Some(parent.node_id()), &browse_name);
            Node::create(context, node_id, browse_name, NodeKind::Variable(VariableState::new(*decl)))
        }
        SlotKind::Method(decl) => {
            let node_id = context.allocate_id(Some(parent.node_id()), &browse_name);
            Node::create(
                context,
                node_id,
                browse_name,
                NodeKind::Method(MethodState::new(decl.clone())),
            )
        }
    }
}

/// Strips a `ns:` prefix from a browse-name key.
fn local_name(name: &str) -> &str {
    match name.split_once(':') {
        Some((prefix, rest)) if prefix.parse::<u16>().is_ok() => rest,
        _ => name,
    }
}

fn describe_node(node: &Node) -> String {
    match node.kind() {
        NodeKind::Object(state) => state.object_type.name().to_string(),
        NodeKind::Variable(state) => SlotKind::Variable(state.decl).describe(),
        NodeKind::Method(state) => SlotKind::Method(state.decl.clone()).describe(),
    }
}

fn is_assignable(slot: &SlotDecl, node: &Node) -> bool {
    match (slot.kind(), node.kind()) {
        (SlotKind::Object(declared), NodeKind::Object(state)) => {
            state.object_type.is_subtype_of(declared.name())
        }
        (SlotKind::Variable(declared), NodeKind::Variable(state)) => declared.accepts_decl(&state.decl),
        (SlotKind::Method(declared), NodeKind::Method(state)) => **declared == *state.decl,
        _ => false,
    }
}

// =============================================================================
// Composite operations on Node
// =============================================================================

impl Node {
    pub(crate) fn as_object(&self) -> NodeResult<&ObjectState> {
        match self.kind() {
            NodeKind::Object(state) => Ok(state),
            _ => Err(NodeError::node_class_mismatch(
                self.path(),
                NodeClass::Object,
                self.node_class(),
            )),
        }
    }

    /// Returns the object type, `None` for other node classes.
    pub fn object_type(&self) -> Option<&Arc<ObjectType>> {
        match self.kind() {
            NodeKind::Object(state) => Some(&state.object_type),
            _ => None,
        }
    }

    /// Returns the materialized children: declared slots in declaration
    /// order, then generic children in insertion order.
    pub fn children(&self) -> Vec<NodeRef> {
        let NodeKind::Object(state) = self.kind() else {
            return Vec::new();
        };
        let children = state.children.read();
        let mut result = Vec::with_capacity(children.slots.len() + children.generic.len());
        if !children.slots.is_empty() {
            result.extend(
                state
                    .object_type
                    .slots()
                    .filter_map(|slot| children.slots.get(slot.name()).cloned()),
            );
        }
        result.extend(children.generic.values().cloned());
        result
    }

    /// Returns `true` if the named slot currently holds a node.
    pub fn is_materialized(&self, slot: &str) -> bool {
        match self.kind() {
            NodeKind::Object(state) => state.children.read().slots.contains_key(local_name(slot)),
            _ => false,
        }
    }

    /// Looks up a child by browse name.
    ///
    /// Declared slots are searched first. A missing slot is materialized
    /// when `create_if_missing` is set: from `replacement` if given, else
    /// from the registered slot factory, else by default construction.
    /// `replacement` is ignored when the slot is already filled. Other names
    /// go to the generic child table, where `replacement` is attached when
    /// `create_if_missing` is set.
    ///
    /// Returns `Ok(None)` when the child does not exist and was not created,
    /// and for nodes that are not objects.
    ///
    /// # Errors
    ///
    /// - `TypeMismatch` if the replacement or factory output is not
    ///   assignable to the slot
    /// - `AlreadyParented` if it is attached elsewhere
    /// - `AbstractType` if the slot's object type is abstract and no
    ///   replacement is given
    ///
    /// The tree is unchanged on error.
    pub fn find_child(
        self: &Arc<Self>,
        name: &str,
        create_if_missing: bool,
        replacement: Option<NodeRef>,
    ) -> NodeResult<Option<NodeRef>> {
        let NodeKind::Object(state) = self.kind() else {
            return Ok(None);
        };
        let name = local_name(name);

        let Some(slot) = state.object_type.slot(name) else {
            let existing = state.children.read().generic.get(name).cloned();
            return match (existing, replacement) {
                (Some(existing), _) => Ok(Some(existing)),
                (None, Some(node)) if create_if_missing => {
                    if node.browse_name().name != name {
                        return Err(NodeError::type_mismatch(
                            format!("{}/{}", self.path(), name),
                            format!("browse name '{}'", name),
                            format!("browse name '{}'", node.browse_name().name),
                        ));
                    }
                    self.add_child(node.clone())?;
                    Ok(Some(node))
                }
                _ => Ok(None),
            };
        };

        if let Some(existing) = state.children.read().slots.get(name) {
            return Ok(Some(existing.clone()));
        }
        if !create_if_missing {
            return Ok(None);
        }

        let node = self.produce_slot_node(&state.object_type, slot, replacement)?;
        {
            let mut children = state.children.write();
            if let Some(existing) = children.slots.get(name) {
                return Ok(Some(existing.clone()));
            }
            node.set_parent(self);
            children.slots.insert(name.to_string(), node.clone());
        }
        self.index_subtree(&node);
        self.mark_changed(ChangeMask::CHILDREN);
        tracing::debug!(parent = %self.node_id(), slot = name, "Slot materialized");
        Ok(Some(node))
    }

    /// Returns an existing child by browse name without materializing it.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if there is no such child.
    pub fn child(self: &Arc<Self>, name: &str) -> NodeResult<NodeRef> {
        self.find_child(name, false, None)?
            .ok_or_else(|| NodeError::not_found(self.path(), local_name(name)))
    }

    /// Follows a `/`-separated browse path, materializing slots on the way
    /// when `create_if_missing` is set.
    pub fn find_path(self: &Arc<Self>, path: &str, create_if_missing: bool) -> NodeResult<Option<NodeRef>> {
        let mut current = self.clone();
        for segment in path.split('/').filter(|segment| !segment.is_empty()) {
            match current.find_child(segment, create_if_missing, None)? {
                Some(child) => current = child,
                None => return Ok(None),
            }
        }
        Ok(Some(current))
    }

    /// Assigns a declared slot. `None` releases the current node.
    ///
    /// Assigning the node already held is a no-op and does not mark the
    /// parent. Otherwise the parent is marked `CHILDREN` and a released node
    /// is detached and marked `DELETED`.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the type declares no such slot
    /// - `TypeMismatch` or `AlreadyParented` as for [`Node::find_child`]
    pub fn set_slot(self: &Arc<Self>, name: &str, node: Option<NodeRef>) -> NodeResult<()> {
        let state = self.as_object()?;
        let name = local_name(name);
        let slot = state
            .object_type
            .slot(name)
            .ok_or_else(|| NodeError::not_found(self.path(), name))?;

        let current = state.children.read().slots.get(name).cloned();
        let unchanged = match (&current, &node) {
            (Some(current), Some(node)) => current.is_same(node),
            (None, None) => true,
            _ => false,
        };
        if unchanged {
            return Ok(());
        }

        if let Some(node) = &node {
            self.validate_slot_node(slot, node)?;
        }

        let previous = {
            let mut children = state.children.write();
            match &node {
                Some(node) => {
                    node.set_parent(self);
                    children.slots.insert(name.to_string(), node.clone())
                }
                None => children.slots.remove(name),
            }
        };
        if let Some(node) = &node {
            self.index_subtree(node);
        }
        if let Some(previous) = previous {
            self.release(&previous);
        }
        self.mark_changed(ChangeMask::CHILDREN);
        tracing::debug!(parent = %self.node_id(), slot = name, assigned = node.is_some(), "Slot assigned");
        Ok(())
    }

    /// Instantiates an object of `type_name` and attaches it as a generic
    /// child. Its node id is allocated below this node.
    ///
    /// # Errors
    ///
    /// - `UnknownType` or `AbstractType` for the requested type
    /// - `DuplicateBrowseName` if the name is a declared slot or already used
    /// - `NodeClassMismatch` if this node is not an object
    pub fn add_object(self: &Arc<Self>, type_name: &str, browse_name: &str) -> NodeResult<NodeRef> {
        let state = self.as_object()?;
        let name = local_name(browse_name);
        if state.object_type.slot(name).is_some() || state.children.read().generic.contains_key(name) {
            return Err(NodeError::duplicate_browse_name(self.path(), name));
        }

        let context = self.context();
        let object_type = context.registry().require(type_name)?;
        let node = instantiate(
            context,
            Some(self.node_id()),
            context.browse_name(name),
            &object_type,
        )?;
        self.add_child(node.clone())?;
        Ok(node)
    }

    /// Returns the object children whose type is `base` or a subtype of it,
    /// in child order.
    pub fn children_of_type(&self, base: &str) -> Vec<NodeRef> {
        self.children()
            .into_iter()
            .filter(|child| child.object_type().is_some_and(|t| t.is_subtype_of(base)))
            .collect()
    }

    /// Attaches a generic child under its own browse name.
    ///
    /// # Errors
    ///
    /// - `NodeClassMismatch` if this node is not an object
    /// - `DuplicateBrowseName` if the name is a declared slot or already used
    /// - `AlreadyParented` if the node is attached elsewhere
    pub fn add_child(self: &Arc<Self>, child: NodeRef) -> NodeResult<()> {
        let state = self.as_object()?;
        let name = child.browse_name().name.clone();
        if state.object_type.slot(&name).is_some() {
            return Err(NodeError::duplicate_browse_name(self.path(), name));
        }
        self.check_attachable(&child)?;
        {
            let mut children = state.children.write();
            if children.generic.contains_key(&name) {
                return Err(NodeError::duplicate_browse_name(self.path(), name));
            }
            child.set_parent(self);
            children.generic.insert(name, child.clone());
        }
        self.index_subtree(&child);
        self.mark_changed(ChangeMask::CHILDREN);
        tracing::debug!(parent = %self.node_id(), child = %child.node_id(), "Child added");
        Ok(())
    }

    /// Detaches a child, slot or generic, and returns it.
    ///
    /// The removed subtree leaves the node index; its observers are notified
    /// with `DELETED`.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if there is no such child.
    pub fn remove_child(self: &Arc<Self>, name: &str) -> NodeResult<NodeRef> {
        let state = self.as_object()?;
        let name = local_name(name);
        let removed = {
            let mut children = state.children.write();
            if state.object_type.slot(name).is_some() {
                children.slots.remove(name)
            } else {
                children.generic.shift_remove(name)
            }
        }
        .ok_or_else(|| NodeError::not_found(self.path(), name))?;

        self.release(&removed);
        self.mark_changed(ChangeMask::CHILDREN);
        tracing::debug!(parent = %self.node_id(), child = %removed.node_id(), "Child removed");
        Ok(removed)
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn produce_slot_node(
        self: &Arc<Self>,
        object_type: &ObjectType,
        slot: &SlotDecl,
        replacement: Option<NodeRef>,
    ) -> NodeResult<NodeRef> {
        let node = match replacement {
            Some(node) => node,
            None => match self.context().slot_factory(object_type, slot.name()) {
                Some(factory) => factory.create(self, slot)?,
                None => return default_slot_node(self, slot),
            },
        };
        self.validate_slot_node(slot, &node)?;
        Ok(node)
    }

    fn validate_slot_node(&self, slot: &SlotDecl, node: &NodeRef) -> NodeResult<()> {
        if !is_assignable(slot, node) {
            let error = NodeError::type_mismatch(
                format!("{}/{}", self.path(), slot.name()),
                slot.kind().describe(),
                describe_node(node),
            );
            error.log("slot assignment");
            return Err(error);
        }
        self.check_attachable(node)
    }

    fn check_attachable(&self, node: &NodeRef) -> NodeResult<()> {
        if let Some(parent) = node.parent() {
            return Err(NodeError::already_parented(node.path(), parent.path()));
        }
        if self.is_descendant_of(node) {
            return Err(NodeError::already_parented(self.path(), node.path()));
        }
        let context = self.context();
        let mut conflict = None;
        node.visit(&mut |n| {
            if conflict.is_none() && !context.can_register(n) {
                conflict = Some(n.node_id().to_string());
            }
        });
        match conflict {
            Some(node_id) => Err(NodeError::duplicate_node_id(node_id)),
            None => Ok(()),
        }
    }

    fn attach_slot(self: &Arc<Self>, name: &str, child: &NodeRef) -> NodeResult<()> {
        let state = self.as_object()?;
        child.set_parent(self);
        state.children.write().slots.insert(name.to_string(), child.clone());
        Ok(())
    }

    fn index_subtree(&self, node: &NodeRef) {
        let context = self.context();
        node.visit(&mut |n| {
            if let Err(error) = context.register(n) {
                error.log("index_subtree");
            }
        });
    }

    fn release(&self, node: &NodeRef) {
        let context = self.context();
        node.clear_parent();
        node.visit(&mut |n| context.unregister(n));
        node.mark_changed(ChangeMask::DELETED);
        node.clear_change_masks(true);
    }
}

// =============================================================================
// Tests
// =============================================================================
