// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! The address-space node.
//!
//! Every node has an identity (node id and browse name), a non-owning
//! reference to its parent, a change mask and a class-specific payload.
//! Parents own their children through [`NodeRef`] (`Arc<Node>`); children
//! point back through `Weak`, so trees never form ownership cycles.
//!
//! # Change masks
//!
//! Mutations OR bits into the node's [`ChangeMask`]. The hosting runtime
//! polls masks with [`Node::take_changes`] or clears them with
//! [`Node::clear_change_masks`]; both reset the mask and notify the node's
//! registered [`ChangeObserver`]s with the accumulated bits.

use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::RwLock;

use crate::change::{ChangeMask, ChangeObserver, ChangeRecord};
use crate::context::ModelContext;
use crate::error::NodeResult;
use crate::method::{MethodDecl, MethodState};
use crate::object::{self, ObjectState};
use crate::types::{NodeClass, NodeId, QualifiedName};
use crate::variable::{VariableDecl, VariableState};

/// Shared reference to a node.
pub type NodeRef = Arc<Node>;

/// Class-specific node payload.
pub(crate) enum NodeKind {
    Object(ObjectState),
    Variable(VariableState),
    Method(MethodState),
}

/// A node of the address space.
pub struct Node {
    node_id: NodeId,
    browse_name: QualifiedName,
    display_name: RwLock<String>,
    description: RwLock<Option<String>>,
    parent: RwLock<Weak<Node>>,
    change_mask: AtomicU8,
    observers: RwLock<Vec<Arc<dyn ChangeObserver>>>,
    context: Arc<ModelContext>,
    kind: NodeKind,
}

impl Node {
    /// Creates a node and registers it in the context's node index.
    pub(crate) fn create(
        context: &Arc<ModelContext>,
        node_id: NodeId,
        browse_name: QualifiedName,
        kind: NodeKind,
    ) -> NodeResult<NodeRef> {
        let node = Arc::new(Self {
            node_id,
            display_name: RwLock::new(browse_name.name.clone()),
            browse_name,
            description: RwLock::new(None),
            parent: RwLock::new(Weak::new()),
            change_mask: AtomicU8::new(0),
            observers: RwLock::new(Vec::new()),
            context: context.clone(),
            kind,
        });
        context.register(&node)?;
        tracing::trace!(
            node_id = %node.node_id,
            browse_name = %node.browse_name,
            class = %node.node_class(),
            "Node created"
        );
        Ok(node)
    }

    /// Creates a detached variable.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateNodeId` if the allocated id is in use.
    pub fn new_variable(context: &Arc<ModelContext>, name: &str, decl: VariableDecl) -> NodeResult<NodeRef> {
        let browse_name = context.browse_name(name);
        let node_id = context.allocate_id(None, &browse_name);
        Self::create(context, node_id, browse_name, NodeKind::Variable(VariableState::new(decl)))
    }

    /// Creates a detached method without a handler.
    pub fn new_method(context: &Arc<ModelContext>, name: &str, decl: MethodDecl) -> NodeResult<NodeRef> {
        let browse_name = context.browse_name(name);
        let node_id = context.allocate_id(None, &browse_name);
        Self::create(
            context,
            node_id,
            browse_name,
            NodeKind::Method(MethodState::new(Arc::new(decl))),
        )
    }

    /// Creates a detached object of the named type with its mandatory slots.
    ///
    /// # Errors
    ///
    /// - `UnknownType` if the type is not registered
    /// - `AbstractType` if the type, or the type of a mandatory object slot,
    ///   is abstract
    pub fn new_object(context: &Arc<ModelContext>, name: &str, type_name: &str) -> NodeResult<NodeRef> {
        let object_type = context.registry().require(type_name)?;
        object::instantiate(context, None, context.browse_name(name), &object_type)
    }

    // =========================================================================
    // Identity
    // =========================================================================

    /// Returns the node id.
    pub fn node_id(&self) -> &NodeId {
        &self.node_id
    }

    /// Returns the browse name.
    pub fn browse_name(&self) -> &QualifiedName {
        &self.browse_name
    }

    /// Returns the display name.
    pub fn display_name(&self) -> String {
        self.display_name.read().clone()
    }

    /// Sets the display name. Marks `NON_VALUE` when it changes.
    pub fn set_display_name(&self, display_name: impl Into<String>) {
        let display_name = display_name.into();
        let changed = {
            let mut current = self.display_name.write();
            let changed = *current != display_name;
            *current = display_name;
            changed
        };
        if changed {
            self.mark_changed(ChangeMask::NON_VALUE);
        }
    }

    /// Returns the description.
    pub fn description(&self) -> Option<String> {
        self.description.read().clone()
    }

    /// Sets the description. Marks `NON_VALUE` when it changes.
    pub fn set_description(&self, description: Option<String>) {
        let changed = {
            let mut current = self.description.write();
            let changed = *current != description;
            *current = description;
            changed
        };
        if changed {
            self.mark_changed(ChangeMask::NON_VALUE);
        }
    }

    /// Returns the context of the tree this node belongs to.
    pub fn context(&self) -> &Arc<ModelContext> {
        &self.context
    }

    /// Returns the node class.
    pub fn node_class(&self) -> NodeClass {
        match &self.kind {
            NodeKind::Object(_) => NodeClass::Object,
            NodeKind::Variable(_) => NodeClass::Variable,
            NodeKind::Method(_) => NodeClass::Method,
        }
    }

    /// Returns `true` for object nodes.
    pub fn is_object(&self) -> bool {
        matches!(self.kind, NodeKind::Object(_))
    }

    /// Returns `true` for variable nodes.
    pub fn is_variable(&self) -> bool {
        matches!(self.kind, NodeKind::Variable(_))
    }

    /// Returns `true` for method nodes.
    pub fn is_method(&self) -> bool {
        matches!(self.kind, NodeKind::Method(_))
    }

    /// Returns the type-definition id. Methods have none.
    pub fn type_definition_id(&self) -> Option<NodeId> {
        match &self.kind {
            NodeKind::Object(state) => Some(self.context.type_definition_id(&state.object_type)),
            NodeKind::Variable(state) if state.decl.is_property => Some(NodeId::PROPERTY_TYPE),
            NodeKind::Variable(_) => Some(NodeId::BASE_DATA_VARIABLE_TYPE),
            NodeKind::Method(_) => None,
        }
    }

    /// Returns `true` if `other` is this very node.
    pub fn is_same(&self, other: &Node) -> bool {
        std::ptr::eq(self, other)
    }

    pub(crate) fn kind(&self) -> &NodeKind {
        &self.kind
    }

    // =========================================================================
    // Parent
    // =========================================================================

    /// Returns the parent, `None` for detached and root nodes.
    pub fn parent(&self) -> Option<NodeRef> {
        self.parent.read().upgrade()
    }

    /// Returns `true` if the node is attached to a live parent.
    pub fn has_parent(&self) -> bool {
        self.parent.read().strong_count() > 0
    }

    pub(crate) fn set_parent(&self, parent: &NodeRef) {
        *self.parent.write() = Arc::downgrade(parent);
    }

    pub(crate) fn clear_parent(&self) {
        *self.parent.write() = Weak::new();
    }

    /// Returns `true` if `ancestor` is this node or one of its ancestors.
    pub fn is_descendant_of(&self, ancestor: &Node) -> bool {
        if self.is_same(ancestor) {
            return true;
        }
        let mut current = self.parent();
        while let Some(node) = current {
            if node.is_same(ancestor) {
                return true;
            }
            current = node.parent();
        }
        false
    }

    /// Returns the browse-name path from the root, separated by `/`.
    pub fn path(&self) -> String {
        let mut names = vec![self.browse_name.name.clone()];
        let mut current = self.parent();
        while let Some(node) = current {
            names.push(node.browse_name.name.clone());
            current = node.parent();
        }
        names.reverse();
        names.join("/")
    }

    // =========================================================================
    // Change tracking
    // =========================================================================

    /// Returns the accumulated change mask.
    pub fn change_mask(&self) -> ChangeMask {
        ChangeMask::from_bits(self.change_mask.load(Ordering::Acquire))
    }

    /// ORs `mask` into the change mask.
    pub fn mark_changed(&self, mask: ChangeMask) {
        self.change_mask.fetch_or(mask.bits(), Ordering::AcqRel);
    }

    /// Registers an observer notified when this node's mask is cleared.
    pub fn add_observer(&self, observer: Arc<dyn ChangeObserver>) {
        tracing::debug!(node = %self.node_id, observer = observer.name(), "Change observer added");
        self.observers.write().push(observer);
    }

    /// Removes all observers.
    pub fn clear_observers(&self) {
        self.observers.write().clear();
    }

    /// Resets change masks and notifies observers of every node that had
    /// changes.
    pub fn clear_change_masks(&self, include_children: bool) {
        self.take_changes(include_children);
    }

    /// Resets change masks and returns a record per changed node, children
    /// before their parent. Observers are notified as with
    /// [`Node::clear_change_masks`].
    pub fn take_changes(&self, include_children: bool) -> Vec<ChangeRecord> {
        let mut records = Vec::new();
        self.drain_changes(include_children, &mut records);
        records
    }

    fn drain_changes(&self, include_children: bool, records: &mut Vec<ChangeRecord>) {
        if include_children {
            for child in self.children() {
                child.drain_changes(true, records);
            }
        }

        let bits = self.change_mask.swap(0, Ordering::AcqRel);
        if bits == 0 {
            return;
        }
        let record = ChangeRecord::new(
            self.node_id.clone(),
            self.browse_name.clone(),
            ChangeMask::from_bits(bits),
        );
        let observers = self.observers.read().clone();
        for observer in &observers {
            observer.on_change(&record);
        }
        records.push(record);
    }

    /// Resets masks of the subtree without notifying anyone.
    pub(crate) fn reset_change_masks(&self) {
        for child in self.children() {
            child.reset_change_masks();
        }
        self.change_mask.store(0, Ordering::Release);
    }

    /// Visits this node and its materialized descendants depth first.
    pub fn visit(self: &Arc<Self>, visitor: &mut dyn FnMut(&NodeRef)) {
        visitor(self);
        for child in self.children() {
            child.visit(visitor);
        }
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("node_id", &self.node_id)
            .field("browse_name", &self.browse_name)
            .field("class", &self.node_class())
            .field("change_mask", &self.change_mask())
            .finish()
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.browse_name, self.node_id)
    }
}

// =============================================================================
// Tests
// =============================================================================
