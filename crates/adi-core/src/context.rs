// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Services shared by every node of one tree.
//!
//! A [`ModelContext`] replaces process-wide state: it carries the type
//! registry, namespace, node-id allocation strategy, change-detection policy,
//! the node-id index and custom slot factories. Each node holds an `Arc` to
//! the context of the tree it was created in.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::error::{NodeError, NodeResult};
use crate::node::{Node, NodeRef};
use crate::registry::{ObjectType, SlotDecl, TypeRegistry};
use crate::types::{NodeId, QualifiedName};

// =============================================================================
// Policies
// =============================================================================

/// When a successful value write marks the variable changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeDetection {
    /// Every successful write stores a new value instance and marks `VALUE`.
    #[default]
    Identity,
    /// Only writes that change the value mark `VALUE`.
    Equality,
}

/// How node ids are allocated for new instances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdStrategy {
    /// String ids built from the browse path: `ns=N;s=Device.Channel1`.
    #[default]
    Path,
    /// Numeric ids from a counter: `ns=N;i=k`.
    Sequential,
}

// =============================================================================
// NodeIdAllocator
// =============================================================================

/// Allocates node ids for new nodes.
pub trait NodeIdAllocator: Send + Sync {
    /// Returns the id for a node named `browse_name` under `parent`.
    fn allocate(&self, namespace_index: u16, parent: Option<&NodeId>, browse_name: &QualifiedName) -> NodeId;
}

/// Builds string ids by appending the browse name to the parent's string id.
///
/// Parents with non-string ids (such as the Objects folder) start a new path.
#[derive(Debug, Default)]
pub struct PathIdAllocator;

impl NodeIdAllocator for PathIdAllocator {
    fn allocate(&self, namespace_index: u16, parent: Option<&NodeId>, browse_name: &QualifiedName) -> NodeId {
        match parent.and_then(NodeId::as_string) {
            Some(parent_path) => NodeId::string(namespace_index, format!("{}.{}", parent_path, browse_name.name)),
            None => NodeId::string(namespace_index, browse_name.name.clone()),
        }
    }
}

/// Hands out consecutive numeric ids.
#[derive(Debug)]
pub struct SequentialIdAllocator {
    next: AtomicU32,
}

impl SequentialIdAllocator {
    /// Creates an allocator starting at `first`.
    pub fn starting_at(first: u32) -> Self {
        Self {
            next: AtomicU32::new(first),
        }
    }
}

impl Default for SequentialIdAllocator {
    fn default() -> Self {
        Self::starting_at(1000)
    }
}

impl NodeIdAllocator for SequentialIdAllocator {
    fn allocate(&self, namespace_index: u16, _parent: Option<&NodeId>, _browse_name: &QualifiedName) -> NodeId {
        NodeId::numeric(namespace_index, self.next.fetch_add(1, Ordering::Relaxed))
    }
}

// =============================================================================
// SlotFactory
// =============================================================================

/// Creates the node for a slot instead of the default construction.
///
/// The returned node must be assignable to the slot and must not have a
/// parent; it is validated like a replacement node.
pub trait SlotFactory: Send + Sync {
    /// Creates the node for `slot` under `parent`.
    fn create(&self, parent: &NodeRef, slot: &SlotDecl) -> NodeResult<NodeRef>;
}

impl<F> SlotFactory for F
where
    F: Fn(&NodeRef, &SlotDecl) -> NodeResult<NodeRef> + Send + Sync,
{
    fn create(&self, parent: &NodeRef, slot: &SlotDecl) -> NodeResult<NodeRef> {
        self(parent, slot)
    }
}

// =============================================================================
// ModelContext
// =============================================================================

/// Shared services for one node tree.
pub struct ModelContext {
    registry: Arc<TypeRegistry>,
    namespace_index: u16,
    change_detection: ChangeDetection,
    allocator: Box<dyn NodeIdAllocator>,
    index: RwLock<HashMap<NodeId, Weak<Node>>>,
    factories: RwLock<HashMap<(String, String), Arc<dyn SlotFactory>>>,
}

impl ModelContext {
    /// Creates a builder.
    pub fn builder(registry: Arc<TypeRegistry>) -> ModelContextBuilder {
        ModelContextBuilder::new(registry)
    }

    /// Returns the type registry.
    pub fn registry(&self) -> &Arc<TypeRegistry> {
        &self.registry
    }

    /// Returns the model namespace URI.
    pub fn namespace_uri(&self) -> &str {
        self.registry.namespace_uri()
    }

    /// Returns the model namespace index.
    pub fn namespace_index(&self) -> u16 {
        self.namespace_index
    }

    /// Returns the change-detection policy.
    pub fn change_detection(&self) -> ChangeDetection {
        self.change_detection
    }

    /// Returns a browse name in the model namespace.
    pub fn browse_name(&self, name: &str) -> QualifiedName {
        QualifiedName::new(self.namespace_index, name)
    }

    /// Allocates a node id for a new node.
    pub fn allocate_id(&self, parent: Option<&NodeId>, browse_name: &QualifiedName) -> NodeId {
        self.allocator.allocate(self.namespace_index, parent, browse_name)
    }

    /// Returns the type-definition id of an object type in this tree.
    pub fn type_definition_id(&self, object_type: &ObjectType) -> NodeId {
        object_type.type_definition_id(self.namespace_index)
    }

    // =========================================================================
    // Node index
    // =========================================================================

    /// Registers a node under its id.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateNodeId` if another live node holds the id.
    pub fn register(&self, node: &NodeRef) -> NodeResult<()> {
        let mut index = self.index.write();
        if let Some(existing) = index.get(node.node_id()).and_then(Weak::upgrade) {
            if !Arc::ptr_eq(&existing, node) {
                return Err(NodeError::duplicate_node_id(node.node_id().to_string()));
            }
        }
        index.insert(node.node_id().clone(), Arc::downgrade(node));
        Ok(())
    }

    /// Removes the index entry for `node` if it still points at this node.
    pub fn unregister(&self, node: &Node) {
        let mut index = self.index.write();
        if index
            .get(node.node_id())
            .is_some_and(|entry| std::ptr::eq(entry.as_ptr(), node))
        {
            index.remove(node.node_id());
        }
    }

    /// Returns `true` if `node` can be indexed without displacing another
    /// live node.
    pub fn can_register(&self, node: &Node) -> bool {
        match self.index.read().get(node.node_id()).and_then(Weak::upgrade) {
            Some(existing) => std::ptr::eq(Arc::as_ptr(&existing), node),
            None => true,
        }
    }

    /// Returns the live node with the given id.
    pub fn lookup(&self, node_id: &NodeId) -> Option<NodeRef> {
        self.index.read().get(node_id).and_then(Weak::upgrade)
    }

    /// Drops index entries whose nodes no longer exist. Returns the number
    /// of entries removed.
    pub fn prune(&self) -> usize {
        let mut index = self.index.write();
        let before = index.len();
        index.retain(|_, node| node.strong_count() > 0);
        before - index.len()
    }

    /// Returns the number of live indexed nodes.
    pub fn live_nodes(&self) -> usize {
        self.index.read().values().filter(|node| node.strong_count() > 0).count()
    }

    // =========================================================================
    // Slot factories
    // =========================================================================

    /// Registers a factory for `slot` on `type_name` and its subtypes.
    /// Replaces any previous factory for the same pair.
    pub fn register_slot_factory(
        &self,
        type_name: impl Into<String>,
        slot: impl Into<String>,
        factory: Arc<dyn SlotFactory>,
    ) {
        let key = (type_name.into(), slot.into());
        tracing::debug!(type_name = %key.0, slot = %key.1, "Slot factory registered");
        self.factories.write().insert(key, factory);
    }

    /// Returns the factory for `slot` on `object_type`, searching the
    /// type's ancestry from the most derived type.
    pub fn slot_factory(&self, object_type: &ObjectType, slot: &str) -> Option<Arc<dyn SlotFactory>> {
        let factories = self.factories.read();
        if factories.is_empty() {
            return None;
        }
        object_type
            .ancestry()
            .find_map(|t| factories.get(&(t.name().to_string(), slot.to_string())).cloned())
    }
}

impl fmt::Debug for ModelContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelContext")
            .field("namespace_uri", &self.namespace_uri())
            .field("namespace_index", &self.namespace_index)
            .field("change_detection", &self.change_detection)
            .field("indexed_nodes", &self.index.read().len())
            .field("factories", &self.factories.read().len())
            .finish()
    }
}

// =============================================================================
// ModelContextBuilder
// =============================================================================

/// Builder for [`ModelContext`].
pub struct ModelContextBuilder {
    registry: Arc<TypeRegistry>,
    namespace_index: u16,
    change_detection: ChangeDetection,
    allocator: Option<Box<dyn NodeIdAllocator>>,
}

impl ModelContextBuilder {
    fn new(registry: Arc<TypeRegistry>) -> Self {
        Self {
            registry,
            namespace_index: 1,
            change_detection: ChangeDetection::default(),
            allocator: None,
        }
    }

    /// Sets the model namespace index.
    pub fn namespace_index(mut self, namespace_index: u16) -> Self {
        self.namespace_index = namespace_index;
        self
    }

    /// Sets the change-detection policy.
    pub fn change_detection(mut self, change_detection: ChangeDetection) -> Self {
        self.change_detection = change_detection;
        self
    }

    /// Selects a built-in id strategy.
    pub fn id_strategy(mut self, strategy: IdStrategy) -> Self {
        self.allocator = Some(match strategy {
            IdStrategy::Path => Box::new(PathIdAllocator),
            IdStrategy::Sequential => Box::new(SequentialIdAllocator::default()),
        });
        self
    }

    /// Sets a custom id allocator.
    pub fn allocator(mut self, allocator: Box<dyn NodeIdAllocator>) -> Self {
        self.allocator = Some(allocator);
        self
    }

    /// Builds the shared context.
    pub fn build(self) -> Arc<ModelContext> {
        Arc::new(ModelContext {
            registry: self.registry,
            namespace_index: self.namespace_index,
            change_detection: self.change_detection,
            allocator: self.allocator.unwrap_or_else(|| Box::new(PathIdAllocator)),
            index: RwLock::new(HashMap::new()),
            factories: RwLock::new(HashMap::new()),
        })
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_allocator() {
        let allocator = PathIdAllocator;
        let device = allocator.allocate(2, Some(&NodeId::OBJECTS_FOLDER), &QualifiedName::new(2, "Spectrometer"));
        assert_eq!(device, NodeId::string(2, "Spectrometer"));

        let channel = allocator.allocate(2, Some(&device), &QualifiedName::new(2, "Channel1"));
        assert_eq!(channel, NodeId::string(2, "Spectrometer.Channel1"));
        assert!(channel.is_string());

        let detached = allocator.allocate(2, None, &QualifiedName::new(2, "Loose"));
        assert_eq!(detached, NodeId::string(2, "Loose"));
    }

    #[test]
    fn test_sequential_allocator() {
        let allocator = SequentialIdAllocator::starting_at(5);
        let name = QualifiedName::new(1, "X");
        assert_eq!(allocator.allocate(1, None, &name), NodeId::numeric(1, 5));
        assert_eq!(allocator.allocate(1, None, &name), NodeId::numeric(1, 6));
    }

    #[test]
    fn test_builder_defaults() {
        let context = ModelContext::builder(Arc::new(TypeRegistry::builtin())).build();
        assert_eq!(context.namespace_index(), 1);
        assert_eq!(context.change_detection(), ChangeDetection::Identity);
        assert_eq!(context.browse_name("A"), QualifiedName::new(1, "A"));
        assert_eq!(
            context.allocate_id(Some(&NodeId::OBJECTS_FOLDER), &QualifiedName::new(1, "A")),
            NodeId::string(1, "A")
        );
    }

    #[test]
    fn test_sequential_strategy() {
        let context = ModelContext::builder(Arc::new(TypeRegistry::builtin()))
            .namespace_index(3)
            .id_strategy(IdStrategy::Sequential)
            .build();
        let id = context.allocate_id(None, &QualifiedName::new(3, "A"));
        assert_eq!(id, NodeId::numeric(3, 1000));
    }

    #[test]
    fn test_policy_serde() {
        let detection: ChangeDetection = serde_json::from_str("\"equality\"").unwrap();
        assert_eq!(detection, ChangeDetection::Equality);
        let strategy: IdStrategy = serde_json::from_str("\"sequential\"").unwrap();
        assert_eq!(strategy, IdStrategy::Sequential);
    }
}
