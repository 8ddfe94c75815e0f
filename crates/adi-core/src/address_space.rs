// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! The address space hosting an instantiated node tree.
//!
//! An [`AddressSpace`] owns the `Objects` folder (ns=0;i=85) and the
//! [`ModelContext`] of its tree. It is the surface a hosting runtime talks
//! to: instantiate typed objects, resolve nodes by id or browse path,
//! dispatch method calls and poll change masks.
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//! use adi_core::prelude::*;
//!
//! let schema = ModelSchema::new("urn:example:lab").with_type(
//!     ObjectTypeSchema::new("ThermometerType")
//!         .with_slot(SlotSchema::variable("Temperature", DataType::Double)),
//! );
//! let registry = Arc::new(TypeRegistry::from_schema(&schema).unwrap());
//! let space = AddressSpace::new(registry, AddressSpaceOptions::default()).unwrap();
//!
//! let thermometer = space.instantiate("ThermometerType", "Thermometer", None).unwrap();
//! thermometer.child("Temperature").unwrap().set_value(21.5f64).unwrap();
//!
//! // The new child of `Objects` and the written value.
//! let changes = space.collect_changes();
//! assert_eq!(changes.len(), 2);
//! ```

use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::browse::BrowseNode;
use crate::change::{ChangeObserver, ChangeRecord};
use crate::context::{ChangeDetection, IdStrategy, ModelContext};
use crate::error::{NodeError, NodeResult};
use crate::method::CallContext;
use crate::node::NodeRef;
use crate::object;
use crate::registry::{SlotKind, TypeRegistry, FOLDER_TYPE};
use crate::types::{NodeId, QualifiedName};
use crate::value::Variant;

/// Browse name of the root folder.
pub const OBJECTS_FOLDER_NAME: &str = "Objects";

// =============================================================================
// AddressSpaceOptions
// =============================================================================

/// Construction options for an [`AddressSpace`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AddressSpaceOptions {
    /// Namespace index of the model namespace. Must not be 0.
    pub namespace_index: u16,
    /// When value writes mark variables changed.
    pub change_detection: ChangeDetection,
    /// How node ids are allocated.
    pub id_strategy: IdStrategy,
}

impl Default for AddressSpaceOptions {
    fn default() -> Self {
        Self {
            namespace_index: 1,
            change_detection: ChangeDetection::default(),
            id_strategy: IdStrategy::default(),
        }
    }
}

impl AddressSpaceOptions {
    /// Sets the namespace index.
    pub fn with_namespace_index(mut self, namespace_index: u16) -> Self {
        self.namespace_index = namespace_index;
        self
    }

    /// Sets the change-detection policy.
    pub fn with_change_detection(mut self, change_detection: ChangeDetection) -> Self {
        self.change_detection = change_detection;
        self
    }

    /// Sets the node-id strategy.
    pub fn with_id_strategy(mut self, id_strategy: IdStrategy) -> Self {
        self.id_strategy = id_strategy;
        self
    }
}

// =============================================================================
// AddressSpace
// =============================================================================

/// An instantiated node tree rooted at the `Objects` folder.
pub struct AddressSpace {
    context: Arc<ModelContext>,
    objects: NodeRef,
    observers: RwLock<Vec<Arc<dyn ChangeObserver>>>,
}

impl AddressSpace {
    /// Creates an address space holding only the `Objects` folder.
    ///
    /// # Errors
    ///
    /// Returns `InvalidSchema` if the namespace index is 0.
    pub fn new(registry: Arc<TypeRegistry>, options: AddressSpaceOptions) -> NodeResult<Self> {
        if options.namespace_index == 0 {
            return Err(NodeError::invalid_schema(
                registry.namespace_uri(),
                "namespace index 0 is reserved for the standard namespace",
            ));
        }

        let context = ModelContext::builder(registry)
            .namespace_index(options.namespace_index)
            .change_detection(options.change_detection)
            .id_strategy(options.id_strategy)
            .build();
        let folder_type = context.registry().require(FOLDER_TYPE)?;
        let objects = object::instantiate_with_id(
            &context,
            NodeId::OBJECTS_FOLDER,
            QualifiedName::standard(OBJECTS_FOLDER_NAME),
            &folder_type,
        )?;

        tracing::info!(
            namespace_uri = context.namespace_uri(),
            namespace_index = options.namespace_index,
            types = context.registry().len(),
            "Address space created"
        );
        Ok(Self {
            context,
            objects,
            observers: RwLock::new(Vec::new()),
        })
    }

    /// Returns the model context.
    pub fn context(&self) -> &Arc<ModelContext> {
        &self.context
    }

    /// Returns the type registry.
    pub fn registry(&self) -> &Arc<TypeRegistry> {
        self.context.registry()
    }

    /// Returns the `Objects` folder.
    pub fn objects_folder(&self) -> &NodeRef {
        &self.objects
    }

    /// Instantiates an object of `type_name` under `parent`, or under the
    /// `Objects` folder when `parent` is `None`.
    ///
    /// # Errors
    ///
    /// - `UnknownType` or `AbstractType` for the requested type
    /// - `DuplicateBrowseName` if `parent` already has a child or slot with
    ///   that name
    /// - `NodeClassMismatch` if `parent` is not an object
    pub fn instantiate(&self, type_name: &str, browse_name: &str, parent: Option<&NodeRef>) -> NodeResult<NodeRef> {
        parent.unwrap_or(&self.objects).add_object(type_name, browse_name)
    }

    /// Returns the live node with the given id.
    pub fn node(&self, node_id: &NodeId) -> Option<NodeRef> {
        self.context.lookup(node_id)
    }

    /// Follows a browse path from the `Objects` folder without
    /// materializing anything. A leading `Objects/` is accepted.
    pub fn find_path(&self, path: &str) -> NodeResult<Option<NodeRef>> {
        self.objects.find_path(strip_root(path), false)
    }

    /// Follows a browse path from the `Objects` folder, materializing
    /// declared slots on the way.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` naming the first segment that does not exist.
    pub fn resolve_path(&self, path: &str) -> NodeResult<NodeRef> {
        let mut current = self.objects.clone();
        for segment in strip_root(path).split('/').filter(|s| !s.is_empty()) {
            current = current
                .find_child(segment, true, None)?
                .ok_or_else(|| NodeError::not_found(current.path(), segment))?;
        }
        Ok(current)
    }

    /// Calls a method of an object.
    ///
    /// # Errors
    ///
    /// - `NotFound` if either node is missing or the method is not a child
    ///   of the object
    /// - any error of [`Node::invoke`](crate::node::Node::invoke)
    pub fn call(
        &self,
        context: &CallContext,
        object_id: &NodeId,
        method_id: &NodeId,
        inputs: &[Variant],
    ) -> NodeResult<Vec<Variant>> {
        let object = self
            .node(object_id)
            .ok_or_else(|| NodeError::not_found(OBJECTS_FOLDER_NAME, object_id.to_string()))?;
        let method = self
            .node(method_id)
            .ok_or_else(|| NodeError::not_found(object.path(), method_id.to_string()))?;
        let owned = method.parent().is_some_and(|parent| parent.is_same(&object));
        if !owned {
            return Err(NodeError::not_found(object.path(), method.browse_name().name.clone()));
        }
        method.invoke(context, object_id, inputs)
    }

    /// Snapshots the tree below the `Objects` folder.
    pub fn browse_tree(&self, max_depth: Option<usize>) -> BrowseNode {
        BrowseNode::from_node(&self.objects, max_depth)
    }

    /// Materializes every optional slot in the tree, recursively. Slots of
    /// abstract object types are skipped. Returns the number of slots
    /// materialized.
    pub fn materialize_all(&self) -> NodeResult<usize> {
        let mut created = 0;
        let mut pending = vec![self.objects.clone()];
        while let Some(node) = pending.pop() {
            if let Some(object_type) = node.object_type().cloned() {
                for slot in object_type.slots() {
                    if node.is_materialized(slot.name()) {
                        continue;
                    }
                    if matches!(slot.kind(), SlotKind::Object(t) if t.is_abstract()) {
                        continue;
                    }
                    if node.find_child(slot.name(), true, None)?.is_some() {
                        created += 1;
                    }
                }
            }
            pending.extend(node.children());
        }
        tracing::debug!(created, "Optional slots materialized");
        Ok(created)
    }

    /// Returns the number of nodes in the tree, the `Objects` folder
    /// included.
    pub fn node_count(&self) -> usize {
        let mut count = 0;
        self.objects.visit(&mut |_| count += 1);
        count
    }

    /// Registers an observer receiving every record returned by
    /// [`AddressSpace::collect_changes`].
    pub fn add_observer(&self, observer: Arc<dyn ChangeObserver>) {
        self.observers.write().push(observer);
    }

    /// Polls and clears the change masks of the whole tree. Index entries
    /// of dropped nodes are pruned on the way.
    pub fn collect_changes(&self) -> Vec<ChangeRecord> {
        let pruned = self.context.prune();
        if pruned > 0 {
            tracing::trace!(pruned, "Dropped dead node index entries");
        }
        let records = self.objects.take_changes(true);
        if !records.is_empty() {
            let observers = self.observers.read().clone();
            for record in &records {
                for observer in &observers {
                    observer.on_change(record);
                }
            }
            tracing::trace!(count = records.len(), "Changes collected");
        }
        records
    }
}

impl std::fmt::Debug for AddressSpace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AddressSpace")
            .field("context", &self.context)
            .field("objects", self.objects.node_id())
            .finish()
    }
}

fn strip_root(path: &str) -> &str {
    let path = path.trim_start_matches('/');
    match path.strip_prefix(OBJECTS_FOLDER_NAME) {
        Some("") => "",
        Some(rest) if rest.starts_with('/') => rest,
        _ => path,
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::change::{ChangeCollector, ChangeMask};
    use crate::schema::{ArgumentSchema, ModelSchema, ObjectTypeSchema, SlotSchema};
    use crate::types::DataType;

    fn registry() -> Arc<TypeRegistry> {
        let schema = ModelSchema::new("urn:test:space")
            .with_type(
                ObjectTypeSchema::new("PumpType")
                    .with_slot(SlotSchema::variable("Speed", DataType::Double))
                    .with_slot(SlotSchema::variable("Pressure", DataType::Double).optional())
                    .with_slot(
                        SlotSchema::method("Start")
                            .with_input(ArgumentSchema::new("Rpm", DataType::UInt32))
                            .with_output(ArgumentSchema::new("Message", DataType::String)),
                    ),
            )
            .with_type(
                ObjectTypeSchema::new("StationType")
                    .with_slot(SlotSchema::object("MainPump", "PumpType").optional())
                    .with_slot(SlotSchema::object("Spare", "BaseObjectType").optional()),
            );
        Arc::new(TypeRegistry::from_schema(&schema).unwrap())
    }

    fn space() -> AddressSpace {
        AddressSpace::new(registry(), AddressSpaceOptions::default()).unwrap()
    }

    #[test]
    fn test_objects_folder() {
        let space = space();
        let objects = space.objects_folder();
        assert_eq!(objects.node_id(), &NodeId::OBJECTS_FOLDER);
        assert_eq!(objects.browse_name(), &QualifiedName::standard("Objects"));
        assert!(space.node(&NodeId::OBJECTS_FOLDER).unwrap().is_same(objects));
        assert_eq!(space.node_count(), 1);
    }

    #[test]
    fn test_namespace_zero_rejected() {
        let options = AddressSpaceOptions::default().with_namespace_index(0);
        assert!(matches!(
            AddressSpace::new(registry(), options),
            Err(NodeError::InvalidSchema { .. })
        ));
    }

    #[test]
    fn test_instantiate_and_lookup() {
        let space = space();
        let pump = space.instantiate("PumpType", "Pump1", None).unwrap();
        assert_eq!(pump.node_id(), &NodeId::string(1, "Pump1"));
        assert_eq!(pump.type_definition_id(), Some(NodeId::string(1, "PumpType")));
        assert!(pump.parent().unwrap().is_same(space.objects_folder()));

        let speed = space.find_path("Objects/Pump1/Speed").unwrap().unwrap();
        assert_eq!(speed.node_id(), &NodeId::string(1, "Pump1.Speed"));
        assert!(space.node(&NodeId::string(1, "Pump1.Speed")).unwrap().is_same(&speed));
        assert!(space.find_path("Pump1/Pressure").unwrap().is_none());

        assert!(matches!(
            space.instantiate("PumpType", "Pump1", None),
            Err(NodeError::DuplicateBrowseName { .. })
        ));
        assert!(matches!(
            space.instantiate("NoSuchType", "X", None),
            Err(NodeError::UnknownType { .. })
        ));
    }

    #[test]
    fn test_instantiate_under_parent() {
        let space = space();
        let station = space.instantiate("StationType", "Station", None).unwrap();
        let pump = space.instantiate("PumpType", "Extra", Some(&station)).unwrap();
        assert_eq!(pump.path(), "Objects/Station/Extra");
        assert!(matches!(
            space.instantiate("PumpType", "MainPump", Some(&station)),
            Err(NodeError::DuplicateBrowseName { .. })
        ));
    }

    #[test]
    fn test_resolve_path() {
        let space = space();
        space.instantiate("StationType", "Station", None).unwrap();
        let pressure = space.resolve_path("Station/MainPump/Pressure").unwrap();
        assert_eq!(pressure.path(), "Objects/Station/MainPump/Pressure");
        match space.resolve_path("Station/Nope/Pressure") {
            Err(NodeError::NotFound { parent, name }) => {
                assert_eq!(parent, "Objects/Station");
                assert_eq!(name, "Nope");
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_call() {
        let space = space();
        let pump = space.instantiate("PumpType", "Pump", None).unwrap();
        let start = pump.child("Start").unwrap();
        start
            .register_handler(|_, object, inputs, outputs| {
                outputs[0] = Variant::from(format!("{} at {}", object, inputs[0]));
                Ok(())
            })
            .unwrap();

        let outputs = space
            .call(&CallContext::new(), pump.node_id(), start.node_id(), &[Variant::UInt32(1200)])
            .unwrap();
        assert_eq!(outputs, vec![Variant::from("ns=1;s=Pump at 1200")]);

        let other = space.instantiate("PumpType", "Other", None).unwrap();
        assert!(matches!(
            space.call(&CallContext::new(), other.node_id(), start.node_id(), &[Variant::UInt32(1)]),
            Err(NodeError::NotFound { .. })
        ));
        assert!(matches!(
            space.call(&CallContext::new(), &NodeId::string(1, "Ghost"), start.node_id(), &[]),
            Err(NodeError::NotFound { .. })
        ));
    }

    #[test]
    fn test_materialize_all() {
        let space = space();
        space.instantiate("StationType", "Station", None).unwrap();
        let created = space.materialize_all().unwrap();
        assert_eq!(created, 3);
        assert!(space.find_path("Station/MainPump/Pressure").unwrap().is_some());
        assert!(space.find_path("Station/Spare").unwrap().is_some());
        assert_eq!(space.materialize_all().unwrap(), 0);
    }

    #[test]
    fn test_collect_changes_prunes_dropped_nodes() {
        let space = space();
        let scratch = |name: &str| {
            let node = crate::node::Node::new_object(space.context(), name, "PumpType").unwrap();
            node.node_id().clone()
        };

        let first = scratch("Scratch1");
        assert!(space.node(&first).is_none());
        assert!(space.context().prune() > 0);

        scratch("Scratch2");
        space.collect_changes();
        assert_eq!(space.context().prune(), 0);
    }

    #[test]
    fn test_collect_changes() {
        let space = space();
        let collector = Arc::new(ChangeCollector::new());
        space.add_observer(collector.clone());

        let pump = space.instantiate("PumpType", "Pump", None).unwrap();
        pump.child("Speed").unwrap().set_value(3.5f64).unwrap();

        let records = space.collect_changes();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].browse_name.name, "Speed");
        assert_eq!(records[0].mask, ChangeMask::VALUE);
        assert_eq!(records[1].node_id, NodeId::OBJECTS_FOLDER);
        assert_eq!(records[1].mask, ChangeMask::CHILDREN);
        assert_eq!(collector.len(), 2);

        assert!(space.collect_changes().is_empty());
    }

    #[test]
    fn test_sequential_ids() {
        let options = AddressSpaceOptions::default()
            .with_namespace_index(2)
            .with_id_strategy(IdStrategy::Sequential);
        let space = AddressSpace::new(registry(), options).unwrap();
        let pump = space.instantiate("PumpType", "Pump", None).unwrap();
        assert!(pump.node_id().is_numeric());
        assert_eq!(pump.node_id().namespace_index, 2);
        let speed = pump.child("Speed").unwrap();
        assert_ne!(speed.node_id(), pump.node_id());
    }
}
