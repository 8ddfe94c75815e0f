// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Browse snapshots of a node tree.
//!
//! A [`BrowseNode`] is a serializable, detached copy of a node and its
//! materialized descendants. Browsing never materializes optional slots.
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//! use adi_core::prelude::*;
//! use adi_core::browse::{render_tree, BrowseNode};
//!
//! let space = AddressSpace::new(Arc::new(TypeRegistry::builtin()), AddressSpaceOptions::default()).unwrap();
//! space.instantiate("FolderType", "Devices", None).unwrap();
//!
//! let tree = BrowseNode::from_node(space.objects_folder(), None);
//! assert_eq!(tree.children.len(), 1);
//! assert!(render_tree(&tree).contains("Devices"));
//! ```

use std::fmt;
use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use crate::node::{Node, NodeRef};
use crate::registry::FOLDER_TYPE;
use crate::types::{DataType, NodeClass, NodeId, QualifiedName, ValueRank};

// =============================================================================
// Standard Reference Type Node IDs (OPC UA Part 5)
// =============================================================================

/// Reference types linking a parent to its children.
pub mod reference_types {
    use crate::types::{NodeId, NodeIdentifier};

    /// Organizes - i=35.
    pub const ORGANIZES: NodeId = NodeId {
        namespace_index: 0,
        identifier: NodeIdentifier::Numeric(35),
    };

    /// HasProperty - i=46.
    pub const HAS_PROPERTY: NodeId = NodeId {
        namespace_index: 0,
        identifier: NodeIdentifier::Numeric(46),
    };

    /// HasComponent - i=47.
    pub const HAS_COMPONENT: NodeId = NodeId {
        namespace_index: 0,
        identifier: NodeIdentifier::Numeric(47),
    };
}

// =============================================================================
// BrowseNode
// =============================================================================

/// Snapshot of a node and its materialized children.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrowseNode {
    /// The node ID.
    pub node_id: NodeId,

    /// The browse name.
    pub browse_name: QualifiedName,

    /// The display name.
    pub display_name: String,

    /// The node class.
    pub node_class: NodeClass,

    /// Description (if available).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Type definition node ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_definition: Option<NodeId>,

    /// Object type name (for Object nodes).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,

    /// Reference type from parent to this node.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_type: Option<NodeId>,

    /// Data type (for Variable nodes).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_type: Option<DataType>,

    /// Value rank (for Variable nodes).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_rank: Option<ValueRank>,

    /// Current value rendered as text (for Variable nodes).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,

    /// Method signature (for Method nodes).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,

    /// Whether a call handler is registered (for Method nodes).
    #[serde(default)]
    pub implemented: bool,

    /// Child nodes.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<BrowseNode>,

    /// Depth in the browse tree.
    #[serde(default)]
    pub depth: usize,
}

impl BrowseNode {
    /// Snapshots `node` and its descendants down to `max_depth` levels
    /// below it; `None` for no limit.
    pub fn from_node(node: &NodeRef, max_depth: Option<usize>) -> Self {
        Self::snapshot(node, None, 0, max_depth)
    }

    fn snapshot(node: &NodeRef, parent: Option<&Node>, depth: usize, max_depth: Option<usize>) -> Self {
        let reference_type = parent.map(|parent| match (node.variable_decl(), parent.object_type()) {
            (Some(decl), _) if decl.is_property => reference_types::HAS_PROPERTY,
            (_, Some(parent_type)) if parent_type.is_subtype_of(FOLDER_TYPE) => reference_types::ORGANIZES,
            _ => reference_types::HAS_COMPONENT,
        });

        let children = if max_depth.map_or(true, |max| depth < max) {
            node.children()
                .iter()
                .map(|child| Self::snapshot(child, Some(node.as_ref()), depth + 1, max_depth))
                .collect()
        } else {
            Vec::new()
        };

        Self {
            node_id: node.node_id().clone(),
            browse_name: node.browse_name().clone(),
            display_name: node.display_name(),
            node_class: node.node_class(),
            description: node.description(),
            type_definition: node.type_definition_id(),
            type_name: node.object_type().map(|t| t.name().to_string()),
            reference_type,
            data_type: node.data_type(),
            value_rank: node.value_rank(),
            value: node.value().ok().map(|v| v.to_string()),
            signature: node.method_decl().map(|decl| decl.to_string()),
            implemented: node.has_handler(),
            children,
            depth,
        }
    }

    /// Returns the number of nodes in this snapshot.
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(BrowseNode::count).sum::<usize>()
    }

    /// Returns `true` if this node can have a value (is a Variable).
    pub fn has_value(&self) -> bool {
        self.node_class == NodeClass::Variable
    }

    /// Returns the child with the given browse name.
    pub fn child(&self, name: &str) -> Option<&BrowseNode> {
        self.children.iter().find(|c| c.browse_name.name == name)
    }

    /// Flattens the snapshot depth first.
    pub fn flatten(&self) -> Vec<&BrowseNode> {
        let mut result = vec![self];
        for child in &self.children {
            result.extend(child.flatten());
        }
        result
    }
}

impl fmt::Display for BrowseNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {} ({})", self.node_class, self.display_name, self.node_id)
    }
}

// =============================================================================
// Text rendering
// =============================================================================

/// Renders a snapshot as an indented text tree.
pub fn render_tree(root: &BrowseNode) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", describe(root));
    render_children(root, "", &mut out);
    out
}

fn render_children(node: &BrowseNode, prefix: &str, out: &mut String) {
    let count = node.children.len();
    for (index, child) in node.children.iter().enumerate() {
        let last = index + 1 == count;
        let branch = if last { "└── " } else { "├── " };
        let _ = writeln!(out, "{}{}{}", prefix, branch, describe(child));
        let next = format!("{}{}", prefix, if last { "    " } else { "│   " });
        render_children(child, &next, out);
    }
}

fn describe(node: &BrowseNode) -> String {
    match node.node_class {
        NodeClass::Object => match &node.type_name {
            Some(type_name) => format!("{} : {}", node.browse_name.name, type_name),
            None => node.browse_name.name.clone(),
        },
        NodeClass::Variable => format!(
            "{} = {}{}",
            node.browse_name.name,
            node.value.as_deref().unwrap_or("?"),
            node.data_type.map(|dt| format!(" ({})", dt)).unwrap_or_default()
        ),
        NodeClass::Method => format!(
            "{}{}{}",
            node.browse_name.name,
            node.signature.as_deref().unwrap_or("()"),
            if node.implemented { "" } else { " [no handler]" }
        ),
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::address_space::{AddressSpace, AddressSpaceOptions};
    use crate::registry::TypeRegistry;
    use crate::schema::{ModelSchema, ObjectTypeSchema, SlotSchema};

    fn space() -> AddressSpace {
        let schema = ModelSchema::new("urn:test:browse").with_type(
            ObjectTypeSchema::new("SensorType")
                .with_slot(SlotSchema::property("Serial", DataType::String))
                .with_slot(SlotSchema::variable("Reading", DataType::Double))
                .with_slot(SlotSchema::method("Calibrate"))
                .with_slot(SlotSchema::variable("Spare", DataType::Double).optional()),
        );
        let registry = Arc::new(TypeRegistry::from_schema(&schema).unwrap());
        AddressSpace::new(registry, AddressSpaceOptions::default()).unwrap()
    }

    #[test]
    fn test_snapshot() {
        let space = space();
        let sensor = space.instantiate("SensorType", "Sensor", None).unwrap();
        sensor.child("Reading").unwrap().set_value(1.5f64).unwrap();

        let tree = BrowseNode::from_node(space.objects_folder(), None);
        assert_eq!(tree.count(), 5);
        let sensor = tree.child("Sensor").unwrap();
        assert_eq!(sensor.type_name.as_deref(), Some("SensorType"));
        assert_eq!(sensor.reference_type, Some(reference_types::ORGANIZES));
        assert!(sensor.child("Spare").is_none());

        let serial = sensor.child("Serial").unwrap();
        assert_eq!(serial.reference_type, Some(reference_types::HAS_PROPERTY));
        let reading = sensor.child("Reading").unwrap();
        assert_eq!(reading.value.as_deref(), Some("1.5"));
        assert_eq!(reading.reference_type, Some(reference_types::HAS_COMPONENT));
        assert!(!sensor.child("Calibrate").unwrap().implemented);
    }

    #[test]
    fn test_depth_limit() {
        let space = space();
        space.instantiate("SensorType", "Sensor", None).unwrap();
        let tree = BrowseNode::from_node(space.objects_folder(), Some(1));
        assert_eq!(tree.count(), 2);
        assert_eq!(tree.flatten()[1].depth, 1);
    }

    #[test]
    fn test_render_and_serialize() {
        let space = space();
        space.instantiate("SensorType", "Sensor", None).unwrap();
        let tree = BrowseNode::from_node(space.objects_folder(), None);
        let text = render_tree(&tree);
        assert!(text.starts_with("Objects : FolderType"));
        assert!(text.contains("└── Sensor : SensorType"));
        assert!(text.contains("Calibrate() [no handler]"));

        let json = serde_json::to_string(&tree).unwrap();
        let back: BrowseNode = serde_json::from_str(&json).unwrap();
        assert_eq!(back, tree);
    }
}
