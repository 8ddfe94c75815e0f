// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # adi-core
//!
//! Typed, extensible address-space node model for OPC UA companion models.
//!
//! This crate provides the node layer the ADI model is built on:
//!
//! - **Node**: identity, parent back-reference and change mask
//! - **Variable**: typed value with data type and value rank checks
//! - **Method**: declared arguments and a pluggable call handler
//! - **Object**: declared slots with lazy materialization plus generic children
//! - **StateMachine**: current state constrained to a declared state set
//! - **Schema / Registry**: declarative type descriptors resolved once
//! - **AddressSpace**: the `Objects` folder, path lookup, calls, change polling
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use adi_core::prelude::*;
//!
//! let schema = ModelSchema::new("urn:example:adi").with_type(
//!     ObjectTypeSchema::new("ChannelType")
//!         .with_slot(SlotSchema::variable("Temperature", DataType::Double).optional())
//!         .with_slot(
//!             SlotSchema::method("Reset")
//!                 .with_input(ArgumentSchema::new("Level", DataType::UInt32)),
//!         ),
//! );
//! let registry = Arc::new(TypeRegistry::from_schema(&schema).unwrap());
//! let space = AddressSpace::new(registry, AddressSpaceOptions::default()).unwrap();
//!
//! let channel = space.instantiate("ChannelType", "Channel1", None).unwrap();
//! let temperature = channel.find_child("Temperature", true, None).unwrap().unwrap();
//! temperature.set_value(21.5f64).unwrap();
//! assert!(temperature.set_value("warm").is_err());
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_code)]

// =============================================================================
// Core Modules
// =============================================================================

pub mod error;
pub mod types;
pub mod value;
pub mod change;

// =============================================================================
// Type Modules
// =============================================================================

pub mod schema;
pub mod registry;
pub mod context;

// =============================================================================
// Node Modules
// =============================================================================

pub mod node;
pub mod variable;
pub mod method;
pub mod object;
pub mod state_machine;

// =============================================================================
// Address Space Modules
// =============================================================================

pub mod address_space;
pub mod browse;

// =============================================================================
// Re-exports for convenience
// =============================================================================

pub use error::{ArgumentDirection, ErrorCode, ErrorSeverity, NodeError, NodeResult};
pub use types::{DataType, NodeClass, NodeId, NodeIdentifier, QualifiedName, ValueRank};
pub use value::{Array, ByteString, LocalizedText, StatusCode, Variant, VariantValue};
pub use change::{ChangeCollector, ChangeMask, ChangeObserver, ChangeRecord, TracingObserver};

pub use schema::{
    ArgumentSchema, ModelSchema, ModellingRule, ObjectTypeSchema, SlotClass, SlotSchema,
    StateMachineSchema, StateSchema,
};
pub use registry::{ObjectType, SlotDecl, SlotKind, TypeRegistry};
pub use context::{
    ChangeDetection, IdStrategy, ModelContext, ModelContextBuilder, NodeIdAllocator,
    PathIdAllocator, SequentialIdAllocator, SlotFactory,
};

pub use node::{Node, NodeRef};
pub use variable::{TypedVariable, VariableDecl};
pub use method::{Argument, CallContext, MethodDecl, MethodHandler};
pub use object::default_slot_node;
pub use state_machine::{StateDecl, StateMachine, StateMachineDecl};

pub use address_space::{AddressSpace, AddressSpaceOptions};
pub use browse::{render_tree, BrowseNode};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Commonly used items.
pub mod prelude {
    pub use crate::address_space::{AddressSpace, AddressSpaceOptions};
    pub use crate::change::{ChangeMask, ChangeObserver, ChangeRecord};
    pub use crate::context::{ChangeDetection, IdStrategy, ModelContext};
    pub use crate::error::{NodeError, NodeResult};
    pub use crate::method::{Argument, CallContext, MethodDecl};
    pub use crate::node::{Node, NodeRef};
    pub use crate::registry::TypeRegistry;
    pub use crate::schema::{
        ArgumentSchema, ModelSchema, ModellingRule, ObjectTypeSchema, SlotSchema, StateMachineSchema,
        StateSchema,
    };
    pub use crate::state_machine::StateMachine;
    pub use crate::types::{DataType, NodeClass, NodeId, QualifiedName, ValueRank};
    pub use crate::value::{LocalizedText, Variant, VariantValue};
    pub use crate::variable::{TypedVariable, VariableDecl};
}
