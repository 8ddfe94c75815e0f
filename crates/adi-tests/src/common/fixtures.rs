// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Test Fixtures
//!
//! Pre-built schemas and configuration documents.

use std::sync::Arc;

use adi_config::{load_config_str, AdiConfig, ConfigFormat};
use adi_core::{
    AddressSpace, AddressSpaceOptions, ArgumentSchema, DataType, ModelSchema, ObjectTypeSchema,
    SlotSchema, StateMachineSchema, TypeRegistry, ValueRank,
};
use adi_model::{AdiModel, ModelBuilder};

// =============================================================================
// Schema Fixtures
// =============================================================================

/// Fixture providing small hand-written schemas.
pub struct SchemaFixtures;

impl SchemaFixtures {
    /// Namespace of fixture schemas.
    pub const NAMESPACE: &'static str = "urn:adi-tests:fixtures";

    /// State machine type name with states Idle, Starting and Operating.
    pub const MACHINE_TYPE: &'static str = "MachineStateType";

    /// Object type with a `Describe(Count: UInt32) -> Text: String` method.
    pub const PROBE_TYPE: &'static str = "ProbeType";

    /// Composite type with Configuration, Status and ChannelStateMachine.
    pub const CHANNEL_TYPE: &'static str = "ChannelLikeType";

    /// A state machine with states {Idle, Starting, Operating}, initially Idle.
    pub fn machine_type() -> ObjectTypeSchema {
        ObjectTypeSchema::new(Self::MACHINE_TYPE)
            .with_base("FiniteStateMachineType")
            .with_state_machine(
                StateMachineSchema::from_names(["Idle", "Starting", "Operating"]).with_initial("Idle"),
            )
    }

    /// A probe object with a method, a variable and an optional property.
    pub fn probe_type() -> ObjectTypeSchema {
        ObjectTypeSchema::new(Self::PROBE_TYPE)
            .with_slot(
                SlotSchema::method("Describe")
                    .with_input(ArgumentSchema::new("Count", DataType::UInt32))
                    .with_output(ArgumentSchema::new("Text", DataType::String)),
            )
            .with_slot(SlotSchema::variable("Reading", DataType::Double))
            .with_slot(SlotSchema::variable("Spectrum", DataType::Double).with_rank(ValueRank::ONE_DIMENSION))
            .with_slot(SlotSchema::property("Label", DataType::String).optional())
    }

    /// A channel-like composite with three named slots.
    pub fn channel_type() -> ObjectTypeSchema {
        ObjectTypeSchema::new(Self::CHANNEL_TYPE)
            .with_slot(SlotSchema::object("Configuration", "FolderType"))
            .with_slot(SlotSchema::object("Status", "FolderType").optional())
            .with_slot(SlotSchema::object("ChannelStateMachine", Self::MACHINE_TYPE))
    }

    /// All fixture types in one schema.
    pub fn schema() -> ModelSchema {
        ModelSchema::new(Self::NAMESPACE)
            .with_type(Self::machine_type())
            .with_type(Self::probe_type())
            .with_type(Self::channel_type())
    }

    /// Resolves [`SchemaFixtures::schema`].
    pub fn registry() -> Arc<TypeRegistry> {
        Arc::new(TypeRegistry::from_schema(&Self::schema()).expect("fixture schema must resolve"))
    }

    /// An address space over the fixture schema.
    pub fn space() -> AddressSpace {
        Self::space_with(AddressSpaceOptions::default())
    }

    /// An address space over the fixture schema with custom options.
    pub fn space_with(options: AddressSpaceOptions) -> AddressSpace {
        AddressSpace::new(Self::registry(), options).expect("fixture address space")
    }
}

// =============================================================================
// Config Fixtures
// =============================================================================

/// Fixture providing configuration documents.
pub struct ConfigFixtures;

impl ConfigFixtures {
    /// One spectrometer with two channels and a detector slot.
    pub const SPECTROMETER_YAML: &'static str = r#"
model:
  namespace_uri: "urn:plant:analysers"
devices:
  - name: Analyser1
    type: SpectrometerDeviceType
    description: Inline NIR analyser
    identification:
      manufacturer: Sylvex
      model: NIR-2000
      serial_number: SN-0001
    channels:
      - name: Channel1
        streams:
          - name: Stream1
            type: SpectrometerDeviceStreamType
          - name: Stream2
      - name: Channel2
        channel_id: CH-2
        enabled: false
    accessory_slots:
      - name: DetectorSlot
        hot_swappable: true
        accessories:
          - name: Detector1
            type: DetectorType
            identification:
              serial_number: DET-42
      - name: SpareSlot
"#;

    /// The same plant in TOML.
    pub const SPECTROMETER_TOML: &'static str = r#"
[model]
namespace_uri = "urn:plant:analysers"

[[devices]]
name = "Analyser1"
type = "SpectrometerDeviceType"

[[devices.channels]]
name = "Channel1"

[[devices.channels.streams]]
name = "Stream1"
type = "SpectrometerDeviceStreamType"
"#;

    /// A minimal single-channel analyser.
    pub const MINIMAL_YAML: &'static str = r#"
devices:
  - name: Analyser1
    channels:
      - name: Channel1
        streams:
          - name: Stream1
"#;

    /// Parses [`ConfigFixtures::SPECTROMETER_YAML`].
    pub fn spectrometer() -> AdiConfig {
        load_config_str(Self::SPECTROMETER_YAML, ConfigFormat::Yaml).expect("fixture config")
    }

    /// Parses [`ConfigFixtures::MINIMAL_YAML`].
    pub fn minimal() -> AdiConfig {
        load_config_str(Self::MINIMAL_YAML, ConfigFormat::Yaml).expect("fixture config")
    }

    /// Builds the spectrometer plant with default handlers.
    pub fn spectrometer_model() -> AdiModel {
        ModelBuilder::new(Self::spectrometer())
            .build()
            .expect("fixture model")
    }

    /// Builds the minimal plant with default handlers.
    pub fn minimal_model() -> AdiModel {
        ModelBuilder::new(Self::minimal()).build().expect("fixture model")
    }
}
