// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Typed views over ADI objects.
//!
//! Each wrapper holds an object node whose type is the named ADI type or a
//! subtype of it, and exposes its slots with their Rust types. The wrappers
//! own no state; cloning one clones the node reference.
//!
//! ```text
//! AnalyserDevice
//! ├── AnalyserChannel*
//! │   └── Stream*
//! └── AccessorySlot*
//!     └── Accessory*
//! ```

use std::fmt;

use adi_core::{
    LocalizedText, NodeClass, NodeError, NodeRef, NodeResult, StateMachine, TypedVariable,
    Variant, VariantValue,
};
use chrono::{DateTime, Utc};

use crate::error::{ModelError, ModelResult};
use crate::names::{self, types};
use crate::types::{AcquisitionResultStatus, ExecutionCycle};

// =============================================================================
// Helpers
// =============================================================================

/// Returns `node` if it is an object of type `expected` or a subtype.
fn checked(node: NodeRef, expected: &str) -> ModelResult<NodeRef> {
    match node.object_type() {
        Some(object_type) if object_type.is_subtype_of(expected) => Ok(node),
        Some(object_type) => Err(ModelError::wrong_type(node.path(), expected, object_type.name())),
        None => Err(ModelError::wrong_type(
            node.path(),
            expected,
            node.node_class().to_string(),
        )),
    }
}

/// Returns a slot node, materializing optional slots.
fn slot(node: &NodeRef, name: &str) -> NodeResult<NodeRef> {
    node.find_child(name, true, None)?
        .ok_or_else(|| NodeError::not_found(node.path(), name))
}

fn variable<T: VariantValue>(node: &NodeRef, name: &str) -> NodeResult<TypedVariable<T>> {
    TypedVariable::new(slot(node, name)?)
}

fn state_machine(node: &NodeRef, name: &str) -> NodeResult<StateMachine> {
    StateMachine::new(slot(node, name)?)
}

fn method(node: &NodeRef, name: &str) -> NodeResult<NodeRef> {
    let child = node.child(name)?;
    if !child.is_method() {
        return Err(NodeError::node_class_mismatch(
            child.path(),
            NodeClass::Method,
            child.node_class(),
        ));
    }
    Ok(child)
}

/// Adds a child object of `type_name`, which must derive from `base`.
fn add_typed(parent: &NodeRef, type_name: &str, base: &str, name: &str) -> ModelResult<NodeRef> {
    let object_type = parent.context().registry().require(type_name)?;
    if !object_type.is_subtype_of(base) {
        return Err(ModelError::wrong_type(name, base, type_name));
    }
    Ok(parent.add_object(type_name, name)?)
}

fn find_typed(parent: &NodeRef, base: &str, name: &str) -> ModelResult<NodeRef> {
    let child = parent.child(name)?;
    checked(child, base)
}

macro_rules! adi_object {
    ($(#[$meta:meta])* $name:ident => $type_name:expr) => {
        $(#[$meta])*
        #[derive(Clone)]
        pub struct $name {
            node: NodeRef,
        }

        impl $name {
            /// Type every wrapped node derives from.
            pub const TYPE_NAME: &'static str = $type_name;

            /// Wraps `node`.
            ///
            /// # Errors
            ///
            /// Returns `WrongType` unless `node` is an object of this type
            /// or a subtype.
            pub fn new(node: NodeRef) -> ModelResult<Self> {
                Ok(Self {
                    node: checked(node, Self::TYPE_NAME)?,
                })
            }

            #[allow(dead_code)]
            pub(crate) fn wrap(node: NodeRef) -> Self {
                Self { node }
            }

            /// Returns the underlying node.
            pub fn node(&self) -> &NodeRef {
                &self.node
            }

            /// Returns the browse name.
            pub fn name(&self) -> &str {
                &self.node.browse_name().name
            }

            /// Returns the concrete type name.
            pub fn type_name(&self) -> &str {
                self.node.object_type().map(|t| t.name()).unwrap_or(Self::TYPE_NAME)
            }

            /// Returns a method of this object.
            pub fn method(&self, name: &str) -> NodeResult<NodeRef> {
                method(&self.node, name)
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_struct(stringify!($name))
                    .field("node_id", self.node.node_id())
                    .field("type", &self.type_name())
                    .finish()
            }
        }
    };
}

// =============================================================================
// AnalyserDevice
// =============================================================================

adi_object! {
    /// An analyser device.
    AnalyserDevice => types::ANALYSER_DEVICE
}

impl AnalyserDevice {
    /// Serial number.
    pub fn serial_number(&self) -> NodeResult<TypedVariable<String>> {
        variable(&self.node, names::SERIAL_NUMBER)
    }

    /// Configuration revision counter.
    pub fn revision_counter(&self) -> NodeResult<TypedVariable<i32>> {
        variable(&self.node, names::REVISION_COUNTER)
    }

    /// Manufacturer name.
    pub fn manufacturer(&self) -> NodeResult<TypedVariable<LocalizedText>> {
        variable(&self.node, names::MANUFACTURER)
    }

    /// Model name.
    pub fn model(&self) -> NodeResult<TypedVariable<LocalizedText>> {
        variable(&self.node, names::MODEL)
    }

    /// Device manual reference.
    pub fn device_manual(&self) -> NodeResult<TypedVariable<String>> {
        variable(&self.node, names::DEVICE_MANUAL)
    }

    /// Overall device revision.
    pub fn device_revision(&self) -> NodeResult<TypedVariable<String>> {
        variable(&self.node, names::DEVICE_REVISION)
    }

    /// Software revision.
    pub fn software_revision(&self) -> NodeResult<TypedVariable<String>> {
        variable(&self.node, names::SOFTWARE_REVISION)
    }

    /// Hardware revision.
    pub fn hardware_revision(&self) -> NodeResult<TypedVariable<String>> {
        variable(&self.node, names::HARDWARE_REVISION)
    }

    /// The Configuration group.
    pub fn configuration(&self) -> NodeResult<NodeRef> {
        slot(&self.node, names::CONFIGURATION)
    }

    /// The Status group.
    pub fn status(&self) -> NodeResult<NodeRef> {
        slot(&self.node, names::STATUS)
    }

    /// The FactorySettings group.
    pub fn factory_settings(&self) -> NodeResult<NodeRef> {
        slot(&self.node, names::FACTORY_SETTINGS)
    }

    /// The device state machine.
    pub fn state_machine(&self) -> NodeResult<StateMachine> {
        state_machine(&self.node, names::ANALYSER_STATE_MACHINE)
    }

    /// Adds a channel of `type_name`, `AnalyserChannelType` when `None`.
    ///
    /// # Errors
    ///
    /// - `WrongType` if the type does not derive from `AnalyserChannelType`
    /// - `Node` for unknown types and duplicate names
    pub fn add_channel(&self, name: &str, type_name: Option<&str>) -> ModelResult<AnalyserChannel> {
        let type_name = type_name.unwrap_or(AnalyserChannel::TYPE_NAME);
        let node = add_typed(&self.node, type_name, AnalyserChannel::TYPE_NAME, name)?;
        AnalyserChannel::new(node)
    }

    /// Returns the channels in insertion order.
    pub fn channels(&self) -> Vec<AnalyserChannel> {
        self.node
            .children_of_type(AnalyserChannel::TYPE_NAME)
            .into_iter()
            .map(|node| AnalyserChannel { node })
            .collect()
    }

    /// Returns a channel by name.
    pub fn channel(&self, name: &str) -> ModelResult<AnalyserChannel> {
        let node = find_typed(&self.node, AnalyserChannel::TYPE_NAME, name)?;
        Ok(AnalyserChannel { node })
    }

    /// Adds an accessory slot.
    pub fn add_accessory_slot(&self, name: &str) -> ModelResult<AccessorySlot> {
        let node = add_typed(&self.node, AccessorySlot::TYPE_NAME, AccessorySlot::TYPE_NAME, name)?;
        AccessorySlot::new(node)
    }

    /// Returns the accessory slots in insertion order.
    pub fn accessory_slots(&self) -> Vec<AccessorySlot> {
        self.node
            .children_of_type(AccessorySlot::TYPE_NAME)
            .into_iter()
            .map(|node| AccessorySlot { node })
            .collect()
    }

    /// Returns an accessory slot by name.
    pub fn accessory_slot(&self, name: &str) -> ModelResult<AccessorySlot> {
        let node = find_typed(&self.node, AccessorySlot::TYPE_NAME, name)?;
        Ok(AccessorySlot { node })
    }
}

// =============================================================================
// AnalyserChannel
// =============================================================================

adi_object! {
    /// A measurement channel of an analyser.
    AnalyserChannel => types::ANALYSER_CHANNEL
}

impl AnalyserChannel {
    /// Channel identifier.
    pub fn channel_id(&self) -> NodeResult<TypedVariable<String>> {
        variable(&self.node, names::CHANNEL_ID)
    }

    /// Whether the channel is enabled.
    pub fn is_enabled(&self) -> NodeResult<TypedVariable<bool>> {
        variable(&self.node, names::IS_ENABLED)
    }

    /// Current execution cycle.
    pub fn execution_cycle(&self) -> NodeResult<TypedVariable<ExecutionCycle>> {
        variable(&self.node, names::EXECUTION_CYCLE)
    }

    /// Vendor subcode of the execution cycle.
    pub fn execution_cycle_subcode(&self) -> NodeResult<TypedVariable<u32>> {
        variable(&self.node, names::EXECUTION_CYCLE_SUBCODE)
    }

    /// Progress of the current cycle in percent.
    pub fn progress(&self) -> NodeResult<TypedVariable<f32>> {
        variable(&self.node, names::PROGRESS)
    }

    /// Stream currently acquired.
    pub fn active_stream(&self) -> NodeResult<TypedVariable<String>> {
        variable(&self.node, names::ACTIVE_STREAM)
    }

    /// The Configuration group.
    pub fn configuration(&self) -> NodeResult<NodeRef> {
        slot(&self.node, names::CONFIGURATION)
    }

    /// The Status group.
    pub fn status(&self) -> NodeResult<NodeRef> {
        slot(&self.node, names::STATUS)
    }

    /// The channel state machine.
    pub fn state_machine(&self) -> NodeResult<StateMachine> {
        state_machine(&self.node, names::CHANNEL_STATE_MACHINE)
    }

    /// The operating sub-machine of the channel state machine.
    pub fn operating_state(&self) -> NodeResult<StateMachine> {
        self.state_machine()?.sub_machine(names::OPERATING_SUB_STATE_MACHINE)
    }

    /// The sub-machine commands currently act on: the one active in the
    /// channel's current mode.
    ///
    /// # Errors
    ///
    /// Returns `InvalidState` when the current mode has no sub-machine.
    pub fn active_mode_state(&self) -> NodeResult<StateMachine> {
        let machine = self.state_machine()?;
        let mode = machine.current_state()?.unwrap_or_default();
        machine
            .active_sub_machines()?
            .into_iter()
            .next()
            .ok_or_else(|| NodeError::invalid_state(machine.node().path(), mode))
    }

    /// Adds a stream of `type_name`, `StreamType` when `None`.
    ///
    /// # Errors
    ///
    /// - `WrongType` if the type does not derive from `StreamType`
    /// - `Node` for unknown types and duplicate names
    pub fn add_stream(&self, name: &str, type_name: Option<&str>) -> ModelResult<Stream> {
        let type_name = type_name.unwrap_or(Stream::TYPE_NAME);
        let node = add_typed(&self.node, type_name, Stream::TYPE_NAME, name)?;
        Stream::new(node)
    }

    /// Returns the streams in insertion order.
    pub fn streams(&self) -> Vec<Stream> {
        self.node
            .children_of_type(Stream::TYPE_NAME)
            .into_iter()
            .map(|node| Stream { node })
            .collect()
    }

    /// Returns a stream by name.
    pub fn stream(&self, name: &str) -> ModelResult<Stream> {
        let node = find_typed(&self.node, Stream::TYPE_NAME, name)?;
        Ok(Stream { node })
    }
}

// =============================================================================
// Stream
// =============================================================================

adi_object! {
    /// A sample stream of a channel.
    Stream => types::STREAM
}

impl Stream {
    /// Whether the stream is enabled.
    pub fn is_enabled(&self) -> NodeResult<TypedVariable<bool>> {
        variable(&self.node, names::IS_ENABLED)
    }

    /// Whether the stream is being acquired.
    pub fn is_active(&self) -> NodeResult<TypedVariable<bool>> {
        variable(&self.node, names::IS_ACTIVE)
    }

    /// Current execution cycle.
    pub fn execution_cycle(&self) -> NodeResult<TypedVariable<ExecutionCycle>> {
        variable(&self.node, names::EXECUTION_CYCLE)
    }

    /// Vendor subcode of the execution cycle.
    pub fn execution_cycle_subcode(&self) -> NodeResult<TypedVariable<u32>> {
        variable(&self.node, names::EXECUTION_CYCLE_SUBCODE)
    }

    /// Progress of the current cycle in percent.
    pub fn progress(&self) -> NodeResult<TypedVariable<f32>> {
        variable(&self.node, names::PROGRESS)
    }

    /// Number of completed acquisitions.
    pub fn acquisition_counter(&self) -> NodeResult<TypedVariable<u32>> {
        variable(&self.node, names::ACQUISITION_COUNTER)
    }

    /// Quality of the last acquisition.
    pub fn acquisition_result_status(&self) -> NodeResult<TypedVariable<AcquisitionResultStatus>> {
        variable(&self.node, names::ACQUISITION_RESULT_STATUS)
    }

    /// End time of the last acquisition.
    pub fn acquisition_end_time(&self) -> NodeResult<TypedVariable<DateTime<Utc>>> {
        variable(&self.node, names::ACQUISITION_END_TIME)
    }

    /// The ScaledData variable. Its declared type depends on the stream type.
    pub fn scaled_data(&self) -> NodeResult<NodeRef> {
        slot(&self.node, names::SCALED_DATA)
    }

    /// The RawData variable.
    pub fn raw_data(&self) -> NodeResult<NodeRef> {
        slot(&self.node, names::RAW_DATA)
    }

    /// The AcquisitionData group.
    pub fn acquisition_data(&self) -> NodeResult<NodeRef> {
        slot(&self.node, names::ACQUISITION_DATA)
    }

    /// Publishes one acquisition result and returns the new counter value.
    ///
    /// The scaled data is written first; if it does not fit the declared
    /// type nothing else changes.
    pub fn record_acquisition(
        &self,
        scaled_data: impl Into<Variant>,
        status: AcquisitionResultStatus,
    ) -> NodeResult<u32> {
        self.scaled_data()?.set_value(scaled_data)?;
        self.acquisition_result_status()?.set(status)?;
        self.acquisition_end_time()?.set(Utc::now())?;
        let counter = self.acquisition_counter()?;
        let next = counter.value_opt()?.unwrap_or(0).wrapping_add(1);
        counter.set(next)?;
        tracing::debug!(
            stream = %self.node.node_id(),
            counter = next,
            status = status.as_str(),
            "Acquisition recorded"
        );
        Ok(next)
    }
}

// =============================================================================
// Accessories
// =============================================================================

adi_object! {
    /// A slot accessories are installed in.
    AccessorySlot => types::ACCESSORY_SLOT
}

impl AccessorySlot {
    /// Whether accessories can be swapped while powered.
    pub fn is_hot_swappable(&self) -> NodeResult<TypedVariable<bool>> {
        variable(&self.node, names::IS_HOT_SWAPPABLE)
    }

    /// Whether the slot is enabled.
    pub fn is_enabled(&self) -> NodeResult<TypedVariable<bool>> {
        variable(&self.node, names::IS_ENABLED)
    }

    /// The slot state machine.
    pub fn state_machine(&self) -> NodeResult<StateMachine> {
        state_machine(&self.node, names::ACCESSORY_SLOT_STATE_MACHINE)
    }

    /// Installs an accessory of `type_name`, `AccessoryType` when `None`.
    pub fn add_accessory(&self, name: &str, type_name: Option<&str>) -> ModelResult<Accessory> {
        let type_name = type_name.unwrap_or(Accessory::TYPE_NAME);
        let node = add_typed(&self.node, type_name, Accessory::TYPE_NAME, name)?;
        Accessory::new(node)
    }

    /// Returns the installed accessories.
    pub fn accessories(&self) -> Vec<Accessory> {
        self.node
            .children_of_type(Accessory::TYPE_NAME)
            .into_iter()
            .map(|node| Accessory { node })
            .collect()
    }

    /// Sets the slot state to `Installed` or `Empty` from its contents.
    pub fn sync_state(&self) -> NodeResult<()> {
        let state = if self.accessories().is_empty() {
            "Empty"
        } else {
            "Installed"
        };
        self.state_machine()?.set_current_state(state)
    }
}

adi_object! {
    /// An accessory installed in a slot.
    Accessory => types::ACCESSORY
}

impl Accessory {
    /// Serial number.
    pub fn serial_number(&self) -> NodeResult<TypedVariable<String>> {
        variable(&self.node, names::SERIAL_NUMBER)
    }

    /// Manufacturer name.
    pub fn manufacturer(&self) -> NodeResult<TypedVariable<LocalizedText>> {
        variable(&self.node, names::MANUFACTURER)
    }

    /// Model name.
    pub fn model(&self) -> NodeResult<TypedVariable<LocalizedText>> {
        variable(&self.node, names::MODEL)
    }

    /// Hardware revision.
    pub fn hardware_revision(&self) -> NodeResult<TypedVariable<String>> {
        variable(&self.node, names::HARDWARE_REVISION)
    }

    /// Software revision.
    pub fn software_revision(&self) -> NodeResult<TypedVariable<String>> {
        variable(&self.node, names::SOFTWARE_REVISION)
    }

    /// The Configuration group.
    pub fn configuration(&self) -> NodeResult<NodeRef> {
        slot(&self.node, names::CONFIGURATION)
    }

    /// The Status group.
    pub fn status(&self) -> NodeResult<NodeRef> {
        slot(&self.node, names::STATUS)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::adi_registry;
    use adi_core::{AddressSpace, AddressSpaceOptions};

    fn space() -> AddressSpace {
        AddressSpace::new(adi_registry(None, None).unwrap(), AddressSpaceOptions::default()).unwrap()
    }

    fn device(space: &AddressSpace) -> AnalyserDevice {
        let node = space
            .instantiate(types::SPECTROMETER_DEVICE, "Analyser1", None)
            .unwrap();
        AnalyserDevice::new(node).unwrap()
    }

    #[test]
    fn test_wrapper_type_check() {
        let space = space();
        let device = device(&space);
        assert_eq!(device.type_name(), types::SPECTROMETER_DEVICE);

        let status = device.status().unwrap();
        let err = AnalyserChannel::new(status).unwrap_err();
        assert!(matches!(err, ModelError::WrongType { .. }));

        let serial = device.serial_number().unwrap().node().clone();
        assert!(matches!(AnalyserDevice::new(serial), Err(ModelError::WrongType { .. })));
    }

    #[test]
    fn test_device_identification() {
        let space = space();
        let device = device(&space);
        device.serial_number().unwrap().set("SN-001".into()).unwrap();
        device.manufacturer().unwrap().set(LocalizedText::new("Acme")).unwrap();
        assert_eq!(device.serial_number().unwrap().value().unwrap(), "SN-001");
        assert_eq!(device.manufacturer().unwrap().value().unwrap().0, "Acme");
        assert_eq!(device.revision_counter().unwrap().value().unwrap(), 0);
        assert_eq!(
            device.state_machine().unwrap().current_state().unwrap().as_deref(),
            Some("Powerup")
        );
    }

    #[test]
    fn test_channels_and_streams() {
        let space = space();
        let device = device(&space);
        let channel = device.add_channel("Channel1", None).unwrap();
        device.add_channel("Channel2", None).unwrap();
        assert_eq!(device.channels().len(), 2);
        assert_eq!(device.channel("Channel2").unwrap().name(), "Channel2");

        let err = device.add_channel("Channel1", None).unwrap_err();
        assert!(matches!(err.as_node_error(), Some(NodeError::DuplicateBrowseName { .. })));

        let err = device.add_channel("Bad", Some(types::STREAM)).unwrap_err();
        assert!(matches!(err, ModelError::WrongType { .. }));

        let stream = channel
            .add_stream("Stream1", Some(types::SPECTROMETER_DEVICE_STREAM))
            .unwrap();
        assert_eq!(channel.streams().len(), 1);
        assert_eq!(stream.type_name(), types::SPECTROMETER_DEVICE_STREAM);
        assert!(matches!(
            device.channel("Status"),
            Err(ModelError::WrongType { .. })
        ));
    }

    #[test]
    fn test_channel_state_machines() {
        let space = space();
        let device = device(&space);
        let channel = device.add_channel("Channel1", None).unwrap();

        let machine = channel.state_machine().unwrap();
        assert_eq!(machine.current_state().unwrap().as_deref(), Some("Operating"));
        let operating = channel.operating_state().unwrap();
        assert_eq!(operating.current_state().unwrap().as_deref(), Some("Stopped"));
        assert!(channel.active_mode_state().unwrap().node().is_same(operating.node()));

        machine.set_current_state("SlaveMode").unwrap();
        let err = channel.active_mode_state().unwrap_err();
        assert!(matches!(err, NodeError::InvalidState { .. }));
    }

    #[test]
    fn test_optional_slot_materialized_on_access() {
        let space = space();
        let device = device(&space);
        let channel = device.add_channel("Channel1", None).unwrap();
        assert!(!channel.node().is_materialized(names::CHANNEL_ID));
        channel.channel_id().unwrap().set("CH-1".into()).unwrap();
        assert!(channel.node().is_materialized(names::CHANNEL_ID));
    }

    #[test]
    fn test_record_acquisition() {
        let space = space();
        let device = device(&space);
        let channel = device.add_channel("Channel1", None).unwrap();
        let stream = channel
            .add_stream("Stream1", Some(types::SPECTROMETER_DEVICE_STREAM))
            .unwrap();

        let spectrum = vec![0.5_f64, 0.75, 1.0].into_variant();
        assert_eq!(stream.record_acquisition(spectrum, AcquisitionResultStatus::Good).unwrap(), 1);
        assert_eq!(
            stream.acquisition_result_status().unwrap().value().unwrap(),
            AcquisitionResultStatus::Good
        );
        assert!(stream.acquisition_end_time().unwrap().value().unwrap() > DateTime::<Utc>::default());

        let err = stream
            .record_acquisition(Variant::String("bad".into()), AcquisitionResultStatus::Bad)
            .unwrap_err();
        assert!(matches!(err, NodeError::TypeMismatch { .. }));
        assert_eq!(stream.acquisition_counter().unwrap().value().unwrap(), 1);
        assert_eq!(
            stream.acquisition_result_status().unwrap().value().unwrap(),
            AcquisitionResultStatus::Good
        );
    }

    #[test]
    fn test_accessory_slots() {
        let space = space();
        let device = device(&space);
        let slot = device.add_accessory_slot("Slot1").unwrap();
        assert_eq!(
            slot.state_machine().unwrap().current_state().unwrap().as_deref(),
            Some("Powerup")
        );
        slot.sync_state().unwrap();
        assert!(slot.state_machine().unwrap().is_in("Empty").unwrap());

        let detector = slot.add_accessory("Detector1", Some(types::DETECTOR)).unwrap();
        detector.serial_number().unwrap().set("D-42".into()).unwrap();
        slot.sync_state().unwrap();
        assert!(slot.state_machine().unwrap().is_in("Installed").unwrap());
        assert_eq!(slot.accessories().len(), 1);
        assert_eq!(device.accessory_slots().len(), 1);

        let err = slot.add_accessory("Bad", Some(types::ANALYSER_CHANNEL)).unwrap_err();
        assert!(matches!(err, ModelError::WrongType { .. }));
    }
}
