// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Builds an address space from configuration.
//!
//! # Build Order
//!
//! ```text
//! 1. Validate configuration
//! 2. Resolve ADI schema (+ schema_file, + extra types)
//! 3. Create address space and the device set folder
//! 4. Instantiate each enabled device with its channels, streams,
//!    accessory slots and accessories
//! 5. Optionally materialize every optional slot
//! 6. Clear build-time change flags
//! ```

use std::fmt;

use adi_config::{
    AccessorySlotConfig, AdiConfig, ChannelConfig, ConfigLoader, DeviceConfig,
    IdentificationConfig,
};
use adi_core::registry::FOLDER_TYPE;
use adi_core::{AddressSpace, LocalizedText, ModelSchema, NodeRef, TypedVariable};
use tracing::{debug, info, warn};

use crate::device::{AccessorySlot, Accessory, AnalyserChannel, AnalyserDevice};
use crate::error::{ModelError, ModelResult};
use crate::handlers::install_device_handlers;
use crate::schema::adi_registry;

// =============================================================================
// AdiModel
// =============================================================================

/// A built ADI address space.
pub struct AdiModel {
    space: AddressSpace,
    device_set: NodeRef,
    devices: Vec<AnalyserDevice>,
}

impl AdiModel {
    /// Returns the address space.
    pub fn space(&self) -> &AddressSpace {
        &self.space
    }

    /// Returns the folder holding the devices.
    pub fn device_set(&self) -> &NodeRef {
        &self.device_set
    }

    /// Returns the devices in configuration order.
    pub fn devices(&self) -> &[AnalyserDevice] {
        &self.devices
    }

    /// Returns a device by name.
    pub fn device(&self, name: &str) -> Option<&AnalyserDevice> {
        self.devices.iter().find(|d| d.name() == name)
    }

    /// Returns the address space, dropping the typed views.
    pub fn into_space(self) -> AddressSpace {
        self.space
    }
}

impl fmt::Debug for AdiModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdiModel")
            .field("device_set", self.device_set.node_id())
            .field("devices", &self.devices.len())
            .field("nodes", &self.space.node_count())
            .finish()
    }
}

// =============================================================================
// ModelBuilder
// =============================================================================

/// Builds an [`AdiModel`] from an [`AdiConfig`].
///
/// # Example
///
/// ```ignore
/// let config = adi_config::load_config("adi.yaml")?;
/// let model = ModelBuilder::new(config).build()?;
/// println!("{} devices", model.devices().len());
/// ```
pub struct ModelBuilder {
    config: AdiConfig,
    extra_schema: Option<ModelSchema>,
    default_handlers: bool,
}

impl ModelBuilder {
    /// Creates a builder.
    pub fn new(config: AdiConfig) -> Self {
        Self {
            config,
            extra_schema: None,
            default_handlers: true,
        }
    }

    /// Adds object types on top of the ADI schema and the configured
    /// schema file.
    pub fn with_schema(mut self, schema: ModelSchema) -> Self {
        match &mut self.extra_schema {
            Some(existing) => existing.extend(schema),
            None => self.extra_schema = Some(schema),
        }
        self
    }

    /// Sets whether the default state-machine handlers are bound.
    /// Enabled by default.
    pub fn with_default_handlers(mut self, enabled: bool) -> Self {
        self.default_handlers = enabled;
        self
    }

    /// Builds the model.
    ///
    /// # Errors
    ///
    /// - `Config` if the configuration or schema file is invalid
    /// - `Node` if the combined schema is invalid or a name collides
    /// - `WrongType` if a configured type does not derive from the ADI type
    ///   its position requires
    pub fn build(self) -> ModelResult<AdiModel> {
        let config = &self.config;
        config.validate()?;

        let mut extra = match &config.model.schema_file {
            Some(path) => Some(ConfigLoader::new().load_schema_file(path)?),
            None => None,
        };
        if let Some(schema) = self.extra_schema {
            match &mut extra {
                Some(existing) => existing.extend(schema),
                None => extra = Some(schema),
            }
        }

        let registry = adi_registry(Some(config.model.namespace_uri.as_str()), extra)?;
        let space = AddressSpace::new(registry, config.model.address_space_options())?;
        let device_set = space.instantiate(FOLDER_TYPE, &config.model.device_set, None)?;

        let mut devices = Vec::new();
        for device_config in config.enabled_devices() {
            let device = build_device(&device_set, device_config)?;
            if self.default_handlers {
                install_device_handlers(&device)?;
            }
            devices.push(device);
        }
        let skipped = config.devices.len() - devices.len();
        if skipped > 0 {
            debug!(skipped, "Disabled devices skipped");
        }

        if config.model.materialize_optional {
            let created = space.materialize_all()?;
            debug!(created, "Optional slots materialized");
        }

        space.objects_folder().clear_change_masks(true);

        info!(
            namespace = %config.model.namespace_uri,
            devices = devices.len(),
            nodes = space.node_count(),
            "ADI model built"
        );

        Ok(AdiModel {
            space,
            device_set,
            devices,
        })
    }
}

/// Builds a model with default settings.
pub fn build_model(config: AdiConfig) -> ModelResult<AdiModel> {
    ModelBuilder::new(config).build()
}

// =============================================================================
// Per-object builders
// =============================================================================

fn check_type(registry_owner: &NodeRef, name: &str, type_name: &str, base: &str) -> ModelResult<()> {
    let object_type = registry_owner.context().registry().require(type_name)?;
    if object_type.is_subtype_of(base) {
        Ok(())
    } else {
        Err(ModelError::wrong_type(name, base, type_name))
    }
}

fn set_description(node: &NodeRef, description: &Option<String>) {
    if description.is_some() {
        node.set_description(description.clone());
    }
}

fn set_text(variable: TypedVariable<String>, value: &Option<String>) -> ModelResult<()> {
    if let Some(value) = value {
        variable.set(value.clone())?;
    }
    Ok(())
}

fn set_localized(variable: TypedVariable<LocalizedText>, value: &Option<String>) -> ModelResult<()> {
    if let Some(value) = value {
        variable.set(LocalizedText::new(value.as_str()))?;
    }
    Ok(())
}

fn build_device(device_set: &NodeRef, config: &DeviceConfig) -> ModelResult<AnalyserDevice> {
    check_type(device_set, &config.name, &config.device_type, AnalyserDevice::TYPE_NAME)?;
    let node = device_set.add_object(&config.device_type, &config.name)?;
    set_description(&node, &config.description);
    let device = AnalyserDevice::new(node)?;

    apply_device_identification(&device, &config.identification)?;

    for channel_config in &config.channels {
        build_channel(&device, channel_config)?;
    }
    for slot_config in &config.accessory_slots {
        build_accessory_slot(&device, slot_config)?;
    }

    debug!(
        device = %config.name,
        type_name = %config.device_type,
        channels = config.channels.len(),
        accessory_slots = config.accessory_slots.len(),
        "Device built"
    );
    Ok(device)
}

fn apply_device_identification(
    device: &AnalyserDevice,
    identification: &IdentificationConfig,
) -> ModelResult<()> {
    set_localized(device.manufacturer()?, &identification.manufacturer)?;
    set_localized(device.model()?, &identification.model)?;
    set_text(device.serial_number()?, &identification.serial_number)?;
    set_text(device.hardware_revision()?, &identification.hardware_revision)?;
    set_text(device.software_revision()?, &identification.software_revision)?;
    set_text(device.device_revision()?, &identification.device_revision)?;
    set_text(device.device_manual()?, &identification.device_manual)?;
    Ok(())
}

fn build_channel(device: &AnalyserDevice, config: &ChannelConfig) -> ModelResult<AnalyserChannel> {
    let channel = device.add_channel(&config.name, None)?;
    set_description(channel.node(), &config.description);
    channel.channel_id()?.set(config.channel_id().to_string())?;
    channel.is_enabled()?.set(config.enabled)?;

    for stream_config in &config.streams {
        let stream = channel.add_stream(&stream_config.name, Some(&stream_config.stream_type))?;
        set_description(stream.node(), &stream_config.description);
        stream.is_enabled()?.set(stream_config.enabled)?;
    }
    Ok(channel)
}

fn build_accessory_slot(device: &AnalyserDevice, config: &AccessorySlotConfig) -> ModelResult<AccessorySlot> {
    let slot = device.add_accessory_slot(&config.name)?;
    slot.is_hot_swappable()?.set(config.hot_swappable)?;
    slot.is_enabled()?.set(config.enabled)?;

    for accessory_config in &config.accessories {
        let accessory =
            slot.add_accessory(&accessory_config.name, Some(&accessory_config.accessory_type))?;
        apply_accessory_identification(&accessory, &accessory_config.identification)?;
    }
    slot.sync_state()?;
    Ok(slot)
}

fn apply_accessory_identification(
    accessory: &Accessory,
    identification: &IdentificationConfig,
) -> ModelResult<()> {
    if identification.device_revision.is_some() || identification.device_manual.is_some() {
        warn!(
            accessory = accessory.name(),
            "device_revision and device_manual are not defined for accessories; ignored"
        );
    }
    set_localized(accessory.manufacturer()?, &identification.manufacturer)?;
    set_localized(accessory.model()?, &identification.model)?;
    set_text(accessory.serial_number()?, &identification.serial_number)?;
    set_text(accessory.hardware_revision()?, &identification.hardware_revision)?;
    set_text(accessory.software_revision()?, &identification.software_revision)?;
    Ok(())
}

// =============================================================================
// Tests
// =============================================================================
