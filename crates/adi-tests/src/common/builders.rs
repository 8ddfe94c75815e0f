// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Test Builders
//!
//! Fluent construction of configurations. Each call appends to the most
//! recently added owner: `channel` to the last device, `stream` to the
//! last channel, `accessory` to the last slot.

use adi_config::{
    AccessoryConfig, AccessorySlotConfig, AdiConfig, ChannelConfig, DeviceConfig,
    IdentificationConfig, StreamConfig,
};
use adi_core::{ChangeDetection, IdStrategy};

// =============================================================================
// Config Builder
// =============================================================================

/// Builder for [`AdiConfig`] instances.
#[derive(Debug, Clone, Default)]
pub struct ConfigBuilder {
    config: AdiConfig,
}

impl ConfigBuilder {
    /// Create a new builder with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the model namespace URI.
    pub fn namespace_uri(mut self, uri: impl Into<String>) -> Self {
        self.config.model.namespace_uri = uri.into();
        self
    }

    /// Set the node-id strategy.
    pub fn id_strategy(mut self, strategy: IdStrategy) -> Self {
        self.config.model.id_strategy = strategy;
        self
    }

    /// Set the change-detection policy.
    pub fn change_detection(mut self, detection: ChangeDetection) -> Self {
        self.config.model.change_detection = detection;
        self
    }

    /// Materialize every optional slot after building.
    pub fn materialize_optional(mut self, enabled: bool) -> Self {
        self.config.model.materialize_optional = enabled;
        self
    }

    /// Add a device of `device_type`.
    pub fn device(mut self, name: impl Into<String>, device_type: impl Into<String>) -> Self {
        self.config.devices.push(DeviceConfig {
            name: name.into(),
            device_type: device_type.into(),
            description: None,
            enabled: true,
            identification: IdentificationConfig::default(),
            channels: Vec::new(),
            accessory_slots: Vec::new(),
        });
        self
    }

    /// Disable the last device.
    pub fn disabled(mut self) -> Self {
        if let Some(device) = self.config.devices.last_mut() {
            device.enabled = false;
        }
        self
    }

    /// Set the manufacturer and serial number of the last device.
    pub fn identification(mut self, manufacturer: &str, serial_number: &str) -> Self {
        if let Some(device) = self.config.devices.last_mut() {
            device.identification.manufacturer = Some(manufacturer.to_string());
            device.identification.serial_number = Some(serial_number.to_string());
        }
        self
    }

    /// Add a channel to the last device.
    pub fn channel(mut self, name: impl Into<String>) -> Self {
        if let Some(device) = self.config.devices.last_mut() {
            device.channels.push(ChannelConfig {
                name: name.into(),
                channel_id: None,
                description: None,
                enabled: true,
                streams: Vec::new(),
            });
        }
        self
    }

    /// Add a stream to the last channel of the last device.
    pub fn stream(mut self, name: impl Into<String>, stream_type: Option<&str>) -> Self {
        let channel = self
            .config
            .devices
            .last_mut()
            .and_then(|device| device.channels.last_mut());
        if let Some(channel) = channel {
            channel.streams.push(StreamConfig {
                name: name.into(),
                stream_type: stream_type.unwrap_or("StreamType").to_string(),
                description: None,
                enabled: true,
            });
        }
        self
    }

    /// Add an accessory slot to the last device.
    pub fn slot(mut self, name: impl Into<String>, hot_swappable: bool) -> Self {
        if let Some(device) = self.config.devices.last_mut() {
            device.accessory_slots.push(AccessorySlotConfig {
                name: name.into(),
                hot_swappable,
                enabled: true,
                accessories: Vec::new(),
            });
        }
        self
    }

    /// Add an accessory to the last slot of the last device.
    pub fn accessory(mut self, name: impl Into<String>, accessory_type: impl Into<String>) -> Self {
        let slot = self
            .config
            .devices
            .last_mut()
            .and_then(|device| device.accessory_slots.last_mut());
        if let Some(slot) = slot {
            slot.accessories.push(AccessoryConfig {
                name: name.into(),
                accessory_type: accessory_type.into(),
                identification: IdentificationConfig::default(),
            });
        }
        self
    }

    /// Build the configuration.
    pub fn build(self) -> AdiConfig {
        self.config
    }
}
