// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Configuration schema definitions.
//!
//! # Schema Structure
//!
//! ```text
//! AdiConfig
//! ├── model: ModelConfig
//! ├── devices: Vec<DeviceConfig>
//! │   ├── channels: Vec<ChannelConfig>
//! │   │   └── streams: Vec<StreamConfig>
//! │   └── accessory_slots: Vec<AccessorySlotConfig>
//! │       └── accessories: Vec<AccessoryConfig>
//! └── logging: LoggingConfig
//! ```
//!
//! Device, stream and accessory type names are checked against the type
//! registry when the address space is built, not here.

use std::collections::HashSet;
use std::path::PathBuf;

use adi_core::{AddressSpaceOptions, ChangeDetection, IdStrategy};
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};

// =============================================================================
// Constants
// =============================================================================

/// Namespace URI of the ADI companion model.
pub const ADI_NAMESPACE_URI: &str = "http://opcfoundation.org/UA/ADI/";

/// Default namespace index for model instances.
pub const DEFAULT_NAMESPACE_INDEX: u16 = 1;

/// Default name of the folder devices are organized under.
pub const DEFAULT_DEVICE_SET: &str = "DeviceSet";

/// Default device type.
pub const DEFAULT_DEVICE_TYPE: &str = "AnalyserDeviceType";

/// Default stream type.
pub const DEFAULT_STREAM_TYPE: &str = "StreamType";

/// Default accessory type.
pub const DEFAULT_ACCESSORY_TYPE: &str = "AccessoryType";

// =============================================================================
// Top-Level Configuration
// =============================================================================

/// The root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AdiConfig {
    /// Model and address-space settings.
    #[serde(default)]
    pub model: ModelConfig,

    /// Analyser devices to instantiate.
    #[serde(default)]
    pub devices: Vec<DeviceConfig>,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AdiConfig {
    /// Validates the entire configuration.
    ///
    /// Checks the model settings, legal and unique device names, and unique
    /// channel, stream and accessory names within their owners.
    pub fn validate(&self) -> ConfigResult<()> {
        self.model.validate()?;

        let mut names = HashSet::new();
        for device in &self.devices {
            validate_name("devices.name", &device.name)?;
            if !names.insert(device.name.as_str()) {
                return Err(ConfigError::duplicate_device(&device.name));
            }
            device.validate()?;
        }

        self.logging.validate()?;
        Ok(())
    }

    /// Returns a device configuration by name.
    pub fn device(&self, name: &str) -> Option<&DeviceConfig> {
        self.devices.iter().find(|d| d.name == name)
    }

    /// Returns the enabled devices.
    pub fn enabled_devices(&self) -> impl Iterator<Item = &DeviceConfig> {
        self.devices.iter().filter(|d| d.enabled)
    }
}

// =============================================================================
// Model Configuration
// =============================================================================

/// Model and address-space settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModelConfig {
    /// Namespace URI of instance nodes.
    #[serde(default = "default_namespace_uri")]
    pub namespace_uri: String,

    /// Namespace index of instance nodes. Must be at least 1.
    #[serde(default = "default_namespace_index")]
    pub namespace_index: u16,

    /// How value writes are detected as changes.
    #[serde(default)]
    pub change_detection: ChangeDetection,

    /// How node ids are assigned.
    #[serde(default)]
    pub id_strategy: IdStrategy,

    /// Folder under `Objects` that devices are organized in.
    #[serde(default = "default_device_set")]
    pub device_set: String,

    /// Extra schema file whose types are added to the built-in ADI types.
    #[serde(default)]
    pub schema_file: Option<PathBuf>,

    /// Materialize every optional slot after building.
    #[serde(default)]
    pub materialize_optional: bool,
}

impl ModelConfig {
    /// Validates the model settings.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.namespace_uri.trim().is_empty() {
            return Err(ConfigError::validation(
                "model.namespace_uri",
                "must not be empty",
            ));
        }
        if self.namespace_index == 0 {
            return Err(ConfigError::out_of_range(
                "model.namespace_index",
                self.namespace_index,
                1,
                u16::MAX,
            ));
        }
        validate_name("model.device_set", &self.device_set)?;
        Ok(())
    }

    /// Returns the address-space options these settings describe.
    pub fn address_space_options(&self) -> AddressSpaceOptions {
        AddressSpaceOptions::default()
            .with_namespace_index(self.namespace_index)
            .with_change_detection(self.change_detection)
            .with_id_strategy(self.id_strategy)
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            namespace_uri: default_namespace_uri(),
            namespace_index: DEFAULT_NAMESPACE_INDEX,
            change_detection: ChangeDetection::default(),
            id_strategy: IdStrategy::default(),
            device_set: default_device_set(),
            schema_file: None,
            materialize_optional: false,
        }
    }
}

fn default_namespace_uri() -> String {
    ADI_NAMESPACE_URI.to_string()
}

fn default_namespace_index() -> u16 {
    DEFAULT_NAMESPACE_INDEX
}

fn default_device_set() -> String {
    DEFAULT_DEVICE_SET.to_string()
}

fn default_enabled() -> bool {
    true
}

// =============================================================================
// Device Configuration
// =============================================================================

/// One analyser device.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeviceConfig {
    /// Browse name of the device object.
    pub name: String,

    /// Object type, an `AnalyserDeviceType` subtype.
    #[serde(rename = "type", default = "default_device_type")]
    pub device_type: String,

    /// Description.
    #[serde(default)]
    pub description: Option<String>,

    /// Whether the device is instantiated.
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Identification properties.
    #[serde(default)]
    pub identification: IdentificationConfig,

    /// Analyser channels.
    #[serde(default)]
    pub channels: Vec<ChannelConfig>,

    /// Accessory slots.
    #[serde(default)]
    pub accessory_slots: Vec<AccessorySlotConfig>,
}

impl DeviceConfig {
    /// Validates channel and accessory-slot names.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.device_type.trim().is_empty() {
            return Err(ConfigError::validation(
                format!("devices.{}.type", self.name),
                "must not be empty",
            ));
        }

        let mut channels = HashSet::new();
        for channel in &self.channels {
            validate_name(&format!("devices.{}.channels.name", self.name), &channel.name)?;
            if !channels.insert(channel.name.as_str()) {
                return Err(ConfigError::duplicate_child(&self.name, "channel", &channel.name));
            }
            channel.validate(&self.name)?;
        }

        let mut slots = HashSet::new();
        for slot in &self.accessory_slots {
            validate_name(&format!("devices.{}.accessory_slots.name", self.name), &slot.name)?;
            if !slots.insert(slot.name.as_str()) || channels.contains(slot.name.as_str()) {
                return Err(ConfigError::duplicate_child(&self.name, "accessory slot", &slot.name));
            }
            slot.validate(&self.name)?;
        }
        Ok(())
    }
}

fn default_device_type() -> String {
    DEFAULT_DEVICE_TYPE.to_string()
}

/// Identification properties of a device or accessory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IdentificationConfig {
    /// Manufacturer name.
    #[serde(default)]
    pub manufacturer: Option<String>,

    /// Model name.
    #[serde(default)]
    pub model: Option<String>,

    /// Serial number.
    #[serde(default)]
    pub serial_number: Option<String>,

    /// Hardware revision.
    #[serde(default)]
    pub hardware_revision: Option<String>,

    /// Software revision.
    #[serde(default)]
    pub software_revision: Option<String>,

    /// Device revision.
    #[serde(default)]
    pub device_revision: Option<String>,

    /// Address of the user manual.
    #[serde(default)]
    pub device_manual: Option<String>,
}

impl IdentificationConfig {
    /// Returns `true` if no property is set.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

// =============================================================================
// Channel & Stream Configuration
// =============================================================================

/// One analyser channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChannelConfig {
    /// Browse name of the channel object.
    pub name: String,

    /// Channel identifier. Defaults to the name.
    #[serde(default)]
    pub channel_id: Option<String>,

    /// Description.
    #[serde(default)]
    pub description: Option<String>,

    /// Whether the channel is enabled.
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Streams of the channel.
    #[serde(default)]
    pub streams: Vec<StreamConfig>,
}

impl ChannelConfig {
    /// Returns the channel identifier.
    pub fn channel_id(&self) -> &str {
        self.channel_id.as_deref().unwrap_or(&self.name)
    }

    fn validate(&self, device: &str) -> ConfigResult<()> {
        let owner = format!("{}/{}", device, self.name);
        let mut streams = HashSet::new();
        for stream in &self.streams {
            validate_name(&format!("devices.{}.streams.name", owner), &stream.name)?;
            if !streams.insert(stream.name.as_str()) {
                return Err(ConfigError::duplicate_child(&owner, "stream", &stream.name));
            }
            if stream.stream_type.trim().is_empty() {
                return Err(ConfigError::validation(
                    format!("devices.{}.streams.{}.type", owner, stream.name),
                    "must not be empty",
                ));
            }
        }
        Ok(())
    }
}

/// One stream of a channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StreamConfig {
    /// Browse name of the stream object.
    pub name: String,

    /// Object type, a `StreamType` subtype.
    #[serde(rename = "type", default = "default_stream_type")]
    pub stream_type: String,

    /// Description.
    #[serde(default)]
    pub description: Option<String>,

    /// Whether the stream is enabled.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_stream_type() -> String {
    DEFAULT_STREAM_TYPE.to_string()
}

// =============================================================================
// Accessory Configuration
// =============================================================================

/// One accessory slot.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AccessorySlotConfig {
    /// Browse name of the slot object.
    pub name: String,

    /// Whether accessories can be swapped while running.
    #[serde(default)]
    pub hot_swappable: bool,

    /// Whether the slot is enabled.
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Installed accessories.
    #[serde(default)]
    pub accessories: Vec<AccessoryConfig>,
}

impl AccessorySlotConfig {
    fn validate(&self, device: &str) -> ConfigResult<()> {
        let owner = format!("{}/{}", device, self.name);
        let mut accessories = HashSet::new();
        for accessory in &self.accessories {
            validate_name(&format!("devices.{}.accessories.name", owner), &accessory.name)?;
            if !accessories.insert(accessory.name.as_str()) {
                return Err(ConfigError::duplicate_child(&owner, "accessory", &accessory.name));
            }
        }
        Ok(())
    }
}

/// One accessory installed in a slot.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AccessoryConfig {
    /// Browse name of the accessory object.
    pub name: String,

    /// Object type, an `AccessoryType` subtype.
    #[serde(rename = "type", default = "default_accessory_type")]
    pub accessory_type: String,

    /// Identification properties.
    #[serde(default)]
    pub identification: IdentificationConfig,
}

fn default_accessory_type() -> String {
    DEFAULT_ACCESSORY_TYPE.to_string()
}

// =============================================================================
// Logging Configuration
// =============================================================================

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Log level.
    #[serde(default)]
    pub level: LogLevel,

    /// Log format.
    #[serde(default)]
    pub format: LogFormat,

    /// Include span targets in logs.
    #[serde(default = "default_enabled")]
    pub with_target: bool,

    /// Include file/line in logs.
    #[serde(default)]
    pub with_file: bool,

    /// Include thread IDs in logs.
    #[serde(default)]
    pub with_thread_ids: bool,
}

impl LoggingConfig {
    /// Validates the logging configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::default(),
            format: LogFormat::default(),
            with_target: true,
            with_file: false,
            with_thread_ids: false,
        }
    }
}

/// Log level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Trace level.
    Trace,
    /// Debug level.
    Debug,
    /// Info level.
    #[default]
    Info,
    /// Warning level.
    Warn,
    /// Error level.
    Error,
}

impl LogLevel {
    /// Returns the filter directive for this level.
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// Log format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable single-line format.
    #[default]
    Text,
    /// Compact format.
    Compact,
    /// Multi-line format for development.
    Pretty,
    /// JSON format for log shipping.
    Json,
}

impl LogFormat {
    /// Returns the format name.
    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::Text => "text",
            LogFormat::Compact => "compact",
            LogFormat::Pretty => "pretty",
            LogFormat::Json => "json",
        }
    }
}

// =============================================================================
// Helpers
// =============================================================================

/// Checks that `name` can be used as a browse name.
///
/// Names must be non-empty, without surrounding whitespace, and must not
/// contain `/` (path separator) or `.` (path node-id separator).
pub fn validate_name(field: &str, name: &str) -> ConfigResult<()> {
    let problem = if name.is_empty() {
        Some("must not be empty")
    } else if name.trim() != name {
        Some("must not start or end with whitespace")
    } else if name.contains('/') || name.contains('.') {
        Some("must not contain '/' or '.'")
    } else if name.chars().any(char::is_control) {
        Some("must not contain control characters")
    } else {
        None
    };
    match problem {
        Some(message) => Err(ConfigError::invalid_name(field, name, message)),
        None => Ok(()),
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn device(name: &str) -> DeviceConfig {
        DeviceConfig {
            name: name.to_string(),
            device_type: default_device_type(),
            description: None,
            enabled: true,
            identification: IdentificationConfig::default(),
            channels: Vec::new(),
            accessory_slots: Vec::new(),
        }
    }

    fn channel(name: &str, streams: &[&str]) -> ChannelConfig {
        ChannelConfig {
            name: name.to_string(),
            channel_id: None,
            description: None,
            enabled: true,
            streams: streams
                .iter()
                .map(|s| StreamConfig {
                    name: s.to_string(),
                    stream_type: default_stream_type(),
                    description: None,
                    enabled: true,
                })
                .collect(),
        }
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = AdiConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.model.namespace_uri, ADI_NAMESPACE_URI);
        assert_eq!(config.model.namespace_index, 1);
        assert_eq!(config.model.device_set, "DeviceSet");
    }

    #[test]
    fn test_namespace_index_zero_rejected() {
        let mut config = AdiConfig::default();
        config.model.namespace_index = 0;
        assert!(matches!(config.validate(), Err(ConfigError::OutOfRange { .. })));
    }

    #[test]
    fn test_duplicate_device_rejected() {
        let config = AdiConfig {
            devices: vec![device("Analyser1"), device("Analyser1")],
            ..AdiConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::DuplicateDevice { .. })));
    }

    #[test]
    fn test_duplicate_channel_and_stream_rejected() {
        let mut analyser = device("Analyser1");
        analyser.channels = vec![channel("Channel1", &[]), channel("Channel1", &[])];
        assert!(matches!(
            analyser.validate(),
            Err(ConfigError::DuplicateChild { kind: "channel", .. })
        ));

        let mut analyser = device("Analyser1");
        analyser.channels = vec![channel("Channel1", &["Stream1", "Stream1"])];
        let err = analyser.validate().unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateChild { kind: "stream", .. }));
        assert!(err.to_string().contains("Analyser1/Channel1"));
    }

    #[test]
    fn test_illegal_names_rejected() {
        assert!(validate_name("f", "Channel1").is_ok());
        assert!(validate_name("f", "").is_err());
        assert!(validate_name("f", " Channel").is_err());
        assert!(validate_name("f", "a/b").is_err());
        assert!(validate_name("f", "a.b").is_err());

        let config = AdiConfig {
            devices: vec![device("Bad/Name")],
            ..AdiConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::InvalidName { .. })));
    }

    #[test]
    fn test_channel_id_defaults_to_name() {
        let mut ch = channel("Channel1", &[]);
        assert_eq!(ch.channel_id(), "Channel1");
        ch.channel_id = Some("CH-01".to_string());
        assert_eq!(ch.channel_id(), "CH-01");
    }

    #[test]
    fn test_address_space_options() {
        let model = ModelConfig {
            namespace_index: 3,
            change_detection: ChangeDetection::Equality,
            id_strategy: IdStrategy::Sequential,
            ..ModelConfig::default()
        };
        let options = model.address_space_options();
        assert_eq!(options.namespace_index, 3);
        assert_eq!(options.change_detection, ChangeDetection::Equality);
        assert_eq!(options.id_strategy, IdStrategy::Sequential);
    }

    #[test]
    fn test_unknown_strategy_rejected_on_parse() {
        let result: Result<ModelConfig, _> = serde_json::from_str(r#"{"id_strategy": "random"}"#);
        assert!(result.is_err());
    }
}
