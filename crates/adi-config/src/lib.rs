// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # adi-config
//!
//! Configuration management for ADI address spaces.
//!
//! ## Features
//!
//! - **Schema Definition**: model settings, devices, channels, streams,
//!   accessory slots and logging
//! - **Multi-Format Support**: YAML, TOML, and JSON configuration files
//! - **Environment Overrides**: `ADI_*` variables override loaded values
//! - **External Schemas**: extra object types loaded through the same pipeline
//!
//! ## Quick Start
//!
//! ```no_run
//! use adi_config::loader::load_config;
//!
//! let config = load_config("adi.yaml").unwrap();
//! println!("Namespace: {}", config.model.namespace_uri);
//! println!("Devices: {}", config.devices.len());
//! ```
//!
//! ## Environment Variables
//!
//! ```text
//! ADI_NAMESPACE_URI=urn:plant:analysers
//! ADI_NAMESPACE_INDEX=2
//! ADI_DEVICES_0_ENABLED=false
//! ADI_LOG_LEVEL=debug
//! ADI_LOG_FORMAT=json
//! ```
//!
//! Values in config files can reference environment variables:
//!
//! ```yaml
//! model:
//!   namespace_uri: "${PLANT_NAMESPACE:urn:plant:default}"
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

// =============================================================================
// Modules
// =============================================================================

pub mod error;
pub mod schema;
pub mod loader;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{ConfigError, ConfigResult};
pub use schema::{
    // Top-level config
    AdiConfig,
    ModelConfig,
    // Devices
    DeviceConfig,
    IdentificationConfig,
    ChannelConfig,
    StreamConfig,
    AccessorySlotConfig,
    AccessoryConfig,
    // Logging config
    LoggingConfig,
    LogLevel,
    LogFormat,
    // Constants
    ADI_NAMESPACE_URI,
    DEFAULT_DEVICE_SET,
};

pub use loader::{
    ConfigLoader,
    ConfigLoaderBuilder,
    ConfigFormat,
    load_config,
    load_config_str,
    parse_log_format,
    parse_log_level,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");

// =============================================================================
// Prelude
// =============================================================================

/// Convenience re-exports for common use cases.
pub mod prelude {
    pub use crate::error::{ConfigError, ConfigResult};
    pub use crate::loader::{load_config, ConfigFormat, ConfigLoader};
    pub use crate::schema::{AdiConfig, ChannelConfig, DeviceConfig, ModelConfig, StreamConfig};
}

// =============================================================================
// Tests
// =============================================================================
