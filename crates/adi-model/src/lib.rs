// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # adi-model
//!
//! The Analyser Device Integration (ADI) companion model on top of
//! `adi-core`.
//!
//! ## Features
//!
//! - **Bundled Schema**: DI and ADI object types and state machines
//! - **Typed Views**: devices, channels, streams and accessories with typed
//!   slot accessors
//! - **Typed Methods**: tuple-typed closures bound as method handlers
//! - **Default Behaviour**: PackML channel commands and mode changes
//! - **Config-driven Build**: an address space from an `adi-config` file
//!
//! ## Quick Start
//!
//! ```no_run
//! use adi_model::prelude::*;
//!
//! let config = adi_config::load_config("adi.yaml").unwrap();
//! let model = ModelBuilder::new(config).build().unwrap();
//! for device in model.devices() {
//!     println!("{} ({} channels)", device.name(), device.channels().len());
//! }
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod error;
pub mod names;
pub mod types;
pub mod schema;
pub mod methods;
pub mod device;
pub mod handlers;
pub mod builder;

pub use error::{ModelError, ModelResult};
pub use types::{AcquisitionResultStatus, AlarmState, ExecutionCycle};
pub use schema::{adi_registry, adi_schema, ADI_SCHEMA_YAML};
pub use methods::{bind, FromInputs, IntoOutputs, TypedHandler};
pub use device::{Accessory, AccessorySlot, AnalyserChannel, AnalyserDevice, Stream};
pub use handlers::{apply_command, install_channel_handlers, install_device_handlers};
pub use builder::{build_model, AdiModel, ModelBuilder};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Convenience re-exports for common use cases.
pub mod prelude {
    pub use crate::builder::{AdiModel, ModelBuilder};
    pub use crate::device::{Accessory, AccessorySlot, AnalyserChannel, AnalyserDevice, Stream};
    pub use crate::error::{ModelError, ModelResult};
    pub use crate::methods::bind;
    pub use crate::types::{AcquisitionResultStatus, ExecutionCycle};
}
