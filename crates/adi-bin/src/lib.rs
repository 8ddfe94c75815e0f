// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # adi-bin
//!
//! CLI binary for building and inspecting ADI address spaces.
//!
//! - CLI argument parsing with clap
//! - Logging initialization
//! - Command implementations (browse, validate, types, version)
//!
//! ## Usage
//!
//! ```bash
//! # Print the address space (default command)
//! adi -c plant.yaml
//!
//! # Print one channel with every optional slot
//! adi browse -p DeviceSet/Analyser1/Channel1 --all
//!
//! # Validate configuration
//! adi validate --strict
//!
//! # List spectrometer types with their slots
//! adi types -b SpectrometerDeviceType --slots
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod cli;
pub mod commands;
pub mod error;
pub mod logging;

pub use cli::{Cli, Commands};
pub use error::{BinError, BinResult};
pub use logging::init_logging;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
