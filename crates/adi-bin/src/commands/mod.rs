// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! CLI command implementations.
//!
//! - `browse`: Print the address space built from the configuration
//! - `validate`: Validate the configuration by building its model
//! - `types`: List object types
//! - `version`: Show version information

mod browse;
mod types;
mod validate;
mod version;

pub use browse::browse;
pub use types::types;
pub use validate::validate;
pub use version::version;

use adi_config::AdiConfig;

use crate::cli::{Cli, Commands, OutputFormat};
use crate::error::{BinError, BinResult};

/// Executes the appropriate command based on CLI arguments.
pub fn execute(cli: Cli) -> BinResult<()> {
    match cli.effective_command() {
        Commands::Browse(args) => browse::browse(&cli, args),
        Commands::Validate(args) => validate::validate(&cli, args),
        Commands::Types(args) => types::types(&cli, args),
        Commands::Version => version::version(&cli),
    }
}

/// Loads the configuration file named on the command line.
pub(crate) fn load_config(cli: &Cli) -> BinResult<AdiConfig> {
    if !cli.config.exists() {
        return Err(BinError::config(format!(
            "Configuration file not found: {}",
            cli.config.display()
        )));
    }
    Ok(adi_config::load_config(&cli.config)?)
}

/// Serializes `value` in a machine-readable format.
pub(crate) fn render<T: serde::Serialize>(value: &T, format: OutputFormat) -> BinResult<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(value)?),
        OutputFormat::Yaml => Ok(serde_yaml::to_string(value)?),
        OutputFormat::Text => Err(BinError::output("text output is rendered by the command")),
    }
}
