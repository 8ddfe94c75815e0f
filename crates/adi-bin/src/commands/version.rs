// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Implementation of the `version` command.

use crate::cli::Cli;
use crate::error::BinResult;

/// Executes the `version` command to display version information.
pub fn version(_cli: &Cli) -> BinResult<()> {
    println!("ADI - Analyser Device Integration address-space tool");
    println!();
    println!("Version Information:");
    println!("  adi-bin:    {}", env!("CARGO_PKG_VERSION"));
    println!("  adi-core:   {}", adi_core::VERSION);
    println!("  adi-config: {}", adi_config::VERSION);
    println!("  adi-model:  {}", adi_model::VERSION);
    println!();
    println!("Companion Model:");
    println!("  Namespace:  {}", adi_config::ADI_NAMESPACE_URI);
    println!();
    println!("Build Information:");
    println!("  Target:     {}", std::env::consts::ARCH);
    println!("  OS:         {}", std::env::consts::OS);
    println!();
    println!("License: PolyForm Noncommercial License 1.0.0");
    println!("Copyright (c) 2025 Sylvex. All rights reserved.");

    Ok(())
}
