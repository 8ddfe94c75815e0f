// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! ADI - Analyser Device Integration address-space tool
//!
//! Main binary entry point.

use adi_bin::cli::{Cli, LogFormat};
use adi_bin::error::report_error_and_exit;
use adi_bin::{commands, init_logging};

fn main() {
    let cli = Cli::parse_args();

    // The config's logging section applies when the file is readable;
    // command-line flags win over it.
    let logging = adi_config::load_config(&cli.config)
        .map(|config| config.logging)
        .unwrap_or_default();
    let format = cli.log_format.unwrap_or_else(|| LogFormat::from(logging.format));
    init_logging(cli.effective_log_level(logging.level.as_str()), format);

    if let Err(error) = commands::execute(cli) {
        report_error_and_exit(error);
    }
}
