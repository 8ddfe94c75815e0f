// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! CLI argument parsing and command definitions.
//!
//! - `browse`: Build the model and print the address space (default)
//! - `validate`: Validate a configuration file by building its model
//! - `types`: List the object types of the model
//! - `version`: Show version information

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

// =============================================================================
// Main CLI Structure
// =============================================================================

/// ADI - Analyser Device Integration address-space tool
///
/// Builds a typed OPC UA address space for analyser devices from a
/// configuration file and lets you validate and inspect it.
#[derive(Parser, Debug)]
#[command(
    name = "adi",
    author = "Sylvex <contact@sylvex.io>",
    version = adi_model::VERSION,
    about = "Analyser Device Integration (ADI) address-space tool",
    long_about = None,
    propagate_version = true
)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "adi.yaml", env = "ADI_CONFIG", global = true)]
    pub config: PathBuf,

    /// Log level (trace, debug, info, warn, error); defaults to the
    /// configuration file's level
    #[arg(short, long, env = "ADI_LOG_LEVEL", global = true)]
    pub log_level: Option<String>,

    /// Log format
    #[arg(long, env = "ADI_LOG_FORMAT", global = true)]
    pub log_format: Option<LogFormat>,

    /// Enable quiet mode (warnings and errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

// =============================================================================
// Subcommands
// =============================================================================

/// Available subcommands for the ADI CLI.
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Print the address space
    ///
    /// This is the default command when no subcommand is specified.
    Browse(BrowseArgs),

    /// Validate the configuration file
    ///
    /// Loads the configuration and builds its address space without
    /// printing it.
    Validate(ValidateArgs),

    /// List object types
    ///
    /// Lists the ADI types plus any types from the configured schema file.
    Types(TypesArgs),

    /// Show detailed version information
    Version,
}

// =============================================================================
// Command Arguments
// =============================================================================

/// Arguments for the `browse` command.
#[derive(Args, Debug, Default, Clone)]
pub struct BrowseArgs {
    /// Browse path of the subtree root, relative to Objects
    #[arg(short, long)]
    pub path: Option<String>,

    /// Maximum depth below the root
    #[arg(short, long)]
    pub depth: Option<usize>,

    /// Materialize every optional slot before printing
    #[arg(long)]
    pub all: bool,

    /// Output format
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,
}

/// Arguments for the `validate` command.
#[derive(Args, Debug, Default, Clone)]
pub struct ValidateArgs {
    /// Show parsed configuration after validation
    #[arg(short, long)]
    pub show_config: bool,

    /// Output format for validation results
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,

    /// Strict mode: treat warnings as errors
    #[arg(long)]
    pub strict: bool,
}

/// Arguments for the `types` command.
#[derive(Args, Debug, Default, Clone)]
pub struct TypesArgs {
    /// Only list this type and its subtypes
    #[arg(short, long)]
    pub base: Option<String>,

    /// Include the slots of each type
    #[arg(short, long)]
    pub slots: bool,

    /// Output format
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,
}

// =============================================================================
// Enums
// =============================================================================

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    /// Human-readable text format
    #[default]
    Text,
    /// JSON format for structured logging
    Json,
    /// Compact format for minimal output
    Compact,
    /// Multi-line format for development
    Pretty,
}

impl From<adi_config::LogFormat> for LogFormat {
    fn from(format: adi_config::LogFormat) -> Self {
        match format {
            adi_config::LogFormat::Text => Self::Text,
            adi_config::LogFormat::Json => Self::Json,
            adi_config::LogFormat::Compact => Self::Compact,
            adi_config::LogFormat::Pretty => Self::Pretty,
        }
    }
}

/// Output format for command results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text format
    #[default]
    Text,
    /// JSON format for programmatic parsing
    Json,
    /// YAML format
    Yaml,
}

// =============================================================================
// Helper Methods
// =============================================================================

impl Cli {
    /// Parse CLI arguments from the command line.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get the effective command, defaulting to `Browse` if none specified.
    pub fn effective_command(&self) -> Commands {
        self.command
            .clone()
            .unwrap_or_else(|| Commands::Browse(BrowseArgs::default()))
    }

    /// Check if verbose logging is enabled.
    pub fn is_verbose(&self) -> bool {
        self.verbose && !self.quiet
    }

    /// Get the effective log level: flags first, then `--log-level`, then
    /// `fallback`.
    pub fn effective_log_level<'a>(&'a self, fallback: &'a str) -> &'a str {
        if self.quiet {
            "warn"
        } else if self.verbose {
            "debug"
        } else {
            self.log_level.as_deref().unwrap_or(fallback)
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
