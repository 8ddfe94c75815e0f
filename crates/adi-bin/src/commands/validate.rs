// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Implementation of the `validate` command.

use adi_config::AdiConfig;
use adi_model::{AdiModel, ModelBuilder};
use serde::Serialize;
use tracing::debug;

use super::{load_config, render};
use crate::cli::{Cli, OutputFormat, ValidateArgs};
use crate::error::{BinError, BinResult};

/// Summary of one built device.
#[derive(Debug, Serialize)]
struct DeviceSummary {
    name: String,
    #[serde(rename = "type")]
    type_name: String,
    channels: usize,
    streams: usize,
    accessory_slots: usize,
}

/// Result of a successful validation.
#[derive(Debug, Serialize)]
struct ValidationReport<'a> {
    valid: bool,
    config_path: String,
    namespace_uri: &'a str,
    device_set: &'a str,
    nodes: usize,
    devices: Vec<DeviceSummary>,
    warnings: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    config: Option<&'a AdiConfig>,
}

/// Executes the `validate` command.
///
/// The configuration is valid when its address space builds; warnings flag
/// configurations that build but are probably incomplete.
pub fn validate(cli: &Cli, args: ValidateArgs) -> BinResult<()> {
    let config = load_config(cli)?;
    let warnings = collect_warnings(&config);

    let model = ModelBuilder::new(config.clone())
        .build()
        .map_err(|e| BinError::from(e).with_context("Address space build failed"))?;
    debug!(nodes = model.space().node_count(), "Validation build finished");

    let report = ValidationReport {
        valid: true,
        config_path: cli.config.display().to_string(),
        namespace_uri: &config.model.namespace_uri,
        device_set: &config.model.device_set,
        nodes: model.space().node_count(),
        devices: summarize(&model),
        warnings,
        config: args.show_config.then_some(&config),
    };

    match args.format {
        OutputFormat::Text => print_text(&report)?,
        format => println!("{}", render(&report, format)?),
    }

    if args.strict && !report.warnings.is_empty() {
        return Err(BinError::config(format!(
            "Strict mode: {} warning(s) found",
            report.warnings.len()
        )));
    }

    Ok(())
}

fn print_text(report: &ValidationReport<'_>) -> BinResult<()> {
    println!("✓ Configuration is valid: {}", report.config_path);
    println!();
    println!("Summary:");
    println!("  Namespace: {}", report.namespace_uri);
    println!("  Device set: {}", report.device_set);
    println!("  Nodes: {}", report.nodes);
    for device in &report.devices {
        println!(
            "  - {} ({}): {} channel(s), {} stream(s), {} accessory slot(s)",
            device.name, device.type_name, device.channels, device.streams, device.accessory_slots
        );
    }

    if !report.warnings.is_empty() {
        println!();
        println!("Warnings:");
        for warning in &report.warnings {
            println!("  ⚠ {}", warning);
        }
    }

    if let Some(config) = report.config {
        println!();
        println!("Parsed configuration:");
        print!("{}", serde_yaml::to_string(config)?);
    }
    Ok(())
}

fn summarize(model: &AdiModel) -> Vec<DeviceSummary> {
    model
        .devices()
        .iter()
        .map(|device| {
            let channels = device.channels();
            DeviceSummary {
                name: device.name().to_string(),
                type_name: device.type_name().to_string(),
                channels: channels.len(),
                streams: channels.iter().map(|c| c.streams().len()).sum(),
                accessory_slots: device.accessory_slots().len(),
            }
        })
        .collect()
}

/// Collects non-fatal findings about a configuration.
fn collect_warnings(config: &AdiConfig) -> Vec<String> {
    let mut warnings = Vec::new();

    if config.devices.is_empty() {
        warnings.push("No devices configured".to_string());
    }

    for device in &config.devices {
        if !device.enabled {
            warnings.push(format!("Device '{}' is disabled and will be skipped", device.name));
            continue;
        }
        if device.channels.is_empty() {
            warnings.push(format!("Device '{}' has no channels", device.name));
        }
        if device.identification.is_empty() {
            warnings.push(format!("Device '{}' has no identification", device.name));
        }
        for channel in device.channels.iter().filter(|c| c.streams.is_empty()) {
            warnings.push(format!(
                "Channel '{}/{}' has no streams",
                device.name, channel.name
            ));
        }
        for slot in &device.accessory_slots {
            for accessory in &slot.accessories {
                let identification = &accessory.identification;
                if identification.device_revision.is_some() || identification.device_manual.is_some() {
                    warnings.push(format!(
                        "Accessory '{}/{}/{}': device_revision and device_manual are ignored",
                        device.name, slot.name, accessory.name
                    ));
                }
            }
        }
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use adi_config::{load_config_str, ConfigFormat};
    use clap::Parser;
    use std::io::Write;

    const CONFIG: &str = r#"
devices:
  - name: Analyser1
    identification:
      manufacturer: Sylvex
    channels:
      - name: Channel1
        streams:
          - name: Stream1
  - name: Spare
    enabled: false
"#;

    #[test]
    fn test_collect_warnings() {
        let config = load_config_str(CONFIG, ConfigFormat::Yaml).unwrap();
        let warnings = collect_warnings(&config);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("Spare"));

        let empty = collect_warnings(&AdiConfig::default());
        assert_eq!(empty, vec!["No devices configured".to_string()]);
    }

    #[test]
    fn test_validate_file() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        file.write_all(CONFIG.as_bytes()).unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let cli = Cli::parse_from(["adi", "-c", &path, "validate", "-f", "json"]);
        let Some(crate::cli::Commands::Validate(args)) = cli.command.clone() else {
            panic!("Expected Validate command");
        };
        assert!(validate(&cli, args.clone()).is_ok());

        let strict = ValidateArgs { strict: true, ..args };
        let err = validate(&cli, strict).unwrap_err();
        assert!(err.to_string().contains("Strict mode"));
    }

    #[test]
    fn test_validate_missing_file() {
        let cli = Cli::parse_from(["adi", "-c", "/nonexistent/adi.yaml", "validate"]);
        let err = validate(&cli, ValidateArgs::default()).unwrap_err();
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_validate_wrong_device_type() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        file.write_all(b"devices:\n  - name: Analyser1\n    type: StreamType\n").unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let cli = Cli::parse_from(["adi", "-c", &path, "validate"]);
        let err = validate(&cli, ValidateArgs::default()).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
