// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Implementation of the `types` command.

use std::sync::Arc;

use adi_config::ConfigLoader;
use adi_core::{ModellingRule, ObjectType, TypeRegistry};
use adi_model::adi_registry;
use serde::Serialize;
use tracing::debug;

use super::{load_config, render};
use crate::cli::{Cli, OutputFormat, TypesArgs};
use crate::error::{BinError, BinResult};

#[derive(Debug, Serialize)]
struct TypeSummary {
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    base: Option<String>,
    #[serde(rename = "abstract")]
    is_abstract: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    states: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    slots: Vec<SlotSummary>,
}

#[derive(Debug, Serialize)]
struct SlotSummary {
    name: String,
    kind: String,
    rule: ModellingRule,
    declared_by: String,
}

/// Executes the `types` command.
///
/// Uses the configuration's namespace and schema file when the
/// configuration file exists, the built-in ADI types otherwise.
pub fn types(cli: &Cli, args: TypesArgs) -> BinResult<()> {
    let registry = load_registry(cli)?;
    let summaries = summarize(&registry, &args)?;

    match args.format {
        OutputFormat::Text => {
            for summary in &summaries {
                print_text(summary);
            }
        }
        format => println!("{}", render(&summaries, format)?),
    }
    Ok(())
}

fn load_registry(cli: &Cli) -> BinResult<Arc<TypeRegistry>> {
    if !cli.config.exists() {
        debug!(path = %cli.config.display(), "No configuration file, listing built-in types");
        return Ok(adi_registry(None, None)?);
    }

    let config = load_config(cli)?;
    let extra = match &config.model.schema_file {
        Some(path) => Some(ConfigLoader::new().load_schema_file(path)?),
        None => None,
    };
    Ok(adi_registry(Some(config.model.namespace_uri.as_str()), extra)?)
}

fn summarize(registry: &TypeRegistry, args: &TypesArgs) -> BinResult<Vec<TypeSummary>> {
    let selected: Vec<Arc<ObjectType>> = match &args.base {
        Some(base) => {
            let root = registry
                .get(base)
                .ok_or_else(|| BinError::not_found(format!("object type '{}'", base)))?;
            std::iter::once(root).chain(registry.subtypes_of(base)).collect()
        }
        None => registry.types().cloned().collect(),
    };

    Ok(selected
        .iter()
        .map(|object_type| TypeSummary {
            name: object_type.name().to_string(),
            base: object_type.base().map(|b| b.name().to_string()),
            is_abstract: object_type.is_abstract(),
            description: object_type.description().map(str::to_string),
            states: object_type
                .state_machine()
                .map(|decl| decl.states().iter().map(|s| s.name.clone()).collect())
                .unwrap_or_default(),
            slots: if args.slots {
                object_type
                    .slots()
                    .map(|slot| SlotSummary {
                        name: slot.name().to_string(),
                        kind: slot.kind().describe(),
                        rule: slot.modelling_rule(),
                        declared_by: slot.declared_by().to_string(),
                    })
                    .collect()
            } else {
                Vec::new()
            },
        })
        .collect())
}

fn print_text(summary: &TypeSummary) {
    let mut line = summary.name.clone();
    if let Some(base) = &summary.base {
        line.push_str(&format!(" : {}", base));
    }
    if summary.is_abstract {
        line.push_str(" (abstract)");
    }
    println!("{}", line);

    if !summary.states.is_empty() {
        println!("    states: {}", summary.states.join(", "));
    }
    for slot in &summary.slots {
        let rule = match slot.rule {
            ModellingRule::Mandatory => "",
            ModellingRule::Optional => " [optional]",
        };
        println!("    {}: {}{}", slot.name, slot.kind, rule);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> Arc<TypeRegistry> {
        adi_registry(None, None).unwrap()
    }

    #[test]
    fn test_summarize_subtypes() {
        let args = TypesArgs {
            base: Some("AnalyserDeviceType".to_string()),
            ..Default::default()
        };
        let summaries = summarize(&registry(), &args).unwrap();
        assert_eq!(summaries[0].name, "AnalyserDeviceType");
        assert!(summaries.iter().any(|s| s.name == "SpectrometerDeviceType"));
        assert!(summaries.iter().all(|s| s.slots.is_empty()));
        assert!(summaries[0].states.is_empty());
    }

    #[test]
    fn test_summarize_with_slots() {
        let args = TypesArgs {
            base: Some("AccessorySlotType".to_string()),
            slots: true,
            ..Default::default()
        };
        let summaries = summarize(&registry(), &args).unwrap();
        let slot_type = &summaries[0];
        assert!(slot_type.slots.iter().any(|s| s.name == "IsHotSwappable"));
        assert!(slot_type.slots.iter().any(|s| s.name == "AccessorySlotStateMachine"));
    }

    #[test]
    fn test_state_machine_states() {
        let args = TypesArgs {
            base: Some("AnalyserDeviceStateMachineType".to_string()),
            ..Default::default()
        };
        let summaries = summarize(&registry(), &args).unwrap();
        assert_eq!(
            summaries[0].states,
            vec!["Powerup", "Operating", "Local", "Maintenance", "Shutdown"]
        );
    }

    #[test]
    fn test_unknown_base() {
        let args = TypesArgs {
            base: Some("BogusType".to_string()),
            ..Default::default()
        };
        let err = summarize(&registry(), &args).unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }
}
