// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Config Integration Tests
//!
//! Integration tests for adi-config feeding the model builder:
//!
//! - Loading YAML, TOML and JSON files
//! - Validation failures
//! - Model settings applied to the address space
//! - Schema file extensions
//!
//! ## Test Categories
//!
//! - `test_config_load_*`: File loading tests
//! - `test_config_validation_*`: Validation tests
//! - `test_config_model_*`: Model settings tests
//! - `test_config_schema_*`: Schema file tests

use adi_config::{load_config, ConfigError, ConfigLoader};
use adi_core::{ChangeDetection, ChangeMask, IdStrategy};
use adi_model::names::{self, types};
use adi_model::{build_model, ModelBuilder, ModelError};
use adi_tests::prelude::*;

// =============================================================================
// Loading Tests
// =============================================================================

#[test]
fn test_config_load_yaml_file() {
    init_test_logging();
    let dir = temp_test_dir("config-yaml");
    let path = write_temp_file(&dir, "plant.yaml", ConfigFixtures::SPECTROMETER_YAML);

    let config = load_config(&path).unwrap();
    assert_eq!(config.model.namespace_uri, "urn:plant:analysers");
    assert_eq!(config.devices.len(), 1);

    let model = build_model(config).unwrap();
    assert_eq!(model.space().context().namespace_uri(), "urn:plant:analysers");
    let device = model.device("Analyser1").unwrap();
    assert_eq!(device.channels().len(), 2);
    assert_eq!(device.accessory_slots().len(), 2);
}

#[test]
fn test_config_load_toml_file() {
    let dir = temp_test_dir("config-toml");
    let path = write_temp_file(&dir, "plant.toml", ConfigFixtures::SPECTROMETER_TOML);

    let model = build_model(load_config(&path).unwrap()).unwrap();
    let stream = model
        .device("Analyser1")
        .unwrap()
        .channel("Channel1")
        .unwrap()
        .stream("Stream1")
        .unwrap();
    assert_eq!(stream.type_name(), types::SPECTROMETER_DEVICE_STREAM);
}

#[test]
fn test_config_load_json_file() {
    let dir = temp_test_dir("config-json");
    let json = serde_json::to_string_pretty(&ConfigFixtures::minimal()).unwrap();
    let path = write_temp_file(&dir, "plant.json", &json);

    let config = load_config(&path).unwrap();
    assert_eq!(config.devices[0].name, "Analyser1");
    assert_eq!(config.devices[0].device_type, types::ANALYSER_DEVICE);
    assert_eq!(config.devices[0].channels[0].streams[0].stream_type, types::STREAM);
}

#[test]
fn test_config_load_placeholder_default() {
    let dir = temp_test_dir("config-env");
    let yaml = r#"
devices:
  - name: Analyser1
    identification:
      serial_number: "${ADI_TESTS_UNSET_SERIAL:SN-FALLBACK}"
"#;
    let path = write_temp_file(&dir, "plant.yaml", yaml);

    let model = build_model(load_config(&path).unwrap()).unwrap();
    let device = model.device("Analyser1").unwrap();
    assert_eq!(device.serial_number().unwrap().value().unwrap(), "SN-FALLBACK");
}

#[test]
fn test_config_load_missing_and_unsupported() {
    let dir = temp_test_dir("config-errors");

    let err = load_config(dir.path().join("absent.yaml")).unwrap_err();
    assert!(matches!(err, ConfigError::FileNotFound { .. }));

    let path = write_temp_file(&dir, "plant.ini", "devices = []");
    let err = load_config(&path).unwrap_err();
    assert!(matches!(err, ConfigError::UnsupportedFormat { .. }));

    let path = write_temp_file(&dir, "broken.yaml", "devices: [\n  - name: ");
    let err = load_config(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
}

// =============================================================================
// Validation Tests
// =============================================================================

#[test]
fn test_config_validation_duplicate_device() {
    let config = ConfigBuilder::new()
        .device("Analyser1", types::ANALYSER_DEVICE)
        .device("Analyser1", types::SPECTROMETER_DEVICE)
        .build();

    assert!(matches!(config.validate(), Err(ConfigError::DuplicateDevice { .. })));
    let err = build_model(config).unwrap_err();
    assert!(matches!(err, ModelError::Config(ConfigError::DuplicateDevice { .. })));
}

#[test]
fn test_config_validation_duplicate_children() {
    let config = ConfigBuilder::new()
        .device("Analyser1", types::ANALYSER_DEVICE)
        .channel("Channel1")
        .channel("Channel1")
        .build();
    assert!(matches!(config.validate(), Err(ConfigError::DuplicateChild { .. })));

    let config = ConfigBuilder::new()
        .device("Analyser1", types::ANALYSER_DEVICE)
        .channel("Channel1")
        .stream("Stream1", None)
        .stream("Stream1", None)
        .build();
    assert!(matches!(config.validate(), Err(ConfigError::DuplicateChild { .. })));
}

#[test]
fn test_config_validation_invalid_name() {
    let config = ConfigBuilder::new()
        .device("Analyser.1", types::ANALYSER_DEVICE)
        .build();
    assert!(matches!(config.validate(), Err(ConfigError::InvalidName { .. })));
}

#[test]
fn test_config_validation_wrong_position_type() {
    let config = ConfigBuilder::new()
        .device("Analyser1", types::ANALYSER_DEVICE)
        .channel("Channel1")
        .stream("Stream1", Some(types::DETECTOR))
        .build();
    let err = build_model(config).unwrap_err();
    assert!(matches!(err, ModelError::WrongType { .. }));

    let config = ConfigBuilder::new().device("Analyser1", "BogusDeviceType").build();
    let err = build_model(config).unwrap_err();
    assert!(matches!(err.as_node_error(), Some(adi_core::NodeError::UnknownType { .. })));
}

// =============================================================================
// Model Settings Tests
// =============================================================================

#[test]
fn test_config_model_disabled_device_skipped() {
    let config = ConfigBuilder::new()
        .device("Analyser1", types::ANALYSER_DEVICE)
        .channel("Channel1")
        .device("Spare", types::ANALYSER_DEVICE)
        .disabled()
        .build();
    let model = build_model(config).unwrap();

    assert_eq!(model.devices().len(), 1);
    assert!(model.device("Spare").is_none());
    assert!(model.space().find_path("DeviceSet/Spare").unwrap().is_none());
}

#[test]
fn test_config_model_sequential_ids() {
    let config = ConfigBuilder::new()
        .id_strategy(IdStrategy::Sequential)
        .device("Analyser1", types::ANALYSER_DEVICE)
        .channel("Channel1")
        .build();
    let model = build_model(config).unwrap();
    let device = model.device("Analyser1").unwrap();

    assert!(device.node().node_id().is_numeric());
    assert!(model.device_set().node_id().is_numeric());
    let found = model.space().node(device.node().node_id()).unwrap();
    found.assert_same_node(device.node());
}

#[test]
fn test_config_model_equality_detection() {
    let config = ConfigBuilder::new()
        .change_detection(ChangeDetection::Equality)
        .device("Analyser1", types::ANALYSER_DEVICE)
        .identification("Sylvex", "SN-1")
        .build();
    let model = build_model(config).unwrap();
    let serial = model.device("Analyser1").unwrap().serial_number().unwrap();

    serial.node().assert_clean();
    serial.set("SN-1".to_string()).unwrap();
    serial.node().assert_clean();
    serial.set("SN-2".to_string()).unwrap();
    serial.node().assert_changed(ChangeMask::VALUE);
}

#[test]
fn test_config_model_materialize_optional() {
    let lazy = build_model(
        ConfigBuilder::new()
            .device("Analyser1", types::ANALYSER_DEVICE)
            .build(),
    )
    .unwrap();
    lazy.device("Analyser1")
        .unwrap()
        .node()
        .assert_not_materialized(names::IDENTIFICATION);

    let eager = build_model(
        ConfigBuilder::new()
            .materialize_optional(true)
            .device("Analyser1", types::ANALYSER_DEVICE)
            .build(),
    )
    .unwrap();
    let device = eager.device("Analyser1").unwrap().node().clone();
    device.assert_materialized(names::IDENTIFICATION);
    device.assert_clean();
    assert!(eager.space().node_count() > lazy.space().node_count());
}

#[test]
fn test_config_model_custom_device_set() {
    let mut config = ConfigFixtures::minimal();
    config.model.device_set = "Analysers".to_string();
    let model = build_model(config).unwrap();

    assert_eq!(model.device_set().browse_name().name, "Analysers");
    let channel = model.space().resolve_path("Analysers/Analyser1/Channel1").unwrap();
    assert_eq!(channel.node_id().to_string(), "ns=1;s=Analysers.Analyser1.Channel1");
}

// =============================================================================
// Schema File Tests
// =============================================================================

const EXTENSION_SCHEMA: &str = r#"
namespace_uri: "urn:plant:extensions"
object_types:
  - name: TitratorDeviceType
    base: AnalyserDeviceType
    description: Automatic titrator.
    slots:
      - { name: Reagent, class: property, data_type: String }
      - { name: DoseVolume, class: variable, data_type: Double, modelling_rule: optional }
"#;

#[test]
fn test_config_schema_file_relative_to_config() {
    let dir = temp_test_dir("config-schema");
    write_temp_file(&dir, "titrator.yaml", EXTENSION_SCHEMA);
    let yaml = r#"
model:
  schema_file: titrator.yaml
devices:
  - name: Titrator1
    type: TitratorDeviceType
    channels:
      - name: Channel1
"#;
    let path = write_temp_file(&dir, "plant.yaml", yaml);

    let config = load_config(&path).unwrap();
    assert!(config.model.schema_file.as_ref().unwrap().is_absolute());

    let model = build_model(config).unwrap();
    let device = model.device("Titrator1").unwrap();
    assert_eq!(device.type_name(), "TitratorDeviceType");
    device.node().assert_materialized("Reagent");
    device.node().assert_not_materialized("DoseVolume");
    assert_eq!(device.channels().len(), 1);
}

#[test]
fn test_config_schema_file_loaded_directly() {
    let dir = temp_test_dir("config-schema-direct");
    let path = write_temp_file(&dir, "titrator.yaml", EXTENSION_SCHEMA);

    let schema = ConfigLoader::new().load_schema_file(&path).unwrap();
    assert_eq!(schema.object_types.len(), 1);

    let config = ConfigBuilder::new()
        .device("Titrator1", "TitratorDeviceType")
        .build();
    let model = ModelBuilder::new(config).with_schema(schema).build().unwrap();
    assert!(model.device("Titrator1").is_some());
}

#[test]
fn test_config_schema_file_missing() {
    let mut config = ConfigFixtures::minimal();
    config.model.schema_file = Some("/nonexistent/types.yaml".into());

    let err = build_model(config).unwrap_err();
    assert!(matches!(err, ModelError::Config(ConfigError::FileNotFound { .. })));
}
