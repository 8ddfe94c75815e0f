// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! The bundled ADI type schema.

use std::sync::Arc;

use adi_core::{ModelSchema, TypeRegistry};

use crate::error::{ModelError, ModelResult};

/// ADI and DI object types, as YAML.
pub const ADI_SCHEMA_YAML: &str = include_str!("../schema/adi.yaml");

/// Parses the bundled ADI schema.
///
/// # Errors
///
/// Returns `Schema` if the bundled document does not parse.
pub fn adi_schema() -> ModelResult<ModelSchema> {
    serde_yaml::from_str(ADI_SCHEMA_YAML).map_err(|e| ModelError::schema(e.to_string()))
}

/// Resolves the ADI schema, extended with `extra` types, into a registry.
///
/// `namespace_uri` replaces the bundled namespace when given.
///
/// # Errors
///
/// Returns `Schema` if the bundled schema does not parse, and `Node` if
/// the combined type set is invalid.
pub fn adi_registry(
    namespace_uri: Option<&str>,
    extra: Option<ModelSchema>,
) -> ModelResult<Arc<TypeRegistry>> {
    let mut schema = adi_schema()?;
    if let Some(uri) = namespace_uri {
        schema.namespace_uri = uri.to_string();
    }
    if let Some(extra) = extra {
        tracing::debug!(types = extra.object_types.len(), "Extending ADI schema");
        schema.extend(extra);
    }
    let registry = TypeRegistry::from_schema(&schema)?;
    tracing::debug!(
        namespace = registry.namespace_uri(),
        types = registry.len(),
        "ADI type registry resolved"
    );
    Ok(Arc::new(registry))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::names::types;
    use adi_core::{ObjectTypeSchema, SlotSchema, DataType};

    #[test]
    fn test_bundled_schema_parses() {
        let schema = adi_schema().unwrap();
        assert_eq!(schema.namespace_uri, "http://opcfoundation.org/UA/ADI/");
        assert!(schema.object_type(types::ANALYSER_DEVICE).is_some());
        assert!(schema.object_type(types::ANALYSER_CHANNEL_MAINTENANCE_STATE).is_some());
    }

    #[test]
    fn test_registry_resolves() {
        let registry = adi_registry(None, None).unwrap();
        assert!(registry.is_subtype(types::SPECTROMETER_DEVICE, types::DEVICE));
        assert!(registry.is_subtype(types::DETECTOR, types::TOPOLOGY_ELEMENT));
        assert!(registry.is_subtype(types::FUNCTIONAL_GROUP, adi_core::registry::FOLDER_TYPE));

        let device = registry.require(types::DEVICE).unwrap();
        assert!(device.is_abstract());

        let channel = registry.require(types::ANALYSER_CHANNEL).unwrap();
        assert!(channel.slot("Configuration").unwrap().is_mandatory());
        assert!(channel.slot("ChannelStateMachine").unwrap().is_mandatory());
        assert!(!channel.slot("ChannelId").unwrap().is_mandatory());
    }

    #[test]
    fn test_state_sets() {
        let registry = adi_registry(None, None).unwrap();

        let device_sm = registry.require(types::ANALYSER_DEVICE_STATE_MACHINE).unwrap();
        let decl = device_sm.state_machine().unwrap();
        assert_eq!(decl.initial(), Some("Powerup"));
        assert_eq!(decl.state("Shutdown").unwrap().number, 5);

        let operating = registry.require(types::ANALYSER_CHANNEL_OPERATING_STATE).unwrap();
        let decl = operating.state_machine().unwrap();
        assert_eq!(decl.states().len(), 17);
        assert_eq!(decl.state_by_number(6).unwrap().name, "Execute");
        assert_eq!(
            decl.state("Execute").unwrap().sub_machines,
            vec!["OperatingExecuteSubStateMachine".to_string()]
        );

        let maintenance = registry.require(types::ANALYSER_CHANNEL_MAINTENANCE_STATE).unwrap();
        assert_eq!(maintenance.state_machine().unwrap().initial(), Some("Stopped"));
    }

    #[test]
    fn test_spectrometer_stream_narrows_scaled_data() {
        let registry = adi_registry(None, None).unwrap();
        let stream = registry.require(types::SPECTROMETER_DEVICE_STREAM).unwrap();
        let slot = stream.slot("ScaledData").unwrap();
        assert_eq!(slot.declared_by(), types::SPECTROMETER_DEVICE_STREAM);
        assert!(stream.slot("AcquisitionCounter").is_some());
    }

    #[test]
    fn test_namespace_override_and_extension() {
        let extra = ModelSchema::new("ignored").with_type(
            ObjectTypeSchema::new("PlantSpectrometerType")
                .with_base(types::SPECTROMETER_DEVICE)
                .with_slot(SlotSchema::property("AssetTag", DataType::String)),
        );
        let registry = adi_registry(Some("urn:plant:analysers"), Some(extra)).unwrap();
        assert_eq!(registry.namespace_uri(), "urn:plant:analysers");
        assert!(registry.is_subtype("PlantSpectrometerType", types::ANALYSER_DEVICE));
    }

    #[test]
    fn test_invalid_extension_rejected() {
        let extra = ModelSchema::new("ignored")
            .with_type(ObjectTypeSchema::new("BrokenType").with_base("MissingBaseType"));
        let err = adi_registry(None, Some(extra)).unwrap_err();
        assert!(matches!(err, ModelError::Node(_)));
    }
}
