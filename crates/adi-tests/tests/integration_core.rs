// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Core Integration Tests
//!
//! Integration tests for the adi-core node model:
//!
//! - Lazy materialization and slot identity
//! - Variable type safety and change detection
//! - Method argument checking
//! - State-machine state sets
//!
//! ## Test Categories
//!
//! - `test_slot_*`: Composite node tests
//! - `test_value_*`: Variable tests
//! - `test_method_*`: Method tests
//! - `test_state_*`: State machine tests
//! - `test_space_*`: Address space tests

use std::sync::Arc;

use adi_core::{
    AddressSpaceOptions, ArgumentDirection, CallContext, ChangeCollector, ChangeDetection, ChangeMask,
    IdStrategy, Node, NodeError, NodeId, StateMachine, Variant, VariantValue,
};
use adi_tests::prelude::*;

// =============================================================================
// Composite Node Tests
// =============================================================================

#[test]
fn test_slot_find_child_is_idempotent() {
    init_test_logging();
    let space = SchemaFixtures::space();
    let channel = space
        .instantiate(SchemaFixtures::CHANNEL_TYPE, "Channel1", None)
        .unwrap();

    let first = channel.find_child("Configuration", true, None).unwrap().unwrap();
    let second = channel.find_child("Configuration", true, None).unwrap().unwrap();
    first.assert_same_node(&second);

    assert!(channel.find_child("Bogus", false, None).unwrap().is_none());
    assert!(channel.find_child("Bogus", true, None).unwrap().is_none());
}

#[test]
fn test_slot_optional_materializes_lazily() {
    let space = SchemaFixtures::space();
    let channel = space
        .instantiate(SchemaFixtures::CHANNEL_TYPE, "Channel1", None)
        .unwrap();

    channel.assert_materialized("Configuration");
    channel.assert_materialized("ChannelStateMachine");
    channel.assert_not_materialized("Status");
    assert!(channel.find_child("Status", false, None).unwrap().is_none());

    let status = channel.find_child("Status", true, None).unwrap().unwrap();
    channel.assert_materialized("Status").assert_same_node(&status);
    assert_eq!(status.parent().unwrap().node_id(), channel.node_id());
}

#[test]
fn test_slot_children_in_declaration_order() {
    let space = SchemaFixtures::space();
    let channel = space
        .instantiate(SchemaFixtures::CHANNEL_TYPE, "Channel1", None)
        .unwrap();
    channel.find_child("Status", true, None).unwrap();
    channel.add_object("FolderType", "Extra").unwrap();

    let names: Vec<String> = channel
        .children()
        .iter()
        .map(|c| c.browse_name().name.clone())
        .collect();
    assert_eq!(names, vec!["Configuration", "Status", "ChannelStateMachine", "Extra"]);
}

#[test]
fn test_slot_replacement_must_be_assignable() {
    let space = SchemaFixtures::space();
    let channel = space
        .instantiate(SchemaFixtures::CHANNEL_TYPE, "Channel1", None)
        .unwrap();

    let wrong = Node::new_object(space.context(), "Status", SchemaFixtures::MACHINE_TYPE).unwrap();
    let err = channel.find_child("Status", true, Some(wrong)).unwrap_err();
    assert!(matches!(err, NodeError::TypeMismatch { .. }));
    channel.assert_not_materialized("Status");

    let folder = Node::new_object(space.context(), "Status", "FolderType").unwrap();
    let status = channel.find_child("Status", true, Some(folder.clone())).unwrap().unwrap();
    status.assert_same_node(&folder);
}

#[test]
fn test_slot_release_and_rematerialize() {
    let space = SchemaFixtures::space();
    let channel = space
        .instantiate(SchemaFixtures::CHANNEL_TYPE, "Channel1", None)
        .unwrap();
    let status = channel.find_child("Status", true, None).unwrap().unwrap();

    let removed = channel.remove_child("Status").unwrap();
    removed.assert_same_node(&status);
    channel.assert_not_materialized("Status");
    assert!(!removed.has_parent());

    let fresh = channel.find_child("Status", true, None).unwrap().unwrap();
    assert!(!fresh.is_same(&status));
}

#[test]
fn test_slot_child_not_found() {
    let space = SchemaFixtures::space();
    let channel = space
        .instantiate(SchemaFixtures::CHANNEL_TYPE, "Channel1", None)
        .unwrap();

    let err = assert_error_category(channel.child("Bogus"), "structure");
    assert!(matches!(err, NodeError::NotFound { ref name, .. } if name == "Bogus"));
}

// =============================================================================
// Variable Tests
// =============================================================================

#[test]
fn test_value_type_safety_keeps_previous_value() {
    let space = SchemaFixtures::space();
    let probe = space.instantiate(SchemaFixtures::PROBE_TYPE, "Probe1", None).unwrap();
    let reading = probe.child("Reading").unwrap();

    reading.assert_value(0.0f64);
    reading.set_value(21.5f64).unwrap();

    let err = assert_error_category(reading.set_value("warm"), "value");
    assert!(matches!(err, NodeError::TypeMismatch { .. }));
    reading.assert_value(21.5f64);

    assert!(reading.set_value(7u32).is_err());
    reading.assert_value(21.5f64);
}

#[test]
fn test_value_rank_enforced() {
    let space = SchemaFixtures::space();
    let probe = space.instantiate(SchemaFixtures::PROBE_TYPE, "Probe1", None).unwrap();
    let spectrum = probe.child("Spectrum").unwrap();

    spectrum.set_value(vec![0.1f64, 0.2, 0.3].into_variant()).unwrap();
    assert!(spectrum.set_value(0.5f64).is_err());

    let values = adi_core::TypedVariable::<Vec<f64>>::new(spectrum).unwrap();
    assert_eq!(values.value().unwrap(), vec![0.1, 0.2, 0.3]);
}

#[test]
fn test_value_empty_always_assignable() {
    let space = SchemaFixtures::space();
    let probe = space.instantiate(SchemaFixtures::PROBE_TYPE, "Probe1", None).unwrap();
    let reading = probe.child("Reading").unwrap();

    reading.set_value(Variant::Empty).unwrap();
    reading.assert_value(Variant::Empty);

    let typed = adi_core::TypedVariable::<f64>::new(reading).unwrap();
    assert!(matches!(typed.value(), Err(NodeError::Cast { .. })));
    assert_eq!(typed.value_opt().unwrap(), None);
}

#[test]
fn test_value_identity_change_detection() {
    let space = SchemaFixtures::space();
    let probe = space.instantiate(SchemaFixtures::PROBE_TYPE, "Probe1", None).unwrap();
    let reading = probe.child("Reading").unwrap();
    reading.set_value(1.0f64).unwrap();
    space.collect_changes();
    reading.assert_clean();

    reading.set_value(1.0f64).unwrap();
    reading.assert_changed(ChangeMask::VALUE);
}

#[test]
fn test_value_equality_change_detection() {
    let space = SchemaFixtures::space_with(
        AddressSpaceOptions::default().with_change_detection(ChangeDetection::Equality),
    );
    let probe = space.instantiate(SchemaFixtures::PROBE_TYPE, "Probe1", None).unwrap();
    let reading = probe.child("Reading").unwrap();
    reading.set_value(1.0f64).unwrap();
    space.collect_changes();

    reading.set_value(1.0f64).unwrap();
    reading.assert_clean();

    reading.set_value(2.0f64).unwrap();
    reading.assert_changed(ChangeMask::VALUE);
}

#[test]
fn test_value_failed_write_does_not_mark() {
    let space = SchemaFixtures::space();
    let probe = space.instantiate(SchemaFixtures::PROBE_TYPE, "Probe1", None).unwrap();
    let reading = probe.child("Reading").unwrap();
    space.collect_changes();

    assert!(reading.set_value("not a number").is_err());
    reading.assert_clean();
}

// =============================================================================
// Method Tests
// =============================================================================

#[test]
fn test_method_count_mismatch_before_handler() {
    let space = SchemaFixtures::space();
    let probe = space.instantiate(SchemaFixtures::PROBE_TYPE, "Probe1", None).unwrap();
    let describe = probe.child("Describe").unwrap();
    let handler = CountingHandler::with_outputs(vec![Variant::from("three")]);
    describe.set_handler(handler.clone()).unwrap();

    let err = describe
        .invoke(&CallContext::new(), probe.node_id(), &[Variant::UInt32(3), Variant::UInt32(4)])
        .unwrap_err();
    assert!(matches!(err, NodeError::ArgumentCountMismatch { expected: 1, actual: 2, .. }));
    assert_eq!(handler.calls(), 0);

    let outputs = describe
        .invoke(&CallContext::new(), probe.node_id(), &[Variant::UInt32(3)])
        .unwrap();
    assert_eq!(handler.calls(), 1);
    assert_eq!(outputs, vec![Variant::String("three".to_string())]);
    assert_eq!(handler.recorded_inputs(), vec![vec![Variant::UInt32(3)]]);
}

#[test]
fn test_method_input_type_checked_before_handler() {
    let space = SchemaFixtures::space();
    let probe = space.instantiate(SchemaFixtures::PROBE_TYPE, "Probe1", None).unwrap();
    let describe = probe.child("Describe").unwrap();
    let handler = CountingHandler::new();
    describe.set_handler(handler.clone()).unwrap();

    let err = describe
        .invoke(&CallContext::new(), probe.node_id(), &[Variant::from("three")])
        .unwrap_err();
    match err {
        NodeError::ArgumentTypeMismatch { direction, index, name, .. } => {
            assert_eq!(direction, ArgumentDirection::Input);
            assert_eq!(index, 0);
            assert_eq!(name, "Count");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(handler.calls(), 0);
}

#[test]
fn test_method_outputs_validated() {
    let space = SchemaFixtures::space();
    let probe = space.instantiate(SchemaFixtures::PROBE_TYPE, "Probe1", None).unwrap();
    let describe = probe.child("Describe").unwrap();
    describe
        .register_handler(|_ctx, _object, _inputs, outputs| {
            outputs[0] = Variant::UInt32(1);
            Ok(())
        })
        .unwrap();

    let err = describe
        .invoke(&CallContext::new(), probe.node_id(), &[Variant::UInt32(3)])
        .unwrap_err();
    assert!(matches!(
        err,
        NodeError::ArgumentTypeMismatch { direction: ArgumentDirection::Output, .. }
    ));
}

#[test]
fn test_method_unwritten_output_fails() {
    let space = SchemaFixtures::space();
    let probe = space.instantiate(SchemaFixtures::PROBE_TYPE, "Probe1", None).unwrap();
    let describe = probe.child("Describe").unwrap();
    let handler = CountingHandler::new();
    describe.set_handler(handler.clone()).unwrap();

    let err = describe
        .invoke(&CallContext::new(), probe.node_id(), &[Variant::UInt32(3)])
        .unwrap_err();
    match err {
        NodeError::ArgumentTypeMismatch { direction, index, .. } => {
            assert_eq!(direction, ArgumentDirection::Output);
            assert_eq!(index, 0);
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(handler.calls(), 1);
}

#[test]
fn test_method_not_implemented_and_replacement() {
    let space = SchemaFixtures::space();
    let probe = space.instantiate(SchemaFixtures::PROBE_TYPE, "Probe1", None).unwrap();

    let describe = probe.child("Describe").unwrap();
    let err = space
        .call(&CallContext::new(), probe.node_id(), describe.node_id(), &[Variant::UInt32(1)])
        .unwrap_err();
    assert!(matches!(err, NodeError::NotImplemented { .. }));

    let first = CountingHandler::new();
    let second = CountingHandler::with_outputs(vec![Variant::from("second")]);
    describe.set_handler(first.clone()).unwrap();
    describe.set_handler(second.clone()).unwrap();

    let outputs = space
        .call(&CallContext::new(), probe.node_id(), describe.node_id(), &[Variant::UInt32(1)])
        .unwrap();
    assert_eq!(outputs, vec![Variant::from("second")]);
    assert_eq!(first.calls(), 0);
    assert_eq!(second.calls(), 1);
}

// =============================================================================
// State Machine Tests
// =============================================================================

#[test]
fn test_state_initial_and_valid_transition() {
    let space = SchemaFixtures::space();
    let node = space.instantiate(SchemaFixtures::MACHINE_TYPE, "Machine1", None).unwrap();
    let machine = StateMachine::new(node).unwrap();

    machine.assert_state("Idle");
    machine.set_current_state("Starting").unwrap();
    machine.set_current_state("Operating").unwrap();
    machine.assert_state("Operating");
}

#[test]
fn test_state_invalid_state_keeps_current() {
    let space = SchemaFixtures::space();
    let node = space.instantiate(SchemaFixtures::MACHINE_TYPE, "Machine1", None).unwrap();
    let machine = StateMachine::new(node).unwrap();
    machine.set_current_state("Operating").unwrap();

    let err = assert_error_category(machine.set_current_state("Bogus"), "state");
    assert!(matches!(err, NodeError::InvalidState { ref state, .. } if state == "Bogus"));
    machine.assert_state("Operating");
}

#[test]
fn test_state_direct_write_to_current_state() {
    let space = SchemaFixtures::space();
    let node = space.instantiate(SchemaFixtures::MACHINE_TYPE, "Machine1", None).unwrap();
    let machine = StateMachine::new(node.clone()).unwrap();
    machine.set_current_state("Operating").unwrap();
    let current = node.child("CurrentState").unwrap();
    current.clear_change_masks(false);

    let err = current.set_value(Variant::LocalizedText("Bogus".to_string())).unwrap_err();
    assert!(matches!(err, NodeError::InvalidState { ref state, .. } if state == "Bogus"));
    machine.assert_state("Operating");
    current.assert_clean();

    current.set_value(Variant::LocalizedText("Starting".to_string())).unwrap();
    machine.assert_state("Starting");

    current.set_value(Variant::LocalizedText(String::new())).unwrap();
    assert_eq!(machine.current_state().unwrap(), None);
}

#[test]
fn test_state_numbers() {
    let space = SchemaFixtures::space();
    let node = space.instantiate(SchemaFixtures::MACHINE_TYPE, "Machine1", None).unwrap();
    let machine = StateMachine::new(node).unwrap();

    machine.set_current_state_number(2).unwrap();
    machine.assert_state("Starting");
    assert_eq!(machine.current_state_number().unwrap(), Some(2));
    assert!(machine.set_current_state_number(9).is_err());
    machine.assert_state("Starting");
}

#[test]
fn test_state_machine_requires_state_machine_type() {
    let space = SchemaFixtures::space();
    let probe = space.instantiate(SchemaFixtures::PROBE_TYPE, "Probe1", None).unwrap();
    assert!(StateMachine::new(probe).is_err());
}

// =============================================================================
// Address Space Tests
// =============================================================================

#[test]
fn test_space_path_node_ids() {
    let space = SchemaFixtures::space();
    let channel = space
        .instantiate(SchemaFixtures::CHANNEL_TYPE, "Channel1", None)
        .unwrap();
    let configuration = channel.child("Configuration").unwrap();

    assert_eq!(channel.node_id().to_string(), "ns=1;s=Channel1");
    assert_eq!(configuration.node_id().to_string(), "ns=1;s=Channel1.Configuration");

    let found = space.node(configuration.node_id()).unwrap();
    found.assert_same_node(&configuration);
    let parsed: NodeId = "ns=1;s=Channel1.Configuration".parse().unwrap();
    assert!(space.node(&parsed).is_some());
}

#[test]
fn test_space_sequential_node_ids() {
    let space = SchemaFixtures::space_with(
        AddressSpaceOptions::default().with_id_strategy(IdStrategy::Sequential),
    );
    let first = space.instantiate(SchemaFixtures::PROBE_TYPE, "Probe1", None).unwrap();
    let second = space.instantiate(SchemaFixtures::PROBE_TYPE, "Probe2", None).unwrap();

    assert!(first.node_id().is_numeric());
    assert_ne!(first.node_id(), second.node_id());
}

#[test]
fn test_space_duplicate_browse_name() {
    let space = SchemaFixtures::space();
    space.instantiate(SchemaFixtures::PROBE_TYPE, "Probe1", None).unwrap();
    let err = space
        .instantiate(SchemaFixtures::PROBE_TYPE, "Probe1", None)
        .unwrap_err();
    assert!(matches!(err, NodeError::DuplicateBrowseName { .. }));
}

#[test]
fn test_space_abstract_and_unknown_types() {
    let space = SchemaFixtures::space();
    let err = space
        .instantiate("FiniteStateMachineType", "Machine", None)
        .unwrap_err();
    assert!(matches!(err, NodeError::AbstractType { .. }));

    let err = space.instantiate("BogusType", "Bogus", None).unwrap_err();
    assert!(matches!(err, NodeError::UnknownType { .. }));
}

#[test]
fn test_space_resolve_path_materializes() {
    let space = SchemaFixtures::space();
    space
        .instantiate(SchemaFixtures::CHANNEL_TYPE, "Channel1", None)
        .unwrap();

    assert!(space.find_path("Channel1/Status").unwrap().is_none());
    let status = space.resolve_path("Objects/Channel1/Status").unwrap();
    assert_eq!(status.browse_name().name, "Status");
    assert!(space.find_path("Channel1/Status").unwrap().is_some());

    let err = space.resolve_path("Channel1/Bogus").unwrap_err();
    assert!(matches!(err, NodeError::NotFound { .. }));
}

#[test]
fn test_space_materialize_all_is_idempotent() {
    let space = SchemaFixtures::space();
    space
        .instantiate(SchemaFixtures::CHANNEL_TYPE, "Channel1", None)
        .unwrap();
    space.instantiate(SchemaFixtures::PROBE_TYPE, "Probe1", None).unwrap();

    let created = space.materialize_all().unwrap();
    assert!(created >= 2);
    let count = space.node_count();
    assert_eq!(space.materialize_all().unwrap(), 0);
    assert_eq!(space.node_count(), count);
}

#[test]
fn test_space_collect_changes_notifies_observers() {
    let space = SchemaFixtures::space();
    let probe = space.instantiate(SchemaFixtures::PROBE_TYPE, "Probe1", None).unwrap();
    space.collect_changes();

    let collector = Arc::new(ChangeCollector::new());
    space.add_observer(collector.clone());

    probe.child("Reading").unwrap().set_value(3.5f64).unwrap();
    let records = space.collect_changes();
    assert!(records
        .iter()
        .any(|r| r.browse_name.name == "Reading" && r.mask.contains(ChangeMask::VALUE)));
    assert_eq!(collector.len(), records.len());

    assert!(space.collect_changes().is_empty());
}

#[test]
fn test_space_browse_tree() {
    let space = SchemaFixtures::space();
    space
        .instantiate(SchemaFixtures::CHANNEL_TYPE, "Channel1", None)
        .unwrap();

    let tree = space.browse_tree(None);
    let channel = tree.child("Channel1").unwrap();
    assert_eq!(channel.type_name.as_deref(), Some(SchemaFixtures::CHANNEL_TYPE));
    assert!(channel.child("ChannelStateMachine").is_some());
    assert!(channel.child("Status").is_none());

    let shallow = space.browse_tree(Some(1));
    assert!(shallow.child("Channel1").unwrap().children.is_empty());

    let json = serde_json::to_value(&tree).unwrap();
    assert_eq!(json["children"][0]["browse_name"]["name"], "Channel1");
}
