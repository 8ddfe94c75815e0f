// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Custom Test Assertions
//!
//! Domain-specific assertion helpers with informative failure messages.

use adi_core::{ChangeMask, NodeError, NodeRef, StateMachine, Variant};

// =============================================================================
// Node Assertions
// =============================================================================

/// Assertion extensions for nodes.
pub trait NodeAssertions {
    /// Assert that both references point to the same node instance.
    fn assert_same_node(&self, other: &NodeRef);

    /// Assert that the named slot is materialized and return it.
    fn assert_materialized(&self, slot: &str) -> NodeRef;

    /// Assert that the named slot is not materialized.
    fn assert_not_materialized(&self, slot: &str);

    /// Assert the variable's current value.
    fn assert_value(&self, expected: impl Into<Variant>);

    /// Assert that every bit of `mask` is set.
    fn assert_changed(&self, mask: ChangeMask);

    /// Assert that no change bit is set.
    fn assert_clean(&self);
}

impl NodeAssertions for NodeRef {
    fn assert_same_node(&self, other: &NodeRef) {
        assert!(
            self.is_same(other),
            "Expected the same node instance, got {} and {}",
            self.node_id(),
            other.node_id()
        );
    }

    fn assert_materialized(&self, slot: &str) -> NodeRef {
        assert!(
            self.is_materialized(slot),
            "Expected slot '{}' of {} to be materialized",
            slot,
            self.path()
        );
        match self.child(slot) {
            Ok(child) => child,
            Err(e) => panic!("Materialized slot '{}' of {} not found: {}", slot, self.path(), e),
        }
    }

    fn assert_not_materialized(&self, slot: &str) {
        assert!(
            !self.is_materialized(slot),
            "Expected slot '{}' of {} to be absent",
            slot,
            self.path()
        );
    }

    fn assert_value(&self, expected: impl Into<Variant>) {
        let expected = expected.into();
        match self.value() {
            Ok(actual) => assert_eq!(
                actual, expected,
                "Expected value {:?}, but got {:?} for {}",
                expected, actual, self.path()
            ),
            Err(e) => panic!("Cannot read value of {}: {}", self.path(), e),
        }
    }

    fn assert_changed(&self, mask: ChangeMask) {
        assert!(
            self.change_mask().contains(mask),
            "Expected change mask {} on {}, got {}",
            mask,
            self.path(),
            self.change_mask()
        );
    }

    fn assert_clean(&self) {
        assert!(
            self.change_mask().is_empty(),
            "Expected no changes on {}, got {}",
            self.path(),
            self.change_mask()
        );
    }
}

// =============================================================================
// State Machine Assertions
// =============================================================================

/// Assertion extensions for state machines.
pub trait StateMachineAssertions {
    /// Assert the current state.
    fn assert_state(&self, expected: &str);
}

impl StateMachineAssertions for StateMachine {
    fn assert_state(&self, expected: &str) {
        let actual = self.current_state().expect("current state readable");
        assert_eq!(
            actual.as_deref(),
            Some(expected),
            "Expected state '{}' on {}, got {:?}",
            expected,
            self.node().path(),
            actual
        );
    }
}

// =============================================================================
// Error Assertions
// =============================================================================

/// Assert that `result` failed with an error whose category is `category`.
pub fn assert_error_category<T: std::fmt::Debug>(result: Result<T, NodeError>, category: &str) -> NodeError {
    match result {
        Ok(value) => panic!("Expected a '{}' error, got Ok({:?})", category, value),
        Err(e) => {
            assert_eq!(e.category(), category, "Unexpected error: {}", e);
            e
        }
    }
}
