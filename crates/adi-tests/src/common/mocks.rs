// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Mock Implementations
//!
//! Method handlers that record their invocations.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use adi_core::{CallContext, MethodHandler, NodeId, NodeResult, Variant};
use parking_lot::Mutex;

/// A handler that counts calls, records inputs and writes fixed outputs.
#[derive(Debug, Default)]
pub struct CountingHandler {
    calls: AtomicUsize,
    inputs: Mutex<Vec<Vec<Variant>>>,
    outputs: Vec<Variant>,
}

impl CountingHandler {
    /// Create a handler that writes no outputs.
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Create a handler that writes `outputs` in order.
    pub fn with_outputs(outputs: Vec<Variant>) -> Arc<Self> {
        Arc::new(Self {
            outputs,
            ..Self::default()
        })
    }

    /// Number of calls so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Inputs of every call so far.
    pub fn recorded_inputs(&self) -> Vec<Vec<Variant>> {
        self.inputs.lock().clone()
    }
}

impl MethodHandler for CountingHandler {
    fn call(
        &self,
        _context: &CallContext,
        _object_id: &NodeId,
        inputs: &[Variant],
        outputs: &mut [Variant],
    ) -> NodeResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inputs.lock().push(inputs.to_vec());
        for (slot, value) in outputs.iter_mut().zip(&self.outputs) {
            *slot = value.clone();
        }
        Ok(())
    }
}
