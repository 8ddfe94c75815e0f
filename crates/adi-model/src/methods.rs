// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Statically typed method handlers.
//!
//! [`bind`] attaches a closure taking a tuple of Rust values to a method
//! node. Arities are checked against the method signature when binding;
//! values are converted with [`VariantValue`] on every call.
//!
//! ```ignore
//! methods::bind(&channel.method("StartSingleAcquisition")?, |_, _, (cycle, subcode, stream): (ExecutionCycle, u32, String)| {
//!     Ok(())
//! })?;
//! ```

use std::marker::PhantomData;
use std::sync::Arc;

use adi_core::{
    ArgumentDirection, CallContext, MethodDecl, MethodHandler, NodeError, NodeId, NodeRef,
    NodeResult, Variant, VariantValue,
};

// =============================================================================
// Conversion traits
// =============================================================================

/// Input arguments decoded from variants.
pub trait FromInputs: Sized {
    /// Number of arguments.
    const ARITY: usize;

    /// Decodes the arguments of a call to `decl`.
    fn from_inputs(method: &str, decl: &MethodDecl, inputs: &[Variant]) -> NodeResult<Self>;
}

/// Output arguments encoded as variants.
pub trait IntoOutputs {
    /// Number of arguments.
    const ARITY: usize;

    /// Writes the values into `outputs`.
    fn into_outputs(self, outputs: &mut [Variant]);
}

impl FromInputs for () {
    const ARITY: usize = 0;

    fn from_inputs(_method: &str, _decl: &MethodDecl, _inputs: &[Variant]) -> NodeResult<Self> {
        Ok(())
    }
}

impl IntoOutputs for () {
    const ARITY: usize = 0;

    fn into_outputs(self, _outputs: &mut [Variant]) {}
}

fn decode<T: VariantValue>(
    method: &str,
    decl: &MethodDecl,
    inputs: &[Variant],
    index: usize,
) -> NodeResult<T> {
    let value = inputs
        .get(index)
        .ok_or_else(|| NodeError::argument_count_mismatch(method, decl.inputs.len(), inputs.len()))?;
    T::from_variant(value).ok_or_else(|| {
        let name = decl.inputs.get(index).map(|a| a.name.as_str()).unwrap_or_default();
        NodeError::argument_type_mismatch(
            method,
            ArgumentDirection::Input,
            index,
            name,
            T::data_type().to_string(),
            value.type_description(),
        )
    })
}

macro_rules! impl_tuple_arguments {
    ($arity:literal => $($ty:ident : $index:tt),+) => {
        impl<$($ty: VariantValue),+> FromInputs for ($($ty,)+) {
            const ARITY: usize = $arity;

            fn from_inputs(method: &str, decl: &MethodDecl, inputs: &[Variant]) -> NodeResult<Self> {
                Ok(($(decode::<$ty>(method, decl, inputs, $index)?,)+))
            }
        }

        impl<$($ty: VariantValue),+> IntoOutputs for ($($ty,)+) {
            const ARITY: usize = $arity;

            fn into_outputs(self, outputs: &mut [Variant]) {
                $(
                    if let Some(slot) = outputs.get_mut($index) {
                        *slot = self.$index.into_variant();
                    }
                )+
            }
        }
    };
}

impl_tuple_arguments!(1 => A: 0);
impl_tuple_arguments!(2 => A: 0, B: 1);
impl_tuple_arguments!(3 => A: 0, B: 1, C: 2);
impl_tuple_arguments!(4 => A: 0, B: 1, C: 2, D: 3);

// =============================================================================
// TypedHandler
// =============================================================================

/// A [`MethodHandler`] over a closure with typed arguments.
pub struct TypedHandler<I, O, F> {
    method: String,
    decl: Arc<MethodDecl>,
    handler: F,
    _marker: PhantomData<fn(I) -> O>,
}

impl<I, O, F> TypedHandler<I, O, F>
where
    I: FromInputs,
    O: IntoOutputs,
    F: Fn(&CallContext, &NodeId, I) -> NodeResult<O> + Send + Sync,
{
    /// Wraps `handler` for the method `method` with signature `decl`.
    ///
    /// # Errors
    ///
    /// Returns `ArgumentCountMismatch` if the tuple arities differ from the
    /// signature.
    pub fn new(method: impl Into<String>, decl: Arc<MethodDecl>, handler: F) -> NodeResult<Self> {
        let method = method.into();
        if I::ARITY != decl.inputs.len() {
            return Err(NodeError::argument_count_mismatch(&method, decl.inputs.len(), I::ARITY));
        }
        if O::ARITY != decl.outputs.len() {
            return Err(NodeError::argument_count_mismatch(&method, decl.outputs.len(), O::ARITY));
        }
        Ok(Self {
            method,
            decl,
            handler,
            _marker: PhantomData,
        })
    }
}

impl<I, O, F> MethodHandler for TypedHandler<I, O, F>
where
    I: FromInputs,
    O: IntoOutputs,
    F: Fn(&CallContext, &NodeId, I) -> NodeResult<O> + Send + Sync,
{
    fn call(
        &self,
        context: &CallContext,
        object_id: &NodeId,
        inputs: &[Variant],
        outputs: &mut [Variant],
    ) -> NodeResult<()> {
        let arguments = I::from_inputs(&self.method, &self.decl, inputs)?;
        let results = (self.handler)(context, object_id, arguments)?;
        results.into_outputs(outputs);
        Ok(())
    }
}

/// Binds a typed closure as the handler of `method`.
///
/// # Errors
///
/// - `NodeClassMismatch` if `method` is not a method node
/// - `ArgumentCountMismatch` if the closure's arities differ from the
///   method signature
pub fn bind<I, O, F>(method: &NodeRef, handler: F) -> NodeResult<()>
where
    I: FromInputs + 'static,
    O: IntoOutputs + 'static,
    F: Fn(&CallContext, &NodeId, I) -> NodeResult<O> + Send + Sync + 'static,
{
    let decl = method.method_decl().ok_or_else(|| {
        NodeError::node_class_mismatch(method.path(), adi_core::NodeClass::Method, method.node_class())
    })?;
    let handler = TypedHandler::new(method.browse_name().name.clone(), decl, handler)?;
    method.set_handler(Arc::new(handler))
}

// =============================================================================
// Tests
// =============================================================================
