// Copyright Peter Bower 2025. All Rights Reserved.
// Licensed under MIT License.

//! # Executor Module
//!
//! Entry point for callers holding type-erased operands.
//!
//! An [`OpCall`] describes one invocation: family, opcode, operand handles,
//! the scalar operand, extras and the optional axis sequence. [`execute`]
//! checks that every handle the family needs is present, that all operands
//! share one element type, and then forwards to the typed entry point in
//! [`crate::kernels::routing::dispatch`].

use crate::enums::dtype::DType;
use crate::enums::error::DispatchError;
use crate::enums::family::OpFamily;
use crate::enums::tensor::{ExtraArgs, ScalarValue, Tensor, TensorElement};
use crate::kernels::routing::dispatch::*;
use crate::structs::context::LaunchContext;

/// Descriptor of one type-erased call.
///
/// `axis` selects the entry point variant for the reducing families:
/// `None` reduces over the whole input into a one-element output, `Some`
/// reduces along the listed dimensions (an empty list meaning all of them).
/// Broadcast treats `None` as an empty list.
#[derive(Debug, Clone, Copy)]
pub struct OpCall<'a> {
    pub family: OpFamily,
    pub opcode: i32,
    pub x: Option<&'a Tensor>,
    pub y: Option<&'a Tensor>,
    pub scalar: Option<ScalarValue>,
    pub extras: ExtraArgs<'a>,
    pub axis: Option<&'a [i32]>,
    pub bias_corrected: bool,
}

impl<'a> OpCall<'a> {
    pub fn new(family: OpFamily, opcode: i32) -> Self {
        OpCall {
            family,
            opcode,
            x: None,
            y: None,
            scalar: None,
            extras: ExtraArgs::None,
            axis: None,
            bias_corrected: false,
        }
    }

    pub fn with_x(mut self, x: &'a Tensor) -> Self {
        self.x = Some(x);
        self
    }

    pub fn with_y(mut self, y: &'a Tensor) -> Self {
        self.y = Some(y);
        self
    }

    pub fn with_scalar(mut self, scalar: impl Into<ScalarValue>) -> Self {
        self.scalar = Some(scalar.into());
        self
    }

    pub fn with_extras(mut self, extras: impl Into<ExtraArgs<'a>>) -> Self {
        self.extras = extras.into();
        self
    }

    pub fn with_axis(mut self, axis: &'a [i32]) -> Self {
        self.axis = Some(axis);
        self
    }

    pub fn with_bias_corrected(mut self, bias_corrected: bool) -> Self {
        self.bias_corrected = bias_corrected;
        self
    }
}

/// Validates handle presence and element types, then runs the call.
///
/// Absent handles raise `NullContext` or `NullOperand`, both reported as
/// fatal by [`DispatchError::is_fatal`]. Operands, scalar and extras whose
/// element type differs from `x` raise `TypeMismatch`, whether or not the
/// family reads them. An axis given to a family without axis variants
/// raises `ShapeMismatch`. `z` is untouched on every error.
pub fn execute(
    ctx: Option<&LaunchContext>,
    call: &OpCall<'_>,
    z: Option<&mut Tensor>,
) -> Result<(), DispatchError> {
    let family = call.family;
    let ctx = ctx.ok_or_else(|| reject(call, DispatchError::NullContext { family }))?;
    let x = call.x.ok_or_else(|| reject(call, null_operand(family, "x")))?;
    let z = z.ok_or_else(|| reject(call, null_operand(family, "z")))?;
    match x.dtype() {
        DType::Float32 => run::<f32>(ctx, call, x, z),
        DType::Float64 => run::<f64>(ctx, call, x, z),
    }
}

/// Logs a call rejected before it reaches a typed entry point. Those log
/// their own rejections.
fn reject(call: &OpCall<'_>, error: DispatchError) -> DispatchError {
    tracing::debug!(
        family = %call.family,
        opcode = call.opcode,
        error = %error,
        "dynamic call rejected"
    );
    error
}

fn null_operand(family: OpFamily, operand: &'static str) -> DispatchError {
    DispatchError::NullOperand { family, operand }
}

fn type_mismatch(family: OpFamily, expected: DType, found: DType) -> DispatchError {
    DispatchError::TypeMismatch {
        family,
        expected,
        found,
    }
}

fn run<T: TensorElement>(
    ctx: &LaunchContext,
    call: &OpCall<'_>,
    x: &Tensor,
    z: &mut Tensor,
) -> Result<(), DispatchError> {
    let family = call.family;
    let expected = T::DTYPE;
    let mismatch = |found: DType| reject(call, type_mismatch(family, expected, found));

    let x = x.inner_check::<T>().ok_or_else(|| mismatch(x.dtype()))?;
    let y = match call.y {
        Some(y) => Some(y.inner_check::<T>().ok_or_else(|| mismatch(y.dtype()))?),
        None => None,
    };
    let scalar = match call.scalar {
        Some(s) => Some(T::from_scalar(s).ok_or_else(|| mismatch(s.dtype()))?),
        None => None,
    };
    let extras = T::from_extras(call.extras)
        .ok_or_else(|| mismatch(call.extras.dtype().unwrap_or(expected)))?;
    let found = z.dtype();
    let z = z.inner_check_mut::<T>().ok_or_else(|| mismatch(found))?;

    if let Some(axis) = call.axis.filter(|_| !family.takes_axes()) {
        return Err(reject(
            call,
            DispatchError::shape(family, format!("axis {axis:?} given to a family without axis variants")),
        ));
    }
    let y = || y.ok_or_else(|| reject(call, null_operand(family, "y")));
    let scalar = || scalar.ok_or_else(|| reject(call, null_operand(family, "scalar")));

    let opcode = call.opcode;
    let bias = call.bias_corrected;
    match family {
        OpFamily::Scalar => exec_scalar(ctx, opcode, x, z, scalar()?, extras),
        OpFamily::Transform => exec_transform(ctx, opcode, x, z, extras),
        OpFamily::SummaryStats => match call.axis {
            None => exec_summary_stats_scalar(ctx, opcode, x, z, extras, bias),
            Some(axis) => exec_summary_stats(ctx, opcode, x, z, axis, extras, bias),
        },
        OpFamily::Reduce => match call.axis {
            None => exec_reduce_scalar(ctx, opcode, x, z, extras),
            Some(axis) => exec_reduce(ctx, opcode, x, z, axis, extras),
        },
        OpFamily::IndexReduce => match call.axis {
            None => exec_index_reduce_scalar(ctx, opcode, x, z, extras),
            Some(axis) => exec_index_reduce(ctx, opcode, x, z, axis, extras),
        },
        OpFamily::Reduce3 => match call.axis {
            None => exec_reduce3_scalar(ctx, opcode, x, y()?, z, extras),
            Some(axis) => exec_reduce3(ctx, opcode, x, y()?, z, axis, extras),
        },
        OpFamily::Pairwise => exec_pairwise(ctx, opcode, x, y()?, z, extras),
        OpFamily::Broadcast => {
            let y = y()?;
            if !extras.is_empty() {
                let error = match T::registry().broadcast.resolve(opcode) {
                    Some(e) => DispatchError::InvalidAuxiliaryArity {
                        family,
                        kernel: e.name,
                        expected: 0,
                        found: extras.len(),
                    },
                    None => DispatchError::InvalidOpcode {
                        family,
                        opcode,
                        dtype: expected,
                    },
                };
                return Err(reject(call, error));
            }
            exec_broadcast(ctx, opcode, x, y, z, call.axis.unwrap_or(&[]))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structs::ndarray::NdArray;

    fn ctx() -> LaunchContext {
        LaunchContext::default()
    }

    #[test]
    fn test_scalar_call() {
        let x = Tensor::from(NdArray::<f64>::vector(&[1.0, 2.0, 3.0]));
        let mut z = Tensor::from(NdArray::<f64>::zeros(&[3]));
        let call = OpCall::new(OpFamily::Scalar, 0).with_x(&x).with_scalar(5.0f64);
        execute(Some(&ctx()), &call, Some(&mut z)).unwrap();
        assert_eq!(z.inner_check::<f64>().unwrap().as_slice(), &[6.0, 7.0, 8.0]);
    }

    #[test]
    fn test_null_handles_are_fatal() {
        let x = Tensor::from(NdArray::<f32>::vector(&[1.0]));
        let mut z = Tensor::from(NdArray::<f32>::zeros(&[1]));
        let call = OpCall::new(OpFamily::Transform, 0).with_x(&x);

        let err = execute(None, &call, Some(&mut z)).unwrap_err();
        assert_eq!(err, DispatchError::NullContext { family: OpFamily::Transform });
        assert!(err.is_fatal());

        let err = execute(Some(&ctx()), &call, None).unwrap_err();
        assert!(matches!(err, DispatchError::NullOperand { operand: "z", .. }));

        let bare = OpCall::new(OpFamily::Transform, 0);
        let err = execute(Some(&ctx()), &bare, Some(&mut z)).unwrap_err();
        assert!(matches!(err, DispatchError::NullOperand { operand: "x", .. }));
    }

    #[test]
    fn test_missing_y_and_scalar() {
        let x = Tensor::from(NdArray::<f64>::vector(&[1.0]));
        let mut z = Tensor::from(NdArray::<f64>::zeros(&[1]));
        let call = OpCall::new(OpFamily::Pairwise, 0).with_x(&x);
        assert!(matches!(
            execute(Some(&ctx()), &call, Some(&mut z)),
            Err(DispatchError::NullOperand { operand: "y", .. })
        ));
        let call = OpCall::new(OpFamily::Scalar, 0).with_x(&x);
        assert!(matches!(
            execute(Some(&ctx()), &call, Some(&mut z)),
            Err(DispatchError::NullOperand { operand: "scalar", .. })
        ));
    }

    #[test]
    fn test_mixed_types() {
        let x = Tensor::from(NdArray::<f64>::vector(&[1.0, 2.0]));
        let y = Tensor::from(NdArray::<f32>::vector(&[1.0, 2.0]));
        let mut z = Tensor::from(NdArray::<f64>::full(&[2], 4.0));
        let call = OpCall::new(OpFamily::Pairwise, 0).with_x(&x).with_y(&y);
        let err = execute(Some(&ctx()), &call, Some(&mut z)).unwrap_err();
        assert_eq!(
            err,
            DispatchError::TypeMismatch {
                family: OpFamily::Pairwise,
                expected: DType::Float64,
                found: DType::Float32,
            }
        );
        assert_eq!(z.inner_check::<f64>().unwrap().as_slice(), &[4.0, 4.0]);

        let eps = [0.1f32];
        let call = OpCall::new(OpFamily::Transform, 7).with_x(&x).with_extras(&eps[..]);
        assert!(matches!(
            execute(Some(&ctx()), &call, Some(&mut z)),
            Err(DispatchError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_axis_selects_variant() {
        let x = Tensor::from(NdArray::<f32>::full(&[2, 3], 1.0));
        let mut whole = Tensor::from(NdArray::<f32>::zeros(&[1]));
        let call = OpCall::new(OpFamily::Reduce, 1).with_x(&x);
        execute(Some(&ctx()), &call, Some(&mut whole)).unwrap();
        assert_eq!(whole.inner_check::<f32>().unwrap().as_slice(), &[6.0]);

        let mut rows = Tensor::from(NdArray::<f32>::zeros(&[2]));
        let call = call.with_axis(&[1]);
        execute(Some(&ctx()), &call, Some(&mut rows)).unwrap();
        assert_eq!(rows.inner_check::<f32>().unwrap().as_slice(), &[3.0, 3.0]);
    }

    #[test]
    fn test_broadcast_rejects_extras() {
        let x = Tensor::from(NdArray::<f64>::zeros(&[2]));
        let y = Tensor::from(NdArray::<f64>::zeros(&[2]));
        let mut z = Tensor::from(NdArray::<f64>::zeros(&[2]));
        let extras = [1.0f64];
        let call = OpCall::new(OpFamily::Broadcast, 0)
            .with_x(&x)
            .with_y(&y)
            .with_extras(&extras[..]);
        assert!(matches!(
            execute(Some(&ctx()), &call, Some(&mut z)),
            Err(DispatchError::InvalidAuxiliaryArity { expected: 0, found: 1, .. })
        ));
    }

    #[test]
    fn test_unread_operands_are_type_checked() {
        let x = Tensor::from(NdArray::<f64>::vector(&[1.0, 2.0]));
        let y32 = Tensor::from(NdArray::<f32>::vector(&[1.0, 2.0]));
        let mut z = Tensor::from(NdArray::<f64>::full(&[2], 4.0));

        let call = OpCall::new(OpFamily::Transform, 0).with_x(&x).with_y(&y32);
        assert!(matches!(
            execute(Some(&ctx()), &call, Some(&mut z)),
            Err(DispatchError::TypeMismatch { found: DType::Float32, .. })
        ));

        let call = OpCall::new(OpFamily::Pairwise, 0)
            .with_x(&x)
            .with_y(&x)
            .with_scalar(1.0f32);
        assert!(matches!(
            execute(Some(&ctx()), &call, Some(&mut z)),
            Err(DispatchError::TypeMismatch { found: DType::Float32, .. })
        ));

        // a matching, unread scalar is accepted
        let call = OpCall::new(OpFamily::Transform, 0).with_x(&x).with_scalar(1.0f64);
        execute(Some(&ctx()), &call, Some(&mut z)).unwrap();
        assert_eq!(z.inner_check::<f64>().unwrap().as_slice(), &[1.0, 2.0]);
    }

    #[test]
    fn test_axis_rejected_for_elementwise_families() {
        let x = Tensor::from(NdArray::<f64>::vector(&[1.0, 2.0]));
        let mut z = Tensor::from(NdArray::<f64>::full(&[2], 4.0));
        for family in [OpFamily::Scalar, OpFamily::Transform, OpFamily::Pairwise] {
            let call = OpCall::new(family, 0)
                .with_x(&x)
                .with_y(&x)
                .with_scalar(1.0f64)
                .with_axis(&[0]);
            assert!(matches!(
                execute(Some(&ctx()), &call, Some(&mut z)),
                Err(DispatchError::ShapeMismatch { .. })
            ));
        }
        assert_eq!(z.inner_check::<f64>().unwrap().as_slice(), &[4.0, 4.0]);
    }

    #[test]
    fn test_every_rejection_logged_once() {
        use crate::kernels::routing::capture::count_events;
        use tracing::Level;

        let x = Tensor::from(NdArray::<f64>::zeros(&[2]));
        let x32 = Tensor::from(NdArray::<f32>::zeros(&[2]));
        let mut z = Tensor::from(NdArray::<f64>::zeros(&[2]));
        let extras = [1.0f64];
        let calls = [
            // broadcast extras, registered opcode
            OpCall::new(OpFamily::Broadcast, 0).with_x(&x).with_y(&x).with_extras(&extras[..]),
            // broadcast extras, unregistered opcode
            OpCall::new(OpFamily::Broadcast, 99).with_x(&x).with_y(&x).with_extras(&extras[..]),
            OpCall::new(OpFamily::Pairwise, 0).with_x(&x).with_y(&x32),
            OpCall::new(OpFamily::Pairwise, 0).with_x(&x),
            OpCall::new(OpFamily::Transform, 0).with_x(&x).with_axis(&[0]),
        ];
        let dynamic = count_events(Level::DEBUG, "dynamic call rejected", || {
            for call in &calls {
                assert!(execute(Some(&ctx()), call, Some(&mut z)).is_err());
            }
            assert!(execute(None, &calls[0], Some(&mut z)).is_err());
        });
        assert_eq!(dynamic, calls.len() + 1);

        // rejected by the typed entry point: logged there, not twice
        let call = OpCall::new(OpFamily::Transform, 999).with_x(&x);
        let dynamic = count_events(Level::DEBUG, "dynamic call rejected", || {
            assert!(execute(Some(&ctx()), &call, Some(&mut z)).is_err());
        });
        let typed = count_events(Level::DEBUG, "dispatch rejected", || {
            assert!(execute(Some(&ctx()), &call, Some(&mut z)).is_err());
        });
        assert_eq!((dynamic, typed), (0, 1));
    }
}
